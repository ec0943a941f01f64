//! Binary prediction label

use std::fmt;

/// Classifier output for one transaction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FraudLabel {
    NotFraud,
    Fraud,
}

impl FraudLabel {
    /// Map a raw class id from the model to a label. Class 1 is fraud;
    /// everything else is treated as the negative class.
    pub fn from_class(class: i64) -> Self {
        if class == 1 {
            FraudLabel::Fraud
        } else {
            FraudLabel::NotFraud
        }
    }

    /// The class id as it appears in the rendered table.
    pub fn class(self) -> i64 {
        match self {
            FraudLabel::NotFraud => 0,
            FraudLabel::Fraud => 1,
        }
    }

    /// Human-readable name used in the frequency summary.
    pub fn display_name(self) -> &'static str {
        match self {
            FraudLabel::NotFraud => "Not Fraud",
            FraudLabel::Fraud => "Fraud",
        }
    }
}

impl fmt::Display for FraudLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
