//! Prediction report: the augmented table and the label frequency summary

use crate::types::label::FraudLabel;
use crate::types::table::FeatureFrame;
use std::fmt;

/// Name of the appended prediction column.
pub const PREDICTION_COLUMN: &str = "Prediction";

/// Result of screening one uploaded batch: the aligned features plus one
/// prediction per row. Exists only for the render cycle; nothing is
/// persisted.
pub struct ScreeningReport {
    frame: FeatureFrame,
    predictions: Vec<FraudLabel>,
}

impl ScreeningReport {
    pub fn new(frame: FeatureFrame, predictions: Vec<FraudLabel>) -> Self {
        debug_assert_eq!(frame.row_count(), predictions.len());
        Self { frame, predictions }
    }

    pub fn row_count(&self) -> usize {
        self.predictions.len()
    }

    /// Column names of the rendered table: the 30 aligned features plus
    /// the appended prediction column.
    pub fn column_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.frame.columns().to_vec();
        names.push(PREDICTION_COLUMN);
        names
    }

    /// Predicted labels, positionally aligned with the input rows.
    pub fn predictions(&self) -> &[FraudLabel] {
        &self.predictions
    }

    /// Frequency of each occurring label, most frequent first.
    ///
    /// Ties keep class order, so equal counts list Not Fraud before
    /// Fraud; labels with zero occurrences are omitted, as a
    /// value-frequency tabulation produces.
    pub fn summary(&self) -> FraudSummary {
        let fraud = self
            .predictions
            .iter()
            .filter(|label| **label == FraudLabel::Fraud)
            .count();
        let not_fraud = self.predictions.len() - fraud;

        let mut counts: Vec<(FraudLabel, usize)> =
            [(FraudLabel::NotFraud, not_fraud), (FraudLabel::Fraud, fraud)]
                .into_iter()
                .filter(|(_, count)| *count > 0)
                .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        FraudSummary { counts }
    }
}

impl fmt::Display for ScreeningReport {
    /// Render the full augmented table, fixed-width, one line per row.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers = self.column_names();
        let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();

        let mut rendered: Vec<Vec<String>> = Vec::with_capacity(self.row_count());
        for (row, label) in self.frame.rows().iter().zip(&self.predictions) {
            let mut cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            cells.push(label.class().to_string());
            for (i, cell) in cells.iter().enumerate() {
                widths[i] = widths[i].max(cell.len());
            }
            rendered.push(cells);
        }

        for (i, header) in headers.iter().enumerate() {
            if i > 0 {
                write!(f, "  ")?;
            }
            write!(f, "{:>width$}", header, width = widths[i])?;
        }
        writeln!(f)?;

        for cells in &rendered {
            for (i, cell) in cells.iter().enumerate() {
                if i > 0 {
                    write!(f, "  ")?;
                }
                write!(f, "{:>width$}", cell, width = widths[i])?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Frequency breakdown of the predicted labels for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FraudSummary {
    counts: Vec<(FraudLabel, usize)>,
}

impl FraudSummary {
    /// Occurring labels with their counts, most frequent first.
    pub fn counts(&self) -> &[(FraudLabel, usize)] {
        &self.counts
    }

    pub fn count_of(&self, label: FraudLabel) -> usize {
        self.counts
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }
}

impl fmt::Display for FraudSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self
            .counts
            .iter()
            .map(|(label, _)| label.display_name().len())
            .max()
            .unwrap_or(0);

        for (label, count) in &self.counts {
            writeln!(f, "{:<name_width$}  {}", label.display_name(), count)?;
        }
        Ok(())
    }
}
