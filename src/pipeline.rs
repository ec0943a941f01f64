//! Per-upload screening pipeline
//!
//! One synchronous pass per uploaded file: parse, align, predict,
//! report. Any failure comes back as a single typed error for the
//! display layer; no partial results are produced.

use crate::aligner::FeatureAligner;
use crate::error::ScreenError;
use crate::models::classifier::FraudClassifier;
use crate::report::ScreeningReport;
use crate::types::label::FraudLabel;
use crate::types::table::UploadedTable;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// The screener core: the immutable classifier handle plus the aligner,
/// shared across every upload in the session.
pub struct ScreeningPipeline {
    aligner: FeatureAligner,
    classifier: FraudClassifier,
}

impl ScreeningPipeline {
    pub fn new(classifier: FraudClassifier) -> Self {
        Self {
            aligner: FeatureAligner::new(),
            classifier,
        }
    }

    /// Screen one uploaded CSV file.
    pub fn screen_file<P: AsRef<Path>>(&self, path: P) -> Result<ScreeningReport, ScreenError> {
        let path = path.as_ref();
        let start_time = Instant::now();

        let table = UploadedTable::from_path(path)?;
        debug!(path = %path.display(), rows = table.row_count(), "Upload parsed");

        let report = self.screen(&table)?;

        info!(
            path = %path.display(),
            rows = report.row_count(),
            fraud = report.summary().count_of(FraudLabel::Fraud),
            processing_time_us = start_time.elapsed().as_micros(),
            "Upload screened"
        );

        Ok(report)
    }

    /// Screen an already-parsed table.
    pub fn screen(&self, table: &UploadedTable) -> Result<ScreeningReport, ScreenError> {
        let frame = self.aligner.align(table)?;
        let predictions = self
            .classifier
            .predict(&frame)
            .map_err(ScreenError::Inference)?;
        Ok(ScreeningReport::new(frame, predictions))
    }
}

#[cfg(test)]
mod tests {
    // End-to-end tests would require a serialized classifier artifact
}
