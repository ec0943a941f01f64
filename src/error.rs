//! Per-upload error type for the screening pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while screening one uploaded file.
///
/// Startup failures (configuration, model artifact) are not represented
/// here; those are fatal and handled at the binary boundary.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("column '{column}', row {row}: cannot read {value:?} as a number")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("model inference failed: {0}")]
    Inference(#[source] anyhow::Error),
}
