//! Fraud Screener Library
//!
//! Loads a pre-trained credit card fraud classifier once at startup and
//! scores uploaded CSV batches of transactions: align the columns to the
//! model's expected feature set, predict, and report the fraud counts.

pub mod aligner;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod types;

pub use aligner::FeatureAligner;
pub use config::AppConfig;
pub use error::ScreenError;
pub use models::classifier::FraudClassifier;
pub use pipeline::ScreeningPipeline;
pub use report::{FraudSummary, ScreeningReport};
pub use types::{label::FraudLabel, table::UploadedTable};
