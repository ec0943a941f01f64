//! Type definitions for the fraud screener

pub mod label;
pub mod table;

pub use label::FraudLabel;
pub use table::{FeatureFrame, UploadedTable};
