//! Feature alignment for fraud classifier inference.
//!
//! Projects an arbitrary uploaded table down to the exact ordered set of
//! columns the classifier was trained on, deriving `Hour` from `Time`
//! when the upload carries only the raw timestamp.

use crate::error::ScreenError;
use crate::types::table::{FeatureFrame, UploadedTable};

/// The fixed, ordered feature set the model expects.
///
/// Order matches the training pipeline; the model input tensor is built
/// column-for-column from this list.
pub const EXPECTED_FEATURES: [&str; 30] = [
    "V1", "V2", "V3", "V4", "V5", "V6", "V7", "V8", "V9", "V10", "V11", "V12", "V13", "V14",
    "V15", "V16", "V17", "V18", "V19", "V20", "V21", "V22", "V23", "V24", "V25", "V26", "V27",
    "V28", "Amount", "Hour",
];

/// Column holding the derived hour-of-day feature.
pub const HOUR_COLUMN: &str = "Hour";

/// Raw timestamp column (seconds) `Hour` can be derived from.
pub const TIME_COLUMN: &str = "Time";

/// Aligns uploaded tables to the model's expected feature set.
///
/// Extra columns are dropped without ever being parsed; row order is
/// preserved; values are not range-checked. A column still missing after
/// the optional `Hour` derivation rejects the whole batch.
pub struct FeatureAligner;

impl FeatureAligner {
    /// Create a new feature aligner.
    pub fn new() -> Self {
        Self
    }

    /// Get the number of features the model consumes.
    pub fn feature_count(&self) -> usize {
        EXPECTED_FEATURES.len()
    }

    /// Get feature names in model input order.
    pub fn feature_names(&self) -> &'static [&'static str] {
        &EXPECTED_FEATURES
    }

    /// Align an uploaded table to the expected feature set.
    pub fn align(&self, table: &UploadedTable) -> Result<FeatureFrame, ScreenError> {
        let derived_hour = self.derive_hour_column(table)?;

        // Resolve every expected column up front so a missing one fails
        // before any cell is parsed. None marks the derived Hour column.
        let mut sources: Vec<(&'static str, Option<usize>)> =
            Vec::with_capacity(EXPECTED_FEATURES.len());
        for name in EXPECTED_FEATURES {
            match table.column_index(name) {
                Some(idx) => sources.push((name, Some(idx))),
                None if name == HOUR_COLUMN && derived_hour.is_some() => {
                    sources.push((name, None));
                }
                None => return Err(ScreenError::MissingColumn(name.to_string())),
            }
        }

        let mut rows = Vec::with_capacity(table.row_count());
        for (row_idx, record) in table.rows().iter().enumerate() {
            let mut row = Vec::with_capacity(EXPECTED_FEATURES.len());
            for &(name, source) in &sources {
                let value = match source {
                    Some(col_idx) => parse_cell(name, row_idx, &record[col_idx])?,
                    None => derived_hour.as_ref().expect("derived column")[row_idx],
                };
                row.push(value);
            }
            rows.push(row);
        }

        Ok(FeatureFrame::new(EXPECTED_FEATURES.to_vec(), rows))
    }

    /// Compute the `Hour` column from `Time` when the upload has no
    /// `Hour` of its own. Returns None when no derivation applies.
    fn derive_hour_column(&self, table: &UploadedTable) -> Result<Option<Vec<f64>>, ScreenError> {
        if table.has_column(HOUR_COLUMN) {
            return Ok(None);
        }
        let time_idx = match table.column_index(TIME_COLUMN) {
            Some(idx) => idx,
            None => return Ok(None),
        };

        let mut hours = Vec::with_capacity(table.row_count());
        for (row_idx, record) in table.rows().iter().enumerate() {
            let seconds = parse_cell(TIME_COLUMN, row_idx, &record[time_idx])?;
            hours.push(derive_hour(seconds));
        }
        Ok(Some(hours))
    }
}

impl Default for FeatureAligner {
    fn default() -> Self {
        Self::new()
    }
}

/// Hour-of-day from a raw seconds timestamp: `floor(Time / 3600) mod 24`.
fn derive_hour(seconds: f64) -> f64 {
    (seconds / 3600.0).floor().rem_euclid(24.0)
}

fn parse_cell(column: &str, row: usize, value: &str) -> Result<f64, ScreenError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ScreenError::InvalidValue {
            column: column.to_string(),
            row,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_with_expected_columns(hour_or_time: &str, rows: &[&str]) -> UploadedTable {
        let v_headers: Vec<String> = (1..=28).map(|i| format!("V{i}")).collect();
        let header = format!("{},Amount,{}", v_headers.join(","), hour_or_time);
        let mut data = header;
        for row in rows {
            data.push('\n');
            data.push_str(row);
        }
        UploadedTable::from_reader(data.as_bytes()).expect("parse CSV")
    }

    fn v_values(fill: f64) -> String {
        (0..28)
            .map(|_| fill.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    #[test]
    fn test_pure_projection_when_hour_present() {
        let row = format!("{},42.5,5", v_values(0.1));
        let table = csv_with_expected_columns("Hour", &[&row]);

        let aligner = FeatureAligner::new();
        let frame = aligner.align(&table).expect("align");

        assert_eq!(frame.columns(), aligner.feature_names());
        assert_eq!(frame.row_count(), 1);
        assert_eq!(frame.rows()[0][28], 42.5); // Amount
        assert_eq!(frame.rows()[0][29], 5.0); // Hour passed through
    }

    #[test]
    fn test_hour_derived_from_time() {
        let row = format!("{},10.0,7200", v_values(0.0));
        let table = csv_with_expected_columns("Time", &[&row]);

        let frame = FeatureAligner::new().align(&table).expect("align");
        assert_eq!(frame.rows()[0][29], 2.0); // 7200s -> hour 2
    }

    #[test]
    fn test_hour_derivation_wraps_past_midnight() {
        // 25h, 48h and 23:59:59 into the stream
        let rows = [
            format!("{},1.0,90000", v_values(0.0)),
            format!("{},1.0,172800", v_values(0.0)),
            format!("{},1.0,86399", v_values(0.0)),
        ];
        let row_refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let table = csv_with_expected_columns("Time", &row_refs);

        let frame = FeatureAligner::new().align(&table).expect("align");
        assert_eq!(frame.rows()[0][29], 1.0);
        assert_eq!(frame.rows()[1][29], 0.0);
        assert_eq!(frame.rows()[2][29], 23.0);
    }

    #[test]
    fn test_derived_hours_stay_in_range() {
        for seconds in [0.0, 3599.0, 3600.0, 7200.5, 86399.0, 86400.0, 1e7] {
            let hour = derive_hour(seconds);
            assert!((0.0..=23.0).contains(&hour), "hour {hour} from {seconds}");
            assert_eq!(hour, hour.floor());
        }
    }

    #[test]
    fn test_hour_wins_over_time_when_both_present() {
        let v_headers: Vec<String> = (1..=28).map(|i| format!("V{i}")).collect();
        let header = format!("{},Amount,Time,Hour", v_headers.join(","));
        let data = format!("{header}\n{},5.0,7200,9", v_values(0.0));
        let table = UploadedTable::from_reader(data.as_bytes()).expect("parse CSV");

        let frame = FeatureAligner::new().align(&table).expect("align");
        // Time says hour 2; the provided Hour column is used unchanged.
        assert_eq!(frame.rows()[0][29], 9.0);
    }

    #[test]
    fn test_missing_column_rejects_batch() {
        let v_headers: Vec<String> = (1..=28)
            .filter(|&i| i != 14)
            .map(|i| format!("V{i}"))
            .collect();
        let header = format!("{},Amount,Hour", v_headers.join(","));
        let row = (0..29).map(|_| "1.0").collect::<Vec<_>>().join(",");
        let data = format!("{header}\n{row}");
        let table = UploadedTable::from_reader(data.as_bytes()).expect("parse CSV");

        let err = FeatureAligner::new().align(&table).unwrap_err();
        match err {
            ScreenError::MissingColumn(name) => assert_eq!(name, "V14"),
            other => panic!("expected missing column, got {other}"),
        }
    }

    #[test]
    fn test_missing_hour_and_time_rejects_batch() {
        let v_headers: Vec<String> = (1..=28).map(|i| format!("V{i}")).collect();
        let header = format!("{},Amount", v_headers.join(","));
        let data = format!("{header}\n{},3.0", v_values(0.0));
        let table = UploadedTable::from_reader(data.as_bytes()).expect("parse CSV");

        let err = FeatureAligner::new().align(&table).unwrap_err();
        match err {
            ScreenError::MissingColumn(name) => assert_eq!(name, "Hour"),
            other => panic!("expected missing column, got {other}"),
        }
    }

    #[test]
    fn test_extra_columns_silently_dropped() {
        let v_headers: Vec<String> = (1..=28).map(|i| format!("V{i}")).collect();
        // MerchantId is non-numeric; it must be dropped without parsing.
        let header = format!("MerchantId,{},Amount,Hour", v_headers.join(","));
        let data = format!("{header}\nm-0017,{},12.0,4", v_values(1.5));
        let table = UploadedTable::from_reader(data.as_bytes()).expect("parse CSV");

        let aligner = FeatureAligner::new();
        let frame = aligner.align(&table).expect("align");
        assert_eq!(frame.column_count(), 30);
        assert!(!frame.columns().contains(&"MerchantId"));
        assert_eq!(frame.rows()[0][28], 12.0);
    }

    #[test]
    fn test_row_order_preserved() {
        let rows = [
            format!("{},1.0,1", v_values(0.0)),
            format!("{},2.0,2", v_values(0.0)),
            format!("{},3.0,3", v_values(0.0)),
        ];
        let row_refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let table = csv_with_expected_columns("Hour", &row_refs);

        let frame = FeatureAligner::new().align(&table).expect("align");
        let amounts: Vec<f64> = frame.rows().iter().map(|r| r[28]).collect();
        assert_eq!(amounts, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_unparseable_selected_value_is_an_error() {
        let row = format!("{},not-a-number,5", v_values(0.0));
        let table = csv_with_expected_columns("Hour", &[&row]);

        let err = FeatureAligner::new().align(&table).unwrap_err();
        match err {
            ScreenError::InvalidValue { column, row, .. } => {
                assert_eq!(column, "Amount");
                assert_eq!(row, 0);
            }
            other => panic!("expected invalid value, got {other}"),
        }
    }

    #[test]
    fn test_nan_flows_through_unvalidated() {
        let row = format!("{},NaN,5", v_values(0.0));
        let table = csv_with_expected_columns("Hour", &[&row]);

        let frame = FeatureAligner::new().align(&table).expect("align");
        assert!(frame.rows()[0][28].is_nan());
    }

    #[test]
    fn test_alignment_is_idempotent_on_values() {
        let row = format!("{},42.5,5", v_values(-0.7));
        let table = csv_with_expected_columns("Hour", &[&row]);

        let aligner = FeatureAligner::new();
        let first = aligner.align(&table).expect("align");
        let second = aligner.align(&table).expect("align");
        assert_eq!(first, second);
    }
}
