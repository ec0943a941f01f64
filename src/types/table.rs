//! Tabular data structures for uploaded transaction batches

use crate::error::ScreenError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A raw uploaded table: the header row plus every record, untyped.
///
/// Cells stay as strings until a column is actually selected for the
/// model, so extra columns with non-numeric content never cause a parse
/// failure.
#[derive(Debug, Clone)]
pub struct UploadedTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl UploadedTable {
    /// Read a table from a CSV file on disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ScreenError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ScreenError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Read a table from any CSV byte stream.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScreenError> {
        let mut reader = csv::Reader::from_reader(reader);

        let headers = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Column names in upload order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Position of a column by name, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Records in upload order, cells as raw strings.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

/// An aligned numeric batch: exactly the expected feature columns, in
/// model order, one `f64` per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    columns: Vec<&'static str>,
    rows: Vec<Vec<f64>>,
}

impl FeatureFrame {
    pub fn new(columns: Vec<&'static str>, rows: Vec<Vec<f64>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Flatten the frame row-major into an `f32` buffer for the model
    /// input tensor.
    pub fn to_input_buffer(&self) -> Vec<f32> {
        self.rows
            .iter()
            .flat_map(|row| row.iter().map(|&v| v as f32))
            .collect()
    }
}
