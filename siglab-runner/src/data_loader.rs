//! Close-series loading from an OHLCV CSV file.
//!
//! The file must have a header row containing `close`; other columns (open,
//! high, low, volume, dates) are read for shape validation and then dropped.
//! Row order is time order and is preserved exactly.
//!
//! Validation is strict. Any row whose `close` cell does not parse as a finite
//! number aborts the load: dropping or patching a row would change
//! `rows_processed`, which the metrics document reports verbatim.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use siglab_core::{CloseSeries, DatasetHash};
use thiserror::Error;

/// Name of the column the signal is computed over.
pub const CLOSE_COLUMN: &str = "close";

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("input file not found")]
    NotFound,

    #[error("failed to read input file: {0}")]
    Read(#[source] std::io::Error),

    #[error("invalid CSV file format: {0}")]
    Csv(#[from] csv::Error),

    #[error("empty input file")]
    Empty,

    #[error("missing required columns in dataset: ['{0}']")]
    MissingColumn(&'static str),

    #[error("invalid close value {value:?} at row {row}")]
    InvalidValue { row: usize, value: String },

    #[error("non-finite close value at row {row}")]
    NonFinite { row: usize },
}

/// Result of loading the input table.
#[derive(Debug, Clone)]
pub struct LoadedData {
    /// Exact number of data rows in the table (header excluded).
    pub rows_processed: usize,
    pub close: CloseSeries,
    /// BLAKE3 over the close values, for the run log.
    pub dataset_hash: DatasetHash,
}

/// Load the close series from a CSV file on disk.
pub fn load_close_series(path: &Path) -> Result<LoadedData, DataError> {
    if !path.exists() {
        return Err(DataError::NotFound);
    }
    let file = File::open(path).map_err(DataError::Read)?;
    read_close_series(file)
}

/// Load the close series from any CSV byte source.
///
/// Cells are trimmed before parsing. Row numbers in errors are 1-based data
/// rows (the header is not counted).
pub fn read_close_series<R: Read>(reader: R) -> Result<LoadedData, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let close_idx = rdr
        .headers()?
        .iter()
        .position(|name| name == CLOSE_COLUMN);

    let mut rows = 0usize;
    let mut values = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows += 1;
        if let Some(idx) = close_idx {
            values.push(parse_close(record.get(idx).unwrap_or_default(), rows)?);
        }
    }

    if rows == 0 {
        return Err(DataError::Empty);
    }
    if close_idx.is_none() {
        return Err(DataError::MissingColumn(CLOSE_COLUMN));
    }

    let dataset_hash = DatasetHash::of_closes(&values);
    Ok(LoadedData {
        rows_processed: rows,
        close: CloseSeries::new(values),
        dataset_hash,
    })
}

fn parse_close(raw: &str, row: usize) -> Result<f64, DataError> {
    let value: f64 = raw.parse().map_err(|_| DataError::InvalidValue {
        row,
        value: raw.to_string(),
    })?;
    if !value.is_finite() {
        return Err(DataError::NonFinite { row });
    }
    Ok(value)
}
