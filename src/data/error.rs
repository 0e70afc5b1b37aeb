use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while turning a file into a
/// [`TemperatureDataset`](super::model::TemperatureDataset).
///
/// All of these are raised eagerly at load time; once a dataset exists the
/// interactive path cannot fail.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("reading {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing JSON")]
    Json(#[from] serde_json::Error),

    #[error("reading CSV")]
    Csv(#[from] csv::Error),

    #[error("reading parquet")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("reading arrow batch")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    // -- format errors --
    #[error("expected a top-level JSON array of records")]
    NotAnArray,

    #[error("row {row} is not a JSON object")]
    NotAnObject { row: usize },

    #[error("row {row}: missing field '{field}'")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: field '{field}' is not numeric ({value})")]
    NotNumeric {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("row {row}: year {value} is not a whole number")]
    FractionalYear { row: usize, value: f64 },

    #[error("year {year} appears more than once")]
    DuplicateYear { year: i32 },

    #[error("dataset contains no records")]
    Empty,

    // -- baseline --
    #[error("no record for baseline year {year}")]
    BaselineMissing { year: i32 },
}

impl DataError {
    /// True for the malformed-input class (as opposed to I/O or a missing
    /// baseline).
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            DataError::NotAnArray
                | DataError::NotAnObject { .. }
                | DataError::MissingField { .. }
                | DataError::NotNumeric { .. }
                | DataError::FractionalYear { .. }
                | DataError::DuplicateYear { .. }
                | DataError::Empty
                | DataError::Json(_)
                | DataError::Csv(_)
        )
    }
}
