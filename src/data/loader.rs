use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{TemperatureDataset, TemperatureRecord};

const YEAR: &str = "year";
const TAS: &str = "tas_K";
const ANOMALY: &str = "anomaly_K";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a temperature dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[{ "year": 2015, "tas_K": "288.70", "anomaly_K": 0.2 }, ...]`
/// * `.csv`     – header row naming `year`, `tas_K`, `anomaly_K`
/// * `.parquet` – flat numeric (or string) columns with the same names
///
/// Numbers may be stored as numeric strings in every format.
pub fn load_file(path: &Path, baseline_year: i32) -> Result<TemperatureDataset, DataError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let io_err = |source| DataError::Io {
        path: path.to_path_buf(),
        source,
    };

    match ext.as_str() {
        "json" => {
            let text = std::fs::read_to_string(path).map_err(io_err)?;
            parse_json_str(&text, baseline_year)
        }
        "csv" => {
            let file = std::fs::File::open(path).map_err(io_err)?;
            parse_csv(file, baseline_year)
        }
        "parquet" | "pq" => {
            let file = std::fs::File::open(path).map_err(io_err)?;
            load_parquet(file, baseline_year)
        }
        other => Err(DataError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Field coercion shared by every format
// ---------------------------------------------------------------------------

/// A cell as found in the source before numeric coercion.
#[derive(Debug, Clone, PartialEq)]
enum RawField {
    Number(f64),
    Text(String),
    Missing,
    /// Present but of a type that can never be numeric (bool, array, ...).
    Other(String),
}

fn coerce_f64(row: usize, field: &'static str, raw: RawField) -> Result<f64, DataError> {
    let not_numeric = |value: String| DataError::NotNumeric { row, field, value };
    let v = match raw {
        RawField::Number(v) => v,
        RawField::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(DataError::MissingField { row, field });
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| not_numeric(format!("{s:?}")))?
        }
        RawField::Missing => return Err(DataError::MissingField { row, field }),
        RawField::Other(repr) => return Err(not_numeric(repr)),
    };
    // `"NaN"` and `"inf"` parse fine but are not usable measurements.
    if !v.is_finite() {
        return Err(not_numeric(v.to_string()));
    }
    Ok(v)
}

fn coerce_year(row: usize, raw: RawField) -> Result<i32, DataError> {
    let v = coerce_f64(row, YEAR, raw)?;
    if v.fract() != 0.0 || v < f64::from(i32::MIN) || v > f64::from(i32::MAX) {
        return Err(DataError::FractionalYear { row, value: v });
    }
    Ok(v as i32)
}

fn build_record(
    row: usize,
    year: RawField,
    tas: RawField,
    anomaly: RawField,
) -> Result<TemperatureRecord, DataError> {
    Ok(TemperatureRecord::new(
        coerce_year(row, year)?,
        coerce_f64(row, TAS, tas)?,
        coerce_f64(row, ANOMALY, anomaly)?,
    ))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Parse a records-oriented JSON array. Extra keys are ignored.
pub fn parse_json_str(text: &str, baseline_year: i32) -> Result<TemperatureDataset, DataError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let rows = root.as_array().ok_or(DataError::NotAnArray)?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row.as_object().ok_or(DataError::NotAnObject { row: i })?;
        let field = |key: &str| json_to_raw(obj.get(key));
        records.push(build_record(i, field(YEAR), field(TAS), field(ANOMALY))?);
    }

    TemperatureDataset::from_records(records, baseline_year)
}

fn json_to_raw(val: Option<&JsonValue>) -> RawField {
    match val {
        None | Some(JsonValue::Null) => RawField::Missing,
        Some(JsonValue::Number(n)) => match n.as_f64() {
            Some(v) => RawField::Number(v),
            None => RawField::Other(n.to_string()),
        },
        Some(JsonValue::String(s)) => RawField::Text(s.clone()),
        Some(other) => RawField::Other(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names in any order, one record per
/// line. Columns other than the three known ones are ignored.
pub fn parse_csv<R: Read>(input: R, baseline_year: i32) -> Result<TemperatureDataset, DataError> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_string(), i))
        .collect();

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let cell = |name: &str| {
            headers
                .get(name)
                .and_then(|&idx| record.get(idx))
                .map(|s| RawField::Text(s.to_string()))
                .unwrap_or(RawField::Missing)
        };
        records.push(build_record(row, cell(YEAR), cell(TAS), cell(ANOMALY))?);
    }

    TemperatureDataset::from_records(records, baseline_year)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Rows per Arrow batch when reading Parquet.
const PARQUET_BATCH_ROWS: usize = 1024;

/// Load a Parquet file with flat `year`, `tas_K` and `anomaly_K` columns.
/// Integer, float and string column types are accepted.
fn load_parquet(file: std::fs::File, baseline_year: i32) -> Result<TemperatureDataset, DataError> {
    read_parquet(file, baseline_year, PARQUET_BATCH_ROWS)
}

/// Row numbers in errors count across batches, not within one.
fn read_parquet(
    file: std::fs::File,
    baseline_year: i32,
    batch_rows: usize,
) -> Result<TemperatureDataset, DataError> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
        .with_batch_size(batch_rows)
        .build()?;

    let mut records = Vec::new();
    let mut row_offset = 0;

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();
        let column = |name: &str| schema.index_of(name).ok().map(|i| batch.column(i));

        let year_col = column(YEAR);
        let tas_col = column(TAS);
        let anomaly_col = column(ANOMALY);

        for row in 0..batch.num_rows() {
            let row_no = row_offset + row;
            let cell = |col: Option<&Arc<dyn Array>>| {
                col.map(|c| arrow_to_raw(c, row))
                    .unwrap_or(RawField::Missing)
            };
            records.push(build_record(
                row_no,
                cell(year_col),
                cell(tas_col),
                cell(anomaly_col),
            )?);
        }
        row_offset += batch.num_rows();
    }

    TemperatureDataset::from_records(records, baseline_year)
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_to_raw(col: &Arc<dyn Array>, row: usize) -> RawField {
    if col.is_null(row) {
        return RawField::Missing;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| RawField::Number(f64::from(a.value(row))))
            .unwrap_or(RawField::Missing),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| RawField::Number(a.value(row) as f64))
            .unwrap_or(RawField::Missing),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| RawField::Number(f64::from(a.value(row))))
            .unwrap_or(RawField::Missing),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| RawField::Number(a.value(row)))
            .unwrap_or(RawField::Missing),
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|a| RawField::Text(a.value(row).to_string()))
            .unwrap_or(RawField::Missing),
        DataType::LargeUtf8 => RawField::Text(col.as_string::<i64>().value(row).to_string()),
        other => RawField::Other(format!("{other:?}")),
    }
}
