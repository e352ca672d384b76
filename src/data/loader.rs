use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use crate::error::DashboardError;

use super::model::{COLUMNS, Dataset, Observation};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a tidy observation table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming `country, continent, metric, year, value`
/// * `.json`    – `[{ "country": "France", "year": 1997, ... }, ...]`
/// * `.parquet` – flat columns with the same names (strings, integer year)
///
/// Column order is free and extra columns are ignored. Any schema violation
/// fails the whole load.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DashboardError::UnsupportedFormat(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} observations ({} continents, {} metrics) from {}",
        dataset.len(),
        dataset.continents.len(),
        dataset.metrics.len(),
        path.display()
    );
    Ok(dataset)
}

/// Build the dataset and reject metric keys without a label.
fn finish(observations: Vec<Observation>) -> Result<Dataset> {
    let dataset = Dataset::from_observations(observations);
    dataset.validate_metrics()?;
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Cell parsing shared by all formats
// ---------------------------------------------------------------------------

fn invalid(row: usize, column: &str, value: &str, expected: &'static str) -> DashboardError {
    DashboardError::InvalidValue {
        row,
        column: column.to_string(),
        value: value.to_string(),
        expected,
    }
}

/// Years are integers; `"1997.0"` is accepted, `"1997.5"` is not.
fn parse_year(s: &str, row: usize) -> Result<i64, DashboardError> {
    let tok = s.trim();
    if let Ok(year) = tok.parse::<i64>() {
        return Ok(year);
    }
    match tok.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
        _ => Err(invalid(row, "year", s, "integer year")),
    }
}

/// Values must be finite; `NaN` and `inf` parse as floats but are rejected.
fn parse_value(s: &str, row: usize) -> Result<f64, DashboardError> {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(invalid(row, "value", s, "number")),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

/// Position of each canonical column in a header row.
struct ColumnIndex([usize; 5]);

impl ColumnIndex {
    fn locate(headers: &[String]) -> Result<Self, DashboardError> {
        let mut positions = [0usize; 5];
        for (slot, name) in positions.iter_mut().zip(COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| DashboardError::MissingColumn(name.to_string()))?;
        }
        for extra in headers.iter().filter(|h| !COLUMNS.contains(&h.trim())) {
            log::debug!("Ignoring extra column '{extra}'");
        }
        Ok(ColumnIndex(positions))
    }

    fn observation(
        &self,
        record: &csv::StringRecord,
        row: usize,
    ) -> Result<Observation, DashboardError> {
        let [country, continent, metric, year, value] =
            self.0.map(|i| record.get(i).unwrap_or(""));
        Ok(Observation {
            country: country.to_string(),
            continent: continent.to_string(),
            metric: metric.to_string(),
            year: parse_year(year, row)?,
            value: parse_value(value, row)?,
        })
    }
}

/// Parse CSV from any reader (header row required).
pub fn read_csv<R: Read>(rdr: R) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(rdr);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let index = ColumnIndex::locate(&headers)?;

    let mut observations = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        observations.push(index.observation(&record, row_no)?);
    }

    finish(observations)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "country": "France", "continent": "Europe", "metric": "lifeExp",
///     "year": 1997, "value": 78.0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    read_json(&text)
}

pub fn read_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut observations = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        observations.push(Observation {
            country: json_text(obj, "country", i)?,
            continent: json_text(obj, "continent", i)?,
            metric: json_text(obj, "metric", i)?,
            year: parse_year(&json_text(obj, "year", i)?, i)?,
            value: parse_value(&json_text(obj, "value", i)?, i)?,
        });
    }

    finish(observations)
}

/// Field as text; numbers are rendered so the shared parsers can check them.
fn json_text(
    obj: &Map<String, JsonValue>,
    col: &str,
    row: usize,
) -> Result<String, DashboardError> {
    match obj.get(col) {
        None => Err(DashboardError::MissingColumn(col.to_string())),
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(JsonValue::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(invalid(row, col, &other.to_string(), "string or number")),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per canonical field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`): strings may be `Utf8` or `LargeUtf8`,
/// `year` any integer (or integral float) column, `value` any numeric column.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    // Checked against the file schema so files without row groups fail too.
    let schema = builder.schema().clone();
    let mut indices = [0usize; 5];
    for (slot, name) in indices.iter_mut().zip(COLUMNS) {
        *slot = schema
            .index_of(name)
            .map_err(|_| DashboardError::MissingColumn(name.to_string()))?;
    }

    let reader = builder.build().context("building parquet reader")?;

    let mut observations = Vec::new();
    let mut offset = 0usize;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let cols: Vec<&ArrayRef> = indices.iter().map(|&i| batch.column(i)).collect();

        for row in 0..batch.num_rows() {
            let row_no = offset + row;
            observations.push(Observation {
                country: arrow_text(cols[0], row, row_no, "country")?,
                continent: arrow_text(cols[1], row, row_no, "continent")?,
                metric: arrow_text(cols[2], row, row_no, "metric")?,
                year: arrow_year(cols[3], row, row_no)?,
                value: arrow_number(cols[4], row, row_no, "value")?,
            });
        }
        offset += batch.num_rows();
    }

    finish(observations)
}

// -- Arrow helpers --

fn arrow_text(col: &ArrayRef, row: usize, row_no: usize, name: &str) -> Result<String> {
    if col.is_null(row) {
        return Err(invalid(row_no, name, "null", "string").into());
    }
    match col.data_type() {
        DataType::Utf8 => Ok(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => bail!("column '{name}' has type {other:?}, expected Utf8"),
    }
}

fn arrow_year(col: &ArrayRef, row: usize, row_no: usize) -> Result<i64> {
    if col.is_null(row) {
        return Err(invalid(row_no, "year", "null", "integer year").into());
    }
    match col.data_type() {
        DataType::Int32 => Ok(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => Ok(col.as_primitive::<Int64Type>().value(row)),
        _ => {
            let v = arrow_number(col, row, row_no, "year")?;
            Ok(parse_year(&v.to_string(), row_no)?)
        }
    }
}

fn arrow_number(col: &ArrayRef, row: usize, row_no: usize, name: &str) -> Result<f64> {
    if col.is_null(row) {
        return Err(invalid(row_no, name, "null", "number").into());
    }
    match col.data_type() {
        DataType::Int32 => Ok(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Int64 => Ok(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Float32 => {
            let v = col.as_primitive::<Float32Type>().value(row) as f64;
            finite(v, row_no, name)
        }
        DataType::Float64 => finite(col.as_primitive::<Float64Type>().value(row), row_no, name),
        other => bail!("column '{name}' has type {other:?}, expected a numeric column"),
    }
}

fn finite(v: f64, row_no: usize, name: &str) -> Result<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(invalid(row_no, name, &v.to_string(), "number").into())
    }
}
