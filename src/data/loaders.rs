//! Record loading from CSV, JSON and JSON-lines files

use crate::data::type_inference::{InferredType, TypeInference};
use crate::models::{records_from_json, Record};
use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use serde_json::{Number, Value};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Rows sampled to infer CSV column types
const TYPE_SAMPLE_ROWS: usize = 100;

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
    JsonLines,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(InputFormat::Csv),
            "json" => Ok(InputFormat::Json),
            "jsonl" | "ndjson" => Ok(InputFormat::JsonLines),
            _ => bail!(
                "Unsupported file type {:?}; expected .csv, .json or .jsonl",
                path
            ),
        }
    }
}

/// Load records, picking the format from the file extension
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let records = match InputFormat::from_path(path)? {
        InputFormat::Csv => load_csv_records(path)?,
        InputFormat::Json => load_json_records(path)?,
        InputFormat::JsonLines => load_jsonl_records(path)?,
    };
    debug!("Loaded {} records from {:?}", records.len(), path);
    Ok(records)
}

/// Load a CSV file with a header row
pub fn load_csv_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path.as_ref()))?;
    read_csv_records(file)
}

/// Parse CSV from any reader. Column types are inferred from the first rows.
pub fn read_csv_records<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut string_rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("Failed to read CSV row {}", index + 1))?;
        if row.len() != headers.len() {
            warn!(
                "CSV row {} has {} cells, header has {}",
                index + 1,
                row.len(),
                headers.len()
            );
        }
        string_rows.push(row.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    }

    let mut column_types = vec![InferredType::Null; headers.len()];
    for row in string_rows.iter().take(TYPE_SAMPLE_ROWS) {
        for (col_idx, cell) in row.iter().enumerate().take(headers.len()) {
            if !cell.is_empty() {
                let inferred = TypeInference::infer_from_string(cell);
                column_types[col_idx] = TypeInference::merge_types(column_types[col_idx], inferred);
            }
        }
    }

    Ok(string_rows
        .into_iter()
        .map(|row| {
            headers
                .iter()
                .zip(column_types.iter())
                .enumerate()
                .map(|(col_idx, (header, column_type))| {
                    let cell = row.get(col_idx).map(String::as_str).unwrap_or("");
                    (header.clone(), typed_cell(cell, *column_type))
                })
                .collect::<Record>()
        })
        .collect())
}

fn typed_cell(cell: &str, column_type: InferredType) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    let cell_type = TypeInference::infer_from_string(cell);
    let typed = match (column_type, cell_type) {
        (InferredType::Integer, InferredType::Integer) => cell.parse::<i64>().ok().map(Value::from),
        (InferredType::Float, InferredType::Integer | InferredType::Float) => cell
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        (InferredType::Boolean, InferredType::Boolean) => {
            Some(Value::Bool(cell.eq_ignore_ascii_case("true")))
        }
        _ => None,
    };
    // Cells past the sample that disagree with the column type stay text
    typed.unwrap_or_else(|| Value::String(cell.to_string()))
}

/// Load a JSON file holding an array of objects
pub fn load_json_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open JSON file: {:?}", path.as_ref()))?;
    let reader = BufReader::new(file);

    let json_data: Value = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse JSON file: {:?}", path.as_ref()))?;

    records_from_json(json_data).context("JSON data must be an array of objects")
}

/// Load a JSON-lines file, one object per line
pub fn load_jsonl_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open JSON-lines file: {:?}", path.as_ref()))?;
    read_jsonl_records(BufReader::new(file))
}

pub fn read_jsonl_records<R: BufRead>(reader: R) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line)
            .with_context(|| format!("Invalid JSON on line {}", index + 1))?;
        match value {
            Value::Object(map) => records.push(map),
            _ => bail!("Line {} is not a JSON object", index + 1),
        }
    }
    Ok(records)
}
