use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Record, Value};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load records from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[{ "id": 1, "name": "Apple", "tags": ["fruit"] }, ...]`
/// * `.csv`     – header row, one record per line; `tags[]` columns hold `a;b;c` lists
/// * `.parquet` – scalar columns plus `List<Utf8>` columns
pub fn load_file(path: &Path) -> Result<Vec<Record>, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            parse_json(&text)
        }
        "csv" => Ok(load_csv(path)?),
        "parquet" | "pq" => Ok(load_parquet(path)?),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Parse a JSON document whose top-level value is an array of objects.
pub fn parse_json(text: &str) -> Result<Vec<Record>, LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;

    let rows = root
        .as_array()
        .ok_or_else(|| LoadError::Shape("expected top-level JSON array".to_string()))?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| -> Result<Record, LoadError> {
            let obj = row
                .as_object()
                .ok_or_else(|| LoadError::Shape(format!("row {i} is not a JSON object")))?;
            Ok(obj
                .iter()
                .map(|(key, val)| (key.clone(), json_to_value(val)))
                .collect())
        })
        .collect()
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        JsonValue::Array(items) => Value::List(
            items
                .iter()
                .map(|item| match item {
                    JsonValue::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        ),
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// CSV layout: header row with attribute names, one record per row.
/// A header ending in `[]` marks a list column: `tags[]` loads as attribute
/// `tags` with `;`-separated cells (`"red;green"`). Other cells are never split.
fn load_csv(path: &Path) -> anyhow::Result<Vec<Record>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let columns: Vec<(String, bool)> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| match h.strip_suffix("[]") {
            Some(name) => (name.to_string(), true),
            None => (h.to_string(), false),
        })
        .collect();

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        if row.len() != columns.len() {
            bail!(
                "CSV row {row_no}: {} cells but {} headers",
                row.len(),
                columns.len()
            );
        }

        records.push(
            columns
                .iter()
                .zip(row.iter())
                .map(|((name, is_list), cell)| {
                    let value = if *is_list {
                        split_list(cell)
                    } else {
                        guess_value_type(cell)
                    };
                    (name.clone(), value)
                })
                .collect(),
        );
    }

    Ok(records)
}

fn split_list(s: &str) -> Value {
    Value::List(
        s.split(';')
            .map(str::trim)
            .filter(|tok| !tok.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

fn guess_value_type(s: &str) -> Value {
    if s.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        if f.is_finite() {
            return Value::Float(f);
        }
    }
    if s == "true" || s == "false" {
        return Value::Bool(s == "true");
    }
    Value::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Load a Parquet file, one record per row.
///
/// Every column becomes an attribute. Works with files written by Pandas
/// (`df.to_parquet()`) and Polars (`df.write_parquet()`).
fn load_parquet(path: &Path) -> anyhow::Result<Vec<Record>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for row in 0..batch.num_rows() {
            let mut record = Record::new();
            for (col_idx, field) in schema.fields().iter().enumerate() {
                let value = extract_value(batch.column(col_idx), row)
                    .with_context(|| format!("row {row}, column '{}'", field.name()))?;
                record.insert(field.name().clone(), value);
            }
            records.push(record);
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

fn downcast<'a, T: 'static>(col: &'a Arc<dyn Array>) -> anyhow::Result<&'a T> {
    col.as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("unexpected array layout for {:?}", col.data_type()))
}

/// Extract a single value from an Arrow column at a given row.
fn extract_value(col: &Arc<dyn Array>, row: usize) -> anyhow::Result<Value> {
    if col.is_null(row) {
        return Ok(Value::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => Value::String(downcast::<StringArray>(col)?.value(row).to_string()),
        DataType::LargeUtf8 => {
            Value::String(downcast::<LargeStringArray>(col)?.value(row).to_string())
        }
        DataType::Int32 => Value::Integer(i64::from(downcast::<Int32Array>(col)?.value(row))),
        DataType::Int64 => Value::Integer(downcast::<Int64Array>(col)?.value(row)),
        DataType::Float32 => Value::Float(f64::from(downcast::<Float32Array>(col)?.value(row))),
        DataType::Float64 => Value::Float(downcast::<Float64Array>(col)?.value(row)),
        DataType::Boolean => Value::Bool(downcast::<BooleanArray>(col)?.value(row)),
        DataType::List(_) => string_list(col.as_list::<i32>().value(row))?,
        DataType::LargeList(_) => string_list(col.as_list::<i64>().value(row))?,
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(value)
}

fn string_list(values: Arc<dyn Array>) -> anyhow::Result<Value> {
    let strings = downcast::<StringArray>(&values)
        .context("list columns must hold Utf8 values")?;
    Ok(Value::List(
        strings
            .iter()
            .map(|s| s.unwrap_or_default().to_string())
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_arrays_become_lists() {
        let records = parse_json(r#"[{"tags": ["a", 2, true], "n": 1.5}]"#).unwrap();
        assert_eq!(
            records[0].get("tags"),
            Some(&Value::from(vec!["a", "2", "true"]))
        );
        assert_eq!(records[0].get("n"), Some(&Value::Float(1.5)));
    }

    #[test]
    fn json_rejects_non_array_root() {
        let err = parse_json(r#"{"id": 1}"#).unwrap_err();
        assert!(matches!(err, LoadError::Shape(_)));
    }

    #[test]
    fn json_rejects_scalar_rows() {
        let err = parse_json("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("row 0"));
    }

    #[test]
    fn csv_cell_types() {
        assert_eq!(guess_value_type(""), Value::Null);
        assert_eq!(guess_value_type("42"), Value::Integer(42));
        assert_eq!(guess_value_type("4.5"), Value::Float(4.5));
        assert_eq!(guess_value_type("true"), Value::Bool(true));
        assert_eq!(guess_value_type("Hello; world"), Value::from("Hello; world"));
        assert_eq!(split_list("red; blue"), Value::from(vec!["red", "blue"]));
        assert_eq!(split_list("red"), Value::from(vec!["red"]));
        assert_eq!(split_list(""), Value::List(Vec::new()));
        assert_eq!(guess_value_type("NaN"), Value::from("NaN"));
    }
}
