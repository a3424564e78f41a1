use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Date32Array, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray, TimestampMicrosecondArray, TimestampMillisecondArray, TimestampNanosecondArray,
    TimestampSecondArray,
};
use arrow::datatypes::{DataType, TimeUnit};
use calamine::{Data, DataType as _, Reader, open_workbook_auto};
use chrono::{DateTime, NaiveDate};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load one table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – first worksheet, first row is the header
/// * `.csv`     – header row, cell types guessed per value
/// * `.json`    – `[{ "Muestra": "A", "Tiempo": 24, ... }, ...]`
/// * `.parquet` – flat columns (strings, ints, floats, bools, dates)
///
/// Header names are trimmed; duplicated headers get a `.1`, `.2`… suffix.
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path),
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

fn build_table(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Table> {
    Table::from_rows(dedupe_headers(headers), rows).context("assembling table")
}

fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .map(|h| {
            let h = h.trim().to_string();
            let n = counts.entry(h.clone()).or_insert(0);
            let name = if *n == 0 { h.clone() } else { format!("{h}.{n}") };
            *n += 1;
            name
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn load_workbook(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|c| c.to_string()).collect(),
        None => bail!("worksheet is empty"),
    };

    let mut body = Vec::with_capacity(range.height().saturating_sub(1));
    for row in rows {
        // Trailing blank lines are common in hand-edited sheets.
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        body.push(row.iter().map(cell_to_value).collect());
    }

    build_table(headers, body)
}

fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Int(i) => Value::Integer(*i),
        Data::Float(f) => Value::Float(*f),
        Data::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Value::Null
            } else {
                Value::String(s.to_string())
            }
        }
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_date() {
            Some(d) => Value::Date(d),
            None => Value::String(cell.to_string()),
        },
        Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(_) | Data::Empty => Value::Null,
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Muestra": "A", "Tiempo": 24, "Viabilidad": 90.0 },
///   ...
/// ]
/// ```
///
/// The column order is the key order of the first record; keys that only
/// appear later are appended.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .into_iter()
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map_or(Value::Null, json_to_value))
                .collect()
        })
        .collect();

    build_table(headers, rows)
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => guess_value_type(s),
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
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per row.
/// Cell types are guessed per value (integer, float, bool, ISO date, text).
fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != headers.len() {
            bail!(
                "CSV row {row_no}: {} fields but {} headers",
                record.len(),
                headers.len()
            );
        }
        rows.push(record.iter().map(guess_value_type).collect());
    }

    build_table(headers, rows)
}

fn guess_value_type(s: &str) -> Value {
    let s = s.trim();
    if s.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Value::Float(f);
    }
    if s == "true" || s == "false" {
        return Value::Bool(s == "true");
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Value::Date(d);
    }
    Value::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet file (as written by `df.to_parquet()` or by the
/// `generate_sample` binary). Every column becomes a table column.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let values = (0..batch.num_columns())
                .map(|col| extract_value(batch.column(col), row))
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("Row {row}"))?;
            rows.push(values);
        }
    }

    build_table(headers, rows)
}

// -- Parquet / Arrow helpers --

fn downcast<'a, T: 'static>(col: &'a Arc<dyn Array>) -> Result<&'a T> {
    col.as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("unexpected array layout for {:?}", col.data_type()))
}

/// Extract a single value from an Arrow column at a given row.
fn extract_value(col: &Arc<dyn Array>, row: usize) -> Result<Value> {
    if col.is_null(row) {
        return Ok(Value::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => Value::String(downcast::<StringArray>(col)?.value(row).to_string()),
        DataType::LargeUtf8 => Value::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => Value::Integer(downcast::<Int32Array>(col)?.value(row) as i64),
        DataType::Int64 => Value::Integer(downcast::<Int64Array>(col)?.value(row)),
        DataType::Float32 => Value::Float(downcast::<Float32Array>(col)?.value(row) as f64),
        DataType::Float64 => Value::Float(downcast::<Float64Array>(col)?.value(row)),
        DataType::Boolean => Value::Bool(downcast::<BooleanArray>(col)?.value(row)),
        DataType::Date32 => match downcast::<Date32Array>(col)?.value_as_date(row) {
            Some(d) => Value::Date(d),
            None => Value::Null,
        },
        DataType::Timestamp(unit, _) => {
            let instant = match unit {
                TimeUnit::Second => {
                    DateTime::from_timestamp(downcast::<TimestampSecondArray>(col)?.value(row), 0)
                }
                TimeUnit::Millisecond => DateTime::from_timestamp_millis(
                    downcast::<TimestampMillisecondArray>(col)?.value(row),
                ),
                TimeUnit::Microsecond => DateTime::from_timestamp_micros(
                    downcast::<TimestampMicrosecondArray>(col)?.value(row),
                ),
                TimeUnit::Nanosecond => Some(DateTime::from_timestamp_nanos(
                    downcast::<TimestampNanosecondArray>(col)?.value(row),
                )),
            };
            // Instants outside chrono's range become missing values.
            instant.map_or(Value::Null, |dt| Value::Date(dt.date_naive()))
        }
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_far_from_the_epoch_do_not_overflow() {
        let col: Arc<dyn Array> = Arc::new(TimestampSecondArray::from(vec![
            253_402_214_400,
            i64::MAX,
        ]));
        assert_eq!(
            extract_value(&col, 0).unwrap(),
            Value::Date(NaiveDate::from_ymd_opt(9999, 12, 31).unwrap())
        );
        assert_eq!(extract_value(&col, 1).unwrap(), Value::Null);

        let col: Arc<dyn Array> = Arc::new(TimestampMillisecondArray::from(vec![i64::MIN]));
        assert_eq!(extract_value(&col, 0).unwrap(), Value::Null);
    }

    #[test]
    fn duplicate_headers_get_suffixes() {
        let headers = vec![" SD ".to_string(), "SD".to_string(), "Muestra".to_string()];
        assert_eq!(dedupe_headers(headers), vec!["SD", "SD.1", "Muestra"]);
    }

    #[test]
    fn csv_cells_are_typed() {
        assert_eq!(guess_value_type("24"), Value::Integer(24));
        assert_eq!(guess_value_type("87.5"), Value::Float(87.5));
        assert_eq!(guess_value_type(""), Value::Null);
        assert_eq!(
            guess_value_type("2025-01-31"),
            Value::Date(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap())
        );
        assert_eq!(guess_value_type("NCB 1%"), Value::String("NCB 1%".into()));
    }

    #[test]
    fn spreadsheet_cells_map_to_values() {
        assert_eq!(cell_to_value(&Data::Int(3)), Value::Integer(3));
        assert_eq!(cell_to_value(&Data::String("  ".into())), Value::Null);
        assert_eq!(cell_to_value(&Data::Empty), Value::Null);
        assert_eq!(
            cell_to_value(&Data::DateTimeIso("2025-02-02T00:00:00".into())),
            Value::Date(NaiveDate::from_ymd_opt(2025, 2, 2).unwrap())
        );
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let err = load_file(Path::new("notes.txt")).unwrap_err();
        assert!(err.to_string().contains(".txt"));
    }
}
