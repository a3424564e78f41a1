use std::collections::{BTreeSet, HashSet};
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::{PipelineError, PipelineResult};

// ---------------------------------------------------------------------------
// Value – a single cell in a table column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring what a spreadsheet can hold.
/// Using `BTreeMap` / `BTreeSet` downstream so `Value` must be `Ord`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Null,
}

// -- Manual Eq/Ord so we can put Value in BTreeSet --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Date(d) => d.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{}", format_float(*v)),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Null => write!(f, "<null>"),
        }
    }
}

/// Up to four decimals, trailing zeros trimmed (`87.5`, not `87.5000`).
fn format_float(v: f64) -> String {
    let s = format!("{v:.4}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Text layouts accepted as calendar dates, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

impl Value {
    /// Try to interpret the value as an `f64` for plotting and statistics.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) if v.is_finite() => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Interpret the value as a calendar date.
    ///
    /// Native dates pass through, text is parsed with a fixed set of layouts
    /// (a time-of-day part is discarded). Numbers are never dates.
    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::String(s) => parse_date(s.trim()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded sheet
// ---------------------------------------------------------------------------

/// An ordered set of rows over uniquely named columns.
///
/// Tables are never mutated after construction; every filter or sort
/// produces a new `Table`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

/// Borrowed view of a single row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    values: &'a [Value],
}

impl<'a> Row<'a> {
    /// Value for `column`, `None` when the table has no such column.
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.table.column_index(column).map(|i| &self.values[i])
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }
}

impl Table {
    /// Build a table from column names and row-major values.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> PipelineResult<Self> {
        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.as_str()) {
                return Err(PipelineError::DuplicateColumn(col.clone()));
            }
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(PipelineError::RaggedRow {
                    row: i,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Table { columns, rows })
    }

    /// Build a table from `(name, values)` column pairs of equal length.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<Value>)>) -> PipelineResult<Self> {
        let n_rows = columns.first().map_or(0, |(_, v)| v.len());
        let mut names = Vec::with_capacity(columns.len());
        let mut rows: Vec<Vec<Value>> = (0..n_rows)
            .map(|_| Vec::with_capacity(columns.len()))
            .collect();
        for (name, values) in columns {
            let name = name.into();
            if values.len() != n_rows {
                return Err(PipelineError::RaggedRow {
                    row: values.len().min(n_rows),
                    expected: n_rows,
                    found: values.len(),
                });
            }
            for (row, value) in rows.iter_mut().zip(values) {
                row.push(value);
            }
            names.push(name);
        }
        Table::from_rows(names, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Index of `name`, or `MissingColumn` attributed to `operation`.
    pub fn require_column(&self, name: &str, operation: &str) -> PipelineResult<usize> {
        self.column_index(name)
            .ok_or_else(|| PipelineError::missing_column(name, operation))
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(move |values| Row {
            table: self,
            values,
        })
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|values| Row {
            table: self,
            values,
        })
    }

    /// All values of one column in row order.
    pub fn column(&self, name: &str) -> PipelineResult<Vec<&Value>> {
        let idx = self.require_column(name, "column lookup")?;
        Ok(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Distinct non-null values in order of first appearance.
    pub fn distinct_values(&self, name: &str) -> PipelineResult<Vec<Value>> {
        let idx = self.require_column(name, "distinct values")?;
        let mut seen = HashSet::new();
        Ok(self
            .rows
            .iter()
            .map(|r| &r[idx])
            .filter(|v| !v.is_null() && seen.insert(*v))
            .cloned()
            .collect())
    }

    /// Distinct non-null values in sorted order.
    pub fn sorted_distinct_values(&self, name: &str) -> PipelineResult<BTreeSet<Value>> {
        Ok(self.distinct_values(name)?.into_iter().collect())
    }

    /// New table holding the rows at `indices`, in the given order.
    pub fn take(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// New table with the rows of `rows` replacing this one's (same columns).
    pub(crate) fn with_rows(&self, rows: Vec<Vec<Value>>) -> Table {
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    pub(crate) fn raw_rows(&self) -> &[Vec<Value>] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_columns(vec![
            ("Muestra", vec!["B".into(), "A".into(), Value::Null, "B".into()]),
            ("Tiempo", vec![24i64.into(), 48i64.into(), 72i64.into(), 24i64.into()]),
        ])
        .unwrap()
    }

    #[test]
    fn distinct_values_keep_first_appearance_and_skip_nulls() {
        let t = sample();
        assert_eq!(
            t.distinct_values("Muestra").unwrap(),
            vec![Value::from("B"), Value::from("A")]
        );
    }

    #[test]
    fn duplicate_columns_are_rejected() {
        let err = Table::from_rows(vec!["SD".into(), "SD".into()], vec![]).unwrap_err();
        assert_eq!(err, PipelineError::DuplicateColumn("SD".into()));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err =
            Table::from_rows(vec!["a".into(), "b".into()], vec![vec![Value::Null]]).unwrap_err();
        assert!(matches!(err, PipelineError::RaggedRow { row: 0, expected: 2, found: 1 }));
    }

    #[test]
    fn row_lookup_by_name() {
        let t = sample();
        let row = t.row(1).unwrap();
        assert_eq!(row.get("Tiempo"), Some(&Value::Integer(48)));
        assert_eq!(row.get("Celula"), None);
    }

    #[test]
    fn missing_column_names_the_operation() {
        let err = sample().distinct_values("Geometría").unwrap_err();
        assert_eq!(err, PipelineError::missing_column("Geometría", "distinct values"));
    }

    #[test]
    fn dates_parse_from_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14);
        assert_eq!(Value::from("2025-03-14").to_date(), expected);
        assert_eq!(Value::from("14/03/2025").to_date(), expected);
        assert_eq!(Value::from("2025-03-14 10:30:00").to_date(), expected);
        assert_eq!(Value::from("not a date").to_date(), None);
        assert_eq!(Value::Float(45000.0).to_date(), None);
    }

    #[test]
    fn floats_display_without_trailing_zeros() {
        assert_eq!(Value::Float(87.5).to_string(), "87.5");
        assert_eq!(Value::Float(2.0).to_string(), "2");
        assert_eq!(Value::Float(0.12345).to_string(), "0.1235");
    }
}
