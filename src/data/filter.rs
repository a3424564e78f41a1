use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{Table, Value};
use crate::error::{PipelineError, PipelineResult};

/// Rows whose value in `column` is a member of `selected`, in original order.
///
/// Selecting nothing yields an empty table, not an error.
pub fn filter_by_categories(
    table: &Table,
    column: &str,
    selected: &BTreeSet<Value>,
) -> PipelineResult<Table> {
    let idx = table.require_column(column, "category filter")?;
    let rows = table
        .raw_rows()
        .iter()
        .filter(|row| selected.contains(&row[idx]))
        .cloned()
        .collect();
    Ok(table.with_rows(rows))
}

/// Single-select variant: rows whose value in `column` equals `value`.
pub fn filter_equals(table: &Table, column: &str, value: &Value) -> PipelineResult<Table> {
    filter_by_categories(table, column, &BTreeSet::from([value.clone()]))
}

/// Reinterpret `column` as calendar dates and sort ascending by it.
///
/// Rows whose value does not parse are dropped whole. The sort is stable, so
/// rows sharing a date keep their input order. Applying this twice gives the
/// same table as applying it once.
pub fn normalize_date_column(table: &Table, column: &str) -> PipelineResult<Table> {
    let idx = table.require_column(column, "date normalization")?;

    let mut dated: Vec<(NaiveDate, Vec<Value>)> = Vec::with_capacity(table.len());
    let mut dropped = 0usize;
    for (row_no, row) in table.raw_rows().iter().enumerate() {
        match row[idx].to_date() {
            Some(date) => {
                let mut row = row.clone();
                row[idx] = Value::Date(date);
                dated.push((date, row));
            }
            None => {
                let err = PipelineError::UnparseableValue {
                    column: column.to_string(),
                    row: row_no,
                    value: row[idx].to_string(),
                };
                log::debug!("{err}");
                dropped += 1;
            }
        }
    }
    if dropped > 0 {
        log::warn!("dropped {dropped} row(s) with unparseable '{column}'");
    }

    dated.sort_by_key(|(date, _)| *date);
    Ok(table.with_rows(dated.into_iter().map(|(_, row)| row).collect()))
}

/// Rows whose date in `column` falls within `[from, to]` (either bound optional).
/// Rows that are not dates are dropped.
pub fn filter_date_range(
    table: &Table,
    column: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> PipelineResult<Table> {
    let idx = table.require_column(column, "date range filter")?;
    let rows = table
        .raw_rows()
        .iter()
        .filter(|row| {
            row[idx].to_date().is_some_and(|d| {
                from.map_or(true, |f| d >= f) && to.map_or(true, |t| d <= t)
            })
        })
        .cloned()
        .collect();
    Ok(table.with_rows(rows))
}
