//! Aggregation engine: per-variable summaries and correlation matrices over
//! an already filtered table.

use serde::Serialize;

use crate::data::model::Table;
use crate::data::source::NumericVariable;
use crate::error::PipelineResult;

/// Mean of a measured quantity and of its paired deviation column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub mean: f64,
    /// `None` when the deviation column holds no numbers for these rows.
    pub mean_deviation: Option<f64>,
    /// Sample standard deviation of the value column (needs two rows).
    pub std_dev: Option<f64>,
    pub count: usize,
}

/// Numbers of `column` in row order; non-numeric cells are skipped.
fn numeric_values(table: &Table, column: &str, operation: &str) -> PipelineResult<Vec<f64>> {
    let idx = table.require_column(column, operation)?;
    Ok(table
        .rows()
        .filter_map(|r| r.values()[idx].as_f64())
        .collect())
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n − 1 denominator).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Summarize one variable. `Ok(None)` means "no data" for the current rows.
pub fn summarize(table: &Table, variable: &NumericVariable) -> PipelineResult<Option<Summary>> {
    let values = numeric_values(table, variable.value, "summary")?;
    let deviations = numeric_values(table, variable.deviation, "summary")?;

    let Some(m) = mean(&values) else {
        return Ok(None);
    };
    Ok(Some(Summary {
        mean: m,
        mean_deviation: mean(&deviations),
        std_dev: std_dev(&values),
        count: values.len(),
    }))
}

/// One metric tile: a variable name with its summary, or "no data".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricTile {
    pub label: String,
    pub summary: Option<Summary>,
}

impl MetricTile {
    /// Headline value, two decimals.
    pub fn value_text(&self) -> String {
        match &self.summary {
            Some(s) => format!("{:.2}", s.mean),
            None => "no data".to_string(),
        }
    }

    /// "±" deviation line, three decimals.
    pub fn delta_text(&self) -> Option<String> {
        self.summary
            .and_then(|s| s.mean_deviation)
            .map(|d| format!("±{d:.3}"))
    }
}

/// Tiles for every usable variable. Variables whose value or deviation
/// column is absent are skipped; the rest still produce tiles.
pub fn metric_tiles(table: &Table, variables: &[NumericVariable]) -> Vec<MetricTile> {
    variables
        .iter()
        .filter_map(|var| match summarize(table, var) {
            Ok(summary) => Some(MetricTile {
                label: var.value.to_string(),
                summary,
            }),
            Err(e) => {
                log::warn!("skipping metric '{}': {e}", var.value);
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// A Pearson coefficient, or undefined (zero variance / too few pairs).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Correlation {
    Defined(f64),
    Undefined,
}

impl Correlation {
    pub fn value(self) -> Option<f64> {
        match self {
            Correlation::Defined(v) => Some(v),
            Correlation::Undefined => None,
        }
    }
}

/// Square matrix indexed by `labels` on both axes, in the order requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub cells: Vec<Vec<Correlation>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> Correlation {
        self.cells[row][col]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Pearson correlation over rows where both cells are numbers.
pub fn pearson(pairs: &[(f64, f64)]) -> Correlation {
    if pairs.len() < 2 {
        return Correlation::Undefined;
    }
    // Constant columns are checked exactly; sums of repeated decimals leave
    // rounding noise in the variance.
    let (x0, y0) = pairs[0];
    if pairs.iter().all(|p| p.0 == x0) || pairs.iter().all(|p| p.1 == y0) {
        return Correlation::Undefined;
    }
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for &(x, y) in pairs {
        let (dx, dy) = (x - mx, y - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return Correlation::Undefined;
    }
    Correlation::Defined((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Pairwise-complete Pearson matrix over `columns`.
///
/// The diagonal is 1 for every column that holds at least one number, even a
/// constant one; every other cell involving a constant column is undefined.
pub fn correlation_matrix(table: &Table, columns: &[&str]) -> PipelineResult<CorrelationMatrix> {
    let indices = columns
        .iter()
        .map(|c| table.require_column(c, "correlation matrix"))
        .collect::<PipelineResult<Vec<_>>>()?;

    let cols: Vec<Vec<Option<f64>>> = indices
        .iter()
        .map(|&i| table.rows().map(|r| r.values()[i].as_f64()).collect())
        .collect();

    let n = columns.len();
    let mut cells = vec![vec![Correlation::Undefined; n]; n];
    for i in 0..n {
        if cols[i].iter().any(Option::is_some) {
            cells[i][i] = Correlation::Defined(1.0);
        }
        for j in (i + 1)..n {
            let pairs: Vec<(f64, f64)> = cols[i]
                .iter()
                .zip(&cols[j])
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .collect();
            let r = pearson(&pairs);
            cells[i][j] = r;
            cells[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        labels: columns.iter().map(|c| c.to_string()).collect(),
        cells,
    })
}
