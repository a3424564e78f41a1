use thiserror::Error;

/// Failures raised by the filter / aggregate / chart pipeline.
///
/// None of these are fatal to the dashboard: each page section carries its
/// own `Result` and reports the condition inline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("column '{column}' is missing (needed by {operation})")]
    MissingColumn { column: String, operation: String },
    #[error("{source_name} is missing required column(s): {}", columns.join(", "))]
    MissingColumns {
        source_name: String,
        columns: Vec<String>,
    },
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
    #[error("row {row} has {found} values but the table has {expected} columns")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("no rows left after filtering on '{column}'")]
    EmptySelection { column: String },
    #[error("row {row}: '{value}' in column '{column}' cannot be interpreted")]
    UnparseableValue {
        column: String,
        row: usize,
        value: String,
    },
    #[error("data source '{source_name}' is unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },
}

impl PipelineError {
    pub fn missing_column(column: &str, operation: &str) -> Self {
        PipelineError::MissingColumn {
            column: column.to_string(),
            operation: operation.to_string(),
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
