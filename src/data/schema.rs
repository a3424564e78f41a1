use super::model::{Table, Value};
use crate::error::{PipelineError, PipelineResult};

/// Broad type a column is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Date,
}

impl ColumnKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            ColumnKind::Text => true,
            ColumnKind::Number => value.as_f64().is_some(),
            ColumnKind::Date => value.to_date().is_some(),
        }
    }
}

/// One expected column of a source table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
    /// Optional columns only affect the sections that plot them.
    pub required: bool,
}

impl ColumnSpec {
    pub const fn required(name: &'static str, kind: ColumnKind) -> Self {
        ColumnSpec {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: ColumnKind) -> Self {
        ColumnSpec {
            name,
            kind,
            required: false,
        }
    }
}

/// Ordered list of columns a source table is expected to carry.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub name: &'static str,
    pub columns: Vec<ColumnSpec>,
}

impl Schema {
    /// Check the table once at load time.
    ///
    /// Every missing required column is reported together. Missing optional
    /// columns and cells that do not match the expected kind are only logged:
    /// the sections that depend on them report their own condition.
    pub fn validate(&self, table: &Table) -> PipelineResult<()> {
        let missing: Vec<String> = self
            .columns
            .iter()
            .filter(|c| c.required && !table.has_column(c.name))
            .map(|c| c.name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(PipelineError::MissingColumns {
                source_name: self.name.to_string(),
                columns: missing,
            });
        }

        for spec in &self.columns {
            let Ok(values) = table.column(spec.name) else {
                log::warn!("{}: optional column '{}' is absent", self.name, spec.name);
                continue;
            };
            let mismatched = values
                .iter()
                .filter(|v| !v.is_null() && !spec.kind.accepts(v))
                .count();
            if mismatched > 0 {
                log::warn!(
                    "{}: {mismatched} value(s) in '{}' are not {:?}",
                    self.name,
                    spec.name,
                    spec.kind
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema {
            name: "reo2",
            columns: vec![
                ColumnSpec::required("Muestra", ColumnKind::Text),
                ColumnSpec::required("Yield Stress (Pa)", ColumnKind::Number),
                ColumnSpec::required("Recovery (%)", ColumnKind::Number),
                ColumnSpec::optional("SD1", ColumnKind::Number),
            ],
        }
    }

    #[test]
    fn lists_every_missing_required_column() {
        let table = Table::from_columns(vec![("Muestra", vec![Value::from("A")])]).unwrap();
        let err = schema().validate(&table).unwrap_err();
        assert_eq!(
            err,
            PipelineError::MissingColumns {
                source_name: "reo2".into(),
                columns: vec!["Yield Stress (Pa)".into(), "Recovery (%)".into()],
            }
        );
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let table = Table::from_columns(vec![
            ("Muestra", vec![Value::from("A")]),
            ("Yield Stress (Pa)", vec![Value::Float(120.0)]),
            ("Recovery (%)", vec![Value::Float(80.0)]),
        ])
        .unwrap();
        assert!(schema().validate(&table).is_ok());
    }
}
