use std::fmt;

use serde::{Deserialize, Serialize};

use super::schema::{ColumnKind, ColumnSpec, Schema};

/// Column names used by the laboratory sheets (case-sensitive).
pub mod columns {
    pub const TIEMPO: &str = "Tiempo";
    pub const VIABILIDAD: &str = "Viabilidad";
    pub const MUESTRA: &str = "Muestra";
    pub const CELULA: &str = "Celula";
    pub const SD: &str = "SD";
    pub const BIOTINTA: &str = "Biotinta";
    pub const GEOMETRIA: &str = "Geometría";
    pub const FECHA: &str = "Fecha";
    pub const PR: &str = "Pr";
    pub const CONFORMACION: &str = "Conformación";
    pub const COLAPSO: &str = "Colapso del filamento (°)";
    pub const PUNTA: &str = "Punta (G)";
    pub const PRESION: &str = "Presión (kPa)";
    pub const VELOCIDAD: &str = "Velocidad (mm/s)";
    pub const YIELD_STRESS: &str = "Yield Stress (Pa)";
    pub const CROSS_POINT: &str = "Cross Point (%)";
    pub const RECOVERY: &str = "Recovery (%)";
    pub const FILAMENT_DIAMETER: &str = "Average Filamente Diameter (cm)";
    pub const EXPANSION_RATIO: &str = "Expansion Ratio (cm)";
    pub const SD1: &str = "SD1";
    pub const SD2: &str = "SD2";
    pub const SD3: &str = "SD3";
    pub const SD4: &str = "SD4";
    pub const SD5: &str = "SD5";
    pub const NCERO: &str = "ncero";
    pub const NINF: &str = "ninf";
}

use columns::*;

/// The logical tables the dashboard reads, one per source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Viability,
    Shape,
    PrintParameters,
    Rheology,
    CurveFits,
}

impl DataSource {
    /// File name used when the configuration does not override it.
    pub fn default_file_name(self) -> &'static str {
        match self {
            DataSource::Viability => "Viabilidad.xlsx",
            DataSource::Shape => "Consolidado resultados.xlsx",
            DataSource::PrintParameters => "Parámetros de impresión.xlsx",
            DataSource::Rheology => "reo2.xlsx",
            DataSource::CurveFits => "Ajustes curvas.xlsx",
        }
    }

    pub fn schema(self) -> Schema {
        use ColumnKind::*;
        let columns = match self {
            DataSource::Viability => vec![
                ColumnSpec::required(TIEMPO, Number),
                ColumnSpec::required(VIABILIDAD, Number),
                ColumnSpec::required(MUESTRA, Text),
                ColumnSpec::required(CELULA, Text),
                ColumnSpec::optional(SD, Number),
            ],
            DataSource::Shape => vec![
                ColumnSpec::required(BIOTINTA, Text),
                ColumnSpec::required(FECHA, Date),
                ColumnSpec::optional(PR, Number),
                ColumnSpec::optional(CONFORMACION, Number),
                ColumnSpec::optional(COLAPSO, Number),
            ],
            DataSource::PrintParameters => vec![
                ColumnSpec::required(BIOTINTA, Text),
                ColumnSpec::required(GEOMETRIA, Text),
                ColumnSpec::optional(FECHA, Date),
                ColumnSpec::optional(PUNTA, Number),
                ColumnSpec::optional(PRESION, Number),
                ColumnSpec::optional(VELOCIDAD, Number),
            ],
            DataSource::Rheology => {
                let mut cols = vec![ColumnSpec::required(MUESTRA, Text)];
                for var in RHEOLOGY_VARIABLES {
                    cols.push(ColumnSpec::optional(var.value, Number));
                    cols.push(ColumnSpec::optional(var.deviation, Number));
                }
                cols
            }
            DataSource::CurveFits => vec![
                ColumnSpec::required(MUESTRA, Text),
                ColumnSpec::required(FECHA, Date),
                ColumnSpec::optional(NCERO, Number),
                ColumnSpec::optional(NINF, Number),
            ],
        };
        Schema {
            name: self.default_file_name(),
            columns,
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataSource::Viability => "viability",
            DataSource::Shape => "shape",
            DataSource::PrintParameters => "print parameters",
            DataSource::Rheology => "rheology",
            DataSource::CurveFits => "curve fits",
        };
        f.write_str(name)
    }
}

/// A measured quantity paired with its standard-deviation column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NumericVariable {
    pub value: &'static str,
    pub deviation: &'static str,
}

impl NumericVariable {
    pub const fn new(value: &'static str, deviation: &'static str) -> Self {
        NumericVariable { value, deviation }
    }
}

/// The five rheological variables in display order.
pub const RHEOLOGY_VARIABLES: [NumericVariable; 5] = [
    NumericVariable::new(YIELD_STRESS, SD1),
    NumericVariable::new(CROSS_POINT, SD2),
    NumericVariable::new(RECOVERY, SD3),
    NumericVariable::new(FILAMENT_DIAMETER, SD4),
    NumericVariable::new(EXPANSION_RATIO, SD5),
];
