//! Writes a small synthetic laboratory data set (one parquet file per source)
//! plus a `bioink-dash.json` pointing at it.
//!
//! Usage: `generate_sample [output_dir]` (defaults to `sample_data`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use bioink_dash::config::{DEFAULT_CONFIG_FILE, DashboardConfig};
use bioink_dash::data::source::columns::*;
use bioink_dash::data::source::{DataSource, RHEOLOGY_VARIABLES};
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

const BIOTINTAS: [&str; 3] = ["Alginato", "GelMA", "Alginato-Gelatina"];
const GEOMETRIAS: [&str; 2] = ["Rejilla", "Panal"];
const MUESTRAS: [&str; 4] = ["NCB", "NCV", "NCB-Ca", "NCV-Ca"];
const CELULAS: [&str; 2] = ["Fibroblasto", "Condrocito"];

// ---------------------------------------------------------------------------
// Arrow helpers
// ---------------------------------------------------------------------------

/// Column-wise builder for one record batch.
#[derive(Default)]
struct Frame {
    columns: Vec<(&'static str, ArrayRef)>,
}

impl Frame {
    fn text(mut self, name: &'static str, values: Vec<String>) -> Self {
        self.columns.push((name, Arc::new(StringArray::from(values))));
        self
    }

    fn float(mut self, name: &'static str, values: Vec<f64>) -> Self {
        self.columns.push((name, Arc::new(Float64Array::from(values))));
        self
    }

    fn int(mut self, name: &'static str, values: Vec<i64>) -> Self {
        self.columns.push((name, Arc::new(Int64Array::from(values))));
        self
    }

    fn date(mut self, name: &'static str, values: Vec<NaiveDate>) -> Self {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
        let days: Vec<i32> = values.iter().map(|d| (*d - epoch).num_days() as i32).collect();
        self.columns.push((name, Arc::new(Date32Array::from(days))));
        self
    }

    fn write(self, path: &Path) -> Result<usize> {
        let schema = Arc::new(Schema::new(
            self.columns
                .iter()
                .map(|(name, array)| Field::new(*name, array.data_type().clone(), true))
                .collect::<Vec<_>>(),
        ));
        let arrays = self.columns.into_iter().map(|(_, a)| a).collect();
        let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        let mut writer = ArrowWriter::try_new(file, schema, None)?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(batch.num_rows())
    }
}

fn date(days_after_start: i64) -> NaiveDate {
    let start = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap_or_default();
    start + chrono::Duration::days(days_after_start)
}

// ---------------------------------------------------------------------------
// Synthetic sources
// ---------------------------------------------------------------------------

fn viability(rng: &mut SimpleRng) -> Frame {
    let (mut tiempo, mut viab, mut muestra, mut celula, mut sd) =
        (vec![], vec![], vec![], vec![], vec![]);
    for cell in CELULAS {
        for sample in MUESTRAS {
            let base = rng.gauss(92.0, 3.0);
            for (k, hours) in [24i64, 48, 72].into_iter().enumerate() {
                tiempo.push(hours);
                viab.push((base - k as f64 * rng.gauss(4.0, 1.5)).clamp(0.0, 100.0));
                muestra.push(sample.to_string());
                celula.push(cell.to_string());
                sd.push(rng.gauss(3.0, 0.8).abs());
            }
        }
    }
    Frame::default()
        .int(TIEMPO, tiempo)
        .float(VIABILIDAD, viab)
        .text(MUESTRA, muestra)
        .text(CELULA, celula)
        .float(SD, sd)
}

fn shape(rng: &mut SimpleRng) -> Frame {
    let (mut biotinta, mut fecha, mut pr, mut conf, mut colapso) =
        (vec![], vec![], vec![], vec![], vec![]);
    for day in 0..12 {
        let ink = rng.pick(&BIOTINTAS);
        biotinta.push(ink.to_string());
        fecha.push(date(day * 3));
        pr.push(rng.gauss(0.97, 0.05));
        conf.push(rng.gauss(88.0, 5.0));
        colapso.push(rng.gauss(12.0, 4.0).abs());
    }
    Frame::default()
        .text(BIOTINTA, biotinta)
        .date(FECHA, fecha)
        .float(PR, pr)
        .float(CONFORMACION, conf)
        .float(COLAPSO, colapso)
}

fn print_parameters(rng: &mut SimpleRng) -> Frame {
    let (mut biotinta, mut geometria, mut fecha, mut punta, mut presion, mut velocidad) =
        (vec![], vec![], vec![], vec![], vec![], vec![]);
    for ink in BIOTINTAS {
        for geometry in GEOMETRIAS {
            for run in 0..4 {
                biotinta.push(ink.to_string());
                geometria.push(geometry.to_string());
                fecha.push(date(run * 7 + (rng.next_u64() % 3) as i64));
                punta.push([22.0, 25.0, 27.0][(rng.next_u64() % 3) as usize]);
                presion.push(rng.gauss(85.0, 12.0));
                velocidad.push(rng.gauss(8.0, 1.5).abs());
            }
        }
    }
    Frame::default()
        .text(BIOTINTA, biotinta)
        .text(GEOMETRIA, geometria)
        .date(FECHA, fecha)
        .float(PUNTA, punta)
        .float(PRESION, presion)
        .float(VELOCIDAD, velocidad)
}

fn rheology(rng: &mut SimpleRng) -> Frame {
    let means = [120.0, 45.0, 80.0, 0.06, 1.2];
    let mut frame =
        Frame::default().text(MUESTRA, MUESTRAS.iter().map(|s| s.to_string()).collect());
    for (var, mean) in RHEOLOGY_VARIABLES.iter().zip(means) {
        let values = MUESTRAS.iter().map(|_| rng.gauss(mean, mean * 0.15).abs()).collect();
        let deviations = MUESTRAS
            .iter()
            .map(|_| rng.gauss(mean * 0.08, mean * 0.02).abs())
            .collect();
        frame = frame.float(var.value, values).float(var.deviation, deviations);
    }
    frame
}

fn curve_fits(rng: &mut SimpleRng) -> Frame {
    let (mut muestra, mut fecha, mut ncero, mut ninf) = (vec![], vec![], vec![], vec![]);
    for sample in MUESTRAS {
        for week in 0..5 {
            muestra.push(sample.to_string());
            fecha.push(date(week * 7));
            ncero.push(rng.gauss(350.0, 60.0).abs());
            ninf.push(rng.gauss(0.8, 0.2).abs());
        }
    }
    Frame::default()
        .text(MUESTRA, muestra)
        .date(FECHA, fecha)
        .float(NCERO, ncero)
        .float(NINF, ninf)
}

fn main() -> Result<()> {
    env_logger::init();
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));
    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let frames = [
        (DataSource::Viability, viability(&mut rng)),
        (DataSource::Shape, shape(&mut rng)),
        (DataSource::PrintParameters, print_parameters(&mut rng)),
        (DataSource::Rheology, rheology(&mut rng)),
        (DataSource::CurveFits, curve_fits(&mut rng)),
    ];

    let mut files = BTreeMap::new();
    for (source, frame) in frames {
        let name = format!("{}.parquet", source.to_string().replace(' ', "_"));
        let rows = frame.write(&out_dir.join(&name))?;
        println!("Wrote {rows} {source} rows to {name}");
        files.insert(source, name);
    }

    let config = DashboardConfig {
        data_dir: PathBuf::from("."),
        files,
        last_updated: Some(chrono::Local::now().format("%d/%m/%Y").to_string()),
    };
    let config_path = out_dir.join(DEFAULT_CONFIG_FILE);
    std::fs::write(&config_path, serde_json::to_string_pretty(&config)?)
        .with_context(|| format!("writing {}", config_path.display()))?;
    println!("Run with: bioink-dash --config {}", config_path.display());
    Ok(())
}
