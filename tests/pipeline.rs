use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use bioink_dash::config::DashboardConfig;
use bioink_dash::data::cache::TableCache;
use bioink_dash::data::filter::{filter_by_categories, normalize_date_column};
use bioink_dash::data::model::{Table, Value};
use bioink_dash::data::source::{DataSource, NumericVariable};
use bioink_dash::error::PipelineError;
use bioink_dash::pages::{self, Page, SectionBody, Selections, Sources};
use bioink_dash::stats::{Correlation, correlation_matrix, metric_tiles, summarize};
use chrono::NaiveDate;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

const VIABILITY_CSV: &str = "\
Tiempo,Viabilidad,Muestra,Celula,SD
24,90,A,Fibroblasto,2
48,85,A,Fibroblasto,3
24,70,B,Fibroblasto,5
";

fn config_for(dir: &Path, files: &[(DataSource, &str)]) -> DashboardConfig {
    DashboardConfig {
        data_dir: dir.to_path_buf(),
        files: files.iter().map(|(s, f)| (*s, f.to_string())).collect::<BTreeMap<_, _>>(),
        last_updated: Some("15/03/2024".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Acceptance scenarios
// ---------------------------------------------------------------------------

#[test]
fn filtering_one_sample_keeps_its_rows_and_mean() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "viabilidad.csv", VIABILITY_CSV);
    let mut cache = TableCache::default();
    let table = cache.load(&path).unwrap();

    let selected = BTreeSet::from([Value::from("A")]);
    let only_a = filter_by_categories(&table, "Muestra", &selected).unwrap();
    assert_eq!(only_a.len(), 2);
    let pairs: Vec<(f64, f64)> = only_a
        .rows()
        .map(|r| {
            (
                r.get("Tiempo").and_then(Value::as_f64).unwrap(),
                r.get("Viabilidad").and_then(Value::as_f64).unwrap(),
            )
        })
        .collect();
    assert_eq!(pairs, vec![(24.0, 90.0), (48.0, 85.0)]);

    let summary = summarize(&only_a, &NumericVariable::new("Viabilidad", "SD"))
        .unwrap()
        .unwrap();
    assert_eq!(summary.mean, 87.5);
    assert_eq!(summary.mean_deviation, Some(2.5));
}

#[test]
fn variable_without_deviation_column_gets_no_tile() {
    let table = Table::from_columns(vec![
        ("Yield Stress (Pa)", vec![10.0.into(), 20.0.into()]),
        ("SD1", vec![1.0.into(), 1.0.into()]),
        ("Recovery (%)", vec![80.0.into(), 90.0.into()]),
    ])
    .unwrap();
    let vars = [
        NumericVariable::new("Yield Stress (Pa)", "SD1"),
        NumericVariable::new("Recovery (%)", "SD3"),
    ];

    assert!(matches!(
        summarize(&table, &vars[1]),
        Err(PipelineError::MissingColumn { .. })
    ));
    let tiles = metric_tiles(&table, &vars);
    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].label, "Yield Stress (Pa)");
    assert_eq!(tiles[0].value_text(), "15.00");
}

#[test]
fn constant_column_correlations_are_undefined_except_itself() {
    let table = Table::from_columns(vec![
        ("a", vec![1.0.into(), 2.0.into(), 3.0.into(), 4.0.into()]),
        ("b", vec![2.0.into(), 4.1.into(), 5.9.into(), 8.0.into()]),
        ("k", vec![5.0.into(), 5.0.into(), 5.0.into(), 5.0.into()]),
    ])
    .unwrap();
    let m = correlation_matrix(&table, &["a", "b", "k"]).unwrap();
    for i in 0..3 {
        assert_eq!(m.get(i, 2).value().is_none(), i != 2);
        assert_eq!(m.get(2, i).value().is_none(), i != 2);
    }
    assert_eq!(m.get(2, 2), Correlation::Defined(1.0));
    assert!(m.get(0, 1).value().unwrap() > 0.99);
}

#[test]
fn unparseable_date_is_dropped_and_rest_sorted() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "ajustes.csv",
        "Muestra,Fecha\nA,2024-03-10\nB,2024-01-02\nC,pendiente\nD,2024-02-20\nE,2024-01-15\n",
    );
    let table = TableCache::default().load(&path).unwrap();
    let normalized = normalize_date_column(&table, "Fecha").unwrap();

    assert_eq!(normalized.len(), 4);
    let dates: Vec<NaiveDate> = normalized
        .rows()
        .filter_map(|r| r.get("Fecha").and_then(Value::to_date))
        .collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);
    let samples: Vec<String> = normalized
        .rows()
        .map(|r| r.get("Muestra").unwrap().to_string())
        .collect();
    assert_eq!(samples, vec!["B", "E", "D", "A"]);
}

// ---------------------------------------------------------------------------
// Loading, caching and schema checks
// ---------------------------------------------------------------------------

#[test]
fn cache_serves_old_table_until_invalidated() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "viabilidad.csv", VIABILITY_CSV);
    let mut cache = TableCache::default();
    assert_eq!(cache.load(&path).unwrap().len(), 3);

    fs::write(&path, "Tiempo,Viabilidad,Muestra,Celula\n24,90,A,Fibroblasto\n").unwrap();
    assert_eq!(cache.load(&path).unwrap().len(), 3);

    assert!(cache.invalidate(&path));
    assert_eq!(cache.load(&path).unwrap().len(), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn json_records_load_like_csv() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "reo.json",
        r#"[{"Muestra": "NCB", "Yield Stress (Pa)": 120.5, "SD1": 4},
            {"Muestra": "NCV", "Yield Stress (Pa)": 98.0}]"#,
    );
    let table = TableCache::default().load(&path).unwrap();
    assert_eq!(table.columns(), &["Muestra", "Yield Stress (Pa)", "SD1"]);
    assert_eq!(table.row(1).unwrap().get("SD1"), Some(&Value::Null));
}

#[test]
fn every_missing_required_column_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "viabilidad.csv", "Tiempo,Viabilidad\n24,90\n");
    let err = TableCache::default()
        .load_validated(&path, &DataSource::Viability.schema())
        .unwrap_err();
    match err {
        PipelineError::MissingColumns { columns, .. } => {
            assert_eq!(columns, vec!["Muestra".to_string(), "Celula".to_string()]);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn missing_file_is_source_unavailable() {
    let dir = TempDir::new().unwrap();
    let err = TableCache::default()
        .load_validated(&dir.path().join("nope.xlsx"), &DataSource::Shape.schema())
        .unwrap_err();
    assert!(matches!(err, PipelineError::SourceUnavailable { .. }));
}

// ---------------------------------------------------------------------------
// Pages end to end
// ---------------------------------------------------------------------------

#[test]
fn biological_page_from_disk() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "viabilidad.csv", VIABILITY_CSV);
    let config = config_for(dir.path(), &[(DataSource::Viability, "viabilidad.csv")]);

    let mut cache = TableCache::default();
    let sources = Sources::load(&mut cache, &config, Page::Biological.sources());
    let view = Page::Biological.build(&sources, &Selections::new(), &config);

    assert_eq!(view.failures().count(), 0);
    let chart = view.charts().next().unwrap();
    assert_eq!(chart.y_axis.range, Some((0.0, 110.0)));
    assert_eq!(chart.point_count(), 3);
}

#[test]
fn a_broken_source_only_fails_its_own_page() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "viabilidad.csv", VIABILITY_CSV);
    let config = config_for(dir.path(), &[(DataSource::Viability, "viabilidad.csv")]);

    let mut cache = TableCache::default();
    let sources = Sources::load(&mut cache, &config, Page::ShapeParameters.sources());
    let shape = Page::ShapeParameters.build(&sources, &Selections::new(), &config);
    assert!(shape.failures().count() > 0);

    let home = Page::Home.build(&sources, &Selections::new(), &config);
    assert_eq!(home.failures().count(), 0);
    assert!(home
        .sections
        .iter()
        .any(|s| matches!(&s.body, Ok(SectionBody::Note(n)) if n.contains("15/03/2024"))));
}

#[test]
fn dump_renders_page_as_json() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "viabilidad.csv", VIABILITY_CSV);
    let config = config_for(dir.path(), &[(DataSource::Viability, "viabilidad.csv")]);

    let json = pages::dump(Page::Biological, &config).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["page"], "Biological");
    assert!(json.contains("Viabilidad celular en función del tiempo"));
}

#[test]
fn config_file_resolves_relative_data_dir() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "bioink-dash.json",
        r#"{"data_dir": "lab", "files": {"viability": "viabilidad.csv"}}"#,
    );
    let config = DashboardConfig::from_file(&path).unwrap();
    assert_eq!(
        config.path_for(DataSource::Viability),
        dir.path().join("lab").join("viabilidad.csv")
    );
    assert_eq!(
        config.path_for(DataSource::Rheology),
        dir.path().join("lab").join("reo2.xlsx")
    );
}
