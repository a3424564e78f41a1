//! Shape fidelity over time, one line per biotinta.

use super::{
    Page, PageView, Placement, Section, SectionBody, Selections, Sources, date_range, multi_select,
};
use crate::chart::{ChartOptions, Encoding, ReferenceLine, line_chart};
use crate::color::Rgb;
use crate::data::filter::{filter_by_categories, normalize_date_column};
use crate::data::model::Table;
use crate::data::source::columns::{BIOTINTA, COLAPSO, CONFORMACION, FECHA, PR};
use crate::data::source::DataSource;
use crate::error::PipelineResult;

pub const BIOTINTA_FILTER: &str = "shape.biotinta";
pub const DATE_FILTER: &str = "shape.fecha";

pub fn build(sources: &Sources, selections: &Selections) -> PageView {
    let mut view = PageView::new(Page::ShapeParameters);
    view.push(Section::plain(SectionBody::Note(
        "Se empleó NCV o NCB al 1 %".to_string(),
    )));
    view.push(Section::plain(SectionBody::Info {
        title: "Información sobre las Variables".to_string(),
        lines: vec![
            "Pr: índice de imprimibilidad. Pr < 1: poros demasiado circulares. \
             Pr = 1: poros cuadrados. Pr > 1: poros irregulares."
                .to_string(),
            "Conformación: nivel de fidelidad entre la plantilla y el constructo.".to_string(),
            "Colapso de Filamento (°): ángulo de deflexión del filamento entre dos \
             puntos de soporte."
                .to_string(),
        ],
    }));

    let table = match sources.get(DataSource::Shape) {
        Ok(t) => t,
        Err(e) => {
            view.push(Section::from_result(None, Err(e)));
            return view;
        }
    };

    let biotintas = table.distinct_values(BIOTINTA).unwrap_or_default();
    let (control, selected) = multi_select(
        selections,
        BIOTINTA_FILTER,
        "Seleccionar Biotinta(s)",
        Placement::Sidebar,
        biotintas,
    );
    view.sidebar.push(control);

    let prepared: PipelineResult<Table> = filter_by_categories(table, BIOTINTA, &selected)
        .and_then(|t| normalize_date_column(&t, FECHA))
        .and_then(|t| {
            let (control, t) = date_range(selections, DATE_FILTER, "Rango de fechas", &t, FECHA)?;
            view.sidebar.push(control);
            Ok(t)
        });
    let filtered = match prepared {
        Ok(t) => t,
        Err(e) => {
            view.push(Section::from_result(None, Err(e)));
            return view;
        }
    };

    let charts = [
        (PR, "Pr vs Fecha", Some(ReferenceLine::dashed(1.0, Rgb::RED))),
        (CONFORMACION, "Conformación vs Fecha", None),
        (COLAPSO, "Colapso del filamento (°) vs Fecha", None),
    ];
    for (column, title, reference) in charts {
        let mut opts = ChartOptions::titled(title).labels(FECHA, column).legend(BIOTINTA);
        if let Some(line) = reference {
            opts = opts.reference_line(line);
        }
        let chart = line_chart(&filtered, &Encoding::new(FECHA, column).color(BIOTINTA), &opts);
        view.push(Section::from_result(None, chart.map(SectionBody::Chart)));
    }

    view.push(Section::new(Some("Ver Tabla Resumen"), SectionBody::Table(filtered)));
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;
    use crate::pages::Choice;

    fn sources() -> Sources {
        let table = Table::from_columns(vec![
            ("Biotinta", vec!["NCB".into(), "NCV".into(), "NCB".into()]),
            ("Fecha", vec!["2025-03-01".into(), "2025-02-01".into(), "2025-01-01".into()]),
            ("Pr", vec![1.02.into(), 0.95.into(), 1.1.into()]),
            ("Conformación", vec![0.9.into(), 0.8.into(), 0.85.into()]),
        ])
        .unwrap();
        let mut s = Sources::default();
        s.insert(DataSource::Shape, table);
        s
    }

    #[test]
    fn missing_collapse_column_fails_alone() {
        let view = build(&sources(), &Selections::new());
        assert_eq!(view.charts().count(), 2);
        assert_eq!(view.failures().count(), 1);
        assert!(view.failures().next().unwrap().contains("Colapso"));
    }

    #[test]
    fn pr_chart_has_reference_line() {
        let view = build(&sources(), &Selections::new());
        let pr = view.charts().next().unwrap();
        assert_eq!(pr.reference_lines[0].y, 1.0);
    }

    #[test]
    fn table_is_sorted_by_date() {
        let view = build(&sources(), &Selections::new());
        let Some(Ok(SectionBody::Table(t))) = view.sections.last().map(|s| &s.body) else {
            panic!("expected summary table");
        };
        let prs: Vec<_> = t.rows().map(|r| r.get("Pr").cloned().unwrap()).collect();
        assert_eq!(prs, vec![Value::Float(1.1), Value::Float(0.95), Value::Float(1.02)]);
    }

    #[test]
    fn filtering_by_biotinta() {
        let mut sel = Selections::new();
        sel.insert(BIOTINTA_FILTER.into(), Choice::Many([Value::from("NCV")].into()));
        let view = build(&sources(), &sel);
        assert_eq!(view.charts().next().unwrap().point_count(), 1);
    }
}
