//! Print parameters: one geometry at a time, one line per biotinta.

use super::{
    Page, PageView, Placement, Section, SectionBody, Selections, Sources, date_range, multi_select,
    single_select,
};
use crate::chart::{ChartOptions, Encoding, line_chart};
use crate::data::filter::{filter_by_categories, filter_equals, normalize_date_column};
use crate::data::source::columns::{BIOTINTA, FECHA, GEOMETRIA, PRESION, PUNTA, VELOCIDAD};
use crate::data::source::DataSource;
use crate::error::PipelineError;

pub const BIOTINTA_FILTER: &str = "print.biotinta";
pub const GEOMETRY_CHOICE: &str = "print.geometria";
pub const DATE_FILTER: &str = "print.fecha";

/// Parameters plotted against date, each in its own chart.
pub const PARAMETERS: [&str; 3] = [PUNTA, PRESION, VELOCIDAD];

pub fn build(sources: &Sources, selections: &Selections) -> PageView {
    let mut view = PageView::new(Page::PrintParameters);
    view.push(Section::plain(SectionBody::Note(
        "Se empleó NCV o NCB al 1 %".to_string(),
    )));

    let table = match sources.get(DataSource::PrintParameters) {
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

    let filtered = match filter_by_categories(table, BIOTINTA, &selected) {
        Ok(t) => t,
        Err(e) => {
            view.push(Section::from_result(None, Err(e)));
            return view;
        }
    };

    // Geometry options only list what survives the biotinta filter.
    let geometries = filtered.distinct_values(GEOMETRIA).unwrap_or_default();
    if geometries.is_empty() {
        view.push(Section::from_result(
            None,
            Err(PipelineError::EmptySelection {
                column: GEOMETRIA.to_string(),
            }),
        ));
        return view;
    }
    let (control, geometry) = single_select(
        selections,
        GEOMETRY_CHOICE,
        "Seleccionar Geometría",
        Placement::Inline,
        geometries,
    );
    view.push(Section::plain(SectionBody::Control(control)));

    let Some(geometry) = geometry else {
        return view;
    };
    let by_date = filter_equals(&filtered, GEOMETRIA, &geometry)
        .and_then(|t| normalize_date_column(&t, FECHA));
    let by_date = match by_date {
        Ok(t) => t,
        Err(_) if !filtered.has_column(FECHA) => {
            view.push(Section::plain(SectionBody::Warning(format!(
                "No se encontró la columna '{FECHA}' en los datos."
            ))));
            return view;
        }
        Err(e) => {
            view.push(Section::from_result(None, Err(e)));
            return view;
        }
    };
    let by_date = match date_range(selections, DATE_FILTER, "Rango de fechas", &by_date, FECHA) {
        Ok((control, t)) => {
            view.sidebar.push(control);
            t
        }
        Err(e) => {
            view.push(Section::from_result(None, Err(e)));
            return view;
        }
    };

    for parameter in PARAMETERS {
        if !by_date.has_column(parameter) {
            view.push(Section::plain(SectionBody::Warning(format!(
                "No se encontró la columna '{parameter}'"
            ))));
            continue;
        }
        let opts = ChartOptions::titled(format!("{parameter} vs Fecha"))
            .labels(FECHA, parameter)
            .legend(BIOTINTA);
        let chart = line_chart(&by_date, &Encoding::new(FECHA, parameter).color(BIOTINTA), &opts);
        view.push(Section::from_result(None, chart.map(SectionBody::Chart)));
    }

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Table, Value};
    use crate::pages::Choice;

    fn sources(with_velocity: bool) -> Sources {
        let mut cols = vec![
            ("Biotinta", vec!["NCB".into(), "NCV".into(), "NCB".into(), "NCV".into()]),
            ("Geometría", vec!["Rejilla".into(), "Rejilla".into(), "Cruz".into(), Value::Null]),
            (
                "Fecha",
                vec![
                    "2025-02-01".into(),
                    "2025-01-10".into(),
                    "2025-01-05".into(),
                    "x".into(),
                ],
            ),
            ("Punta (G)", vec![22i64.into(), 25i64.into(), 22i64.into(), 27i64.into()]),
            ("Presión (kPa)", vec![80.0.into(), 95.0.into(), 70.0.into(), 60.0.into()]),
        ];
        if with_velocity {
            cols.push(("Velocidad (mm/s)", vec![8.0.into(), 10.0.into(), 6.0.into(), 5.0.into()]));
        }
        let mut s = Sources::default();
        s.insert(DataSource::PrintParameters, Table::from_columns(cols).unwrap());
        s
    }

    #[test]
    fn one_chart_per_parameter_for_first_geometry() {
        let view = build(&sources(true), &Selections::new());
        let charts: Vec<_> = view.charts().collect();
        assert_eq!(charts.len(), 3);
        // Rejilla: NCB and NCV, one point each.
        assert_eq!(charts[0].panels[0].series.len(), 2);
        assert_eq!(charts[0].point_count(), 2);
    }

    #[test]
    fn missing_parameter_only_warns_for_that_chart() {
        let view = build(&sources(false), &Selections::new());
        assert_eq!(view.charts().count(), 2);
        assert!(view.sections.iter().any(|s| matches!(
            &s.body,
            Ok(SectionBody::Warning(w)) if w.contains("Velocidad")
        )));
    }

    #[test]
    fn geometry_choice_narrows_rows() {
        let mut sel = Selections::new();
        sel.insert(GEOMETRY_CHOICE.into(), Choice::One("Cruz".into()));
        let view = build(&sources(true), &sel);
        let chart = view.charts().next().unwrap();
        assert_eq!(chart.point_count(), 1);
        assert_eq!(chart.panels[0].series[0].name, "NCB");
    }

    #[test]
    fn no_biotinta_selected_means_no_geometry() {
        let mut sel = Selections::new();
        sel.insert(BIOTINTA_FILTER.into(), Choice::Many(Default::default()));
        let view = build(&sources(true), &sel);
        assert_eq!(view.charts().count(), 0);
        let last = &view.sections.last().unwrap().body;
        assert!(matches!(last, Err(msg) if msg.contains("Geometría")));
    }
}
