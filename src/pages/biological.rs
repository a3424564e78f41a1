//! Cell viability over time, faceted by cell type.

use super::{Page, PageView, Placement, Section, SectionBody, Selections, Sources, multi_select};
use crate::chart::{ChartOptions, Encoding, line_chart};
use crate::data::filter::filter_by_categories;
use crate::data::model::Value;
use crate::data::source::columns::{CELULA, MUESTRA, SD, TIEMPO, VIABILIDAD};
use crate::data::source::DataSource;

pub const MUESTRA_FILTER: &str = "biological.muestra";

/// Sampling times in hours; also the fixed x ticks.
pub const TIME_POINTS: [i64; 3] = [24, 48, 72];

pub fn build(sources: &Sources, selections: &Selections) -> PageView {
    let mut view = PageView::new(Page::Biological);
    view.push(Section::plain(SectionBody::Note(
        "Se empleó reticulante TPP al 1 %".to_string(),
    )));

    let table = match sources.get(DataSource::Viability) {
        Ok(t) => t,
        Err(e) => {
            view.push(Section::from_result(None, Err(e)));
            return view;
        }
    };

    let muestras = table.distinct_values(MUESTRA).unwrap_or_default();
    let (control, selected) = multi_select(
        selections,
        MUESTRA_FILTER,
        "Seleccionar Muestra(s)",
        Placement::Sidebar,
        muestras,
    );
    view.sidebar.push(control);
    let filtered = match filter_by_categories(table, MUESTRA, &selected) {
        Ok(t) => t,
        Err(e) => {
            view.push(Section::from_result(None, Err(e)));
            return view;
        }
    };

    let mut enc = Encoding::new(TIEMPO, VIABILIDAD).color(MUESTRA).facet(CELULA);
    if filtered.has_column(SD) {
        enc = enc.error_y(SD);
    }
    let opts = ChartOptions::titled("Viabilidad celular en función del tiempo")
        .labels("Tiempo (h)", "Viabilidad celular (%)")
        .legend("Muestra")
        .x_order(TIME_POINTS.iter().map(|&t| Value::Integer(t)).collect())
        .x_ticks(TIME_POINTS.iter().map(|&t| t as f64).collect())
        .y_range(0.0, 110.0)
        .y_suffix(" %");
    let chart = line_chart(&filtered, &enc, &opts);
    view.push(Section::from_result(None, chart.map(SectionBody::Chart)));

    view.push(Section::new(Some("Ver Tabla Resumen"), SectionBody::Table(filtered)));
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::XValue;
    use crate::data::model::Table;
    use crate::pages::Choice;

    fn sources() -> Sources {
        let table = Table::from_columns(vec![
            ("Tiempo", vec![72i64.into(), 24i64.into(), 48i64.into(), 24i64.into()]),
            ("Viabilidad", vec![80.0.into(), 95.0.into(), 88.0.into(), 70.0.into()]),
            ("Muestra", vec!["NCB".into(), "NCB".into(), "NCB".into(), "Control".into()]),
            ("Celula", vec!["HaCaT".into(), "HaCaT".into(), "HaCaT".into(), "L929".into()]),
            ("SD", vec![4.0.into(), 2.0.into(), 3.0.into(), 6.0.into()]),
        ])
        .unwrap();
        let mut s = Sources::default();
        s.insert(DataSource::Viability, table);
        s
    }

    #[test]
    fn fixed_axes_and_time_order() {
        let view = build(&sources(), &Selections::new());
        let chart = view.charts().next().unwrap();
        assert_eq!(chart.y_axis.range, Some((0.0, 110.0)));
        assert_eq!(chart.x_axis.ticks, Some(vec![24.0, 48.0, 72.0]));
        assert_eq!(chart.panels.len(), 2);
        assert_eq!(chart.panels[0].title.as_deref(), Some("HaCaT"));
        let xs: Vec<_> = chart.panels[0].series[0].points.iter().map(|p| p.x.clone()).collect();
        assert_eq!(xs, vec![XValue::Number(24.0), XValue::Number(48.0), XValue::Number(72.0)]);
    }

    #[test]
    fn empty_selection_renders_empty_chart() {
        let mut sel = Selections::new();
        sel.insert(MUESTRA_FILTER.into(), Choice::Many(Default::default()));
        let view = build(&sources(), &sel);
        assert_eq!(view.failures().count(), 0);
        assert!(view.charts().next().unwrap().is_empty());
    }
}
