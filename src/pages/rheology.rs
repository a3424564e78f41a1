//! Rheology: metric tiles, per-sample means, correlations, deviations and the
//! Carreau–Yasuda fit parameters.

use super::{
    Page, PageView, Placement, Section, SectionBody, Selections, Sources, multi_select,
    single_select,
};
use crate::chart::{
    ChartOptions, Encoding, Mark, bar_chart, grouped_bar_chart, heatmap, scatter_chart,
};
use crate::color::ColorScale;
use crate::data::filter::{filter_by_categories, normalize_date_column};
use crate::data::model::{Table, Value};
use crate::data::source::columns::{FECHA, MUESTRA, NCERO, NINF};
use crate::data::source::{DataSource, NumericVariable, RHEOLOGY_VARIABLES};
use crate::error::PipelineError;
use crate::stats::{correlation_matrix, metric_tiles};

pub const MUESTRA_FILTER: &str = "rheology.muestra";
pub const MEANS_VARIABLE: &str = "rheology.means_variable";
pub const DEVIATION_VARIABLE: &str = "rheology.deviation_variable";
pub const FIT_MUESTRA_FILTER: &str = "rheology.fit_muestra";

fn variable_options() -> Vec<Value> {
    RHEOLOGY_VARIABLES.iter().map(|v| Value::from(v.value)).collect()
}

fn variable_named(choice: Option<Value>) -> NumericVariable {
    choice
        .and_then(|v| {
            RHEOLOGY_VARIABLES
                .iter()
                .find(|var| Value::from(var.value) == v)
                .copied()
        })
        .unwrap_or(RHEOLOGY_VARIABLES[0])
}

pub fn build(sources: &Sources, selections: &Selections) -> PageView {
    let mut view = PageView::new(Page::Rheology);
    view.push(Section::plain(SectionBody::Info {
        title: "Información sobre las Variables".to_string(),
        lines: vec![
            "Yield Stress (Pa): esfuerzo cortante mínimo que un material debe superar \
             para empezar a fluir."
                .to_string(),
            "Cross Point (%): transición del comportamiento similar a un sólido al \
             similar a un líquido."
                .to_string(),
            "Recovery (%): capacidad del material para recuperar su forma original.".to_string(),
            "Average Filamente Diameter (cm): espesor promedio de los filamentos.".to_string(),
            "Expansion Ratio (cm): cambio de tamaño del radio de los filamentos.".to_string(),
            "Cada variable incluye su Desviación Estándar (SD) para medir la \
             variabilidad de los resultados."
                .to_string(),
        ],
    }));

    match sources.get(DataSource::Rheology) {
        Ok(table) => measurements(&mut view, table, selections),
        Err(e) => view.push(Section::from_result(None, Err(e))),
    }
    curve_fits(&mut view, sources, selections);
    view
}

fn measurements(view: &mut PageView, table: &Table, selections: &Selections) {
    let muestras = table.distinct_values(MUESTRA).unwrap_or_default();
    let (control, selected) = multi_select(
        selections,
        MUESTRA_FILTER,
        "Seleccionar Biotinta(s)",
        Placement::Sidebar,
        muestras,
    );
    view.sidebar.push(control);
    let filtered = match filter_by_categories(table, MUESTRA, &selected) {
        Ok(t) => t,
        Err(e) => {
            view.push(Section::from_result(None, Err(e)));
            return;
        }
    };

    view.push(Section::new(
        Some("Resumen Estadístico General"),
        SectionBody::Metrics(metric_tiles(&filtered, &RHEOLOGY_VARIABLES)),
    ));

    // -- means with per-row error bars --
    let (control, choice) = single_select(
        selections,
        MEANS_VARIABLE,
        "Selecciona variable para gráfico de medias:",
        Placement::Inline,
        variable_options(),
    );
    view.push(Section::new(Some("Medias de Variables"), SectionBody::Control(control)));
    let var = variable_named(choice);
    let opts = ChartOptions::titled(var.value)
        .labels(MUESTRA, var.value)
        .mark(Mark::Markers)
        .height(500.0);
    let enc = Encoding::new(MUESTRA, var.value).error_y(var.deviation);
    let chart = scatter_chart(&filtered, &enc, &opts);
    view.push(Section::from_result(None, chart.map(SectionBody::Chart)));

    // -- correlation --
    let names: Vec<&str> = RHEOLOGY_VARIABLES.iter().map(|v| v.value).collect();
    let matrix = correlation_matrix(&filtered, &names).map(|m| {
        SectionBody::Chart(heatmap(
            &m,
            "Correlación",
            &ChartOptions::titled("Matriz de Correlación entre Variables").height(500.0),
        ))
    });
    view.push(Section::from_result(Some("Correlación entre Variables"), matrix));

    // -- one variable's deviations --
    let (control, choice) = single_select(
        selections,
        DEVIATION_VARIABLE,
        "Selecciona variable para análisis de desviaciones:",
        Placement::Inline,
        variable_options(),
    );
    view.push(Section::new(Some("Análisis de Desviaciones"), SectionBody::Control(control)));
    let var = variable_named(choice);
    let opts = ChartOptions::titled(format!("Desviaciones para {}", var.value))
        .labels(MUESTRA, "Desviación")
        .height(400.0);
    let chart = bar_chart(
        &filtered,
        MUESTRA,
        var.deviation,
        Some((ColorScale::reds(), "Desviación")),
        &opts,
    );
    view.push(Section::from_result(None, chart.map(SectionBody::Chart)));

    // -- every deviation side by side --
    let usable: Vec<(&str, &str)> = RHEOLOGY_VARIABLES
        .iter()
        .filter(|v| filtered.has_column(v.deviation))
        .map(|v| (v.value, v.deviation))
        .collect();
    let opts = ChartOptions::titled("Comparativa de Desviaciones por Variable")
        .labels(MUESTRA, "Desviación")
        .height(450.0);
    let chart = if usable.is_empty() {
        Err(PipelineError::missing_column(RHEOLOGY_VARIABLES[0].deviation, "deviation comparison"))
    } else {
        grouped_bar_chart(&filtered, MUESTRA, &usable, &opts)
    };
    view.push(Section::from_result(
        Some("Comparativa de Todas las Desviaciones"),
        chart.map(SectionBody::Chart),
    ));

    view.push(Section::new(Some("Ver Tabla Resumen"), SectionBody::Table(filtered)));
}

fn curve_fits(view: &mut PageView, sources: &Sources, selections: &Selections) {
    view.push(Section::new(
        Some("Modelo Reológico de Carreau-Yasuda"),
        SectionBody::Info {
            title: "Información del Modelo".to_string(),
            lines: vec![
                "(η − η∞) / (η₀ − η∞) = [1 + (k·γ̇)^a]^((n − 1) / a)".to_string(),
                "η: viscosidad aparente a una tasa de corte considerada.".to_string(),
                "η₀: viscosidad a tasa de corte cero (meseta Newtoniana inferior).".to_string(),
                "η∞: viscosidad a tasa de corte infinita (meseta Newtoniana superior)."
                    .to_string(),
                "k: tiempo característico [s]; γ̇: tasa de corte [s⁻¹].".to_string(),
                "n: índice de la ley de potencia (0 < n ≤ 1); a: parámetro de transición."
                    .to_string(),
            ],
        },
    ));

    let fits = sources
        .get(DataSource::CurveFits)
        .and_then(|t| normalize_date_column(t, FECHA));
    let fits = match fits {
        Ok(t) => t,
        Err(e) => {
            view.push(Section::from_result(None, Err(e)));
            return;
        }
    };

    let muestras: Vec<Value> = fits
        .sorted_distinct_values(MUESTRA)
        .map(|s| s.into_iter().collect())
        .unwrap_or_default();
    let (control, selected) = multi_select(
        selections,
        FIT_MUESTRA_FILTER,
        "Seleccionar Biotinta(s)",
        Placement::Inline,
        muestras,
    );
    view.push(Section::plain(SectionBody::Control(control)));
    let filtered = match filter_by_categories(&fits, MUESTRA, &selected) {
        Ok(t) => t,
        Err(e) => {
            view.push(Section::from_result(None, Err(e)));
            return;
        }
    };

    for (column, title, label) in [
        (NCERO, "η₀ vs Fecha", "η₀ (Pa·s)"),
        (NINF, "η∞ vs Fecha", "η∞ (Pa·s)"),
    ] {
        let opts = ChartOptions::titled(title)
            .labels(FECHA, label)
            .legend(MUESTRA)
            .mark(Mark::LinesAndMarkers);
        let chart = scatter_chart(&filtered, &Encoding::new(FECHA, column).color(MUESTRA), &opts);
        view.push(Section::from_result(None, chart.map(SectionBody::Chart)));
    }

    view.push(Section::new(Some("Otras variables del modelo"), SectionBody::Table(filtered)));
}
