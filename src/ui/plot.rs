use std::ops::RangeInclusive;

use bioink_dash::chart::{
    ChartKind, ChartSpec, ColorBar, Heatmap, Mark, Panel, XAxisKind, XValue, category_label,
};
use bioink_dash::color::Rgb;
use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, Color32, RichText, Sense, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, GridInput, GridMark, HLine, Legend, Line, LineStyle, Plot, PlotPoint, PlotPoints,
    PlotUi, Points, Polygon, Text, uniform_grid_spacer,
};

pub fn color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

// ---------------------------------------------------------------------------
// Chart (central panel)
// ---------------------------------------------------------------------------

/// Render one prepared chart. `id` must be unique within the page.
pub fn chart(ui: &mut Ui, spec: &ChartSpec, id: &str) {
    if !spec.title.is_empty() {
        ui.label(RichText::new(&spec.title).strong());
    }
    if spec.is_empty() {
        ui.label("No hay datos para los filtros seleccionados.");
        return;
    }

    if let Some(heatmap) = &spec.heatmap {
        heatmap_plot(ui, spec, heatmap, id);
    } else if spec.is_faceted() {
        let n = spec.panels.len();
        ui.columns(n, |cols: &mut [Ui]| {
            for (i, (ui, panel)) in cols.iter_mut().zip(&spec.panels).enumerate() {
                if let Some(title) = &panel.title {
                    ui.vertical_centered(|ui: &mut Ui| ui.label(title));
                }
                xy_plot(ui, spec, panel, &format!("{id}.{i}"), Some(id));
            }
        });
    } else if let Some(panel) = spec.panels.first() {
        xy_plot(ui, spec, panel, id, None);
    }

    if let Some(bar) = &spec.color_bar {
        color_bar(ui, bar);
    }
    if let Some(title) = &spec.legend_title {
        ui.label(RichText::new(format!("Leyenda: {title}")).small().weak());
    }
}

// ---------------------------------------------------------------------------
// x/y charts
// ---------------------------------------------------------------------------

/// Map an x value onto the plot's numeric axis.
fn x_coord(x: &XValue, kind: &XAxisKind) -> Option<f64> {
    match (x, kind) {
        (XValue::Number(n), XAxisKind::Numeric) => Some(*n),
        (XValue::Date(d), XAxisKind::Date) => Some(d.num_days_from_ce() as f64),
        (other, XAxisKind::Categorical(labels)) => {
            let label = category_label(other);
            labels.iter().position(|l| *l == label).map(|i| i as f64)
        }
        _ => None,
    }
}

fn xy_plot(ui: &mut Ui, spec: &ChartSpec, panel: &Panel, id: &str, link_group: Option<&str>) {
    let mut plot = Plot::new(id)
        .height(spec.height)
        .legend(Legend::default())
        .x_axis_label(spec.x_axis.label.clone())
        .y_axis_label(spec.y_axis.label.clone())
        .allow_scroll(false);

    if let Some(group) = link_group {
        plot = plot.link_axis(format!("{group}.axes"), [false, true]);
    }
    if let Some((lo, hi)) = spec.y_axis.range {
        plot = plot.include_y(lo).include_y(hi);
    }
    if spec.kind == ChartKind::Bar || spec.kind == ChartKind::GroupedBar {
        plot = plot.include_y(0.0);
    }

    plot = match &spec.x_kind {
        XAxisKind::Date => plot.x_axis_formatter(|mark: GridMark, _: &RangeInclusive<f64>| {
            NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        }),
        XAxisKind::Categorical(labels) => {
            let labels = labels.clone();
            plot.x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
                .x_axis_formatter(move |mark: GridMark, _: &RangeInclusive<f64>| {
                    category_at(&labels, mark.value).unwrap_or_default()
                })
                .include_x(-0.5)
                .include_x(labels_len(&spec.x_kind) as f64 - 0.5)
        }
        XAxisKind::Numeric => match &spec.x_axis.ticks {
            Some(ticks) => {
                let ticks = ticks.clone();
                plot.x_grid_spacer(move |_: GridInput| fixed_marks(&ticks))
            }
            None => plot,
        },
    };

    if let Some(suffix) = spec.y_axis.tick_suffix.clone() {
        plot = plot.y_axis_formatter(move |mark: GridMark, _: &RangeInclusive<f64>| {
            format!("{}{suffix}", format_tick(mark.value, mark.step_size))
        });
    }

    let bar_count = panel.series.iter().filter(|s| s.mark == Mark::Bars).count();
    plot.show(ui, |plot_ui: &mut PlotUi| {
        let mut bar_slot = 0;
        for series in &panel.series {
            let color = color32(series.color);
            let coords: Vec<([f64; 2], Option<f64>, Option<Rgb>)> = series
                .points
                .iter()
                .filter_map(|p| Some(([x_coord(&p.x, &spec.x_kind)?, p.y], p.error, p.color)))
                .collect();

            match series.mark {
                Mark::Bars => {
                    let width = 0.8 / bar_count.max(1) as f64;
                    let offset = (bar_slot as f64 - (bar_count as f64 - 1.0) / 2.0) * width;
                    bar_slot += 1;
                    let bars: Vec<Bar> = coords
                        .iter()
                        .map(|([x, y], _, fill)| {
                            Bar::new(x + offset, *y)
                                .width(width * 0.95)
                                .fill(fill.map_or(color, color32))
                        })
                        .collect();
                    plot_ui.bar_chart(BarChart::new(bars).name(&series.name).color(color));
                }
                Mark::Lines | Mark::LinesAndMarkers => {
                    let line: PlotPoints = coords.iter().map(|(xy, _, _)| *xy).collect();
                    plot_ui.line(Line::new(line).name(&series.name).color(color).width(2.0));
                    if series.mark == Mark::LinesAndMarkers {
                        let pts: PlotPoints = coords.iter().map(|(xy, _, _)| *xy).collect();
                        plot_ui.points(Points::new(pts).radius(3.5).color(color));
                    }
                }
                Mark::Markers => {
                    let pts: PlotPoints = coords.iter().map(|(xy, _, _)| *xy).collect();
                    plot_ui.points(Points::new(pts).radius(5.0).color(color).name(&series.name));
                }
            }

            // Error bars, unnamed so they stay out of the legend.
            for ([x, y], error, _) in &coords {
                if let Some(e) = error.filter(|e| *e > 0.0) {
                    plot_ui.line(Line::new(vec![[*x, y - e], [*x, y + e]]).color(color).width(1.0));
                }
            }
        }

        for reference in &spec.reference_lines {
            let mut line = HLine::new(reference.y).color(color32(reference.color)).width(1.5);
            if reference.dashed {
                line = line.style(LineStyle::dashed_loose());
            }
            plot_ui.hline(line);
        }
    });
}

fn labels_len(kind: &XAxisKind) -> usize {
    match kind {
        XAxisKind::Categorical(labels) => labels.len(),
        _ => 0,
    }
}

/// Label of the category sitting exactly at `value`, if any.
fn category_at(labels: &[String], value: f64) -> Option<String> {
    if (value - value.round()).abs() > 1e-6 || value < 0.0 {
        return None;
    }
    labels.get(value.round() as usize).cloned()
}

fn fixed_marks(ticks: &[f64]) -> Vec<GridMark> {
    let step = ticks
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(f64::INFINITY, f64::min);
    let step_size = if step.is_finite() && step > 0.0 { step } else { 1.0 };
    ticks.iter().map(|&value| GridMark { value, step_size }).collect()
}

/// Tick text with as many decimals as the grid step needs.
fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step > 0.0 && step < 1.0 {
        (-step.log10()).ceil() as usize
    } else {
        0
    };
    format!("{value:.decimals$}")
}

// ---------------------------------------------------------------------------
// Heatmap
// ---------------------------------------------------------------------------

fn heatmap_plot(ui: &mut Ui, spec: &ChartSpec, heatmap: &Heatmap, id: &str) {
    let n = heatmap.labels.len();
    let x_labels = heatmap.labels.clone();
    let y_labels = heatmap.labels.clone();

    Plot::new(id)
        .height(spec.height)
        .data_aspect(1.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_grid(false)
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .y_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .x_axis_formatter(move |mark: GridMark, _: &RangeInclusive<f64>| {
            category_at(&x_labels, mark.value).unwrap_or_default()
        })
        // First label on top.
        .y_axis_formatter(move |mark: GridMark, _: &RangeInclusive<f64>| {
            let flipped = n as f64 - 1.0 - mark.value;
            category_at(&y_labels, flipped).unwrap_or_default()
        })
        .show(ui, |plot_ui: &mut PlotUi| {
            for cell in &heatmap.cells {
                let x = cell.col as f64;
                let y = (n - 1 - cell.row) as f64;
                let square: PlotPoints = vec![
                    [x - 0.5, y - 0.5],
                    [x + 0.5, y - 0.5],
                    [x + 0.5, y + 0.5],
                    [x - 0.5, y + 0.5],
                ]
                .into();
                plot_ui.polygon(
                    Polygon::new(square)
                        .fill_color(color32(cell.color))
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );
                let strong = cell.value.is_some_and(|v| v.abs() > 0.5);
                let text_color = if strong { Color32::WHITE } else { Color32::BLACK };
                plot_ui.text(Text::new(
                    PlotPoint::new(x, y),
                    RichText::new(&cell.text).color(text_color),
                ));
            }
        });
}

// ---------------------------------------------------------------------------
// Colour bar
// ---------------------------------------------------------------------------

fn color_bar(ui: &mut Ui, bar: &ColorBar) {
    const STEPS: usize = 64;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(&bar.title).small());
        ui.label(RichText::new(format!("{:.2}", bar.range.0)).small());
        let width = (ui.available_width() - 60.0).clamp(80.0, 320.0);
        let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 12.0), Sense::hover());
        let painter = ui.painter_at(rect);
        let step = rect.width() / STEPS as f32;
        for i in 0..STEPS {
            let t = i as f64 / (STEPS - 1) as f64;
            let left = rect.left() + step * i as f32;
            let cell = egui::Rect::from_min_max(
                egui::pos2(left, rect.top()),
                egui::pos2(left + step + 0.5, rect.bottom()),
            );
            painter.rect_filled(cell, 0.0, color32(bar.scale.at(t)));
        }
        ui.label(RichText::new(format!("{:.2}", bar.range.1)).small());
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_only_label_whole_positions() {
        let labels = vec!["NCB".to_string(), "NCV".to_string()];
        assert_eq!(category_at(&labels, 1.0).as_deref(), Some("NCV"));
        assert_eq!(category_at(&labels, 0.5), None);
        assert_eq!(category_at(&labels, 2.0), None);
        assert_eq!(category_at(&labels, -1.0), None);
    }

    #[test]
    fn tick_decimals_follow_step() {
        assert_eq!(format_tick(20.0, 10.0), "20");
        assert_eq!(format_tick(0.25, 0.05), "0.25");
    }

    #[test]
    fn dates_map_to_day_numbers() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let x = x_coord(&XValue::Date(d), &XAxisKind::Date).unwrap();
        assert_eq!(NaiveDate::from_num_days_from_ce_opt(x as i32), Some(d));
        assert_eq!(x_coord(&XValue::Number(1.0), &XAxisKind::Date), None);
    }
}
