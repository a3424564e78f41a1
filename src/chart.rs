//! Chart preparation: turns a filtered table plus declarative encodings into
//! an immutable [`ChartSpec`] that a rendering surface can draw.
//!
//! Builders are pure: the same table and options always give an equal spec.

use chrono::NaiveDate;
use serde::Serialize;

use crate::color::{ColorMap, ColorScale, Rgb};
use crate::data::model::{Table, Value};
use crate::error::PipelineResult;
use crate::stats::CorrelationMatrix;

// ---------------------------------------------------------------------------
// Spec types
// ---------------------------------------------------------------------------

/// Position of a point along the x axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum XValue {
    Number(f64),
    Date(NaiveDate),
    Category(String),
}

impl XValue {
    fn from_value(value: &Value) -> Option<XValue> {
        match value {
            Value::Null => None,
            Value::Date(d) => Some(XValue::Date(*d)),
            Value::Integer(_) | Value::Float(_) => value.as_f64().map(XValue::Number),
            other => Some(XValue::Category(other.to_string())),
        }
    }
}

/// How the x axis should be laid out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum XAxisKind {
    Numeric,
    Date,
    /// Categories in display order; points are placed at their index.
    Categorical(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: XValue,
    pub y: f64,
    /// Error-bar half-height taken from the same row.
    pub error: Option<f64>,
    /// Per-point colour, used by bars coloured on a continuous scale.
    pub color: Option<Rgb>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mark {
    Lines,
    LinesAndMarkers,
    Markers,
    Bars,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub color: Rgb,
    pub mark: Mark,
    pub points: Vec<Point>,
}

/// One facet. Unfaceted charts have a single untitled panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: Option<String>,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Axis {
    pub label: String,
    pub range: Option<(f64, f64)>,
    pub ticks: Option<Vec<f64>>,
    pub tick_suffix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub y: f64,
    pub color: Rgb,
    pub dashed: bool,
}

impl ReferenceLine {
    pub fn dashed(y: f64, color: Rgb) -> Self {
        ReferenceLine {
            y,
            color,
            dashed: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    Line,
    Scatter,
    Bar,
    GroupedBar,
    Heatmap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub row: usize,
    pub col: usize,
    pub value: Option<f64>,
    pub color: Rgb,
    /// Two-decimal value, or "n/a" when undefined.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub labels: Vec<String>,
    pub cells: Vec<HeatmapCell>,
}

/// Legend for a continuous colour scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub title: String,
    pub scale: ColorScale,
    pub range: (f64, f64),
}

/// Everything a rendering surface needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub x_kind: XAxisKind,
    pub panels: Vec<Panel>,
    pub legend_title: Option<String>,
    pub reference_lines: Vec<ReferenceLine>,
    pub heatmap: Option<Heatmap>,
    pub color_bar: Option<ColorBar>,
    pub height: f32,
}

impl ChartSpec {
    pub fn is_faceted(&self) -> bool {
        self.panels.len() > 1 || self.panels.iter().any(|p| p.title.is_some())
    }

    /// Whether there is nothing to draw (e.g. everything filtered out).
    pub fn is_empty(&self) -> bool {
        self.heatmap.as_ref().map_or(true, |h| h.labels.is_empty())
            && self
                .panels
                .iter()
                .all(|p| p.series.iter().all(|s| s.points.is_empty()))
    }

    pub fn point_count(&self) -> usize {
        self.panels
            .iter()
            .flat_map(|p| &p.series)
            .map(|s| s.points.len())
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Encodings and options
// ---------------------------------------------------------------------------

/// Which columns drive which visual channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Encoding<'a> {
    pub x: &'a str,
    pub y: &'a str,
    pub color: Option<&'a str>,
    pub facet: Option<&'a str>,
    pub error_y: Option<&'a str>,
}

impl<'a> Encoding<'a> {
    pub fn new(x: &'a str, y: &'a str) -> Self {
        Encoding {
            x,
            y,
            color: None,
            facet: None,
            error_y: None,
        }
    }

    pub fn color(mut self, column: &'a str) -> Self {
        self.color = Some(column);
        self
    }

    pub fn facet(mut self, column: &'a str) -> Self {
        self.facet = Some(column);
        self
    }

    pub fn error_y(mut self, column: &'a str) -> Self {
        self.error_y = Some(column);
        self
    }
}

/// Cosmetic settings. Labels default to the column names.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub legend_title: Option<String>,
    pub y_range: Option<(f64, f64)>,
    pub x_ticks: Option<Vec<f64>>,
    pub y_tick_suffix: Option<String>,
    /// Display order of x categories (e.g. `Tiempo` = 24, 48, 72).
    pub x_order: Option<Vec<Value>>,
    pub mark: Option<Mark>,
    pub reference_lines: Vec<ReferenceLine>,
    pub height: f32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_label: None,
            y_label: None,
            legend_title: None,
            y_range: None,
            x_ticks: None,
            y_tick_suffix: None,
            x_order: None,
            mark: None,
            reference_lines: Vec::new(),
            height: 450.0,
        }
    }
}

impl ChartOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = Some(x.into());
        self.y_label = Some(y.into());
        self
    }

    pub fn legend(mut self, title: impl Into<String>) -> Self {
        self.legend_title = Some(title.into());
        self
    }

    pub fn y_range(mut self, lo: f64, hi: f64) -> Self {
        self.y_range = Some((lo, hi));
        self
    }

    pub fn x_ticks(mut self, ticks: Vec<f64>) -> Self {
        self.x_ticks = Some(ticks);
        self
    }

    pub fn y_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.y_tick_suffix = Some(suffix.into());
        self
    }

    pub fn x_order(mut self, order: Vec<Value>) -> Self {
        self.x_order = Some(order);
        self
    }

    pub fn mark(mut self, mark: Mark) -> Self {
        self.mark = Some(mark);
        self
    }

    pub fn reference_line(mut self, line: ReferenceLine) -> Self {
        self.reference_lines.push(line);
        self
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Line chart, one line per colour group (markers by default).
pub fn line_chart(table: &Table, enc: &Encoding, opts: &ChartOptions) -> PipelineResult<ChartSpec> {
    build_xy(table, enc, opts, ChartKind::Line, opts.mark.unwrap_or(Mark::LinesAndMarkers))
}

/// Scatter chart, one marker set per colour group.
pub fn scatter_chart(
    table: &Table,
    enc: &Encoding,
    opts: &ChartOptions,
) -> PipelineResult<ChartSpec> {
    build_xy(table, enc, opts, ChartKind::Scatter, opts.mark.unwrap_or(Mark::Markers))
}

/// One bar per row. With `scale`, each bar is coloured by its own height.
pub fn bar_chart(
    table: &Table,
    x: &str,
    y: &str,
    scale: Option<(ColorScale, &str)>,
    opts: &ChartOptions,
) -> PipelineResult<ChartSpec> {
    let mut spec = build_xy(table, &Encoding::new(x, y), opts, ChartKind::Bar, Mark::Bars)?;
    if let Some((scale, title)) = scale {
        let heights: Vec<f64> = spec
            .panels
            .iter()
            .flat_map(|p| &p.series)
            .flat_map(|s| &s.points)
            .map(|p| p.y)
            .collect();
        let (lo, hi) = min_max(heights.iter().copied()).unwrap_or((0.0, 1.0));
        for point in spec
            .panels
            .iter_mut()
            .flat_map(|p| &mut p.series)
            .flat_map(|s| &mut s.points)
        {
            point.color = Some(scale.map(point.y, lo, hi));
        }
        spec.color_bar = Some(ColorBar {
            title: title.to_string(),
            scale,
            range: (lo, hi),
        });
    }
    Ok(spec)
}

/// Several columns side by side per x category, one series per column.
pub fn grouped_bar_chart(
    table: &Table,
    x: &str,
    ys: &[(&str, &str)],
    opts: &ChartOptions,
) -> PipelineResult<ChartSpec> {
    let x_idx = table.require_column(x, "grouped bar chart")?;
    let palette = crate::color::generate_palette(ys.len());
    let mut series = Vec::with_capacity(ys.len());
    let mut xs = Vec::new();
    for ((name, column), color) in ys.iter().zip(palette) {
        let y_idx = table.require_column(column, "grouped bar chart")?;
        let points: Vec<Point> = table
            .rows()
            .filter_map(|r| {
                let x = XValue::from_value(&r.values()[x_idx])?;
                let y = r.values()[y_idx].as_f64()?;
                Some(Point {
                    x,
                    y,
                    error: None,
                    color: None,
                })
            })
            .collect();
        xs.extend(points.iter().map(|p| p.x.clone()));
        series.push(Series {
            name: name.to_string(),
            color,
            mark: Mark::Bars,
            points,
        });
    }

    Ok(ChartSpec {
        kind: ChartKind::GroupedBar,
        title: opts.title.clone(),
        x_axis: Axis {
            label: opts.x_label.clone().unwrap_or_else(|| x.to_string()),
            ticks: opts.x_ticks.clone(),
            ..Default::default()
        },
        y_axis: Axis {
            label: opts.y_label.clone().unwrap_or_default(),
            range: opts.y_range,
            ticks: None,
            tick_suffix: opts.y_tick_suffix.clone(),
        },
        x_kind: x_axis_kind(&xs, opts.x_order.as_deref()),
        panels: vec![Panel {
            title: None,
            series,
        }],
        legend_title: opts.legend_title.clone(),
        reference_lines: opts.reference_lines.clone(),
        heatmap: None,
        color_bar: None,
        height: opts.height,
    })
}

/// Correlation heatmap on a red-blue scale centred at zero.
pub fn heatmap(matrix: &CorrelationMatrix, colorbar_title: &str, opts: &ChartOptions) -> ChartSpec {
    let scale = ColorScale::red_blue();
    let n = matrix.len();
    let mut cells = Vec::with_capacity(n * n);
    for row in 0..n {
        for col in 0..n {
            let value = matrix.get(row, col).value();
            let (color, text) = match value {
                Some(v) => (scale.map(v, -1.0, 1.0), format!("{v:.2}")),
                None => (Rgb::GRAY, "n/a".to_string()),
            };
            cells.push(HeatmapCell {
                row,
                col,
                value,
                color,
                text,
            });
        }
    }

    ChartSpec {
        kind: ChartKind::Heatmap,
        title: opts.title.clone(),
        x_axis: Axis::default(),
        y_axis: Axis::default(),
        x_kind: XAxisKind::Categorical(matrix.labels.clone()),
        panels: Vec::new(),
        legend_title: None,
        reference_lines: Vec::new(),
        heatmap: Some(Heatmap {
            labels: matrix.labels.clone(),
            cells,
        }),
        color_bar: Some(ColorBar {
            title: colorbar_title.to_string(),
            scale,
            range: (-1.0, 1.0),
        }),
        height: opts.height,
    }
}

// -- shared x/y machinery --

fn build_xy(
    table: &Table,
    enc: &Encoding,
    opts: &ChartOptions,
    kind: ChartKind,
    mark: Mark,
) -> PipelineResult<ChartSpec> {
    let op = "chart preparation";
    let x_idx = table.require_column(enc.x, op)?;
    let y_idx = table.require_column(enc.y, op)?;
    let color_idx = enc.color.map(|c| table.require_column(c, op)).transpose()?;
    let facet_idx = enc.facet.map(|c| table.require_column(c, op)).transpose()?;
    let err_idx = enc.error_y.map(|c| table.require_column(c, op)).transpose()?;

    let groups = match enc.color {
        Some(col) => table.distinct_values(col)?,
        None => Vec::new(),
    };
    let facets = match enc.facet {
        Some(col) => table.distinct_values(col)?,
        None => vec![Value::Null],
    };
    let color_map = ColorMap::new(&groups);
    let single_color = crate::color::generate_palette(1)
        .first()
        .copied()
        .unwrap_or(Rgb::GRAY);

    let mut xs = Vec::new();
    let mut panels = Vec::with_capacity(facets.len());
    for facet in &facets {
        let series_keys: Vec<Option<&Value>> = if groups.is_empty() {
            vec![None]
        } else {
            groups.iter().map(Some).collect()
        };

        let mut series = Vec::with_capacity(series_keys.len());
        for key in series_keys {
            let mut points: Vec<Point> = table
                .rows()
                .filter(|r| facet_idx.map_or(true, |i| &r.values()[i] == facet))
                .filter(|r| match (key, color_idx) {
                    (Some(k), Some(i)) => &r.values()[i] == k,
                    _ => true,
                })
                .filter_map(|r| {
                    let v = r.values();
                    Some(Point {
                        x: XValue::from_value(&v[x_idx])?,
                        y: v[y_idx].as_f64()?,
                        error: err_idx.and_then(|i| v[i].as_f64()),
                        color: None,
                    })
                })
                .collect();
            if let Some(order) = &opts.x_order {
                sort_by_order(&mut points, order);
            }
            if points.is_empty() && key.is_some() {
                continue;
            }
            xs.extend(points.iter().map(|p| p.x.clone()));
            series.push(Series {
                name: key.map_or_else(|| enc.y.to_string(), |k| k.to_string()),
                color: key.map_or(single_color, |k| color_map.color_for(k)),
                mark,
                points,
            });
        }

        panels.push(Panel {
            title: enc.facet.map(|_| facet.to_string()),
            series,
        });
    }

    // Facets share one y scale so the same quantity compares side by side.
    let y_range = opts.y_range.or_else(|| {
        if enc.facet.is_some() {
            shared_y_range(&panels)
        } else {
            None
        }
    });

    Ok(ChartSpec {
        kind,
        title: opts.title.clone(),
        x_axis: Axis {
            label: opts.x_label.clone().unwrap_or_else(|| enc.x.to_string()),
            range: None,
            ticks: opts.x_ticks.clone(),
            tick_suffix: None,
        },
        y_axis: Axis {
            label: opts.y_label.clone().unwrap_or_else(|| enc.y.to_string()),
            range: y_range,
            ticks: None,
            tick_suffix: opts.y_tick_suffix.clone(),
        },
        x_kind: x_axis_kind(&xs, opts.x_order.as_deref()),
        panels,
        legend_title: opts
            .legend_title
            .clone()
            .or_else(|| enc.color.map(str::to_string)),
        reference_lines: opts.reference_lines.clone(),
        heatmap: None,
        color_bar: None,
        height: opts.height,
    })
}

fn order_key(x: &XValue, order: &[Value]) -> usize {
    order
        .iter()
        .position(|v| XValue::from_value(v).as_ref() == Some(x))
        .unwrap_or(order.len())
}

/// Stable sort of points by their x position in `order`; unknown values last.
fn sort_by_order(points: &mut [Point], order: &[Value]) {
    points.sort_by_key(|p| order_key(&p.x, order));
}

fn x_axis_kind(xs: &[XValue], order: Option<&[Value]>) -> XAxisKind {
    if xs.is_empty() {
        return XAxisKind::Numeric;
    }
    if xs.iter().all(|x| matches!(x, XValue::Date(_))) {
        return XAxisKind::Date;
    }
    if xs.iter().all(|x| matches!(x, XValue::Number(_))) {
        return XAxisKind::Numeric;
    }

    let mut categories: Vec<String> = Vec::new();
    for v in order.unwrap_or_default() {
        let label = v.to_string();
        if !categories.contains(&label) {
            categories.push(label);
        }
    }
    for x in xs {
        let label = category_label(x);
        if !categories.contains(&label) {
            categories.push(label);
        }
    }
    XAxisKind::Categorical(categories)
}

/// Text shown for an x value on a categorical axis.
pub fn category_label(x: &XValue) -> String {
    match x {
        XValue::Number(n) => Value::Float(*n).to_string(),
        XValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        XValue::Category(s) => s.clone(),
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Common y range across panels, including error bars, padded by 5 %.
fn shared_y_range(panels: &[Panel]) -> Option<(f64, f64)> {
    let extents = panels
        .iter()
        .flat_map(|p| &p.series)
        .flat_map(|s| &s.points)
        .flat_map(|p| {
            let e = p.error.unwrap_or(0.0).abs();
            [p.y - e, p.y + e]
        });
    let (lo, hi) = min_max(extents)?;
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    Some((lo - pad, hi + pad))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::correlation_matrix;

    fn viability() -> Table {
        Table::from_columns(vec![
            ("Tiempo", vec![48i64.into(), 24i64.into(), 24i64.into(), 72i64.into(), 24i64.into()]),
            ("Viabilidad", vec![85.0.into(), 90.0.into(), 70.0.into(), 80.0.into(), Value::Null]),
            ("Muestra", vec!["A".into(), "A".into(), "B".into(), "A".into(), "B".into()]),
            (
                "Celula",
                vec![
                    "Fibroblasto".into(),
                    "Fibroblasto".into(),
                    "Fibroblasto".into(),
                    "Fibroblasto".into(),
                    "Hepatocito".into(),
                ],
            ),
            ("SD", vec![3.0.into(), 2.0.into(), 5.0.into(), 1.0.into(), 4.0.into()]),
        ])
        .unwrap()
    }

    #[test]
    fn each_point_keeps_its_own_error() {
        let spec = line_chart(
            &viability(),
            &Encoding::new("Tiempo", "Viabilidad").color("Muestra").error_y("SD"),
            &ChartOptions::titled("Viabilidad"),
        )
        .unwrap();
        let a = &spec.panels[0].series[0];
        assert_eq!(a.name, "A");
        let errors: Vec<_> = a.points.iter().map(|p| p.error).collect();
        assert_eq!(errors, vec![Some(3.0), Some(2.0), Some(1.0)]);
    }

    #[test]
    fn category_order_sorts_points() {
        let opts =
            ChartOptions::titled("t").x_order(vec![24i64.into(), 48i64.into(), 72i64.into()]);
        let enc = Encoding::new("Tiempo", "Viabilidad").color("Muestra");
        let spec = line_chart(&viability(), &enc, &opts).unwrap();
        let xs: Vec<_> = spec.panels[0].series[0].points.iter().map(|p| p.x.clone()).collect();
        assert_eq!(xs, vec![XValue::Number(24.0), XValue::Number(48.0), XValue::Number(72.0)]);
    }

    #[test]
    fn missing_y_values_are_not_plotted() {
        let enc = Encoding::new("Tiempo", "Viabilidad");
        let spec = scatter_chart(&viability(), &enc, &ChartOptions::default()).unwrap();
        assert_eq!(spec.point_count(), 4);
        assert!(spec.panels[0].series[0].points.iter().all(|p| p.y.is_finite()));
    }

    #[test]
    fn facets_share_a_y_range() {
        let enc = Encoding::new("Tiempo", "Viabilidad")
            .color("Muestra")
            .facet("Celula")
            .error_y("SD");
        let spec = line_chart(&viability(), &enc, &ChartOptions::titled("t")).unwrap();
        assert_eq!(spec.panels.len(), 2);
        assert_eq!(spec.panels[0].title.as_deref(), Some("Fibroblasto"));
        let (lo, hi) = spec.y_axis.range.unwrap();
        assert!(lo < 65.0 && hi > 92.0);
        // Hepatocito has no plottable row left.
        assert!(spec.panels[1].series.is_empty());
    }

    #[test]
    fn fixed_range_wins_over_shared() {
        let enc = Encoding::new("Tiempo", "Viabilidad").facet("Celula");
        let opts = ChartOptions::titled("t").y_range(0.0, 110.0);
        let spec = line_chart(&viability(), &enc, &opts).unwrap();
        assert_eq!(spec.y_axis.range, Some((0.0, 110.0)));
    }

    #[test]
    fn same_group_same_colour_across_facets() {
        let table = Table::from_columns(vec![
            ("x", vec![1i64.into(), 1i64.into(), 2i64.into(), 2i64.into()]),
            ("y", vec![1.0.into(), 2.0.into(), 3.0.into(), 4.0.into()]),
            ("g", vec!["A".into(), "B".into(), "A".into(), "B".into()]),
            ("f", vec!["L".into(), "L".into(), "R".into(), "R".into()]),
        ])
        .unwrap();
        let enc = Encoding::new("x", "y").color("g").facet("f");
        let spec = line_chart(&table, &enc, &ChartOptions::default()).unwrap();
        assert_eq!(spec.panels[0].series[0].color, spec.panels[1].series[0].color);
        assert_ne!(spec.panels[0].series[0].color, spec.panels[0].series[1].color);
    }

    #[test]
    fn text_x_gives_categorical_axis() {
        let table = Table::from_columns(vec![
            ("Muestra", vec!["NCB".into(), "NCV".into()]),
            ("SD1", vec![0.5.into(), 1.5.into()]),
        ])
        .unwrap();
        let scale = Some((ColorScale::reds(), "Desviación"));
        let spec = bar_chart(&table, "Muestra", "SD1", scale, &ChartOptions::default()).unwrap();
        assert_eq!(spec.x_kind, XAxisKind::Categorical(vec!["NCB".into(), "NCV".into()]));
        let colors: Vec<_> = spec.panels[0].series[0].points.iter().map(|p| p.color).collect();
        assert_eq!(colors[0], Some(ColorScale::reds().at(0.0)));
        assert_eq!(colors[1], Some(ColorScale::reds().at(1.0)));
    }

    #[test]
    fn heatmap_marks_undefined_cells() {
        let table = Table::from_columns(vec![
            ("a", vec![1.0.into(), 2.0.into(), 3.0.into()]),
            ("k", vec![5.0.into(), 5.0.into(), 5.0.into()]),
        ])
        .unwrap();
        let m = correlation_matrix(&table, &["a", "k"]).unwrap();
        let spec = heatmap(&m, "Correlación", &ChartOptions::titled("Matriz"));
        let h = spec.heatmap.unwrap();
        assert_eq!(h.cells.len(), 4);
        assert_eq!(h.cells[1].text, "n/a");
        assert_eq!(h.cells[3].text, "1.00");
    }

    #[test]
    fn building_is_repeatable() {
        let enc = Encoding::new("Tiempo", "Viabilidad").color("Muestra");
        let opts = ChartOptions::titled("t");
        assert_eq!(
            line_chart(&viability(), &enc, &opts).unwrap(),
            line_chart(&viability(), &enc, &opts).unwrap()
        );
    }
}
