use std::collections::HashMap;

use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};
use serde::Serialize;

use crate::data::model::Value;

/// 8-bit sRGB colour, independent of any UI toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GRAY: Rgb = Rgb(160, 160, 160);
    pub const RED: Rgb = Rgb(214, 39, 40);

    fn from_srgb(c: Srgb) -> Self {
        let c: Srgb<u8> = c.into_format();
        Rgb(c.red, c.green, c.blue)
    }

    fn to_linear(self) -> LinSrgb {
        Srgb::new(self.0, self.1, self.2)
            .into_format::<f32>()
            .into_linear()
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Rgb::from_srgb(rgb)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Rgb
// ---------------------------------------------------------------------------

/// Maps the distinct values of a grouping column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: HashMap<Value, Rgb>,
    default_color: Rgb,
}

impl ColorMap {
    /// Build a colour map; colours are assigned in the given order.
    pub fn new(values: &[Value]) -> Self {
        let palette = generate_palette(values.len());
        let mapping = values.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Rgb::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &Value) -> Rgb {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Continuous colour scales
// ---------------------------------------------------------------------------

/// A piecewise-linear colour scale over `[0, 1]`, interpolated in linear RGB.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorScale {
    pub name: &'static str,
    stops: Vec<(f32, Rgb)>,
}

impl ColorScale {
    /// Red (−1) → white (0) → blue (+1); use with a range centred on zero.
    pub fn red_blue() -> Self {
        ColorScale {
            name: "RdBu",
            stops: vec![
                (0.0, Rgb(103, 0, 31)),
                (0.25, Rgb(214, 96, 77)),
                (0.5, Rgb(247, 247, 247)),
                (0.75, Rgb(67, 147, 195)),
                (1.0, Rgb(5, 48, 97)),
            ],
        }
    }

    /// White → dark red, for magnitudes.
    pub fn reds() -> Self {
        ColorScale {
            name: "Reds",
            stops: vec![
                (0.0, Rgb(255, 245, 240)),
                (0.5, Rgb(251, 106, 74)),
                (1.0, Rgb(103, 0, 13)),
            ],
        }
    }

    /// Colour at position `t` (clamped to `[0, 1]`).
    pub fn at(&self, t: f64) -> Rgb {
        let t = (t as f32).clamp(0.0, 1.0);
        let Some(upper) = self.stops.iter().position(|(p, _)| *p >= t) else {
            return self.stops.last().map_or(Rgb::GRAY, |s| s.1);
        };
        if upper == 0 || self.stops[upper].0 == t {
            return self.stops[upper].1;
        }
        let (p0, c0) = self.stops[upper - 1];
        let (p1, c1) = self.stops[upper];
        let f = if p1 > p0 { (t - p0) / (p1 - p0) } else { 0.0 };
        let mixed = c0.to_linear().mix(c1.to_linear(), f);
        Rgb::from_srgb(Srgb::from_linear(mixed))
    }

    /// Colour for `value` on a `[min, max]` domain.
    pub fn map(&self, value: f64, min: f64, max: f64) -> Rgb {
        if max > min {
            self.at((value - min) / (max - min))
        } else {
            self.at(0.5)
        }
    }
}
