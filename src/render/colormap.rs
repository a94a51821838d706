//! Sequential colour scale and logarithmic value normalisation.

use plotters::style::RGBColor;

/// A colour stop: position in [0, 1] mapped to an RGB colour.
#[derive(Debug, Clone, Copy)]
pub struct ColorStop {
    pub t: f64,
    pub color: RGBColor,
}

impl ColorStop {
    pub const fn new(t: f64, r: u8, g: u8, b: u8) -> Self {
        Self {
            t,
            color: RGBColor(r, g, b),
        }
    }
}

/// Dark purple -> blue -> green -> yellow.
pub const VIRIDIS: &[ColorStop] = &[
    ColorStop::new(0.00, 68, 1, 84),
    ColorStop::new(0.25, 59, 82, 139),
    ColorStop::new(0.50, 33, 145, 140),
    ColorStop::new(0.75, 94, 201, 98),
    ColorStop::new(1.00, 253, 231, 37),
];

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_color(c1: RGBColor, c2: RGBColor, t: f64) -> RGBColor {
    RGBColor(
        lerp(c1.0 as f64, c2.0 as f64, t).round() as u8,
        lerp(c1.1 as f64, c2.1 as f64, t).round() as u8,
        lerp(c1.2 as f64, c2.2 as f64, t).round() as u8,
    )
}

/// Evaluate a multi-stop scale at `t`, clamped to [0, 1].
pub fn evaluate(stops: &[ColorStop], t: f64) -> RGBColor {
    if t.is_nan() || t <= 0.0 {
        return stops[0].color;
    }
    if t >= 1.0 {
        return stops[stops.len() - 1].color;
    }
    for i in 1..stops.len() {
        if t <= stops[i].t {
            let ratio = (t - stops[i - 1].t) / (stops[i].t - stops[i - 1].t);
            return lerp_color(stops[i - 1].color, stops[i].color, ratio);
        }
    }
    stops[stops.len() - 1].color
}

/// Maps positive values onto [0, 1] by `log10`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNormalizer {
    pub min_log: f64,
    pub max_log: f64,
}

impl LogNormalizer {
    /// Range over the strictly positive, finite values; `None` if there are none.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let (min_log, max_log) = values
            .into_iter()
            .filter(|v| v.is_finite() && *v > 0.0)
            .map(f64::log10)
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;

        Some(Self { min_log, max_log })
    }

    pub fn normalize(&self, value: f64) -> Option<f64> {
        if !value.is_finite() || value <= 0.0 {
            return None;
        }
        let span = self.max_log - self.min_log;
        if span == 0.0 {
            return Some(0.5);
        }
        Some((value.log10() - self.min_log) / span)
    }
}
