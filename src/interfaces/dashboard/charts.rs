//! Server-side chart geometry for the dashboard.
//!
//! The template draws the SVG elements; this module only computes paths,
//! positions, colors and labels so all text goes through the template's
//! escaping.

use std::f64::consts::PI;

use serde::Serialize;

use crate::domain::review::{SentimentDistribution, TopProducts};

/// Qualitative palette for pie slices.
const SET2: [&str; 8] = [
    "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494", "#b3b3b3",
];

/// Viridis stops at 0.0, 0.1, ..., 1.0.
const VIRIDIS: [(u8, u8, u8); 11] = [
    (68, 1, 84),
    (72, 36, 117),
    (65, 68, 135),
    (53, 95, 141),
    (42, 120, 142),
    (33, 145, 140),
    (34, 168, 132),
    (68, 191, 112),
    (122, 209, 81),
    (189, 223, 38),
    (253, 231, 37),
];

pub const PIE_SIZE: f64 = 320.0;
const PIE_RADIUS: f64 = 120.0;
const PIE_START_DEG: f64 = 90.0;
const PCT_DISTANCE: f64 = 0.6;
const LABEL_DISTANCE: f64 = 1.1;

pub const BAR_CHART_WIDTH: f64 = 560.0;
const BAR_LABEL_WIDTH: f64 = 170.0;
const BAR_PLOT_WIDTH: f64 = 360.0;
const BAR_ROW_HEIGHT: f64 = 28.0;
const BAR_FILL: f64 = 0.8;
const BAR_TOP: f64 = 10.0;
const BAR_AXIS_SPACE: f64 = 44.0;
const MAX_NAME_CHARS: usize = 24;

#[derive(Debug, Clone, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub percent: String,
    pub color: &'static str,
    /// SVG path for the wedge; empty when the slice is the whole circle.
    pub path: String,
    pub full_circle: bool,
    pub label_x: String,
    pub label_y: String,
    pub label_anchor: &'static str,
    pub pct_x: String,
    pub pct_y: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PieChart {
    pub size: f64,
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Bar {
    pub name: String,
    pub full_name: String,
    pub score: String,
    pub color: String,
    pub y: String,
    pub width: String,
    pub height: String,
    pub label_y: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tick {
    pub x: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarChart {
    pub width: f64,
    pub height: String,
    pub plot_x: f64,
    pub plot_width: f64,
    pub axis_y: String,
    pub tick_label_y: String,
    pub axis_label_x: String,
    pub axis_label_y: String,
    pub bars: Vec<Bar>,
    pub ticks: Vec<Tick>,
}

fn fmt(value: f64) -> String {
    format!("{:.2}", value)
}

/// Point on the circle for an angle measured counterclockwise from 3 o'clock.
fn polar(cx: f64, cy: f64, radius: f64, degrees: f64) -> (f64, f64) {
    let rad = degrees * PI / 180.0;
    (cx + radius * rad.cos(), cy - radius * rad.sin())
}

pub fn format_percent(count: usize, total: usize) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", count as f64 * 100.0 / total as f64)
}

/// Wedges start at 12 o'clock and run counterclockwise in distribution order.
pub fn pie_chart(distribution: &SentimentDistribution) -> PieChart {
    let total = distribution.total();
    let center = PIE_SIZE / 2.0;
    let mut start = PIE_START_DEG;
    let mut slices = Vec::with_capacity(distribution.len());

    for (index, entry) in distribution.iter().enumerate() {
        let fraction = if total == 0 {
            0.0
        } else {
            entry.count as f64 / total as f64
        };
        let sweep = fraction * 360.0;
        let end = start + sweep;
        let mid = start + sweep / 2.0;
        let full_circle = entry.count == total && total > 0;

        let path = if full_circle {
            String::new()
        } else {
            let (x0, y0) = polar(center, center, PIE_RADIUS, start);
            let (x1, y1) = polar(center, center, PIE_RADIUS, end);
            let large_arc = u8::from(sweep > 180.0);
            format!(
                "M {c} {c} L {} {} A {r} {r} 0 {large_arc} 0 {} {} Z",
                fmt(x0),
                fmt(y0),
                fmt(x1),
                fmt(y1),
                c = fmt(center),
                r = fmt(PIE_RADIUS),
            )
        };

        let (label_x, label_y) = polar(center, center, PIE_RADIUS * LABEL_DISTANCE, mid);
        let (pct_x, pct_y) = polar(center, center, PIE_RADIUS * PCT_DISTANCE, mid);
        let label_anchor = if label_x >= center { "start" } else { "end" };

        slices.push(PieSlice {
            label: entry.label.to_string(),
            count: entry.count,
            percent: format_percent(entry.count, total),
            color: SET2[index % SET2.len()],
            path,
            full_circle,
            label_x: fmt(label_x),
            label_y: fmt(label_y),
            label_anchor,
            pct_x: fmt(pct_x),
            pct_y: fmt(pct_y),
        });

        start = end;
    }

    PieChart {
        size: PIE_SIZE,
        cx: center,
        cy: center,
        radius: PIE_RADIUS,
        slices,
    }
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}

/// Sample the viridis ramp at `position` in `[0, 1]`.
pub fn viridis(position: f64) -> String {
    let scaled = position.clamp(0.0, 1.0) * (VIRIDIS.len() - 1) as f64;
    let lower = scaled.floor() as usize;
    let upper = (lower + 1).min(VIRIDIS.len() - 1);
    let t = scaled - lower as f64;
    let (a, b) = (VIRIDIS[lower], VIRIDIS[upper]);
    format!(
        "#{:02x}{:02x}{:02x}",
        lerp(a.0, b.0, t),
        lerp(a.1, b.1, t),
        lerp(a.2, b.2, t)
    )
}

/// `n` evenly spaced colors that skip both ends of the ramp.
pub fn viridis_palette(n: usize) -> Vec<String> {
    (1..=n)
        .map(|i| viridis(i as f64 / (n + 1) as f64))
        .collect()
}

pub fn truncate_name(name: &str) -> String {
    if name.chars().count() <= MAX_NAME_CHARS {
        return name.to_string();
    }
    let mut short: String = name.chars().take(MAX_NAME_CHARS - 1).collect();
    short.push('…');
    short
}

/// Horizontal bars, best product on top, on a fixed 0..1 axis.
pub fn bar_chart(top_products: &TopProducts) -> BarChart {
    let colors = viridis_palette(top_products.len());
    let bars: Vec<Bar> = top_products
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(row, (product, color))| {
            let y = BAR_TOP + row as f64 * BAR_ROW_HEIGHT;
            let height = BAR_ROW_HEIGHT * BAR_FILL;
            Bar {
                name: truncate_name(&product.product_name),
                full_name: product.product_name.clone(),
                score: format!("{:.2}", product.score),
                color,
                y: fmt(y + (BAR_ROW_HEIGHT - height) / 2.0),
                width: fmt(product.score.clamp(0.0, 1.0) * BAR_PLOT_WIDTH),
                height: fmt(height),
                label_y: fmt(y + BAR_ROW_HEIGHT / 2.0),
            }
        })
        .collect();

    let axis_y = BAR_TOP + bars.len().max(1) as f64 * BAR_ROW_HEIGHT;
    let ticks = (0..=5)
        .map(|step| {
            let value = step as f64 * 0.2;
            Tick {
                x: fmt(BAR_LABEL_WIDTH + value * BAR_PLOT_WIDTH),
                label: format!("{:.1}", value),
            }
        })
        .collect();

    BarChart {
        width: BAR_CHART_WIDTH,
        height: fmt(axis_y + BAR_AXIS_SPACE),
        plot_x: BAR_LABEL_WIDTH,
        plot_width: BAR_PLOT_WIDTH,
        axis_y: fmt(axis_y),
        tick_label_y: fmt(axis_y + 16.0),
        axis_label_x: fmt(BAR_LABEL_WIDTH + BAR_PLOT_WIDTH / 2.0),
        axis_label_y: fmt(axis_y + 36.0),
        bars,
        ticks,
    }
}
