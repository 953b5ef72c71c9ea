//! Per-dashboard heatmaps (SVG)
//!
//! A single-column heatmap, one row per dashboard, ranked from most to least
//! expensive. Each cell is annotated with its value and shaded on a
//! sequential color scale anchored at zero. Dashboards excluded from the
//! totals are listed after the ranked rows with a grey `n/a` cell.

use dashcost_core::{CostReport, CostedDashboard, RenderError, Renderer};
use rust_decimal::Decimal;
use svg::node::element::{Group, Line, Rectangle, Text};
use svg::Document;

use crate::bar::nice_step;
use crate::{format_fixed, to_f64, truncate, ChartTheme, DEFAULT_TARGET};

/// Matplotlib "Blues" anchor colors, light to dark
const BLUES: [(u8, u8, u8); 9] = [
    (0xf7, 0xfb, 0xff),
    (0xde, 0xeb, 0xf7),
    (0xc6, 0xdb, 0xef),
    (0x9e, 0xca, 0xe1),
    (0x6b, 0xae, 0xd6),
    (0x42, 0x92, 0xc6),
    (0x21, 0x71, 0xb5),
    (0x08, 0x51, 0x9c),
    (0x08, 0x30, 0x6b),
];

/// Matplotlib "PuBuGn" anchor colors, light to dark
const PUBUGN: [(u8, u8, u8); 9] = [
    (0xff, 0xf7, 0xfb),
    (0xec, 0xe2, 0xf0),
    (0xd0, 0xd1, 0xe6),
    (0xa6, 0xbd, 0xdb),
    (0x67, 0xa9, 0xcf),
    (0x36, 0x90, 0xc0),
    (0x02, 0x81, 0x8a),
    (0x01, 0x6c, 0x59),
    (0x01, 0x46, 0x36),
];

/// Number of bands drawn in the colorbar
const COLORBAR_STEPS: usize = 48;

/// Which per-dashboard value the heatmap shows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeatMetric {
    /// Total conversion cost in dollars
    Cost,
    /// Adjusted hours
    Hours,
}

impl HeatMetric {
    pub const ALL: [HeatMetric; 2] = [HeatMetric::Cost, HeatMetric::Hours];

    /// Output file name
    pub fn file_name(&self) -> &'static str {
        match self {
            HeatMetric::Cost => "per_dashboard_conversion_cost_heatmap.svg",
            HeatMetric::Hours => "per_dashboard_conversion_hours_heatmap.svg",
        }
    }

    fn title(&self, target: &str) -> String {
        match self {
            HeatMetric::Cost => format!("Per-Dashboard Cost to Convert to {}", target),
            HeatMetric::Hours => format!("Estimated Hours to Convert Each Dashboard to {}", target),
        }
    }

    fn axis_label(&self) -> &'static str {
        match self {
            HeatMetric::Cost => "Total Cost ($)",
            HeatMetric::Hours => "Total Hours",
        }
    }

    /// Decimal places in cell annotations
    fn decimals(&self) -> u32 {
        match self {
            HeatMetric::Cost => 0,
            HeatMetric::Hours => 1,
        }
    }

    fn palette(&self) -> &'static [(u8, u8, u8); 9] {
        match self {
            HeatMetric::Cost => &BLUES,
            HeatMetric::Hours => &PUBUGN,
        }
    }

    /// Value for a row, `None` if the row is excluded from totals
    fn value(&self, row: &CostedDashboard) -> Option<Decimal> {
        if !row.is_costed() {
            return None;
        }
        match self {
            HeatMetric::Cost => row.breakdown.total_cost,
            HeatMetric::Hours => row.breakdown.adjusted_hours,
        }
    }
}

/// SVG heatmap renderer
#[derive(Clone, Debug)]
pub struct HeatmapRenderer {
    pub metric: HeatMetric,
    /// Width of the dashboard name column
    pub label_width: u32,
    pub cell_width: u32,
    pub row_height: u32,
    /// Names longer than this are truncated
    pub max_label_chars: usize,
    pub missing_color: String,
    pub target: String,
    pub theme: ChartTheme,
}

impl HeatmapRenderer {
    pub fn new(metric: HeatMetric) -> Self {
        Self {
            metric,
            label_width: 240,
            cell_width: 180,
            row_height: 28,
            max_label_chars: 32,
            missing_color: "#d9d9d9".into(),
            target: DEFAULT_TARGET.into(),
            theme: ChartTheme::default(),
        }
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn theme(mut self, theme: ChartTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Ranked rows: costed rows by value descending (ties keep catalog
    /// order), then excluded rows in catalog order
    pub fn ranked<'r>(&self, report: &'r CostReport) -> Vec<(&'r CostedDashboard, Option<Decimal>)> {
        let mut ranked: Vec<_> = report
            .rows
            .iter()
            .filter_map(|row| self.metric.value(row).map(|v| (row, Some(v))))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        ranked.extend(
            report
                .rows
                .iter()
                .filter(|row| self.metric.value(row).is_none())
                .map(|row| (row, None)),
        );
        ranked
    }

    fn text(&self, content: impl Into<String>, x: f64, y: f64, size: u32) -> Text {
        Text::new(content.into())
            .set("x", x)
            .set("y", y)
            .set("font-family", self.theme.font_family.as_str())
            .set("font-size", size)
            .set("fill", self.theme.text_color.as_str())
    }

    fn render_cells(&self, ranked: &[(&CostedDashboard, Option<Decimal>)], vmax: f64) -> Group {
        let mut group = Group::new().set("class", "cells");
        let x = self.label_width as f64;
        let cell_w = self.cell_width as f64;
        let row_h = self.row_height as f64;

        for (i, (row, value)) in ranked.iter().enumerate() {
            let y = TOP_MARGIN + i as f64 * row_h;
            let mid_y = y + row_h / 2.0 + 4.0;

            group = group.add(
                self.text(truncate(row.name(), self.max_label_chars), x - 8.0, mid_y, self.theme.font_size)
                    .set("text-anchor", "end"),
            );

            let (fill, label, label_color) = match value {
                Some(v) => {
                    let t = (to_f64(*v) / vmax).clamp(0.0, 1.0);
                    let (r, g, b) = interpolate(self.metric.palette(), t);
                    let ink = if t > 0.55 { "#ffffff" } else { "#1a1a1a" };
                    (rgb_hex(r, g, b), format_fixed(*v, self.metric.decimals()), ink)
                }
                None => (self.missing_color.clone(), "n/a".to_string(), "#666666"),
            };

            group = group.add(
                Rectangle::new()
                    .set("x", x)
                    .set("y", y)
                    .set("width", cell_w)
                    .set("height", row_h)
                    .set("fill", fill)
                    .set("stroke", "#ffffff")
                    .set("stroke-width", 1),
            );
            group = group.add(
                Text::new(label)
                    .set("x", x + cell_w / 2.0)
                    .set("y", mid_y)
                    .set("text-anchor", "middle")
                    .set("font-family", self.theme.font_family.as_str())
                    .set("font-size", self.theme.font_size)
                    .set("fill", label_color),
            );
        }

        group
    }

    /// Vertical color scale from 0 (bottom) to `vmax` (top)
    fn render_colorbar(&self, rows: usize, vmax: f64) -> Group {
        let mut group = Group::new().set("class", "colorbar");
        let x = (self.label_width + self.cell_width) as f64 + 30.0;
        let width = 16.0;
        let height = rows as f64 * self.row_height as f64;
        let band = height / COLORBAR_STEPS as f64;

        for step in 0..COLORBAR_STEPS {
            let t = (step as f64 + 0.5) / COLORBAR_STEPS as f64;
            let (r, g, b) = interpolate(self.metric.palette(), t);
            group = group.add(
                Rectangle::new()
                    .set("x", x)
                    .set("y", TOP_MARGIN + height - (step as f64 + 1.0) * band)
                    .set("width", width)
                    .set("height", band + 0.5)
                    .set("fill", rgb_hex(r, g, b)),
            );
        }

        let tick_step = nice_step(vmax / 4.0);
        let mut tick = 0.0;
        while tick <= vmax + f64::EPSILON {
            let y = TOP_MARGIN + height - tick / vmax * height;
            group = group.add(
                Line::new()
                    .set("x1", x + width)
                    .set("y1", y)
                    .set("x2", x + width + 4.0)
                    .set("y2", y)
                    .set("stroke", self.theme.axis_color.as_str()),
            );
            let label = format_fixed(Decimal::try_from(tick).unwrap_or_default(), self.metric.decimals());
            group = group.add(self.text(label, x + width + 7.0, y + 4.0, self.theme.font_size.saturating_sub(2)));
            tick += tick_step;
        }

        group
    }
}

/// Space above the first row for the title
const TOP_MARGIN: f64 = 60.0;
/// Space below the last row for the axis label
const BOTTOM_MARGIN: f64 = 50.0;
/// Space right of the cells for the colorbar
const COLORBAR_AREA: u32 = 120;

impl Renderer for HeatmapRenderer {
    type Output = String;

    fn render(&self, report: &CostReport) -> Result<String, RenderError> {
        if report.rows.is_empty() {
            return Err(RenderError::InvalidData("No dashboards to render".into()));
        }

        let ranked = self.ranked(report);
        let vmax = ranked
            .iter()
            .filter_map(|(_, v)| v.map(to_f64))
            .fold(0.0_f64, f64::max);
        let vmax = if vmax > 0.0 { vmax } else { 1.0 };

        let width = self.label_width + self.cell_width + COLORBAR_AREA;
        let grid_height = ranked.len() as f64 * self.row_height as f64;
        let height = (TOP_MARGIN + grid_height + BOTTOM_MARGIN).ceil() as u32;

        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height))
            .set("xmlns", "http://www.w3.org/2000/svg");

        document = document.add(
            Rectangle::new()
                .set("width", "100%")
                .set("height", "100%")
                .set("fill", self.theme.background_color.as_str()),
        );

        document = document.add(
            self.text(self.metric.title(&self.target), width as f64 / 2.0, 30.0, self.theme.font_size + 4)
                .set("text-anchor", "middle")
                .set("font-weight", "bold"),
        );

        document = document.add(self.render_cells(&ranked, vmax));
        document = document.add(self.render_colorbar(ranked.len(), vmax));

        // Axis titles
        let cell_center = self.label_width as f64 + self.cell_width as f64 / 2.0;
        document = document.add(
            self.text(self.metric.axis_label(), cell_center, TOP_MARGIN + grid_height + 30.0, self.theme.font_size)
                .set("text-anchor", "middle"),
        );
        let mid_y = TOP_MARGIN + grid_height / 2.0;
        document = document.add(
            self.text("Dashboard", 16.0, mid_y, self.theme.font_size)
                .set("text-anchor", "middle")
                .set("transform", format!("rotate(-90 16 {})", mid_y)),
        );

        let mut output = Vec::new();
        svg::write(&mut output, &document)
            .map_err(|e| RenderError::Format(format!("Failed to write SVG: {}", e)))?;

        String::from_utf8(output).map_err(|e| RenderError::Format(format!("Invalid UTF-8: {}", e)))
    }
}

/// Linear interpolation across evenly spaced anchor colors
fn interpolate(palette: &[(u8, u8, u8)], t: f64) -> (u8, u8, u8) {
    let last = palette.len() - 1;
    let pos = t.clamp(0.0, 1.0) * last as f64;
    let lo = (pos.floor() as usize).min(last);
    let hi = (lo + 1).min(last);
    let frac = pos - lo as f64;

    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (a, b) = (palette[lo], palette[hi]);
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

fn rgb_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}
