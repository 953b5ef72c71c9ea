//! # dashcost-render
//!
//! Rendering backends for dashcost reports.
//!
//! This crate provides:
//! - SVG bar charts comparing the role-split and single-rate scenarios
//! - SVG heatmaps of cost and hours per dashboard
//! - Console and JSON summaries of the totals
//! - CSV and Excel exports of the per-dashboard breakdown
//!
//! ## Example
//!
//! ```rust,ignore
//! use dashcost_core::Renderer;
//! use dashcost_render::{HeatMetric, HeatmapRenderer, ScenarioChart, ScenarioChartRenderer, SummaryRenderer};
//!
//! let report = dashcost_model::estimate(&inputs, FlatRate::default());
//!
//! for chart in ScenarioChart::for_flat_rate(report.flat_rate) {
//!     let svg = ScenarioChartRenderer::new(chart).render(&report)?;
//!     std::fs::write(chart.file_name(), svg)?;
//! }
//!
//! let heatmap = HeatmapRenderer::new(HeatMetric::Cost).render(&report)?;
//! print!("{}", SummaryRenderer::new().render(&report)?);
//! ```

pub mod bar;
pub mod excel;
pub mod export;
pub mod heatmap;
pub mod summary;

pub use bar::{ScenarioChart, ScenarioChartRenderer};
pub use excel::ExcelBreakdownRenderer;
pub use export::CsvBreakdownRenderer;
pub use heatmap::{HeatMetric, HeatmapRenderer};
pub use summary::{JsonSummaryRenderer, SummaryRenderer};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Reporting tool named in chart titles
pub const DEFAULT_TARGET: &str = "Power BI";

/// File name of the detailed CSV export
pub const CSV_EXPORT_FILE: &str = "dashboard_conversion_costs_detailed.csv";

/// File name of the detailed Excel export
pub const XLSX_EXPORT_FILE: &str = "dashboard_conversion_costs_detailed.xlsx";

/// Colors and fonts shared by the SVG charts
#[derive(Clone, Debug)]
pub struct ChartTheme {
    pub background_color: String,
    pub grid_color: String,
    pub axis_color: String,
    pub text_color: String,
    pub font_family: String,
    /// Base font size in pixels
    pub font_size: u32,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".into(),
            grid_color: "#e5e5e5".into(),
            axis_color: "#555555".into(),
            text_color: "#2c3e50".into(),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 12,
        }
    }
}

/// Round half away from zero to `dp` places and print exactly `dp` decimals
pub fn format_fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

/// `$1,234.57` style amount with `dp` decimals
pub fn format_money(value: Decimal, dp: u32) -> String {
    let fixed = format_fixed(value, dp);
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut out = format!("{}${}", sign, group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Hours with one decimal place
pub fn format_hours(value: Decimal) -> String {
    format_fixed(value, 1)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Lossy conversion for chart geometry
pub(crate) fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Truncate a string to a maximum length with ellipsis
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Trimmed content of every `<text>` element, in document order
///
/// The svg writer puts text content on its own line, so tests compare
/// against this list instead of searching for `>label<`.
#[cfg(test)]
pub(crate) fn text_nodes(svg: &str) -> Vec<String> {
    svg.split("<text")
        .skip(1)
        .filter_map(|element| {
            let start = element.find('>')? + 1;
            let end = element.find("</text>")?;
            Some(element.get(start..end)?.trim().to_string())
        })
        .collect()
}
