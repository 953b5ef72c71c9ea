//! Scenario comparison bar charts (SVG)
//!
//! The role-split scenario is drawn as a stacked bar (junior analyst below,
//! manager on top). The single-rate scenario is a plain bar. Each bar carries
//! its total as a dollar label, and the y-axis leaves 15% headroom above the
//! tallest bar so labels never clip.

use dashcost_core::{CostReport, FlatRate, RenderError, Renderer, Role};
use rust_decimal::Decimal;
use svg::node::element::{Group, Line, Rectangle, Text};
use svg::Document;

use crate::{format_money, to_f64, ChartTheme, DEFAULT_TARGET};

/// Which comparison chart to draw
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScenarioChart {
    /// Option A (role split, stacked) next to Option B (single rate)
    Comparison,
    /// Role split alone, stacked by role
    ByRole,
    /// Single-rate total alone
    FlatOnly,
}

impl ScenarioChart {
    /// Charts produced for a comparison mode
    ///
    /// The contractor comparison fits on one chart; the junior-rate mode
    /// draws the two scenarios separately.
    pub fn for_flat_rate(flat_rate: FlatRate) -> Vec<ScenarioChart> {
        match flat_rate {
            FlatRate::Contractor(_) => vec![ScenarioChart::Comparison],
            FlatRate::JuniorAnalyst => vec![ScenarioChart::ByRole, ScenarioChart::FlatOnly],
        }
    }

    /// Output file name
    pub fn file_name(&self) -> &'static str {
        match self {
            ScenarioChart::Comparison => "combined_conversion_cost_comparison.svg",
            ScenarioChart::ByRole => "total_conversion_cost_by_role.svg",
            ScenarioChart::FlatOnly => "total_conversion_cost_contractor_only.svg",
        }
    }
}

struct Segment {
    label: String,
    value: Decimal,
    color: String,
}

struct Bar {
    label: String,
    segments: Vec<Segment>,
}

impl Bar {
    fn total(&self) -> Decimal {
        self.segments
            .iter()
            .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.value))
    }
}

/// SVG bar chart renderer for one [`ScenarioChart`]
#[derive(Clone, Debug)]
pub struct ScenarioChartRenderer {
    pub chart: ScenarioChart,
    /// Overall width in pixels
    pub width: u32,
    /// Overall height in pixels
    pub height: u32,
    pub margin_left: u32,
    /// Right margin; holds the legend
    pub margin_right: u32,
    pub margin_top: u32,
    pub margin_bottom: u32,
    pub junior_color: String,
    pub manager_color: String,
    pub contractor_color: String,
    /// y-axis maximum as a multiple of the tallest bar
    pub headroom: f64,
    /// Reporting tool the dashboards move to, used in titles
    pub target: String,
    pub theme: ChartTheme,
}

impl ScenarioChartRenderer {
    pub fn new(chart: ScenarioChart) -> Self {
        Self {
            chart,
            width: 800,
            height: 480,
            margin_left: 90,
            margin_right: 170,
            margin_top: 60,
            margin_bottom: 60,
            junior_color: "#99ccff".into(),
            manager_color: "#336699".into(),
            contractor_color: "#66cc99".into(),
            headroom: 1.15,
            target: DEFAULT_TARGET.into(),
            theme: ChartTheme::default(),
        }
    }

    /// Configure overall size
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn theme(mut self, theme: ChartTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    fn title(&self, report: &CostReport) -> String {
        match self.chart {
            ScenarioChart::Comparison => {
                "Total Dashboard Conversion Cost: Option A vs Option B".to_string()
            }
            ScenarioChart::ByRole => {
                format!("Total Dashboard Conversion Cost to {} (by Role)", self.target)
            }
            ScenarioChart::FlatOnly => format!(
                "Total Conversion Cost if Done Entirely by {}",
                report.flat_rate.label()
            ),
        }
    }

    fn role_split_bar(&self, label: &str, report: &CostReport) -> Bar {
        Bar {
            label: label.to_string(),
            segments: vec![
                Segment {
                    label: Role::JuniorAnalyst.position().to_string(),
                    value: report.totals.total_jr_cost,
                    color: self.junior_color.clone(),
                },
                Segment {
                    label: Role::Manager.position().to_string(),
                    value: report.totals.total_mgr_cost,
                    color: self.manager_color.clone(),
                },
            ],
        }
    }

    fn flat_bar(&self, label: &str, report: &CostReport) -> Bar {
        let color = match report.flat_rate {
            FlatRate::Contractor(_) => &self.contractor_color,
            FlatRate::JuniorAnalyst => &self.junior_color,
        };
        Bar {
            label: label.to_string(),
            segments: vec![Segment {
                label: report.flat_rate.label().to_string(),
                value: report.flat_total(),
                color: color.clone(),
            }],
        }
    }

    fn bars(&self, report: &CostReport) -> Vec<Bar> {
        match self.chart {
            ScenarioChart::Comparison => vec![
                self.role_split_bar("Option A", report),
                self.flat_bar("Option B", report),
            ],
            ScenarioChart::ByRole => vec![self.role_split_bar("Total Conversion Cost", report)],
            ScenarioChart::FlatOnly => vec![self.flat_bar("Total Conversion Cost", report)],
        }
    }

    fn plot_bounds(&self) -> (f64, f64, f64, f64) {
        let left = self.margin_left as f64;
        let right = self.width.saturating_sub(self.margin_right) as f64;
        let top = self.margin_top as f64;
        let bottom = self.height.saturating_sub(self.margin_bottom) as f64;
        (left, right, top, bottom)
    }

    fn text(&self, content: impl Into<String>, x: f64, y: f64, size: u32) -> Text {
        Text::new(content.into())
            .set("x", x)
            .set("y", y)
            .set("font-family", self.theme.font_family.as_str())
            .set("font-size", size)
            .set("fill", self.theme.text_color.as_str())
    }

    /// Horizontal grid lines with dollar tick labels
    fn render_axis(&self, y_max: f64) -> Group {
        let mut group = Group::new().set("class", "axis");
        let (left, right, top, bottom) = self.plot_bounds();
        let plot_height = bottom - top;

        let step = nice_step(y_max / 5.0);
        let mut tick = 0.0;
        while tick <= y_max + f64::EPSILON {
            let y = bottom - tick / y_max * plot_height;
            group = group.add(
                Line::new()
                    .set("x1", left)
                    .set("y1", y)
                    .set("x2", right)
                    .set("y2", y)
                    .set("stroke", self.theme.grid_color.as_str())
                    .set("stroke-width", 1),
            );
            let label = format_money(Decimal::try_from(tick).unwrap_or_default(), 0);
            group = group.add(
                self.text(label, left - 8.0, y + 4.0, self.theme.font_size.saturating_sub(1))
                    .set("text-anchor", "end"),
            );
            tick += step;
        }

        // Axis lines
        group = group.add(
            Line::new()
                .set("x1", left)
                .set("y1", top)
                .set("x2", left)
                .set("y2", bottom)
                .set("stroke", self.theme.axis_color.as_str())
                .set("stroke-width", 1),
        );
        group = group.add(
            Line::new()
                .set("x1", left)
                .set("y1", bottom)
                .set("x2", right)
                .set("y2", bottom)
                .set("stroke", self.theme.axis_color.as_str())
                .set("stroke-width", 1),
        );

        // Y-axis title
        let mid_y = top + plot_height / 2.0;
        group.add(
            self.text("Total Cost ($)", 20.0, mid_y, self.theme.font_size)
                .set("text-anchor", "middle")
                .set("transform", format!("rotate(-90 20 {})", mid_y)),
        )
    }

    fn render_bar(&self, bar: &Bar, index: usize, count: usize, y_max: f64) -> Group {
        let mut group = Group::new().set("class", "bar");
        let (left, right, top, bottom) = self.plot_bounds();
        let plot_height = bottom - top;
        let slot = (right - left) / count as f64;
        let bar_width = slot * 0.5;
        let center = left + slot * (index as f64 + 0.5);
        let scale = |v: f64| v / y_max * plot_height;

        let mut base = bottom;
        for segment in &bar.segments {
            let h = scale(to_f64(segment.value));
            if h <= 0.0 {
                continue;
            }
            group = group.add(
                Rectangle::new()
                    .set("x", center - bar_width / 2.0)
                    .set("y", base - h)
                    .set("width", bar_width)
                    .set("height", h)
                    .set("fill", segment.color.as_str())
                    .set("data-role", segment.label.as_str()),
            );
            base -= h;
        }

        // Value label above the bar
        let total = bar.total();
        group = group.add(
            self.text(format_money(total, 0), center, bottom - scale(to_f64(total)) - 6.0, self.theme.font_size)
                .set("text-anchor", "middle")
                .set("font-weight", "bold"),
        );

        // Category label under the axis
        group.add(
            self.text(bar.label.as_str(), center, bottom + 20.0, self.theme.font_size)
                .set("text-anchor", "middle"),
        )
    }

    /// Legend titled "Role", one entry per distinct segment label
    fn render_legend(&self, bars: &[Bar]) -> Group {
        let mut group = Group::new().set("class", "legend");
        let (_, right, top, _) = self.plot_bounds();
        let x = right + 20.0;
        let box_size = 12.0;

        group = group.add(
            self.text("Role", x, top + 10.0, self.theme.font_size)
                .set("font-weight", "bold"),
        );

        let mut seen: Vec<&str> = Vec::new();
        for segment in bars.iter().flat_map(|b| b.segments.iter()) {
            if seen.contains(&segment.label.as_str()) {
                continue;
            }
            let y = top + 30.0 + seen.len() as f64 * 20.0;
            seen.push(segment.label.as_str());

            group = group.add(
                Rectangle::new()
                    .set("x", x)
                    .set("y", y - box_size + 2.0)
                    .set("width", box_size)
                    .set("height", box_size)
                    .set("rx", 2)
                    .set("fill", segment.color.as_str()),
            );
            group = group.add(self.text(
                segment.label.as_str(),
                x + box_size + 6.0,
                y,
                self.theme.font_size.saturating_sub(1),
            ));
        }

        group
    }
}

impl Renderer for ScenarioChartRenderer {
    type Output = String;

    fn render(&self, report: &CostReport) -> Result<String, RenderError> {
        let bars = self.bars(report);
        let tallest = bars.iter().map(|b| to_f64(b.total())).fold(0.0_f64, f64::max);
        let y_max = if tallest > 0.0 { tallest * self.headroom } else { 1.0 };

        let mut document = Document::new()
            .set("width", self.width)
            .set("height", self.height)
            .set("viewBox", (0, 0, self.width, self.height))
            .set("xmlns", "http://www.w3.org/2000/svg");

        document = document.add(
            Rectangle::new()
                .set("width", "100%")
                .set("height", "100%")
                .set("fill", self.theme.background_color.as_str()),
        );

        let (left, right, _, _) = self.plot_bounds();
        document = document.add(
            self.text(self.title(report), (left + right) / 2.0, 30.0, self.theme.font_size + 4)
                .set("text-anchor", "middle")
                .set("font-weight", "bold"),
        );

        document = document.add(self.render_axis(y_max));
        for (index, bar) in bars.iter().enumerate() {
            document = document.add(self.render_bar(bar, index, bars.len(), y_max));
        }
        document = document.add(self.render_legend(&bars));

        let mut output = Vec::new();
        svg::write(&mut output, &document)
            .map_err(|e| RenderError::Format(format!("Failed to write SVG: {}", e)))?;

        String::from_utf8(output).map_err(|e| RenderError::Format(format!("Invalid UTF-8: {}", e)))
    }
}

/// Round a raw tick interval up to 1, 2, 2.5 or 5 times a power of ten
pub(crate) fn nice_step(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 2.5 {
        2.5
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}
