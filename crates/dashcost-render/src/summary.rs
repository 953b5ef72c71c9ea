//! Console and JSON summaries of the scenario totals

use dashcost_core::{CostReport, FlatRate, RenderError, Renderer, RowIssue};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::Write;

use crate::{format_hours, format_money};

/// Plain-text totals for the console
#[derive(Clone, Debug)]
pub struct SummaryRenderer {
    /// List each excluded dashboard with its reasons
    pub show_excluded: bool,
}

impl Default for SummaryRenderer {
    fn default() -> Self {
        Self { show_excluded: true }
    }
}

impl SummaryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_excluded(mut self, show: bool) -> Self {
        self.show_excluded = show;
        self
    }
}

/// `$43` for whole rates, `$43.50` otherwise
fn format_rate(rate: Decimal) -> String {
    let rate = rate.normalize();
    if rate.scale() == 0 {
        format_money(rate, 0)
    } else {
        format_money(rate, 2)
    }
}

impl Renderer for SummaryRenderer {
    type Output = String;

    fn render(&self, report: &CostReport) -> Result<String, RenderError> {
        let totals = &report.totals;
        let mut out = String::new();

        let fmt_err = |e: std::fmt::Error| RenderError::Format(e.to_string());

        writeln!(
            out,
            "Total Hours Required for All Dashboard Conversions: {} hours",
            format_hours(totals.total_hours)
        )
        .map_err(fmt_err)?;
        writeln!(out, "Junior Analyst Cost: {}", format_money(totals.total_jr_cost, 2)).map_err(fmt_err)?;
        writeln!(out, "Manager Cost: {}", format_money(totals.total_mgr_cost, 2)).map_err(fmt_err)?;

        let flat_total = format_money(report.flat_total(), 2);
        let split_total = format_money(report.role_split_total(), 2);
        match report.flat_rate {
            FlatRate::Contractor(rate) => {
                writeln!(
                    out,
                    "Total Cost if Contractor Did All Work (@ {}/hr): {}",
                    format_rate(rate),
                    flat_total
                )
                .map_err(fmt_err)?;
                writeln!(out, "Total Cost if Split Between Roles: {}", split_total).map_err(fmt_err)?;
            }
            FlatRate::JuniorAnalyst => {
                writeln!(out, "Total Cost if Junior Analyst Did All Work: {}", flat_total).map_err(fmt_err)?;
                writeln!(
                    out,
                    "Total Cost if Split Between Roles (Based on Effort): {}",
                    split_total
                )
                .map_err(fmt_err)?;
            }
        }

        if report.dropped_rows > 0 {
            writeln!(
                out,
                "\n{} catalog row(s) skipped for a missing name or conversion level",
                report.dropped_rows
            )
            .map_err(fmt_err)?;
        }

        if totals.excluded_rows > 0 {
            writeln!(
                out,
                "\n{} dashboard(s) excluded from totals:",
                totals.excluded_rows
            )
            .map_err(fmt_err)?;
            if self.show_excluded {
                for row in report.excluded() {
                    writeln!(out, "  - {}: {}", row.name(), describe_issues(&row.issues)).map_err(fmt_err)?;
                }
            }
        }

        Ok(out)
    }
}

/// `reason [W001]; reason [W002]`
pub fn describe_issues(issues: &[RowIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{} [{}]", issue, issue.code()))
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// JSON
// ============================================================================

/// Totals and scenarios as pretty-printed JSON
#[derive(Clone, Debug, Default)]
pub struct JsonSummaryRenderer;

impl JsonSummaryRenderer {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    total_hours: Decimal,
    total_jr_cost: Decimal,
    total_mgr_cost: Decimal,
    role_split_total: Decimal,
    flat_rate: FlatRate,
    flat_rate_value: Decimal,
    flat_total: Decimal,
    costed_rows: usize,
    excluded_rows: usize,
    dropped_rows: usize,
    excluded: Vec<JsonExcluded<'a>>,
}

#[derive(Serialize)]
struct JsonExcluded<'a> {
    name: &'a str,
    issues: &'a [RowIssue],
}

impl Renderer for JsonSummaryRenderer {
    type Output = String;

    fn render(&self, report: &CostReport) -> Result<String, RenderError> {
        let totals = &report.totals;
        let summary = JsonSummary {
            total_hours: totals.total_hours,
            total_jr_cost: totals.total_jr_cost,
            total_mgr_cost: totals.total_mgr_cost,
            role_split_total: report.role_split_total(),
            flat_rate: report.flat_rate,
            flat_rate_value: report.flat_rate_value(),
            flat_total: report.flat_total(),
            costed_rows: totals.costed_rows,
            excluded_rows: totals.excluded_rows,
            dropped_rows: report.dropped_rows,
            excluded: report
                .excluded()
                .map(|row| JsonExcluded {
                    name: row.name(),
                    issues: &row.issues,
                })
                .collect(),
        };

        let mut json = serde_json::to_string_pretty(&summary)
            .map_err(|e| RenderError::Format(format!("Failed to serialize summary: {}", e)))?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashcost_core::{CostBreakdown, CostRates, CostedDashboard, DashboardRecord, EffortLevel, Totals};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn report(flat_rate: FlatRate) -> CostReport {
        CostReport {
            rows: vec![],
            totals: Totals {
                total_hours: dec!(54.48),
                total_jr_cost: dec!(1741.4),
                total_mgr_cost: dec!(1965.2),
                costed_rows: 3,
                excluded_rows: 0,
            },
            rates: CostRates::new(dec!(50), dec!(100)),
            flat_rate,
            dropped_rows: 0,
        }
    }

    fn with_excluded(mut report: CostReport) -> CostReport {
        report.rows.push(CostedDashboard {
            record: DashboardRecord::new("Ghost", "medium").status("unknown"),
            effort: EffortLevel::new(dec!(10), dec!(70), dec!(30)),
            breakdown: CostBreakdown {
                page_factor: dec!(1),
                status_factor: None,
                adjusted_hours: None,
                jr_hours: None,
                mgr_hours: None,
                jr_cost: None,
                mgr_cost: None,
                total_cost: None,
            },
            issues: vec![RowIssue::UnrecognizedStatus("unknown".into())],
        });
        report.totals.excluded_rows = 1;
        report.dropped_rows = 2;
        report
    }

    #[test]
    fn contractor_summary_lines() {
        let text = SummaryRenderer::new().render(&report(FlatRate::default())).unwrap();
        assert_eq!(
            text,
            "Total Hours Required for All Dashboard Conversions: 54.5 hours\n\
             Junior Analyst Cost: $1,741.40\n\
             Manager Cost: $1,965.20\n\
             Total Cost if Contractor Did All Work (@ $43/hr): $2,342.64\n\
             Total Cost if Split Between Roles: $3,706.60\n"
        );
    }

    #[test]
    fn junior_summary_lines() {
        let text = SummaryRenderer::new().render(&report(FlatRate::JuniorAnalyst)).unwrap();
        assert!(text.contains("Total Cost if Junior Analyst Did All Work: $2,724.00\n"));
        assert!(text.contains("Total Cost if Split Between Roles (Based on Effort): $3,706.60\n"));
        assert!(!text.contains("Contractor"));
    }

    #[test]
    fn fractional_contractor_rate() {
        let text = SummaryRenderer::new()
            .render(&report(FlatRate::Contractor(dec!(47.5))))
            .unwrap();
        assert!(text.contains("(@ $47.50/hr): $2,587.80"));
    }

    #[test]
    fn excluded_rows_are_listed() {
        let text = SummaryRenderer::new()
            .render(&with_excluded(report(FlatRate::default())))
            .unwrap();
        assert!(text.contains("2 catalog row(s) skipped"));
        assert!(text.contains("1 dashboard(s) excluded from totals:"));
        assert!(text.contains("  - Ghost: unrecognized status 'unknown' [W002]"));
    }

    #[test]
    fn excluded_listing_can_be_hidden() {
        let text = SummaryRenderer::new()
            .show_excluded(false)
            .render(&with_excluded(report(FlatRate::default())))
            .unwrap();
        assert!(text.contains("1 dashboard(s) excluded"));
        assert!(!text.contains("Ghost"));
    }

    #[test]
    fn json_summary_fields() {
        let json = JsonSummaryRenderer::new()
            .render(&with_excluded(report(FlatRate::default())))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["total_hours"], "54.48");
        assert_eq!(value["role_split_total"], "3706.6");
        assert_eq!(value["flat_total"], "2342.64");
        assert_eq!(value["flat_rate"]["mode"], "contractor");
        assert_eq!(value["excluded_rows"], 1);
        assert_eq!(value["dropped_rows"], 2);
        assert_eq!(value["excluded"][0]["name"], "Ghost");
        assert_eq!(value["excluded"][0]["issues"][0]["kind"], "unrecognized_status");
    }
}
