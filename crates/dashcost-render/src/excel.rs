//! Excel export of the per-dashboard breakdown
//!
//! Generates a workbook with two sheets:
//!
//! 1. **Breakdown**: one row per dashboard, same columns as the CSV export.
//!    Undefined values are blank cells; excluded rows carry their issues.
//! 2. **Summary**: total hours, role costs and both scenario totals. By
//!    default the totals are live `SUMIF` formulas over the Breakdown rows
//!    whose issues cell is blank, so they match the report totals and
//!    recalculate if a row is edited.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dashcost_render::ExcelBreakdownRenderer;
//!
//! let bytes = ExcelBreakdownRenderer::new().render(&report)?;
//! std::fs::write("dashboard_conversion_costs_detailed.xlsx", bytes)?;
//! ```

use dashcost_core::{CostReport, CostedDashboard, RenderError, Renderer};
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::export::BREAKDOWN_COLUMNS;
use crate::summary::describe_issues;
use crate::to_f64;

/// Breakdown column letters used by the Summary formulas
const HOURS_COL: &str = "K";
const JR_COST_COL: &str = "N";
const MGR_COST_COL: &str = "O";
const ISSUES_COL: &str = "Q";

/// Excel breakdown renderer
#[derive(Clone, Debug)]
pub struct ExcelBreakdownRenderer {
    /// Whether to include the Summary sheet
    pub include_summary: bool,
    /// Whether Summary totals are formulas (vs static values)
    pub use_formulas: bool,
}

impl Default for ExcelBreakdownRenderer {
    fn default() -> Self {
        Self {
            include_summary: true,
            use_formulas: true,
        }
    }
}

impl ExcelBreakdownRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable the Summary sheet
    pub fn no_summary(mut self) -> Self {
        self.include_summary = false;
        self
    }

    /// Write totals as values instead of formulas
    pub fn static_values(mut self) -> Self {
        self.use_formulas = false;
        self
    }

    fn add_breakdown_sheet(
        &self,
        workbook: &mut Workbook,
        report: &CostReport,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name("Breakdown")
            .map_err(|e| RenderError::Format(e.to_string()))?;

        for (col, header) in BREAKDOWN_COLUMNS.iter().enumerate() {
            sheet
                .write_with_format(0, col as u16, *header, &formats.header)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        sheet.set_column_width(0, 32).ok();
        sheet.set_column_width(1, 16).ok();
        sheet.set_column_width(2, 18).ok();
        for col in 3..16 {
            sheet.set_column_width(col, 13).ok();
        }
        sheet.set_column_width(16, 48).ok();
        sheet.set_freeze_panes(1, 1).ok();

        for (i, dashboard) in report.rows.iter().enumerate() {
            let row = i as u32 + 1;
            write_breakdown_row(sheet, row, dashboard, formats)?;
        }

        Ok(())
    }

    fn add_summary_sheet(
        &self,
        workbook: &mut Workbook,
        report: &CostReport,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name("Summary")
            .map_err(|e| RenderError::Format(e.to_string()))?;

        sheet
            .write_with_format(0, 0, "Metric", &formats.header)
            .map_err(|e| RenderError::Format(e.to_string()))?;
        sheet
            .write_with_format(0, 1, "Value", &formats.header)
            .map_err(|e| RenderError::Format(e.to_string()))?;
        sheet.set_column_width(0, 48).ok();
        sheet.set_column_width(1, 18).ok();

        let totals = &report.totals;
        let last = report.rows.len() as u32 + 1;
        let formulas = self.use_formulas && !report.rows.is_empty();
        let sum_if_costed = |col: &str| {
            format!(
                "=SUMIF(Breakdown!{issues}2:{issues}{last},\"\",Breakdown!{col}2:{col}{last})",
                issues = ISSUES_COL,
                col = col,
                last = last
            )
        };

        // Rows 2-6: hours, role costs, role split, flat rate
        let lines: [(&str, Decimal, Option<String>, &Format); 5] = [
            (
                "Total Hours",
                totals.total_hours,
                formulas.then(|| sum_if_costed(HOURS_COL)),
                &formats.hours,
            ),
            (
                "Junior Analyst Cost",
                totals.total_jr_cost,
                formulas.then(|| sum_if_costed(JR_COST_COL)),
                &formats.currency,
            ),
            (
                "Manager Cost",
                totals.total_mgr_cost,
                formulas.then(|| sum_if_costed(MGR_COST_COL)),
                &formats.currency,
            ),
            (
                "Total Cost if Split Between Roles",
                report.role_split_total(),
                formulas.then(|| "=B3+B4".to_string()),
                &formats.total_currency,
            ),
            (
                "Single-Rate Hourly Rate",
                report.flat_rate_value(),
                None,
                &formats.currency,
            ),
        ];

        let mut row = 1u32;
        for (label, value, formula, format) in lines {
            write_summary_line(sheet, row, label, value, formula.as_deref(), format, formats)?;
            row += 1;
        }

        let flat_label = format!("Total Cost if {} Did All Work", report.flat_rate.label());
        write_summary_line(
            sheet,
            row,
            &flat_label,
            report.flat_total(),
            formulas.then_some("=B2*B6"),
            &formats.total_currency,
            formats,
        )?;
        row += 2;

        let counts = [
            ("Costed Dashboards", totals.costed_rows),
            ("Excluded Dashboards", totals.excluded_rows),
            ("Skipped Catalog Rows", report.dropped_rows),
        ];
        for (label, count) in counts {
            sheet
                .write_with_format(row, 0, label, &formats.text)
                .map_err(|e| RenderError::Format(e.to_string()))?;
            sheet
                .write_with_format(row, 1, count as f64, &formats.integer)
                .map_err(|e| RenderError::Format(e.to_string()))?;
            row += 1;
        }

        Ok(())
    }
}

fn write_breakdown_row(
    sheet: &mut Worksheet,
    row: u32,
    dashboard: &CostedDashboard,
    formats: &ExcelFormats,
) -> Result<(), RenderError> {
    let record = &dashboard.record;
    let b = &dashboard.breakdown;
    let err = |e: rust_xlsxwriter::XlsxError| RenderError::Format(e.to_string());
    let text_format = if dashboard.is_costed() {
        &formats.text
    } else {
        &formats.excluded
    };

    sheet
        .write_with_format(row, 0, record.name.as_str(), text_format)
        .map_err(err)?;
    write_optional_text(sheet, row, 1, record.tool.as_deref(), text_format)?;
    sheet
        .write_with_format(row, 2, record.conversion_level.as_str(), text_format)
        .map_err(err)?;
    match record.pages {
        Some(pages) => sheet.write_with_format(row, 3, pages, &formats.number).map_err(err)?,
        None => sheet.write_blank(row, 3, &formats.number).map_err(err)?,
    };
    write_optional_text(
        sheet,
        row,
        4,
        (!record.status.is_empty()).then_some(record.status.as_str()),
        text_format,
    )?;

    let numbers: [(Option<Decimal>, &Format); 11] = [
        (dashboard.effort.base_hours, &formats.hours),
        (dashboard.effort.junior_pct, &formats.number),
        (dashboard.effort.manager_pct, &formats.number),
        (Some(b.page_factor), &formats.factor),
        (b.status_factor, &formats.factor),
        (b.adjusted_hours, &formats.hours),
        (b.jr_hours, &formats.hours),
        (b.mgr_hours, &formats.hours),
        (b.jr_cost, &formats.currency),
        (b.mgr_cost, &formats.currency),
        (b.total_cost, &formats.currency),
    ];
    for (offset, (value, format)) in numbers.into_iter().enumerate() {
        let col = 5 + offset as u16;
        match value {
            Some(v) => sheet.write_with_format(row, col, to_f64(v), format).map_err(err)?,
            None => sheet.write_blank(row, col, format).map_err(err)?,
        };
    }

    if !dashboard.issues.is_empty() {
        sheet
            .write_with_format(row, 16, describe_issues(&dashboard.issues).as_str(), &formats.excluded)
            .map_err(err)?;
    }

    Ok(())
}

fn write_optional_text(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<&str>,
    format: &Format,
) -> Result<(), RenderError> {
    match value {
        Some(text) => sheet.write_with_format(row, col, text, format),
        None => sheet.write_blank(row, col, format),
    }
    .map_err(|e| RenderError::Format(e.to_string()))?;
    Ok(())
}

fn write_summary_line(
    sheet: &mut Worksheet,
    row: u32,
    label: &str,
    value: Decimal,
    formula: Option<&str>,
    format: &Format,
    formats: &ExcelFormats,
) -> Result<(), RenderError> {
    sheet
        .write_with_format(row, 0, label, &formats.text)
        .map_err(|e| RenderError::Format(e.to_string()))?;
    match formula {
        Some(formula) => sheet.write_formula_with_format(row, 1, formula, format),
        None => sheet.write_with_format(row, 1, to_f64(value), format),
    }
    .map_err(|e| RenderError::Format(e.to_string()))?;
    Ok(())
}

impl Renderer for ExcelBreakdownRenderer {
    type Output = Vec<u8>;

    fn render(&self, report: &CostReport) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = ExcelFormats::new();

        self.add_breakdown_sheet(&mut workbook, report, &formats)?;
        if self.include_summary {
            self.add_summary_sheet(&mut workbook, report, &formats)?;
        }

        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))
    }
}

/// Reusable cell formats
struct ExcelFormats {
    header: Format,
    text: Format,
    excluded: Format,
    number: Format,
    factor: Format,
    hours: Format,
    integer: Format,
    currency: Format,
    total_currency: Format,
}

impl ExcelFormats {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_background_color(0x4472C4)
                .set_font_color(0xFFFFFF)
                .set_border(FormatBorder::Thin),
            text: Format::new().set_border(FormatBorder::Thin),
            excluded: Format::new()
                .set_background_color(0xF2F2F2)
                .set_font_color(0x7F7F7F)
                .set_border(FormatBorder::Thin),
            number: Format::new()
                .set_num_format("#,##0.##")
                .set_border(FormatBorder::Thin),
            factor: Format::new()
                .set_num_format("0.00")
                .set_border(FormatBorder::Thin),
            hours: Format::new()
                .set_num_format("#,##0.0")
                .set_border(FormatBorder::Thin),
            integer: Format::new()
                .set_num_format("#,##0")
                .set_border(FormatBorder::Thin),
            currency: Format::new()
                .set_num_format("$#,##0.00")
                .set_border(FormatBorder::Thin),
            total_currency: Format::new()
                .set_bold()
                .set_num_format("$#,##0.00")
                .set_background_color(0xE2EFDA)
                .set_border(FormatBorder::Thin),
        }
    }
}
