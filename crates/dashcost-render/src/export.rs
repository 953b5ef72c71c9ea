//! Detailed per-dashboard CSV export
//!
//! One row per catalog dashboard with every input and derived column.
//! Undefined values are left blank; the `issues` column says why.

use dashcost_core::{CostReport, CostedDashboard, RenderError, Renderer};
use rust_decimal::Decimal;

use crate::summary::describe_issues;

/// Column headers of the breakdown export, in order
pub const BREAKDOWN_COLUMNS: [&str; 17] = [
    "name",
    "tool",
    "conversion_level",
    "pages",
    "status",
    "base_hours",
    "junior_pct",
    "manager_pct",
    "page_factor",
    "status_factor",
    "adjusted_hours",
    "jr_hours",
    "mgr_hours",
    "jr_cost",
    "mgr_cost",
    "total_cost",
    "issues",
];

/// CSV renderer for the per-dashboard breakdown
#[derive(Clone, Debug)]
pub struct CsvBreakdownRenderer {
    pub delimiter: u8,
}

impl Default for CsvBreakdownRenderer {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvBreakdownRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

fn decimal_cell(value: Option<Decimal>) -> String {
    value.map(|v| v.normalize().to_string()).unwrap_or_default()
}

/// Cell values for one row, matching [`BREAKDOWN_COLUMNS`]
pub(crate) fn breakdown_cells(row: &CostedDashboard) -> [String; 17] {
    let record = &row.record;
    let b = &row.breakdown;
    [
        record.name.clone(),
        record.tool.clone().unwrap_or_default(),
        record.conversion_level.to_string(),
        record.pages.map(|p| p.to_string()).unwrap_or_default(),
        record.status.clone(),
        decimal_cell(row.effort.base_hours),
        decimal_cell(row.effort.junior_pct),
        decimal_cell(row.effort.manager_pct),
        decimal_cell(Some(b.page_factor)),
        decimal_cell(b.status_factor),
        decimal_cell(b.adjusted_hours),
        decimal_cell(b.jr_hours),
        decimal_cell(b.mgr_hours),
        decimal_cell(b.jr_cost),
        decimal_cell(b.mgr_cost),
        decimal_cell(b.total_cost),
        describe_issues(&row.issues),
    ]
}

impl Renderer for CsvBreakdownRenderer {
    type Output = String;

    fn render(&self, report: &CostReport) -> Result<String, RenderError> {
        let csv_err = |e: csv::Error| RenderError::Format(format!("Failed to write CSV: {}", e));

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());

        writer.write_record(BREAKDOWN_COLUMNS).map_err(csv_err)?;
        for row in &report.rows {
            writer.write_record(breakdown_cells(row)).map_err(csv_err)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| RenderError::Format(format!("Failed to flush CSV: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| RenderError::Format(format!("Invalid UTF-8: {}", e)))
    }
}
