//! Dashboard catalog filtering and renaming

use std::path::Path;

use dashcost_core::{Catalog, DashboardRecord};

use crate::table::{coerce_number, read_table, RawTable};
use crate::LoadError;

/// Source column headers (after normalization)
pub mod columns {
    pub const NAME: &str = "dashboard name";
    pub const TOOL: &str = "data visualization tool";
    pub const CONVERSION_LEVEL: &str = "estimated conversion level";
    pub const PAGES: &str = "available data pages";
    pub const STATUS: &str = "status";
}

/// Keep rows with a name and a conversion level, mapped onto [`DashboardRecord`]
///
/// Cells are trimmed first, so a whitespace-only name or level counts as
/// missing and the row is dropped rather than excluded later.
///
/// Name and conversion level columns are required. Tool, pages and status
/// columns may be absent, in which case every row reads them as blank.
pub fn filter_catalog(table: &RawTable) -> Result<Catalog, LoadError> {
    let name_col = table.require_column(columns::NAME)?;
    let level_col = table.require_column(columns::CONVERSION_LEVEL)?;
    let tool_col = table.column(columns::TOOL);
    let pages_col = table.column(columns::PAGES);
    let status_col = table.column(columns::STATUS);

    if status_col.is_none() {
        tracing::warn!(table = table.name(), "no status column; every dashboard will be uncosted");
    }

    let mut catalog = Catalog::default();

    for (index, row) in table.rows().enumerate() {
        let (Some(name), Some(level)) = (row.get(Some(name_col)), row.get(Some(level_col))) else {
            tracing::debug!(row = index + 2, "catalog row dropped: missing name or conversion level");
            catalog.dropped_rows += 1;
            continue;
        };

        let mut record = DashboardRecord::new(name, level).status(row.get(status_col).unwrap_or(""));
        record.tool = row.get(tool_col).map(str::to_string);
        record.pages = row.get(pages_col).and_then(coerce_number);

        catalog.records.push(record);
    }

    Ok(catalog)
}

/// Read and filter the dashboard catalog
pub fn load_catalog(path: &Path) -> Result<Catalog, LoadError> {
    let table = read_table("catalog", path)?;
    filter_catalog(&table)
}
