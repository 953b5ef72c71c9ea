//! Effort-level and hourly-rate lookup tables

use std::path::Path;

use dashcost_core::{ConversionLevel, EffortLevel, EffortTable, RateTable};

use crate::table::{coerce_decimal, read_table, RawTable};
use crate::LoadError;

/// Effort table headers
pub mod effort_columns {
    pub const LEVEL: &str = "conversion level";
    pub const BASE_HOURS: &str = "conversion rate hrs";
    pub const JUNIOR_PCT: &str = "junior analyst efforts";
    pub const MANAGER_PCT: &str = "manager efforts";
}

/// Rate table headers
pub mod rate_columns {
    pub const POSITION: &str = "position";
    pub const HOURLY_RATE: &str = "hourly rates";
}

/// Build the effort lookup keyed by normalized conversion level
///
/// Rows without a level are skipped. Blank or non-numeric effort cells are
/// kept as undefined so the dashboards that use that tier are flagged later.
pub fn effort_table_from(table: &RawTable) -> Result<EffortTable, LoadError> {
    let level_col = table.require_column(effort_columns::LEVEL)?;
    let hours_col = table.require_column(effort_columns::BASE_HOURS)?;
    let junior_col = table.require_column(effort_columns::JUNIOR_PCT)?;
    let manager_col = table.require_column(effort_columns::MANAGER_PCT)?;

    let mut effort = EffortTable::new();

    for row in table.rows() {
        let Some(level) = row.get(Some(level_col)) else {
            continue;
        };
        let level = ConversionLevel::new(level);
        let tier = EffortLevel {
            base_hours: row.get(Some(hours_col)).and_then(coerce_decimal),
            junior_pct: row.get(Some(junior_col)).and_then(coerce_decimal),
            manager_pct: row.get(Some(manager_col)).and_then(coerce_decimal),
        };

        if effort.insert(level.clone(), tier).is_some() {
            return Err(LoadError::DuplicateLevel(level));
        }
    }

    Ok(effort)
}

/// Build the hourly-rate lookup keyed by position
///
/// Rows with no position or no non-negative numeric rate are skipped. A repeated
/// position keeps its last rate.
pub fn rate_table_from(table: &RawTable) -> Result<RateTable, LoadError> {
    let position_col = table.require_column(rate_columns::POSITION)?;
    let rate_col = table.require_column(rate_columns::HOURLY_RATE)?;

    let mut rates = RateTable::new();

    for row in table.rows() {
        let Some(position) = row.get(Some(position_col)) else {
            continue;
        };
        let Some(rate) = row.get(Some(rate_col)).and_then(coerce_decimal) else {
            tracing::warn!(position, "hourly rate is blank or not a number; row skipped");
            continue;
        };
        if rate.is_sign_negative() {
            tracing::warn!(position, %rate, "negative hourly rate; row skipped");
            continue;
        }
        if let Some(previous) = rates.insert(position, rate) {
            tracing::warn!(position, %previous, %rate, "position listed twice; using the later rate");
        }
    }

    Ok(rates)
}

/// Read the effort-level table
pub fn load_effort_table(path: &Path) -> Result<EffortTable, LoadError> {
    let table = read_table("effort levels", path)?;
    effort_table_from(&table)
}

/// Read the hourly-rate table
pub fn load_rate_table(path: &Path) -> Result<RateTable, LoadError> {
    let table = read_table("hourly rates", path)?;
    rate_table_from(&table)
}
