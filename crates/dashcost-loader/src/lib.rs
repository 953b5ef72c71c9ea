//! # dashcost-loader
//!
//! Reads the three estimator inputs into domain tables.
//!
//! This crate provides:
//! - CSV and spreadsheet (XLSX/XLSM/XLS/ODS) reading into a header-normalized [`RawTable`]
//! - Catalog filtering and renaming into [`dashcost_core::Catalog`]
//! - Effort-level and hourly-rate lookup construction
//!
//! Headers are matched case and whitespace insensitively. Cell values are
//! coerced best-effort: anything that is not a number where a number is
//! expected becomes undefined rather than an error.
//!
//! ## Example
//!
//! ```rust,no_run
//! use dashcost_loader::{load_inputs, InputPaths};
//!
//! let inputs = load_inputs(&InputPaths::default())?;
//! println!("{} dashboards", inputs.catalog.records.len());
//! # Ok::<(), dashcost_loader::LoadError>(())
//! ```

pub mod catalog;
pub mod lookup;
pub mod table;

pub use catalog::{filter_catalog, load_catalog};
pub use lookup::{effort_table_from, load_effort_table, load_rate_table, rate_table_from};
pub use table::{coerce_decimal, coerce_number, read_table, RawTable};

use dashcost_core::{ConversionLevel, Inputs};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Loading error
///
/// Every variant is fatal for the run.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to open spreadsheet {}: {source}", path.display())]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("Spreadsheet {} has no worksheets", path.display())]
    EmptyWorkbook { path: PathBuf },

    #[error("The {table} table is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("Conversion level '{0}' appears more than once in the effort table")]
    DuplicateLevel(ConversionLevel),
}

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-separated values
    Csv,
    /// Workbook read through calamine (first sheet only)
    Spreadsheet,
}

/// Detect file format from extension
pub fn detect_format(path: &Path) -> FileFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => FileFormat::Spreadsheet,
        _ => FileFormat::Csv,
    }
}

/// Locations of the three input tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    pub catalog: PathBuf,
    pub effort_levels: PathBuf,
    pub rates: PathBuf,
}

impl Default for InputPaths {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("dashboard_catalog.xlsx"),
            effort_levels: PathBuf::from("effort_levels.xlsx"),
            rates: PathBuf::from("hourly_rates.xlsx"),
        }
    }
}

/// Load catalog, effort levels and rates
pub fn load_inputs(paths: &InputPaths) -> Result<Inputs, LoadError> {
    let catalog = load_catalog(&paths.catalog)?;
    let effort = load_effort_table(&paths.effort_levels)?;
    let rates = load_rate_table(&paths.rates)?;

    tracing::info!(
        dashboards = catalog.records.len(),
        dropped = catalog.dropped_rows,
        levels = effort.len(),
        positions = rates.len(),
        "inputs loaded"
    );

    Ok(Inputs {
        catalog,
        effort,
        rates,
    })
}
