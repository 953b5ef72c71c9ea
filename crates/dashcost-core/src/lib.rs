//! # dashcost-core
//!
//! Core domain model and traits for the dashcost conversion estimator.
//!
//! This crate provides:
//! - Input types: `DashboardRecord`, `Catalog`, `EffortTable`, `RateTable`, `Inputs`
//! - Report types: `CostedDashboard`, `CostBreakdown`, `Totals`, `CostReport`
//! - The `Renderer` trait and error types
//!
//! ## Example
//!
//! ```rust
//! use dashcost_core::{ConversionLevel, DashboardRecord, DashboardStatus};
//!
//! let record = DashboardRecord::new("Sales", " Medium ")
//!     .pages(3.0)
//!     .status("Active");
//!
//! assert_eq!(record.conversion_level, ConversionLevel::new("medium"));
//! assert_eq!(record.known_status(), Some(DashboardStatus::Active));
//! ```

pub mod report;

pub use report::{
    CostBreakdown, CostRates, CostReport, CostedDashboard, FlatRate, RowIssue, Totals,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// ============================================================================
// Keys
// ============================================================================

/// Normalize a lookup key: surrounding whitespace removed, lowercased.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Conversion-level tier key (e.g. "low", "medium", "high")
///
/// Always stored normalized, so `"Medium "` and `"medium"` are the same key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversionLevel(String);

impl ConversionLevel {
    pub fn new(raw: &str) -> Self {
        Self(normalize_key(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConversionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operational status of a legacy dashboard
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardStatus {
    Active,
    InProgress,
    Broken,
}

impl DashboardStatus {
    /// Parse a status cell. Matching is case and whitespace insensitive;
    /// anything else is unrecognized.
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_key(raw).as_str() {
            "active" => Some(DashboardStatus::Active),
            "in progress" => Some(DashboardStatus::InProgress),
            "broken" => Some(DashboardStatus::Broken),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardStatus::Active => "active",
            DashboardStatus::InProgress => "in progress",
            DashboardStatus::Broken => "broken",
        }
    }
}

impl std::fmt::Display for DashboardStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// One dashboard from the catalog
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardRecord {
    /// Dashboard name (never empty)
    pub name: String,
    /// Source visualization tool, informational only
    pub tool: Option<String>,
    /// Estimated conversion level
    pub conversion_level: ConversionLevel,
    /// Available data pages, `None` when blank or non-numeric
    pub pages: Option<f64>,
    /// Normalized status text
    pub status: String,
}

impl DashboardRecord {
    pub fn new(name: impl Into<String>, conversion_level: &str) -> Self {
        Self {
            name: name.into(),
            tool: None,
            conversion_level: ConversionLevel::new(conversion_level),
            pages: None,
            status: String::new(),
        }
    }

    /// Set the source tool
    pub fn tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }

    /// Set the page count
    pub fn pages(mut self, pages: f64) -> Self {
        self.pages = Some(pages);
        self
    }

    /// Set the status (normalized on the way in)
    pub fn status(mut self, status: &str) -> Self {
        self.status = normalize_key(status);
        self
    }

    /// The status as a known variant, if it is one
    pub fn known_status(&self) -> Option<DashboardStatus> {
        DashboardStatus::parse(&self.status)
    }
}

/// Filtered dashboard catalog
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Rows with both a name and a conversion level, in source order
    pub records: Vec<DashboardRecord>,
    /// Source rows dropped for a missing name or conversion level
    pub dropped_rows: usize,
}

impl Catalog {
    pub fn new(records: Vec<DashboardRecord>) -> Self {
        Self {
            records,
            dropped_rows: 0,
        }
    }
}

/// Everything one estimation run reads
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Inputs {
    pub catalog: Catalog,
    pub effort: EffortTable,
    pub rates: RateTable,
}

// ============================================================================
// Effort Levels
// ============================================================================

/// Baseline effort for one conversion-level tier
///
/// A blank or non-numeric source cell is `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffortLevel {
    /// Baseline conversion hours
    pub base_hours: Option<Decimal>,
    /// Share of hours attributed to the junior analyst (0-100)
    pub junior_pct: Option<Decimal>,
    /// Share of hours attributed to the manager (0-100)
    pub manager_pct: Option<Decimal>,
}

impl EffortLevel {
    pub fn new(base_hours: Decimal, junior_pct: Decimal, manager_pct: Decimal) -> Self {
        Self {
            base_hours: Some(base_hours),
            junior_pct: Some(junior_pct),
            manager_pct: Some(manager_pct),
        }
    }
}

/// Lookup of effort by conversion level
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EffortTable {
    levels: BTreeMap<ConversionLevel, EffortLevel>,
}

impl EffortTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, level: &str, effort: EffortLevel) -> Self {
        self.insert(ConversionLevel::new(level), effort);
        self
    }

    /// Insert a tier, returning the entry it replaced
    pub fn insert(&mut self, level: ConversionLevel, effort: EffortLevel) -> Option<EffortLevel> {
        self.levels.insert(level, effort)
    }

    pub fn get(&self, level: &ConversionLevel) -> Option<&EffortLevel> {
        self.levels.get(level)
    }

    pub fn contains(&self, level: &ConversionLevel) -> bool {
        self.levels.contains_key(level)
    }

    /// Iterate tiers in key order
    pub fn iter(&self) -> impl Iterator<Item = (&ConversionLevel, &EffortLevel)> {
        self.levels.iter()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

// ============================================================================
// Rates
// ============================================================================

/// Labor roles that share conversion work
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    JuniorAnalyst,
    Manager,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::JuniorAnalyst, Role::Manager];

    /// Position name as it appears in the rate table
    pub fn position(&self) -> &'static str {
        match self {
            Role::JuniorAnalyst => "Junior Analyst",
            Role::Manager => "Manager",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.position())
    }
}

/// Hourly rate by position name
///
/// Position lookup ignores case and surrounding whitespace.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    rates: BTreeMap<String, Decimal>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, position: &str, rate: Decimal) -> Self {
        self.insert(position, rate);
        self
    }

    pub fn insert(&mut self, position: &str, rate: Decimal) -> Option<Decimal> {
        self.rates.insert(normalize_key(position), rate)
    }

    pub fn get(&self, position: &str) -> Option<Decimal> {
        self.rates.get(&normalize_key(position)).copied()
    }

    /// Rate for a role, zero when the role is absent
    pub fn rate_for(&self, role: Role) -> Decimal {
        self.get(role.position()).unwrap_or(Decimal::ZERO)
    }

    pub fn contains(&self, role: Role) -> bool {
        self.get(role.position()).is_some()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a cost report to the output format
    fn render(&self, report: &CostReport) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================
