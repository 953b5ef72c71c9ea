//! Cost report types
//!
//! A [`CostReport`] is the output of one estimation run: every catalog row with
//! its derived cost fields, the aggregate totals over fully costed rows, and
//! the single-rate comparison that was requested.
//!
//! Derived fields are `Option<Decimal>`. `None` means the value is undefined
//! for that row (unknown conversion level, unrecognized status, blank effort
//! cell). Undefined rows are carried in the report with their [`RowIssue`]s
//! but never contribute to [`Totals`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ConversionLevel, DashboardRecord, EffortLevel, RateTable, Role};

/// Default contractor rate in dollars per hour
pub const DEFAULT_CONTRACTOR_RATE: u32 = 43;

// ============================================================================
// Per-Row Output
// ============================================================================

/// Reason a derived field is undefined for a row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RowIssue {
    /// Conversion level has no entry in the effort table
    UnknownConversionLevel(ConversionLevel),
    /// Status is not one of active / in progress / broken
    UnrecognizedStatus(String),
    /// Effort tier has a blank base-hours cell
    MissingBaseHours,
    /// Effort tier has a blank junior percentage
    MissingJuniorPct,
    /// Effort tier has a blank manager percentage
    MissingManagerPct,
    /// A product or sum exceeded the decimal range
    ArithmeticOverflow,
}

impl RowIssue {
    /// Stable short code for the issue
    pub fn code(&self) -> &'static str {
        match self {
            RowIssue::UnknownConversionLevel(_) => "W001",
            RowIssue::UnrecognizedStatus(_) => "W002",
            RowIssue::MissingBaseHours => "W003",
            RowIssue::MissingJuniorPct => "W004",
            RowIssue::MissingManagerPct => "W005",
            RowIssue::ArithmeticOverflow => "W006",
        }
    }
}

impl std::fmt::Display for RowIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowIssue::UnknownConversionLevel(level) => {
                write!(f, "unknown conversion level '{}'", level)
            }
            RowIssue::UnrecognizedStatus(status) => write!(f, "unrecognized status '{}'", status),
            RowIssue::MissingBaseHours => f.write_str("effort level has no base hours"),
            RowIssue::MissingJuniorPct => f.write_str("effort level has no junior analyst share"),
            RowIssue::MissingManagerPct => f.write_str("effort level has no manager share"),
            RowIssue::ArithmeticOverflow => f.write_str("cost arithmetic overflowed"),
        }
    }
}

/// Derived cost fields for one dashboard
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Page-count multiplier (always defined)
    pub page_factor: Decimal,
    /// Status multiplier
    pub status_factor: Option<Decimal>,
    /// base_hours × page_factor × status_factor
    pub adjusted_hours: Option<Decimal>,
    pub jr_hours: Option<Decimal>,
    pub mgr_hours: Option<Decimal>,
    pub jr_cost: Option<Decimal>,
    pub mgr_cost: Option<Decimal>,
    /// jr_cost + mgr_cost
    pub total_cost: Option<Decimal>,
}

/// A catalog row joined with its effort tier and costed
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostedDashboard {
    pub record: DashboardRecord,
    /// Joined effort fields (all `None` when the level is unknown)
    pub effort: EffortLevel,
    pub breakdown: CostBreakdown,
    /// Why any derived field is undefined; empty for fully costed rows
    pub issues: Vec<RowIssue>,
}

impl CostedDashboard {
    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// True when hours and total cost are both defined
    pub fn is_costed(&self) -> bool {
        self.breakdown.adjusted_hours.is_some() && self.breakdown.total_cost.is_some()
    }
}

// ============================================================================
// Rates and Scenarios
// ============================================================================

/// Hourly rates resolved for the two roles
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostRates {
    pub jr_rate: Decimal,
    pub mgr_rate: Decimal,
}

impl CostRates {
    pub fn new(jr_rate: Decimal, mgr_rate: Decimal) -> Self {
        Self { jr_rate, mgr_rate }
    }

    /// Resolve role rates from a rate table; absent roles cost zero
    pub fn from_table(table: &RateTable) -> Self {
        Self {
            jr_rate: table.rate_for(Role::JuniorAnalyst),
            mgr_rate: table.rate_for(Role::Manager),
        }
    }

    pub fn rate_for(&self, role: Role) -> Decimal {
        match role {
            Role::JuniorAnalyst => self.jr_rate,
            Role::Manager => self.mgr_rate,
        }
    }
}

/// Single-rate comparison scenario
///
/// The role-split scenario is always computed; this selects what it is
/// compared against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "rate", rename_all = "snake_case")]
pub enum FlatRate {
    /// External contractor at a fixed hourly rate
    Contractor(Decimal),
    /// All hours billed at the junior analyst rate
    JuniorAnalyst,
}

impl Default for FlatRate {
    fn default() -> Self {
        FlatRate::Contractor(Decimal::from(DEFAULT_CONTRACTOR_RATE))
    }
}

impl FlatRate {
    /// Hourly rate this scenario bills at
    pub fn resolve(&self, rates: &CostRates) -> Decimal {
        match self {
            FlatRate::Contractor(rate) => *rate,
            FlatRate::JuniorAnalyst => rates.jr_rate,
        }
    }

    /// Who does all the work in this scenario
    pub fn label(&self) -> &'static str {
        match self {
            FlatRate::Contractor(_) => "Contractor",
            FlatRate::JuniorAnalyst => "Junior Analyst",
        }
    }
}

// ============================================================================
// Aggregates
// ============================================================================

/// Sums over fully costed rows
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub total_hours: Decimal,
    pub total_jr_cost: Decimal,
    pub total_mgr_cost: Decimal,
    /// Rows that contributed to the sums
    pub costed_rows: usize,
    /// Rows left out because a derived field was undefined
    pub excluded_rows: usize,
}

impl Totals {
    /// Role-split scenario total, clamped to `Decimal::MAX`
    pub fn role_split_total(&self) -> Decimal {
        self.total_jr_cost.saturating_add(self.total_mgr_cost)
    }

    /// Single-rate scenario total for the given hourly rate, clamped to
    /// `Decimal::MAX`
    pub fn flat_total(&self, rate: Decimal) -> Decimal {
        self.total_hours.saturating_mul(rate)
    }
}

/// Result of one estimation run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostReport {
    /// Every catalog row that survived filtering, in catalog order
    pub rows: Vec<CostedDashboard>,
    pub totals: Totals,
    pub rates: CostRates,
    pub flat_rate: FlatRate,
    /// Catalog rows dropped for a missing name or conversion level
    pub dropped_rows: usize,
}

impl CostReport {
    /// Hourly rate of the single-rate scenario
    pub fn flat_rate_value(&self) -> Decimal {
        self.flat_rate.resolve(&self.rates)
    }

    /// Total cost if one rate covered every hour
    pub fn flat_total(&self) -> Decimal {
        self.totals.flat_total(self.flat_rate_value())
    }

    pub fn role_split_total(&self) -> Decimal {
        self.totals.role_split_total()
    }

    pub fn costed(&self) -> impl Iterator<Item = &CostedDashboard> {
        self.rows.iter().filter(|r| r.is_costed())
    }

    pub fn excluded(&self) -> impl Iterator<Item = &CostedDashboard> {
        self.rows.iter().filter(|r| !r.is_costed())
    }
}
