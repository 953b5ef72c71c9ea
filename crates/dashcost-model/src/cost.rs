//! Per-dashboard cost computation
//!
//! ```text
//! adjusted_hours = base_hours × page_factor × status_factor
//! jr_hours       = adjusted_hours × junior_pct / 100
//! mgr_hours      = adjusted_hours × manager_pct / 100
//! jr_cost        = jr_hours × jr_rate
//! mgr_cost       = mgr_hours × mgr_rate
//! total_cost     = jr_cost + mgr_cost
//! ```
//!
//! An undefined input leaves every field that depends on it undefined. The
//! model never fails; it records a [`RowIssue`] for each cause instead.

use dashcost_core::{
    CostBreakdown, CostRates, CostedDashboard, DashboardRecord, EffortLevel, EffortTable, RowIssue,
};
use rust_decimal::Decimal;

use crate::factors::{page_factor, status_factor};

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Look up the effort tier for a record's conversion level
pub fn join_effort<'a>(record: &DashboardRecord, effort: &'a EffortTable) -> Option<&'a EffortLevel> {
    effort.get(&record.conversion_level)
}

/// Cost model over fixed effort and rate tables
#[derive(Clone, Copy, Debug)]
pub struct CostModel<'a> {
    effort: &'a EffortTable,
    rates: CostRates,
}

impl<'a> CostModel<'a> {
    pub fn new(effort: &'a EffortTable, rates: CostRates) -> Self {
        Self { effort, rates }
    }

    pub fn rates(&self) -> CostRates {
        self.rates
    }

    /// Cost one dashboard
    pub fn cost(&self, record: &DashboardRecord) -> CostedDashboard {
        let mut issues = Vec::new();

        let effort = match join_effort(record, self.effort) {
            Some(tier) => {
                if tier.base_hours.is_none() {
                    issues.push(RowIssue::MissingBaseHours);
                }
                if tier.junior_pct.is_none() {
                    issues.push(RowIssue::MissingJuniorPct);
                }
                if tier.manager_pct.is_none() {
                    issues.push(RowIssue::MissingManagerPct);
                }
                tier.clone()
            }
            None => {
                issues.push(RowIssue::UnknownConversionLevel(record.conversion_level.clone()));
                EffortLevel::default()
            }
        };

        let status = status_factor(&record.status);
        if status.is_none() {
            issues.push(RowIssue::UnrecognizedStatus(record.status.clone()));
        }

        let mut calc = Calc::default();
        let pages = page_factor(record.pages);

        let paged_hours = calc.mul(effort.base_hours, Some(pages));
        let adjusted_hours = calc.mul(paged_hours, status);
        let jr_hours = calc.mul(adjusted_hours, effort.junior_pct.map(|p| p / ONE_HUNDRED));
        let mgr_hours = calc.mul(adjusted_hours, effort.manager_pct.map(|p| p / ONE_HUNDRED));
        let jr_cost = calc.mul(jr_hours, Some(self.rates.jr_rate));
        let mgr_cost = calc.mul(mgr_hours, Some(self.rates.mgr_rate));
        let total_cost = calc.add(jr_cost, mgr_cost);

        if calc.overflowed {
            issues.push(RowIssue::ArithmeticOverflow);
        }

        CostedDashboard {
            record: record.clone(),
            effort,
            breakdown: CostBreakdown {
                page_factor: pages,
                status_factor: status,
                adjusted_hours,
                jr_hours,
                mgr_hours,
                jr_cost,
                mgr_cost,
                total_cost,
            },
            issues,
        }
    }

    /// Cost every dashboard, preserving order
    pub fn cost_all(&self, records: &[DashboardRecord]) -> Vec<CostedDashboard> {
        records.iter().map(|r| self.cost(r)).collect()
    }
}

/// Checked arithmetic over undefined-propagating values
#[derive(Default)]
struct Calc {
    overflowed: bool,
}

impl Calc {
    fn mul(&mut self, a: Option<Decimal>, b: Option<Decimal>) -> Option<Decimal> {
        let product = a?.checked_mul(b?);
        self.overflowed |= product.is_none();
        product.map(|d| d.normalize())
    }

    fn add(&mut self, a: Option<Decimal>, b: Option<Decimal>) -> Option<Decimal> {
        let sum = a?.checked_add(b?);
        self.overflowed |= sum.is_none();
        sum.map(|d| d.normalize())
    }
}
