//! # dashcost-model
//!
//! Conversion cost model for dashboard migrations.
//!
//! This crate provides:
//! - Effort lookup join by conversion level
//! - Page-count and status multipliers
//! - Per-dashboard hours and role costs
//! - Aggregate totals and the single-rate comparison scenario
//!
//! ## Example
//!
//! ```rust
//! use dashcost_core::{Catalog, DashboardRecord, EffortLevel, EffortTable, FlatRate, Inputs, RateTable};
//! use dashcost_model::estimate;
//! use rust_decimal_macros::dec;
//!
//! let inputs = Inputs {
//!     catalog: Catalog::new(vec![
//!         DashboardRecord::new("Sales", "medium").pages(3.0).status("active"),
//!     ]),
//!     effort: EffortTable::new().with("medium", EffortLevel::new(dec!(10), dec!(70), dec!(30))),
//!     rates: RateTable::new().with("Junior Analyst", dec!(50)).with("Manager", dec!(100)),
//! };
//!
//! let report = estimate(&inputs, FlatRate::default());
//! assert_eq!(report.totals.total_hours, dec!(11));
//! assert_eq!(report.role_split_total(), dec!(715));
//! assert_eq!(report.flat_total(), dec!(473));
//! ```

pub mod aggregate;
pub mod cost;
pub mod factors;

pub use aggregate::aggregate;
pub use cost::{join_effort, CostModel};
pub use factors::{page_factor, status_factor, status_multiplier, MAX_PAGES};

use dashcost_core::{CostRates, CostReport, FlatRate, Inputs, Role};

/// Run the cost model over loaded inputs
///
/// `flat_rate` selects the single-rate scenario compared against the role split.
pub fn estimate(inputs: &Inputs, flat_rate: FlatRate) -> CostReport {
    for role in Role::ALL {
        if !inputs.rates.contains(role) {
            tracing::warn!(position = role.position(), "no hourly rate found; costing this role at 0");
        }
    }

    let rates = CostRates::from_table(&inputs.rates);
    let model = CostModel::new(&inputs.effort, rates);
    let mut rows = model.cost_all(&inputs.catalog.records);
    let totals = aggregate(&mut rows);

    for row in rows.iter().filter(|r| !r.is_costed()) {
        let reasons: Vec<String> = row.issues.iter().map(|i| i.to_string()).collect();
        tracing::warn!(
            dashboard = row.name(),
            reasons = %reasons.join("; "),
            "dashboard excluded from totals"
        );
    }

    tracing::info!(
        costed = totals.costed_rows,
        excluded = totals.excluded_rows,
        hours = %totals.total_hours,
        "estimate complete"
    );

    CostReport {
        rows,
        totals,
        rates,
        flat_rate,
        dropped_rows: inputs.catalog.dropped_rows,
    }
}
