//! Scenario totals
//!
//! Only fully costed rows are summed. A row with any undefined hour or cost
//! field is excluded from every total and counted in `excluded_rows`, so
//! an unmatched lookup never shows up as a silent zero.

use dashcost_core::{CostedDashboard, RowIssue, Totals};

/// Sum hours and role costs over costed rows
///
/// A row whose addition would overflow a running total is left out and
/// flagged with `RowIssue::ArithmeticOverflow`; its hours and total cost
/// become undefined so it reads as excluded everywhere else.
pub fn aggregate(rows: &mut [CostedDashboard]) -> Totals {
    let mut totals = Totals::default();

    for row in rows.iter_mut() {
        let b = &row.breakdown;
        let (true, Some(hours), Some(jr_cost), Some(mgr_cost)) =
            (row.is_costed(), b.adjusted_hours, b.jr_cost, b.mgr_cost)
        else {
            totals.excluded_rows += 1;
            continue;
        };

        let (Some(total_hours), Some(total_jr_cost), Some(total_mgr_cost)) = (
            totals.total_hours.checked_add(hours),
            totals.total_jr_cost.checked_add(jr_cost),
            totals.total_mgr_cost.checked_add(mgr_cost),
        ) else {
            tracing::warn!(dashboard = row.name(), "running totals overflowed; row left out");
            row.breakdown.adjusted_hours = None;
            row.breakdown.total_cost = None;
            row.issues.push(RowIssue::ArithmeticOverflow);
            totals.excluded_rows += 1;
            continue;
        };

        totals.total_hours = total_hours;
        totals.total_jr_cost = total_jr_cost;
        totals.total_mgr_cost = total_mgr_cost;
        totals.costed_rows += 1;
    }

    totals.total_hours = totals.total_hours.normalize();
    totals.total_jr_cost = totals.total_jr_cost.normalize();
    totals.total_mgr_cost = totals.total_mgr_cost.normalize();
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CostModel;
    use dashcost_core::{CostRates, DashboardRecord, EffortLevel, EffortTable};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn rows(records: &[DashboardRecord]) -> Vec<CostedDashboard> {
        let effort = EffortTable::new()
            .with("low", EffortLevel::new(dec!(4), dec!(80), dec!(20)))
            .with("medium", EffortLevel::new(dec!(10), dec!(70), dec!(30)));
        CostModel::new(&effort, CostRates::new(dec!(50), dec!(100))).cost_all(records)
    }

    #[test]
    fn empty_catalog_sums_to_zero() {
        let totals = aggregate(&mut []);
        assert_eq!(totals, Totals::default());
        assert_eq!(totals.role_split_total(), Decimal::ZERO);
    }

    #[test]
    fn sums_costed_rows() {
        let mut rows = rows(&[
            DashboardRecord::new("Sales", "medium").pages(3.0).status("active"),
            DashboardRecord::new("Ops", "low").status("broken"),
        ]);
        let totals = aggregate(&mut rows);

        // 11 + 5.2 hours; jr 385 + 208, mgr 330 + 104
        assert_eq!(totals.total_hours, dec!(16.2));
        assert_eq!(totals.total_jr_cost, dec!(593));
        assert_eq!(totals.total_mgr_cost, dec!(434));
        assert_eq!(totals.role_split_total(), dec!(1027));
        assert_eq!(totals.costed_rows, 2);
        assert_eq!(totals.excluded_rows, 0);
    }

    #[test]
    fn undefined_rows_are_dropped_not_zeroed() {
        let mut rows = rows(&[
            DashboardRecord::new("Sales", "medium").pages(3.0).status("active"),
            DashboardRecord::new("Ghost", "medium").pages(3.0).status("unknown"),
            DashboardRecord::new("Orphan", "extreme").status("active"),
        ]);
        let totals = aggregate(&mut rows);

        assert_eq!(totals.total_hours, dec!(11));
        assert_eq!(totals.total_jr_cost, dec!(385));
        assert_eq!(totals.total_mgr_cost, dec!(330));
        assert_eq!(totals.costed_rows, 1);
        assert_eq!(totals.excluded_rows, 2);
    }

    #[test]
    fn overflowing_row_is_flagged_and_left_out() {
        let mut rows = rows(&[
            DashboardRecord::new("Huge", "medium").status("active"),
            DashboardRecord::new("Sales", "medium").pages(3.0).status("active"),
        ]);
        rows[0].breakdown.adjusted_hours = Some(Decimal::MAX);

        let totals = aggregate(&mut rows);

        assert_eq!(totals.total_hours, Decimal::MAX);
        assert_eq!(totals.costed_rows, 1);
        assert_eq!(totals.excluded_rows, 1);
        assert!(!rows[1].is_costed());
        assert_eq!(rows[1].issues, vec![RowIssue::ArithmeticOverflow]);
        // the first row's costs still count
        assert_eq!(totals.total_jr_cost, dec!(350));
    }

    #[test]
    fn sum_is_order_independent() {
        let mut records = vec![
            DashboardRecord::new("a", "medium").pages(9.0).status("in progress"),
            DashboardRecord::new("b", "low").pages(2.0).status("broken"),
            DashboardRecord::new("c", "medium").status("active"),
        ];
        let forward = aggregate(&mut rows(&records));
        records.reverse();
        let backward = aggregate(&mut rows(&records));

        assert_eq!(forward, backward);
    }
}
