//! End-to-end cost scenarios through `estimate`

use dashcost_core::{
    Catalog, DashboardRecord, EffortLevel, EffortTable, FlatRate, Inputs, RateTable, RowIssue,
};
use dashcost_model::estimate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn effort() -> EffortTable {
    EffortTable::new()
        .with("Low", EffortLevel::new(dec!(4), dec!(80), dec!(20)))
        .with("Medium", EffortLevel::new(dec!(10), dec!(70), dec!(30)))
        .with("High", EffortLevel::new(dec!(24), dec!(60), dec!(40)))
}

fn rates() -> RateTable {
    RateTable::new()
        .with("Junior Analyst", dec!(50))
        .with("Manager", dec!(100))
}

fn portfolio() -> Inputs {
    let mut catalog = Catalog::new(vec![
        DashboardRecord::new("Sales", "medium").tool("Tableau").pages(3.0).status("active"),
        DashboardRecord::new("Finance", "HIGH").tool("Qlik").pages(15.0).status("in progress"),
        DashboardRecord::new("Ops", "low").status("broken"),
        DashboardRecord::new("Ghost", "medium").pages(2.0).status("unknown"),
        DashboardRecord::new("Orphan", "extreme").pages(1.0).status("active"),
    ]);
    catalog.dropped_rows = 3;

    Inputs {
        catalog,
        effort: effort(),
        rates: rates(),
    }
}

#[test]
fn contractor_comparison_uses_fixed_rate() {
    let report = estimate(&portfolio(), FlatRate::default());

    // Sales 11h, Finance 24 × 1.45 × 1.1 = 38.28h, Ops 5.2h
    assert_eq!(report.totals.total_hours, dec!(54.48));
    assert_eq!(report.flat_rate_value(), dec!(43));
    assert_eq!(report.flat_total(), dec!(2342.64));
}

#[test]
fn junior_comparison_uses_junior_rate() {
    let report = estimate(&portfolio(), FlatRate::JuniorAnalyst);

    assert_eq!(report.flat_rate_value(), dec!(50));
    assert_eq!(report.flat_total(), dec!(2724));
}

#[test]
fn role_split_totals() {
    let report = estimate(&portfolio(), FlatRate::default());

    // jr: 385 + 38.28×0.6×50 + 208 = 1741.4
    // mgr: 330 + 38.28×0.4×100 + 104 = 1965.2
    assert_eq!(report.totals.total_jr_cost, dec!(1741.4));
    assert_eq!(report.totals.total_mgr_cost, dec!(1965.2));
    assert_eq!(report.role_split_total(), dec!(3706.6));
}

#[test]
fn excluded_rows_are_flagged_and_kept_in_report() {
    let report = estimate(&portfolio(), FlatRate::default());

    assert_eq!(report.rows.len(), 5);
    assert_eq!(report.totals.costed_rows, 3);
    assert_eq!(report.totals.excluded_rows, 2);
    assert_eq!(report.dropped_rows, 3);

    let excluded: Vec<_> = report.excluded().map(|r| (r.name(), r.issues.clone())).collect();
    assert_eq!(excluded.len(), 2);
    assert_eq!(excluded[0].0, "Ghost");
    assert_eq!(excluded[0].1, vec![RowIssue::UnrecognizedStatus("unknown".into())]);
    assert_eq!(excluded[1].0, "Orphan");
}

#[test]
fn every_costed_row_balances() {
    let report = estimate(&portfolio(), FlatRate::default());

    for row in report.costed() {
        let b = &row.breakdown;
        assert_eq!(b.total_cost, Some(b.jr_cost.unwrap() + b.mgr_cost.unwrap()), "{}", row.name());
    }

    let summed: Decimal = report.costed().filter_map(|r| r.breakdown.adjusted_hours).sum();
    assert_eq!(summed, report.totals.total_hours);
}

#[test]
fn pages_beyond_cap_use_top_factor() {
    let report = estimate(&portfolio(), FlatRate::default());
    let finance = report.rows.iter().find(|r| r.name() == "Finance").unwrap();
    assert_eq!(finance.breakdown.page_factor, dec!(1.45));
}

#[test]
fn reruns_are_identical() {
    let inputs = portfolio();
    let first = estimate(&inputs, FlatRate::default());
    let second = estimate(&inputs, FlatRate::default());

    assert_eq!(first, second);
    assert_eq!(first.totals.total_hours.to_string(), second.totals.total_hours.to_string());
    assert_eq!(first.role_split_total().to_string(), second.role_split_total().to_string());
}

#[test]
fn missing_rates_cost_zero() {
    let mut inputs = portfolio();
    inputs.rates = RateTable::new();
    let report = estimate(&inputs, FlatRate::JuniorAnalyst);

    assert_eq!(report.totals.total_hours, dec!(54.48));
    assert_eq!(report.role_split_total(), Decimal::ZERO);
    assert_eq!(report.flat_total(), Decimal::ZERO);
}
