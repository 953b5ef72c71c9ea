//! Input diagnostics for `dashcost check`
//!
//! Text output is one line per finding, prefixed with its code:
//!
//! ```text
//! Loaded 5 dashboards (2 catalog rows skipped)
//! Lookups: 3 effort levels, 2 positions
//! Costed: 3, excluded: 2
//! W002 Ghost: unrecognized status 'unknown'
//! W001 Orphan: unknown conversion level 'extreme'
//! ```

use anyhow::Result;
use dashcost_core::{CostReport, Inputs, Role};
use serde_json::json;

/// Roles with no entry in the rate table
fn missing_roles(inputs: &Inputs) -> Vec<&'static str> {
    Role::ALL
        .into_iter()
        .filter(|role| !inputs.rates.contains(*role))
        .map(|role| role.position())
        .collect()
}

pub fn render_text(inputs: &Inputs, report: &CostReport) -> String {
    let mut lines = vec![
        format!(
            "Loaded {} dashboards ({} catalog rows skipped)",
            inputs.catalog.records.len(),
            inputs.catalog.dropped_rows
        ),
        format!(
            "Lookups: {} effort levels, {} positions",
            inputs.effort.len(),
            inputs.rates.len()
        ),
        format!(
            "Costed: {}, excluded: {}",
            report.totals.costed_rows, report.totals.excluded_rows
        ),
    ];

    for position in missing_roles(inputs) {
        lines.push(format!("W000 no hourly rate for '{}'; costed at 0", position));
    }

    for row in report.excluded() {
        for issue in &row.issues {
            lines.push(format!("{} {}: {}", issue.code(), row.name(), issue));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn render_json(inputs: &Inputs, report: &CostReport) -> Result<String> {
    let issues: Vec<_> = report
        .excluded()
        .flat_map(|row| {
            row.issues.iter().map(move |issue| {
                json!({
                    "dashboard": row.name(),
                    "code": issue.code(),
                    "message": issue.to_string(),
                })
            })
        })
        .collect();

    let value = json!({
        "dashboards": inputs.catalog.records.len(),
        "dropped_rows": inputs.catalog.dropped_rows,
        "effort_levels": inputs.effort.len(),
        "positions": inputs.rates.len(),
        "missing_rates": missing_roles(inputs),
        "costed_rows": report.totals.costed_rows,
        "excluded_rows": report.totals.excluded_rows,
        "issues": issues,
    });

    let mut out = serde_json::to_string_pretty(&value)?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashcost_core::{Catalog, DashboardRecord, EffortLevel, EffortTable, FlatRate, RateTable};
    use rust_decimal::Decimal;

    fn inputs() -> Inputs {
        let mut catalog = Catalog::new(vec![
            DashboardRecord::new("Sales", "medium").pages(3.0).status("active"),
            DashboardRecord::new("Orphan", "extreme").status("retired"),
        ]);
        catalog.dropped_rows = 1;
        Inputs {
            catalog,
            effort: EffortTable::new().with("medium", EffortLevel::new(Decimal::TEN, Decimal::from(70), Decimal::from(30))),
            rates: RateTable::new().with("Junior Analyst", Decimal::from(50)),
        }
    }

    #[test]
    fn text_lists_every_issue() {
        let inputs = inputs();
        let report = dashcost_model::estimate(&inputs, FlatRate::default());
        let text = render_text(&inputs, &report);

        assert!(text.starts_with("Loaded 2 dashboards (1 catalog rows skipped)\n"));
        assert!(text.contains("Lookups: 1 effort levels, 1 positions\n"));
        assert!(text.contains("Costed: 1, excluded: 1\n"));
        assert!(text.contains("W000 no hourly rate for 'Manager'"));
        assert!(text.contains("W001 Orphan: unknown conversion level 'extreme'\n"));
        assert!(text.contains("W002 Orphan: unrecognized status 'retired'\n"));
    }

    #[test]
    fn json_counts() {
        let inputs = inputs();
        let report = dashcost_model::estimate(&inputs, FlatRate::default());
        let value: serde_json::Value = serde_json::from_str(&render_json(&inputs, &report).unwrap()).unwrap();

        assert_eq!(value["dashboards"], 2);
        assert_eq!(value["dropped_rows"], 1);
        assert_eq!(value["missing_rates"][0], "Manager");
        assert_eq!(value["issues"].as_array().unwrap().len(), 2);
        assert_eq!(value["issues"][0]["code"], "W001");
    }
}
