//! `dashcost estimate` end-to-end tests
//!
//! Each test runs the built binary against the CSV fixtures and writes into
//! a fresh temporary directory.
//!
//! ## Exit Code Contract
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Success, including runs with excluded rows |
//! | 1 | Unreadable input, missing column, or write failure |

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn dashcost() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dashcost"));
    for var in [
        "DASHCOST_CATALOG",
        "DASHCOST_EFFORT_LEVELS",
        "DASHCOST_RATES",
        "DASHCOST_COMPARE",
        "DASHCOST_CONTRACTOR_RATE",
        "DASHCOST_OUTPUT_DIR",
        "DASHCOST_FORMAT",
        "DASHCOST_EXPORT",
        "DASHCOST_NO_CHARTS",
        "DASHCOST_TARGET",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// `estimate` against the fixtures, writing into `out`
fn estimate(out: &Path, extra: &[&str]) -> Output {
    let fixtures = fixtures_dir();
    dashcost()
        .arg("estimate")
        .arg("--catalog")
        .arg(fixtures.join("dashboard_catalog.csv"))
        .arg("--effort-levels")
        .arg(fixtures.join("effort_levels.csv"))
        .arg("--rates")
        .arg(fixtures.join("hourly_rates.csv"))
        .arg("--output-dir")
        .arg(out)
        .args(extra)
        .output()
        .expect("failed to execute dashcost")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn contractor_mode_prints_summary() {
    let dir = TempDir::new().unwrap();
    let output = estimate(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Total Hours Required for All Dashboard Conversions: 54.5 hours"));
    assert!(text.contains("Total Cost if Contractor Did All Work (@ $43/hr): $2,342.64"));
    assert!(text.contains("Total Cost if Split Between Roles: $3,706.60"));
    assert!(text.contains("2 catalog row(s) skipped"));
    assert!(text.contains("2 dashboard(s) excluded from totals:"));
}

#[test]
fn contractor_mode_writes_one_comparison_chart_and_heatmaps() {
    let dir = TempDir::new().unwrap();
    let output = estimate(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    assert!(dir.path().join("combined_conversion_cost_comparison.svg").exists());
    assert!(dir.path().join("per_dashboard_conversion_cost_heatmap.svg").exists());
    assert!(dir.path().join("per_dashboard_conversion_hours_heatmap.svg").exists());
    assert!(!dir.path().join("total_conversion_cost_by_role.svg").exists());

    let heatmap = std::fs::read_to_string(dir.path().join("per_dashboard_conversion_cost_heatmap.svg")).unwrap();
    assert!(heatmap.starts_with("<svg"));
    assert!(heatmap.contains("Convert to Power BI"));
}

#[test]
fn junior_mode_writes_two_charts() {
    let dir = TempDir::new().unwrap();
    let output = estimate(dir.path(), &["--compare", "junior"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert!(text.contains("Total Cost if Junior Analyst Did All Work: $2,724.00"));
    assert!(text.contains("Total Cost if Split Between Roles (Based on Effort): $3,706.60"));

    assert!(dir.path().join("total_conversion_cost_by_role.svg").exists());
    assert!(dir.path().join("total_conversion_cost_contractor_only.svg").exists());
    assert!(!dir.path().join("combined_conversion_cost_comparison.svg").exists());
}

#[test]
fn custom_contractor_rate() {
    let dir = TempDir::new().unwrap();
    let output = estimate(dir.path(), &["--contractor-rate", "50"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("(@ $50/hr): $2,724.00"));
}

#[test]
fn negative_rate_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    let output = estimate(dir.path(), &["--contractor-rate=-5"]);
    assert_ne!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("must not be negative"));
}

#[test]
fn no_charts_skips_svg_output() {
    let dir = TempDir::new().unwrap();
    let output = estimate(dir.path(), &["--no-charts"]);
    assert_eq!(output.status.code(), Some(0));

    let svgs = std::fs::read_dir(dir.path())
        .unwrap()
        .filter(|e| e.as_ref().unwrap().path().extension().is_some_and(|x| x == "svg"))
        .count();
    assert_eq!(svgs, 0);
}

#[test]
fn exports_csv_and_xlsx() {
    let dir = TempDir::new().unwrap();
    let output = estimate(dir.path(), &["--no-charts", "--export", "csv,xlsx"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let csv = std::fs::read_to_string(dir.path().join("dashboard_conversion_costs_detailed.csv")).unwrap();
    assert_eq!(csv.lines().count(), 6);
    assert!(csv.starts_with("name,tool,conversion_level,pages,status,"));
    assert!(csv.contains("Sales,Tableau,medium,3,active,10,70,30,1.1,1,11,7.7,3.3,385,330,715,"));

    let xlsx = std::fs::read(dir.path().join("dashboard_conversion_costs_detailed.xlsx")).unwrap();
    assert!(xlsx.starts_with(b"PK"));
}

#[test]
fn json_summary_on_stdout() {
    let dir = TempDir::new().unwrap();
    let output = estimate(dir.path(), &["--no-charts", "--format", "json"]);
    assert_eq!(output.status.code(), Some(0));

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["total_hours"], "54.48");
    assert_eq!(value["flat_total"], "2342.64");
    assert_eq!(value["role_split_total"], "3706.6");
    assert_eq!(value["excluded_rows"], 2);
    assert_eq!(value["dropped_rows"], 2);
}

#[test]
fn env_vars_configure_the_run() {
    let dir = TempDir::new().unwrap();
    let fixtures = fixtures_dir();
    let output = dashcost()
        .arg("estimate")
        .env("DASHCOST_CATALOG", fixtures.join("dashboard_catalog.csv"))
        .env("DASHCOST_EFFORT_LEVELS", fixtures.join("effort_levels.csv"))
        .env("DASHCOST_RATES", fixtures.join("hourly_rates.csv"))
        .env("DASHCOST_OUTPUT_DIR", dir.path())
        .env("DASHCOST_COMPARE", "junior")
        .output()
        .expect("failed to execute dashcost");

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Junior Analyst Did All Work"));
    assert!(dir.path().join("total_conversion_cost_by_role.svg").exists());
}

#[test]
fn excluded_rows_are_logged_as_warnings() {
    let dir = TempDir::new().unwrap();
    let output = estimate(dir.path(), &["--no-charts"]);

    let log = stderr(&output);
    assert!(log.contains("dashboard excluded from totals"));
    assert!(log.contains("Ghost"));
    assert!(!log.contains("estimate complete"));
}

#[test]
fn verbose_enables_info_logs() {
    let dir = TempDir::new().unwrap();
    let output = estimate(dir.path(), &["--no-charts", "-v"]);
    assert!(stderr(&output).contains("estimate complete"));
}

#[test]
fn quiet_suppresses_summary_and_warnings() {
    let dir = TempDir::new().unwrap();
    let output = estimate(dir.path(), &["-q"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).is_empty());
    assert!(dir.path().join("combined_conversion_cost_comparison.svg").exists());
}

#[test]
fn missing_input_exits_1() {
    let dir = TempDir::new().unwrap();
    let output = dashcost()
        .arg("estimate")
        .arg("--catalog")
        .arg(dir.path().join("nope.csv"))
        .arg("--output-dir")
        .arg(dir.path())
        .output()
        .expect("failed to execute dashcost");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to load inputs"));
    assert!(stderr(&output).contains("nope.csv"));
}

#[test]
fn missing_column_exits_1() {
    let dir = TempDir::new().unwrap();
    let fixtures = fixtures_dir();
    let output = dashcost()
        .arg("estimate")
        .arg("--catalog")
        .arg(fixtures.join("dashboard_catalog.csv"))
        .arg("--effort-levels")
        .arg(fixtures.join("effort_levels_missing_column.csv"))
        .arg("--rates")
        .arg(fixtures.join("hourly_rates.csv"))
        .arg("--output-dir")
        .arg(dir.path())
        .output()
        .expect("failed to execute dashcost");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("missing required column 'manager efforts'"));
}
