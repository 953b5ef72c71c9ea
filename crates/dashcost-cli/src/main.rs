//! dashcost CLI - Dashboard Conversion Cost Estimator
//!
//! Loads the dashboard catalog, effort levels and hourly rates, costs every
//! dashboard, and writes comparison charts, heatmaps and optional exports.

mod check;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dashcost_core::{FlatRate, Renderer};
use dashcost_loader::{load_inputs, InputPaths};
use dashcost_model::estimate;
use dashcost_render::{
    CsvBreakdownRenderer, ExcelBreakdownRenderer, HeatMetric, HeatmapRenderer, JsonSummaryRenderer, ScenarioChart,
    ScenarioChartRenderer, SummaryRenderer, CSV_EXPORT_FILE, DEFAULT_TARGET, XLSX_EXPORT_FILE,
};
use rust_decimal::Decimal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "dashcost")]
#[command(author, version, about = "Dashboard conversion cost estimator", long_about = None)]
struct Cli {
    /// Verbose logging (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors and skip the text summary
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cost every dashboard and write charts and exports
    Estimate(EstimateArgs),

    /// Load and cost the inputs, then report row issues without rendering
    Check {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output format
        #[arg(short, long, value_enum, env = "DASHCOST_FORMAT", default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Input table locations
#[derive(Args)]
struct InputArgs {
    /// Dashboard catalog (CSV or spreadsheet)
    #[arg(long, value_name = "FILE", env = "DASHCOST_CATALOG", default_value = "dashboard_catalog.xlsx")]
    catalog: PathBuf,

    /// Effort-level lookup table
    #[arg(long, value_name = "FILE", env = "DASHCOST_EFFORT_LEVELS", default_value = "effort_levels.xlsx")]
    effort_levels: PathBuf,

    /// Hourly rate table
    #[arg(long, value_name = "FILE", env = "DASHCOST_RATES", default_value = "hourly_rates.xlsx")]
    rates: PathBuf,
}

impl InputArgs {
    fn paths(&self) -> InputPaths {
        InputPaths {
            catalog: self.catalog.clone(),
            effort_levels: self.effort_levels.clone(),
            rates: self.rates.clone(),
        }
    }
}

#[derive(Args)]
struct EstimateArgs {
    #[command(flatten)]
    inputs: InputArgs,

    /// Single-rate scenario compared against the role split
    #[arg(long, value_enum, env = "DASHCOST_COMPARE", default_value_t = Compare::Contractor)]
    compare: Compare,

    /// Contractor hourly rate
    #[arg(long, value_name = "RATE", env = "DASHCOST_CONTRACTOR_RATE", default_value = "43", value_parser = parse_rate)]
    contractor_rate: Decimal,

    /// Directory for charts and exports
    #[arg(short, long, value_name = "DIR", env = "DASHCOST_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Summary format on stdout
    #[arg(short, long, value_enum, env = "DASHCOST_FORMAT", default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Detailed breakdown exports (repeatable or comma-separated)
    #[arg(long, value_enum, env = "DASHCOST_EXPORT", value_delimiter = ',')]
    export: Vec<ExportFormat>,

    /// Skip the SVG charts
    #[arg(long, env = "DASHCOST_NO_CHARTS")]
    no_charts: bool,

    /// Reporting tool named in chart titles
    #[arg(long, env = "DASHCOST_TARGET", default_value = DEFAULT_TARGET)]
    target: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Compare {
    /// External contractor at --contractor-rate
    Contractor,
    /// Junior analyst rate from the rate table
    Junior,
}

impl Compare {
    fn flat_rate(self, contractor_rate: Decimal) -> FlatRate {
        match self {
            Compare::Contractor => FlatRate::Contractor(contractor_rate),
            Compare::Junior => FlatRate::JuniorAnalyst,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    Csv,
    Xlsx,
}

fn parse_rate(raw: &str) -> Result<Decimal, String> {
    let rate: Decimal = raw
        .trim()
        .parse()
        .map_err(|e| format!("'{}' is not a number: {}", raw, e))?;
    if rate.is_sign_negative() {
        return Err(format!("rate must not be negative, got {}", rate));
    }
    Ok(rate)
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Estimate(args) => run_estimate(&args, cli.quiet),
        Commands::Check { inputs, format } => run_check(&inputs, format),
    }
}

fn run_estimate(args: &EstimateArgs, quiet: bool) -> Result<()> {
    let inputs = load_inputs(&args.inputs.paths()).context("Failed to load inputs")?;
    let report = estimate(&inputs, args.compare.flat_rate(args.contractor_rate));

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create output directory {}", args.output_dir.display()))?;

    if !args.no_charts {
        for chart in ScenarioChart::for_flat_rate(report.flat_rate) {
            let svg = ScenarioChartRenderer::new(chart)
                .target(args.target.as_str())
                .render(&report)
                .with_context(|| format!("Failed to render {}", chart.file_name()))?;
            write_output(&args.output_dir.join(chart.file_name()), svg.as_bytes())?;
        }

        if report.rows.is_empty() {
            tracing::warn!("catalog has no dashboards; skipping heatmaps");
        } else {
            for metric in HeatMetric::ALL {
                let svg = HeatmapRenderer::new(metric)
                    .target(args.target.as_str())
                    .render(&report)
                    .with_context(|| format!("Failed to render {}", metric.file_name()))?;
                write_output(&args.output_dir.join(metric.file_name()), svg.as_bytes())?;
            }
        }
    }

    for export in &args.export {
        match export {
            ExportFormat::Csv => {
                let csv = CsvBreakdownRenderer::new()
                    .render(&report)
                    .context("Failed to render CSV breakdown")?;
                write_output(&args.output_dir.join(CSV_EXPORT_FILE), csv.as_bytes())?;
            }
            ExportFormat::Xlsx => {
                let bytes = ExcelBreakdownRenderer::new()
                    .render(&report)
                    .context("Failed to render Excel breakdown")?;
                write_output(&args.output_dir.join(XLSX_EXPORT_FILE), &bytes)?;
            }
        }
    }

    match args.format {
        OutputFormat::Json => print!("{}", JsonSummaryRenderer::new().render(&report)?),
        OutputFormat::Text if !quiet => {
            println!();
            print!("{}", SummaryRenderer::new().render(&report)?);
        }
        OutputFormat::Text => {}
    }

    Ok(())
}

fn run_check(inputs: &InputArgs, format: OutputFormat) -> Result<()> {
    let loaded = load_inputs(&inputs.paths()).context("Failed to load inputs")?;
    let report = estimate(&loaded, FlatRate::default());

    let output = match format {
        OutputFormat::Text => check::render_text(&loaded, &report),
        OutputFormat::Json => check::render_json(&loaded, &report)?,
    };
    print!("{}", output);
    Ok(())
}

fn write_output(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote output");
    Ok(())
}
