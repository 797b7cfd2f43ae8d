//! Employee Dashboard - KPI & cohort viewer for employee performance exports
//!
//! Loads a `;`-separated employee file, computes headline KPIs and
//! department/cohort aggregates, and shows them in an interactive window.
//! `--summary` and `--export-charts` run the same pipeline without a window.

mod charts;
mod data;
mod format;
mod gui;
mod stats;

use anyhow::{anyhow, Context};
use charts::StaticChartRenderer;
use clap::Parser;
use data::DataLoader;
use eframe::egui;
use gui::DashboardApp;
use stats::DashboardReport;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_DATA_FILE: &str = "employee_performance.csv";

#[derive(Parser, Debug)]
#[command(name = "employee_dashboard", version, about = "Employee performance dashboard")]
struct Cli {
    /// Semicolon-delimited employee export.
    #[arg(default_value = DEFAULT_DATA_FILE)]
    data: PathBuf,

    /// Print the KPI and aggregate report as JSON and exit.
    #[arg(long)]
    summary: bool,

    /// Write the dashboard charts as PNG files into DIR and exit.
    #[arg(long, value_name = "DIR")]
    export_charts: Option<PathBuf>,

    /// Currency prefix used when displaying salaries.
    #[arg(long, default_value = "R$")]
    currency: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.summary || cli.export_charts.is_some() {
        return run_headless(&cli);
    }
    run_gui(cli)
}

/// Load, aggregate, then print and/or export. Any failure aborts before
/// anything is written.
fn run_headless(cli: &Cli) -> anyhow::Result<()> {
    let df = DataLoader::new()
        .load(&cli.data)
        .with_context(|| format!("cannot load {}", cli.data.display()))?;
    let report = DashboardReport::build(&cli.data, &df)
        .with_context(|| format!("cannot aggregate {}", cli.data.display()))?;

    if cli.summary {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if let Some(dir) = &cli.export_charts {
        for path in StaticChartRenderer::export_all(&report, dir)? {
            eprintln!("wrote {}", path.display());
        }
    }
    Ok(())
}

fn run_gui(cli: Cli) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Employee Dashboard"),
        ..Default::default()
    };

    let loader = DataLoader::shared();
    eframe::run_native(
        "Employee Dashboard",
        options,
        Box::new(move |cc| {
            Ok(Box::new(DashboardApp::new(
                cc,
                loader,
                cli.data,
                cli.currency,
            )))
        }),
    )
    .map_err(|e| anyhow!("dashboard window failed: {e}"))
}
