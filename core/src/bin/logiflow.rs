//! Solve the reference distribution network and print its flow tables.
//!
//! Set `RUST_LOG=debug` (or `trace`) for solver progress.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use logiflow_core::{reference_network, DistributionReport, SolverConfig};

#[derive(Parser)]
#[command(name = "logiflow")]
#[command(about = "Maximum flow through the reference terminal/warehouse/store network", long_about = None)]
struct Cli {
    /// Solver configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the full report as JSON instead of tables
    #[arg(long)]
    json: bool,
    /// Directory to write edge_flows.csv and terminal_store_flow.csv into
    #[arg(long)]
    out: Option<PathBuf>,
}

fn load_config(path: Option<&Path>) -> Result<SolverConfig> {
    let Some(path) = path else {
        return Ok(SolverConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    SolverConfig::from_json_str(&text).with_context(|| format!("invalid configuration in {}", path.display()))
}

fn print_tables(report: &DistributionReport) {
    println!("Maximum flow: {}", report.max_flow);
    println!();
    println!("{:<14} {:<14} {:>6} {:>9}  {}", "From", "To", "Flow", "Capacity", "Saturated");
    for row in &report.edge_flows {
        println!(
            "{:<14} {:<14} {:>6} {:>9}  {}",
            row.origin,
            row.destination,
            row.flow,
            row.capacity,
            if row.saturated { "yes" } else { "no" }
        );
    }
    println!(
        "{} of {} edges saturated",
        report.saturated_edges().count(),
        report.edge_flows.len()
    );
    println!();
    println!("{:<14} {:<14} {:>6}", "Terminal", "Store", "Flow");
    for row in &report.terminal_store_flows {
        println!("{:<14} {:<14} {:>6}", row.terminal, row.store, row.flow);
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    info!("solving reference network with {:?}", config);

    let report = reference_network(config)
        .and_then(|network| network.solve())
        .context("solving the reference network")?;

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print_tables(&report);
    }

    if let Some(dir) = &cli.out {
        for path in report.write_csv(dir)? {
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}
