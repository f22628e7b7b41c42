//! Run projections for every strategy in a strategies/allocations CSV pair
//!
//! Outputs one summary row per strategy

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde::Serialize;
use strategy_engine::{strategy::load_strategies, EngineConfig, Projection, ScenarioRunner};

#[derive(Debug, Parser)]
#[command(name = "run_batch", about = "Project every strategy in a CSV inforce")]
struct Args {
    /// Strategies CSV (StrategyID, Name, Mode, Amount, DurationYears, Compounding, ...)
    #[arg(long, default_value = "strategies.csv")]
    strategies: PathBuf,

    /// Allocations CSV (StrategyID, Category, Percent, ExpectedAnnualReturn)
    #[arg(long, default_value = "allocations.csv")]
    allocations: PathBuf,

    #[arg(long, default_value = "batch_projection_output.csv")]
    output: PathBuf,
}

/// One output row per strategy
#[derive(Debug, Serialize)]
struct SummaryRow {
    #[serde(rename = "StrategyID")]
    strategy_id: String,
    #[serde(rename = "Mode")]
    mode: String,
    #[serde(rename = "Allocations")]
    allocations: usize,
    #[serde(rename = "TotalPrincipal")]
    total_principal: f64,
    #[serde(rename = "TotalWithdrawn")]
    total_withdrawn: f64,
    #[serde(rename = "AggregateFV")]
    aggregate_fv: Option<f64>,
    #[serde(rename = "AggregateCAGR")]
    aggregate_cagr: Option<f64>,
    #[serde(rename = "YearsToDouble")]
    years_to_double: Option<f64>,
    #[serde(rename = "RealValued")]
    real_valued: bool,
}

impl From<&Projection> for SummaryRow {
    fn from(projection: &Projection) -> Self {
        let summary = projection.summary();
        Self {
            strategy_id: projection.strategy_id.clone(),
            mode: projection.snapshot.mode.to_string(),
            allocations: summary.allocation_count,
            total_principal: summary.total_principal,
            total_withdrawn: summary.total_withdrawn,
            aggregate_fv: summary.aggregate_fv,
            aggregate_cagr: summary.aggregate_cagr.filter(|r| r.is_finite()),
            years_to_double: summary.years_to_double.filter(|y| y.is_finite()),
            real_valued: projection.real_valued,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    println!("Loading strategies from {}...", args.strategies.display());

    let strategies = load_strategies(&args.strategies, &args.allocations)
        .context("failed to load strategies")?;
    println!("Loaded {} strategies in {:?}", strategies.len(), start.elapsed());

    // Batch runs only need the aggregates
    let runner = ScenarioRunner::with_config(EngineConfig::summary_only());

    println!("Running projections...");
    let proj_start = Instant::now();
    let projections = runner.run_batch(&strategies);
    println!("Projections complete in {:?}", proj_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    for projection in &projections {
        writer.serialize(SummaryRow::from(projection))?;
    }
    writer.flush()?;
    info!("wrote {} summary rows", projections.len());

    println!("Output written to {}", args.output.display());

    let total_fv: f64 = projections.iter().filter_map(|p| p.aggregate_fv).sum();
    let empty = projections.iter().filter(|p| p.is_empty()).count();
    println!("\nBatch Summary:");
    println!("  Strategies: {} ({} without allocations)", projections.len(), empty);
    println!("  Total projected value: {:.2}", total_fv);
    println!("\nTotal time: {:?}", start.elapsed());

    Ok(())
}
