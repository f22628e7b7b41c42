//! Strategy Engine CLI
//!
//! Command-line interface for strategy projections and one-off rate conversions

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use strategy_engine::{
    rates, strategy::load_strategy_json, EngineConfig, Projection, StrategyAggregator,
};

#[derive(Debug, Parser)]
#[command(name = "strategy-engine", version, about = "Investment strategy growth projections")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Project a strategy described by a JSON file
    Project {
        /// Strategy JSON (camelCase fields, nested allocations)
        #[arg(short, long)]
        input: PathBuf,

        /// Write the year-end schedule of every allocation to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the full projection as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Skip the year-end schedule
        #[arg(long)]
        no_schedule: bool,

        /// Project allocations one after another instead of in parallel
        #[arg(long)]
        sequential: bool,
    },
    /// Convert between rates and time horizons
    Rates {
        #[command(subcommand)]
        conversion: RateCommand,
    },
}

#[derive(Debug, Subcommand)]
enum RateCommand {
    /// Compound annual growth rate from present to future value
    Cagr {
        #[arg(long)]
        pv: f64,
        #[arg(long)]
        fv: f64,
        #[arg(long)]
        years: f64,
    },
    /// Real rate from nominal rate and inflation
    Real {
        #[arg(long, allow_negative_numbers = true)]
        nominal: f64,
        #[arg(long, allow_negative_numbers = true)]
        inflation: f64,
    },
    /// Nominal rate from real rate and inflation
    Nominal {
        #[arg(long, allow_negative_numbers = true)]
        real: f64,
        #[arg(long, allow_negative_numbers = true)]
        inflation: f64,
    },
    /// Effective annual rate of a nominal rate compounded `periods` times a year
    Ear {
        #[arg(long, allow_negative_numbers = true)]
        nominal: f64,
        #[arg(long)]
        periods: u32,
    },
    /// Years to double at an annual rate
    Double {
        #[arg(long, allow_negative_numbers = true)]
        rate: f64,
    },
    /// Years to reach a multiple of the starting capital
    Multiplier {
        #[arg(long, allow_negative_numbers = true)]
        rate: f64,
        #[arg(long)]
        multiple: f64,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Project {
            input,
            csv,
            json,
            no_schedule,
            sequential,
        } => {
            let config = EngineConfig {
                detailed_output: !no_schedule,
                parallel: !sequential,
                ..Default::default()
            };
            run_project(&input, csv.as_deref(), json, config)
        }
        Command::Rates { conversion } => {
            println!("{}", convert(conversion));
            Ok(())
        }
    }
}

fn run_project(input: &Path, csv: Option<&Path>, json: bool, config: EngineConfig) -> Result<()> {
    let strategy = load_strategy_json(input)
        .with_context(|| format!("failed to load strategy from {}", input.display()))?;
    let projection = StrategyAggregator::new(config).aggregate(&strategy);

    if json {
        println!("{}", serde_json::to_string_pretty(&projection)?);
    } else {
        print_table(&projection);
    }

    if let Some(path) = csv {
        write_schedule_csv(path, &projection)
            .with_context(|| format!("failed to write schedule to {}", path.display()))?;
        println!("\nSchedule written to: {}", path.display());
    }

    Ok(())
}

fn convert(conversion: RateCommand) -> f64 {
    match conversion {
        RateCommand::Cagr { pv, fv, years } => rates::cagr(pv, fv, years),
        RateCommand::Real { nominal, inflation } => rates::real_rate(nominal, inflation),
        RateCommand::Nominal { real, inflation } => rates::nominal_rate(real, inflation),
        RateCommand::Ear { nominal, periods } => rates::effective_annual_rate(nominal, periods),
        RateCommand::Double { rate } => rates::years_to_double(rate),
        RateCommand::Multiplier { rate, multiple } => rates::years_to_multiplier(rate, multiple),
    }
}

fn print_table(projection: &Projection) {
    let snapshot = &projection.snapshot;
    println!(
        "Strategy {} ({}, {} compounding, {} years{})",
        projection.strategy_id,
        snapshot.mode,
        snapshot.compounding,
        snapshot.duration_years,
        if projection.real_valued { ", real terms" } else { "" }
    );
    println!(
        "{:<16} {:>8} {:>8} {:>14} {:>14} {:>14} {:>10}",
        "Category", "Pct", "Return", "Principal", "Per Period", "Future Value", "CAGR"
    );
    println!("{}", "-".repeat(90));

    for allocation in &snapshot.allocations {
        println!(
            "{:<16} {:>8.2} {:>8.4} {:>14.2} {:>14} {:>14.2} {:>10}",
            allocation.category,
            allocation.percent_normalized,
            allocation.expected_annual_return,
            allocation.principal,
            allocation
                .contribution_per_period
                .map(|c| format!("{:.2}", c))
                .unwrap_or_else(|| "-".to_string()),
            allocation.future_value,
            format_rate(allocation.realized_cagr),
        );
    }

    let summary = projection.summary();
    println!("\nSummary:");
    println!("  Allocations: {}", summary.allocation_count);
    println!("  Total Principal: {:.2}", summary.total_principal);
    if summary.total_withdrawn > 0.0 {
        println!("  Total Withdrawn: {:.2}", summary.total_withdrawn);
    }
    match summary.aggregate_fv {
        Some(fv) => println!("  Aggregate FV: {:.2} {}", fv, snapshot.currency),
        None => println!("  Aggregate FV: -"),
    }
    println!("  Aggregate CAGR: {}", format_rate(summary.aggregate_cagr));
    if let Some(years) = summary.years_to_double {
        println!("  Years to Double: {:.2}", years);
    }
}

fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(r) if r.is_finite() => format!("{:.4}%", r * 100.0),
        Some(r) => format!("{}", r),
        None => "-".to_string(),
    }
}

fn write_schedule_csv(path: &Path, projection: &Projection) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Category", "Year", "Periods", "Contributed", "Withdrawn", "Balance"])?;

    for allocation in &projection.snapshot.allocations {
        for row in &allocation.schedule {
            writer.write_record([
                allocation.category.clone(),
                format!("{:.4}", row.year),
                format!("{:.4}", row.periods),
                format!("{:.8}", row.contributed),
                format!("{:.8}", row.withdrawn),
                format!("{:.8}", row.balance),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}
