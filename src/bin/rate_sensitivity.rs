//! Sweep the endogenous rate sensitivity over one prepared book
//!
//! Each Laubach ratio runs as its own scenario in parallel; the summary of
//! every run is written to a single CSV.

use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use debt_burden::projection::{EndogenousRateModel, MacroConfig, RateModel};
use debt_burden::{ScenarioRunner, SimulationConfig};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "rate_sensitivity")]
#[command(about = "Debt burden across endogenous rate sensitivities")]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Laubach ratios to run
    #[arg(long, value_delimiter = ',', default_values_t = vec![0.0, 0.25, 0.5, 1.0, 2.0])]
    ratios: Vec<f64>,

    /// Output CSV; defaults to rate_sensitivity.csv in the output directory
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SensitivityRow {
    laubach_ratio: f64,
    final_interest_rate: f64,
    final_debt: f64,
    final_debt_to_gdp: f64,
    total_interest_expense: f64,
    peak_interest_share_gdp: f64,
    peak_interest_year: Option<i32>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    config.load_rate_files().context("Failed to load rate files")?;

    let start = Instant::now();
    let runner = ScenarioRunner::from_config(&config).context("Failed to prepare securities")?;
    println!("Prepared {} instruments in {:?}", runner.book().len(), start.elapsed());

    let base = config.macro_config();
    let configs: Vec<MacroConfig> = args
        .ratios
        .iter()
        .map(|&ratio| MacroConfig {
            rate_model: RateModel::Endogenous(EndogenousRateModel::new(ratio, config.ratio_change_scale)),
            ..base.clone()
        })
        .collect();

    println!("Running {} scenarios...", configs.len());
    let run_start = Instant::now();
    let results = runner.run_scenarios(&configs).context("Scenario run failed")?;
    println!("Scenarios complete in {:?}\n", run_start.elapsed());

    let rows: Vec<SensitivityRow> = args
        .ratios
        .iter()
        .zip(&results)
        .map(|(&ratio, result)| {
            let summary = result.summary();
            SensitivityRow {
                laubach_ratio: ratio,
                final_interest_rate: summary.final_interest_rate,
                final_debt: summary.final_debt,
                final_debt_to_gdp: summary.final_debt_to_gdp,
                total_interest_expense: summary.total_interest_expense,
                peak_interest_share_gdp: summary.peak_interest_share_gdp,
                peak_interest_year: summary.peak_interest_year,
            }
        })
        .collect();

    println!("{:>8} {:>10} {:>10} {:>16} {:>10}", "Ratio", "Rate", "D/GDP", "Total Interest", "Peak");
    println!("{}", "-".repeat(58));
    for row in &rows {
        println!(
            "{:>8.2} {:>10.3} {:>10.3} {:>16.0} {:>10.3}",
            row.laubach_ratio, row.final_interest_rate, row.final_debt_to_gdp, row.total_interest_expense, row.peak_interest_share_gdp
        );
    }

    let output = match args.output {
        Some(path) => path,
        None => {
            fs::create_dir_all(&config.output_dir)?;
            config.output_dir.join("rate_sensitivity.csv")
        }
    };
    let mut wtr = csv::Writer::from_writer(File::create(&output)?);
    for row in &rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    println!("\nResults written to {}", output.display());
    Ok(())
}
