//! Debt Burden CLI
//!
//! Loads the security file, reissues maturing debt through the end date and
//! runs the yearly debt/GDP feedback simulation.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use debt_burden::output::write_run;
use debt_burden::securities::Origin;
use debt_burden::{NewDebtInterestStrategy, RateSchedule, ScenarioRunner, SimulationConfig};

/// Project interest expense on marketable debt
#[derive(Parser, Debug)]
#[command(name = "debt_burden")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON configuration file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Charge interest on debt issued to finance primary deficits
    #[arg(long)]
    new_debt: bool,

    /// Derive rates from debt-to-GDP instead of the year table
    #[arg(long)]
    laubach_rates: bool,

    /// Reissuance yields as JSON, e.g. '{"1": 5.0, "10": 4.5}'
    #[arg(long)]
    initial_yields: Option<String>,

    #[arg(long)]
    initial_gdp_millions: Option<f64>,

    #[arg(long)]
    initial_debt_millions: Option<f64>,

    /// Percent per year
    #[arg(long)]
    gdp_growth_rate: Option<f64>,

    #[arg(long)]
    primary_deficit_pct_gdp: Option<f64>,

    /// Percent
    #[arg(long)]
    initial_interest_rate: Option<f64>,

    /// cumulative or average_balance
    #[arg(long)]
    new_debt_strategy: Option<NewDebtInterestStrategy>,

    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Security file; overrides raw_data_path from the config
    #[arg(long)]
    data: Option<PathBuf>,
}

impl Args {
    fn apply(&self, config: &mut SimulationConfig) -> anyhow::Result<()> {
        config.new_debt |= self.new_debt;
        config.laubach_rates |= self.laubach_rates;

        if let Some(yields) = &self.initial_yields {
            config.initial_yields = RateSchedule::from_json(yields).context("Failed to parse --initial-yields")?;
        }
        if let Some(v) = self.initial_gdp_millions {
            config.initial_gdp_millions = v;
        }
        if let Some(v) = self.initial_debt_millions {
            config.initial_debt_millions = v;
        }
        if let Some(v) = self.gdp_growth_rate {
            config.gdp_growth_rate = v;
        }
        if let Some(v) = self.primary_deficit_pct_gdp {
            config.primary_deficit_pct_gdp = v;
        }
        if let Some(v) = self.initial_interest_rate {
            config.initial_interest_rate = v;
        }
        if let Some(strategy) = self.new_debt_strategy {
            config.new_debt_strategy = strategy;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(path) = &self.data {
            config.raw_data_path = path.clone();
        }
        Ok(())
    }
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
    args.apply(&mut config)?;
    config.validate().context("Invalid configuration")?;

    println!("Debt Burden v{}", env!("CARGO_PKG_VERSION"));
    println!("=================\n");

    let start = Instant::now();
    println!("Loading securities from {}...", config.raw_data_path.display());
    let runner = ScenarioRunner::from_config(&config)
        .with_context(|| format!("Failed to prepare securities from {}", config.raw_data_path.display()))?;
    println!(
        "Prepared {} instruments ({} historical, {} reissued) in {:?}",
        runner.book().len(),
        runner.book().count_by_origin(Origin::Historical),
        runner.book().count_by_origin(Origin::Reissued),
        start.elapsed()
    );
    println!("Cutoff: {}  Horizon: {}\n", runner.cutoff(), runner.horizon());

    let outcome = runner.run(config.macro_config()).context("Simulation failed")?;

    println!(
        "{:>6} {:>14} {:>14} {:>8} {:>8} {:>12} {:>12} {:>8}",
        "Year", "GDP", "Debt", "D/GDP", "Rate", "Int Exist", "Int New", "Int/GDP"
    );
    println!("{}", "-".repeat(92));
    for row in &outcome.result.years {
        println!(
            "{:>6} {:>14.0} {:>14.0} {:>8.3} {:>8.3} {:>12.0} {:>12.0} {:>8.3}",
            row.year,
            row.gdp,
            row.debt,
            row.debt_to_gdp,
            row.interest_rate,
            row.interest_expense_existing,
            row.interest_expense_new,
            row.interest_expense_share_gdp
        );
    }

    let summary = outcome.result.summary();
    println!("\nTotal interest expense: {:.0}", summary.total_interest_expense);
    println!("Final debt-to-GDP: {:.3}", summary.final_debt_to_gdp);
    if let Some(year) = summary.peak_interest_year {
        println!("Peak interest share of GDP: {:.3} in {}", summary.peak_interest_share_gdp, year);
    }

    let outputs = write_run(&config.output_dir, &config.run_label(), &outcome.result, &outcome.book)
        .with_context(|| format!("Failed to write output to {}", config.output_dir.display()))?;
    println!("\nResults written to {}", outputs.results.display());
    println!("Instruments written to {}", outputs.instruments.display());
    println!("Summary written to {}", outputs.summary.display());
    println!("Total time: {:?}", start.elapsed());

    Ok(())
}
