//! Static interest schedule by year and security type
//!
//! Reissues maturing securities at the configured term rates and sums
//! accrued interest per year, without the macro feedback loop.

use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use chrono::Datelike;
use clap::Parser;
use debt_burden::output::write_interest_schedule;
use debt_burden::projection::InterestSchedule;
use debt_burden::{ScenarioRunner, SimulationConfig};

#[derive(Parser, Debug)]
#[command(name = "interest_schedule")]
#[command(about = "Yearly interest on historical and reissued securities")]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output CSV; defaults to interest_schedule.csv in the output directory
    #[arg(short, long)]
    output: Option<PathBuf>,
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
    println!("Loading securities from {}...", config.raw_data_path.display());
    let runner = ScenarioRunner::from_config(&config).context("Failed to prepare securities")?;
    println!("Prepared {} instruments in {:?}", runner.book().len(), start.elapsed());

    let years = runner.cutoff().year()..=runner.horizon().year();
    let schedule = InterestSchedule::from_book(runner.book(), years)
        .context("Failed to compute interest schedule")?
        .with_gdp(runner.assumptions());

    println!("\n{:>6} {:>12} {:>12} {:>12} {:>12} {:>8}", "Year", "Bills", "Notes", "Bonds", "Total", "Int/GDP");
    println!("{}", "-".repeat(68));
    for row in &schedule.rows {
        println!(
            "{:>6} {:>12.0} {:>12.0} {:>12.0} {:>12.0} {:>8.3}",
            row.year,
            row.bills,
            row.notes,
            row.bonds,
            row.total,
            row.total_share_gdp.unwrap_or(0.0)
        );
    }

    let output = match args.output {
        Some(path) => path,
        None => {
            fs::create_dir_all(&config.output_dir)?;
            config.output_dir.join("interest_schedule.csv")
        }
    };
    let file = File::create(&output).with_context(|| format!("Failed to create {}", output.display()))?;
    write_interest_schedule(file, &schedule)?;

    println!("\nSchedule written to {}", output.display());
    println!("Total time: {:?}", start.elapsed());
    Ok(())
}
