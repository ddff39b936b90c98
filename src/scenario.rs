//! Scenario runner for repeated simulations over one prepared book
//!
//! Loads and reissues the security file once, then runs many macro
//! configurations without re-reading the CSV.

use std::path::Path;

use chrono::NaiveDate;
use log::info;
use rayon::prelude::*;

use crate::assumptions::{MacroAssumptions, RateSchedule};
use crate::config::SimulationConfig;
use crate::error::{DebtSimError, Result};
use crate::projection::{MacroConfig, MacroFeedbackSimulator, SimulationResult};
use crate::reissuance::{expand_book, ExpansionSummary};
use crate::securities::{load_securities, InstrumentBook, LoadedSecurities};

/// Result of one scenario: the yearly records and the book with stamped rates
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub result: SimulationResult,
    pub book: InstrumentBook,
}

/// Expanded instrument book shared by every scenario
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_config(&config)?;
///
/// for ratio in [0.25, 0.5, 1.0] {
///     let mut macro_config = config.macro_config();
///     macro_config.rate_model = RateModel::Endogenous(EndogenousRateModel::new(ratio, UNSCALED));
///     let outcome = runner.run(macro_config)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    book: InstrumentBook,
    cutoff: NaiveDate,
    /// Reissuance runs through this date; scenarios may not go past it
    horizon: NaiveDate,
    base_assumptions: MacroAssumptions,
}

impl ScenarioRunner {
    /// Wrap an already-expanded book
    pub fn new(book: InstrumentBook, cutoff: NaiveDate, horizon: NaiveDate, assumptions: MacroAssumptions) -> Self {
        Self {
            book,
            cutoff,
            horizon,
            base_assumptions: assumptions,
        }
    }

    /// Reissue loaded securities through `horizon` and keep the result
    pub fn prepare(
        loaded: LoadedSecurities,
        schedule: &RateSchedule,
        horizon: NaiveDate,
        assumptions: MacroAssumptions,
    ) -> Result<(Self, ExpansionSummary)> {
        let mut book = InstrumentBook::from_instruments(loaded.instruments);
        let summary = expand_book(&mut book, loaded.cutoff, schedule, horizon)?;
        Ok((Self::new(book, loaded.cutoff, horizon, assumptions), summary))
    }

    /// Validate the config, load its security file and reissue through its end date
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        Self::from_config_with_path(config, &config.raw_data_path)
    }

    pub fn from_config_with_path(config: &SimulationConfig, path: &Path) -> Result<Self> {
        config.validate()?;
        let loaded = load_securities(path, &config.security_types()?)?;
        info!("Loaded {} securities with cutoff {}", loaded.instruments.len(), loaded.cutoff);

        let (runner, _) = Self::prepare(
            loaded,
            &config.initial_yields,
            config.reissue_end_date,
            config.macro_assumptions(),
        )?;
        Ok(runner)
    }

    /// Run one scenario with the base assumptions on a copy of the book
    pub fn run(&self, config: MacroConfig) -> Result<ScenarioOutcome> {
        self.run_with(self.base_assumptions.clone(), config)
    }

    /// Run one scenario with its own assumptions
    pub fn run_with(&self, assumptions: MacroAssumptions, config: MacroConfig) -> Result<ScenarioOutcome> {
        if config.horizon > self.horizon {
            return Err(DebtSimError::config(format!(
                "scenario horizon {} is past the reissuance horizon {}",
                config.horizon, self.horizon
            )));
        }

        let simulator = MacroFeedbackSimulator::new(assumptions, config)?;
        let mut book = self.book.clone();
        let result = simulator.run(&mut book, self.cutoff)?;
        Ok(ScenarioOutcome { result, book })
    }

    /// Run several configurations in parallel, keeping their order
    pub fn run_scenarios(&self, configs: &[MacroConfig]) -> Result<Vec<SimulationResult>> {
        configs
            .par_iter()
            .map(|config| self.run(config.clone()).map(|outcome| outcome.result))
            .collect()
    }

    pub fn book(&self) -> &InstrumentBook {
        &self.book
    }

    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    pub fn horizon(&self) -> NaiveDate {
        self.horizon
    }

    /// Get reference to base assumptions for inspection/modification
    pub fn assumptions(&self) -> &MacroAssumptions {
        &self.base_assumptions
    }

    pub fn assumptions_mut(&mut self) -> &mut MacroAssumptions {
        &mut self.base_assumptions
    }
}
