//! Yearly macro feedback simulation over an instrument book

use chrono::{Datelike, NaiveDate};
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::accrual::accrued_interest;
use super::new_debt::NewDebtInterestStrategy;
use super::rate_model::{EndogenousRateModel, RateModel, UNSCALED};
use super::results::{SimulationResult, YearlyResult};
use super::state::YearlyMacroState;
use crate::assumptions::MacroAssumptions;
use crate::daycount::remaining_after;
use crate::error::{DebtSimError, Result};
use crate::securities::{Instrument, InstrumentBook, Origin};

/// Which instruments issued in a simulated year take that year's rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateStamping {
    /// Historical and reissued instruments alike
    #[default]
    All,
    /// Reissued instruments only; historical coupons are kept
    ReissuedOnly,
    /// Keep the term-based reissuance rates
    Disabled,
}

impl RateStamping {
    fn applies_to(&self, instrument: &Instrument, year: i32) -> bool {
        if instrument.issue_year() != year {
            return false;
        }
        match self {
            RateStamping::All => true,
            RateStamping::ReissuedOnly => instrument.origin == Origin::Reissued,
            RateStamping::Disabled => false,
        }
    }
}

/// Configuration for a simulation run
#[derive(Debug, Clone)]
pub struct MacroConfig {
    /// Last date simulated; the run covers every year up to its year
    pub horizon: NaiveDate,

    /// Endogenous or year-indexed rates
    pub rate_model: RateModel,

    /// Interest on deficit-financed debt; `None` disables it
    pub new_debt: Option<NewDebtInterestStrategy>,

    /// Scales instrument interest up to total debt
    pub multiplier: f64,

    pub rate_stamping: RateStamping,

    /// Move the cutoff position forward over the rest of the first year
    pub prorate_first_year: bool,
}

impl Default for MacroConfig {
    fn default() -> Self {
        Self {
            horizon: NaiveDate::from_ymd_opt(2050, 12, 31).unwrap_or(NaiveDate::MAX),
            rate_model: RateModel::Endogenous(EndogenousRateModel::new(0.5, UNSCALED)),
            new_debt: Some(NewDebtInterestStrategy::Cumulative),
            multiplier: 1.0,
            rate_stamping: RateStamping::All,
            prorate_first_year: true,
        }
    }
}

/// Runs the yearly debt, GDP and rate feedback loop
#[derive(Debug, Clone)]
pub struct MacroFeedbackSimulator {
    assumptions: MacroAssumptions,
    config: MacroConfig,
}

impl MacroFeedbackSimulator {
    /// Create a simulator, rejecting configurations that cannot run
    pub fn new(assumptions: MacroAssumptions, config: MacroConfig) -> Result<Self> {
        assumptions.validate()?;

        if !(config.multiplier.is_finite() && config.multiplier >= 0.0) {
            return Err(DebtSimError::config(format!(
                "multiplier must be a non-negative number, got {}",
                config.multiplier
            )));
        }
        if let RateModel::Endogenous(model) = &config.rate_model {
            model.validate()?;
        }

        Ok(Self { assumptions, config })
    }

    pub fn assumptions(&self) -> &MacroAssumptions {
        &self.assumptions
    }

    pub fn config(&self) -> &MacroConfig {
        &self.config
    }

    /// Simulate every year from the cutoff's year to the horizon's year.
    ///
    /// Instruments issued in a simulated year have their rate overwritten
    /// according to `rate_stamping`, so the book reflects the rates used.
    /// Stamping happens on a working copy; `book` is only replaced when every
    /// year succeeds and is left untouched on error.
    pub fn run(&self, book: &mut InstrumentBook, cutoff: NaiveDate) -> Result<SimulationResult> {
        let mut working = book.clone();
        let result = self.run_years(&mut working, cutoff)?;
        *book = working;
        Ok(result)
    }

    fn run_years(&self, book: &mut InstrumentBook, cutoff: NaiveDate) -> Result<SimulationResult> {
        let first_year = cutoff.year();
        let last_year = self.config.horizon.year();

        if self.config.horizon < cutoff {
            return Err(DebtSimError::config(format!(
                "horizon {} is before the cutoff {}",
                self.config.horizon, cutoff
            )));
        }
        if let RateModel::Scheduled(table) = &self.config.rate_model {
            table.validate_years(first_year..=last_year)?;
        }

        let growth = self.assumptions.gdp_growth_rate;
        let mut state = YearlyMacroState::initial(&self.assumptions, first_year)?;
        let mut result = SimulationResult::new(cutoff, self.config.horizon);

        info!(
            "Simulating {}..={} over {} instruments (debt {:.0}, GDP {:.0})",
            first_year,
            last_year,
            book.len(),
            state.debt(),
            state.gdp()
        );

        for year in first_year..=last_year {
            let deficit = state.gdp() * self.assumptions.primary_deficit_pct_gdp / 100.0;

            if year == first_year && self.config.prorate_first_year {
                state.prorate_first_year(deficit, remaining_after(cutoff), growth)?;
            }

            state.interest_rate = self.rate_for_year(&state, year, first_year)?;

            let stamped = self.stamp_rate(book, year, state.interest_rate);

            let active = book.active_in(year).count();
            let existing = Self::instrument_interest(book, year)? * self.config.multiplier;

            let new_interest = match self.config.new_debt {
                Some(strategy) => {
                    state.cumulative_new_debt += deficit;
                    strategy.interest(&state, state.interest_rate)?
                }
                None => 0.0,
            };

            let row = YearlyResult::new(
                year,
                state.gdp(),
                state.debt(),
                deficit,
                state.interest_rate,
                existing,
                new_interest,
                active,
                stamped,
            );

            info!(
                "{}: debt {:.0}, GDP {:.0}, debt/GDP {:.3}, rate {:.3}%, {} active, interest {:.0} existing + {:.0} new",
                year,
                row.debt,
                row.gdp,
                row.debt_to_gdp,
                row.interest_rate,
                active,
                existing,
                new_interest
            );

            let total_interest = row.interest_expense_total;
            result.add_year(row);

            state.advance(deficit, total_interest, growth)?;
        }

        Ok(result)
    }

    fn rate_for_year(&self, state: &YearlyMacroState, year: i32, first_year: i32) -> Result<f64> {
        match &self.config.rate_model {
            RateModel::Endogenous(_) if year == first_year => Ok(state.interest_rate),
            RateModel::Endogenous(model) => {
                model.next_rate(state.interest_rate, state.previous_debt_to_gdp()?, state.debt_to_gdp())
            }
            RateModel::Scheduled(table) => table.rate_for_year(year),
        }
    }

    fn stamp_rate(&self, book: &mut InstrumentBook, year: i32, rate: f64) -> usize {
        let mut stamped = 0;
        for instrument in book.iter_mut() {
            if self.config.rate_stamping.applies_to(instrument, year) {
                instrument.set_rate(rate);
                stamped += 1;
            }
        }
        if stamped > 0 {
            debug!("{}: stamped {:.3}% onto {} instruments", year, rate, stamped);
        }
        stamped
    }

    /// Sum of accrued interest over instruments active in `year`
    fn instrument_interest(book: &InstrumentBook, year: i32) -> Result<f64> {
        book.as_slice()
            .par_iter()
            .filter(|instrument| instrument.is_active_in(year))
            .map(|instrument| accrued_interest(instrument, year))
            .try_reduce(|| 0.0, |a, b| Ok(a + b))
    }
}
