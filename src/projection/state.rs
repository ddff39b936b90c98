//! Macro state threaded through the yearly loop

use crate::assumptions::MacroAssumptions;
use crate::error::{DebtSimError, Result};

/// Values of a completed year, kept for the next year's comparisons
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearSnapshot {
    pub year: i32,
    pub gdp: f64,
    pub debt: f64,
    pub debt_to_gdp: f64,
    pub interest_rate: f64,
}

/// State of the economy at the start of a simulated year.
///
/// Debt-to-GDP is always derived from debt and GDP; only snapshots of
/// earlier years hold a stored ratio.
#[derive(Debug, Clone)]
pub struct YearlyMacroState {
    /// Year being simulated
    pub year: i32,

    debt: f64,

    gdp: f64,

    /// Rate in percent for the current year
    pub interest_rate: f64,

    /// Primary deficits financed since the cutoff
    pub cumulative_new_debt: f64,

    /// Debt at the cutoff, before any simulated year
    initial_debt: f64,

    /// Last completed year; the starting position before the first year
    previous: YearSnapshot,
}

impl YearlyMacroState {
    /// Starting state for `first_year`
    pub fn initial(assumptions: &MacroAssumptions, first_year: i32) -> Result<Self> {
        assumptions.validate()?;

        let state = Self {
            year: first_year,
            debt: assumptions.initial_debt,
            gdp: assumptions.initial_gdp,
            interest_rate: assumptions.initial_interest_rate,
            cumulative_new_debt: 0.0,
            initial_debt: assumptions.initial_debt,
            previous: YearSnapshot {
                year: first_year - 1,
                gdp: assumptions.initial_gdp,
                debt: assumptions.initial_debt,
                debt_to_gdp: assumptions.initial_debt_to_gdp(),
                interest_rate: assumptions.initial_interest_rate,
            },
        };
        state.validate()?;
        Ok(state)
    }

    pub fn debt(&self) -> f64 {
        self.debt
    }

    pub fn gdp(&self) -> f64 {
        self.gdp
    }

    pub fn debt_to_gdp(&self) -> f64 {
        self.debt / self.gdp
    }

    pub fn initial_debt(&self) -> f64 {
        self.initial_debt
    }

    pub fn previous(&self) -> &YearSnapshot {
        &self.previous
    }

    /// Previous year's debt, guarded for use as a base
    pub fn previous_debt(&self) -> Result<f64> {
        positive("previous debt", self.previous.debt)
    }

    /// Previous year's debt-to-GDP, guarded for use as a denominator
    pub fn previous_debt_to_gdp(&self) -> Result<f64> {
        positive("previous debt-to-GDP", self.previous.debt_to_gdp)
    }

    /// Move the cutoff position forward over the rest of the first year
    pub fn prorate_first_year(&mut self, deficit: f64, fraction_remaining: f64, gdp_growth_rate: f64) -> Result<()> {
        self.debt += deficit * fraction_remaining;
        self.gdp *= 1.0 + gdp_growth_rate / 100.0 * fraction_remaining;
        self.validate()
    }

    /// Close the current year: snapshot it, then grow GDP and add the year's borrowing
    pub fn advance(&mut self, deficit: f64, total_interest_expense: f64, gdp_growth_rate: f64) -> Result<()> {
        self.previous = self.snapshot();

        self.gdp *= 1.0 + gdp_growth_rate / 100.0;
        self.debt += deficit + total_interest_expense;
        self.year += 1;

        self.validate()
    }

    pub fn snapshot(&self) -> YearSnapshot {
        YearSnapshot {
            year: self.year,
            gdp: self.gdp,
            debt: self.debt,
            debt_to_gdp: self.debt_to_gdp(),
            interest_rate: self.interest_rate,
        }
    }

    /// Debt and GDP must stay positive and finite for the ratio to mean anything
    pub fn validate(&self) -> Result<()> {
        positive("GDP", self.gdp)?;
        positive("debt", self.debt)?;
        if !self.interest_rate.is_finite() {
            return Err(DebtSimError::arithmetic(format!(
                "interest rate in {} is {}",
                self.year, self.interest_rate
            )));
        }
        Ok(())
    }
}

fn positive(what: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(DebtSimError::arithmetic(format!("{} must be positive and finite, got {}", what, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assumptions() -> MacroAssumptions {
        MacroAssumptions {
            initial_gdp: 2000.0,
            initial_debt: 2400.0,
            initial_interest_rate: 3.0,
            gdp_growth_rate: 5.0,
            primary_deficit_pct_gdp: 4.0,
        }
    }

    #[test]
    fn test_initial_state() {
        let state = YearlyMacroState::initial(&assumptions(), 2024).unwrap();
        assert_eq!(state.year, 2024);
        assert_relative_eq!(state.debt_to_gdp(), 1.2);
        assert_eq!(state.previous().year, 2023);
        assert_eq!(state.previous_debt().unwrap(), 2400.0);
    }

    #[test]
    fn test_advance_snapshots_then_grows() {
        let mut state = YearlyMacroState::initial(&assumptions(), 2024).unwrap();
        state.advance(80.0, 72.0, 5.0).unwrap();

        assert_eq!(state.year, 2025);
        assert_relative_eq!(state.gdp(), 2100.0, max_relative = 1e-12);
        assert_relative_eq!(state.debt(), 2552.0, max_relative = 1e-12);
        assert_eq!(state.debt_to_gdp(), state.debt() / state.gdp());

        let previous = state.previous();
        assert_eq!(previous.year, 2024);
        assert_eq!(previous.debt, 2400.0);
        assert_eq!(previous.gdp, 2000.0);
    }

    #[test]
    fn test_prorate_first_year() {
        let mut state = YearlyMacroState::initial(&assumptions(), 2024).unwrap();
        state.prorate_first_year(80.0, 0.5, 5.0).unwrap();
        assert_relative_eq!(state.debt(), 2440.0, max_relative = 1e-12);
        assert_relative_eq!(state.gdp(), 2050.0, max_relative = 1e-12);
        assert_eq!(state.debt_to_gdp(), 2440.0 / state.gdp());
    }

    #[test]
    fn test_debt_wiped_out_is_arithmetic_error() {
        let mut state = YearlyMacroState::initial(&assumptions(), 2024).unwrap();
        let result = state.advance(-3000.0, 0.0, 5.0);
        assert!(matches!(result, Err(DebtSimError::Arithmetic(_))));
    }

    #[test]
    fn test_rejects_zero_initial_gdp() {
        let bad = MacroAssumptions { initial_gdp: 0.0, ..assumptions() };
        assert!(YearlyMacroState::initial(&bad, 2024).is_err());
    }
}
