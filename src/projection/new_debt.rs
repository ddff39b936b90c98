//! Interest on debt issued to finance primary deficits
//!
//! Newly issued deficit debt is not part of the instrument book, so its
//! interest is approximated separately. The two approximations do not agree
//! and a run uses exactly one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::state::YearlyMacroState;
use crate::error::{DebtSimError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewDebtInterestStrategy {
    /// Every deficit since the cutoff stays outstanding all year at the current rate
    Cumulative,
    /// Half of the latest debt increase plus all growth before it since the cutoff
    AverageBalance,
}

impl NewDebtInterestStrategy {
    /// Balance that bears new-debt interest this year.
    ///
    /// `Cumulative` reads `cumulative_new_debt`, which must already include
    /// this year's deficit.
    pub fn interest_bearing_balance(&self, state: &YearlyMacroState) -> Result<f64> {
        match self {
            NewDebtInterestStrategy::Cumulative => Ok(state.cumulative_new_debt),
            NewDebtInterestStrategy::AverageBalance => {
                let previous_debt = state.previous_debt()?;
                let current_year_increase = state.debt() - previous_debt;
                let prior_years = state.debt() - current_year_increase - state.initial_debt();
                Ok(current_year_increase / 2.0 + prior_years)
            }
        }
    }

    /// Interest on the new-debt balance at `rate` percent
    pub fn interest(&self, state: &YearlyMacroState, rate: f64) -> Result<f64> {
        Ok(self.interest_bearing_balance(state)? * rate / 100.0)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NewDebtInterestStrategy::Cumulative => "cumulative",
            NewDebtInterestStrategy::AverageBalance => "average_balance",
        }
    }
}

impl fmt::Display for NewDebtInterestStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NewDebtInterestStrategy {
    type Err = DebtSimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "cumulative" => Ok(NewDebtInterestStrategy::Cumulative),
            "average_balance" => Ok(NewDebtInterestStrategy::AverageBalance),
            other => Err(DebtSimError::config(format!(
                "unknown new-debt strategy '{}' (expected cumulative or average_balance)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::MacroAssumptions;
    use approx::assert_relative_eq;

    fn state() -> YearlyMacroState {
        let assumptions = MacroAssumptions {
            initial_gdp: 1000.0,
            initial_debt: 800.0,
            initial_interest_rate: 4.0,
            gdp_growth_rate: 0.0,
            primary_deficit_pct_gdp: 5.0,
        };
        YearlyMacroState::initial(&assumptions, 2024).unwrap()
    }

    #[test]
    fn test_cumulative_charges_all_deficits() {
        let mut state = state();
        state.cumulative_new_debt = 150.0;
        let interest = NewDebtInterestStrategy::Cumulative.interest(&state, 4.0).unwrap();
        assert_relative_eq!(interest, 6.0, max_relative = 1e-12);
    }

    #[test]
    fn test_average_balance_after_two_years() {
        let mut state = state();
        // 800 -> 850 -> 910
        state.advance(50.0, 0.0, 0.0).unwrap();
        state.advance(60.0, 0.0, 0.0).unwrap();

        // Half of this year's 60 plus the 50 from before
        let balance = NewDebtInterestStrategy::AverageBalance.interest_bearing_balance(&state).unwrap();
        assert_relative_eq!(balance, 80.0, max_relative = 1e-12);

        let interest = NewDebtInterestStrategy::AverageBalance.interest(&state, 5.0).unwrap();
        assert_relative_eq!(interest, 4.0, max_relative = 1e-12);
    }

    #[test]
    fn test_average_balance_first_year_is_zero() {
        let balance = NewDebtInterestStrategy::AverageBalance.interest_bearing_balance(&state()).unwrap();
        assert_eq!(balance, 0.0);
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!("cumulative".parse::<NewDebtInterestStrategy>().unwrap(), NewDebtInterestStrategy::Cumulative);
        assert_eq!("Average-Balance".parse::<NewDebtInterestStrategy>().unwrap(), NewDebtInterestStrategy::AverageBalance);
        assert!("midpoint".parse::<NewDebtInterestStrategy>().is_err());
    }
}
