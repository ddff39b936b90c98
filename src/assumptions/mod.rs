//! Economic assumptions and rate tables

mod rates;
pub mod loader;

pub use rates::{RateSchedule, TermRate, YearlyRateTable, FALLBACK_YEAR, STANDARD_TERMS};

use serde::{Deserialize, Serialize};

use crate::error::{DebtSimError, Result};

/// Starting macro state and growth assumptions for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroAssumptions {
    /// GDP at the cutoff date (millions)
    pub initial_gdp: f64,

    /// Total debt at the cutoff date (millions)
    pub initial_debt: f64,

    /// Starting interest rate in percent
    pub initial_interest_rate: f64,

    /// Annual nominal GDP growth in percent
    pub gdp_growth_rate: f64,

    /// Primary deficit as a percent of GDP
    pub primary_deficit_pct_gdp: f64,
}

impl MacroAssumptions {
    /// Reject inputs that would make the debt-to-GDP ratio undefined
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_gdp.is_finite() && self.initial_gdp > 0.0) {
            return Err(DebtSimError::config(format!("initial GDP must be positive, got {}", self.initial_gdp)));
        }
        if !(self.initial_debt.is_finite() && self.initial_debt > 0.0) {
            return Err(DebtSimError::config(format!("initial debt must be positive, got {}", self.initial_debt)));
        }
        for (name, value) in [
            ("initial interest rate", self.initial_interest_rate),
            ("GDP growth rate", self.gdp_growth_rate),
            ("primary deficit", self.primary_deficit_pct_gdp),
        ] {
            if !value.is_finite() {
                return Err(DebtSimError::config(format!("{} is not a finite number", name)));
            }
        }
        if self.gdp_growth_rate <= -100.0 {
            return Err(DebtSimError::config("GDP growth rate must be above -100%"));
        }
        Ok(())
    }

    pub fn initial_debt_to_gdp(&self) -> f64 {
        self.initial_debt / self.initial_gdp
    }

    /// GDP for each year from `start_year` to `end_year` under constant growth
    pub fn gdp_path(&self, start_year: i32, end_year: i32) -> Vec<(i32, f64)> {
        let mut gdp = self.initial_gdp;
        let mut path = Vec::new();
        for year in start_year..=end_year {
            path.push((year, gdp));
            gdp *= 1.0 + self.gdp_growth_rate / 100.0;
        }
        path
    }
}

impl Default for MacroAssumptions {
    /// Roughly the US position in early 2024
    fn default() -> Self {
        Self {
            initial_gdp: 27_360_000.0,
            initial_debt: 34_000_000.0,
            initial_interest_rate: 4.0,
            gdp_growth_rate: 4.0,
            primary_deficit_pct_gdp: 3.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gdp_path_compounds() {
        let assumptions = MacroAssumptions {
            initial_gdp: 100.0,
            gdp_growth_rate: 10.0,
            ..Default::default()
        };
        let path = assumptions.gdp_path(2024, 2026);
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], (2024, 100.0));
        assert_relative_eq!(path[1].1, 110.0, max_relative = 1e-12);
        assert_relative_eq!(path[2].1, 121.0, max_relative = 1e-12);
    }

    #[test]
    fn test_validate_rejects_zero_gdp_and_debt() {
        let zero_gdp = MacroAssumptions { initial_gdp: 0.0, ..Default::default() };
        assert!(matches!(zero_gdp.validate(), Err(DebtSimError::Configuration(_))));

        let zero_debt = MacroAssumptions { initial_debt: 0.0, ..Default::default() };
        assert!(zero_debt.validate().is_err());

        assert!(MacroAssumptions::default().validate().is_ok());
    }
}
