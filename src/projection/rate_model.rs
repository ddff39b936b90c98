//! Yearly interest rate models

use serde::{Deserialize, Serialize};

use crate::assumptions::YearlyRateTable;
use crate::error::{DebtSimError, Result};

/// Ratio change applied to the rate as-is: `0.5 * 0.1 = +0.05` points
pub const UNSCALED: f64 = 1.0;

/// Ratio change expressed in percent first: `0.5 * 0.1 * 100 = +5` points
pub const PERCENT_SCALED: f64 = 100.0;

/// Laubach-style rule: the rate moves with the relative change in debt-to-GDP.
///
/// `rate = previous_rate + laubach_ratio * scale * (ratio - previous_ratio) / previous_ratio`
///
/// Historical calibrations disagree on whether the relative change is taken
/// as a fraction or in percent, so the scale is explicit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EndogenousRateModel {
    /// Rate points per unit of scaled relative debt-to-GDP change
    pub laubach_ratio: f64,
    /// `UNSCALED` or `PERCENT_SCALED`
    pub ratio_change_scale: f64,
}

impl EndogenousRateModel {
    pub fn new(laubach_ratio: f64, ratio_change_scale: f64) -> Self {
        Self {
            laubach_ratio,
            ratio_change_scale,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.laubach_ratio.is_finite() || !self.ratio_change_scale.is_finite() {
            return Err(DebtSimError::config("endogenous rate parameters must be finite"));
        }
        Ok(())
    }

    /// Rate for the current year from last year's rate and both years' debt-to-GDP
    pub fn next_rate(&self, previous_rate: f64, previous_debt_to_gdp: f64, debt_to_gdp: f64) -> Result<f64> {
        if !(previous_debt_to_gdp.is_finite() && previous_debt_to_gdp > 0.0) {
            return Err(DebtSimError::arithmetic(format!(
                "previous debt-to-GDP of {} cannot anchor a relative change",
                previous_debt_to_gdp
            )));
        }

        let relative_change = (debt_to_gdp - previous_debt_to_gdp) / previous_debt_to_gdp;
        let rate = previous_rate + self.laubach_ratio * self.ratio_change_scale * relative_change;

        if !rate.is_finite() {
            return Err(DebtSimError::arithmetic(format!("endogenous rate diverged to {}", rate)));
        }
        Ok(rate)
    }
}

/// How each simulated year's rate is chosen
#[derive(Debug, Clone, PartialEq)]
pub enum RateModel {
    /// Initial rate in the first year, then the Laubach rule
    Endogenous(EndogenousRateModel),
    /// Looked up per year with fallback
    Scheduled(YearlyRateTable),
}
