//! Yearly output records for a simulation run

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Round a reported GDP share; simulation values are never rounded
pub fn round_share(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// One simulated year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyResult {
    pub year: i32,

    pub gdp: f64,
    pub debt: f64,
    pub debt_to_gdp: f64,

    /// New borrowing from the primary deficit
    pub primary_deficit: f64,

    /// Rate in percent applied this year
    pub interest_rate: f64,

    /// Interest on historical and reissued instruments, after the multiplier
    pub interest_expense_existing: f64,

    /// Interest on deficit-financed debt
    pub interest_expense_new: f64,

    pub interest_expense_total: f64,

    // Shares of GDP, rounded to 3 decimals
    pub interest_expense_existing_share_gdp: f64,
    pub interest_expense_new_share_gdp: f64,
    pub interest_expense_share_gdp: f64,
    pub primary_deficit_share_gdp: f64,

    /// Instruments outstanding at some point this year
    pub active_instruments: usize,

    /// Instruments whose rate was set from this year's rate
    pub stamped_instruments: usize,
}

impl YearlyResult {
    /// Build a record; shares of GDP are derived and rounded here
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: i32,
        gdp: f64,
        debt: f64,
        primary_deficit: f64,
        interest_rate: f64,
        interest_expense_existing: f64,
        interest_expense_new: f64,
        active_instruments: usize,
        stamped_instruments: usize,
    ) -> Self {
        let interest_expense_total = interest_expense_existing + interest_expense_new;
        Self {
            year,
            gdp,
            debt,
            debt_to_gdp: debt / gdp,
            primary_deficit,
            interest_rate,
            interest_expense_existing,
            interest_expense_new,
            interest_expense_total,
            interest_expense_existing_share_gdp: round_share(interest_expense_existing / gdp),
            interest_expense_new_share_gdp: round_share(interest_expense_new / gdp),
            interest_expense_share_gdp: round_share(interest_expense_total / gdp),
            primary_deficit_share_gdp: round_share(primary_deficit / gdp),
            active_instruments,
            stamped_instruments,
        }
    }
}

/// Complete simulation output, ordered by year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub cutoff: NaiveDate,
    pub horizon: NaiveDate,
    pub years: Vec<YearlyResult>,
}

impl SimulationResult {
    pub fn new(cutoff: NaiveDate, horizon: NaiveDate) -> Self {
        Self {
            cutoff,
            horizon,
            years: Vec::new(),
        }
    }

    /// Append the next year's record
    pub fn add_year(&mut self, row: YearlyResult) {
        debug_assert!(self.years.last().map_or(true, |last| last.year < row.year));
        self.years.push(row);
    }

    pub fn get(&self, year: i32) -> Option<&YearlyResult> {
        let first = self.years.first()?.year;
        usize::try_from(year - first).ok().and_then(|i| self.years.get(i))
    }

    /// Get summary statistics
    pub fn summary(&self) -> SimulationSummary {
        let total_interest_expense: f64 = self.years.iter().map(|r| r.interest_expense_total).sum();
        let total_primary_deficit: f64 = self.years.iter().map(|r| r.primary_deficit).sum();

        let peak = self
            .years
            .iter()
            .max_by(|a, b| a.interest_expense_share_gdp.total_cmp(&b.interest_expense_share_gdp));

        let last = self.years.last();

        SimulationSummary {
            total_years: self.years.len() as u32,
            total_interest_expense,
            total_primary_deficit,
            final_debt: last.map(|r| r.debt).unwrap_or(0.0),
            final_debt_to_gdp: last.map(|r| r.debt_to_gdp).unwrap_or(0.0),
            final_interest_rate: last.map(|r| r.interest_rate).unwrap_or(0.0),
            peak_interest_share_gdp: peak.map(|r| r.interest_expense_share_gdp).unwrap_or(0.0),
            peak_interest_year: peak.map(|r| r.year),
        }
    }
}

/// Summary statistics for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub total_years: u32,
    pub total_interest_expense: f64,
    pub total_primary_deficit: f64,
    pub final_debt: f64,
    pub final_debt_to_gdp: f64,
    pub final_interest_rate: f64,
    pub peak_interest_share_gdp: f64,
    pub peak_interest_year: Option<i32>,
}
