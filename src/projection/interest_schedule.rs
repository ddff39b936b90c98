//! Static interest schedule: accrued interest by year and security type
//! without the macro feedback loop

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::accrual::payment_schedule;
use super::results::round_share;
use crate::assumptions::MacroAssumptions;
use crate::error::Result;
use crate::securities::{InstrumentBook, SecurityType};

/// Interest paid in one year, split by security type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterestScheduleRow {
    pub year: i32,
    pub bills: f64,
    pub notes: f64,
    pub bonds: f64,
    pub total: f64,
    /// Filled in by `InterestSchedule::with_gdp`
    pub gdp: Option<f64>,
    pub total_share_gdp: Option<f64>,
}

impl InterestScheduleRow {
    fn add(&mut self, security_type: SecurityType, payment: f64) {
        match security_type {
            SecurityType::Bill => self.bills += payment,
            SecurityType::Note => self.notes += payment,
            SecurityType::Bond => self.bonds += payment,
        }
        self.total += payment;
    }

    pub fn by_type(&self, security_type: SecurityType) -> f64 {
        match security_type {
            SecurityType::Bill => self.bills,
            SecurityType::Note => self.notes,
            SecurityType::Bond => self.bonds,
        }
    }
}

/// Rows ordered by year
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterestSchedule {
    pub rows: Vec<InterestScheduleRow>,
}

impl InterestSchedule {
    /// Aggregate every instrument's payment schedule over `years`.
    ///
    /// Rates are used as they stand in the book; no rate is stamped.
    pub fn from_book(book: &InstrumentBook, years: RangeInclusive<i32>) -> Result<Self> {
        let payments: Vec<(SecurityType, Vec<(i32, f64)>)> = book
            .as_slice()
            .par_iter()
            .filter(|i| i.maturity_year() >= *years.start() && i.issue_year() <= *years.end())
            .map(|i| payment_schedule(i).map(|schedule| (i.security_type, schedule)))
            .collect::<Result<_>>()?;

        let mut by_year: BTreeMap<i32, InterestScheduleRow> = years
            .clone()
            .map(|year| (year, InterestScheduleRow { year, ..Default::default() }))
            .collect();

        for (security_type, schedule) in payments {
            for (year, payment) in schedule {
                if let Some(row) = by_year.get_mut(&year) {
                    row.add(security_type, payment);
                }
            }
        }

        Ok(Self {
            rows: by_year.into_values().collect(),
        })
    }

    /// Attach GDP under constant growth and each year's interest share of it
    pub fn with_gdp(mut self, assumptions: &MacroAssumptions) -> Self {
        let (first, last) = match (self.rows.first(), self.rows.last()) {
            (Some(first), Some(last)) => (first.year, last.year),
            _ => return self,
        };
        let path: BTreeMap<i32, f64> = assumptions.gdp_path(first, last).into_iter().collect();

        for row in &mut self.rows {
            if let Some(&gdp) = path.get(&row.year) {
                row.gdp = Some(gdp);
                row.total_share_gdp = Some(round_share(row.total / gdp));
            }
        }
        self
    }

    pub fn get(&self, year: i32) -> Option<&InterestScheduleRow> {
        self.rows.iter().find(|r| r.year == year)
    }

    pub fn total(&self) -> f64 {
        self.rows.iter().map(|r| r.total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::securities::Instrument;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn book() -> InstrumentBook {
        InstrumentBook::from_instruments([
            Instrument::new("B", SecurityType::Bond, date(2020, 1, 1), date(2030, 1, 1), 1000.0, Some(4.0), None).unwrap(),
            Instrument::new("N", SecurityType::Note, date(2019, 5, 15), date(2026, 5, 15), 500.0, Some(2.0), None).unwrap(),
            Instrument::new("T", SecurityType::Bill, date(2025, 3, 1), date(2025, 9, 1), 200.0, None, Some(5.0)).unwrap(),
        ])
    }

    #[test]
    fn test_split_by_type() {
        let schedule = InterestSchedule::from_book(&book(), 2024..=2026).unwrap();
        assert_eq!(schedule.rows.len(), 3);

        let y2024 = schedule.get(2024).unwrap();
        assert_relative_eq!(y2024.bonds, 40.0, max_relative = 1e-12);
        assert_relative_eq!(y2024.notes, 10.0, max_relative = 1e-12);
        assert_eq!(y2024.bills, 0.0);

        let y2025 = schedule.get(2025).unwrap();
        assert_relative_eq!(y2025.bills, 184.0 / 365.0 * 200.0 * 0.05, max_relative = 1e-12);
        assert_relative_eq!(y2025.total, y2025.bills + y2025.notes + y2025.bonds, max_relative = 1e-12);
        assert_eq!(y2025.by_type(SecurityType::Note), y2025.notes);
    }

    #[test]
    fn test_years_without_payments_are_present() {
        let schedule = InterestSchedule::from_book(&book(), 2031..=2032).unwrap();
        assert_eq!(schedule.rows.len(), 2);
        assert_eq!(schedule.total(), 0.0);
    }

    #[test]
    fn test_gdp_share() {
        let assumptions = MacroAssumptions {
            initial_gdp: 1000.0,
            initial_debt: 1000.0,
            initial_interest_rate: 4.0,
            gdp_growth_rate: 0.0,
            primary_deficit_pct_gdp: 0.0,
        };
        let schedule = InterestSchedule::from_book(&book(), 2024..=2024).unwrap().with_gdp(&assumptions);
        let row = schedule.get(2024).unwrap();
        assert_eq!(row.gdp, Some(1000.0));
        assert_eq!(row.total_share_gdp, Some(0.05));
    }
}
