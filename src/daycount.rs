//! Fixed 365-day year fractions used for interest accrual
//!
//! Every year has 365 days and February always has 28. Leap days are not
//! modeled: a Feb 29 date counts the same number of days as Mar 1.

use chrono::{Datelike, NaiveDate};

use crate::error::{DebtSimError, Result};

/// Days in the modeled year
pub const DAYS_IN_YEAR: f64 = 365.0;

/// Month lengths, January first
const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Days from the start of the year up to and including the given date
fn days_passed(month: u32, day: u32) -> u32 {
    let full_months = (month.clamp(1, 12) - 1) as usize;
    DAYS_IN_MONTH[..full_months].iter().sum::<u32>() + day
}

/// Fraction of the year left after the given date (issuance year)
pub fn fraction_of_year_remaining(month: u32, day: u32) -> f64 {
    (DAYS_IN_YEAR - days_passed(month, day) as f64) / DAYS_IN_YEAR
}

/// Fraction of the year that has passed by the given date (maturity year)
pub fn fraction_of_year_elapsed(month: u32, day: u32) -> f64 {
    days_passed(month, day) as f64 / DAYS_IN_YEAR
}

/// Actual days between two dates of the same calendar year, over 365
pub fn fraction_of_year_between(issue_date: NaiveDate, maturity_date: NaiveDate) -> Result<f64> {
    if issue_date.year() != maturity_date.year() {
        return Err(DebtSimError::InvalidInput(format!(
            "{} and {} fall in different years; fraction_of_year_between needs same-year dates",
            issue_date, maturity_date
        )));
    }

    let days_between = (maturity_date - issue_date).num_days();
    Ok(days_between as f64 / DAYS_IN_YEAR)
}

/// `fraction_of_year_remaining` for a date
pub fn remaining_after(date: NaiveDate) -> f64 {
    fraction_of_year_remaining(date.month(), date.day())
}

/// `fraction_of_year_elapsed` for a date
pub fn elapsed_by(date: NaiveDate) -> f64 {
    fraction_of_year_elapsed(date.month(), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_remaining_on_january_first() {
        // Jan 1 itself counts as passed
        assert_eq!(fraction_of_year_remaining(1, 1), 364.0 / 365.0);
        assert_eq!(fraction_of_year_elapsed(1, 1), 1.0 / 365.0);
    }

    #[test]
    fn test_year_end() {
        assert_eq!(fraction_of_year_remaining(12, 31), 0.0);
        assert_eq!(fraction_of_year_elapsed(12, 31), 1.0);
    }

    #[test]
    fn test_remaining_and_elapsed_partition_the_year() {
        for month in 1..=12 {
            for day in [1, 10, 28] {
                let total = fraction_of_year_remaining(month, day) + fraction_of_year_elapsed(month, day);
                assert_abs_diff_eq!(total, 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_mid_year_values() {
        // Jun 30 = 181 days passed
        assert_eq!(fraction_of_year_elapsed(6, 30), 181.0 / 365.0);
        assert_eq!(fraction_of_year_remaining(6, 30), 184.0 / 365.0);
    }

    #[test]
    fn test_leap_day_counts_like_march_first() {
        assert_eq!(remaining_after(date(2024, 2, 29)), fraction_of_year_remaining(3, 1));
        assert_eq!(elapsed_by(date(2024, 2, 29)), fraction_of_year_elapsed(3, 1));
    }

    #[test]
    fn test_between_same_year() {
        let fraction = fraction_of_year_between(date(2021, 3, 1), date(2021, 9, 1)).unwrap();
        assert_eq!(fraction, 184.0 / 365.0);

        let zero = fraction_of_year_between(date(2021, 3, 1), date(2021, 3, 1)).unwrap();
        assert_eq!(zero, 0.0);
    }

    #[test]
    fn test_between_rejects_different_years() {
        let result = fraction_of_year_between(date(2021, 12, 1), date(2022, 1, 15));
        assert!(matches!(result, Err(DebtSimError::InvalidInput(_))));
    }
}
