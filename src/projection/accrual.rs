//! Interest accrued by one instrument in one calendar year

use crate::daycount::{elapsed_by, fraction_of_year_between, remaining_after};
use crate::error::Result;
use crate::securities::Instrument;

/// Share of `year` the instrument accrues interest for.
///
/// Same-year instruments accrue for the actual days between issue and
/// maturity. Multi-year instruments accrue the remainder of the issue year,
/// full interior years, and the elapsed part of the maturity year.
pub fn accrual_fraction(instrument: &Instrument, year: i32) -> Result<f64> {
    if !instrument.is_active_in(year) {
        return Ok(0.0);
    }

    let issue_year = instrument.issue_year();
    let maturity_year = instrument.maturity_year();

    if issue_year == maturity_year {
        return fraction_of_year_between(instrument.issue_date, instrument.maturity_date);
    }

    Ok(if year == issue_year {
        remaining_after(instrument.issue_date)
    } else if year == maturity_year {
        elapsed_by(instrument.maturity_date)
    } else {
        1.0
    })
}

/// Interest payment attributed to `year`; zero when the instrument is not active
pub fn accrued_interest(instrument: &Instrument, year: i32) -> Result<f64> {
    if !instrument.is_active_in(year) {
        return Ok(0.0);
    }

    let rate = instrument.effective_rate()? / 100.0;
    Ok(accrual_fraction(instrument, year)? * instrument.issued_amount * rate)
}

/// Payment for every year the instrument is active, oldest first
pub fn payment_schedule(instrument: &Instrument) -> Result<Vec<(i32, f64)>> {
    (instrument.issue_year()..=instrument.maturity_year())
        .map(|year| accrued_interest(instrument, year).map(|payment| (year, payment)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daycount::{fraction_of_year_elapsed, fraction_of_year_remaining};
    use crate::error::DebtSimError;
    use crate::securities::SecurityType;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_three_year_bond_schedule() {
        let bond = Instrument::new("B", SecurityType::Bond, date(2020, 1, 1), date(2023, 1, 1), 1000.0, Some(4.0), None).unwrap();

        assert_eq!(accrued_interest(&bond, 2020).unwrap(), fraction_of_year_remaining(1, 1) * 1000.0 * 0.04);
        assert_eq!(accrued_interest(&bond, 2021).unwrap(), 1000.0 * 0.04);
        assert_eq!(accrued_interest(&bond, 2022).unwrap(), 1000.0 * 0.04);
        assert_eq!(accrued_interest(&bond, 2023).unwrap(), fraction_of_year_elapsed(1, 1) * 1000.0 * 0.04);
        assert!(accrued_interest(&bond, 2023).unwrap() < 0.2);

        assert_eq!(accrued_interest(&bond, 2019).unwrap(), 0.0);
        assert_eq!(accrued_interest(&bond, 2024).unwrap(), 0.0);
    }

    #[test]
    fn test_same_year_instrument() {
        let bill = Instrument::new("T", SecurityType::Bill, date(2021, 3, 1), date(2021, 9, 1), 500.0, None, Some(5.0)).unwrap();

        let payment = accrued_interest(&bill, 2021).unwrap();
        assert_eq!(payment, 184.0 / 365.0 * 500.0 * 0.05);
        assert_eq!(accrued_interest(&bill, 2022).unwrap(), 0.0);

        let schedule = payment_schedule(&bill).unwrap();
        assert_eq!(schedule, vec![(2021, payment)]);
    }

    #[test]
    fn test_multi_year_payments_sum_to_term() {
        // No Feb 29 inside any span, so the 365-day model is exact
        let cases = [
            (date(2021, 3, 1), date(2023, 8, 15)),
            (date(2025, 1, 31), date(2027, 12, 1)),
            (date(2029, 7, 4), date(2030, 2, 10)),
            (date(2033, 5, 15), date(2035, 11, 15)),
        ];

        for (issue, maturity) in cases {
            let note = Instrument::new("N", SecurityType::Note, issue, maturity, 750.0, Some(3.5), None).unwrap();
            let total: f64 = payment_schedule(&note).unwrap().iter().map(|(_, p)| p).sum();
            let expected = 750.0 * 0.035 * note.term_days() as f64 / 365.0;
            assert_relative_eq!(total, expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_bill_uses_yield_when_rate_missing() {
        let bill = Instrument::new("T", SecurityType::Bill, date(2024, 11, 1), date(2025, 2, 1), 100.0, None, Some(4.0)).unwrap();
        let schedule = payment_schedule(&bill).unwrap();
        assert_eq!(schedule.len(), 2);
        assert_relative_eq!(schedule[0].1, 100.0 * 0.04 * fraction_of_year_remaining(11, 1));
        assert_relative_eq!(schedule[1].1, 100.0 * 0.04 * fraction_of_year_elapsed(2, 1));
    }

    #[test]
    fn test_missing_rate_is_an_error_only_when_active() {
        let unpriced = Instrument::new("U", SecurityType::Bill, date(2024, 1, 1), date(2024, 6, 1), 100.0, None, None).unwrap();
        assert!(matches!(accrued_interest(&unpriced, 2024), Err(DebtSimError::MissingRate { .. })));
        assert_eq!(accrued_interest(&unpriced, 2025).unwrap(), 0.0);
    }
}
