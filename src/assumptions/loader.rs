//! CSV-based rate table loader
//!
//! Schedules can live next to the security file instead of in the JSON config.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use super::rates::{RateSchedule, TermRate, YearlyRateTable};
use crate::error::{DebtSimError, Result};

fn parse_field<T: std::str::FromStr>(value: &str, what: &str, line: usize) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| DebtSimError::config(format!("line {}: '{}' is not a valid {}", line, value, what)))
}

/// Load a reissuance schedule from a `term_years,rate` CSV, keeping row order
pub fn load_rate_schedule(path: &Path) -> Result<RateSchedule> {
    let file = File::open(path)?;
    load_rate_schedule_from_reader(file)
}

pub fn load_rate_schedule_from_reader<R: std::io::Read>(reader: R) -> Result<RateSchedule> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut entries = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let line = i + 2;
        let term_years: f64 = parse_field(record.get(0).unwrap_or(""), "term in years", line)?;
        let rate: f64 = parse_field(record.get(1).unwrap_or(""), "rate", line)?;
        entries.push(TermRate { term_years, rate });
    }

    RateSchedule::new(entries)
}

/// Load a `year,rate` CSV; use year 9999 for the fallback row
pub fn load_yearly_rates(path: &Path) -> Result<YearlyRateTable> {
    let file = File::open(path)?;
    load_yearly_rates_from_reader(file)
}

pub fn load_yearly_rates_from_reader<R: std::io::Read>(reader: R) -> Result<YearlyRateTable> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut rates = BTreeMap::new();

    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let line = i + 2;
        let year: i32 = parse_field(record.get(0).unwrap_or(""), "year", line)?;
        let rate: f64 = parse_field(record.get(1).unwrap_or(""), "rate", line)?;
        rates.insert(year, rate);
    }

    Ok(YearlyRateTable::new(rates))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_rate_schedule() {
        let csv = "term_years,rate\n1,5.1\n2,4.7\n10,4.3\n30,4.5\n";
        let schedule = load_rate_schedule_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(schedule.entries().len(), 4);
        assert_eq!(schedule.rate_for_term(12.0).unwrap(), 4.3);
    }

    #[test]
    fn test_load_rate_schedule_rejects_garbage() {
        let csv = "term_years,rate\none,5.1\n";
        assert!(matches!(load_rate_schedule_from_reader(csv.as_bytes()), Err(DebtSimError::Configuration(_))));

        let empty = "term_years,rate\n";
        assert!(load_rate_schedule_from_reader(empty.as_bytes()).is_err());
    }

    #[test]
    fn test_load_yearly_rates() {
        let csv = "year,rate\n2025,4.4\n2026,4.2\n9999,4.0\n";
        let table = load_yearly_rates_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.rate_for_year(2026).unwrap(), 4.2);
        assert_eq!(table.rate_for_year(2049).unwrap(), 4.0);
    }
}
