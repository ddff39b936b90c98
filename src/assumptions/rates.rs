//! Rate lookup tables: term-keyed schedule for reissuance, year-keyed table for fixed-schedule runs

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DebtSimError, Result};

/// Year key holding the rate for years not listed explicitly
pub const FALLBACK_YEAR: i32 = 9999;

/// Standard Treasury tenors in years
pub const STANDARD_TERMS: [f64; 8] = [1.0, 2.0, 3.0, 5.0, 7.0, 10.0, 20.0, 30.0];

/// One schedule entry: term in years and rate in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermRate {
    pub term_years: f64,
    pub rate: f64,
}

/// Accepted JSON shapes: `[{"term_years": 1, "rate": 5.0}, ...]` or `{"1": 5.0, ...}`
#[derive(Deserialize)]
#[serde(untagged)]
enum ScheduleRepr {
    Entries(Vec<TermRate>),
    Map(Map<String, Value>),
}

/// Term-to-rate schedule looked up by nearest term.
///
/// Entries keep their declared order. A query picks the first entry whose
/// term is closest, so ties go to the earlier entry, not the smaller term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleRepr", into = "Vec<TermRate>")]
pub struct RateSchedule {
    entries: Vec<TermRate>,
}

impl RateSchedule {
    /// Build a schedule, rejecting empty input and non-finite values
    pub fn new(entries: Vec<TermRate>) -> Result<Self> {
        if entries.is_empty() {
            return Err(DebtSimError::config("rate schedule has no entries"));
        }
        if let Some(bad) = entries.iter().find(|e| !e.term_years.is_finite() || !e.rate.is_finite()) {
            return Err(DebtSimError::config(format!(
                "rate schedule entry {:?} is not a finite number",
                bad
            )));
        }
        Ok(Self { entries })
    }

    /// Build from `(term_years, rate)` pairs in declared order
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self> {
        Self::new(
            pairs
                .iter()
                .map(|&(term_years, rate)| TermRate { term_years, rate })
                .collect(),
        )
    }

    /// Same rate for every standard tenor
    pub fn flat(rate: f64) -> Self {
        Self {
            entries: STANDARD_TERMS
                .iter()
                .map(|&term_years| TermRate { term_years, rate })
                .collect(),
        }
    }

    /// Parse a JSON object or entry list, as passed on the command line
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn entries(&self) -> &[TermRate] {
        &self.entries
    }

    /// Rate of the entry nearest to `term_years`
    pub fn rate_for_term(&self, term_years: f64) -> Result<f64> {
        if !term_years.is_finite() {
            return Err(DebtSimError::InvalidInput(format!("term of {} years", term_years)));
        }

        let mut best: Option<(f64, f64)> = None;
        for entry in &self.entries {
            let distance = (entry.term_years - term_years).abs();
            match best {
                Some((best_distance, _)) if distance >= best_distance => {}
                _ => best = Some((distance, entry.rate)),
            }
        }

        best.map(|(_, rate)| rate)
            .ok_or_else(|| DebtSimError::config("rate schedule has no entries"))
    }
}

impl Default for RateSchedule {
    fn default() -> Self {
        Self::flat(5.0)
    }
}

impl TryFrom<ScheduleRepr> for RateSchedule {
    type Error = String;

    fn try_from(repr: ScheduleRepr) -> std::result::Result<Self, String> {
        let entries = match repr {
            ScheduleRepr::Entries(entries) => entries,
            ScheduleRepr::Map(map) => map
                .into_iter()
                .map(|(key, value)| {
                    let term_years = key
                        .trim()
                        .parse::<f64>()
                        .map_err(|_| format!("rate schedule key '{}' is not a number of years", key))?;
                    let rate = value
                        .as_f64()
                        .ok_or_else(|| format!("rate for term '{}' is not a number", key))?;
                    Ok(TermRate { term_years, rate })
                })
                .collect::<std::result::Result<Vec<_>, String>>()?,
        };
        RateSchedule::new(entries).map_err(|e| e.to_string())
    }
}

impl From<RateSchedule> for Vec<TermRate> {
    fn from(schedule: RateSchedule) -> Self {
        schedule.entries
    }
}

/// Year-keyed rates with a `FALLBACK_YEAR` entry for unlisted years
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearlyRateTable {
    rates: BTreeMap<i32, f64>,
}

impl YearlyRateTable {
    pub fn new(rates: BTreeMap<i32, f64>) -> Self {
        Self { rates }
    }

    /// Same rate every year
    pub fn flat(rate: f64) -> Self {
        Self {
            rates: BTreeMap::from([(FALLBACK_YEAR, rate)]),
        }
    }

    pub fn with_rate(mut self, year: i32, rate: f64) -> Self {
        self.rates.insert(year, rate);
        self
    }

    /// Rate listed for `year`, or the fallback entry
    pub fn rate_for_year(&self, year: i32) -> Result<f64> {
        self.rates
            .get(&year)
            .or_else(|| self.rates.get(&FALLBACK_YEAR))
            .copied()
            .ok_or_else(|| {
                DebtSimError::config(format!(
                    "no rate for year {} and no fallback entry under key {}",
                    year, FALLBACK_YEAR
                ))
            })
    }

    /// Check every year of a run resolves, before the run starts
    pub fn validate_years(&self, years: RangeInclusive<i32>) -> Result<()> {
        for year in years {
            let rate = self.rate_for_year(year)?;
            if !rate.is_finite() {
                return Err(DebtSimError::config(format!("rate for year {} is not finite", year)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_term_lookup() {
        let schedule = RateSchedule::from_pairs(&[(1.0, 0.03), (5.0, 0.04), (10.0, 0.05)]).unwrap();

        // 7 years: distance 2 to 5y, 3 to 10y
        assert_eq!(schedule.rate_for_term(7.0).unwrap(), 0.04);
        assert_eq!(schedule.rate_for_term(0.25).unwrap(), 0.03);
        assert_eq!(schedule.rate_for_term(30.0).unwrap(), 0.05);
    }

    #[test]
    fn test_exact_key_returns_its_rate() {
        let schedule = RateSchedule::from_pairs(&[(1.0, 4.9), (2.0, 4.6), (10.0, 4.3), (30.0, 4.5)]).unwrap();
        for entry in schedule.entries() {
            assert_eq!(schedule.rate_for_term(entry.term_years).unwrap(), entry.rate);
        }
    }

    #[test]
    fn test_tie_goes_to_earlier_declared_key() {
        // 7.5 is equidistant from 5 and 10
        let ascending = RateSchedule::from_pairs(&[(5.0, 4.0), (10.0, 5.0)]).unwrap();
        assert_eq!(ascending.rate_for_term(7.5).unwrap(), 4.0);

        let descending = RateSchedule::from_pairs(&[(10.0, 5.0), (5.0, 4.0)]).unwrap();
        assert_eq!(descending.rate_for_term(7.5).unwrap(), 5.0);
    }

    #[test]
    fn test_empty_schedule_is_config_error() {
        assert!(matches!(RateSchedule::new(vec![]), Err(DebtSimError::Configuration(_))));
    }

    #[test]
    fn test_json_object_keeps_declared_order() {
        let schedule = RateSchedule::from_json(r#"{"10": 5.0, "5": 4.0, "1": 3.0}"#).unwrap();
        let terms: Vec<f64> = schedule.entries().iter().map(|e| e.term_years).collect();
        assert_eq!(terms, vec![10.0, 5.0, 1.0]);
        assert_eq!(schedule.rate_for_term(7.5).unwrap(), 5.0);
    }

    #[test]
    fn test_json_entry_list() {
        let schedule = RateSchedule::from_json(r#"[{"term_years": 2, "rate": 4.1}, {"term_years": 30, "rate": 4.6}]"#).unwrap();
        assert_eq!(schedule.rate_for_term(20.0).unwrap(), 4.6);

        assert!(RateSchedule::from_json("[]").is_err());
        assert!(RateSchedule::from_json(r#"{"ten": 4.0}"#).is_err());
    }

    #[test]
    fn test_yearly_table_fallback() {
        let table = YearlyRateTable::flat(5.0).with_rate(2026, 4.25);
        assert_eq!(table.rate_for_year(2026).unwrap(), 4.25);
        assert_eq!(table.rate_for_year(2040).unwrap(), 5.0);
    }

    #[test]
    fn test_yearly_table_without_fallback() {
        let table = YearlyRateTable::default().with_rate(2025, 4.0).with_rate(2026, 4.1);
        assert!(table.validate_years(2025..=2026).is_ok());
        assert!(matches!(table.rate_for_year(2027), Err(DebtSimError::Configuration(_))));
        assert!(table.validate_years(2025..=2027).is_err());
    }

    #[test]
    fn test_yearly_table_from_json() {
        let table: YearlyRateTable = serde_json::from_str(r#"{"2025": 4.0, "9999": 4.5}"#).unwrap();
        assert_eq!(table.rate_for_year(2025).unwrap(), 4.0);
        assert_eq!(table.rate_for_year(2030).unwrap(), 4.5);
    }
}
