//! Load historical securities from the flat Treasury security file
//!
//! The file is append-only: the same security appears once per record date,
//! and subtotal rows are mixed in with individual securities.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::Reader;
use log::{info, warn};

use super::{Instrument, SecurityType};
use crate::error::{DebtSimError, Result};

/// Raw CSV row; extra columns in the file are ignored
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Record Date")]
    record_date: String,
    #[serde(rename = "Security Class 1 Description")]
    class_1_description: String,
    #[serde(rename = "Security Class 2 Description")]
    class_2_description: String,
    #[serde(rename = "Interest Rate")]
    interest_rate: String,
    #[serde(rename = "Yield")]
    yield_rate: String,
    #[serde(rename = "Issue Date")]
    issue_date: String,
    #[serde(rename = "Maturity Date")]
    maturity_date: String,
    #[serde(rename = "Issued Amount (in Millions)")]
    issued_amount: String,
}

/// Row counts removed at each cleaning step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub rows_read: usize,
    pub other_types: usize,
    pub duplicates: usize,
    pub totals: usize,
    pub missing_dates: usize,
    pub bad_amounts: usize,
    pub invalid: usize,
}

/// Cleaned securities plus the last record date in the file
#[derive(Debug, Clone)]
pub struct LoadedSecurities {
    pub instruments: Vec<Instrument>,
    /// Max record date; reissuance and the yearly loop start here
    pub cutoff: NaiveDate,
    pub stats: LoadStats,
}

fn is_missing(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v.eq_ignore_ascii_case("null") || v.eq_ignore_ascii_case("nan") || v == "*"
}

fn parse_date(value: &str) -> Result<Option<NaiveDate>> {
    if is_missing(value) {
        return Ok(None);
    }
    let v = value.trim();
    match NaiveDate::parse_from_str(v, "%Y-%m-%d") {
        Ok(date) => Ok(Some(date)),
        Err(_) => Ok(Some(NaiveDate::parse_from_str(v, "%m/%d/%Y")?)),
    }
}

fn parse_number(value: &str) -> Option<f64> {
    if is_missing(value) {
        return None;
    }
    value.trim().replace(',', "").parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse and check the requested security types against the closed set
pub fn parse_security_types(names: &[String]) -> Result<Vec<SecurityType>> {
    if names.is_empty() {
        return Err(DebtSimError::config("no security types requested"));
    }
    names.iter().map(|n| n.parse()).collect()
}

/// Load securities of the requested types from a CSV file
pub fn load_securities<P: AsRef<Path>>(path: P, security_types: &[SecurityType]) -> Result<LoadedSecurities> {
    let reader = Reader::from_path(path)?;
    load_from_csv(reader, security_types)
}

/// Load securities from any reader (e.g., string buffer)
pub fn load_securities_from_reader<R: Read>(reader: R, security_types: &[SecurityType]) -> Result<LoadedSecurities> {
    load_from_csv(Reader::from_reader(reader), security_types)
}

fn load_from_csv<R: Read>(mut reader: Reader<R>, security_types: &[SecurityType]) -> Result<LoadedSecurities> {
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        rows.push(row);
    }

    let mut stats = LoadStats {
        rows_read: rows.len(),
        ..Default::default()
    };

    // Every requested type has to exist in the raw data
    let present: HashSet<SecurityType> = rows
        .iter()
        .filter_map(|r| r.class_1_description.parse().ok())
        .collect();
    if let Some(missing) = security_types.iter().find(|t| !present.contains(t)) {
        return Err(DebtSimError::config(format!(
            "security type '{}' was requested but does not appear in the raw data",
            missing
        )));
    }

    let mut seen = HashSet::new();
    let mut instruments = Vec::new();
    let mut cutoff: Option<NaiveDate> = None;

    for row in rows {
        let security_type = match row.class_1_description.parse::<SecurityType>() {
            Ok(t) if security_types.contains(&t) => t,
            _ => {
                stats.other_types += 1;
                continue;
            }
        };

        // Same security on a later record date; a reopening has a different issue date
        if !seen.insert((row.class_2_description.clone(), row.issue_date.clone())) {
            stats.duplicates += 1;
            continue;
        }

        if row.class_2_description.contains("Total") {
            stats.totals += 1;
            continue;
        }

        let (issue_date, maturity_date) = match (parse_date(&row.issue_date)?, parse_date(&row.maturity_date)?) {
            (Some(issue), Some(maturity)) => (issue, maturity),
            _ => {
                stats.missing_dates += 1;
                continue;
            }
        };

        let issued_amount = match parse_number(&row.issued_amount) {
            Some(amount) => amount,
            None => {
                warn!("Skipping {}: unparseable issued amount '{}'", row.class_2_description, row.issued_amount);
                stats.bad_amounts += 1;
                continue;
            }
        };

        if let Some(record_date) = parse_date(&row.record_date)? {
            cutoff = Some(cutoff.map_or(record_date, |c| c.max(record_date)));
        }

        let interest_rate = parse_number(&row.interest_rate);
        let yield_rate = parse_number(&row.yield_rate);
        if interest_rate.is_none() && yield_rate.is_none() {
            warn!("Skipping {}: neither interest rate nor yield", row.class_2_description);
            stats.invalid += 1;
            continue;
        }

        match Instrument::new(
            row.class_2_description,
            security_type,
            issue_date,
            maturity_date,
            issued_amount,
            interest_rate,
            yield_rate,
        ) {
            Ok(instrument) => instruments.push(instrument),
            Err(e) => {
                warn!("Skipping record: {}", e);
                stats.invalid += 1;
            }
        }
    }

    let cutoff = cutoff.ok_or_else(|| DebtSimError::config("no record dates left after filtering the security file"))?;

    info!(
        "Loaded {} securities of {} rows (cutoff {}): {:?}",
        instruments.len(),
        stats.rows_read,
        cutoff,
        stats
    );

    Ok(LoadedSecurities {
        instruments,
        cutoff,
        stats,
    })
}
