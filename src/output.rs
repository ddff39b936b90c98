//! CSV and JSON report writers

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::projection::{InterestSchedule, SimulationResult};
use crate::securities::{Instrument, InstrumentBook, Origin};

/// Flat instrument row for the expanded book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentRecord {
    pub id: usize,
    pub security_id: String,
    pub security_type: String,
    pub origin: String,
    pub predecessor: Option<usize>,
    pub issue_date: NaiveDate,
    pub maturity_date: NaiveDate,
    pub term_days: i64,
    pub issued_amount: f64,
    pub interest_rate: Option<f64>,
    pub yield_rate: Option<f64>,
}

impl From<&Instrument> for InstrumentRecord {
    fn from(instrument: &Instrument) -> Self {
        Self {
            id: instrument.id.0,
            security_id: instrument.security_id.clone(),
            security_type: instrument.security_type.as_str().to_string(),
            origin: match instrument.origin {
                Origin::Historical => "historical",
                Origin::Reissued => "reissued",
            }
            .to_string(),
            predecessor: instrument.predecessor.map(|p| p.0),
            issue_date: instrument.issue_date,
            maturity_date: instrument.maturity_date,
            term_days: instrument.term_days(),
            issued_amount: instrument.issued_amount,
            interest_rate: instrument.interest_rate,
            yield_rate: instrument.yield_rate,
        }
    }
}

/// Write one CSV row per simulated year
pub fn write_yearly_results<W: Write>(writer: W, result: &SimulationResult) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in &result.years {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write every instrument in the book, historical and reissued
pub fn write_instruments<W: Write>(writer: W, book: &InstrumentBook) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for instrument in book.iter() {
        wtr.serialize(InstrumentRecord::from(instrument))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_interest_schedule<W: Write>(writer: W, schedule: &InterestSchedule) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in &schedule.rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Paths written by `write_run`
#[derive(Debug, Clone)]
pub struct RunOutputs {
    pub results: PathBuf,
    pub summary: PathBuf,
    pub instruments: PathBuf,
}

/// Write results, summary and the expanded book under `dir`, named by `label`
pub fn write_run(dir: &Path, label: &str, result: &SimulationResult, book: &InstrumentBook) -> Result<RunOutputs> {
    fs::create_dir_all(dir)?;

    let outputs = RunOutputs {
        results: dir.join(format!("result-{}.csv", label)),
        summary: dir.join(format!("summary-{}.json", label)),
        instruments: dir.join(format!("instruments-{}.csv", label)),
    };

    write_yearly_results(File::create(&outputs.results)?, result)?;
    write_instruments(File::create(&outputs.instruments)?, book)?;
    fs::write(&outputs.summary, serde_json::to_string_pretty(&result.summary())?)?;

    Ok(outputs)
}
