//! Instrument data structures

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{DebtSimError, Result};

/// Marketable security classes the engine models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SecurityType {
    /// Discount bills, quoted by yield only
    Bill,
    /// Coupon notes
    Note,
    /// Coupon bonds
    Bond,
}

impl SecurityType {
    pub const ALL: [SecurityType; 3] = [SecurityType::Bill, SecurityType::Note, SecurityType::Bond];

    /// Description used in the "Security Class 1 Description" column
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityType::Bill => "Bills Maturity Value",
            SecurityType::Note => "Notes",
            SecurityType::Bond => "Bonds",
        }
    }
}

impl fmt::Display for SecurityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecurityType {
    type Err = DebtSimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Bills Maturity Value" | "Bills" | "Bill" | "bill" => Ok(SecurityType::Bill),
            "Notes" | "Note" | "note" => Ok(SecurityType::Note),
            "Bonds" | "Bond" | "bond" => Ok(SecurityType::Bond),
            other => Err(DebtSimError::config(format!(
                "unknown security type '{}' (expected one of: Bills Maturity Value, Notes, Bonds)",
                other
            ))),
        }
    }
}

/// Index of an instrument inside an `InstrumentBook`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstrumentId(pub usize);

/// Where an instrument came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    /// Present in the historical security file
    Historical,
    /// Generated by rolling over a maturing instrument
    Reissued,
}

/// A single debt security
#[derive(Debug, Clone, Serialize)]
pub struct Instrument {
    /// Arena slot; assigned when the instrument is added to a book
    pub id: InstrumentId,

    /// Security label (CUSIP), shared by every link of a reissuance chain
    pub security_id: String,

    pub security_type: SecurityType,

    pub issue_date: NaiveDate,

    pub maturity_date: NaiveDate,

    /// `maturity_date - issue_date` in days, fixed at creation
    term_days: i64,

    /// Face amount issued (millions)
    pub issued_amount: f64,

    /// Stated interest rate in percent
    pub interest_rate: Option<f64>,

    /// Yield in percent, used when there is no stated rate
    pub yield_rate: Option<f64>,

    /// Instrument this one rolled over from
    pub predecessor: Option<InstrumentId>,

    pub origin: Origin,
}

impl Instrument {
    /// Create a historical instrument, rejecting non-positive terms and negative amounts
    pub fn new(
        security_id: impl Into<String>,
        security_type: SecurityType,
        issue_date: NaiveDate,
        maturity_date: NaiveDate,
        issued_amount: f64,
        interest_rate: Option<f64>,
        yield_rate: Option<f64>,
    ) -> Result<Self> {
        let security_id = security_id.into();
        let term_days = (maturity_date - issue_date).num_days();

        if term_days <= 0 {
            return Err(DebtSimError::invalid(
                security_id,
                format!("non-positive term ({} days from {} to {})", term_days, issue_date, maturity_date),
            ));
        }
        if !issued_amount.is_finite() || issued_amount < 0.0 {
            return Err(DebtSimError::invalid(
                security_id,
                format!("issued amount {} is not a non-negative number", issued_amount),
            ));
        }

        Ok(Self {
            id: InstrumentId(0),
            security_id,
            security_type,
            issue_date,
            maturity_date,
            term_days,
            issued_amount,
            interest_rate: interest_rate.filter(|r| r.is_finite()),
            yield_rate: yield_rate.filter(|r| r.is_finite()),
            predecessor: None,
            origin: Origin::Historical,
        })
    }

    /// Successor issued on `issue_date` with the same term, amount and type
    pub fn rolled_over(&self, issue_date: NaiveDate, rate: f64) -> Self {
        Self {
            id: InstrumentId(0),
            security_id: self.security_id.clone(),
            security_type: self.security_type,
            issue_date,
            maturity_date: issue_date + chrono::Duration::days(self.term_days),
            term_days: self.term_days,
            issued_amount: self.issued_amount,
            interest_rate: Some(rate),
            yield_rate: Some(rate),
            predecessor: Some(self.id),
            origin: Origin::Reissued,
        }
    }

    pub fn term_days(&self) -> i64 {
        self.term_days
    }

    /// Term in 365-day years
    pub fn term_years(&self) -> f64 {
        self.term_days as f64 / crate::daycount::DAYS_IN_YEAR
    }

    pub fn issue_year(&self) -> i32 {
        self.issue_date.year()
    }

    pub fn maturity_year(&self) -> i32 {
        self.maturity_date.year()
    }

    /// Outstanding at some point during `year`
    pub fn is_active_in(&self, year: i32) -> bool {
        self.issue_year() <= year && year <= self.maturity_year()
    }

    /// Rate used for accrual, in percent: stated rate first, then yield
    pub fn effective_rate(&self) -> Result<f64> {
        self.interest_rate
            .or(self.yield_rate)
            .ok_or_else(|| DebtSimError::MissingRate {
                security_id: self.security_id.clone(),
                issue_date: self.issue_date,
            })
    }

    /// Overwrite both quoted rates
    pub fn set_rate(&mut self, rate: f64) {
        self.interest_rate = Some(rate);
        self.yield_rate = Some(rate);
    }
}
