//! Error types for the debt burden engine

use chrono::NaiveDate;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, DebtSimError>;

/// Every failure the engine can surface.
///
/// Configuration errors are raised before a run starts. Data validation
/// errors exclude a single record at ingestion. Missing rates and arithmetic
/// errors abort a run that is already in progress.
#[derive(Error, Debug)]
pub enum DebtSimError {
    /// Invalid security type, missing fallback rate, bad parameter
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A record that cannot be modeled (non-positive term, negative amount, no rate)
    #[error("invalid security {security_id}: {reason}")]
    DataValidation {
        security_id: String,
        reason: String,
    },

    /// An active instrument has neither an interest rate nor a yield
    #[error("security {security_id} issued {issue_date} has neither an interest rate nor a yield")]
    MissingRate {
        security_id: String,
        issue_date: NaiveDate,
    },

    /// Zero or non-finite denominators and state values
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// Arguments outside a function's domain
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    DateParse(#[from] chrono::ParseError),
}

impl DebtSimError {
    pub fn config(message: impl Into<String>) -> Self {
        DebtSimError::Configuration(message.into())
    }

    pub fn arithmetic(message: impl Into<String>) -> Self {
        DebtSimError::Arithmetic(message.into())
    }

    pub fn invalid(security_id: impl Into<String>, reason: impl Into<String>) -> Self {
        DebtSimError::DataValidation {
            security_id: security_id.into(),
            reason: reason.into(),
        }
    }
}
