//! Debt Burden - sovereign debt interest projection engine
//!
//! This library provides:
//! - Loading and cleaning of historical marketable security records
//! - Reissuance of maturing securities through a horizon date
//! - Per-instrument yearly interest accrual on a 365-day year
//! - A yearly debt, GDP and interest rate feedback simulation
//! - Scenario runs and CSV reports

pub mod error;
pub mod daycount;
pub mod securities;
pub mod assumptions;
pub mod reissuance;
pub mod projection;
pub mod config;
pub mod output;
pub mod scenario;

// Re-export commonly used types
pub use error::{DebtSimError, Result};
pub use securities::{Instrument, InstrumentBook, InstrumentId, SecurityType};
pub use assumptions::{MacroAssumptions, RateSchedule, YearlyRateTable};
pub use reissuance::{expand_book, ReissuanceGenerator};
pub use projection::{
    MacroConfig, MacroFeedbackSimulator, NewDebtInterestStrategy, RateModel, SimulationResult, YearlyResult,
};
pub use config::SimulationConfig;
pub use scenario::ScenarioRunner;
