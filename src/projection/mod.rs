//! Interest accrual, rate models and the yearly macro feedback simulation

pub mod accrual;
mod engine;
pub mod interest_schedule;
mod new_debt;
pub mod rate_model;
mod results;
mod state;

pub use accrual::{accrual_fraction, accrued_interest, payment_schedule};
pub use engine::{MacroConfig, MacroFeedbackSimulator, RateStamping};
pub use interest_schedule::{InterestSchedule, InterestScheduleRow};
pub use new_debt::NewDebtInterestStrategy;
pub use rate_model::{EndogenousRateModel, RateModel, PERCENT_SCALED, UNSCALED};
pub use results::{round_share, SimulationResult, SimulationSummary, YearlyResult};
pub use state::{YearSnapshot, YearlyMacroState};
