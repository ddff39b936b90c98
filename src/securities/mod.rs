//! Debt instruments, the instrument arena and historical data loading

mod data;
mod book;
pub mod loader;

pub use data::{Instrument, InstrumentId, Origin, SecurityType};
pub use book::InstrumentBook;
pub use loader::{load_securities, load_securities_from_reader, parse_security_types, LoadedSecurities, LoadStats};
