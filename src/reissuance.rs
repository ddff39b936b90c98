//! Rollover of maturing instruments through the simulation horizon
//!
//! Every instrument that matures on or after the cutoff is replaced the day
//! after it matures by an identical successor (same type, term and amount)
//! priced off the reissuance schedule. Instruments that matured before the
//! cutoff were already rolled over in the historical data.

use chrono::{Duration, NaiveDate};
use log::{debug, info};
use rayon::prelude::*;

use crate::assumptions::RateSchedule;
use crate::error::{DebtSimError, Result};
use crate::securities::{Instrument, InstrumentBook, InstrumentId, Origin};

/// Generates the chain of successors for a single instrument
#[derive(Debug, Clone, Copy)]
pub struct ReissuanceGenerator<'a> {
    schedule: &'a RateSchedule,
    horizon: NaiveDate,
}

impl<'a> ReissuanceGenerator<'a> {
    pub fn new(schedule: &'a RateSchedule, horizon: NaiveDate) -> Self {
        Self { schedule, horizon }
    }

    pub fn horizon(&self) -> NaiveDate {
        self.horizon
    }

    /// Successors of `source`, oldest first.
    ///
    /// Each successor is issued the day after its predecessor matures. The
    /// chain stops once the next issue date would fall after the horizon; the
    /// last successor may mature past the horizon. Predecessor links are set
    /// when the chain is added to a book.
    pub fn chain(&self, source: &Instrument) -> Result<Vec<Instrument>> {
        let term_days = source.term_days();
        if term_days <= 0 {
            return Err(DebtSimError::invalid(
                source.security_id.clone(),
                format!("cannot reissue with a term of {} days", term_days),
            ));
        }

        let rate = self.schedule.rate_for_term(source.term_years())?;

        let mut chain: Vec<Instrument> = Vec::new();
        let mut next_issue = source.maturity_date + Duration::days(1);
        while next_issue <= self.horizon {
            let successor = match chain.last() {
                Some(previous) => previous.rolled_over(next_issue, rate),
                None => source.rolled_over(next_issue, rate),
            };
            // term_days > 0, so issue dates strictly increase
            next_issue = successor.maturity_date + Duration::days(1);
            chain.push(successor);
        }

        Ok(chain)
    }

    /// Generate the chain for `source` and append it to `book`, linking predecessors
    pub fn reissue_into(&self, book: &mut InstrumentBook, source: InstrumentId) -> Result<Vec<InstrumentId>> {
        let chain = match book.get(source) {
            Some(instrument) => self.chain(instrument)?,
            None => return Err(DebtSimError::InvalidInput(format!("no instrument with id {:?}", source))),
        };
        Ok(append_chain(book, source, chain))
    }
}

fn append_chain(book: &mut InstrumentBook, source: InstrumentId, chain: Vec<Instrument>) -> Vec<InstrumentId> {
    let mut previous = source;
    chain
        .into_iter()
        .map(|mut successor| {
            successor.predecessor = Some(previous);
            previous = book.push(successor);
            previous
        })
        .collect()
}

/// Counts from expanding a book
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpansionSummary {
    /// Historical instruments maturing on/after the cutoff
    pub sources: usize,
    /// Successors appended to the book
    pub reissued: usize,
}

/// Roll over every historical instrument maturing on or after `cutoff`
pub fn expand_book(
    book: &mut InstrumentBook,
    cutoff: NaiveDate,
    schedule: &RateSchedule,
    horizon: NaiveDate,
) -> Result<ExpansionSummary> {
    let generator = ReissuanceGenerator::new(schedule, horizon);

    let sources: Vec<&Instrument> = book
        .iter()
        .filter(|i| i.origin == Origin::Historical && i.maturity_date >= cutoff)
        .collect();
    info!("Reissuing {} securities maturing on/after {} through {}", sources.len(), cutoff, horizon);

    let chains: Vec<(InstrumentId, Vec<Instrument>)> = sources
        .par_iter()
        .map(|source| generator.chain(source).map(|chain| (source.id, chain)))
        .collect::<Result<_>>()?;

    let mut summary = ExpansionSummary {
        sources: chains.len(),
        reissued: 0,
    };
    for (source, chain) in chains {
        summary.reissued += chain.len();
        append_chain(book, source, chain);
    }

    debug!("Book holds {} instruments after reissuance ({} new)", book.len(), summary.reissued);
    Ok(summary)
}
