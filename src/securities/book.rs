//! Arena of instruments with reissuance back-references

use serde::Serialize;

use super::data::{Instrument, InstrumentId, Origin};

/// Owns every instrument in a run, historical and reissued.
///
/// Instruments refer to their predecessor by `InstrumentId`, an index into
/// this arena, so chains never form ownership cycles.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InstrumentBook {
    instruments: Vec<Instrument>,
}

impl InstrumentBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a book from already-validated instruments
    pub fn from_instruments(instruments: impl IntoIterator<Item = Instrument>) -> Self {
        let mut book = Self::new();
        for instrument in instruments {
            book.push(instrument);
        }
        book
    }

    /// Add an instrument, assigning its id
    pub fn push(&mut self, mut instrument: Instrument) -> InstrumentId {
        let id = InstrumentId(self.instruments.len());
        instrument.id = id;
        self.instruments.push(instrument);
        id
    }

    pub fn get(&self, id: InstrumentId) -> Option<&Instrument> {
        self.instruments.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instrument> {
        self.instruments.iter()
    }

    pub fn as_slice(&self) -> &[Instrument] {
        &self.instruments
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Instrument> {
        self.instruments.iter_mut()
    }

    /// Instruments outstanding at some point during `year`
    pub fn active_in(&self, year: i32) -> impl Iterator<Item = &Instrument> {
        self.instruments.iter().filter(move |i| i.is_active_in(year))
    }

    pub fn count_by_origin(&self, origin: Origin) -> usize {
        self.instruments.iter().filter(|i| i.origin == origin).count()
    }

    /// Walk back from `id` to the historical instrument that started its chain
    pub fn chain_root(&self, id: InstrumentId) -> Option<&Instrument> {
        let mut current = self.get(id)?;
        while let Some(prev) = current.predecessor {
            current = self.get(prev)?;
        }
        Some(current)
    }

    /// The chain ending at `id`, oldest first
    pub fn chain(&self, id: InstrumentId) -> Vec<&Instrument> {
        let mut links = Vec::new();
        let mut next = self.get(id);
        while let Some(instrument) = next {
            links.push(instrument);
            next = instrument.predecessor.and_then(|prev| self.get(prev));
        }
        links.reverse();
        links
    }
}
