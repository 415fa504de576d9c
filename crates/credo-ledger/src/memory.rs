use std::sync::RwLock;

use tracing::debug;

use crate::entry::{EntryPayload, LedgerEntry};
use crate::error::{LedgerError, LedgerResult};
use crate::traits::{LedgerReader, LedgerWriter};

/// In-memory ledger for tests, local demos, and embedding.
///
/// The write guard is held across computing the next link and publishing
/// it, so concurrent appends are serialized.
pub struct InMemoryLedger<P> {
    entries: RwLock<Vec<LedgerEntry<P>>>,
}

impl<P: EntryPayload> InMemoryLedger<P> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl<P: EntryPayload> Default for InMemoryLedger<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: EntryPayload> LedgerWriter<P> for InMemoryLedger<P> {
    fn append(&self, payload: P) -> LedgerResult<LedgerEntry<P>> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| LedgerError::LockPoisoned)?;

        let entry = LedgerEntry::next_after(entries.last(), payload)?;
        entries.push(entry.clone());

        debug!(
            seq = entry.sequence(),
            entry_type = entry.entry_type(),
            hash = %entry.hash().short_hex(),
            "ledger append"
        );
        Ok(entry)
    }
}

impl<P: EntryPayload> LedgerReader<P> for InMemoryLedger<P> {
    fn read_with<T, F>(&self, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&[LedgerEntry<P>]) -> T,
    {
        let entries = self.entries.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(f(&entries))
    }
}

#[cfg(test)]
impl<P: EntryPayload> InMemoryLedger<P> {
    /// Rewrite a stored entry in place, bypassing the append path.
    pub(crate) fn tamper(&self, sequence: usize, f: impl FnOnce(&mut LedgerEntry<P>)) {
        let mut entries = self.entries.write().unwrap();
        f(&mut entries[sequence]);
    }
}
