use credo_crypto::HashChainVerifier;

use crate::entry::{EntryPayload, LedgerEntry};
use crate::error::LedgerResult;
use crate::filter::EntryFilter;
use crate::report::LedgerReport;
use crate::validation::{StreamValidator, ValidationReport};

/// Write boundary for ledger appends.
///
/// Implementations serialize appends internally: computing the next link and
/// persisting it happen inside one exclusive section.
pub trait LedgerWriter<P: EntryPayload>: Send + Sync {
    /// Seal `payload` as the next entry, persist it, and return it.
    fn append(&self, payload: P) -> LedgerResult<LedgerEntry<P>>;
}

/// Read boundary for ledger queries and verification.
///
/// Reads observe the ledger as of the last completed append.
pub trait LedgerReader<P: EntryPayload>: Send + Sync {
    /// Run `f` over the published entries without copying them.
    fn read_with<T, F>(&self, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&[LedgerEntry<P>]) -> T;

    fn entries(&self) -> LedgerResult<Vec<LedgerEntry<P>>> {
        self.read_with(<[LedgerEntry<P>]>::to_vec)
    }

    fn len(&self) -> LedgerResult<u64> {
        self.read_with(|entries| entries.len() as u64)
    }

    fn is_empty(&self) -> LedgerResult<bool> {
        self.read_with(|entries| entries.is_empty())
    }

    fn head(&self) -> LedgerResult<Option<LedgerEntry<P>>> {
        self.read_with(|entries| entries.last().cloned())
    }

    fn get(&self, sequence: u64) -> LedgerResult<Option<LedgerEntry<P>>> {
        self.read_with(|entries| {
            usize::try_from(sequence)
                .ok()
                .and_then(|index| entries.get(index))
                .cloned()
        })
    }

    /// Entries matching `filter`, in sequence order.
    fn query(&self, filter: &EntryFilter) -> LedgerResult<Vec<LedgerEntry<P>>> {
        self.read_with(|entries| {
            entries
                .iter()
                .filter(|entry| filter.matches(entry))
                .cloned()
                .collect()
        })
    }

    /// Recompute every hash and link, stopping at the first broken record.
    fn verify_integrity(&self) -> LedgerResult<bool> {
        self.read_with(|entries| HashChainVerifier::verify_chain(entries).is_ok())
    }

    fn validate(&self) -> LedgerResult<ValidationReport> {
        self.read_with(StreamValidator::validate)
    }

    fn audit_report(&self) -> LedgerResult<LedgerReport> {
        self.read_with(LedgerReport::from_entries)
    }
}
