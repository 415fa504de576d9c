use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use credo_crypto::{ChainLink, HashChainVerifier, HasherError};
use credo_types::Digest;

use crate::error::{LedgerError, LedgerResult};

/// A typed payload union stored in the ledger.
///
/// Implementors must serialize as an adjacently tagged enum with the tag
/// under `entry_type` and the body under `data`
/// (`#[serde(tag = "entry_type", content = "data")]`), so that the persisted
/// record reads `{"sequence":..,"entry_type":..,"data":{..},..}`.
pub trait EntryPayload:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The tag this payload is stored under.
    fn entry_type(&self) -> &'static str;

    /// Identifier of the record this payload concerns, if any.
    fn subject(&self) -> Option<String> {
        None
    }

    /// Identity that caused this payload to be written, if recorded.
    fn actor(&self) -> Option<&str> {
        None
    }
}

/// One immutable, hash-linked ledger record.
///
/// Entries are only built by a ledger's append path or read back from
/// storage; their fields are exposed read-only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry<P> {
    sequence: u64,
    #[serde(flatten)]
    payload: P,
    timestamp: DateTime<Utc>,
    previous_hash: Digest,
    hash: Digest,
}

/// Canonical hash input: every field but `hash`, in persisted order.
#[derive(Serialize)]
struct HashInput<'a, P> {
    sequence: u64,
    #[serde(flatten)]
    payload: &'a P,
    timestamp: &'a DateTime<Utc>,
    previous_hash: &'a Digest,
}

impl<P: EntryPayload> LedgerEntry<P> {
    /// Build and seal the entry that follows `last`.
    ///
    /// The timestamp never goes backwards relative to `last`, even if the
    /// wall clock does.
    pub(crate) fn next_after(last: Option<&Self>, payload: P) -> LedgerResult<Self> {
        let now = Utc::now();
        let (sequence, previous_hash, timestamp) = match last {
            None => (0, Digest::ZERO, now),
            Some(prev) => (prev.sequence + 1, prev.hash, now.max(prev.timestamp)),
        };
        Self::seal(sequence, payload, timestamp, previous_hash)
    }

    pub(crate) fn seal(
        sequence: u64,
        payload: P,
        timestamp: DateTime<Utc>,
        previous_hash: Digest,
    ) -> LedgerResult<Self> {
        let mut entry = Self {
            sequence,
            payload,
            timestamp,
            previous_hash,
            hash: Digest::ZERO,
        };
        entry.hash = entry.recompute_hash()?;
        Ok(entry)
    }

    /// Recompute this entry's digest from its fields.
    pub fn recompute_hash(&self) -> LedgerResult<Digest> {
        HashChainVerifier::compute_hash(self).map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn entry_type(&self) -> &'static str {
        self.payload.entry_type()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn previous_hash(&self) -> Digest {
        self.previous_hash
    }

    pub fn hash(&self) -> Digest {
        self.hash
    }
}

impl<P: EntryPayload> ChainLink for LedgerEntry<P> {
    fn sequence(&self) -> u64 {
        self.sequence
    }

    fn link_hash(&self) -> Digest {
        self.hash
    }

    fn previous_hash(&self) -> Digest {
        self.previous_hash
    }

    fn hash_material(&self) -> Result<Vec<u8>, HasherError> {
        let input = HashInput {
            sequence: self.sequence,
            payload: &self.payload,
            timestamp: &self.timestamp,
            previous_hash: &self.previous_hash,
        };
        serde_json::to_vec(&input).map_err(|e| HasherError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
impl<P> LedgerEntry<P> {
    pub(crate) fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }

    pub(crate) fn set_timestamp(&mut self, timestamp: DateTime<Utc>) {
        self.timestamp = timestamp;
    }

    pub(crate) fn set_previous_hash(&mut self, previous_hash: Digest) {
        self.previous_hash = previous_hash;
    }
}
