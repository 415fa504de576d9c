use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use credo_types::Digest;

use crate::entry::{EntryPayload, LedgerEntry};

/// Aggregate counts over the whole ledger, built in one pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReport {
    pub total_entries: u64,
    pub first_timestamp: Option<DateTime<Utc>>,
    pub last_timestamp: Option<DateTime<Utc>>,
    pub head_hash: Option<Digest>,
    pub by_entry_type: BTreeMap<String, u64>,
}

impl LedgerReport {
    pub fn from_entries<P: EntryPayload>(entries: &[LedgerEntry<P>]) -> Self {
        let mut report = Self::default();
        for entry in entries {
            report.total_entries += 1;
            if report.first_timestamp.is_none() {
                report.first_timestamp = Some(entry.timestamp());
            }
            report.last_timestamp = Some(entry.timestamp());
            report.head_hash = Some(entry.hash());
            *report
                .by_entry_type
                .entry(entry.entry_type().to_string())
                .or_default() += 1;
        }
        report
    }

    pub fn count(&self, entry_type: &str) -> u64 {
        self.by_entry_type.get(entry_type).copied().unwrap_or(0)
    }
}
