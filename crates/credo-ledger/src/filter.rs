use crate::entry::{EntryPayload, LedgerEntry};

/// Field filter for [`LedgerReader::query`](crate::LedgerReader::query).
///
/// Every populated field must match; an empty filter matches everything.
/// Sequence bounds are inclusive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub entry_type: Option<String>,
    pub subject: Option<String>,
    pub actor: Option<String>,
    pub from_seq: Option<u64>,
    pub to_seq: Option<u64>,
}

impl EntryFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_entry_type(mut self, entry_type: impl Into<String>) -> Self {
        self.entry_type = Some(entry_type.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_range(mut self, from_seq: u64, to_seq: u64) -> Self {
        self.from_seq = Some(from_seq);
        self.to_seq = Some(to_seq);
        self
    }

    pub fn matches<P: EntryPayload>(&self, entry: &LedgerEntry<P>) -> bool {
        let payload = entry.payload();

        if let Some(entry_type) = &self.entry_type {
            if payload.entry_type() != entry_type {
                return false;
            }
        }
        if let Some(subject) = &self.subject {
            if payload.subject().as_deref() != Some(subject.as_str()) {
                return false;
            }
        }
        if let Some(actor) = &self.actor {
            if payload.actor() != Some(actor.as_str()) {
                return false;
            }
        }
        if self.from_seq.is_some_and(|from| entry.sequence() < from) {
            return false;
        }
        if self.to_seq.is_some_and(|to| entry.sequence() > to) {
            return false;
        }
        true
    }
}
