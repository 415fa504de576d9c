use serde::{Deserialize, Serialize};

use credo_crypto::{ChainError, HashChainVerifier};

use crate::entry::{EntryPayload, LedgerEntry};

/// Result of stream validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub entry_count: u64,
    pub hash_chain_valid: bool,
    pub sequence_gapless: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// The earliest offending sequence number, if any.
    pub fn first_violation(&self) -> Option<&Violation> {
        self.violations.first()
    }
}

/// A specific integrity violation detected during validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub seq: u64,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    SequenceGap,
    HashChainBreak,
    HashMismatch,
    Unhashable,
}

/// Stream integrity validator.
///
/// Unlike [`HashChainVerifier::verify_chain`], which stops at the first
/// problem, this walks the whole stream and reports everything it finds.
pub struct StreamValidator;

impl StreamValidator {
    pub fn validate<P: EntryPayload>(entries: &[LedgerEntry<P>]) -> ValidationReport {
        let violations: Vec<Violation> = HashChainVerifier::violations(entries)
            .into_iter()
            .map(Violation::from)
            .collect();

        let sequence_gapless = !violations
            .iter()
            .any(|v| v.kind == ViolationKind::SequenceGap);
        let hash_chain_valid = !violations.iter().any(|v| {
            matches!(
                v.kind,
                ViolationKind::HashChainBreak | ViolationKind::HashMismatch
            )
        });

        ValidationReport {
            entry_count: entries.len() as u64,
            hash_chain_valid,
            sequence_gapless,
            violations,
        }
    }
}

impl From<ChainError> for Violation {
    fn from(error: ChainError) -> Self {
        let kind = match &error {
            ChainError::SequenceGap { .. } => ViolationKind::SequenceGap,
            ChainError::BrokenLink { .. } => ViolationKind::HashChainBreak,
            ChainError::HashMismatch { .. } => ViolationKind::HashMismatch,
            ChainError::Unhashable { .. } => ViolationKind::Unhashable,
        };
        Self {
            seq: error.seq(),
            kind,
            description: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryLedger;
    use crate::test_support::Note;
    use crate::traits::{LedgerReader, LedgerWriter};

    #[test]
    fn valid_stream_passes() {
        let ledger = InMemoryLedger::new();
        ledger.append(Note::text("a", "1")).unwrap();
        ledger.append(Note::text("a", "2")).unwrap();

        let report = ledger.validate().unwrap();
        assert!(report.is_valid());
        assert!(report.hash_chain_valid);
        assert!(report.sequence_gapless);
        assert_eq!(report.entry_count, 2);
    }

    #[test]
    fn empty_stream_is_valid() {
        let ledger: InMemoryLedger<Note> = InMemoryLedger::new();
        let report = ledger.validate().unwrap();
        assert!(report.is_valid());
        assert_eq!(report.entry_count, 0);
    }

    #[test]
    fn tampering_is_reported_per_entry() {
        let ledger = InMemoryLedger::new();
        for i in 0..4 {
            ledger.append(Note::text("a", &i.to_string())).unwrap();
        }
        ledger.tamper(1, |entry| *entry.payload_mut() = Note::text("a", "forged"));

        let report = ledger.validate().unwrap();
        assert!(!report.is_valid());
        assert!(!report.hash_chain_valid);
        assert!(report.sequence_gapless);
        let first = report.first_violation().unwrap();
        assert_eq!(first.seq, 1);
        assert_eq!(first.kind, ViolationKind::HashMismatch);
    }
}
