use credo_types::Digest;

use crate::hasher::{EntryHasher, HasherError};

/// Trait for records that participate in a hash chain.
pub trait ChainLink {
    /// Position of the record in the chain (0 for genesis).
    fn sequence(&self) -> u64;
    /// The record's own stored hash.
    fn link_hash(&self) -> Digest;
    /// The stored hash of the previous record ([`Digest::ZERO`] for genesis).
    fn previous_hash(&self) -> Digest;
    /// Canonical bytes covering every field except the record's own hash.
    fn hash_material(&self) -> Result<Vec<u8>, HasherError>;
}

/// Hash chain integrity verifier.
///
/// A chain is valid when, for every record at position `i`:
/// 1. its sequence equals `i`
/// 2. its previous hash equals the stored hash at `i - 1` (zero for `i == 0`)
/// 3. its stored hash equals the digest recomputed from its material
pub struct HashChainVerifier;

impl HashChainVerifier {
    /// Verify a chain, stopping at the first broken record.
    pub fn verify_chain<L: ChainLink>(links: &[L]) -> Result<(), ChainError> {
        let mut expected_prev = Digest::ZERO;
        for (index, link) in links.iter().enumerate() {
            if let Some(error) = Self::check_link(index as u64, expected_prev, link)
                .into_iter()
                .next()
            {
                return Err(error);
            }
            expected_prev = link.link_hash();
        }
        Ok(())
    }

    /// Check every record and collect all violations.
    pub fn violations<L: ChainLink>(links: &[L]) -> Vec<ChainError> {
        let mut expected_prev = Digest::ZERO;
        let mut found = Vec::new();
        for (index, link) in links.iter().enumerate() {
            found.extend(Self::check_link(index as u64, expected_prev, link));
            expected_prev = link.link_hash();
        }
        found
    }

    /// Verify a single record that is about to follow `expected_prev` at
    /// position `expected_seq`.
    pub fn verify_link<L: ChainLink>(
        expected_seq: u64,
        expected_prev: Digest,
        link: &L,
    ) -> Result<(), ChainError> {
        match Self::check_link(expected_seq, expected_prev, link)
            .into_iter()
            .next()
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Compute the hash of a record from its canonical material.
    pub fn compute_hash<L: ChainLink>(link: &L) -> Result<Digest, HasherError> {
        Ok(EntryHasher::ENTRY.hash(&link.hash_material()?))
    }

    fn check_link<L: ChainLink>(
        expected_seq: u64,
        expected_prev: Digest,
        link: &L,
    ) -> Vec<ChainError> {
        let mut errors = Vec::new();

        if link.sequence() != expected_seq {
            errors.push(ChainError::SequenceGap {
                seq: expected_seq,
                found: link.sequence(),
            });
        }

        if link.previous_hash() != expected_prev {
            errors.push(ChainError::BrokenLink { seq: expected_seq });
        }

        match Self::compute_hash(link) {
            Ok(computed) if computed == link.link_hash() => {}
            Ok(_) => errors.push(ChainError::HashMismatch { seq: expected_seq }),
            Err(HasherError::Serialization(reason)) => errors.push(ChainError::Unhashable {
                seq: expected_seq,
                reason,
            }),
        }

        errors
    }
}

/// Errors from chain verification. Every variant names the sequence number
/// of the offending record.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("sequence gap at {seq}: record carries sequence {found}")]
    SequenceGap { seq: u64, found: u64 },

    #[error("broken link at {seq}: previous hash does not match")]
    BrokenLink { seq: u64 },

    #[error("hash mismatch at {seq}: computed hash differs from stored")]
    HashMismatch { seq: u64 },

    #[error("record {seq} cannot be hashed: {reason}")]
    Unhashable { seq: u64, reason: String },
}

impl ChainError {
    /// Sequence number of the offending record.
    pub fn seq(&self) -> u64 {
        match self {
            Self::SequenceGap { seq, .. }
            | Self::BrokenLink { seq }
            | Self::HashMismatch { seq }
            | Self::Unhashable { seq, .. } => *seq,
        }
    }
}
