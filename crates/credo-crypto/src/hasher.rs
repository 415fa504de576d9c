use credo_types::Digest;

/// BLAKE3 in key-derivation mode, keyed by a context string.
///
/// Digests made under different contexts are unrelated even for identical
/// input, so an entry hash can never be replayed as any other kind of hash.
#[derive(Debug, Clone, Copy)]
pub struct EntryHasher {
    context: &'static str,
}

impl EntryHasher {
    /// Context for sealing ledger entries. Changing it invalidates every
    /// existing ledger.
    pub const ENTRY: Self = Self::new("credo 2026 ledger entry v1");

    pub const fn new(context: &'static str) -> Self {
        Self { context }
    }

    pub fn hash(&self, data: &[u8]) -> Digest {
        let mut hasher = blake3::Hasher::new_derive_key(self.context);
        hasher.update(data);
        Digest::from_bytes(*hasher.finalize().as_bytes())
    }

    pub fn context(&self) -> &'static str {
        self.context
    }
}

/// Hash input could not be produced.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("cannot encode hash input: {0}")]
    Serialization(String),
}
