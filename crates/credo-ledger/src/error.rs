use credo_crypto::ChainError;

/// Errors produced by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The stored chain is broken. Fatal for the whole ledger instance.
    #[error("integrity violation at seq {seq}: {reason}")]
    Integrity { seq: u64, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("ledger lock poisoned")]
    LockPoisoned,

    /// A failed append left bytes that could not be removed.
    #[error("ledger writer disabled after a failed rollback")]
    WriterPoisoned,
}

impl LedgerError {
    /// Sequence number named by an integrity failure.
    pub fn integrity_seq(&self) -> Option<u64> {
        match self {
            Self::Integrity { seq, .. } => Some(*seq),
            _ => None,
        }
    }
}

impl From<ChainError> for LedgerError {
    fn from(error: ChainError) -> Self {
        Self::Integrity {
            seq: error.seq(),
            reason: error.to_string(),
        }
    }
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
