use thiserror::Error;

use credo_domain::DomainError;
use credo_ledger::LedgerError;
use credo_types::BeliefId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(#[from] DomainError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("belief not found: {0}")]
    BeliefNotFound(BeliefId),

    /// A recorded event could not be applied. The ledger itself is intact;
    /// its contents contradict the lifecycle rules.
    #[error("replay failed at seq {seq}: {source}")]
    Replay {
        seq: u64,
        #[source]
        source: ReplayFault,
    },

    #[error("invalid actor pattern: {0}")]
    InvalidActorPattern(#[from] regex::Error),
}

/// Why a recorded event could not be applied to a belief.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReplayFault {
    #[error("belief created more than once")]
    DuplicateCreation,

    #[error("event recorded before the belief was created")]
    BeforeCreation,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl StoreError {
    /// True for rule violations rejected before any write.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
