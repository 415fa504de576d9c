use thiserror::Error;

use credo_store::StoreError;
use credo_types::BeliefId;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("decision at seq {seq} references unknown belief {belief_id}")]
    OrphanDecision { seq: u64, belief_id: BeliefId },
}

pub type AuditResult<T> = Result<T, AuditError>;
