//! Audit findings and the aggregate report.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use credo_domain::BeliefStatus;
use credo_ledger::LedgerReport;
use credo_types::{BeliefId, Digest};

/// A ledger entry written by a privileged actor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FounderAction {
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    pub entry_type: String,
    pub belief_id: BeliefId,
    pub actor: String,
    pub hash: Digest,
}

/// A decision recorded as retroactive when it was written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowDecision {
    pub seq: u64,
    pub belief_id: BeliefId,
    pub created_at: DateTime<Utc>,
    pub decision_at: DateTime<Utc>,
    /// Threshold the decision was judged against.
    pub threshold_secs: i64,
}

impl ShadowDecision {
    /// Time from creation to decision.
    pub fn lag(&self) -> Duration {
        self.decision_at - self.created_at
    }
}

/// Point-in-time summary of ledger health and belief state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub generated_at: DateTime<Utc>,
    /// Whether every hash and link in the ledger verifies.
    pub integrity_valid: bool,
    pub violation_count: usize,
    pub ledger: LedgerReport,
    pub total_beliefs: usize,
    /// Every status is present, zero counts included.
    pub beliefs_by_status: BTreeMap<BeliefStatus, usize>,
    pub founder_actions: usize,
    pub shadow_decisions: usize,
}

impl AuditReport {
    pub fn beliefs_with_status(&self, status: BeliefStatus) -> usize {
        self.beliefs_by_status.get(&status).copied().unwrap_or(0)
    }

    /// Intact ledger and no shadow decisions.
    pub fn is_clean(&self) -> bool {
        self.integrity_valid && self.shadow_decisions == 0
    }
}
