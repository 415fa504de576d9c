use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use credo_domain::{Confidence, Tier};
use credo_ledger::EntryPayload;
use credo_types::BeliefId;

/// Every event the belief store writes, one variant per entry type.
///
/// Persisted as `"entry_type": "<tag>", "data": {..}`. A record whose data
/// does not match its tag's schema fails to deserialize.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entry_type", content = "data", rename_all = "snake_case")]
pub enum LedgerEvent {
    BeliefCreated {
        belief_id: BeliefId,
        statement: String,
        falsification: String,
        tier: Tier,
        confidence: Confidence,
        created_by: String,
    },
    EvidenceAdded {
        belief_id: BeliefId,
        description: String,
        source: String,
        supports: bool,
    },
    DecisionMade {
        belief_id: BeliefId,
        decision_at: DateTime<Utc>,
        /// Computed at write time against `threshold_secs`.
        is_retroactive: bool,
        threshold_secs: i64,
    },
    BeliefFalsified {
        belief_id: BeliefId,
        reason: String,
        actor: String,
    },
    BeliefDeprecated {
        belief_id: BeliefId,
        reason: String,
        actor: String,
    },
    BeliefSuperseded {
        belief_id: BeliefId,
        replacement_id: BeliefId,
        actor: String,
    },
}

impl LedgerEvent {
    pub const BELIEF_CREATED: &'static str = "belief_created";
    pub const EVIDENCE_ADDED: &'static str = "evidence_added";
    pub const DECISION_MADE: &'static str = "decision_made";
    pub const BELIEF_FALSIFIED: &'static str = "belief_falsified";
    pub const BELIEF_DEPRECATED: &'static str = "belief_deprecated";
    pub const BELIEF_SUPERSEDED: &'static str = "belief_superseded";

    pub fn belief_id(&self) -> BeliefId {
        match self {
            Self::BeliefCreated { belief_id, .. }
            | Self::EvidenceAdded { belief_id, .. }
            | Self::DecisionMade { belief_id, .. }
            | Self::BeliefFalsified { belief_id, .. }
            | Self::BeliefDeprecated { belief_id, .. }
            | Self::BeliefSuperseded { belief_id, .. } => *belief_id,
        }
    }

    /// Whether this event moves a belief to a terminal status.
    pub fn is_transition(&self) -> bool {
        matches!(
            self,
            Self::BeliefFalsified { .. }
                | Self::BeliefDeprecated { .. }
                | Self::BeliefSuperseded { .. }
        )
    }
}

impl EntryPayload for LedgerEvent {
    fn entry_type(&self) -> &'static str {
        match self {
            Self::BeliefCreated { .. } => Self::BELIEF_CREATED,
            Self::EvidenceAdded { .. } => Self::EVIDENCE_ADDED,
            Self::DecisionMade { .. } => Self::DECISION_MADE,
            Self::BeliefFalsified { .. } => Self::BELIEF_FALSIFIED,
            Self::BeliefDeprecated { .. } => Self::BELIEF_DEPRECATED,
            Self::BeliefSuperseded { .. } => Self::BELIEF_SUPERSEDED,
        }
    }

    fn subject(&self) -> Option<String> {
        Some(self.belief_id().to_string())
    }

    /// The creator, or the actor of a terminal transition. Evidence and
    /// decisions carry no actor.
    fn actor(&self) -> Option<&str> {
        match self {
            Self::BeliefCreated { created_by, .. } => Some(created_by),
            Self::BeliefFalsified { actor, .. }
            | Self::BeliefDeprecated { actor, .. }
            | Self::BeliefSuperseded { actor, .. } => Some(actor),
            Self::EvidenceAdded { .. } | Self::DecisionMade { .. } => None,
        }
    }
}
