//! Beliefs and their lifecycle.
//!
//! A [`Belief`] is never stored directly. It is rebuilt by applying ledger
//! events to the value returned by [`Belief::created`], so every mutator
//! here takes the timestamp and actor of the event being applied.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use credo_types::BeliefId;

use crate::confidence::Confidence;
use crate::error::{DomainError, DomainResult};
use crate::evidence::Evidence;
use crate::falsification::check_falsification;
use crate::status::BeliefStatus;
use crate::tier::Tier;

/// Input for creating a belief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBelief {
    pub statement: String,
    pub falsification: String,
    pub tier: Tier,
    pub confidence: f64,
    pub created_by: String,
}

impl NewBelief {
    /// A hypothesis at 0.5 confidence.
    pub fn new(
        statement: impl Into<String>,
        falsification: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            statement: statement.into(),
            falsification: falsification.into(),
            tier: Tier::default(),
            confidence: 0.5,
            created_by: created_by.into(),
        }
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Every write-time rule, including the specificity check on the
    /// falsification criterion.
    pub fn validate(&self) -> DomainResult<Confidence> {
        if self.statement.trim().is_empty() {
            return Err(DomainError::EmptyStatement);
        }
        check_falsification(&self.falsification)?;
        self.check_shape()
    }

    /// Rules that hold for every recorded belief. The vague-phrase policy is
    /// not among them, so a belief recorded under an older policy still
    /// replays.
    fn check_shape(&self) -> DomainResult<Confidence> {
        if self.statement.trim().is_empty() {
            return Err(DomainError::EmptyStatement);
        }
        if self.falsification.trim().is_empty() {
            return Err(DomainError::EmptyFalsification);
        }
        let confidence = Confidence::new(self.confidence)?;
        if self.created_by.trim().is_empty() {
            return Err(DomainError::EmptyActor);
        }
        Ok(confidence)
    }
}

/// Current view of a belief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Belief {
    pub id: BeliefId,
    pub statement: String,
    pub falsification: String,
    pub tier: Tier,
    pub confidence: Confidence,
    pub status: BeliefStatus,
    pub evidence: Vec<Evidence>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub decision_at: Option<DateTime<Utc>>,
    pub superseded_by: Option<BeliefId>,
    pub closed_at: Option<DateTime<Utc>>,
    pub closed_by: Option<String>,
    /// Set for falsified and deprecated beliefs.
    pub closing_reason: Option<String>,
}

impl Belief {
    /// An active belief as of its creation.
    pub fn created(id: BeliefId, draft: NewBelief, created_at: DateTime<Utc>) -> DomainResult<Self> {
        let confidence = draft.check_shape()?;
        Ok(Self {
            id,
            statement: draft.statement,
            falsification: draft.falsification,
            tier: draft.tier,
            confidence,
            status: BeliefStatus::Active,
            evidence: Vec::new(),
            created_at,
            created_by: draft.created_by,
            decision_at: None,
            superseded_by: None,
            closed_at: None,
            closed_by: None,
            closing_reason: None,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == BeliefStatus::Active
    }

    /// Evidence never changes status and may be attached after closing.
    pub fn add_evidence(&mut self, evidence: Evidence) {
        self.evidence.push(evidence);
    }

    /// Record when the decision resting on this belief was made. A later
    /// call replaces the earlier timestamp.
    pub fn mark_decision(&mut self, decision_at: DateTime<Utc>) -> DomainResult<()> {
        self.check_decision(decision_at)?;
        self.decision_at = Some(decision_at);
        Ok(())
    }

    pub fn check_decision(&self, decision_at: DateTime<Utc>) -> DomainResult<()> {
        if !self.is_active() {
            return Err(DomainError::NotActive(self.status));
        }
        if decision_at < self.created_at {
            return Err(DomainError::DecisionBeforeCreation {
                created_at: self.created_at,
                decision_at,
            });
        }
        Ok(())
    }

    pub fn decision_lag(&self) -> Option<Duration> {
        self.decision_at.map(|at| at - self.created_at)
    }

    /// `false` when no decision has been recorded.
    pub fn is_retroactive(&self, threshold: Duration) -> bool {
        self.decision_at
            .is_some_and(|at| is_retroactive(self.created_at, at, threshold))
    }

    pub fn falsify(&mut self, reason: &str, actor: &str, at: DateTime<Utc>) -> DomainResult<()> {
        require_reason(reason)?;
        self.close(BeliefStatus::Falsified, actor, at)?;
        self.closing_reason = Some(reason.to_string());
        Ok(())
    }

    pub fn deprecate(&mut self, reason: &str, actor: &str, at: DateTime<Utc>) -> DomainResult<()> {
        require_reason(reason)?;
        self.close(BeliefStatus::Deprecated, actor, at)?;
        self.closing_reason = Some(reason.to_string());
        Ok(())
    }

    pub fn supersede(
        &mut self,
        replacement: BeliefId,
        actor: &str,
        at: DateTime<Utc>,
    ) -> DomainResult<()> {
        if replacement == self.id {
            return Err(DomainError::SelfSupersession);
        }
        self.close(BeliefStatus::Superseded, actor, at)?;
        self.superseded_by = Some(replacement);
        Ok(())
    }

    /// Whether a move to `to` by `actor` would be accepted, without applying
    /// it.
    pub fn check_transition(&self, to: BeliefStatus, actor: &str) -> DomainResult<()> {
        if !self.status.can_transition_to(to) {
            return Err(DomainError::IllegalTransition {
                from: self.status,
                to,
            });
        }
        if actor.trim().is_empty() {
            return Err(DomainError::EmptyActor);
        }
        Ok(())
    }

    fn close(&mut self, to: BeliefStatus, actor: &str, at: DateTime<Utc>) -> DomainResult<()> {
        self.check_transition(to, actor)?;
        self.status = to;
        self.closed_at = Some(at);
        self.closed_by = Some(actor.to_string());
        Ok(())
    }
}

fn require_reason(reason: &str) -> DomainResult<()> {
    if reason.trim().is_empty() {
        return Err(DomainError::EmptyReason);
    }
    Ok(())
}

/// Whether a decision came less than `threshold` after creation. A lag of
/// exactly `threshold` is not retroactive.
/// Thresholds are recorded in whole seconds, so finer ones are refused.
pub fn check_threshold(threshold: Duration) -> DomainResult<()> {
    if threshold.subsec_nanos() != 0 {
        return Err(DomainError::FractionalThreshold(threshold));
    }
    Ok(())
}

pub fn is_retroactive(
    created_at: DateTime<Utc>,
    decision_at: DateTime<Utc>,
    threshold: Duration,
) -> bool {
    decision_at - created_at < threshold
}
