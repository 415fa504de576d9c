use chrono::{DateTime, Duration, Utc};

use crate::status::BeliefStatus;

/// Validation failures for domain input. Each variant names the rule it
/// enforces.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("statement must not be empty")]
    EmptyStatement,

    #[error("falsification criterion must not be empty")]
    EmptyFalsification,

    #[error("falsification too vague: {reason}")]
    VagueFalsification { reason: String },

    #[error("confidence {0} out of range [0, 1]")]
    ConfidenceOutOfRange(f64),

    #[error("actor must not be empty")]
    EmptyActor,

    #[error("reason must not be empty")]
    EmptyReason,

    #[error("evidence description must not be empty")]
    EmptyEvidenceDescription,

    #[error("evidence source is required")]
    MissingEvidenceSource,

    #[error("illegal transition from {from} to {to}")]
    IllegalTransition {
        from: BeliefStatus,
        to: BeliefStatus,
    },

    #[error("belief is {0}, not active")]
    NotActive(BeliefStatus),

    #[error("belief cannot supersede itself")]
    SelfSupersession,

    #[error("retroactivity threshold {0} is not a whole number of seconds")]
    FractionalThreshold(Duration),

    #[error("decision at {decision_at} precedes creation at {created_at}")]
    DecisionBeforeCreation {
        created_at: DateTime<Utc>,
        decision_at: DateTime<Utc>,
    },
}

pub type DomainResult<T> = Result<T, DomainError>;
