use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// An observation bearing on a belief, with the citation it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub description: String,
    pub source: String,
    /// `false` when the evidence counts against the belief.
    pub supports: bool,
    pub added_at: DateTime<Utc>,
}

impl Evidence {
    pub fn new(
        description: impl Into<String>,
        source: impl Into<String>,
        supports: bool,
        added_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let description = description.into();
        let source = source.into();
        Self::check_fields(&description, &source)?;
        Ok(Self {
            description,
            source,
            supports,
            added_at,
        })
    }

    /// Field rules shared with callers that validate before a timestamp
    /// exists.
    pub fn check_fields(description: &str, source: &str) -> DomainResult<()> {
        if description.trim().is_empty() {
            return Err(DomainError::EmptyEvidenceDescription);
        }
        if source.trim().is_empty() {
            return Err(DomainError::MissingEvidenceSource);
        }
        Ok(())
    }
}
