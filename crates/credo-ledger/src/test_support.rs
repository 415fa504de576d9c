use serde::{Deserialize, Serialize};

use crate::entry::EntryPayload;

/// Minimal payload union used by the ledger's own tests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entry_type", content = "data", rename_all = "snake_case")]
pub(crate) enum Note {
    Text { subject: String, body: String },
    Signed { subject: String, author: String },
}

impl Note {
    pub(crate) fn text(subject: &str, body: &str) -> Self {
        Self::Text {
            subject: subject.into(),
            body: body.into(),
        }
    }

    pub(crate) fn signed(subject: &str, author: &str) -> Self {
        Self::Signed {
            subject: subject.into(),
            author: author.into(),
        }
    }
}

impl EntryPayload for Note {
    fn entry_type(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Signed { .. } => "signed",
        }
    }

    fn subject(&self) -> Option<String> {
        match self {
            Self::Text { subject, .. } | Self::Signed { subject, .. } => Some(subject.clone()),
        }
    }

    fn actor(&self) -> Option<&str> {
        match self {
            Self::Signed { author, .. } => Some(author),
            Self::Text { .. } => None,
        }
    }
}
