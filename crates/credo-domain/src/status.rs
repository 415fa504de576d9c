use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a belief. Every status other than `Active` is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeliefStatus {
    Active,
    Falsified,
    Deprecated,
    Superseded,
}

impl BeliefStatus {
    pub const ALL: [Self; 4] = [
        Self::Active,
        Self::Falsified,
        Self::Deprecated,
        Self::Superseded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Falsified => "falsified",
            Self::Deprecated => "deprecated",
            Self::Superseded => "superseded",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }

    /// Whether `self → to` is a permitted transition.
    pub fn can_transition_to(&self, to: Self) -> bool {
        matches!(self, Self::Active) && to.is_terminal()
    }
}

impl fmt::Display for BeliefStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BeliefStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("invalid belief status: {s}"))
    }
}
