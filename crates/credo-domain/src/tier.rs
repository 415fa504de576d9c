//! Epistemic tiers for beliefs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How well-established a belief is:
/// - Hypothesis: proposed, not yet tested
/// - Tested: survived at least one deliberate test
/// - Validated: repeatedly confirmed by independent evidence
/// - Foundational: other beliefs are built on it
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    #[default]
    Hypothesis,
    Tested,
    Validated,
    Foundational,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Hypothesis => "hypothesis",
            Tier::Tested => "tested",
            Tier::Validated => "validated",
            Tier::Foundational => "foundational",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hypothesis" => Some(Tier::Hypothesis),
            "tested" => Some(Tier::Tested),
            "validated" => Some(Tier::Validated),
            "foundational" => Some(Tier::Foundational),
            _ => None,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid tier: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Tier::parse("Validated"), Some(Tier::Validated));
        assert_eq!("TESTED".parse::<Tier>(), Ok(Tier::Tested));
        assert!(Tier::parse("certain").is_none());
    }

    #[test]
    fn default_is_hypothesis() {
        assert_eq!(Tier::default(), Tier::Hypothesis);
    }

    #[test]
    fn tiers_are_ordered() {
        assert!(Tier::Hypothesis < Tier::Tested);
        assert!(Tier::Validated < Tier::Foundational);
    }
}
