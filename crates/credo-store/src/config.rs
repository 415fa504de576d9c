use std::fmt;
use std::sync::LazyLock;

use chrono::Duration;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

pub const DEFAULT_PRIVILEGED_PATTERN: &str = "founder";

static DEFAULT_ACTOR_PATTERN: LazyLock<ActorPattern> = LazyLock::new(|| {
    ActorPattern::new(DEFAULT_PRIVILEGED_PATTERN).expect("default actor pattern compiles")
});

/// Configuration for a [`BeliefStore`](crate::BeliefStore).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Regex matched case-insensitively against entry actors to flag
    /// privileged actions.
    pub privileged_actor_pattern: String,
    /// Suggested threshold for `mark_decision`. Decisions made sooner than
    /// this after creation are retroactive.
    pub retroactivity_threshold_secs: i64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            privileged_actor_pattern: DEFAULT_PRIVILEGED_PATTERN.into(),
            retroactivity_threshold_secs: 300,
        }
    }
}

impl StoreConfig {
    pub fn retroactivity_threshold(&self) -> Duration {
        Duration::seconds(self.retroactivity_threshold_secs)
    }
}

/// Case-insensitive matcher for privileged actors.
#[derive(Clone)]
pub struct ActorPattern {
    regex: Regex,
}

impl ActorPattern {
    pub fn new(pattern: &str) -> StoreResult<Self> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, actor: &str) -> bool {
        self.regex.is_match(actor)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Default for ActorPattern {
    fn default() -> Self {
        DEFAULT_ACTOR_PATTERN.clone()
    }
}

impl fmt::Debug for ActorPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorPattern({:?})", self.as_str())
    }
}
