//! Specificity check for falsification criteria.
//!
//! A criterion is rejected when it matches a known vague phrasing and names
//! no measurable condition. A digit, a comparison operator, or a percent
//! sign counts as measurable, so a concrete threshold always passes.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};

use crate::error::{DomainError, DomainResult};

/// Default vague-phrasing patterns.
///
/// Each tuple: `(regex_pattern, human_readable_reason)`.
pub const DEFAULT_VAGUE_PATTERNS: &[(&str, &str)] = &[
    (
        r"(?i)\bif\s+(?:i|we|you)(?:\s+am|\s+are|\s*['’]\s*(?:m|re))\s+(?:wrong|mistaken|incorrect)\b",
        "\"if I'm wrong\" names no condition",
    ),
    (
        r"(?i)\bprove[dn]?\s+(?:wrong|false|incorrect|otherwise)\b",
        "\"if proven wrong\" names no condition",
    ),
    (
        r"(?i)\b(?:doesn['’]?t|does\s+not|didn['’]?t|did\s+not|won['’]?t|will\s+not)\s+work(?:\s+out)?\b",
        "\"if it doesn't work\" names no measure of working",
    ),
    (
        r"(?i)\bif\s+(?:it|this|that)\s+fails\b",
        "\"if it fails\" names no measure of failure",
    ),
    (
        r"(?i)\bif\s+(?:it|this|that)\s+(?:is|turns\s+out(?:\s+to\s+be)?)\s+(?:wrong|false|incorrect)\b",
        "\"if it turns out wrong\" names no condition",
    ),
    (
        r"(?i)\bif\s+(?:things|circumstances|the\s+situation)\s+change\b",
        "\"if things change\" names no observable change",
    ),
    (
        r"(?i)\b(?:evidence|data|results?)\s+(?:says?|suggests?|shows?)\s+otherwise\b",
        "\"evidence says otherwise\" names no evidence",
    ),
    (
        r"(?i)^\s*(?:n/?a|tbd|todo|none|unknown|\?+|-+)\s*$",
        "placeholder criterion",
    ),
];

const MEASURABLE_PATTERN: &str = r"\d|[<>≤≥%]";

static DEFAULT_POLICY: LazyLock<FalsificationPolicy> = LazyLock::new(|| {
    FalsificationPolicy::new(DEFAULT_VAGUE_PATTERNS).expect("default vague patterns compile")
});

/// Regex-backed vagueness check.
///
/// Uses a `RegexSet` so every vague pattern is tested in a single pass.
#[derive(Debug, Clone)]
pub struct FalsificationPolicy {
    vague: RegexSet,
    /// Parallel to the patterns in `vague`.
    reasons: Vec<String>,
    measurable: Regex,
}

impl FalsificationPolicy {
    /// Build a policy from pattern-reason pairs.
    pub fn new(patterns: &[(&str, &str)]) -> Result<Self, regex::Error> {
        let vague = RegexSet::new(patterns.iter().map(|(pattern, _)| *pattern))?;
        let reasons = patterns
            .iter()
            .map(|(_, reason)| (*reason).to_string())
            .collect();
        let measurable = Regex::new(MEASURABLE_PATTERN)?;
        Ok(Self {
            vague,
            reasons,
            measurable,
        })
    }

    /// The process-wide policy built from [`DEFAULT_VAGUE_PATTERNS`].
    pub fn default_policy() -> &'static Self {
        &DEFAULT_POLICY
    }

    pub fn is_measurable(&self, text: &str) -> bool {
        self.measurable.is_match(text)
    }

    /// Reason of the first vague pattern `text` matches, if any.
    pub fn vague_reason(&self, text: &str) -> Option<&str> {
        self.vague
            .matches(text)
            .iter()
            .next()
            .map(|idx| self.reasons[idx].as_str())
    }

    pub fn check(&self, text: &str) -> DomainResult<()> {
        if text.trim().is_empty() {
            return Err(DomainError::EmptyFalsification);
        }
        if self.is_measurable(text) {
            return Ok(());
        }
        match self.vague_reason(text) {
            Some(reason) => Err(DomainError::VagueFalsification {
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Check `text` against the default policy.
pub fn check_falsification(text: &str) -> DomainResult<()> {
    FalsificationPolicy::default_policy().check(text)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const DENYLIST: &[&str] = &[
        "if I'm wrong",
        "If I’m wrong",
        "if we are mistaken",
        "if it doesn't work",
        "If it does not work out",
        "if proven wrong",
        "if it is proved false",
        "if it fails",
        "if this turns out to be wrong",
        "if things change",
        "if the evidence says otherwise",
        "TBD",
        "n/a",
    ];

    #[test]
    fn denylist_phrases_are_rejected() {
        for phrase in DENYLIST {
            let err = check_falsification(phrase).unwrap_err();
            assert!(
                matches!(err, DomainError::VagueFalsification { .. }),
                "{phrase:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn rejection_names_the_rule() {
        let err = check_falsification("if I'm wrong").unwrap_err();
        assert!(err.to_string().starts_with("falsification too vague"));
    }

    #[test]
    fn empty_criterion_is_its_own_error() {
        assert_eq!(check_falsification(""), Err(DomainError::EmptyFalsification));
        assert_eq!(check_falsification("   "), Err(DomainError::EmptyFalsification));
    }

    #[test]
    fn concrete_thresholds_pass() {
        for text in [
            "conversion rate <3% after 1000 visitors",
            "p95 latency exceeds 250ms for 3 consecutive days",
            "churn above 5 percent in Q3",
            "if I'm wrong, retention falls below 40% by March",
        ] {
            assert_eq!(check_falsification(text), Ok(()), "{text}");
        }
    }

    #[test]
    fn specific_prose_without_numbers_passes() {
        assert_eq!(
            check_falsification("a competitor ships the same feature before our launch"),
            Ok(())
        );
    }

    #[test]
    fn custom_policy_uses_its_own_patterns() {
        let policy = FalsificationPolicy::new(&[(r"(?i)\bsomeday\b", "no deadline")]).unwrap();
        assert_eq!(
            policy.check("users churn someday"),
            Err(DomainError::VagueFalsification {
                reason: "no deadline".into()
            })
        );
        assert_eq!(policy.check("if I'm wrong"), Ok(()));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        assert!(FalsificationPolicy::new(&[("(unclosed", "bad")]).is_err());
    }

    fn flip_case(text: &str, flips: &[bool]) -> String {
        text.chars()
            .zip(flips.iter().cycle())
            .map(|(c, flip)| {
                if *flip {
                    c.to_ascii_uppercase()
                } else {
                    c.to_ascii_lowercase()
                }
            })
            .collect()
    }

    proptest! {
        #[test]
        fn denylist_rejected_in_any_case(
            phrase in prop::sample::select(DENYLIST),
            flips in prop::collection::vec(any::<bool>(), 1..16),
        ) {
            let text = flip_case(phrase, &flips);
            let rejected = matches!(
                check_falsification(&text),
                Err(DomainError::VagueFalsification { .. })
            );
            prop_assert!(rejected, "{} was accepted", text);
        }

        #[test]
        fn numeric_threshold_always_accepted(
            prefix in "[a-zA-Z' ]{0,24}",
            number in 0u32..100_000,
            suffix in "[a-zA-Z' ]{0,24}",
        ) {
            let text = format!("{prefix} {number} {suffix}");
            prop_assert_eq!(check_falsification(&text), Ok(()));
        }
    }
}
