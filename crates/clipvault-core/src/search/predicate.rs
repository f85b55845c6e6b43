//! Backend predicates and the compiler that produces them.

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_RESULT_LIMIT, SearchConfig};
use crate::search::constraint::{MatchMode, QueryConstraint};

/// A single filter clause the backend understands.
///
/// The backend treats a predicate list as a conjunction; the order in which
/// predicates appear carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "data")]
pub enum Predicate {
    /// Limit the number of results
    Limit(usize),
    TextContains(String),
    TextRegex(String),
    TextFuzzy(String),
    /// Capture time strictly after the given Unix timestamp (seconds)
    TimestampGreaterThan(i64),
    /// Capture time strictly before the given Unix timestamp (seconds)
    TimestampLessThan(i64),
    HasLabel(String),
    NotHasLabel(String),
}

/// Fixed constraints applied to every search regardless of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPolicy {
    pub result_limit: usize,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            result_limit: DEFAULT_RESULT_LIMIT,
        }
    }
}

impl From<&SearchConfig> for SearchPolicy {
    fn from(config: &SearchConfig) -> Self {
        Self {
            result_limit: config.result_limit,
        }
    }
}

/// Compiles `constraint` into the predicate list sent with a search.
pub fn compile(constraint: &QueryConstraint, policy: &SearchPolicy) -> Vec<Predicate> {
    compile_with(constraint, policy, &[])
}

/// Like [`compile`], with `additional` predicates placed right after the limit.
///
/// Output order: limit, additional, text (only when the search text is
/// non-empty), included labels, excluded labels.
pub fn compile_with(
    constraint: &QueryConstraint,
    policy: &SearchPolicy,
    additional: &[Predicate],
) -> Vec<Predicate> {
    let mut predicates = Vec::with_capacity(
        2 + additional.len() + constraint.included_labels.len() + constraint.excluded_labels.len(),
    );
    predicates.push(Predicate::Limit(policy.result_limit));
    predicates.extend_from_slice(additional);

    if !constraint.search_text.is_empty() {
        let text = constraint.search_text.clone();
        predicates.push(match constraint.match_mode {
            MatchMode::Contains => Predicate::TextContains(text),
            MatchMode::Regex => Predicate::TextRegex(text),
            MatchMode::Fuzzy => Predicate::TextFuzzy(text),
        });
    }

    predicates.extend(constraint.included_labels.iter().cloned().map(Predicate::HasLabel));
    predicates.extend(
        constraint
            .excluded_labels
            .iter()
            .cloned()
            .map(Predicate::NotHasLabel),
    );

    predicates
}
