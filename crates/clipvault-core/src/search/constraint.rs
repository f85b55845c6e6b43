//! The user's search intent and the transitions that change it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// How the free-text part of a query is matched by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    Contains,
    Regex,
    Fuzzy,
}

impl std::str::FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "contains" => Ok(Self::Contains),
            "regex" => Ok(Self::Regex),
            "fuzzy" => Ok(Self::Fuzzy),
            other => Err(format!("unknown match mode: {other}")),
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Contains => write!(f, "contains"),
            Self::Regex => write!(f, "regex"),
            Self::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

/// Current search intent of one search view.
///
/// Values are never mutated in place: every [`ConstraintAction`] produces a
/// new value with freshly built label sets, so two constraints can be compared
/// with `==` to detect a change. A label is never in both sets at once.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryConstraint {
    pub search_text: String,
    pub match_mode: MatchMode,
    pub included_labels: BTreeSet<String>,
    pub excluded_labels: BTreeSet<String>,
}

/// A named transition of [`QueryConstraint`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ConstraintAction {
    SetSearchText(String),
    InsertIncludedLabel(String),
    RemoveIncludedLabel(String),
    InsertExcludedLabel(String),
    RemoveExcludedLabel(String),
    SetMatchMode(MatchMode),
}

impl QueryConstraint {
    pub fn new(match_mode: MatchMode) -> Self {
        Self {
            match_mode,
            ..Self::default()
        }
    }

    /// Applies `action` and returns the resulting constraint.
    ///
    /// Inserting a label into one set removes it from the other one, so the
    /// compiled query never asks for a label and its absence at the same time.
    pub fn reduce(&self, action: ConstraintAction) -> Self {
        match action {
            ConstraintAction::SetSearchText(text) => Self {
                search_text: text,
                ..self.clone()
            },
            ConstraintAction::SetMatchMode(mode) => Self {
                match_mode: mode,
                ..self.clone()
            },
            ConstraintAction::InsertIncludedLabel(label) => Self {
                excluded_labels: without(&self.excluded_labels, &label),
                included_labels: with(&self.included_labels, label),
                ..self.clone()
            },
            ConstraintAction::RemoveIncludedLabel(label) => Self {
                included_labels: without(&self.included_labels, &label),
                ..self.clone()
            },
            ConstraintAction::InsertExcludedLabel(label) => Self {
                included_labels: without(&self.included_labels, &label),
                excluded_labels: with(&self.excluded_labels, label),
                ..self.clone()
            },
            ConstraintAction::RemoveExcludedLabel(label) => Self {
                excluded_labels: without(&self.excluded_labels, &label),
                ..self.clone()
            },
        }
    }
}

fn with(set: &BTreeSet<String>, label: String) -> BTreeSet<String> {
    let mut next = set.clone();
    next.insert(label);
    next
}

fn without(set: &BTreeSet<String>, label: &str) -> BTreeSet<String> {
    set.iter().filter(|l| l.as_str() != label).cloned().collect()
}
