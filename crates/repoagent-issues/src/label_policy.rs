use std::collections::HashSet;

use serde::Serialize;

/// Maximum number of labels an evaluation may suggest.
pub const MAX_SUGGESTED_LABELS: usize = 3;

/// Normalize a label for case-insensitive matching.
pub fn normalize_issue_label(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Return true when a label can be written into an evaluation comment verbatim.
pub fn is_renderable_label(label: &str) -> bool {
    !label.is_empty()
        && label == label.trim()
        && !label.contains('`')
        && !label.chars().any(char::is_control)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
/// Why a suggested label was dropped.
pub enum LabelRejection {
    Blank,
    NotInRepository,
    Duplicate,
    Unrenderable,
    OverLimit,
}

impl LabelRejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::NotInRepository => "not_in_repository",
            Self::Duplicate => "duplicate",
            Self::Unrenderable => "unrenderable",
            Self::OverLimit => "over_limit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A suggested label that was dropped instead of being applied verbatim.
pub struct InvalidLabelSuggestion {
    pub label: String,
    pub reason: LabelRejection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Labels kept from a suggestion list plus the ones that were dropped.
pub struct LabelSelection {
    pub labels: Vec<String>,
    pub dropped: Vec<InvalidLabelSuggestion>,
}

/// Keep suggested labels that exist in the repository, in suggestion order.
///
/// Matching is case-insensitive and kept labels take the repository's
/// spelling. At most [`MAX_SUGGESTED_LABELS`] survive.
pub fn select_suggested_labels<'a>(
    suggested: impl IntoIterator<Item = &'a str>,
    repository_labels: &[String],
) -> LabelSelection {
    let mut selection = LabelSelection::default();
    let mut seen = HashSet::new();
    for raw in suggested {
        let label = raw.trim();
        let reject = |reason| InvalidLabelSuggestion {
            label: label.to_string(),
            reason,
        };
        if label.is_empty() {
            selection.dropped.push(reject(LabelRejection::Blank));
            continue;
        }
        let normalized = normalize_issue_label(label);
        let Some(canonical) = repository_labels
            .iter()
            .find(|candidate| normalize_issue_label(candidate) == normalized)
        else {
            selection
                .dropped
                .push(reject(LabelRejection::NotInRepository));
            continue;
        };
        if !seen.insert(normalized) {
            selection.dropped.push(reject(LabelRejection::Duplicate));
            continue;
        }
        if !is_renderable_label(canonical) {
            selection.dropped.push(reject(LabelRejection::Unrenderable));
            continue;
        }
        if selection.labels.len() >= MAX_SUGGESTED_LABELS {
            selection.dropped.push(reject(LabelRejection::OverLimit));
            continue;
        }
        selection.labels.push(canonical.clone());
    }
    for dropped in &selection.dropped {
        tracing::warn!(
            label = %dropped.label,
            reason = dropped.reason.as_str(),
            "dropped suggested label"
        );
    }
    selection
}
