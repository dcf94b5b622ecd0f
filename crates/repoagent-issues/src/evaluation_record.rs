//! Structured evaluation verdict for one issue.
//!
//! Records are validated once at construction and never mutated afterwards.
//! Every text field is a single trimmed line so the markdown layout can be
//! parsed back without loss.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::label_policy::{is_renderable_label, MAX_SUGGESTED_LABELS};
use crate::refactor_policy::include_refactor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Enumerates supported `Importance` values.
pub enum Importance {
    Low,
    Medium,
    High,
}

impl Importance {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown importance '{0}', expected low, medium, or high")]
pub struct UnknownImportance(pub String);

impl FromStr for Importance {
    type Err = UnknownImportance;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(UnknownImportance(raw.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Completeness {
    pub title_ok: bool,
    pub description_ok: bool,
    pub acceptance_criteria_ok: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Improved title, description, and acceptance criteria for an issue.
pub struct RefactoredStory {
    pub title: String,
    pub description: String,
    pub acceptance_criteria: Vec<String>,
}

impl RefactoredStory {
    /// Issue body written when the story is applied.
    pub fn issue_body_markdown(&self) -> String {
        let mut lines = vec![format!("**Description**: {}", self.description)];
        if !self.acceptance_criteria.is_empty() {
            lines.push(String::new());
            lines.push("**Acceptance Criteria**:".to_string());
            for criterion in &self.acceptance_criteria {
                lines.push(format!("- {criterion}"));
            }
        }
        lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Reasons a set of fields cannot become an `EvaluationRecord`.
pub enum RecordValidationError {
    #[error("summary must not be empty")]
    EmptySummary,
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("{field} must be a single trimmed line")]
    UnnormalizedText { field: &'static str },
    #[error("label '{0}' cannot be rendered in an evaluation comment")]
    UnrenderableLabel(String),
    #[error("label '{0}' is suggested more than once")]
    DuplicateLabel(String),
    #[error("{0} suggested labels exceed the limit of 3")]
    TooManyLabels(usize),
    #[error("refactored story is required when the story is neither ready nor unclear")]
    MissingRefactoredStory,
    #[error("refactored story is only allowed when the story is neither ready nor unclear")]
    UnexpectedRefactoredStory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raw fields for [`EvaluationRecord::try_new`].
pub struct EvaluationFields {
    pub summary: String,
    pub completeness: Completeness,
    pub acceptance_criteria_evaluation: String,
    pub importance: Importance,
    pub ready_to_work: bool,
    pub base_story_not_clear: bool,
    pub refactored_story: Option<RefactoredStory>,
    pub suggested_labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Validated, immutable evaluation of one issue.
pub struct EvaluationRecord {
    fields: EvaluationFields,
}

impl EvaluationRecord {
    pub fn try_new(fields: EvaluationFields) -> Result<Self, RecordValidationError> {
        validate_evaluation_fields(&fields)?;
        Ok(Self { fields })
    }

    pub fn summary(&self) -> &str {
        &self.fields.summary
    }

    pub fn completeness(&self) -> Completeness {
        self.fields.completeness
    }

    pub fn acceptance_criteria_evaluation(&self) -> &str {
        &self.fields.acceptance_criteria_evaluation
    }

    pub fn importance(&self) -> Importance {
        self.fields.importance
    }

    pub fn ready_to_work(&self) -> bool {
        self.fields.ready_to_work
    }

    pub fn base_story_not_clear(&self) -> bool {
        self.fields.base_story_not_clear
    }

    pub fn refactored_story(&self) -> Option<&RefactoredStory> {
        self.fields.refactored_story.as_ref()
    }

    pub fn suggested_labels(&self) -> &[String] {
        &self.fields.suggested_labels
    }
}

/// Collapse model text into the single-line form records store.
///
/// Every run of whitespace or control characters becomes one space and the
/// ends are trimmed.
pub fn normalize_record_text(raw: &str) -> String {
    raw.split(|ch: char| ch.is_whitespace() || ch.is_control())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_normalized_text(text: &str) -> bool {
    text == text.trim() && !text.chars().any(char::is_control)
}

/// Single trimmed line; may be empty.
fn require_normalized(text: &str, field: &'static str) -> Result<(), RecordValidationError> {
    if !is_normalized_text(text) {
        return Err(RecordValidationError::UnnormalizedText { field });
    }
    Ok(())
}

fn require_line(text: &str, field: &'static str) -> Result<(), RecordValidationError> {
    if text.is_empty() {
        return Err(RecordValidationError::EmptyField { field });
    }
    require_normalized(text, field)
}

/// Check every record invariant. Called by [`EvaluationRecord::try_new`] only.
fn validate_evaluation_fields(fields: &EvaluationFields) -> Result<(), RecordValidationError> {
    if fields.summary.is_empty() {
        return Err(RecordValidationError::EmptySummary);
    }
    require_line(&fields.summary, "summary")?;
    require_normalized(
        &fields.acceptance_criteria_evaluation,
        "acceptance criteria evaluation",
    )?;

    let wants_story = include_refactor(fields.ready_to_work, fields.base_story_not_clear);
    match (&fields.refactored_story, wants_story) {
        (None, true) => return Err(RecordValidationError::MissingRefactoredStory),
        (Some(_), false) => return Err(RecordValidationError::UnexpectedRefactoredStory),
        (Some(story), true) => {
            require_normalized(&story.title, "refactored story title")?;
            require_normalized(&story.description, "refactored story description")?;
            for criterion in &story.acceptance_criteria {
                require_line(criterion, "acceptance criterion")?;
            }
        }
        (None, false) => {}
    }

    if fields.suggested_labels.len() > MAX_SUGGESTED_LABELS {
        return Err(RecordValidationError::TooManyLabels(
            fields.suggested_labels.len(),
        ));
    }
    for (index, label) in fields.suggested_labels.iter().enumerate() {
        if !is_renderable_label(label) {
            return Err(RecordValidationError::UnrenderableLabel(label.clone()));
        }
        if fields.suggested_labels[..index].contains(label) {
            return Err(RecordValidationError::DuplicateLabel(label.clone()));
        }
    }
    Ok(())
}
