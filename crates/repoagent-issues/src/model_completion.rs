//! Decoding of the evaluation JSON returned by the model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::evaluation_record::{
    normalize_record_text, Completeness, EvaluationFields, EvaluationRecord, Importance,
    RecordValidationError, RefactoredStory, UnknownImportance,
};
use crate::label_policy::{select_suggested_labels, InvalidLabelSuggestion};
use crate::refactor_policy::include_refactor;

#[derive(Debug, Error)]
/// Enumerates supported `ModelCompletionError` values.
pub enum ModelCompletionError {
    #[error("model completion is not valid evaluation JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    UnknownImportance(#[from] UnknownImportance),
    #[error("completeness value '{value}' for {field} is not yes/no")]
    InvalidCompleteness { field: &'static str, value: String },
    #[error("model evaluation is invalid: {0}")]
    Record(#[from] RecordValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
/// Completeness flag as either a JSON boolean or a `Yes`/`No` string.
pub enum CompletenessFlag {
    Bool(bool),
    Text(String),
}

impl CompletenessFlag {
    fn resolve(&self, field: &'static str) -> Result<bool, ModelCompletionError> {
        match self {
            Self::Bool(value) => Ok(*value),
            Self::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "yes" | "true" => Ok(true),
                "no" | "false" => Ok(false),
                _ => Err(ModelCompletionError::InvalidCompleteness {
                    field,
                    value: text.clone(),
                }),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCompleteness {
    pub title: CompletenessFlag,
    pub description: CompletenessFlag,
    pub acceptance_criteria: CompletenessFlag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRefactoredStory {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Evaluation fields as produced by the model, before validation.
pub struct ModelEvaluation {
    pub summary: String,
    pub completeness: ModelCompleteness,
    pub importance: String,
    #[serde(default)]
    pub acceptance_criteria_evaluation: String,
    #[serde(default)]
    pub labels: Vec<String>,
    pub ready_to_work: bool,
    pub base_story_not_clear: bool,
    #[serde(default)]
    pub refactored_story: Option<ModelRefactoredStory>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A constructed record plus the label suggestions that did not survive.
pub struct EvaluationBuild {
    pub record: EvaluationRecord,
    pub dropped_labels: Vec<InvalidLabelSuggestion>,
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    match body.split_once('\n') {
        Some((_language, json)) => json.trim(),
        None => body.trim(),
    }
}

impl ModelEvaluation {
    /// Decode a raw completion, tolerating a surrounding markdown code fence.
    pub fn from_completion_text(text: &str) -> Result<Self, ModelCompletionError> {
        Ok(serde_json::from_str(strip_code_fence(text))?)
    }

    /// Validate labels, apply the refactor-inclusion policy, and build a record.
    pub fn into_record(
        self,
        repository_labels: &[String],
    ) -> Result<EvaluationBuild, ModelCompletionError> {
        let completeness = Completeness {
            title_ok: self.completeness.title.resolve("title")?,
            description_ok: self.completeness.description.resolve("description")?,
            acceptance_criteria_ok: self
                .completeness
                .acceptance_criteria
                .resolve("acceptance criteria")?,
        };
        let importance = self.importance.parse::<Importance>()?;
        let selection =
            select_suggested_labels(self.labels.iter().map(String::as_str), repository_labels);

        let refactored_story = if include_refactor(self.ready_to_work, self.base_story_not_clear) {
            self.refactored_story.map(|story| RefactoredStory {
                title: normalize_record_text(&story.title),
                description: normalize_record_text(&story.description),
                acceptance_criteria: story
                    .acceptance_criteria
                    .iter()
                    .map(|criterion| normalize_record_text(criterion))
                    .filter(|criterion| !criterion.is_empty())
                    .collect(),
            })
        } else {
            if self.refactored_story.is_some() {
                tracing::debug!(
                    ready_to_work = self.ready_to_work,
                    base_story_not_clear = self.base_story_not_clear,
                    "discarding refactored story excluded by policy"
                );
            }
            None
        };

        let record = EvaluationRecord::try_new(EvaluationFields {
            summary: normalize_record_text(&self.summary),
            completeness,
            acceptance_criteria_evaluation: normalize_record_text(
                &self.acceptance_criteria_evaluation,
            ),
            importance,
            ready_to_work: self.ready_to_work,
            base_story_not_clear: self.base_story_not_clear,
            refactored_story,
            suggested_labels: selection.labels,
        })?;
        Ok(EvaluationBuild {
            record,
            dropped_labels: selection.dropped,
        })
    }
}
