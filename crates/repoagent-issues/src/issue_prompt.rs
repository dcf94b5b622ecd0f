use serde::Serialize;

use crate::label_policy::MAX_SUGGESTED_LABELS;

pub const EVALUATION_SYSTEM_PROMPT: &str = "You are a helpful assistant that analyzes and improves GitHub issues using natural language. All responses must be valid JSON.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One chat message handed to the model by the hosting layer.
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

const EXAMPLE_RESPONSE: &str = r#"{
  "summary": "<your insight>",
  "completeness": {
    "title": "Yes",
    "description": "Yes",
    "acceptance_criteria": "No"
  },
  "importance": "medium",
  "acceptance_criteria_evaluation": "<analysis + any testability warning>",
  "labels": ["bug", "enhancement"],
  "ready_to_work": false,
  "base_story_not_clear": false,
  "refactored_story": {
    "title": "Refined or original title",
    "description": "Expanded or original explanation with business value or user need",
    "acceptance_criteria": [
      "criterion one",
      "criterion two"
    ]
  }
}"#;

fn render_label_choices(repository_labels: &[String]) -> String {
    if repository_labels.is_empty() {
        return "(the repository has no labels; return an empty array)".to_string();
    }
    repository_labels
        .iter()
        .map(|label| format!("'{label}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the system and user messages that ask the model for an evaluation.
pub fn render_evaluation_prompt(
    issue_title: &str,
    issue_body: &str,
    repository_labels: &[String],
) -> Vec<PromptMessage> {
    let instructions = [
        "- summary: A concise, AI-enhanced summary or insight about the story.".to_string(),
        "- completeness: An object with keys 'title', 'description', and 'acceptance_criteria', each with values 'Yes' or 'No'.".to_string(),
        "- importance: One of 'low', 'medium', or 'high', judged by business value, user need, and technical dependency.".to_string(),
        "- acceptance_criteria_evaluation: Analysis of the acceptance criteria for clarity, specificity, and testability via automation. If not automatable, include a warning and suggest improvements.".to_string(),
        format!(
            "- labels: An array of up to {MAX_SUGGESTED_LABELS} labels chosen only from: {}.",
            render_label_choices(repository_labels)
        ),
        "- ready_to_work: Boolean. True if all elements are present, clear purpose, and testable acceptance criteria.".to_string(),
        "- base_story_not_clear: Boolean. True if the title or description is vague, placeholder-like, or lacks meaningful value (e.g. 'Test', 'TBD', 'No update provided').".to_string(),
        "- refactored_story: An object with keys 'title', 'description', and 'acceptance_criteria' (an array of strings). Only include this if ready_to_work is False AND base_story_not_clear is False. If any field is unchanged, copy it verbatim from the original.".to_string(),
    ];
    let user = format!(
        "## GitHub Issue Context\nTitle: {issue_title}\nBody: {issue_body}\n\n## Evaluation Instructions\nYou must return your response as a single valid JSON object. Do not include any markdown, code blocks, or extra commentary.\n\nAssess the issue as a candidate user story for engineering work. Your response must include the following fields:\n{}\n\nIf base_story_not_clear is True or ready_to_work is True, omit the 'refactored_story' field entirely.\n\nExample JSON response:\n{EXAMPLE_RESPONSE}\n",
        instructions.join("\n")
    );
    vec![
        PromptMessage {
            role: PromptRole::System,
            content: EVALUATION_SYSTEM_PROMPT.to_string(),
        },
        PromptMessage {
            role: PromptRole::User,
            content: user,
        },
    ]
}
