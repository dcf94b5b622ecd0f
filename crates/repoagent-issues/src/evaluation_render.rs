use crate::evaluation_format::EvaluationFormat;
use crate::evaluation_record::{EvaluationRecord, RefactoredStory};
use crate::issue_command_parser::IssueCommand;
use crate::refactor_policy::unclear_story_note;

pub(crate) const HEADING: &str = "### 🤖 **AI-enhanced Evaluation**";
pub(crate) const SUMMARY_PREFIX: &str = "**Summary**: ";
pub(crate) const COMPLETENESS_HEADING: &str = "**Completeness**:";
pub(crate) const TITLE_ITEM: &str = "Title";
pub(crate) const DESCRIPTION_ITEM: &str = "Description";
pub(crate) const ACCEPTANCE_CRITERIA_ITEM: &str = "Acceptance Criteria";
pub(crate) const CRITERIA_EVALUATION_LABEL: &str = "**Acceptance Criteria Evaluation**:";
pub(crate) const IMPORTANCE_PREFIX: &str = "**Importance**: ";
pub(crate) const READINESS_HEADING: &str = "**Readiness**:";
pub(crate) const READY_ITEM: &str = "Ready to Work";
pub(crate) const UNCLEAR_ITEM: &str = "Base Story Not Clear";
pub(crate) const STORY_HEADING: &str = "### Refactored Story";
pub(crate) const STORY_TITLE_PREFIX: &str = "**Title**: ";
pub(crate) const STORY_DESCRIPTION_PREFIX: &str = "**Description**: ";
pub(crate) const STORY_CRITERIA_HEADING: &str = "**Acceptance Criteria**:";
pub(crate) const LABELS_PREFIX: &str = "**Suggested Labels**: ";
pub(crate) const NO_LABELS: &str = "_none_";
pub(crate) const FOOTER_RULE: &str = "---";
pub(crate) const NOTE_PREFIX: &str = "> ";

pub(crate) fn checklist_item(checked: bool, item: &str) -> String {
    let glyph = if checked { "x" } else { " " };
    format!("- [{glyph}] {item}")
}

pub(crate) fn reply_line(command: IssueCommand) -> String {
    let action = match command {
        IssueCommand::Apply => "apply these changes",
        IssueCommand::Review => "run another evaluation",
        IssueCommand::Usage => "see available commands",
        IssueCommand::Disable => "disable automatic reviews",
    };
    format!("Reply `{}` to {action}.", command.token())
}

pub(crate) fn footer_commands(has_story: bool) -> Vec<IssueCommand> {
    let mut commands = Vec::with_capacity(3);
    if has_story {
        commands.push(IssueCommand::Apply);
    }
    commands.push(IssueCommand::Review);
    commands.push(IssueCommand::Usage);
    commands
}

pub(crate) fn render_labels_value(labels: &[String]) -> String {
    if labels.is_empty() {
        return NO_LABELS.to_string();
    }
    labels
        .iter()
        .map(|label| format!("`{label}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn push_story(lines: &mut Vec<String>, story: &RefactoredStory) {
    lines.push(STORY_HEADING.to_string());
    lines.push(String::new());
    lines.push(format!("{STORY_TITLE_PREFIX}{}", story.title));
    lines.push(String::new());
    lines.push(format!("{STORY_DESCRIPTION_PREFIX}{}", story.description));
    lines.push(String::new());
    lines.push(STORY_CRITERIA_HEADING.to_string());
    for criterion in &story.acceptance_criteria {
        lines.push(format!("- {criterion}"));
    }
    lines.push(String::new());
}

/// Render an evaluation as the canonical GitHub comment body.
///
/// Output is a pure function of the record and the format markers.
pub fn render_evaluation_comment(record: &EvaluationRecord, format: &EvaluationFormat) -> String {
    let completeness = record.completeness();
    let criteria_evaluation = record.acceptance_criteria_evaluation();
    let mut lines = vec![
        format.record_marker.clone(),
        HEADING.to_string(),
        String::new(),
        format!("{SUMMARY_PREFIX}{}", record.summary()),
        String::new(),
        COMPLETENESS_HEADING.to_string(),
        checklist_item(completeness.title_ok, TITLE_ITEM),
        checklist_item(completeness.description_ok, DESCRIPTION_ITEM),
        checklist_item(completeness.acceptance_criteria_ok, ACCEPTANCE_CRITERIA_ITEM),
        String::new(),
        if criteria_evaluation.is_empty() {
            CRITERIA_EVALUATION_LABEL.to_string()
        } else {
            format!("{CRITERIA_EVALUATION_LABEL} {criteria_evaluation}")
        },
        String::new(),
        format!("{IMPORTANCE_PREFIX}{}", record.importance()),
        String::new(),
        READINESS_HEADING.to_string(),
        checklist_item(record.ready_to_work(), READY_ITEM),
        checklist_item(record.base_story_not_clear(), UNCLEAR_ITEM),
        String::new(),
    ];

    if let Some(story) = record.refactored_story() {
        push_story(&mut lines, story);
    } else if let Some(note) = unclear_story_note(record.base_story_not_clear()) {
        lines.push(format!("{NOTE_PREFIX}{note}"));
        lines.push(String::new());
    }

    lines.push(format!(
        "{LABELS_PREFIX}{}",
        render_labels_value(record.suggested_labels())
    ));
    lines.push(String::new());
    lines.push(FOOTER_RULE.to_string());
    for command in footer_commands(record.refactored_story().is_some()) {
        lines.push(reply_line(command));
    }
    lines.join("\n")
}

/// Quote a comment body as a markdown blockquote.
pub fn quote_markdown(body: &str) -> String {
    body.trim()
        .lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
