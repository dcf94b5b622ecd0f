use crate::issue_command_parser::IssueCommand;
use crate::issue_dispatch::{DispatchError, NoApplicableReason};

const ERROR_DETAIL_MAX_CHARS: usize = 600;

pub(crate) fn truncate_for_error(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut truncated = value.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}

/// Render the comment explaining why an event produced no write.
pub fn render_dispatch_error_comment(error: &DispatchError) -> String {
    let review = IssueCommand::Review.token();
    let apply = IssueCommand::Apply.token();
    match error {
        DispatchError::NoApplicableEvaluation(NoApplicableReason::NoPriorEvaluation) => format!(
            "⚠️ Nothing was applied: no AI-enhanced evaluation was found on this issue.\n\nComment `{review}` to generate one, then `{apply}` it."
        ),
        DispatchError::NoApplicableEvaluation(NoApplicableReason::NoRefactoredStory) => {
            "⚠️ Nothing was applied: the latest AI-enhanced evaluation has no refactored story.\n\nThe story is either ready to work or too unclear to rewrite.".to_string()
        }
        DispatchError::MalformedRecord(parse_error) => format!(
            "⚠️ Nothing was applied: the latest AI-enhanced evaluation could not be read.\n\nError: `{}`\n\nComment `{review}` to generate a fresh evaluation.",
            truncate_for_error(&parse_error.to_string(), ERROR_DETAIL_MAX_CHARS)
        ),
        DispatchError::InvalidEvaluation(_) | DispatchError::EvaluationUnavailable(_) => format!(
            "⚠️ The AI evaluation could not be completed.\n\nError: `{}`\n\nComment `{review}` to try again.",
            truncate_for_error(&error.to_string(), ERROR_DETAIL_MAX_CHARS)
        ),
    }
}

/// Comment posted alongside the body update for `/disable`.
pub fn render_disable_confirmation() -> String {
    format!(
        "🛑 Automatic reviews have been disabled for this issue. Comment `{}` to manually trigger future evaluations.",
        IssueCommand::Review.token()
    )
}
