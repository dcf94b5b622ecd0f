use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use repoagent_issues::evaluation_format::{
    EvaluationFormat, DISABLE_MARKER, EVALUATION_RECORD_MARKER_V1,
};

pub(crate) fn parse_bool_flag(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "" | "0" | "false" | "no" => Ok(false),
        other => Err(format!("expected a boolean (1/true/yes or 0/false/no), got '{other}'")),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "repoagent",
    about = "AI-assisted GitHub issue evaluation bot",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Decide the action for one issue event and print it as JSON.
    Dispatch(DispatchArgs),
    /// Print the evaluation prompt messages for an issue snapshot as JSON.
    Prompt(PromptArgs),
}

#[derive(Debug, Clone, Args)]
pub(crate) struct FormatArgs {
    #[arg(
        long = "record-marker",
        env = "INPUT_RECORD_MARKER",
        default_value = EVALUATION_RECORD_MARKER_V1,
        help = "Marker line that opens every evaluation comment"
    )]
    pub record_marker: String,

    #[arg(
        long = "disable-marker",
        env = "INPUT_DISABLE_MARKER",
        default_value = DISABLE_MARKER,
        help = "Marker that disables automatic reviews when present in the issue body"
    )]
    pub disable_marker: String,
}

impl FormatArgs {
    pub(crate) fn evaluation_format(&self) -> EvaluationFormat {
        EvaluationFormat::new(self.record_marker.clone(), self.disable_marker.clone())
    }
}

#[derive(Debug, Clone, Args)]
pub(crate) struct DispatchArgs {
    #[arg(
        long = "event-name",
        env = "INPUT_GITHUB_EVENT_NAME",
        help = "Webhook event name: issues or issue_comment"
    )]
    pub event_name: String,

    #[arg(
        long = "event-action",
        env = "INPUT_GITHUB_EVENT_ACTION",
        default_value = "",
        help = "Webhook action for issues events: opened or edited"
    )]
    pub event_action: String,

    #[arg(
        long = "comment-id",
        env = "INPUT_GITHUB_ISSUE_COMMENT_ID",
        help = "Id of the triggering comment, required for issue_comment events"
    )]
    pub comment_id: Option<u64>,

    #[arg(
        long = "thread-file",
        env = "INPUT_THREAD_FILE",
        help = "Path to the issue snapshot JSON (issue, comments, repository_labels)"
    )]
    pub thread_file: PathBuf,

    #[arg(
        long = "completion-file",
        env = "INPUT_COMPLETION_FILE",
        help = "Path to the raw model completion, read only when a review runs"
    )]
    pub completion_file: Option<PathBuf>,

    #[arg(
        long = "bot-login",
        env = "INPUT_BOT_LOGIN",
        default_value = "",
        help = "Login of the agent account; its comments count as bot-authored"
    )]
    pub bot_login: String,

    #[arg(
        long = "check-all",
        env = "INPUT_CHECK_ALL",
        default_value_t = false,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = parse_bool_flag,
        help = "Reserved for bulk re-evaluation; accepted and logged only"
    )]
    pub check_all: bool,

    #[command(flatten)]
    pub format: FormatArgs,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct PromptArgs {
    #[arg(
        long = "thread-file",
        env = "INPUT_THREAD_FILE",
        help = "Path to the issue snapshot JSON (issue, comments, repository_labels)"
    )]
    pub thread_file: PathBuf,
}
