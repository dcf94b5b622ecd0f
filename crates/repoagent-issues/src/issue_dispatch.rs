//! Command dispatch for one inbound issue event.
//!
//! The dispatcher is stateless: every invocation re-derives the disable flag
//! and the prior evaluation from the thread it is handed. It makes no ordering
//! guarantee across overlapping invocations on the same issue; hosts must
//! serialize runs per issue if they need one.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::disable_marker::{is_agent_disabled, with_disable_marker_injected};
use crate::dispatch_error_comment::{render_disable_confirmation, render_dispatch_error_comment};
use crate::evaluation_format::EvaluationFormat;
use crate::evaluation_parse::ParseError;
use crate::evaluation_render::{quote_markdown, render_evaluation_comment};
use crate::issue_command_parser::{classify_issue_command, IssueCommand};
use crate::issue_command_usage::render_usage_comment;
use crate::issue_thread::{find_latest_evaluation, AuthorKind, IssueThread};
use crate::label_policy::{select_suggested_labels, InvalidLabelSuggestion};
use crate::model_completion::{ModelCompletionError, ModelEvaluation};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Enumerates supported `IssueEvent` values.
pub enum IssueEvent {
    IssueOpened,
    IssueEdited,
    CommentCreated { author: AuthorKind, body: String },
}

/// Source of fresh model evaluations, called only when a review is due.
pub trait EvaluationProvider {
    fn evaluate(
        &self,
        thread: &IssueThread,
        repository_labels: &[String],
    ) -> Result<ModelEvaluation, String>;
}

impl<F> EvaluationProvider for F
where
    F: Fn(&IssueThread, &[String]) -> Result<ModelEvaluation, String>,
{
    fn evaluate(
        &self,
        thread: &IssueThread,
        repository_labels: &[String],
    ) -> Result<ModelEvaluation, String> {
        self(thread, repository_labels)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoOpReason {
    Disabled,
    AlreadyDisabled,
    BotAuthored,
    NoCommand,
}

impl NoOpReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::AlreadyDisabled => "already_disabled",
            Self::BotAuthored => "bot_authored",
            Self::NoCommand => "no_command",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoApplicableReason {
    NoPriorEvaluation,
    NoRefactoredStory,
}

impl fmt::Display for NoApplicableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoPriorEvaluation => "no evaluation comment was found on the issue",
            Self::NoRefactoredStory => "the latest evaluation has no refactored story",
        })
    }
}

#[derive(Debug, Error)]
/// Enumerates supported `DispatchError` values.
pub enum DispatchError {
    #[error("no applicable evaluation: {0}")]
    NoApplicableEvaluation(NoApplicableReason),
    #[error("latest evaluation comment is malformed: {0}")]
    MalformedRecord(ParseError),
    #[error("model evaluation could not be used: {0}")]
    InvalidEvaluation(ModelCompletionError),
    #[error("evaluation provider failed: {0}")]
    EvaluationUnavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchErrorKind {
    NoApplicableEvaluation,
    MalformedRecord,
    InvalidEvaluation,
    EvaluationUnavailable,
}

impl DispatchError {
    pub fn kind(&self) -> DispatchErrorKind {
        match self {
            Self::NoApplicableEvaluation(_) => DispatchErrorKind::NoApplicableEvaluation,
            Self::MalformedRecord(_) => DispatchErrorKind::MalformedRecord,
            Self::InvalidEvaluation(_) => DispatchErrorKind::InvalidEvaluation,
            Self::EvaluationUnavailable(_) => DispatchErrorKind::EvaluationUnavailable,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Issue edits for the host to perform. `None` fields stay untouched.
pub struct IssueUpdate {
    pub title: Option<String>,
    pub body: Option<String>,
    pub labels: Option<Vec<String>>,
    pub confirmation_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
/// The single write the host performs for an event.
pub enum DispatchAction {
    PostComment {
        body: String,
    },
    UpdateIssue(IssueUpdate),
    NoOp {
        reason: NoOpReason,
    },
    /// `comment` is a human-readable explanation the host may post.
    Error {
        kind: DispatchErrorKind,
        message: String,
        comment: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub command: Option<IssueCommand>,
    pub action: DispatchAction,
    pub dropped_labels: Vec<InvalidLabelSuggestion>,
}

impl DispatchOutcome {
    fn new(command: Option<IssueCommand>, action: DispatchAction) -> Self {
        Self {
            command,
            action,
            dropped_labels: Vec::new(),
        }
    }

    fn failed(command: Option<IssueCommand>, error: DispatchError) -> Self {
        tracing::warn!(command = ?command, %error, "issue event dispatch failed");
        let comment = render_dispatch_error_comment(&error);
        Self::new(
            command,
            DispatchAction::Error {
                kind: error.kind(),
                message: error.to_string(),
                comment,
            },
        )
    }
}

#[derive(Debug, Clone, Copy)]
/// Everything read from the issue for one dispatch.
pub struct DispatchContext<'a> {
    pub thread: &'a IssueThread,
    pub repository_labels: &'a [String],
    pub format: &'a EvaluationFormat,
}

/// Decide the single action an inbound event triggers.
pub fn dispatch_issue_event<P>(
    event: &IssueEvent,
    context: DispatchContext<'_>,
    provider: &P,
) -> DispatchOutcome
where
    P: EvaluationProvider + ?Sized,
{
    let disabled = is_agent_disabled(&context.thread.body, context.format);
    let outcome = match event {
        IssueEvent::IssueOpened | IssueEvent::IssueEdited => {
            if disabled {
                DispatchOutcome::new(
                    None,
                    DispatchAction::NoOp {
                        reason: NoOpReason::Disabled,
                    },
                )
            } else {
                run_review(None, context, provider)
            }
        }
        IssueEvent::CommentCreated {
            author: AuthorKind::Bot,
            ..
        } => DispatchOutcome::new(
            None,
            DispatchAction::NoOp {
                reason: NoOpReason::BotAuthored,
            },
        ),
        IssueEvent::CommentCreated { body, .. } => {
            let command = classify_issue_command(body);
            tracing::debug!(command = ?command, disabled, "classified issue comment");
            match command {
                None => DispatchOutcome::new(
                    None,
                    DispatchAction::NoOp {
                        reason: NoOpReason::NoCommand,
                    },
                ),
                Some(IssueCommand::Review) => run_review(command, context, provider),
                Some(IssueCommand::Apply) => run_apply(context),
                Some(IssueCommand::Usage) => DispatchOutcome::new(
                    command,
                    DispatchAction::PostComment {
                        body: render_usage_comment(),
                    },
                ),
                Some(IssueCommand::Disable) => run_disable(disabled, context),
            }
        }
    };
    tracing::info!(
        command = ?outcome.command,
        action = action_name(&outcome.action),
        "dispatched issue event"
    );
    outcome
}

fn action_name(action: &DispatchAction) -> &'static str {
    match action {
        DispatchAction::PostComment { .. } => "post_comment",
        DispatchAction::UpdateIssue(_) => "update_issue",
        DispatchAction::NoOp { reason } => reason.as_str(),
        DispatchAction::Error { .. } => "error",
    }
}

fn run_review<P>(
    command: Option<IssueCommand>,
    context: DispatchContext<'_>,
    provider: &P,
) -> DispatchOutcome
where
    P: EvaluationProvider + ?Sized,
{
    let evaluation = match provider.evaluate(context.thread, context.repository_labels) {
        Ok(evaluation) => evaluation,
        Err(message) => {
            return DispatchOutcome::failed(command, DispatchError::EvaluationUnavailable(message))
        }
    };
    let build = match evaluation.into_record(context.repository_labels) {
        Ok(build) => build,
        Err(error) => {
            return DispatchOutcome::failed(command, DispatchError::InvalidEvaluation(error))
        }
    };
    DispatchOutcome {
        command,
        action: DispatchAction::PostComment {
            body: render_evaluation_comment(&build.record, context.format),
        },
        dropped_labels: build.dropped_labels,
    }
}

fn run_apply(context: DispatchContext<'_>) -> DispatchOutcome {
    let command = Some(IssueCommand::Apply);
    let record = match find_latest_evaluation(context.thread, context.format) {
        Ok(Some((_, record))) => record,
        Ok(None) => {
            return DispatchOutcome::failed(
                command,
                DispatchError::NoApplicableEvaluation(NoApplicableReason::NoPriorEvaluation),
            )
        }
        Err(error) => return DispatchOutcome::failed(command, DispatchError::MalformedRecord(error)),
    };
    let Some(story) = record.refactored_story() else {
        return DispatchOutcome::failed(
            command,
            DispatchError::NoApplicableEvaluation(NoApplicableReason::NoRefactoredStory),
        );
    };

    let mut body = story.issue_body_markdown();
    if is_agent_disabled(&context.thread.body, context.format)
        && !is_agent_disabled(&body, context.format)
    {
        body = with_disable_marker_injected(&body, context.format);
    }
    let selection = select_suggested_labels(
        record.suggested_labels().iter().map(String::as_str),
        context.repository_labels,
    );
    let labels = (!selection.labels.is_empty()).then_some(selection.labels);
    let confirmation = format!(
        "✅ Applied enhancements based on the following comment:\n\n{}",
        quote_markdown(&render_evaluation_comment(&record, context.format))
    );
    DispatchOutcome {
        command,
        action: DispatchAction::UpdateIssue(IssueUpdate {
            title: Some(story.title.clone()),
            body: Some(body),
            labels,
            confirmation_comment: Some(confirmation),
        }),
        dropped_labels: selection.dropped,
    }
}

fn run_disable(disabled: bool, context: DispatchContext<'_>) -> DispatchOutcome {
    let command = Some(IssueCommand::Disable);
    if disabled {
        return DispatchOutcome::new(
            command,
            DispatchAction::NoOp {
                reason: NoOpReason::AlreadyDisabled,
            },
        );
    }
    DispatchOutcome::new(
        command,
        DispatchAction::UpdateIssue(IssueUpdate {
            body: Some(with_disable_marker_injected(
                &context.thread.body,
                context.format,
            )),
            confirmation_comment: Some(render_disable_confirmation()),
            ..IssueUpdate::default()
        }),
    )
}
