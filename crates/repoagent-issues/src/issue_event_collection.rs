//! Issue snapshot decoding and event resolution for the hosting layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::issue_dispatch::IssueEvent;
use crate::issue_thread::{AuthorKind, IssueThread, ThreadComment};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GithubUser {
    pub login: String,
    #[serde(rename = "type", default)]
    pub account_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GithubIssue {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GithubIssueComment {
    pub id: u64,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user: GithubUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// Everything the host fetched about one issue before dispatching.
pub struct IssueSnapshot {
    pub issue: GithubIssue,
    #[serde(default)]
    pub comments: Vec<GithubIssueComment>,
    #[serde(default)]
    pub repository_labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Enumerates supported `SnapshotError` values.
pub enum SnapshotError {
    #[error("unsupported event name '{0}' (expected issues or issue_comment)")]
    UnknownEventName(String),
    #[error("unsupported issues action '{0}' (expected opened or edited)")]
    UnknownIssueAction(String),
    #[error("issue_comment events require a comment id")]
    MissingCommentId,
    #[error("comment {0} is not part of the issue snapshot")]
    CommentNotFound(u64),
}

/// Classify a GitHub account as a bot or a human.
///
/// GitHub `Bot` accounts always count as bots; `bot_login` additionally marks
/// the agent's own account when it posts through a user token. An empty
/// `bot_login` matches nobody.
pub fn author_kind(user: &GithubUser, bot_login: &str) -> AuthorKind {
    let is_agent_login = !bot_login.is_empty() && user.login.eq_ignore_ascii_case(bot_login);
    if user.account_type == "Bot" || is_agent_login {
        AuthorKind::Bot
    } else {
        AuthorKind::Human
    }
}

/// Build the dispatcher's thread view with comments ordered oldest first.
pub fn build_issue_thread(snapshot: &IssueSnapshot, bot_login: &str) -> IssueThread {
    let mut comments = snapshot.comments.iter().collect::<Vec<_>>();
    comments.sort_by(|left, right| {
        left.created_at
            .cmp(&right.created_at)
            .then(left.id.cmp(&right.id))
    });
    IssueThread {
        title: snapshot.issue.title.clone(),
        body: snapshot.issue.body.clone().unwrap_or_default(),
        comments: comments
            .into_iter()
            .map(|comment| ThreadComment {
                author: author_kind(&comment.user, bot_login),
                body: comment.body.clone().unwrap_or_default(),
            })
            .collect(),
    }
}

/// Translate a webhook event name and action into a dispatcher event.
pub fn resolve_issue_event(
    event_name: &str,
    action: &str,
    comment_id: Option<u64>,
    snapshot: &IssueSnapshot,
    bot_login: &str,
) -> Result<IssueEvent, SnapshotError> {
    match event_name {
        "issues" => match action {
            "opened" => Ok(IssueEvent::IssueOpened),
            "edited" => Ok(IssueEvent::IssueEdited),
            other => Err(SnapshotError::UnknownIssueAction(other.to_string())),
        },
        "issue_comment" => {
            let comment_id = comment_id.ok_or(SnapshotError::MissingCommentId)?;
            let comment = snapshot
                .comments
                .iter()
                .find(|comment| comment.id == comment_id)
                .ok_or(SnapshotError::CommentNotFound(comment_id))?;
            Ok(IssueEvent::CommentCreated {
                author: author_kind(&comment.user, bot_login),
                body: comment.body.clone().unwrap_or_default(),
            })
        }
        other => Err(SnapshotError::UnknownEventName(other.to_string())),
    }
}
