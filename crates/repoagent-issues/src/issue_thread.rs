//! Read-only view of an issue and its comment history.

use serde::Serialize;

use crate::evaluation_format::EvaluationFormat;
use crate::evaluation_parse::{parse_evaluation_comment, ParseError};
use crate::evaluation_record::EvaluationRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorKind {
    Bot,
    Human,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadComment {
    pub author: AuthorKind,
    pub body: String,
}

impl ThreadComment {
    pub fn bot(body: impl Into<String>) -> Self {
        Self {
            author: AuthorKind::Bot,
            body: body.into(),
        }
    }

    pub fn human(body: impl Into<String>) -> Self {
        Self {
            author: AuthorKind::Human,
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Issue title and body plus comments in creation order, oldest first.
pub struct IssueThread {
    pub title: String,
    pub body: String,
    pub comments: Vec<ThreadComment>,
}

/// Find the most recent bot comment that parses as an evaluation record.
///
/// Bot comments without the record marker are skipped. A marked comment that
/// fails to parse stops the search and is returned as an error.
pub fn find_latest_evaluation(
    thread: &IssueThread,
    format: &EvaluationFormat,
) -> Result<Option<(usize, EvaluationRecord)>, ParseError> {
    for (index, comment) in thread.comments.iter().enumerate().rev() {
        if comment.author != AuthorKind::Bot {
            continue;
        }
        match parse_evaluation_comment(&comment.body, format) {
            Ok(record) => return Ok(Some((index, record))),
            Err(ParseError::NotAnEvaluationComment) => continue,
            Err(error) => {
                tracing::warn!(comment_index = index, %error, "latest evaluation comment is malformed");
                return Err(error);
            }
        }
    }
    Ok(None)
}
