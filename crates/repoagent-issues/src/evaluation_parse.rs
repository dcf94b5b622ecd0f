use thiserror::Error;

use crate::evaluation_format::EvaluationFormat;
use crate::evaluation_record::{
    Completeness, EvaluationFields, EvaluationRecord, Importance, RefactoredStory,
};
use crate::evaluation_render::{
    checklist_item, footer_commands, reply_line, ACCEPTANCE_CRITERIA_ITEM, COMPLETENESS_HEADING,
    CRITERIA_EVALUATION_LABEL, DESCRIPTION_ITEM, FOOTER_RULE, HEADING, IMPORTANCE_PREFIX,
    LABELS_PREFIX, NOTE_PREFIX, NO_LABELS, READINESS_HEADING, READY_ITEM, STORY_CRITERIA_HEADING,
    STORY_DESCRIPTION_PREFIX, STORY_HEADING, STORY_TITLE_PREFIX, SUMMARY_PREFIX, TITLE_ITEM,
    UNCLEAR_ITEM,
};
use crate::refactor_policy::UNCLEAR_STORY_NOTE;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Enumerates supported `ParseError` values.
pub enum ParseError {
    /// The text does not open with the record marker. Callers treat this as
    /// "no prior record".
    #[error("comment is not an evaluation comment")]
    NotAnEvaluationComment,
    /// The marker is present but the body does not follow the layout.
    #[error("malformed evaluation comment at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
}

struct LineCursor<'a> {
    lines: Vec<&'a str>,
    index: usize,
    /// Lines stripped from the front of the comment before the marker.
    skipped_lines: usize,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str, skipped_lines: usize) -> Self {
        Self {
            lines: text.lines().collect(),
            index: 0,
            skipped_lines,
        }
    }

    fn malformed(&self, reason: impl Into<String>) -> ParseError {
        ParseError::MalformedRecord {
            line: self.skipped_lines + self.index + 1,
            reason: reason.into(),
        }
    }

    /// Error for the line the cursor just consumed.
    fn malformed_previous(&self, reason: impl Into<String>) -> ParseError {
        ParseError::MalformedRecord {
            line: self.skipped_lines + self.index.max(1),
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.index).copied()
    }

    fn next_line(&mut self, expecting: &str) -> Result<&'a str, ParseError> {
        let line = self
            .peek()
            .ok_or_else(|| self.malformed(format!("unexpected end of comment, expected {expecting}")))?;
        self.index += 1;
        Ok(line)
    }

    fn expect_exact(&mut self, expected: &str) -> Result<(), ParseError> {
        let line = self.next_line(expected)?;
        if line != expected {
            self.index -= 1;
            return Err(self.malformed(format!("expected '{expected}', found '{line}'")));
        }
        Ok(())
    }

    fn expect_blank(&mut self) -> Result<(), ParseError> {
        let line = self.next_line("a blank line")?;
        if !line.is_empty() {
            self.index -= 1;
            return Err(self.malformed(format!("expected a blank line, found '{line}'")));
        }
        Ok(())
    }

    fn expect_prefixed(&mut self, prefix: &str) -> Result<&'a str, ParseError> {
        let line = self.next_line(prefix.trim_end())?;
        match line.strip_prefix(prefix) {
            Some(value) => Ok(value),
            None => {
                self.index -= 1;
                Err(self.malformed(format!(
                    "expected a line starting with '{}', found '{line}'",
                    prefix.trim_end()
                )))
            }
        }
    }

    fn expect_checklist(&mut self, item: &str) -> Result<bool, ParseError> {
        let line = self.next_line(item)?;
        if line == checklist_item(true, item) {
            return Ok(true);
        }
        if line == checklist_item(false, item) {
            return Ok(false);
        }
        self.index -= 1;
        Err(self.malformed(format!(
            "expected a checklist item for '{item}', found '{line}'"
        )))
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        while let Some(line) = self.peek() {
            if !line.trim().is_empty() {
                return Err(self.malformed(format!("unexpected trailing content '{line}'")));
            }
            self.index += 1;
        }
        Ok(())
    }
}

fn parse_importance(cursor: &LineCursor<'_>, value: &str) -> Result<Importance, ParseError> {
    [Importance::Low, Importance::Medium, Importance::High]
        .into_iter()
        .find(|importance| importance.as_str() == value)
        .ok_or_else(|| cursor.malformed_previous(format!("unknown importance '{value}'")))
}

fn parse_labels(cursor: &LineCursor<'_>, value: &str) -> Result<Vec<String>, ParseError> {
    if value == NO_LABELS {
        return Ok(Vec::new());
    }
    let inner = value
        .strip_prefix('`')
        .and_then(|rest| rest.strip_suffix('`'))
        .ok_or_else(|| {
            cursor.malformed_previous(format!("suggested labels '{value}' are not code spans"))
        })?;
    Ok(inner.split("`, `").map(str::to_string).collect())
}

fn parse_story(cursor: &mut LineCursor<'_>) -> Result<RefactoredStory, ParseError> {
    cursor.expect_exact(STORY_HEADING)?;
    cursor.expect_blank()?;
    let title = cursor.expect_prefixed(STORY_TITLE_PREFIX)?.to_string();
    cursor.expect_blank()?;
    let description = cursor.expect_prefixed(STORY_DESCRIPTION_PREFIX)?.to_string();
    cursor.expect_blank()?;
    cursor.expect_exact(STORY_CRITERIA_HEADING)?;
    let mut acceptance_criteria = Vec::new();
    while let Some(criterion) = cursor.peek().and_then(|line| line.strip_prefix("- ")) {
        acceptance_criteria.push(criterion.to_string());
        cursor.index += 1;
    }
    cursor.expect_blank()?;
    Ok(RefactoredStory {
        title,
        description,
        acceptance_criteria,
    })
}

/// Recover the evaluation record from a comment rendered by
/// [`crate::evaluation_render::render_evaluation_comment`].
pub fn parse_evaluation_comment(
    text: &str,
    format: &EvaluationFormat,
) -> Result<EvaluationRecord, ParseError> {
    let trimmed = text.trim_start();
    if format.record_marker.is_empty() || !trimmed.starts_with(format.record_marker.as_str()) {
        return Err(ParseError::NotAnEvaluationComment);
    }

    let skipped_lines = text[..text.len() - trimmed.len()].matches('\n').count();
    let mut cursor = LineCursor::new(trimmed, skipped_lines);
    cursor.expect_exact(&format.record_marker)?;
    cursor.expect_exact(HEADING)?;
    cursor.expect_blank()?;
    let summary = cursor.expect_prefixed(SUMMARY_PREFIX)?.to_string();
    cursor.expect_blank()?;

    cursor.expect_exact(COMPLETENESS_HEADING)?;
    let completeness = Completeness {
        title_ok: cursor.expect_checklist(TITLE_ITEM)?,
        description_ok: cursor.expect_checklist(DESCRIPTION_ITEM)?,
        acceptance_criteria_ok: cursor.expect_checklist(ACCEPTANCE_CRITERIA_ITEM)?,
    };
    cursor.expect_blank()?;

    let criteria_line = cursor.expect_prefixed(CRITERIA_EVALUATION_LABEL)?;
    let acceptance_criteria_evaluation = if criteria_line.is_empty() {
        String::new()
    } else {
        match criteria_line.strip_prefix(' ') {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => {
                return Err(cursor.malformed_previous(
                    "acceptance criteria evaluation is not separated by a space",
                ));
            }
        }
    };
    cursor.expect_blank()?;

    let importance_value = cursor.expect_prefixed(IMPORTANCE_PREFIX)?;
    let importance = parse_importance(&cursor, importance_value)?;
    cursor.expect_blank()?;

    cursor.expect_exact(READINESS_HEADING)?;
    let ready_to_work = cursor.expect_checklist(READY_ITEM)?;
    let base_story_not_clear = cursor.expect_checklist(UNCLEAR_ITEM)?;
    cursor.expect_blank()?;

    let note_line = format!("{NOTE_PREFIX}{UNCLEAR_STORY_NOTE}");
    let mut refactored_story = None;
    let mut has_note = false;
    if cursor.peek() == Some(STORY_HEADING) {
        refactored_story = Some(parse_story(&mut cursor)?);
    } else if cursor.peek() == Some(note_line.as_str()) {
        has_note = true;
        cursor.index += 1;
        cursor.expect_blank()?;
    }
    if refactored_story.is_none() && has_note != base_story_not_clear {
        return Err(cursor.malformed(if base_story_not_clear {
            "unclear base story is missing its explanatory note"
        } else {
            "explanatory note present for a clear base story"
        }));
    }

    let labels_value = cursor.expect_prefixed(LABELS_PREFIX)?;
    let suggested_labels = parse_labels(&cursor, labels_value)?;
    cursor.expect_blank()?;

    cursor.expect_exact(FOOTER_RULE)?;
    for command in footer_commands(refactored_story.is_some()) {
        cursor.expect_exact(&reply_line(command))?;
    }
    cursor.expect_end()?;

    EvaluationRecord::try_new(EvaluationFields {
        summary,
        completeness,
        acceptance_criteria_evaluation,
        importance,
        ready_to_work,
        base_story_not_clear,
        refactored_story,
        suggested_labels,
    })
    .map_err(|error| cursor.malformed(error.to_string()))
}
