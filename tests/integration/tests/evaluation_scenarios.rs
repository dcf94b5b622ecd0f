use std::cell::Cell;

use repoagent_issues::disable_marker::with_disable_marker_injected;
use repoagent_issues::evaluation_parse::parse_evaluation_comment;
use repoagent_issues::evaluation_record::Importance;
use repoagent_issues::issue_command_parser::IssueCommand;
use repoagent_issues::issue_dispatch::{
    dispatch_issue_event, DispatchAction, DispatchContext, DispatchErrorKind, IssueUpdate,
    NoOpReason,
};
use repoagent_issues::issue_thread::{AuthorKind, IssueThread, ThreadComment};
use repoagent_issues::model_completion::ModelEvaluation;
use repoagent_issues::refactor_policy::UNCLEAR_STORY_NOTE;
use repoagent_issues::{EvaluationFormat, IssueEvent};

fn repository_labels() -> Vec<String> {
    ["bug", "auth", "docs"].map(String::from).to_vec()
}

fn model_evaluation(base_story_not_clear: bool) -> ModelEvaluation {
    let completion = serde_json::json!({
        "summary": "Add login",
        "completeness": {"title": true, "description": false, "acceptance_criteria": false},
        "importance": "high",
        "labels": ["bug", "auth"],
        "ready_to_work": false,
        "base_story_not_clear": base_story_not_clear,
        "refactored_story": {
            "title": "Add email login",
            "description": "As a user I want to sign in with email.",
            "acceptance_criteria": ["Login form accepts email and password"]
        }
    });
    ModelEvaluation::from_completion_text(&completion.to_string()).expect("completion decodes")
}

fn issue_thread(body: &str, comments: Vec<ThreadComment>) -> IssueThread {
    IssueThread {
        title: "login".to_string(),
        body: body.to_string(),
        comments,
    }
}

fn comment(body: &str) -> IssueEvent {
    IssueEvent::CommentCreated {
        author: AuthorKind::Human,
        body: body.to_string(),
    }
}

fn posted_body(action: &DispatchAction) -> &str {
    match action {
        DispatchAction::PostComment { body } => body,
        other => panic!("expected a posted comment, got {other:?}"),
    }
}

#[test]
fn integration_issue_opened_posts_record_that_parses_back_exactly() {
    let format = EvaluationFormat::default();
    let labels = repository_labels();
    let thread = issue_thread("users cannot log in", Vec::new());
    let provider = |_: &IssueThread, _: &[String]| -> Result<ModelEvaluation, String> {
        Ok(model_evaluation(false))
    };
    let context = DispatchContext {
        thread: &thread,
        repository_labels: &labels,
        format: &format,
    };

    let outcome = dispatch_issue_event(&IssueEvent::IssueOpened, context, &provider);
    let body = posted_body(&outcome.action);
    assert!(body.contains("### Refactored Story"));

    let expected = model_evaluation(false)
        .into_record(&labels)
        .expect("record")
        .record;
    let parsed = parse_evaluation_comment(body, &format).expect("parse");
    assert_eq!(parsed, expected);
    assert_eq!(parsed.summary(), "Add login");
    assert_eq!(parsed.importance(), Importance::High);
    assert_eq!(parsed.suggested_labels(), ["bug", "auth"]);
}

#[test]
fn integration_unclear_base_story_renders_note_without_story() {
    let format = EvaluationFormat::default();
    let labels = repository_labels();
    let thread = issue_thread("TBD", Vec::new());
    let provider = |_: &IssueThread, _: &[String]| -> Result<ModelEvaluation, String> {
        Ok(model_evaluation(true))
    };
    let context = DispatchContext {
        thread: &thread,
        repository_labels: &labels,
        format: &format,
    };

    let outcome = dispatch_issue_event(&IssueEvent::IssueOpened, context, &provider);
    let body = posted_body(&outcome.action);
    assert!(body.contains(UNCLEAR_STORY_NOTE));
    assert!(!body.contains("### Refactored Story"));
    let parsed = parse_evaluation_comment(body, &format).expect("parse");
    assert!(parsed.refactored_story().is_none());
    assert!(parsed.base_story_not_clear());
}

#[test]
fn integration_disabled_issue_edit_is_a_noop_without_model_call() {
    let format = EvaluationFormat::default();
    let labels = repository_labels();
    let body = with_disable_marker_injected("users cannot log in", &format);
    let thread = issue_thread(&body, Vec::new());
    let calls = Cell::new(0);
    let provider = |_: &IssueThread, _: &[String]| -> Result<ModelEvaluation, String> {
        calls.set(calls.get() + 1);
        Ok(model_evaluation(false))
    };
    let context = DispatchContext {
        thread: &thread,
        repository_labels: &labels,
        format: &format,
    };

    let outcome = dispatch_issue_event(&IssueEvent::IssueEdited, context, &provider);
    assert_eq!(
        outcome.action,
        DispatchAction::NoOp {
            reason: NoOpReason::Disabled
        }
    );
    assert_eq!(calls.get(), 0);
}

#[test]
fn integration_apply_without_prior_evaluation_reports_error() {
    let format = EvaluationFormat::default();
    let labels = repository_labels();
    let thread = issue_thread("body", vec![ThreadComment::human("/apply")]);
    let provider = |_: &IssueThread, _: &[String]| -> Result<ModelEvaluation, String> {
        Err("model must not be called".to_string())
    };
    let context = DispatchContext {
        thread: &thread,
        repository_labels: &labels,
        format: &format,
    };

    let outcome = dispatch_issue_event(&comment("/apply"), context, &provider);
    assert_eq!(outcome.command, Some(IssueCommand::Apply));
    assert!(matches!(
        outcome.action,
        DispatchAction::Error {
            kind: DispatchErrorKind::NoApplicableEvaluation,
            ..
        }
    ));
}

#[test]
fn integration_first_command_token_wins() {
    let format = EvaluationFormat::default();
    let labels = repository_labels();
    let thread = issue_thread("body", Vec::new());
    let calls = Cell::new(0);
    let provider = |_: &IssueThread, _: &[String]| -> Result<ModelEvaluation, String> {
        calls.set(calls.get() + 1);
        Ok(model_evaluation(false))
    };
    let context = DispatchContext {
        thread: &thread,
        repository_labels: &labels,
        format: &format,
    };

    let outcome = dispatch_issue_event(&comment("/apply please /review this"), context, &provider);
    assert_eq!(outcome.command, Some(IssueCommand::Apply));
    assert_eq!(calls.get(), 0);
}

#[test]
fn integration_review_then_apply_updates_issue_from_posted_record() {
    let format = EvaluationFormat::new("<!-- custom:eval -->", "<!-- custom:off -->");
    let labels = repository_labels();
    let provider = |_: &IssueThread, _: &[String]| -> Result<ModelEvaluation, String> {
        Ok(model_evaluation(false))
    };

    let opened = issue_thread("users cannot log in", Vec::new());
    let review = dispatch_issue_event(
        &IssueEvent::IssueOpened,
        DispatchContext {
            thread: &opened,
            repository_labels: &labels,
            format: &format,
        },
        &provider,
    );
    let evaluation_comment = posted_body(&review.action).to_string();
    assert!(evaluation_comment.starts_with("<!-- custom:eval -->"));

    let thread = issue_thread(
        "users cannot log in",
        vec![
            ThreadComment::bot(evaluation_comment),
            ThreadComment::human("/apply"),
        ],
    );
    let outcome = dispatch_issue_event(
        &comment("/apply"),
        DispatchContext {
            thread: &thread,
            repository_labels: &labels,
            format: &format,
        },
        &provider,
    );
    let DispatchAction::UpdateIssue(IssueUpdate {
        title,
        body,
        labels: applied_labels,
        confirmation_comment,
    }) = outcome.action
    else {
        panic!("expected an issue update");
    };
    assert_eq!(title.as_deref(), Some("Add email login"));
    let body = body.expect("body");
    assert!(body.starts_with("**Description**: As a user I want to sign in with email."));
    assert!(body.contains("- Login form accepts email and password"));
    assert_eq!(
        applied_labels,
        Some(vec!["bug".to_string(), "auth".to_string()])
    );
    assert!(confirmation_comment.is_some());
}

#[test]
fn integration_disable_command_injects_marker_once() {
    let format = EvaluationFormat::default();
    let labels = repository_labels();
    let provider = |_: &IssueThread, _: &[String]| -> Result<ModelEvaluation, String> {
        Err("unused".to_string())
    };

    let thread = issue_thread("users cannot log in", Vec::new());
    let outcome = dispatch_issue_event(
        &comment("/disable"),
        DispatchContext {
            thread: &thread,
            repository_labels: &labels,
            format: &format,
        },
        &provider,
    );
    let DispatchAction::UpdateIssue(update) = outcome.action else {
        panic!("expected an issue update");
    };
    let disabled_body = update.body.expect("body");
    assert!(disabled_body.ends_with(&format.disable_marker));

    let disabled = issue_thread(&disabled_body, Vec::new());
    let again = dispatch_issue_event(
        &comment("/disable"),
        DispatchContext {
            thread: &disabled,
            repository_labels: &labels,
            format: &format,
        },
        &provider,
    );
    assert_eq!(
        again.action,
        DispatchAction::NoOp {
            reason: NoOpReason::AlreadyDisabled
        }
    );
}
