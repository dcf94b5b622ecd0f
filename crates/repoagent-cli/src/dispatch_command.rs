use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use repoagent_issues::issue_dispatch::{
    dispatch_issue_event, DispatchContext, DispatchOutcome, EvaluationProvider,
};
use repoagent_issues::issue_event_collection::{
    build_issue_thread, resolve_issue_event, IssueSnapshot,
};
use repoagent_issues::issue_thread::IssueThread;
use repoagent_issues::model_completion::ModelEvaluation;

use crate::cli_args::DispatchArgs;

pub(crate) fn load_issue_snapshot(path: &Path) -> Result<IssueSnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read issue snapshot {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse issue snapshot {}", path.display()))
}

/// Reads the model completion from disk only when the dispatcher asks for one.
pub(crate) struct CompletionFileProvider {
    path: Option<PathBuf>,
}

impl CompletionFileProvider {
    pub(crate) fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl EvaluationProvider for CompletionFileProvider {
    fn evaluate(
        &self,
        _thread: &IssueThread,
        _repository_labels: &[String],
    ) -> Result<ModelEvaluation, String> {
        let Some(path) = self.path.as_deref() else {
            return Err("no completion file was provided for this review".to_string());
        };
        tracing::debug!(path = %path.display(), "reading model completion");
        let raw = fs::read_to_string(path).map_err(|error| {
            format!("failed to read completion file {}: {error}", path.display())
        })?;
        ModelEvaluation::from_completion_text(&raw).map_err(|error| error.to_string())
    }
}

pub(crate) fn execute_dispatch_command(args: &DispatchArgs) -> Result<DispatchOutcome> {
    let snapshot = load_issue_snapshot(&args.thread_file)?;
    if args.check_all {
        tracing::info!("check-all is reserved and has no effect on a single dispatch");
    }
    let event = resolve_issue_event(
        &args.event_name,
        &args.event_action,
        args.comment_id,
        &snapshot,
        &args.bot_login,
    )
    .context("failed to resolve issue event")?;
    let thread = build_issue_thread(&snapshot, &args.bot_login);
    let format = args.format.evaluation_format();
    let provider = CompletionFileProvider::new(args.completion_file.clone());
    let context = DispatchContext {
        thread: &thread,
        repository_labels: &snapshot.repository_labels,
        format: &format,
    };
    Ok(dispatch_issue_event(&event, context, &provider))
}
