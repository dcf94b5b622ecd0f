use anyhow::Result;
use repoagent_issues::issue_prompt::{render_evaluation_prompt, PromptMessage};

use crate::cli_args::PromptArgs;
use crate::dispatch_command::load_issue_snapshot;

pub(crate) fn execute_prompt_command(args: &PromptArgs) -> Result<Vec<PromptMessage>> {
    let snapshot = load_issue_snapshot(&args.thread_file)?;
    let body = snapshot.issue.body.as_deref().unwrap_or_default();
    Ok(render_evaluation_prompt(
        &snapshot.issue.title,
        body,
        &snapshot.repository_labels,
    ))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::execute_prompt_command;
    use crate::cli_args::PromptArgs;
    use repoagent_issues::issue_prompt::PromptRole;
    use tempfile::tempdir;

    #[test]
    fn functional_execute_prompt_command_renders_snapshot_issue() {
        let temp = tempdir().expect("tempdir");
        let thread_file = temp.path().join("thread.json");
        fs::write(
            &thread_file,
            r#"{"issue": {"number": 1, "title": "Dark mode", "body": null},
                "repository_labels": ["ui"]}"#,
        )
        .expect("write snapshot");

        let messages = execute_prompt_command(&PromptArgs { thread_file }).expect("prompt");
        assert_eq!(messages[0].role, PromptRole::System);
        assert!(messages[1].content.contains("Title: Dark mode"));
        assert!(messages[1].content.contains("'ui'"));
    }

    #[test]
    fn regression_execute_prompt_command_rejects_invalid_snapshot_json() {
        let temp = tempdir().expect("tempdir");
        let thread_file = temp.path().join("thread.json");
        fs::write(&thread_file, "{not json").expect("write snapshot");
        let error = execute_prompt_command(&PromptArgs { thread_file }).expect_err("invalid");
        assert!(error.to_string().contains("failed to parse issue snapshot"));
    }
}
