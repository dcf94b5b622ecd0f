#![no_main]

use libfuzzer_sys::fuzz_target;
use repoagent_issues::issue_command_parser::{classify_issue_command, IssueCommand};

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    if let Some(command) = classify_issue_command(&raw) {
        assert!(raw.split_whitespace().any(|token| token == command.token()));
        assert_eq!(IssueCommand::from_token(command.token()), Some(command));
    }
});
