use crate::issue_command_parser::IssueCommand;

const USAGE_HEADING: &str = "### 🤖 Available Commands";

/// Markdown table describing every supported comment command.
pub fn command_usage_table() -> String {
    let mut lines = vec![
        "| Command | Description |".to_string(),
        "|---------|-------------|".to_string(),
    ];
    for command in IssueCommand::ALL {
        lines.push(format!(
            "| `{}` | {} |",
            command.token(),
            command.description()
        ));
    }
    lines.join("\n")
}

/// Comment body posted in reply to `/usage`.
pub fn render_usage_comment() -> String {
    format!("{USAGE_HEADING}\n\n{}", command_usage_table())
}
