use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
/// Enumerates supported `IssueCommand` values.
pub enum IssueCommand {
    Review,
    Apply,
    Usage,
    Disable,
}

impl IssueCommand {
    pub const ALL: [IssueCommand; 4] = [Self::Apply, Self::Review, Self::Usage, Self::Disable];

    pub fn token(self) -> &'static str {
        match self {
            Self::Review => "/review",
            Self::Apply => "/apply",
            Self::Usage => "/usage",
            Self::Disable => "/disable",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Apply => "Applies the AI-enhanced title, body, and labels to the issue.",
            Self::Review => "Re-runs the AI review and posts a fresh evaluation as a comment.",
            Self::Usage => "Displays this list of available commands.",
            Self::Disable => {
                "Disables automatic reviews for this issue. `/review` keeps working."
            }
        }
    }

    /// Match one whitespace-delimited token exactly. Case-sensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|command| command.token() == token)
    }
}

/// Classify a comment body into the command it triggers.
///
/// Only the first recognized token (by position) counts; later tokens are
/// ignored.
pub fn classify_issue_command(body: &str) -> Option<IssueCommand> {
    body.split_whitespace().find_map(IssueCommand::from_token)
}

#[cfg(test)]
mod tests {
    use super::{classify_issue_command, IssueCommand};

    #[test]
    fn unit_classify_issue_command_recognizes_each_token() {
        for command in IssueCommand::ALL {
            assert_eq!(classify_issue_command(command.token()), Some(command));
        }
    }

    #[test]
    fn unit_classify_issue_command_ignores_surrounding_whitespace() {
        assert_eq!(
            classify_issue_command("  \n\t/review \n"),
            Some(IssueCommand::Review)
        );
    }

    #[test]
    fn functional_classify_issue_command_honors_first_token_only() {
        assert_eq!(
            classify_issue_command("/apply please /review this"),
            Some(IssueCommand::Apply)
        );
        assert_eq!(
            classify_issue_command("could you /review and then /apply"),
            Some(IssueCommand::Review)
        );
        assert_eq!(
            classify_issue_command("/usage\n/disable"),
            Some(IssueCommand::Usage)
        );
    }

    #[test]
    fn integration_classify_issue_command_finds_token_after_prose() {
        assert_eq!(
            classify_issue_command("Thanks!\n\n/disable"),
            Some(IssueCommand::Disable)
        );
    }

    #[test]
    fn regression_classify_issue_command_is_case_sensitive_and_exact() {
        assert_eq!(classify_issue_command("/Review"), None);
        assert_eq!(classify_issue_command("/APPLY"), None);
        assert_eq!(classify_issue_command("/reviewed"), None);
        assert_eq!(classify_issue_command("Reply `/apply` to apply"), None);
        assert_eq!(classify_issue_command("review this"), None);
        assert_eq!(classify_issue_command(""), None);
    }
}
