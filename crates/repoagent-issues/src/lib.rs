//! Issue evaluation core for the repoagent GitHub bot.
//! This crate renders and parses evaluation comments, classifies slash
//! commands, and decides the single write each issue event triggers.

pub mod disable_marker;
pub mod dispatch_error_comment;
pub mod evaluation_format;
pub mod evaluation_parse;
pub mod evaluation_record;
pub mod evaluation_render;
pub mod issue_command_parser;
pub mod issue_command_usage;
pub mod issue_dispatch;
pub mod issue_event_collection;
pub mod issue_prompt;
pub mod issue_thread;
pub mod label_policy;
pub mod model_completion;
pub mod refactor_policy;

pub use evaluation_format::EvaluationFormat;
pub use evaluation_record::EvaluationRecord;
pub use issue_dispatch::{
    dispatch_issue_event, DispatchAction, DispatchContext, DispatchOutcome, IssueEvent,
};
