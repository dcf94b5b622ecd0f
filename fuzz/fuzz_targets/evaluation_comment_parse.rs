#![no_main]

use libfuzzer_sys::fuzz_target;
use repoagent_issues::evaluation_parse::{parse_evaluation_comment, ParseError};
use repoagent_issues::evaluation_render::render_evaluation_comment;
use repoagent_issues::EvaluationFormat;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let format = EvaluationFormat::default();

    match parse_evaluation_comment(&raw, &format) {
        Ok(record) => {
            let rendered = render_evaluation_comment(&record, &format);
            let reparsed = parse_evaluation_comment(&rendered, &format)
                .expect("rendered record must parse");
            assert_eq!(reparsed, record);
        }
        Err(ParseError::NotAnEvaluationComment) => {
            assert!(!raw.trim_start().starts_with(&format.record_marker));
        }
        Err(ParseError::MalformedRecord { line, .. }) => {
            assert!(line >= 1);
        }
    }
});
