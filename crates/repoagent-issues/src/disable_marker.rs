use crate::evaluation_format::EvaluationFormat;

const MARKER_SEPARATOR: &str = "\n\n";

/// Return true when automatic evaluation is disabled for an issue body.
///
/// The marker may appear anywhere in the body. Nothing is cached: callers
/// recompute this from the current body on every event.
pub fn is_agent_disabled(issue_body: &str, format: &EvaluationFormat) -> bool {
    !format.disable_marker.is_empty() && issue_body.contains(format.disable_marker.as_str())
}

/// Append one disable marker to an issue body.
pub fn with_disable_marker_injected(issue_body: &str, format: &EvaluationFormat) -> String {
    if issue_body.trim().is_empty() {
        return format.disable_marker.clone();
    }
    format!("{issue_body}{MARKER_SEPARATOR}{}", format.disable_marker)
}

/// Remove the most recently injected disable marker from an issue body.
///
/// Only the last occurrence is removed, together with the separator that
/// [`with_disable_marker_injected`] places in front of it, so removal undoes
/// exactly one injection.
pub fn with_disable_marker_removed(issue_body: &str, format: &EvaluationFormat) -> String {
    let marker = format.disable_marker.as_str();
    if marker.is_empty() {
        return issue_body.to_string();
    }
    let Some(start) = issue_body.rfind(marker) else {
        return issue_body.to_string();
    };
    let before = &issue_body[..start];
    let after = &issue_body[start + marker.len()..];
    if after.is_empty() {
        let before = before.strip_suffix(MARKER_SEPARATOR).unwrap_or(before);
        return before.to_string();
    }
    format!("{before}{after}")
}

#[cfg(test)]
mod tests {
    use super::{is_agent_disabled, with_disable_marker_injected, with_disable_marker_removed};
    use crate::evaluation_format::EvaluationFormat;
    use proptest::prelude::*;

    #[test]
    fn unit_is_agent_disabled_detects_marker_anywhere() {
        let format = EvaluationFormat::default();
        assert!(!is_agent_disabled("plain body", &format));
        assert!(is_agent_disabled("<!-- agent:disabled -->", &format));
        assert!(is_agent_disabled(
            "intro\n<!-- agent:disabled -->\nmore text",
            &format
        ));
    }

    #[test]
    fn unit_is_agent_disabled_ignores_record_marker() {
        let format = EvaluationFormat::default();
        assert!(!is_agent_disabled(&format.record_marker, &format));
    }

    #[test]
    fn functional_with_disable_marker_injected_appends_after_blank_line() {
        let format = EvaluationFormat::default();
        assert_eq!(
            with_disable_marker_injected("Body text", &format),
            "Body text\n\n<!-- agent:disabled -->"
        );
        assert_eq!(
            with_disable_marker_injected("  ", &format),
            "<!-- agent:disabled -->"
        );
    }

    #[test]
    fn integration_with_disable_marker_removed_restores_original_body() {
        let format = EvaluationFormat::default();
        let injected = with_disable_marker_injected("Body text", &format);
        assert_eq!(
            with_disable_marker_removed(&injected, &format),
            "Body text"
        );
    }

    #[test]
    fn regression_with_disable_marker_removed_handles_markers_mid_body() {
        let format = EvaluationFormat::default();
        let body = "before <!-- agent:disabled --> after";
        assert_eq!(
            with_disable_marker_removed(body, &format),
            "before  after"
        );
        assert_eq!(with_disable_marker_removed("untouched", &format), "untouched");
    }

    #[test]
    fn regression_empty_disable_marker_never_disables() {
        let format = EvaluationFormat::new("<!-- record -->", "");
        assert!(!is_agent_disabled("anything", &format));
        assert_eq!(with_disable_marker_removed("anything", &format), "anything");
    }

    proptest! {
        #[test]
        fn property_injection_always_disables(body in any::<String>(), times in 1usize..4) {
            let format = EvaluationFormat::default();
            let mut current = body;
            for _ in 0..times {
                current = with_disable_marker_injected(&current, &format);
                prop_assert!(is_agent_disabled(&current, &format));
            }
        }

        #[test]
        fn property_remove_after_inject_preserves_disabled_state(body in any::<String>()) {
            let format = EvaluationFormat::default();
            let round_trip = with_disable_marker_removed(
                &with_disable_marker_injected(&body, &format),
                &format,
            );
            prop_assert_eq!(
                is_agent_disabled(&round_trip, &format),
                is_agent_disabled(&body, &format)
            );
        }
    }
}
