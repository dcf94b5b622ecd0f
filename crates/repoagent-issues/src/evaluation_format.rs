/// Hidden marker that opens every evaluation comment written by this engine.
pub const EVALUATION_RECORD_MARKER_V1: &str = "<!-- agent:evaluation:v1 -->";
/// Hidden marker that suppresses automatic evaluation when present in an issue body.
pub const DISABLE_MARKER: &str = "<!-- agent:disabled -->";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Marker tokens shared by the serializer, parser, disable gate, and dispatcher.
///
/// The record marker versions the comment layout: a layout change ships with a
/// new marker so older comments keep parsing under the marker they were written
/// with.
pub struct EvaluationFormat {
    pub record_marker: String,
    pub disable_marker: String,
}

impl Default for EvaluationFormat {
    fn default() -> Self {
        Self {
            record_marker: EVALUATION_RECORD_MARKER_V1.to_string(),
            disable_marker: DISABLE_MARKER.to_string(),
        }
    }
}

impl EvaluationFormat {
    pub fn new(record_marker: impl Into<String>, disable_marker: impl Into<String>) -> Self {
        Self {
            record_marker: record_marker.into(),
            disable_marker: disable_marker.into(),
        }
    }
}
