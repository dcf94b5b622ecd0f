/// Sentence rendered in place of a refactored story when the base story is unclear.
pub const UNCLEAR_STORY_NOTE: &str = "❌ Refactored Story could not be provided because the original story is unclear or lacks meaningful value. Please rewrite the title and description to clearly explain the story's purpose and value.";

/// Return true when an evaluation must carry a refactored story.
///
/// A story is only rewritten when it still needs work and the original is
/// clear enough to rewrite.
pub fn include_refactor(ready_to_work: bool, base_story_not_clear: bool) -> bool {
    !ready_to_work && !base_story_not_clear
}

/// Note rendered in place of the refactored story section, if any.
pub fn unclear_story_note(base_story_not_clear: bool) -> Option<&'static str> {
    base_story_not_clear.then_some(UNCLEAR_STORY_NOTE)
}
