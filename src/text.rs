//! Small text normalization helpers shared by the parsers.

/// Collapse every whitespace run to a single space and trim both ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip trailing colons (and the whitespace around them) from a speaker label
pub fn strip_speaker_colon(label: &str) -> &str {
    label.trim().trim_end_matches(':').trim()
}
