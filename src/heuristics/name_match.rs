/// Strategy deciding whether a metadata name refers to a speaker label
pub trait NameMatcher {
    fn matches(&self, row_name: &str, candidate: &str) -> bool;
}

/// Accepts a row when its name occurs anywhere inside the speaker label.
///
/// Loose on purpose: "Poseł Jan Kowalski" matches "Jan Kowalski", but a short
/// name can also hit inside an unrelated longer label.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl NameMatcher for SubstringMatcher {
    fn matches(&self, row_name: &str, candidate: &str) -> bool {
        candidate.contains(row_name)
    }
}
