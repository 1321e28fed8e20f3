use regex::Regex;

use crate::models::SubSpeech;
use crate::text::{collapse_whitespace, strip_speaker_colon};

/// Finds embedded `<role> <name>: <text>` declarations in a fragment's text
#[derive(Debug, Clone)]
pub struct RollCallDetector {
    markers: Option<Markers>,
}

#[derive(Debug, Clone)]
struct Markers {
    /// `<role> <name>:`
    declaration: Regex,
    /// `<role> ` alone, used to cut a declaration back to its last role word
    role: Regex,
}

impl RollCallDetector {
    /// Build a detector recognizing any of the given role words
    pub fn new(roles: &[String]) -> Result<Self, regex::Error> {
        if roles.is_empty() {
            return Ok(Self { markers: None });
        }

        let alternatives = roles
            .iter()
            .map(|role| regex::escape(role))
            .collect::<Vec<_>>()
            .join("|");
        let declaration = Regex::new(&format!(r"\b(?:{alternatives})\s+[^:]+:"))?;
        let role = Regex::new(&format!(r"\b(?:{alternatives})\s+"))?;

        Ok(Self {
            markers: Some(Markers { declaration, role }),
        })
    }

    /// Split text into sub-speeches, each running until the next marker
    ///
    /// Text before the first marker is not part of any sub-speech. Markers
    /// followed by no text are dropped. A name never spans a role word: in
    /// `Poseł Annie. Poseł Nowak:` the marker starts at the second `Poseł`.
    pub fn split(&self, text: &str) -> Vec<SubSpeech> {
        let Some(markers) = &self.markers else {
            return Vec::new();
        };

        let spans: Vec<(usize, usize)> = markers
            .declaration
            .find_iter(text)
            .map(|m| {
                let start = markers
                    .role
                    .find_iter(m.as_str())
                    .last()
                    .map_or(m.start(), |role| m.start() + role.start());
                (start, m.end())
            })
            .collect();

        spans
            .iter()
            .enumerate()
            .filter_map(|(i, &(start, end))| {
                let body_end = spans.get(i + 1).map_or(text.len(), |next| next.0);
                let body = collapse_whitespace(&text[end..body_end]);
                if body.is_empty() {
                    return None;
                }
                let speaker = collapse_whitespace(strip_speaker_colon(&text[start..end]));
                Some(SubSpeech::new(speaker, body))
            })
            .collect()
    }
}

/// Mean length of the sub-speech texts in characters
pub fn mean_text_len(subs: &[SubSpeech]) -> f64 {
    if subs.is_empty() {
        return 0.0;
    }
    let total: usize = subs.iter().map(|s| s.text.chars().count()).sum();
    total as f64 / subs.len() as f64
}
