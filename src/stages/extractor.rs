use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::error::Result;
use crate::heuristics::{
    RollCallConfig, RollCallDetector, RollCallPolicy, ThresholdPolicy, mean_text_len,
};
use crate::io::{element_text, read_document};
use crate::models::{FragmentRef, SubSpeech};
use crate::text::{collapse_whitespace, strip_speaker_colon};

static SPEAKER_HEADER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2.mowca").expect("static selector"));

/// Resolves a fragment reference into (sub-speaker, text) pairs
pub trait SpeechExtractor {
    /// Never fails: a missing or malformed fragment yields no speeches
    fn extract(&self, fragment: &FragmentRef) -> Vec<SubSpeech>;
}

/// Reads `{base}_{index}.html` fragments from a session directory
pub struct HtmlSpeechExtractor<P = ThresholdPolicy> {
    dir: PathBuf,
    detector: RollCallDetector,
    policy: P,
}

impl HtmlSpeechExtractor<ThresholdPolicy> {
    pub fn new(dir: &Path, config: &RollCallConfig) -> Result<Self> {
        Ok(Self::with_policy(
            dir,
            RollCallDetector::new(&config.roles)?,
            ThresholdPolicy::from(config),
        ))
    }
}

impl<P: RollCallPolicy> HtmlSpeechExtractor<P> {
    pub fn with_policy(dir: &Path, detector: RollCallDetector, policy: P) -> Self {
        Self {
            dir: dir.to_path_buf(),
            detector,
            policy,
        }
    }

    /// Extract speeches from an already parsed fragment
    pub fn extract_document(&self, document: &Html) -> Vec<SubSpeech> {
        let Some(header) = document.select(&SPEAKER_HEADER).next() else {
            return Vec::new();
        };

        let speaker = strip_speaker_colon(&element_text(header, "")).to_string();
        let full = fragment_body(header);

        let subs = self.detector.split(&full);
        if self.policy.is_roll_call(subs.len(), mean_text_len(&subs)) {
            debug!("Splitting roll-call fragment of {} into {} declarations", speaker, subs.len());
            return subs;
        }

        vec![SubSpeech::new(speaker, full)]
    }
}

impl<P: RollCallPolicy> SpeechExtractor for HtmlSpeechExtractor<P> {
    fn extract(&self, fragment: &FragmentRef) -> Vec<SubSpeech> {
        let path = fragment.path_in(&self.dir);
        match read_document(&path) {
            Ok(Some(document)) => self.extract_document(&document),
            Ok(None) => {
                debug!("Fragment {:?} does not exist", path);
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to read fragment {:?}: {}", path, e);
                Vec::new()
            }
        }
    }
}

/// Paragraphs following the speaker header, up to the next `h2`
fn fragment_body(header: ElementRef<'_>) -> String {
    let mut segments = Vec::new();

    for sibling in header.next_siblings().filter_map(ElementRef::wrap) {
        match sibling.value().name() {
            "h2" => break,
            "p" => {
                let text = element_text(sibling, " ");
                if !text.is_empty() {
                    segments.push(text);
                }
            }
            _ => {}
        }
    }

    collapse_whitespace(&segments.join(" "))
}
