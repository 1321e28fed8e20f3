use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::io::{element_text, has_class, paragraph_text};
use crate::models::{BlockKind, FragmentRef};
use crate::text::{collapse_whitespace, strip_speaker_colon};

use super::extractor::SpeechExtractor;
use super::sequencer::{BlockSink, resolve_speaker};

/// Class marking a backbone paragraph that links to a speaker fragment
pub const REFERENCE_CLASS: &str = "mowca-link";

static PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("static selector"));
static NAMED_ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[name]").expect("static selector"));

/// Counters describing one backbone pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub context_blocks: usize,
    pub speech_blocks: usize,
    /// Reference paragraphs without a usable fragment index
    pub skipped_references: usize,
    /// References whose fragment produced no speech
    pub empty_references: usize,
}

/// Procedural paragraphs collected between two speeches
#[derive(Debug, Default)]
struct ContextBuffer {
    paragraphs: Vec<String>,
}

impl ContextBuffer {
    fn push(&mut self, text: String) {
        if !text.is_empty() {
            self.paragraphs.push(text);
        }
    }

    /// Emit the merged run as one context block; no-op when empty
    fn flush_into(&mut self, sink: &mut dyn BlockSink) -> bool {
        if self.paragraphs.is_empty() {
            return false;
        }
        let merged = collapse_whitespace(&self.paragraphs.join(" "));
        self.paragraphs.clear();
        sink.emit(BlockKind::Context, None, merged, None);
        true
    }
}

/// Walk the backbone in document order, emitting context and speech blocks
///
/// Every `p` element is visited once. Reference paragraphs flush the pending
/// context and are replaced by the speeches of their fragment; all other
/// paragraphs extend the context run.
pub fn walk_backbone(
    backbone: &Html,
    session_base: &str,
    extractor: &dyn SpeechExtractor,
    sink: &mut dyn BlockSink,
) -> WalkSummary {
    let mut buffer = ContextBuffer::default();
    let mut summary = WalkSummary::default();

    for paragraph in backbone.select(&PARAGRAPH) {
        if !has_class(paragraph, REFERENCE_CLASS) {
            buffer.push(paragraph_text(paragraph));
            continue;
        }

        if buffer.flush_into(sink) {
            summary.context_blocks += 1;
        }

        let Some(fragment) = fragment_ref(paragraph, session_base) else {
            debug!("Skipping speaker reference without fragment index");
            summary.skipped_references += 1;
            continue;
        };

        let speeches = extractor.extract(&fragment);
        if speeches.is_empty() {
            debug!("Fragment {} produced no speech", fragment.file_name());
            summary.empty_references += 1;
        }

        for speech in speeches {
            let speaker = resolve_speaker(speech.speaker.as_deref(), &fragment.display_name);
            sink.emit(BlockKind::Speech, speaker, speech.text, Some(fragment.index));
            summary.speech_blocks += 1;
        }
    }

    if buffer.flush_into(sink) {
        summary.context_blocks += 1;
    }

    summary
}

/// Fragment pointed to by a reference paragraph's named anchor
fn fragment_ref(paragraph: ElementRef<'_>, session_base: &str) -> Option<FragmentRef> {
    let anchor = paragraph.select(&NAMED_ANCHOR).next()?;
    let index = anchor.value().attr("name")?.trim().parse::<u32>().ok()?;

    Some(FragmentRef {
        session_base: session_base.to_string(),
        index,
        display_name: strip_speaker_colon(&element_text(anchor, "")).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::models::SubSpeech;

    /// Extractor serving canned speeches by fragment index
    #[derive(Default)]
    struct FakeExtractor {
        fragments: HashMap<u32, Vec<SubSpeech>>,
    }

    impl SpeechExtractor for FakeExtractor {
        fn extract(&self, fragment: &FragmentRef) -> Vec<SubSpeech> {
            self.fragments.get(&fragment.index).cloned().unwrap_or_default()
        }
    }

    /// Sink recording what the walker emits
    #[derive(Default)]
    struct RecordingSink {
        events: Vec<(BlockKind, Option<String>, String)>,
        fragments: Vec<Option<u32>>,
    }

    impl BlockSink for RecordingSink {
        fn emit(
            &mut self,
            kind: BlockKind,
            speaker: Option<&str>,
            text: String,
            fragment: Option<u32>,
        ) -> String {
            self.events.push((kind, speaker.map(str::to_string), text));
            self.fragments.push(fragment);
            format!("T_{}", self.events.len())
        }
    }

    fn reference(index: &str, name: &str) -> String {
        format!("<p class=\"mowca-link\"><a href=\"#\" name=\"{index}\">{name}</a></p>")
    }

    fn walk(html: &str, extractor: &FakeExtractor) -> (RecordingSink, WalkSummary) {
        let doc = Html::parse_document(html);
        let mut sink = RecordingSink::default();
        let summary = walk_backbone(&doc, "S", extractor, &mut sink);
        (sink, summary)
    }

    #[test]
    fn test_context_runs_merge() {
        let html = "<h1>Posiedzenie</h1><p>Otwieram\n   posiedzenie.</p><p> </p><p>Proszę   o ciszę.</p>";
        let (sink, summary) = walk(html, &FakeExtractor::default());

        assert_eq!(
            sink.events,
            vec![(BlockKind::Context, None, "Otwieram posiedzenie. Proszę o ciszę.".to_string())]
        );
        assert_eq!(summary.context_blocks, 1);
        assert_eq!(summary.speech_blocks, 0);
    }

    #[test]
    fn test_order_and_empty_flush() {
        let mut extractor = FakeExtractor::default();
        extractor.fragments.insert(1, vec![SubSpeech::new("Jan Kowalski", "Pierwsza.")]);
        extractor.fragments.insert(2, vec![SubSpeech::new("Anna Nowak", "Druga.")]);

        let html = format!(
            "{}{}<p>Oklaski.</p>{}",
            reference("1", "Jan Kowalski:"),
            reference("2", "Anna Nowak:"),
            reference("9", "Nieobecny:"),
        );
        let (sink, summary) = walk(&html, &extractor);

        let kinds: Vec<_> = sink.events.iter().map(|e| (e.0, e.2.as_str())).collect();
        assert_eq!(
            kinds,
            vec![
                (BlockKind::Speech, "Pierwsza."),
                (BlockKind::Speech, "Druga."),
                (BlockKind::Context, "Oklaski."),
            ]
        );
        assert_eq!(summary.empty_references, 1);
        assert_eq!(sink.fragments, vec![Some(1), Some(2), None]);
    }

    #[test]
    fn test_reference_without_index_skipped_but_flushes() {
        let html = format!(
            "<p>Przed.</p><p class=\"mowca-link\"><a href=\"#\">Bez kotwicy</a></p>{}<p>Po.</p>",
            reference("abc", "Zły indeks"),
        );
        let (sink, summary) = walk(&html, &FakeExtractor::default());

        let texts: Vec<_> = sink.events.iter().map(|e| e.2.as_str()).collect();
        assert_eq!(texts, vec!["Przed.", "Po."]);
        assert_eq!(summary.skipped_references, 2);
    }

    #[test]
    fn test_roll_call_speeches_keep_sub_speakers() {
        let mut extractor = FakeExtractor::default();
        extractor.fragments.insert(
            4,
            vec![
                SubSpeech::new("Poseł Jan Kowalski", "Ślubuję."),
                SubSpeech::new("", "Ślubuję."),
            ],
        );

        let (sink, _) = walk(&reference("4", "Marszałek:"), &extractor);

        assert_eq!(sink.events[0].1.as_deref(), Some("Poseł Jan Kowalski"));
        // A speech without its own speaker falls back to the link text
        assert_eq!(sink.events[1].1.as_deref(), Some("Marszałek"));
    }

    #[test]
    fn test_fragment_ref_from_anchor() {
        let doc = Html::parse_document(&reference(" 12 ", "Jan Kowalski:"));
        let paragraph = doc.select(&PARAGRAPH).next().unwrap();

        let fragment = fragment_ref(paragraph, "S").unwrap();
        assert_eq!(fragment.index, 12);
        assert_eq!(fragment.display_name, "Jan Kowalski");
        assert_eq!(fragment.file_name(), "S_12.html");
    }
}
