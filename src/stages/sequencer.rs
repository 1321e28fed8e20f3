use crate::heuristics::{NameMatcher, SubstringMatcher};
use crate::models::{BlockKind, MetadataTable, SpeechBlock};

/// Receives blocks from the backbone walker in document order
pub trait BlockSink {
    /// Record one block and return its identifier; `fragment` is the source
    /// fragment index of a speech
    fn emit(
        &mut self,
        kind: BlockKind,
        speaker: Option<&str>,
        text: String,
        fragment: Option<u32>,
    ) -> String;
}

/// Assigns the session-wide sequence and matches speakers against the metadata table
pub struct Sequencer<'a> {
    session_base: String,
    next_sequence: u64,
    table: &'a MetadataTable,
    matcher: &'a dyn NameMatcher,
    blocks: Vec<SpeechBlock>,
}

impl<'a> Sequencer<'a> {
    pub fn new(session_base: impl Into<String>, table: &'a MetadataTable) -> Self {
        Self::with_matcher(session_base, table, &SubstringMatcher)
    }

    pub fn with_matcher(
        session_base: impl Into<String>,
        table: &'a MetadataTable,
        matcher: &'a dyn NameMatcher,
    ) -> Self {
        Self {
            session_base: session_base.into(),
            next_sequence: 1,
            table,
            matcher,
            blocks: Vec::new(),
        }
    }

    /// Take the next sequence number and its composite identifier
    pub fn next_id(&mut self) -> (u64, String) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        (sequence, format!("{}_{}", self.session_base, sequence))
    }

    pub fn blocks(&self) -> &[SpeechBlock] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<SpeechBlock> {
        self.blocks
    }
}

impl BlockSink for Sequencer<'_> {
    fn emit(
        &mut self,
        kind: BlockKind,
        speaker: Option<&str>,
        text: String,
        fragment: Option<u32>,
    ) -> String {
        let (sequence, id) = self.next_id();

        let (speaker, fragment) = match kind {
            BlockKind::Speech => (speaker.filter(|s| !s.is_empty()).map(str::to_string), fragment),
            BlockKind::Context => (None, None),
        };
        let metadata = match &speaker {
            Some(name) => self
                .table
                .rows_matching_with(self.matcher, name)
                .into_iter()
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        self.blocks.push(SpeechBlock {
            id: id.clone(),
            sequence,
            kind,
            speaker,
            text,
            fragment,
            metadata,
        });
        id
    }
}

/// Name a speech is attributed to: the fragment's own speaker, or the name on
/// the backbone link when the fragment has none
pub fn resolve_speaker<'s>(sub_speaker: Option<&'s str>, display_name: &'s str) -> Option<&'s str> {
    match sub_speaker {
        Some(name) if !name.is_empty() => Some(name),
        _ if !display_name.is_empty() => Some(display_name),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_metadata;
    use serde_json::json;

    fn table() -> MetadataTable {
        parse_metadata("name,club\nJan Kowalski,KO\nAnna Nowak,PiS\n", b',').unwrap()
    }

    #[test]
    fn test_sequence_shared_across_kinds() {
        let table = table();
        let mut sequencer = Sequencer::new("2024-01-10", &table);

        assert_eq!(sequencer.emit(BlockKind::Context, None, "a".into(), None), "2024-01-10_1");
        assert_eq!(
            sequencer.emit(BlockKind::Speech, Some("Jan Kowalski"), "b".into(), None),
            "2024-01-10_2"
        );
        assert_eq!(sequencer.emit(BlockKind::Context, None, "c".into(), None), "2024-01-10_3");

        let sequences: Vec<u64> = sequencer.blocks().iter().map(|b| b.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
    }

    #[test]
    fn test_speech_metadata_matched() {
        let table = table();
        let mut sequencer = Sequencer::new("S", &table);
        sequencer.emit(BlockKind::Speech, Some("Poseł Anna Nowak"), "Ślubuję.".into(), None);
        sequencer.emit(BlockKind::Speech, Some("Marszałek Sejmu"), "Dziękuję.".into(), None);

        let blocks = sequencer.into_blocks();
        assert_eq!(blocks[0].metadata.len(), 1);
        assert_eq!(blocks[0].metadata[0]["club"], json!("PiS"));
        assert!(blocks[1].metadata.is_empty());
    }

    #[test]
    fn test_context_never_carries_speaker() {
        let table = table();
        let mut sequencer = Sequencer::new("S", &table);
        sequencer.emit(BlockKind::Context, Some("Jan Kowalski"), "Tekst.".into(), Some(4));
        sequencer.emit(BlockKind::Speech, Some("Jan Kowalski"), "Mowa.".into(), Some(5));

        let block = &sequencer.blocks()[0];
        assert_eq!(block.speaker, None);
        assert_eq!(block.fragment, None);
        assert_eq!(sequencer.blocks()[1].fragment, Some(5));
        assert!(block.metadata.is_empty());
    }

    struct ExactMatcher;

    impl NameMatcher for ExactMatcher {
        fn matches(&self, row_name: &str, candidate: &str) -> bool {
            row_name == candidate
        }
    }

    #[test]
    fn test_custom_matcher() {
        let table = table();
        let mut sequencer = Sequencer::with_matcher("S", &table, &ExactMatcher);
        sequencer.emit(BlockKind::Speech, Some("Poseł Jan Kowalski"), "x".into(), None);
        sequencer.emit(BlockKind::Speech, Some("Jan Kowalski"), "y".into(), None);

        assert!(sequencer.blocks()[0].metadata.is_empty());
        assert_eq!(sequencer.blocks()[1].metadata.len(), 1);
    }

    #[test]
    fn test_resolve_speaker() {
        assert_eq!(resolve_speaker(Some("Poseł A"), "B"), Some("Poseł A"));
        assert_eq!(resolve_speaker(None, "B"), Some("B"));
        assert_eq!(resolve_speaker(Some(""), "B"), Some("B"));
        assert_eq!(resolve_speaker(None, ""), None);
    }
}
