use serde::Serialize;

use super::MetadataRow;

/// Kind of an emitted block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Merged procedural text between two speeches
    Context,
    /// One attributed utterance
    Speech,
}

/// A (sub-speaker, text) pair produced by the speech extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubSpeech {
    /// Speaker name as found in the fragment, if any
    pub speaker: Option<String>,
    /// Whitespace-normalized spoken text
    pub text: String,
}

impl SubSpeech {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        let speaker = speaker.into();
        Self {
            speaker: (!speaker.is_empty()).then_some(speaker),
            text: text.into(),
        }
    }
}

/// One block of the reconstructed transcript
#[derive(Debug, Clone, Serialize)]
pub struct SpeechBlock {
    /// Composite identifier `{session_base}_{sequence}`
    pub id: String,
    /// Position in the session-wide sequence, starting at 1
    pub sequence: u64,
    pub kind: BlockKind,
    /// Attributed speaker; always `None` for context blocks
    pub speaker: Option<String>,
    pub text: String,
    /// Index of the fragment a speech came from
    pub fragment: Option<u32>,
    /// Metadata rows matched against the speaker name
    pub metadata: Vec<MetadataRow>,
}

impl SpeechBlock {
    pub fn is_speech(&self) -> bool {
        self.kind == BlockKind::Speech
    }
}

/// Record written to the metadata artifact, one per block
#[derive(Debug, Clone, Serialize)]
pub struct MetadataRecord<'a> {
    pub id: &'a str,
    pub speaker: Option<&'a str>,
    pub metadata: &'a [MetadataRow],
}

impl<'a> From<&'a SpeechBlock> for MetadataRecord<'a> {
    fn from(block: &'a SpeechBlock) -> Self {
        Self {
            id: &block.id,
            speaker: block.speaker.as_deref(),
            metadata: &block.metadata,
        }
    }
}
