pub mod error;
pub mod heuristics;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod sources;
pub mod stages;
pub mod text;

pub use error::TranscriptError;
pub use heuristics::{NameMatcher, RollCallConfig, RollCallPolicy, SubstringMatcher, ThresholdPolicy};
pub use io::{TranscriptWriter, discover_sessions, load_metadata, load_statements};
pub use models::{
    BlockKind, FragmentRef, MetadataRow, MetadataTable, SessionSource, SpeechBlock, StatementList,
};
pub use pipeline::{
    DirectorySummary, PipelineConfig, SessionSummary, process_directory, process_session,
    process_term, reconstruct_session,
};
pub use sources::{DataLayout, DownloadOptions, SejmClient, SejmConfig, download_all};
pub use stages::{BlockSink, HtmlSpeechExtractor, Sequencer, SpeechExtractor, walk_backbone};
