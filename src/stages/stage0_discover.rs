use std::path::Path;

use scraper::Html;
use tracing::info;

use crate::error::{Result, TranscriptError};
use crate::io::{discover_sessions, load_metadata, read_document};
use crate::models::{MetadataTable, SessionSource};

/// Inputs shared by every sitting day of one directory
#[derive(Debug)]
pub struct SessionPlan {
    /// Sitting days found, ordered by session base
    pub sessions: Vec<SessionSource>,
    /// Deputies table, loaded once and shared read-only
    pub table: MetadataTable,
}

/// Locate the backbones of a directory and load the metadata table
///
/// Both are session-level inputs: a missing backbone or table fails the whole
/// directory before anything is written.
pub fn prepare(transcript_dir: &Path, deputies_path: &Path) -> Result<SessionPlan> {
    let sessions = discover_sessions(transcript_dir)?;
    let table = load_metadata(deputies_path)?;

    info!(
        "Found {} sitting day(s) in {:?}, {} metadata rows",
        sessions.len(),
        transcript_dir,
        table.len()
    );

    Ok(SessionPlan { sessions, table })
}

/// Parse the backbone document of a sitting day
pub fn load_backbone(session: &SessionSource) -> Result<Html> {
    read_document(&session.backbone)?
        .ok_or_else(|| TranscriptError::MissingBackbone(session.backbone.clone()))
}
