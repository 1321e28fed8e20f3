use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::heuristics::RollCallConfig;
use crate::io::load_statements;
use crate::models::{MetadataTable, SessionSource, SpeechBlock};
use crate::stages::{
    HtmlSpeechExtractor, RenderResult, Sequencer, WalkSummary, execute_render, load_backbone,
    prepare, walk_backbone,
};

/// Configuration for transcript reconstruction
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub roll_call: RollCallConfig,
}

/// Outcome of one sitting day
#[derive(Debug)]
pub struct SessionSummary {
    pub base: String,
    pub walk: WalkSummary,
    pub render: RenderResult,
}

/// Outcome of one directory; failed sitting days do not stop the others
#[derive(Debug, Default)]
pub struct DirectorySummary {
    pub sessions: Vec<SessionSummary>,
    /// (session base or directory, error message)
    pub failures: Vec<(String, String)>,
}

impl DirectorySummary {
    pub fn total_blocks(&self) -> usize {
        self.sessions.iter().map(|s| s.render.blocks_written).sum()
    }
}

/// Rebuild the ordered block list of one sitting day without writing anything
pub fn reconstruct_session(
    session: &SessionSource,
    table: &MetadataTable,
    config: &PipelineConfig,
) -> Result<(Vec<SpeechBlock>, WalkSummary)> {
    let backbone = load_backbone(session)?;
    let extractor = HtmlSpeechExtractor::new(&session.dir, &config.roll_call)?;
    let mut sequencer = Sequencer::new(session.base.clone(), table);

    let walk = walk_backbone(&backbone, &session.base, &extractor, &mut sequencer);
    Ok((sequencer.into_blocks(), walk))
}

/// Reconstruct one sitting day and write its artifacts
pub fn process_session(
    session: &SessionSource,
    table: &MetadataTable,
    output_dir: &Path,
    config: &PipelineConfig,
) -> Result<SessionSummary> {
    info!("Processing sitting day {} from {:?}", session.base, session.backbone);

    let (blocks, walk) = reconstruct_session(session, table, config)
        .with_context(|| format!("Failed to reconstruct {}", session.base))?;

    info!(
        "{}: {} context blocks, {} speeches, {} skipped references, {} empty fragments",
        session.base,
        walk.context_blocks,
        walk.speech_blocks,
        walk.skipped_references,
        walk.empty_references
    );

    let statements = match load_statements(&session.dir, &session.base) {
        Ok(statements) => statements,
        Err(e) => {
            warn!("Ignoring statement list of {}: {}", session.base, e);
            None
        }
    };

    let render = execute_render(&blocks, statements.as_ref(), output_dir, &session.base)?;
    Ok(SessionSummary {
        base: session.base.clone(),
        walk,
        render,
    })
}

/// Process every sitting day of one proceeding directory
///
/// A missing backbone or metadata table fails the directory; a failure of one
/// sitting day is logged and the rest still run.
pub fn process_directory(
    transcript_dir: &Path,
    deputies_path: &Path,
    output_dir: &Path,
    config: &PipelineConfig,
) -> Result<DirectorySummary> {
    let plan = prepare(transcript_dir, deputies_path)
        .with_context(|| format!("Cannot process {:?}", transcript_dir))?;

    let mut summary = DirectorySummary::default();
    for session in &plan.sessions {
        match process_session(session, &plan.table, output_dir, config) {
            Ok(done) => summary.sessions.push(done),
            Err(e) => {
                warn!("Skipping sitting day {}: {:#}", session.base, e);
                summary.failures.push((session.base.clone(), format!("{:#}", e)));
            }
        }
    }

    Ok(summary)
}

/// Process every proceeding directory of a term, writing each into
/// `output_dir/{proceeding}`
pub fn process_term(
    transcripts_dir: &Path,
    deputies_path: &Path,
    output_dir: &Path,
    config: &PipelineConfig,
) -> Result<DirectorySummary> {
    let mut summary = DirectorySummary::default();

    for dir in proceeding_dirs(transcripts_dir)? {
        let Some(name) = dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        match process_directory(&dir, deputies_path, &output_dir.join(&name), config) {
            Ok(done) => {
                summary.sessions.extend(done.sessions);
                summary.failures.extend(done.failures);
            }
            Err(e) => {
                warn!("Skipping proceeding {}: {:#}", name, e);
                summary.failures.push((name, format!("{:#}", e)));
            }
        }
    }

    Ok(summary)
}

/// Subdirectories of a term directory, numeric names first in numeric order
fn proceeding_dirs(transcripts_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    let entries = std::fs::read_dir(transcripts_dir)
        .with_context(|| format!("Failed to read directory: {:?}", transcripts_dir))?;
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }

    dirs.sort_by_key(|dir| {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        (name.parse::<u32>().unwrap_or(u32::MAX), name)
    });
    Ok(dirs)
}
