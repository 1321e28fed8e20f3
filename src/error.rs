use std::path::PathBuf;

use thiserror::Error;

/// Session-level failures of the reconstruction pipeline.
///
/// Anything that goes wrong inside a single fragment is recovered locally and
/// never surfaces here.
#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("no backbone document (*_0.html) found in {0:?}")]
    MissingBackbone(PathBuf),
    #[error("metadata table not found: {0:?}")]
    MissingMetadata(PathBuf),
    #[error("metadata table has no name column; available columns: {columns:?}")]
    Schema { columns: Vec<String> },
    #[error("metadata row at line {line} has {found} cells, header has {expected}")]
    RowTooLong {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("failed to read metadata table: {0}")]
    Csv(#[from] csv::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid roll-call pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, TranscriptError>;
