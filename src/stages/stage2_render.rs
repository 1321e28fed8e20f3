use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::io::{TranscriptArtifacts, TranscriptWriter};
use crate::models::{SpeechBlock, StatementList};

/// Result of writing one sitting day
#[derive(Debug)]
pub struct RenderResult {
    pub artifacts: TranscriptArtifacts,
    /// Number of lines (and metadata records) written
    pub blocks_written: usize,
}

/// Write the artifacts of a sitting day
pub fn execute_render(
    blocks: &[SpeechBlock],
    statements: Option<&StatementList>,
    output_dir: &Path,
    session_base: &str,
) -> Result<RenderResult> {
    let artifacts = TranscriptWriter::new(blocks)
        .with_statements(statements)
        .write(output_dir, session_base)?;
    info!(
        "Wrote {} blocks to {:?} and {:?}",
        blocks.len(),
        artifacts.transcript_path,
        artifacts.metadata_path
    );

    Ok(RenderResult {
        artifacts,
        blocks_written: blocks.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let result = execute_render(&[], None, dir.path(), "S").unwrap();

        assert_eq!(result.blocks_written, 0);
        assert_eq!(std::fs::read_to_string(&result.artifacts.transcript_path).unwrap(), "");
        assert_eq!(
            std::fs::read_to_string(&result.artifacts.metadata_path).unwrap(),
            "[]"
        );
        assert!(result.artifacts.statements_path.is_none());
    }
}
