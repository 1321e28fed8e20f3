use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{MetadataRecord, SpeechBlock, StatementList, StatementRecord};
use crate::text::strip_speaker_colon;

/// Paths of the two artifacts written for one sitting day
#[derive(Debug, Clone)]
pub struct TranscriptArtifacts {
    /// `{base}_combined.txt`, one `id<TAB>text` line per block
    pub transcript_path: PathBuf,
    /// `{base}_metadata.json`, one `{id, speaker, metadata}` record per block
    pub metadata_path: PathBuf,
    /// `{base}_statements.json`, written only when a statement list was available
    pub statements_path: Option<PathBuf>,
}

impl TranscriptArtifacts {
    pub fn for_session(output_dir: &Path, session_base: &str) -> Self {
        Self {
            transcript_path: output_dir.join(format!("{session_base}_combined.txt")),
            metadata_path: output_dir.join(format!("{session_base}_metadata.json")),
            statements_path: None,
        }
    }
}

/// Text of a block as it appears in the line artifact
///
/// Speech blocks are prefixed with their speaker unless the text already
/// starts with that label.
pub fn render_text(block: &SpeechBlock) -> String {
    let speaker = match block.speaker.as_deref() {
        Some(speaker) if block.is_speech() => strip_speaker_colon(speaker),
        _ => return block.text.clone(),
    };
    if speaker.is_empty() || block.text.starts_with(&format!("{speaker}:")) {
        return block.text.clone();
    }
    format!("{}: {}", speaker, block.text)
}

/// Writes the line transcript, the metadata artifact and, given a statement
/// list, the statements artifact
pub struct TranscriptWriter<'a> {
    blocks: &'a [SpeechBlock],
    statements: Option<&'a StatementList>,
}

impl<'a> TranscriptWriter<'a> {
    pub fn new(blocks: &'a [SpeechBlock]) -> Self {
        Self {
            blocks,
            statements: None,
        }
    }

    /// Also write the statements artifact from this list
    pub fn with_statements(mut self, statements: Option<&'a StatementList>) -> Self {
        self.statements = statements;
        self
    }

    /// Format the line artifact
    pub fn format_lines(&self) -> String {
        let mut output = String::new();
        for block in self.blocks {
            output.push_str(&block.id);
            output.push('\t');
            output.push_str(&render_text(block));
            output.push('\n');
        }
        output
    }

    /// Write the artifacts into `output_dir`, creating it if needed.
    /// Existing files are overwritten.
    pub fn write(&self, output_dir: &Path, session_base: &str) -> Result<TranscriptArtifacts> {
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

        let mut artifacts = TranscriptArtifacts::for_session(output_dir, session_base);
        self.write_lines(&artifacts.transcript_path)?;

        let records: Vec<MetadataRecord<'_>> = self.blocks.iter().map(MetadataRecord::from).collect();
        write_json(&artifacts.metadata_path, &records)?;

        if let Some(statements) = self.statements {
            let path = output_dir.join(format!("{session_base}_statements.json"));
            let records: Vec<StatementRecord<'_>> = statements.records_for(self.blocks);
            write_json(&path, &records)?;
            artifacts.statements_path = Some(path);
        }

        Ok(artifacts)
    }

    fn write_lines(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        let mut writer = BufWriter::new(file);
        writer.write_all(self.format_lines().as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file =
        std::fs::File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).context("Failed to write JSON")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlockKind;
    use serde_json::json;

    fn block(seq: u64, kind: BlockKind, speaker: Option<&str>, text: &str) -> SpeechBlock {
        SpeechBlock {
            id: format!("S_{seq}"),
            sequence: seq,
            kind,
            speaker: speaker.map(str::to_string),
            text: text.to_string(),
            fragment: None,
            metadata: vec![],
        }
    }

    #[test]
    fn test_render_text() {
        assert_eq!(
            render_text(&block(1, BlockKind::Speech, Some("Jan Kowalski"), "Dziękuję.")),
            "Jan Kowalski: Dziękuję."
        );
        assert_eq!(
            render_text(&block(2, BlockKind::Speech, Some("Jan Kowalski:"), "Dziękuję.")),
            "Jan Kowalski: Dziękuję."
        );
        assert_eq!(
            render_text(&block(3, BlockKind::Speech, Some("Jan Kowalski"), "Jan Kowalski: Dziękuję.")),
            "Jan Kowalski: Dziękuję."
        );
        assert_eq!(render_text(&block(4, BlockKind::Speech, None, "Oklaski")), "Oklaski");
        assert_eq!(
            render_text(&block(5, BlockKind::Context, None, "Otwieram posiedzenie.")),
            "Otwieram posiedzenie."
        );
    }

    #[test]
    fn test_write_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("out");
        let blocks = vec![
            block(1, BlockKind::Context, None, "Otwieram posiedzenie."),
            block(2, BlockKind::Speech, Some("Paweł Nowak"), "Dziękuję."),
        ];

        let artifacts = TranscriptWriter::new(&blocks).write(&out, "S").unwrap();

        let lines = std::fs::read_to_string(&artifacts.transcript_path).unwrap();
        assert_eq!(lines, "S_1\tOtwieram posiedzenie.\nS_2\tPaweł Nowak: Dziękuję.\n");

        let json_text = std::fs::read_to_string(&artifacts.metadata_path).unwrap();
        // Non-ASCII stays unescaped, records are indented
        assert!(json_text.contains("Paweł Nowak"));
        assert!(json_text.contains("\n  {"));
        let records: serde_json::Value = serde_json::from_str(&json_text).unwrap();
        assert_eq!(
            records,
            json!([
                {"id": "S_1", "speaker": null, "metadata": []},
                {"id": "S_2", "speaker": "Paweł Nowak", "metadata": []}
            ])
        );
    }

    #[test]
    fn test_statements_artifact_only_with_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut speech = block(2, BlockKind::Speech, Some("Jan Kowalski"), "Dziękuję.");
        speech.fragment = Some(1);
        let blocks = vec![block(1, BlockKind::Context, None, "Otwieram posiedzenie."), speech];

        let plain = TranscriptWriter::new(&blocks).write(dir.path(), "A").unwrap();
        assert!(plain.statements_path.is_none());
        assert!(!dir.path().join("A_statements.json").exists());

        let list: StatementList = serde_json::from_str(
            r#"{"statements": [{"num": 1, "name": "Jan Kowalski", "function": "Poseł",
                "startDateTime": "2024-01-10T10:00:00"}]}"#,
        )
        .unwrap();
        let artifacts = TranscriptWriter::new(&blocks)
            .with_statements(Some(&list))
            .write(dir.path(), "B")
            .unwrap();

        let path = artifacts.statements_path.unwrap();
        let records: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(
            records,
            json!([{"id": "S_2", "num": 1, "name": "Jan Kowalski", "function": "Poseł",
                    "start": "2024-01-10T10:00:00", "end": null}])
        );

        // The metadata artifact keeps its three keys
        let metadata: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(&artifacts.metadata_path).unwrap(),
        )
        .unwrap();
        assert_eq!(metadata[1], json!({"id": "S_2", "speaker": "Jan Kowalski", "metadata": []}));
    }

    #[test]
    fn test_write_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("S_combined.txt");
        std::fs::write(&path, "stale content\n").unwrap();

        let blocks = vec![block(1, BlockKind::Context, None, "Nowe.")];
        TranscriptWriter::new(&blocks).write(dir.path(), "S").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "S_1\tNowe.\n");
    }
}
