use std::path::{Path, PathBuf};

/// On-disk layout of retrieved documents under a data root
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn terms_path(&self) -> PathBuf {
        self.root.join("terms").join("terms.json")
    }

    pub fn term_dir(&self, term: u32) -> PathBuf {
        self.root.join("transcripts").join(term.to_string())
    }

    /// Directory holding every document of one proceeding
    pub fn proceeding_dir(&self, term: u32, proceeding: u32) -> PathBuf {
        self.term_dir(term).join(proceeding.to_string())
    }

    pub fn pdf_path(&self, term: u32, proceeding: u32, date: &str) -> PathBuf {
        self.proceeding_dir(term, proceeding).join(format!("{date}.pdf"))
    }

    pub fn statements_path(&self, term: u32, proceeding: u32, date: &str) -> PathBuf {
        self.proceeding_dir(term, proceeding).join(format!("{date}.json"))
    }

    /// `{date}_{num}.html`; statement 0 is the backbone of the sitting day
    pub fn statement_html_path(&self, term: u32, proceeding: u32, date: &str, statement: u32) -> PathBuf {
        self.proceeding_dir(term, proceeding)
            .join(format!("{date}_{statement}.html"))
    }

    pub fn deputies_path(&self, term: u32) -> PathBuf {
        self.root
            .join("deputies")
            .join(term.to_string())
            .join("deputies.csv")
    }
}
