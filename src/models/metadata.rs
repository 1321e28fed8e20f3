use serde_json::{Map, Value};

use crate::heuristics::{NameMatcher, SubstringMatcher};

/// Column every row is addressed by
pub const NAME_COLUMN: &str = "name";

/// One record of the deputies table, columns in file order
pub type MetadataRow = Map<String, Value>;

/// In-memory deputies table, immutable once loaded
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    columns: Vec<String>,
    rows: Vec<MetadataRow>,
}

impl MetadataTable {
    /// Build a table; callers guarantee every row carries [`NAME_COLUMN`]
    pub fn new(columns: Vec<String>, rows: Vec<MetadataRow>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[MetadataRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose name occurs anywhere in `candidate`
    pub fn rows_matching(&self, candidate: &str) -> Vec<&MetadataRow> {
        self.rows_matching_with(&SubstringMatcher, candidate)
    }

    /// Rows accepted by `matcher` for `candidate`, in table order
    pub fn rows_matching_with(&self, matcher: &dyn NameMatcher, candidate: &str) -> Vec<&MetadataRow> {
        self.rows
            .iter()
            .filter(|row| {
                row_name(row).is_some_and(|name| !name.is_empty() && matcher.matches(name, candidate))
            })
            .collect()
    }
}

fn row_name(row: &MetadataRow) -> Option<&str> {
    row.get(NAME_COLUMN).and_then(Value::as_str)
}
