use std::io::ErrorKind;
use std::path::Path;

use serde_json::{Number, Value};
use tracing::debug;

use crate::error::{Result, TranscriptError};
use crate::models::{MetadataRow, MetadataTable, NAME_COLUMN, SessionSource, StatementList};

/// Columns tried, in order, when the table has no `name` column
pub const NAME_ALIASES: [&str; 3] = ["firstLastName", "Speaker_name", "speaker"];

/// Cell values read as missing
const MISSING_VALUES: [&str; 19] = [
    "", "NaN", "nan", "NA", "N/A", "n/a", "NULL", "null", "None", "<NA>", "#N/A", "#N/A N/A",
    "#NA", "-NaN", "-nan", "-1.#IND", "-1.#QNAN", "1.#IND", "1.#QNAN",
];

/// Load the deputies table; `.tsv` files are tab-delimited, anything else comma-delimited
pub fn load_metadata(path: &Path) -> Result<MetadataTable> {
    if !path.is_file() {
        return Err(TranscriptError::MissingMetadata(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let table = parse_metadata(&content, delimiter_for(path))?;
    debug!("Loaded {} metadata rows from {:?}", table.len(), path);
    Ok(table)
}

fn delimiter_for(path: &Path) -> u8 {
    let is_tsv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv"));
    if is_tsv { b'\t' } else { b',' }
}

/// Parse delimited text into a metadata table
///
/// Rows shorter than the header are padded with missing cells; longer rows
/// are rejected.
pub fn parse_metadata(content: &str, delimiter: u8) -> Result<MetadataTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut cells: Vec<Vec<Option<String>>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() > columns.len() {
            return Err(TranscriptError::RowTooLong {
                line: record.position().map_or(0, |pos| pos.line()),
                expected: columns.len(),
                found: record.len(),
            });
        }
        let mut row: Vec<Option<String>> = record.iter().map(normalize_cell).collect();
        row.resize(columns.len(), None);
        cells.push(row);
    }

    let name_source = resolve_name_column(&columns)?;
    if columns[name_source] != NAME_COLUMN {
        columns.push(NAME_COLUMN.to_string());
        for row in &mut cells {
            let name = row[name_source].clone();
            row.push(name);
        }
    }

    let types: Vec<CellType> = (0..columns.len())
        .map(|col| {
            if columns[col] == NAME_COLUMN {
                CellType::Text
            } else {
                CellType::infer(cells.iter().filter_map(|row| row[col].as_deref()))
            }
        })
        .collect();

    let rows = cells
        .into_iter()
        .map(|row| {
            columns
                .iter()
                .zip(types.iter())
                .zip(row)
                .map(|((column, ty), cell)| (column.clone(), ty.to_value(cell)))
                .collect::<MetadataRow>()
        })
        .collect();

    Ok(MetadataTable::new(columns, rows))
}

/// Index of the column supplying names: `name` itself, then the aliases
fn resolve_name_column(columns: &[String]) -> Result<usize> {
    std::iter::once(NAME_COLUMN)
        .chain(NAME_ALIASES)
        .find_map(|wanted| columns.iter().position(|c| c == wanted))
        .ok_or_else(|| TranscriptError::Schema {
            columns: columns.to_vec(),
        })
}

fn normalize_cell(cell: &str) -> Option<String> {
    (!MISSING_VALUES.contains(&cell)).then(|| cell.to_string())
}

/// Column type inferred from its non-missing cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellType {
    Integer,
    Float,
    Boolean,
    Text,
}

impl CellType {
    fn infer<'a>(mut cells: impl Iterator<Item = &'a str> + Clone) -> Self {
        if cells.clone().next().is_none() {
            return CellType::Text;
        }
        if cells.clone().all(|c| c.trim().parse::<i64>().is_ok()) {
            CellType::Integer
        } else if cells
            .clone()
            .all(|c| c.trim().parse::<f64>().is_ok_and(f64::is_finite))
        {
            CellType::Float
        } else if cells.all(|c| parse_bool(c).is_some()) {
            CellType::Boolean
        } else {
            CellType::Text
        }
    }

    fn to_value(self, cell: Option<String>) -> Value {
        let Some(cell) = cell else {
            return Value::Null;
        };
        match self {
            CellType::Integer => cell
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or(Value::Null),
            CellType::Float => cell
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            CellType::Boolean => parse_bool(&cell).map(Value::Bool).unwrap_or(Value::Null),
            CellType::Text => Value::String(cell),
        }
    }
}

fn parse_bool(cell: &str) -> Option<bool> {
    let cell = cell.trim();
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Every sitting day in a directory, ordered by session base
pub fn discover_sessions(dir: &Path) -> Result<Vec<SessionSource>> {
    if !dir.is_dir() {
        return Err(TranscriptError::MissingBackbone(dir.to_path_buf()));
    }

    let mut sessions = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        if !file_name.to_lowercase().ends_with(".html") {
            continue;
        }
        if let Some(session) = SessionSource::from_backbone_name(dir, file_name) {
            sessions.push(session);
        }
    }

    if sessions.is_empty() {
        return Err(TranscriptError::MissingBackbone(dir.to_path_buf()));
    }

    sessions.sort_by(|a, b| a.base.cmp(&b.base));
    Ok(sessions)
}

/// Load the statement list `{base}.json` saved next to a backbone, `None` if absent
pub fn load_statements(dir: &Path, session_base: &str) -> Result<Option<StatementList>> {
    let path = dir.join(format!("{session_base}.json"));
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let list: StatementList = serde_json::from_str(&content)?;
    debug!("Loaded {} statements from {:?}", list.statements.len(), path);
    Ok(Some(list))
}
