use std::io::ErrorKind;
use std::path::Path;

use scraper::{ElementRef, Html};

use crate::text::collapse_whitespace;

/// Read and parse an HTML document, `None` if the file does not exist
pub fn read_document(path: &Path) -> std::io::Result<Option<Html>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(Html::parse_document(&content))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Visible text of an element: trimmed text nodes, empty ones dropped,
/// joined by `separator`
pub fn element_text(element: ElementRef<'_>, separator: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Paragraph text with every whitespace run collapsed to one space
pub fn paragraph_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element_text(element, " "))
}

pub fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}
