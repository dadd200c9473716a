//! Page Sources
//!
//! The boundary between document formats and the record pipeline. A page
//! source turns one input file into an ordered list of [`Page`]s, each with
//! its raw text lines and any table rows it could recover.
//!
//! ```text
//! Document (.txt, .html/.xhtml, .pdf)
//!     ↓
//! [Format-specific PageSource]
//!     ↓
//! Vec<Page> (lines + rows)
//!     ↓
//! [DirectoryExtractor]
//! ```

pub mod text_dump;
pub mod xhtml;

#[cfg(feature = "pdf-backend")]
pub mod pdf;

pub use text_dump::TextDumpSource;
pub use xhtml::XhtmlSource;

#[cfg(feature = "pdf-backend")]
pub use pdf::PdfSource;

use crate::error::ExtractionError;
use crate::types::{Page, TableRow};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static COLUMN_GAP_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{3,}").unwrap());

/// Produces the pages of one document, in order.
pub trait PageSource {
    /// Load every page of the document
    fn pages(&self) -> Result<Vec<Page>, ExtractionError>;

    /// Source name for logging
    fn name(&self) -> &str;
}

/// Pick a page source from the file extension
pub fn open_source(path: &Path) -> Result<Box<dyn PageSource>, ExtractionError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "txt" => Ok(Box::new(TextDumpSource::new(path))),
        "html" | "htm" | "xhtml" => Ok(Box::new(XhtmlSource::new(path))),
        #[cfg(feature = "pdf-backend")]
        "pdf" => Ok(Box::new(PdfSource::new(path))),
        _ => Err(ExtractionError::UnsupportedSource(path.to_path_buf())),
    }
}

/// Pages already held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<Page>,
}

impl MemorySource {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    /// One page per entry, lines split on newlines
    pub fn from_texts<S: AsRef<str>>(texts: &[S]) -> Self {
        let pages = texts
            .iter()
            .enumerate()
            .map(|(index, text)| page_from_text(index as u32 + 1, text.as_ref(), false))
            .collect();
        Self { pages }
    }
}

impl PageSource for MemorySource {
    fn pages(&self) -> Result<Vec<Page>, ExtractionError> {
        Ok(self.pages.clone())
    }

    fn name(&self) -> &str {
        "MemorySource"
    }
}

/// Build a page from plain text. Lines holding a `|` also become table rows;
/// with `column_gaps`, runs of 3+ spaces separate cells too.
pub(crate) fn page_from_text(number: u32, text: &str, column_gaps: bool) -> Page {
    let lines: Vec<String> = text
        .lines()
        .map(|line| line.trim_end().to_string())
        .filter(|line| !line.trim().is_empty())
        .collect();

    let rows = lines
        .iter()
        .filter_map(|line| split_row(line, column_gaps))
        .collect();

    Page::new(number, lines).with_rows(rows)
}

fn split_row(line: &str, column_gaps: bool) -> Option<TableRow> {
    let cells: Vec<&str> = if line.contains('|') {
        line.split('|').collect()
    } else if column_gaps {
        COLUMN_GAP_REGEX.split(line.trim()).collect()
    } else {
        return None;
    };

    if cells.len() < 2 {
        return None;
    }
    Some(cells.into_iter().map(cell).collect())
}

fn cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_rows_from_pipe_lines() {
        let page = page_from_text(3, "ACME SARL |  | Av. du Port 4\nSecteur: Commerce\n\n", false);
        assert_eq!(page.number, 3);
        assert_eq!(page.lines.len(), 2);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(
            page.rows[0],
            vec![Some("ACME SARL".to_string()), None, Some("Av. du Port 4".to_string())]
        );
    }

    #[test]
    fn test_rows_from_column_gaps() {
        let page = page_from_text(1, "ACME SARL      Av. du Port 4\nSingle cell", true);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].len(), 2);

        let without = page_from_text(1, "ACME SARL      Av. du Port 4", false);
        assert!(without.rows.is_empty());
    }

    #[test]
    fn test_source_selection_by_extension() {
        assert_eq!(
            open_source(&PathBuf::from("annuaire.TXT")).unwrap().name(),
            "TextDumpSource"
        );
        assert_eq!(
            open_source(&PathBuf::from("annuaire.xhtml")).unwrap().name(),
            "XhtmlSource"
        );
        assert!(matches!(
            open_source(&PathBuf::from("annuaire.docx")),
            Err(ExtractionError::UnsupportedSource(_))
        ));
    }

    #[test]
    fn test_memory_source_numbers_pages() {
        let source = MemorySource::from_texts(&["KINSHASA", "ACME SARL\nSecteur: Commerce"]);
        let pages = source.pages().unwrap();
        assert_eq!(pages[1].number, 2);
        assert_eq!(pages[1].lines, vec!["ACME SARL", "Secteur: Commerce"]);
    }
}
