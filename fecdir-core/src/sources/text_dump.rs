//! Plain text dumps, one page per form feed (`pdftotext -layout` output).

use super::{page_from_text, PageSource};
use crate::error::ExtractionError;
use crate::types::Page;
use std::path::{Path, PathBuf};

const PAGE_BREAK: char = '\x0c';

pub struct TextDumpSource {
    path: PathBuf,
}

impl TextDumpSource {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl PageSource for TextDumpSource {
    fn pages(&self) -> Result<Vec<Page>, ExtractionError> {
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| ExtractionError::io(&self.path, e))?;
        let pages = parse_text_dump(&text);
        tracing::debug!("{}: {} pages", self.path.display(), pages.len());
        Ok(pages)
    }

    fn name(&self) -> &str {
        "TextDumpSource"
    }
}

pub fn parse_text_dump(text: &str) -> Vec<Page> {
    let mut chunks: Vec<&str> = text.split(PAGE_BREAK).collect();
    // A dump usually ends with a page break
    if chunks.len() > 1 && chunks.last().is_some_and(|c| c.trim().is_empty()) {
        chunks.pop();
    }

    chunks
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| page_from_text(index as u32 + 1, chunk, false))
        .collect()
}
