//! PDF documents via `pdf-extract`.
//!
//! Text comes out per page with the column layout flattened into runs of
//! spaces, so table rows are recovered by splitting on wide gaps.

use super::{page_from_text, PageSource};
use crate::error::ExtractionError;
use crate::types::Page;
use std::path::{Path, PathBuf};

pub struct PdfSource {
    path: PathBuf,
}

impl PdfSource {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn pages_from_bytes(pdf_bytes: &[u8]) -> Result<Vec<Page>, ExtractionError> {
        let texts = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
            .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

        Ok(texts
            .iter()
            .enumerate()
            .map(|(index, text)| page_from_text(index as u32 + 1, text, true))
            .collect())
    }
}

impl PageSource for PdfSource {
    fn pages(&self) -> Result<Vec<Page>, ExtractionError> {
        let pdf_bytes = std::fs::read(&self.path).map_err(|e| ExtractionError::io(&self.path, e))?;
        let pages = Self::pages_from_bytes(&pdf_bytes)?;
        tracing::debug!("{}: {} pages", self.path.display(), pages.len());
        Ok(pages)
    }

    fn name(&self) -> &str {
        "PdfSource"
    }
}
