use crate::assembler::{LineRecordAssembler, RecordAssembler, TableRecordAssembler};
use crate::config::{ExtractionConfig, Vocabulary};
use crate::error::ExtractionError;
use crate::progress::ProgressReporter;
use crate::segmenter::{LineSegmenter, TableSegmenter};
use crate::sources::PageSource;
use crate::state::StateTracker;
use crate::types::{
    AdministrativeState, CompanyRecord, DirectoryLayout, ExtractionSummary, Page,
};

/// Records found on one page
#[derive(Debug, Clone, Default)]
pub struct PageExtraction {
    /// Raw records the segmenter closed, before legal-name rejection
    pub raw_records: usize,
    pub records: Vec<CompanyRecord>,
}

/// Turns one page into company records for a given print layout
pub trait PageRecordExtractor {
    fn extract_page(&self, page: &Page, state: Option<&AdministrativeState>) -> PageExtraction;

    fn name(&self) -> &str;
}

pub struct LineRecordExtractor<'a> {
    segmenter: LineSegmenter<'a>,
    assembler: LineRecordAssembler<'a>,
}

impl<'a> LineRecordExtractor<'a> {
    pub fn new(vocabulary: &'a Vocabulary, min_fragment_len: usize) -> Self {
        Self {
            segmenter: LineSegmenter::new(vocabulary, min_fragment_len),
            assembler: LineRecordAssembler::new(vocabulary),
        }
    }
}

impl<'a> PageRecordExtractor for LineRecordExtractor<'a> {
    fn extract_page(&self, page: &Page, state: Option<&AdministrativeState>) -> PageExtraction {
        let raw = self.segmenter.segment(&page.lines);
        PageExtraction {
            raw_records: raw.len(),
            records: raw
                .iter()
                .filter_map(|record| self.assembler.assemble(record, state))
                .collect(),
        }
    }

    fn name(&self) -> &str {
        "LineRecordExtractor"
    }
}

pub struct TableRecordExtractor<'a> {
    segmenter: TableSegmenter<'a>,
    assembler: TableRecordAssembler<'a>,
}

impl<'a> TableRecordExtractor<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self {
            segmenter: TableSegmenter::new(vocabulary),
            assembler: TableRecordAssembler::new(vocabulary),
        }
    }
}

impl<'a> PageRecordExtractor for TableRecordExtractor<'a> {
    fn extract_page(&self, page: &Page, state: Option<&AdministrativeState>) -> PageExtraction {
        let raw = self.segmenter.segment_rows(&page.rows);
        PageExtraction {
            raw_records: raw.len(),
            records: raw
                .iter()
                .filter_map(|record| self.assembler.assemble(record, state))
                .collect(),
        }
    }

    fn name(&self) -> &str {
        "TableRecordExtractor"
    }
}

/// Select the page extractor for the configured layout
pub fn extractor_for(config: &ExtractionConfig) -> Box<dyn PageRecordExtractor + '_> {
    let vocabulary = config.vocabulary();
    match config.layout {
        DirectoryLayout::Lines => Box::new(LineRecordExtractor::new(
            vocabulary,
            config.min_fragment_len,
        )),
        DirectoryLayout::Table => Box::new(TableRecordExtractor::new(vocabulary)),
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExtractionOutput {
    pub records: Vec<CompanyRecord>,
    pub summary: ExtractionSummary,
}

/// Runs the record pipeline over every page of a document.
///
/// Pages are processed strictly in order: the administrative state seen on
/// one page applies to every following page until another one is found.
pub struct DirectoryExtractor<'a> {
    config: &'a ExtractionConfig,
    extractor: Box<dyn PageRecordExtractor + 'a>,
}

impl<'a> DirectoryExtractor<'a> {
    pub fn new(config: &'a ExtractionConfig) -> Self {
        Self {
            config,
            extractor: extractor_for(config),
        }
    }

    pub fn extract(
        &self,
        source: &dyn PageSource,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<ExtractionOutput, ExtractionError> {
        tracing::info!(
            "extracting with {} from {}",
            self.extractor.name(),
            source.name()
        );
        let pages = source.pages()?;
        Ok(self.extract_pages(&pages, reporter))
    }

    pub fn extract_pages(
        &self,
        pages: &[Page],
        reporter: &mut dyn ProgressReporter,
    ) -> ExtractionOutput {
        let skip_pages = self.config.effective_skip_pages() as usize;
        let mut tracker = StateTracker::new(self.config.vocabulary());
        let mut output = ExtractionOutput::default();

        reporter.on_start(pages.len());

        for (index, page) in pages.iter().enumerate() {
            output.summary.pages_seen += 1;

            if index < skip_pages {
                output.summary.pages_skipped += 1;
                tracing::debug!("skipping page {}", page.number);
                reporter.on_page(page.number, 0);
                continue;
            }

            tracker.observe(&page.text());
            let extraction = self.extractor.extract_page(page, tracker.current());

            tracing::debug!(
                "page {}: {} raw records, {} kept",
                page.number,
                extraction.raw_records,
                extraction.records.len()
            );
            output.summary.raw_records += extraction.raw_records;
            output.summary.records_kept += extraction.records.len();
            reporter.on_page(page.number, extraction.records.len());
            output.records.extend(extraction.records);
        }

        reporter.on_finish(output.records.len());
        tracing::info!(
            "{} pages ({} skipped), {} raw records, {} kept, {} dropped",
            output.summary.pages_seen,
            output.summary.pages_skipped,
            output.summary.raw_records,
            output.summary.records_kept,
            output.summary.records_dropped()
        );

        output
    }
}
