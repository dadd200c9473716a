/// Receives page-level progress from the extraction loop.
pub trait ProgressReporter {
    fn on_start(&mut self, total_pages: usize);
    fn on_page(&mut self, page_number: u32, records: usize);
    fn on_finish(&mut self, total_records: usize);
}

pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_start(&mut self, _total_pages: usize) {}
    fn on_page(&mut self, _page_number: u32, _records: usize) {}
    fn on_finish(&mut self, _total_records: usize) {}
}

/// Reports through `tracing`
#[derive(Default)]
pub struct LogReporter {
    total_pages: usize,
}

impl ProgressReporter for LogReporter {
    fn on_start(&mut self, total_pages: usize) {
        self.total_pages = total_pages;
        tracing::info!("extracting {} pages", total_pages);
    }

    fn on_page(&mut self, page_number: u32, records: usize) {
        tracing::debug!(
            "page {}/{}: {} records",
            page_number,
            self.total_pages,
            records
        );
    }

    fn on_finish(&mut self, total_records: usize) {
        tracing::info!("extraction finished: {} records", total_records);
    }
}
