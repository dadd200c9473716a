use fecdir_core::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "[{elapsed_precise}] {bar:40} {pos}/{len} pages {msg}";

/// Page progress on the terminal
#[derive(Default)]
pub struct ProgressBarReporter {
    bar: Option<ProgressBar>,
    records: usize,
}

impl ProgressBarReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressReporter for ProgressBarReporter {
    fn on_start(&mut self, total_pages: usize) {
        let bar = ProgressBar::new(total_pages as u64);
        let style = ProgressStyle::default_bar()
            .template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        self.bar = Some(bar);
        self.records = 0;
    }

    fn on_page(&mut self, _page_number: u32, records: usize) {
        self.records += records;
        if let Some(bar) = &self.bar {
            bar.set_message(format!("({} records)", self.records));
            bar.inc(1);
        }
    }

    fn on_finish(&mut self, total_records: usize) {
        if let Some(bar) = self.bar.take() {
            bar.finish_with_message(format!("({total_records} records)"));
        }
    }
}
