use crate::config::ExtractionConfig;
use crate::error::ExtractionError;
use crate::orchestrator::DirectoryExtractor;
use crate::progress::{LogReporter, ProgressReporter};
use crate::sink::{JsonLinesSink, RecordSink};
use crate::sources::{open_source, PageSource};
use crate::types::{ExtractionSummary, ProcessingStatus};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Simple profiler that collects timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        self.timings.push((step_name.to_string(), elapsed));
        tracing::info!("⏱️  {}: {:.0}ms", step_name, elapsed.as_millis());

        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn log_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();
        tracing::info!("📊 Performance Summary:");
        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            tracing::info!(
                "   {:.<35} {:.0}ms ({:.1}%)",
                step,
                duration.as_millis(),
                percentage
            );
        }
        tracing::info!("   {:.<35} {:.0}ms", "Total", total.as_millis());
    }
}

/// Runs one document through extraction and output, and remembers how it went.
pub struct DirectoryProcessor {
    filename: PathBuf,
    config: ExtractionConfig,
    sink: Box<dyn RecordSink>,
    base_dir: PathBuf,
    profiling: bool,
    status: ProcessingStatus,
    summary: Option<ExtractionSummary>,
}

impl DirectoryProcessor {
    /// Processor writing newline-delimited JSON under the working directory
    pub fn new(filename: impl Into<PathBuf>, config: ExtractionConfig) -> Self {
        Self::new_with_dependencies(filename, config, Box::new(JsonLinesSink))
    }

    pub fn new_with_dependencies(
        filename: impl Into<PathBuf>,
        config: ExtractionConfig,
        sink: Box<dyn RecordSink>,
    ) -> Self {
        Self {
            filename: filename.into(),
            config,
            sink,
            base_dir: PathBuf::from("."),
            profiling: false,
            status: ProcessingStatus::Pending,
            summary: None,
        }
    }

    /// Directory a relative output directory is resolved against
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn with_profiling(mut self, enabled: bool) -> Self {
        self.profiling = enabled;
        self
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn status(&self) -> &ProcessingStatus {
        &self.status
    }

    /// Counters of the last successful run
    pub fn summary(&self) -> Option<&ExtractionSummary> {
        self.summary.as_ref()
    }

    /// Extract the input file and write its records; returns the output path
    pub fn start_processing(&mut self) -> Result<PathBuf, ExtractionError> {
        let mut reporter = LogReporter::default();
        self.start_processing_with_reporter(&mut reporter)
    }

    pub fn start_processing_with_reporter(
        &mut self,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<PathBuf, ExtractionError> {
        tracing::info!("processing {}", self.filename.display());
        let mut profiler = StepProfiler::new(self.profiling);

        let result = profiler
            .time_step("Open page source", || open_source(&self.filename))
            .and_then(|source| self.run(source.as_ref(), reporter, &mut profiler));

        profiler.log_summary();
        self.finish(result)
    }

    /// Same as [`start_processing_with_reporter`](Self::start_processing_with_reporter)
    /// with pages from an already opened source
    pub fn process_source(
        &mut self,
        source: &dyn PageSource,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<PathBuf, ExtractionError> {
        let mut profiler = StepProfiler::new(self.profiling);
        let result = self.run(source, reporter, &mut profiler);
        profiler.log_summary();
        self.finish(result)
    }

    fn run(
        &self,
        source: &dyn PageSource,
        reporter: &mut dyn ProgressReporter,
        profiler: &mut StepProfiler,
    ) -> Result<(PathBuf, ExtractionSummary), ExtractionError> {
        let extractor = DirectoryExtractor::new(&self.config);
        let output = profiler.time_step("Extract records", || extractor.extract(source, reporter))?;

        let destination = self
            .config
            .output
            .destination_under(&self.base_dir, Utc::now());
        profiler.time_step("Write records", || {
            self.sink.write(&destination, &output.records)
        })?;

        Ok((destination, output.summary))
    }

    fn finish(
        &mut self,
        result: Result<(PathBuf, ExtractionSummary), ExtractionError>,
    ) -> Result<PathBuf, ExtractionError> {
        match result {
            Ok((destination, summary)) => {
                self.status = ProcessingStatus::Success;
                self.summary = Some(summary);
                Ok(destination)
            }
            Err(e) => {
                tracing::error!("processing {} failed: {}", self.filename.display(), e);
                self.status = ProcessingStatus::Failure {
                    error: e.to_string(),
                };
                Err(e)
            }
        }
    }
}
