// fecdir Core Library
//
// Extracts company records from text dumps of a printed business directory.
// Page sources feed the record pipeline; the processor writes the result.

pub mod types;
pub mod error;
pub mod config;
pub mod text;
pub mod classifier;
pub mod state;
pub mod fields;
pub mod segmenter;
pub mod assembler;
pub mod orchestrator;
pub mod sources;
pub mod sink;
pub mod progress;
pub mod processor;

// Re-export main types and functions for easy use
pub use types::*;
pub use error::ExtractionError;
pub use config::{ExtractionConfig, OutputConfig, OutputNaming, Vocabulary, DEFAULT_VOCABULARY};
pub use orchestrator::{DirectoryExtractor, ExtractionOutput, PageRecordExtractor};
pub use sources::{open_source, MemorySource, PageSource};
pub use sink::{JsonLinesSink, RecordSink};
pub use progress::{LogReporter, NoopReporter, ProgressReporter};
pub use processor::{DirectoryProcessor, StepProfiler};
