// All core functionality is in fecdir-core
// This CLI acts as a thin wrapper around the core library

// CLI-specific modules
pub mod progress_bar;

// Re-export core types for convenience
pub use fecdir_core::*;

// Re-export CLI utilities
pub use progress_bar::ProgressBarReporter;
