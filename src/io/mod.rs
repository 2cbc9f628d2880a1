/// Command-line argument parsing and dispatch
pub mod cli;
/// Defaults and limits
pub mod configuration;
/// Error types
pub mod error;
/// External solver execution and per-case evaluation
pub mod harness;
/// Instance files and batch generation
pub mod instance;
/// Progress display for batches
pub mod progress;
/// JSON benchmark report
pub mod report;
