//! Run summaries for terminal output.
//!
//! Formatting lives in one place so the pipeline code stays clean and the
//! output is easy to test.

pub mod format;

pub use format::{format_prepare_summary, format_run_summary};
