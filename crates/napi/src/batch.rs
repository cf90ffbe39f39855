//! Batch processing types for parallel formatting.

use crate::types::{BeautifyConfig, FormatWarningEntry};
use napi_derive::napi;

/// Input for batch processing - represents a single file to format.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BatchInput {
    /// File identifier (typically the file path).
    pub id: String,
    /// MDX source content.
    pub source: String,
}

/// Result for a single file in a batch.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// File identifier matching the input.
    pub id: String,
    /// Formatted text (present on success).
    pub output: Option<String>,
    /// Whether formatting changed the file.
    pub changed: bool,
    /// Formatting warnings for this file.
    pub warnings: Vec<FormatWarningEntry>,
    /// Error message (present on failure).
    pub error: Option<String>,
}

/// Statistics for batch processing.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BatchStats {
    /// Total number of files submitted.
    pub total: u32,
    /// Number of files whose text changed.
    pub changed: u32,
    /// Number of files that could not be formatted.
    pub failed: u32,
    /// Total processing time in milliseconds.
    pub processing_time_ms: f64,
}

/// Options for batch processing.
#[napi(object)]
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Maximum number of threads to use. Defaults to number of CPU cores.
    pub max_threads: Option<u32>,
    /// Whether to continue processing after an error. Defaults to true.
    pub continue_on_error: Option<bool>,
    /// Treats inputs as documents whose front matter must parse. Defaults to true.
    pub documents: Option<bool>,
    /// Formatting options used for all files.
    pub config: Option<BeautifyConfig>,
}

/// Result of batch processing containing all results and statistics.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BatchProcessingResult {
    /// Individual results, in input order.
    pub results: Vec<BatchResult>,
    /// Processing statistics.
    pub stats: BatchStats,
}
