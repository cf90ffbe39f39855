#![deny(missing_docs)]
//! Node.js bindings that surface mdxtidy's Rust implementation.

use mdxtidy_core::{
    BeautifyOptions, Document, TidyError, beautify_with_options, beautify_with_report,
    extract_frontmatter, format_source,
};
use napi_derive::napi;
use serde_json::Value as JsonValue;

/// Batch processing types.
pub mod batch;
/// NAPI-exposed data structures.
pub mod types;
pub use batch::*;
pub use types::*;

fn to_napi_error(context: &str, err: TidyError) -> napi::Error {
    napi::Error::from_reason(format!("{}: {}", context, err))
}

/// Beautifies MDX source text. Never fails.
#[napi(js_name = "beautify")]
pub fn beautify(source: String, options: Option<BeautifyConfig>) -> String {
    beautify_with_options(&source, &resolve_options(options.as_ref()))
}

/// Beautifies MDX source and reports whether it changed, plus any warnings.
#[napi(js_name = "beautifyReport")]
pub fn beautify_report(source: String, options: Option<BeautifyConfig>) -> BeautifyReportResult {
    let report = beautify_with_report(&source, &resolve_options(options.as_ref()));
    BeautifyReportResult {
        changed: report.changed,
        warnings: report.diagnostics.iter().map(FormatWarningEntry::from).collect(),
        output: report.output,
    }
}

/// Beautifies a document body, keeping its YAML front matter.
#[napi(js_name = "formatDocument")]
pub fn format_document(source: String, options: Option<BeautifyConfig>) -> napi::Result<String> {
    format_source(&source, &resolve_options(options.as_ref()))
        .map_err(|e| to_napi_error("Failed to format document", e))
}

/// Extracts YAML frontmatter without touching the body.
#[napi(js_name = "parseFrontmatter")]
pub fn parse_frontmatter(content: String) -> napi::Result<FrontmatterResult> {
    match extract_frontmatter(&content) {
        Ok(result) => Ok(FrontmatterResult {
            frontmatter: result.value,
            body_start: result.body_start as u32,
            errors: Vec::new(),
        }),
        Err(err) => Ok(FrontmatterResult {
            frontmatter: JsonValue::Object(Default::default()),
            body_start: 0,
            errors: vec![err.to_string()],
        }),
    }
}

struct Formatted {
    output: String,
    changed: bool,
    warnings: Vec<FormatWarningEntry>,
}

fn format_input(
    source: &str,
    options: &BeautifyOptions,
    documents: bool,
) -> Result<Formatted, TidyError> {
    if !documents {
        let report = beautify_with_report(source, options);
        return Ok(Formatted {
            changed: report.changed,
            warnings: report.diagnostics.iter().map(FormatWarningEntry::from).collect(),
            output: report.output,
        });
    }

    let mut document = Document::parse(source)?;
    let report = beautify_with_report(&document.body, options);
    let warnings = report.diagnostics.iter().map(FormatWarningEntry::from).collect();
    document.body = report.output;
    let output = document.to_source()?;
    Ok(Formatted {
        changed: output != source,
        warnings,
        output,
    })
}

/// Formats multiple files in parallel.
///
/// Results come back in input order. With `continueOnError: false` files are
/// processed one at a time and processing stops after the first failure.
///
/// # Example (JavaScript)
///
/// ```javascript
/// const { beautifyBatch } = require('mdxtidy-napi');
///
/// const result = beautifyBatch(
///   [{ id: 'a.mdx', source: '<Card>\ntext\n</Card>' }],
///   { maxThreads: 4, config: { indentWidth: 2 } },
/// );
/// console.log(`${result.stats.changed}/${result.stats.total} changed`);
/// ```
#[napi(js_name = "beautifyBatch")]
pub fn beautify_batch(
    inputs: Vec<BatchInput>,
    options: Option<BatchOptions>,
) -> napi::Result<BatchProcessingResult> {
    use rayon::prelude::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Instant;

    let start = Instant::now();
    let opts = options.unwrap_or_default();
    let continue_on_error = opts.continue_on_error.unwrap_or(true);
    let documents = opts.documents.unwrap_or(true);
    let beautify_options = resolve_options(opts.config.as_ref());

    let pool = match opts.max_threads {
        Some(max_threads) => Some(
            rayon::ThreadPoolBuilder::new()
                .num_threads(max_threads as usize)
                .build()
                .map_err(|e| napi::Error::from_reason(format!("Failed to build thread pool: {}", e)))?,
        ),
        None => None,
    };

    let total = inputs.len() as u32;
    let changed = AtomicU32::new(0);
    let failed = AtomicU32::new(0);

    let process_input = |input: BatchInput| -> BatchResult {
        match format_input(&input.source, &beautify_options, documents) {
            Ok(formatted) => {
                if formatted.changed {
                    changed.fetch_add(1, Ordering::Relaxed);
                }
                BatchResult {
                    id: input.id,
                    output: Some(formatted.output),
                    changed: formatted.changed,
                    warnings: formatted.warnings,
                    error: None,
                }
            }
            Err(e) => {
                failed.fetch_add(1, Ordering::Relaxed);
                log::warn!("beautifyBatch: {} failed: {}", input.id, e);
                BatchResult {
                    id: input.id,
                    output: None,
                    changed: false,
                    warnings: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    };

    let results: Vec<BatchResult> = if continue_on_error {
        match &pool {
            Some(pool) => pool.install(|| inputs.into_par_iter().map(process_input).collect()),
            None => inputs.into_par_iter().map(process_input).collect(),
        }
    } else {
        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            let result = process_input(input);
            let stop = result.error.is_some();
            results.push(result);
            if stop {
                break;
            }
        }
        results
    };

    let elapsed = start.elapsed();
    log::debug!(
        "beautifyBatch: {} file(s) in {:.2}ms",
        results.len(),
        elapsed.as_secs_f64() * 1000.0
    );

    Ok(BatchProcessingResult {
        results,
        stats: BatchStats {
            total,
            changed: changed.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
            processing_time_ms: elapsed.as_secs_f64() * 1000.0,
        },
    })
}
