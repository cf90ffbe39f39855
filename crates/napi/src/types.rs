//! NAPI-exposed data structures.

use mdxtidy_core::{BeautifyOptions, FormatWarning};
use napi_derive::napi;
use serde_json::Value as JsonValue;

/// Parsed frontmatter document plus any parser errors.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct FrontmatterResult {
    /// Structured frontmatter data represented as JSON.
    pub frontmatter: JsonValue,
    /// Byte offset where the document body begins.
    pub body_start: u32,
    /// Any syntax or parsing errors surfaced by the extractor.
    pub errors: Vec<String>,
}

/// Formatting options. Omitted fields use the library defaults.
#[napi(object)]
#[derive(Debug, Clone, Default)]
pub struct BeautifyConfig {
    /// Spaces per nesting level for JSX children (default 2).
    pub indent_width: Option<u32>,
    /// Leaves fenced code blocks untouched (default false).
    pub fence_aware: Option<bool>,
}

impl BeautifyConfig {
    pub(crate) fn to_options(&self) -> BeautifyOptions {
        let defaults = BeautifyOptions::default();
        BeautifyOptions {
            indent_width: self
                .indent_width
                .map_or(defaults.indent_width, |width| width as usize),
            fence_aware: self.fence_aware.unwrap_or(defaults.fence_aware),
        }
    }
}

pub(crate) fn resolve_options(config: Option<&BeautifyConfig>) -> BeautifyOptions {
    config.map(BeautifyConfig::to_options).unwrap_or_default()
}

/// A non-fatal problem found while formatting.
#[napi(object)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatWarningEntry {
    /// `unmatched-closing-tag` or `unclosed-tag`.
    pub kind: String,
    /// Tag name involved.
    pub name: String,
    /// 1-indexed line of the offending tag, when known.
    pub line: Option<u32>,
    /// 1-indexed column of the offending tag, when known.
    pub column: Option<u32>,
    /// Human readable description.
    pub message: String,
}

impl From<&FormatWarning> for FormatWarningEntry {
    fn from(warning: &FormatWarning) -> Self {
        let message = warning.to_string();
        match warning {
            FormatWarning::UnmatchedClosingTag { name, location } => Self {
                kind: "unmatched-closing-tag".to_string(),
                name: name.clone(),
                line: Some(location.line as u32),
                column: Some(location.column as u32),
                message,
            },
            FormatWarning::UnclosedTag { name } => Self {
                kind: "unclosed-tag".to_string(),
                name: name.clone(),
                line: None,
                column: None,
                message,
            },
        }
    }
}

/// Output of `beautifyReport`.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct BeautifyReportResult {
    /// Normalized text.
    pub output: String,
    /// Whether the output differs from the input.
    pub changed: bool,
    /// Suspicious markup found while formatting.
    pub warnings: Vec<FormatWarningEntry>,
}
