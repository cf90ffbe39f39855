#![deny(missing_docs)]
//! mdxtidy core: MDX beautifier, front matter, documents and preview compilation.

/// MDX beautifier (whitespace, headings, JSX indentation).
pub mod beautify;
/// Code fence tracking for fence-aware formatting.
pub mod code_fence;
/// Documents split into front matter and body.
pub mod document;
/// Core error and diagnostic types.
pub mod error;
/// YAML frontmatter extraction and rendering.
pub mod frontmatter;
/// Live-preview compilation using mdxjs-rs.
pub mod preview;
/// Line-level JSX tag scanning.
pub mod tags;

pub use beautify::{
    BeautifyOptions, BeautifyReport, beautify, beautify_with_options, beautify_with_report,
};
pub use code_fence::{FencePhase, FenceState};
pub use document::{Document, format_source};
pub use error::{FormatDiagnostics, FormatWarning, SourceLocation, TidyError};
pub use frontmatter::{
    FrontmatterError, FrontmatterExtraction, extract_frontmatter, render_frontmatter,
};
pub use preview::{OutlineEntry, PreviewOptions, PreviewOutput, compile_preview};
pub use tags::{TagKind, TagStack, TagToken, scan_tags};
