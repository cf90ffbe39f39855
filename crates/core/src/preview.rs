//! Live-preview compilation.
//!
//! The body is validated with markdown-rs first so syntax errors come back
//! with a location, then compiled to JavaScript with mdxjs-rs.

use crate::error::{SourceLocation, TidyError};
use crate::frontmatter::extract_frontmatter;
use markdown::mdast::Node;
use markdown::message::{Message, Place};
use mdxjs::{JsxRuntime, MdxParseOptions, Options};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Options for preview compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewOptions {
    /// Module providing the automatic JSX runtime.
    #[serde(alias = "jsxImportSource")]
    pub jsx_import_source: Option<String>,
    /// File path used in compiler messages.
    pub filepath: Option<String>,
}

/// A heading in the document outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    /// Heading depth (1-6).
    pub depth: u8,
    /// Plain heading text.
    pub text: String,
}

/// Compiled preview of a document.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewOutput {
    /// Compiled JavaScript module.
    pub code: String,
    /// Front matter as JSON.
    pub frontmatter: JsonValue,
    /// Headings in document order.
    pub outline: Vec<OutlineEntry>,
}

/// Compiles a document (front matter optional) for the live preview.
pub fn compile_preview(source: &str, options: &PreviewOptions) -> Result<PreviewOutput, TidyError> {
    let extraction = extract_frontmatter(source)?;
    let body = &source[extraction.body_start..];
    let line_offset = source[..extraction.body_start].matches('\n').count();

    let root = markdown::to_mdast(body, &validation_options()).map_err(|message| {
        let location = message_location(&message);
        TidyError::Syntax {
            message: message.reason.clone(),
            location: SourceLocation::new(location.line + line_offset, location.column),
        }
    })?;

    let mut outline = Vec::new();
    collect_outline(&root, &mut outline);

    let mdx_options = Options {
        filepath: options.filepath.clone(),
        jsx_runtime: Some(JsxRuntime::Automatic),
        jsx_import_source: options.jsx_import_source.clone(),
        parse: MdxParseOptions::gfm(),
        ..Default::default()
    };
    let code =
        mdxjs::compile(body, &mdx_options).map_err(|err| TidyError::Compile(err.to_string()))?;

    log::debug!(
        "preview: compiled {} bytes of MDX into {} bytes, {} heading(s)",
        body.len(),
        code.len(),
        outline.len()
    );

    Ok(PreviewOutput {
        code,
        frontmatter: extraction.value,
        outline,
    })
}

fn validation_options() -> markdown::ParseOptions {
    let mut constructs = markdown::Constructs::mdx();
    constructs.gfm_autolink_literal = true;
    constructs.gfm_footnote_definition = true;
    constructs.gfm_label_start_footnote = true;
    constructs.gfm_strikethrough = true;
    constructs.gfm_table = true;
    constructs.gfm_task_list_item = true;

    markdown::ParseOptions {
        constructs,
        ..markdown::ParseOptions::default()
    }
}

fn collect_outline(node: &Node, outline: &mut Vec<OutlineEntry>) {
    if let Node::Heading(heading) = node {
        outline.push(OutlineEntry {
            depth: heading.depth,
            text: node.to_string(),
        });
    }
    if let Some(children) = node.children() {
        for child in children {
            collect_outline(child, outline);
        }
    }
}

fn message_location(message: &Message) -> SourceLocation {
    match message.place.as_deref() {
        Some(Place::Point(point)) => SourceLocation::new(point.line, point.column),
        Some(Place::Position(position)) => {
            SourceLocation::new(position.start.line, position.start.column)
        }
        None => SourceLocation::new(1, 1),
    }
}
