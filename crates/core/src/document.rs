//! Editable documents: a front matter mapping plus an MDX body.
//!
//! Saved files are the rendered front matter block, a blank line and the
//! beautified body. Only the body is ever beautified.

use crate::beautify::{BeautifyOptions, beautify_with_options};
use crate::error::TidyError;
use crate::frontmatter::{extract_frontmatter, render_frontmatter};
use serde_json::{Map, Value as JsonValue};

/// A document split into front matter and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Front matter mapping (empty when the source had none).
    pub frontmatter: Map<String, JsonValue>,
    /// MDX body following the front matter.
    pub body: String,
}

impl Document {
    /// Creates a document without front matter.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            frontmatter: Map::new(),
            body: body.into(),
        }
    }

    /// Splits source text into front matter and body.
    pub fn parse(source: &str) -> Result<Self, TidyError> {
        let extraction = extract_frontmatter(source)?;
        let frontmatter = match extraction.value {
            JsonValue::Object(map) => map,
            _ => Map::new(),
        };
        let mut body = &source[extraction.body_start..];
        if extraction.body_start > 0 {
            body = body.trim_start_matches(['\r', '\n']);
        }
        Ok(Self {
            frontmatter,
            body: body.to_string(),
        })
    }

    /// Renders the document back to source text.
    pub fn to_source(&self) -> Result<String, TidyError> {
        let block = render_frontmatter(&JsonValue::Object(self.frontmatter.clone()))?;
        if block.is_empty() {
            return Ok(self.body.clone());
        }
        let mut out = String::with_capacity(block.len() + 1 + self.body.len());
        out.push_str(&block);
        out.push('\n');
        out.push_str(&self.body);
        Ok(out)
    }

    /// Beautifies the body in place. Returns whether it changed.
    pub fn canonicalize(&mut self, options: &BeautifyOptions) -> bool {
        let formatted = beautify_with_options(&self.body, options);
        if formatted == self.body {
            return false;
        }
        self.body = formatted;
        true
    }

    /// Reads a front matter field.
    pub fn field(&self, key: &str) -> Option<&JsonValue> {
        self.frontmatter.get(key)
    }

    /// Sets a front matter field, returning the previous value.
    pub fn set_field(&mut self, key: impl Into<String>, value: JsonValue) -> Option<JsonValue> {
        self.frontmatter.insert(key.into(), value)
    }

    /// Removes a front matter field.
    pub fn remove_field(&mut self, key: &str) -> Option<JsonValue> {
        self.frontmatter.remove(key)
    }
}

/// Beautifies the body of a source document, keeping its front matter.
pub fn format_source(source: &str, options: &BeautifyOptions) -> Result<String, TidyError> {
    let mut document = Document::parse(source)?;
    document.canonicalize(options);
    document.to_source()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::FrontmatterError;
    use serde_json::json;

    #[test]
    fn parses_frontmatter_and_body() {
        let doc = Document::parse("---\ntitle: Resume\n---\n\n# Experience\n").unwrap();
        assert_eq!(doc.field("title"), Some(&json!("Resume")));
        assert_eq!(doc.body, "# Experience\n");
    }

    #[test]
    fn source_without_frontmatter_is_all_body() {
        let doc = Document::parse("Hello\n").unwrap();
        assert!(doc.frontmatter.is_empty());
        assert_eq!(doc.to_source().unwrap(), "Hello\n");
    }

    #[test]
    fn renders_block_then_blank_line_then_body() {
        let mut doc = Document::new("Body\n");
        doc.set_field("title", json!("Cover letter"));
        assert_eq!(doc.to_source().unwrap(), "---\ntitle: Cover letter\n---\n\nBody\n");
    }

    #[test]
    fn canonicalize_reports_changes() {
        let mut doc = Document::new("<Card>\ntext\n</Card>");
        assert!(doc.canonicalize(&BeautifyOptions::default()));
        assert_eq!(doc.body, "<Card>\n  text\n</Card>\n");
        assert!(!doc.canonicalize(&BeautifyOptions::default()));
    }

    #[test]
    fn format_source_only_touches_the_body() {
        let source = "---\ntags:\n  - rust\n---\n# Title\nText   \n\n\n\n<Card>\nx\n</Card>";
        let formatted = format_source(source, &BeautifyOptions::default()).unwrap();
        assert_eq!(
            formatted,
            "---\ntags:\n- rust\n---\n\n# Title\n\nText\n\n<Card>\n  x\n</Card>\n"
        );
        assert_eq!(
            format_source(&formatted, &BeautifyOptions::default()).unwrap(),
            formatted
        );
    }

    #[test]
    fn frontmatter_keys_keep_their_written_order() {
        let source = "---\ntitle: Resume\ndate: 2024-01-01\nauthor: me\n---\n\nBody\n";
        assert_eq!(
            format_source(source, &BeautifyOptions::default()).unwrap(),
            source
        );

        let mut doc = Document::parse(source).unwrap();
        doc.set_field("draft", json!(true));
        assert_eq!(
            doc.to_source().unwrap(),
            "---\ntitle: Resume\ndate: 2024-01-01\nauthor: me\ndraft: true\n---\n\nBody\n"
        );
    }

    #[test]
    fn remove_field_drops_the_block_when_empty() {
        let mut doc = Document::parse("---\ndraft: true\n---\nBody\n").unwrap();
        assert_eq!(doc.remove_field("draft"), Some(json!(true)));
        assert_eq!(doc.to_source().unwrap(), "Body\n");
    }

    #[test]
    fn unterminated_frontmatter_is_an_error() {
        let err = Document::parse("---\ntitle: x\nBody").unwrap_err();
        assert!(matches!(
            err,
            TidyError::Frontmatter(FrontmatterError::Unterminated)
        ));
    }
}
