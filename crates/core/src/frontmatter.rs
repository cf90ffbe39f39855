//! YAML front matter extraction and rendering.

use serde_json::Value as JsonValue;
use thiserror::Error;

const FENCE: &str = "---";

/// Result returned after extracting frontmatter from a Markdown document.
#[derive(Debug)]
pub struct FrontmatterExtraction {
    /// Parsed frontmatter as a JSON value.
    pub value: JsonValue,
    /// Byte offset inside the original document where Markdown content begins.
    pub body_start: usize,
}

impl FrontmatterExtraction {
    fn empty() -> Self {
        Self {
            value: JsonValue::Object(Default::default()),
            body_start: 0,
        }
    }
}

/// Errors emitted while parsing or extracting frontmatter.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// Unclosed YAML fence (e.g., missing terminating `---`).
    #[error("Unterminated YAML frontmatter block: expected closing '---'")]
    Unterminated,
    /// YAML failed to parse.
    #[error("Frontmatter parse error: {0}")]
    Parse(String),
    /// Top-level YAML node was not a mapping.
    #[error("Frontmatter must be a YAML mapping at the top level")]
    InvalidRootType,
    /// Front matter could not be serialized back to YAML.
    #[error("Frontmatter render error: {0}")]
    Render(String),
}

/// Extracts YAML frontmatter from an input document.
pub fn extract_frontmatter(input: &str) -> Result<FrontmatterExtraction, FrontmatterError> {
    match find_yaml_block(input)? {
        Some((block, body_start)) => {
            let value = parse_yaml_block(block)?;
            Ok(FrontmatterExtraction { value, body_start })
        }
        None => Ok(FrontmatterExtraction::empty()),
    }
}

/// Renders a front matter mapping as a fenced YAML block ending in a newline.
///
/// An empty mapping renders as the empty string, so documents without front
/// matter stay without it.
pub fn render_frontmatter(value: &JsonValue) -> Result<String, FrontmatterError> {
    let map = match value {
        JsonValue::Object(map) => map,
        JsonValue::Null => return Ok(String::new()),
        _ => return Err(FrontmatterError::InvalidRootType),
    };
    if map.is_empty() {
        return Ok(String::new());
    }

    let yaml = serde_yaml::to_string(map).map_err(|err| FrontmatterError::Render(err.to_string()))?;
    let mut block = String::with_capacity(yaml.len() + 2 * FENCE.len() + 2);
    block.push_str(FENCE);
    block.push('\n');
    block.push_str(&yaml);
    if !yaml.ends_with('\n') {
        block.push('\n');
    }
    block.push_str(FENCE);
    block.push('\n');
    Ok(block)
}

fn parse_yaml_block(block: &str) -> Result<JsonValue, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(JsonValue::Object(Default::default()));
    }

    let yaml_value: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|err| FrontmatterError::Parse(err.to_string()))?;
    let json_value =
        serde_json::to_value(yaml_value).map_err(|err| FrontmatterError::Parse(err.to_string()))?;

    match json_value {
        JsonValue::Null => Ok(JsonValue::Object(Default::default())),
        JsonValue::Object(_) => Ok(json_value),
        _ => Err(FrontmatterError::InvalidRootType),
    }
}

fn find_yaml_block(input: &str) -> Result<Option<(&str, usize)>, FrontmatterError> {
    let (text, bom_len) = match input.strip_prefix('\u{feff}') {
        Some(stripped) => (stripped, '\u{feff}'.len_utf8()),
        None => (input, 0),
    };
    let mut lines = lines_with_offsets(text).skip_while(|(_, line, _)| line.trim().is_empty());

    let Some((_, opener, block_start)) = lines.next() else {
        return Ok(None);
    };
    if !is_yaml_fence(opener) {
        return Ok(None);
    }

    for (line_start, line, line_end) in lines {
        if is_yaml_fence(line) {
            let block = text[block_start..line_start].trim_end_matches(['\r', '\n']);
            return Ok(Some((block, bom_len + line_end)));
        }
    }
    Err(FrontmatterError::Unterminated)
}

/// Yields `(start, line, end)` where `line` excludes the newline and `end`
/// is the offset of the next line.
fn lines_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str, usize)> {
    text.split_inclusive('\n').scan(0usize, |offset, raw| {
        let start = *offset;
        *offset += raw.len();
        Some((start, raw.strip_suffix('\n').unwrap_or(raw), *offset))
    })
}

fn is_yaml_fence(line: &str) -> bool {
    line.trim_end_matches('\r') == FENCE
}
