//! MDX beautifier: whitespace normalization, heading spacing and JSX re-indentation.
//!
//! The pipeline is a pure `&str -> String` transform that never fails. It is
//! run on demand by the editor's Format action and before every save, so it
//! must be idempotent: `beautify(beautify(s)) == beautify(s)`.
//!
//! Stages, in order:
//!
//! 1. `\r\n` line endings become `\n`.
//! 2. Trailing whitespace is stripped from every line.
//! 3. Runs of three or more newlines collapse to two.
//! 4. ATX headings get a blank line before and after.
//! 5. Lines inside JSX blocks are re-indented from a tag stack.
//! 6. The document ends with exactly one newline.

use crate::code_fence::FenceState;
use crate::error::{FormatDiagnostics, FormatWarning};
use crate::tags::{TagKind, TagStack, is_tracked, opens_component, same_line_pairs, scan_tags};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Options accepted by the beautifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeautifyOptions {
    /// Spaces per JSX nesting level. Values below 1 are treated as 1.
    #[serde(alias = "indentWidth")]
    pub indent_width: usize,
    /// Leave fenced code blocks untouched by heading spacing and re-indentation.
    #[serde(alias = "fenceAware")]
    pub fence_aware: bool,
}

impl BeautifyOptions {
    /// Spaces per nesting level actually applied.
    ///
    /// Nested lines must never land at column 0, where a `#` line would turn
    /// into a heading on the next pass.
    pub fn indent_unit(&self) -> usize {
        self.indent_width.max(1)
    }
}

impl Default for BeautifyOptions {
    fn default() -> Self {
        Self {
            indent_width: 2,
            fence_aware: false,
        }
    }
}

/// Beautifier output together with what it noticed along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeautifyReport {
    /// Normalized text.
    pub output: String,
    /// Whether `output` differs from the input.
    pub changed: bool,
    /// Non-fatal problems found while re-indenting.
    pub diagnostics: FormatDiagnostics,
}

/// Beautifies MDX source with default options.
pub fn beautify(input: &str) -> String {
    beautify_with_options(input, &BeautifyOptions::default())
}

/// Beautifies MDX source.
pub fn beautify_with_options(input: &str, options: &BeautifyOptions) -> String {
    beautify_with_report(input, options).output
}

/// Beautifies MDX source and reports whether anything changed.
pub fn beautify_with_report(input: &str, options: &BeautifyOptions) -> BeautifyReport {
    let text = normalize_line_endings(input);
    let text = strip_trailing_whitespace(&text);
    let text = collapse_blank_runs(&text);
    let text = space_headings(&text, options.fence_aware);
    let (text, diagnostics) = reindent_jsx(&text, options);
    let output = ensure_trailing_newline(&text);

    let changed = output != input;
    log::debug!(
        "beautify: {} -> {} bytes, changed={}, {} warning(s)",
        input.len(),
        output.len(),
        changed,
        diagnostics.len()
    );

    BeautifyReport {
        output,
        changed,
        diagnostics,
    }
}

/// Converts `\r\n` line endings to `\n`.
pub fn normalize_line_endings(input: &str) -> Cow<'_, str> {
    if input.contains("\r\n") {
        Cow::Owned(input.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(input)
    }
}

/// Removes trailing whitespace from every line.
pub fn strip_trailing_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (index, line) in input.split('\n').enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(line.trim_end());
    }
    out
}

/// Collapses runs of three or more newlines into exactly two.
pub fn collapse_blank_runs(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut newlines = 0usize;
    for c in input.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines > 2 {
                continue;
            }
        } else {
            newlines = 0;
        }
        out.push(c);
    }
    out
}

/// Returns the heading depth when the line is an ATX heading (`#` to `######`
/// at column 0, followed by a space).
pub fn atx_heading_depth(line: &str) -> Option<usize> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if (1..=6).contains(&hashes) && line.as_bytes().get(hashes) == Some(&b' ') {
        Some(hashes)
    } else {
        None
    }
}

/// Ensures a blank line before and after every ATX heading.
///
/// No blank line is added after a heading whose next line starts with `#`.
/// Already spaced headings are left as they are.
pub fn space_headings(input: &str, fence_aware: bool) -> String {
    let lines: Vec<&str> = input.split('\n').collect();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + lines.len() / 4);
    let mut fence = FenceState::default();

    for (index, line) in lines.iter().copied().enumerate() {
        let in_fence = fence_aware && fence.advance(line.trim());
        if in_fence || atx_heading_depth(line).is_none() {
            out.push(line);
            continue;
        }

        if out.last().is_some_and(|prev| !prev.is_empty()) {
            out.push("");
        }
        out.push(line);
        if lines
            .get(index + 1)
            .is_some_and(|next| !next.is_empty() && !next.starts_with('#'))
        {
            out.push("");
        }
    }

    out.join("\n")
}

/// Re-indents lines that sit inside JSX blocks.
///
/// Lines outside any open tag pass through untouched unless they start a
/// component (`<` followed by an uppercase letter). Inside a block, every
/// line is trimmed and indented by `indent_width` spaces per open tag.
pub fn reindent_jsx(input: &str, options: &BeautifyOptions) -> (String, FormatDiagnostics) {
    let mut out = String::with_capacity(input.len() + input.len() / 8);
    let mut diagnostics = FormatDiagnostics::new();
    let mut stack = TagStack::new();
    let mut fence = FenceState::default();

    for (index, line) in input.split('\n').enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let trimmed = line.trim();

        if options.fence_aware && fence.advance(trimmed) {
            out.push_str(line);
            continue;
        }
        if trimmed.is_empty() {
            continue;
        }
        if stack.is_empty() && !opens_component(trimmed) {
            out.push_str(line);
            continue;
        }

        let depth_before = stack.depth();
        let tokens = scan_tags(trimmed);
        let paired = same_line_pairs(&tokens);

        for (token, &is_paired) in tokens.iter().zip(&paired) {
            if token.kind != TagKind::Close || !is_tracked(token.name) {
                continue;
            }
            if !stack.close_most_recent(token.name) && !is_paired {
                let lead = line.len() - line.trim_start().len();
                let column = line[..lead + token.start].chars().count() + 1;
                diagnostics.unmatched_closer(token.name, index + 1, column);
            }
        }

        let level = if trimmed.starts_with("</") {
            stack.depth()
        } else {
            depth_before
        };
        out.extend(std::iter::repeat_n(' ', level * options.indent_unit()));
        out.push_str(trimmed);

        for (token, &is_paired) in tokens.iter().zip(&paired) {
            if token.kind == TagKind::Open && !is_paired && is_tracked(token.name) {
                stack.push(token.name);
            }
        }
    }

    for name in stack.open_tags() {
        log::debug!("beautify: <{}> still open at end of document", name);
        diagnostics.push(FormatWarning::UnclosedTag { name: name.clone() });
    }

    (out, diagnostics)
}

/// Trims trailing whitespace from the document and appends a single newline.
pub fn ensure_trailing_newline(input: &str) -> String {
    let trimmed = input.trim_end();
    let mut out = String::with_capacity(trimmed.len() + 1);
    out.push_str(trimmed);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceLocation;

    fn report(input: &str) -> BeautifyReport {
        beautify_with_report(input, &BeautifyOptions::default())
    }

    #[test]
    fn indents_nested_blocks() {
        let input = "<Outer>\n<Inner>\ntext\n</Inner>\n</Outer>";
        assert_eq!(
            beautify(input),
            "<Outer>\n  <Inner>\n    text\n  </Inner>\n</Outer>\n"
        );
    }

    #[test]
    fn self_closing_tag_stays_at_sibling_depth() {
        let result = report("<Outer>\n<Break />\n</Outer>");
        assert_eq!(result.output, "<Outer>\n  <Break />\n</Outer>\n");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn unmatched_closer_is_reported_and_ignored() {
        let input = "<Outer>\n</Phantom>\n<Inner>\ntext\n</Inner>\n</Outer>";
        let result = report(input);
        assert_eq!(
            result.output,
            "<Outer>\n  </Phantom>\n  <Inner>\n    text\n  </Inner>\n</Outer>\n"
        );
        assert_eq!(
            result.diagnostics.warnings,
            vec![FormatWarning::UnmatchedClosingTag {
                name: "Phantom".to_string(),
                location: SourceLocation::new(2, 1),
            }]
        );
    }

    #[test]
    fn closer_outside_any_block_is_plain_text() {
        let input = "</Phantom>\n<Card>\nx\n</Card>\n";
        let result = report(input);
        assert_eq!(result.output, "</Phantom>\n<Card>\n  x\n</Card>\n");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn unclosed_tags_are_reported() {
        let result = report("<Tabs>\n<Tab>\none");
        assert_eq!(result.output, "<Tabs>\n  <Tab>\n    one\n");
        let names: Vec<String> = result
            .diagnostics
            .iter()
            .filter_map(|w| match w {
                FormatWarning::UnclosedTag { name } => Some(name.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["Tabs".to_string(), "Tab".to_string()]);
    }

    #[test]
    fn markdown_only_document_passes_through() {
        let input = "Some *text*\n    indented code\n- item\n  continued\n";
        let result = report(input);
        assert_eq!(result.output, input);
        assert!(!result.changed);
    }

    #[test]
    fn spaces_headings() {
        assert_eq!(
            beautify("# Title\nIntro\n## Section\nBody"),
            "# Title\n\nIntro\n\n## Section\n\nBody\n"
        );
    }

    #[test]
    fn consecutive_headings_get_separated_once() {
        assert_eq!(beautify("# A\n## B\ntext"), "# A\n\n## B\n\ntext\n");
    }

    #[test]
    fn heading_followed_by_hash_line_gets_no_blank_after() {
        assert_eq!(beautify("# A\n#tag\n"), "# A\n#tag\n");
    }

    #[test]
    fn non_headings_are_not_spaced() {
        let seven = "text\n####### seven\nmore\n";
        assert_eq!(beautify(seven), seven);
        let hashtag = "text\n#hashtag\nmore\n";
        assert_eq!(beautify(hashtag), hashtag);
        let indented = "text\n  # indented\nmore\n";
        assert_eq!(beautify(indented), indented);
    }

    #[test]
    fn atx_heading_depth_bounds() {
        assert_eq!(atx_heading_depth("# a"), Some(1));
        assert_eq!(atx_heading_depth("###### a"), Some(6));
        assert_eq!(atx_heading_depth("####### a"), None);
        assert_eq!(atx_heading_depth("#a"), None);
        assert_eq!(atx_heading_depth("#"), None);
    }

    #[test]
    fn collapses_blank_runs() {
        assert_eq!(beautify("a\n\n\n\nb"), "a\n\nb\n");
        assert_eq!(collapse_blank_runs("a\n\n\n\n\nb\n\nc"), "a\n\nb\n\nc");
    }

    #[test]
    fn whitespace_only_lines_count_as_blank() {
        assert_eq!(beautify("a\n  \n\t\n\nb"), "a\n\nb\n");
    }

    #[test]
    fn strips_trailing_whitespace() {
        assert_eq!(strip_trailing_whitespace("a  \nb\t\n c "), "a\nb\n c");
    }

    #[test]
    fn normalizes_crlf() {
        assert_eq!(beautify("a\r\n\r\n\r\n\r\nb\r\n"), "a\n\nb\n");
        assert!(matches!(normalize_line_endings("a\nb"), Cow::Borrowed(_)));
    }

    #[test]
    fn ends_with_single_newline() {
        assert_eq!(beautify("a\n\n\n"), "a\n");
        assert_eq!(beautify("a"), "a\n");
        assert_eq!(beautify(""), "\n");
        assert_eq!(beautify("  \n \n"), "\n");
    }

    #[test]
    fn same_line_pair_does_not_open_a_frame() {
        let input = "<Card>\n<Badge>new</Badge>\ntext\n</Card>";
        let result = report(input);
        assert_eq!(
            result.output,
            "<Card>\n  <Badge>new</Badge>\n  text\n</Card>\n"
        );
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn trailing_closer_keeps_child_depth() {
        assert_eq!(
            beautify("<Card>\nbody</Card>\nafter"),
            "<Card>\n  body</Card>\nafter\n"
        );
    }

    #[test]
    fn indents_table_sections_inside_components() {
        let input = "<Table>\n<thead>\n<tr><th>A</th></tr>\n</thead>\n<tbody>\n<tr><td>1</td></tr>\n</tbody>\n</Table>";
        let expected = "<Table>\n  <thead>\n    <tr><th>A</th></tr>\n  </thead>\n  <tbody>\n    <tr><td>1</td></tr>\n  </tbody>\n</Table>\n";
        assert_eq!(beautify(input), expected);
    }

    #[test]
    fn top_level_html_tables_are_left_alone() {
        let input = "<table>\n<thead>\n<tr></tr>\n</thead>\n</table>\n";
        assert_eq!(beautify(input), input);
    }

    #[test]
    fn closer_removes_most_recent_occurrence_not_top() {
        assert_eq!(
            beautify("<A>\n<B>\n</A>\nx\n</B>"),
            "<A>\n  <B>\n  </A>\n  x\n</B>\n"
        );
    }

    #[test]
    fn resets_existing_indentation_inside_blocks() {
        let input = "<Card>\n        <Inner>\n   deep\n     </Inner>\n</Card>";
        assert_eq!(
            beautify(input),
            "<Card>\n  <Inner>\n    deep\n  </Inner>\n</Card>\n"
        );
    }

    #[test]
    fn prose_around_blocks_is_untouched() {
        let input = "Intro\n\n<Card>\ntext\n</Card>\n\n    Outro";
        assert_eq!(
            beautify(input),
            "Intro\n\n<Card>\n  text\n</Card>\n\n    Outro\n"
        );
    }

    #[test]
    fn headings_inside_blocks_are_spaced_then_indented() {
        let once = beautify("<Card>\n# Title\ntext\n</Card>");
        assert_eq!(once, "<Card>\n\n  # Title\n\n  text\n</Card>\n");
        assert_eq!(beautify(&once), once);
    }

    #[test]
    fn zero_indent_width_still_indents_nested_lines() {
        let options = BeautifyOptions {
            indent_width: 0,
            ..Default::default()
        };
        let once = beautify_with_options("<Card>\n  # T\ntext\n</Card>", &options);
        assert_eq!(once, "<Card>\n # T\n text\n</Card>\n");
        assert_eq!(beautify_with_options(&once, &options), once);
    }

    #[test]
    fn custom_indent_width() {
        let options = BeautifyOptions {
            indent_width: 4,
            ..Default::default()
        };
        assert_eq!(
            beautify_with_options("<A>\n<B>\nx\n</B>\n</A>", &options),
            "<A>\n    <B>\n        x\n    </B>\n</A>\n"
        );
    }

    #[test]
    fn fence_aware_mode_leaves_code_blocks_alone() {
        let input = "<Card>\n```jsx\n<Inner>\n# not a heading\n```\ntext\n</Card>";
        let options = BeautifyOptions {
            fence_aware: true,
            ..Default::default()
        };
        let output = beautify_with_options(input, &options);
        assert_eq!(
            output,
            "<Card>\n```jsx\n<Inner>\n# not a heading\n```\n  text\n</Card>\n"
        );
        assert_eq!(beautify_with_options(&output, &options), output);
        assert_ne!(beautify(input), output);
    }

    #[test]
    fn report_flags_unchanged_input() {
        let formatted = "# Title\n\n<Card>\n  text\n</Card>\n";
        assert!(!report(formatted).changed);
        assert!(report("# Title\ntext").changed);
    }

    #[test]
    fn options_deserialize_from_camel_case() {
        let options: BeautifyOptions =
            serde_json::from_str(r#"{"indentWidth": 3, "fenceAware": true}"#).unwrap();
        assert_eq!(options.indent_width, 3);
        assert!(options.fence_aware);

        let defaults: BeautifyOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults, BeautifyOptions::default());
    }
}
