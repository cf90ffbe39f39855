//! Line-level JSX tag scanning and the open-tag stack.
//!
//! The scanner is a heuristic, not a JSX parser. It only looks at one line at
//! a time, so an opening tag whose `>` sits on a later line is not recognised,
//! and a `>` inside an attribute value ends the tag early.

/// Lowercase HTML tags that are tracked like components.
const TRACKED_HTML_TAGS: &[&str] = &["thead", "tbody"];

/// Kind of tag found on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<Name ...>`
    Open,
    /// `</Name>`
    Close,
    /// `<Name ... />`
    SelfClosing,
}

/// A tag found by [`scan_tags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagToken<'a> {
    /// Tag name as written.
    pub name: &'a str,
    /// Open, close or self-closing.
    pub kind: TagKind,
    /// Byte offset of the `<`.
    pub start: usize,
    /// Byte offset one past the `>`.
    pub end: usize,
}

/// Returns true when the name takes part in indentation tracking.
///
/// Capitalized names are components; `thead` and `tbody` are the only
/// lowercase tags tracked, so simple HTML tables inside MDX indent too.
pub fn is_tracked(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase()) || TRACKED_HTML_TAGS.contains(&name)
}

/// Returns true when a trimmed line starts with `<` followed by an uppercase letter.
pub fn opens_component(trimmed: &str) -> bool {
    let bytes = trimmed.as_bytes();
    bytes.len() >= 2 && bytes[0] == b'<' && bytes[1].is_ascii_uppercase()
}

/// Scans a single line for tags, left to right, without overlaps.
pub fn scan_tags(line: &str) -> Vec<TagToken<'_>> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = line[cursor..].find('<') {
        let start = cursor + offset;
        let parsed = if bytes.get(start + 1) == Some(&b'/') {
            scan_closing(line, start)
        } else {
            scan_opening(line, start)
        };

        match parsed {
            Some(token) => {
                cursor = token.end;
                tokens.push(token);
            }
            None => cursor = start + 1,
        }
    }

    tokens
}

/// Pairs each opening tag with a later closing tag of the same name on the line.
///
/// Returns, per token index, whether the token takes part in a same-line pair.
pub fn same_line_pairs(tokens: &[TagToken<'_>]) -> Vec<bool> {
    let mut paired = vec![false; tokens.len()];
    for (i, token) in tokens.iter().enumerate() {
        if token.kind != TagKind::Open {
            continue;
        }
        let closer = tokens
            .iter()
            .enumerate()
            .skip(i + 1)
            .find(|(j, other)| {
                !paired[*j] && other.kind == TagKind::Close && other.name == token.name
            })
            .map(|(j, _)| j);
        if let Some(j) = closer {
            paired[i] = true;
            paired[j] = true;
        }
    }
    paired
}

fn scan_closing(line: &str, start: usize) -> Option<TagToken<'_>> {
    let name_start = start + 2;
    let name_end = name_start + name_len(&line[name_start..])?;
    let rest = &line[name_end..];
    let after_ws = rest.trim_start();
    if !after_ws.starts_with('>') {
        return None;
    }
    let end = name_end + (rest.len() - after_ws.len()) + 1;
    Some(TagToken {
        name: &line[name_start..name_end],
        kind: TagKind::Close,
        start,
        end,
    })
}

fn scan_opening(line: &str, start: usize) -> Option<TagToken<'_>> {
    let name_start = start + 1;
    let name_end = name_start + name_len(&line[name_start..])?;
    let next = line[name_end..].chars().next()?;
    if !(next.is_whitespace() || next == '>' || next == '/') {
        return None;
    }
    let close = name_end + line[name_end..].find('>')?;
    let kind = if line[..close].ends_with('/') {
        TagKind::SelfClosing
    } else {
        TagKind::Open
    };
    Some(TagToken {
        name: &line[name_start..name_end],
        kind,
        start,
        end: close + 1,
    })
}

/// Length of a tag name at the start of `rest`: an ASCII letter followed by
/// ASCII alphanumerics, `.` or `_`.
fn name_len(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    if !bytes.first()?.is_ascii_alphabetic() {
        return None;
    }
    let len = bytes
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'.' || **b == b'_')
        .count();
    Some(len)
}

/// Ordered list of currently open tag names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagStack {
    frames: Vec<String>,
}

impl TagStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a tag.
    pub fn push(&mut self, name: &str) {
        self.frames.push(name.to_string());
    }

    /// Removes the most recently pushed occurrence of `name`, wherever it is.
    ///
    /// This is not strict LIFO: `<A><B></A>` leaves `B` open. Returns false
    /// when no tag of that name is open.
    pub fn close_most_recent(&mut self, name: &str) -> bool {
        match self.frames.iter().rposition(|frame| frame == name) {
            Some(index) => {
                self.frames.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of open tags.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// True when nothing is open.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Open tags, outermost first.
    pub fn open_tags(&self) -> &[String] {
        &self.frames
    }
}
