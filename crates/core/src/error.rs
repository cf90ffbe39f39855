use crate::frontmatter::FrontmatterError;
use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Location of the first column of a line
    pub fn line_start(line: usize) -> Self {
        Self { line, column: 1 }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors that can occur while loading, previewing or saving a document.
///
/// Formatting itself never fails; see [`FormatWarning`] for the non-fatal
/// problems the beautifier reports.
#[derive(Debug, Error)]
pub enum TidyError {
    /// Front matter could not be extracted or rendered.
    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
    /// markdown-rs rejected the document body.
    #[error("Syntax error at {location}: {message}")]
    Syntax {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// mdxjs-rs failed to compile the document body.
    #[error("MDX compilation error: {0}")]
    Compile(String),
    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TidyError {
    /// Create a syntax error with location
    pub fn syntax(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Syntax {
            message: message.into(),
            location: SourceLocation::new(line, column),
        }
    }
}

/// Non-fatal problems noticed while re-indenting JSX.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatWarning {
    /// A closing tag had no open tag of the same name on the stack.
    UnmatchedClosingTag {
        /// Tag name
        name: String,
        /// Location of the closing tag in the normalized text
        location: SourceLocation,
    },
    /// A tag was still open when the document ended.
    UnclosedTag {
        /// Tag name
        name: String,
    },
}

impl std::fmt::Display for FormatWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatWarning::UnmatchedClosingTag { name, location } => {
                write!(f, "{}: closing tag </{}> has no matching open tag", location, name)
            }
            FormatWarning::UnclosedTag { name } => {
                write!(f, "<{}> is never closed", name)
            }
        }
    }
}

/// Collection of format warnings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatDiagnostics {
    /// Warnings in the order they were found
    pub warnings: Vec<FormatWarning>,
}

impl FormatDiagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning to the collection
    pub fn push(&mut self, warning: FormatWarning) {
        self.warnings.push(warning);
    }

    /// Record a closing tag that matched nothing
    pub fn unmatched_closer(&mut self, name: impl Into<String>, line: usize, column: usize) {
        self.warnings.push(FormatWarning::UnmatchedClosingTag {
            name: name.into(),
            location: SourceLocation::new(line, column),
        });
    }

    /// Check if there are any warnings
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Get total count of warnings
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Iterate over the warnings
    pub fn iter(&self) -> std::slice::Iter<'_, FormatWarning> {
        self.warnings.iter()
    }
}

impl IntoIterator for FormatDiagnostics {
    type Item = FormatWarning;
    type IntoIter = std::vec::IntoIter<FormatWarning>;

    fn into_iter(self) -> Self::IntoIter {
        self.warnings.into_iter()
    }
}
