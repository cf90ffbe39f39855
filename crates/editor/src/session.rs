use crate::config::EditorConfig;
use crate::debounce::Debouncer;
use crate::history::History;
use mdxtidy_core::{
    Document, FormatWarning, PreviewOutput, TidyError, beautify_with_options,
    beautify_with_report, compile_preview,
};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

/// Result of the Format action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatOutcome {
    /// Whether the buffer changed (and the document is now dirty).
    pub changed: bool,
    /// Suspicious markup found while formatting.
    pub warnings: Vec<String>,
}

/// What the Save action hands to the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavePayload {
    /// Front matter block followed by the normalized body.
    pub source: String,
    /// Whether the buffer was reformatted as part of saving.
    pub formatted: bool,
}

/// State of one open document in the editor.
#[derive(Debug, Clone)]
pub struct EditorSession {
    config: EditorConfig,
    frontmatter: Map<String, JsonValue>,
    buffer: String,
    saved_frontmatter: Map<String, JsonValue>,
    saved_body: String,
    history: History,
    preview: Debouncer,
}

impl EditorSession {
    /// Opens a document. The loaded text is the clean baseline.
    pub fn open(source: &str, config: EditorConfig) -> Result<Self, TidyError> {
        let Document { frontmatter, body } = Document::parse(source)?;
        log::debug!(
            "editor: opened document with {} front matter key(s), {} byte body",
            frontmatter.len(),
            body.len()
        );
        Ok(Self {
            history: History::new(config.history_limit),
            preview: Debouncer::new(config.preview_delay_ms),
            saved_frontmatter: frontmatter.clone(),
            saved_body: body.clone(),
            frontmatter,
            buffer: body,
            config,
        })
    }

    /// Replaces the open document with freshly loaded text.
    ///
    /// The history is dropped and any pending preview of the old text is
    /// cancelled. On error the session is left untouched.
    pub fn load(&mut self, source: &str) -> Result<(), TidyError> {
        let Document { frontmatter, body } = Document::parse(source)?;
        self.history.clear();
        self.preview.cancel();
        self.saved_frontmatter = frontmatter.clone();
        self.saved_body = body.clone();
        self.frontmatter = frontmatter;
        self.buffer = body;
        log::debug!("editor: reloaded document, history cleared");
        Ok(())
    }

    /// Current body text.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Current front matter.
    pub fn frontmatter(&self) -> &Map<String, JsonValue> {
        &self.frontmatter
    }

    /// Snapshot of the current document.
    pub fn document(&self) -> Document {
        Document {
            frontmatter: self.frontmatter.clone(),
            body: self.buffer.clone(),
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Whether anything differs from the last save (or the opened text).
    pub fn is_dirty(&self) -> bool {
        self.buffer != self.saved_body || self.frontmatter != self.saved_frontmatter
    }

    /// Whether undo is available.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether redo is available.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Replaces the body with edited text.
    pub fn edit(&mut self, text: impl Into<String>, now_ms: u64) {
        let text = text.into();
        if text == self.buffer {
            return;
        }
        self.replace_buffer(text, now_ms);
    }

    /// Beautifies the body; an actual change is recorded in the history.
    pub fn format(&mut self, now_ms: u64) -> FormatOutcome {
        let report = beautify_with_report(&self.buffer, &self.config.beautify);
        let warnings = report
            .diagnostics
            .iter()
            .map(FormatWarning::to_string)
            .collect();
        if report.changed {
            self.replace_buffer(report.output, now_ms);
        }
        FormatOutcome {
            changed: report.changed,
            warnings,
        }
    }

    /// Builds the persisted payload and marks the session clean.
    ///
    /// With `format_on_save` the body is beautified first, and that change
    /// can be undone like any other.
    pub fn save(&mut self) -> Result<SavePayload, TidyError> {
        let mut formatted = false;
        if self.config.format_on_save {
            let output = beautify_with_options(&self.buffer, &self.config.beautify);
            if output != self.buffer {
                let previous = std::mem::replace(&mut self.buffer, output);
                self.history.record(previous);
                formatted = true;
            }
        }

        let source = self.document().to_source()?;
        self.saved_body = self.buffer.clone();
        self.saved_frontmatter = self.frontmatter.clone();
        log::debug!(
            "editor: saved {} bytes (formatted={})",
            source.len(),
            formatted
        );
        Ok(SavePayload { source, formatted })
    }

    /// Steps back one change. Returns false when there is nothing to undo.
    pub fn undo(&mut self, now_ms: u64) -> bool {
        match self.history.undo(&self.buffer) {
            Some(previous) => {
                self.buffer = previous;
                self.preview.schedule(now_ms);
                true
            }
            None => false,
        }
    }

    /// Re-applies an undone change. Returns false when there is nothing to redo.
    pub fn redo(&mut self, now_ms: u64) -> bool {
        match self.history.redo(&self.buffer) {
            Some(next) => {
                self.buffer = next;
                self.preview.schedule(now_ms);
                true
            }
            None => false,
        }
    }

    /// Sets a front matter field, returning the previous value.
    pub fn set_frontmatter_field(
        &mut self,
        key: impl Into<String>,
        value: JsonValue,
        now_ms: u64,
    ) -> Option<JsonValue> {
        self.preview.schedule(now_ms);
        self.frontmatter.insert(key.into(), value)
    }

    /// Removes a front matter field.
    pub fn remove_frontmatter_field(&mut self, key: &str, now_ms: u64) -> Option<JsonValue> {
        let removed = self.frontmatter.remove(key);
        if removed.is_some() {
            self.preview.schedule(now_ms);
        }
        removed
    }

    /// Asks for a preview as soon as the debounce delay allows.
    pub fn request_preview(&mut self, now_ms: u64) {
        self.preview.schedule(now_ms);
    }

    /// Whether a preview compilation is waiting for its deadline.
    pub fn preview_pending(&self) -> bool {
        self.preview.is_pending()
    }

    /// Compiles the preview once the quiet period since the last change is over.
    ///
    /// Returns `None` while nothing is due.
    pub fn poll_preview(&mut self, now_ms: u64) -> Option<Result<PreviewOutput, TidyError>> {
        if !self.preview.fire_if_due(now_ms) {
            return None;
        }
        let result = self
            .document()
            .to_source()
            .and_then(|source| compile_preview(&source, &self.config.preview));
        if let Err(err) = &result {
            log::debug!("editor: preview failed: {}", err);
        }
        Some(result)
    }

    fn replace_buffer(&mut self, text: String, now_ms: u64) {
        let previous = std::mem::replace(&mut self.buffer, text);
        self.history.record(previous);
        self.preview.schedule(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session(source: &str) -> EditorSession {
        EditorSession::open(source, EditorConfig::default()).expect("document should open")
    }

    #[test]
    fn opened_document_is_clean() {
        let editor = session("---\ntitle: Post\n---\nBody\n");
        assert!(!editor.is_dirty());
        assert_eq!(editor.text(), "Body\n");
        assert_eq!(editor.frontmatter()["title"], json!("Post"));
    }

    #[test]
    fn edits_mark_dirty_and_can_be_undone() {
        let mut editor = session("Body\n");
        editor.edit("Body changed\n", 0);
        assert!(editor.is_dirty());

        assert!(editor.undo(10));
        assert_eq!(editor.text(), "Body\n");
        assert!(!editor.is_dirty());

        assert!(editor.redo(20));
        assert_eq!(editor.text(), "Body changed\n");
        assert!(!editor.redo(30));
    }

    #[test]
    fn identical_edit_is_ignored() {
        let mut editor = session("Body\n");
        editor.edit("Body\n", 0);
        assert!(!editor.can_undo());
        assert!(!editor.preview_pending());
    }

    #[test]
    fn format_records_history_only_when_changed() {
        let mut editor = session("<Card>\ntext\n</Card>");
        let outcome = editor.format(0);
        assert!(outcome.changed);
        assert!(outcome.warnings.is_empty());
        assert_eq!(editor.text(), "<Card>\n  text\n</Card>\n");
        assert!(editor.is_dirty());

        let again = editor.format(5);
        assert!(!again.changed);

        assert!(editor.undo(10));
        assert_eq!(editor.text(), "<Card>\ntext\n</Card>");
        assert!(!editor.can_undo());
    }

    #[test]
    fn format_surfaces_warnings() {
        let mut editor = session("<Card>\ntext\n");
        let outcome = editor.format(0);
        assert_eq!(outcome.warnings, vec!["<Card> is never closed".to_string()]);
    }

    #[test]
    fn save_formats_then_marks_clean() {
        let mut editor = session("---\ntitle: Post\n---\n# Title\ntext");
        let payload = editor.save().unwrap();

        assert!(payload.formatted);
        assert_eq!(payload.source, "---\ntitle: Post\n---\n\n# Title\n\ntext\n");
        assert!(!editor.is_dirty());

        assert!(editor.undo(0));
        assert!(editor.is_dirty());
    }

    #[test]
    fn save_without_format_on_save_keeps_buffer() {
        let config = EditorConfig {
            format_on_save: false,
            ..Default::default()
        };
        let mut editor = EditorSession::open("# Title\ntext", config).unwrap();
        let payload = editor.save().unwrap();
        assert!(!payload.formatted);
        assert_eq!(payload.source, "# Title\ntext");
    }

    #[test]
    fn frontmatter_changes_make_the_document_dirty() {
        let mut editor = session("Body\n");
        editor.set_frontmatter_field("draft", json!(true), 0);
        assert!(editor.is_dirty());

        let payload = editor.save().unwrap();
        assert_eq!(payload.source, "---\ndraft: true\n---\n\nBody\n");
        assert!(!editor.is_dirty());

        assert_eq!(editor.remove_frontmatter_field("draft", 5), Some(json!(true)));
        assert!(editor.is_dirty());
    }

    #[test]
    fn load_resets_history_and_pending_preview() {
        let mut editor = session("Body\n");
        editor.edit("Body changed\n", 0);
        assert!(editor.preview_pending());

        editor.load("---\ntitle: Other\n---\nOther body\n").unwrap();
        assert_eq!(editor.text(), "Other body\n");
        assert!(!editor.is_dirty());
        assert!(!editor.can_undo());
        assert!(!editor.preview_pending());
        assert!(editor.poll_preview(u64::MAX).is_none());
    }

    #[test]
    fn failed_load_keeps_the_current_document() {
        let mut editor = session("Body\n");
        editor.edit("Body changed\n", 0);
        assert!(editor.load("---\nbroken: true\n").is_err());
        assert_eq!(editor.text(), "Body changed\n");
        assert!(editor.can_undo());
    }

    #[test]
    fn preview_waits_for_quiet_period() {
        let mut editor = session("# Hello\n");
        assert!(editor.poll_preview(1_000).is_none());

        editor.edit("# Hello\n\nWorld\n", 1_000);
        editor.edit("# Hello\n\nWorld!\n", 1_200);
        assert!(editor.poll_preview(1_500).is_none());

        let output = editor.poll_preview(1_600).expect("preview due").unwrap();
        assert_eq!(output.outline.len(), 1);
        assert!(editor.poll_preview(5_000).is_none());
    }

    #[test]
    fn preview_errors_are_returned_not_panicked() {
        let mut editor = session("ok\n");
        editor.edit("<Card>\nunclosed\n", 0);
        let result = editor.poll_preview(10_000).expect("preview due");
        assert!(matches!(result, Err(TidyError::Syntax { .. })));
    }
}
