use mdxtidy_core::{BeautifyOptions, PreviewOptions};
use mdxtidy_editor::{EditorConfig, EditorSession};
use serde::Serialize;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

// ============================================================================
// Config
// ============================================================================

/// Configuration accepted by every WASM entry point.
///
/// Unknown or malformed configs fall back to defaults rather than failing,
/// so a stale editor build never blocks formatting.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct WasmConfig {
    /// Spaces per JSX nesting level.
    #[serde(default, alias = "indentWidth")]
    pub indent_width: Option<usize>,
    /// Leave fenced code blocks untouched.
    #[serde(default, alias = "fenceAware")]
    pub fence_aware: Option<bool>,
    /// Module providing the JSX runtime for previews.
    #[serde(default, alias = "jsxImportSource")]
    pub jsx_import_source: Option<String>,
    /// File path used in preview error messages.
    #[serde(default)]
    pub filepath: Option<String>,
    /// Maximum undo steps kept by the editor.
    #[serde(default, alias = "historyLimit")]
    pub history_limit: Option<usize>,
    /// Quiet period before a preview compiles.
    #[serde(default, alias = "previewDelayMs")]
    pub preview_delay_ms: Option<u64>,
    /// Beautify the body before each save.
    #[serde(default, alias = "formatOnSave")]
    pub format_on_save: Option<bool>,
}

fn parse_config(config: JsValue) -> WasmConfig {
    if config.is_undefined() || config.is_null() {
        return WasmConfig::default();
    }
    serde_wasm_bindgen::from_value(config).unwrap_or_default()
}

fn build_beautify_options(cfg: &WasmConfig) -> BeautifyOptions {
    let defaults = BeautifyOptions::default();
    BeautifyOptions {
        indent_width: cfg.indent_width.unwrap_or(defaults.indent_width),
        fence_aware: cfg.fence_aware.unwrap_or(defaults.fence_aware),
    }
}

fn build_preview_options(cfg: &WasmConfig) -> PreviewOptions {
    PreviewOptions {
        jsx_import_source: cfg.jsx_import_source.clone(),
        filepath: cfg.filepath.clone(),
    }
}

fn build_editor_config(cfg: &WasmConfig) -> EditorConfig {
    let defaults = EditorConfig::default();
    EditorConfig {
        history_limit: cfg.history_limit.unwrap_or(defaults.history_limit),
        preview_delay_ms: cfg.preview_delay_ms.unwrap_or(defaults.preview_delay_ms),
        format_on_save: cfg.format_on_save.unwrap_or(defaults.format_on_save),
        beautify: build_beautify_options(cfg),
        preview: build_preview_options(cfg),
    }
}

/// Serializes plain objects (not JS `Map`s) so results read naturally in JS.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Millisecond timestamp from the caller, or the current time.
fn timestamp(now_ms: Option<f64>) -> u64 {
    let now = now_ms.unwrap_or_else(js_sys::Date::now);
    if now.is_finite() && now > 0.0 {
        now as u64
    } else {
        0
    }
}

// ============================================================================
// Formatting API
// ============================================================================

/// Result of `beautifyReport`.
#[derive(Debug, Clone, Serialize)]
pub struct BeautifyResult {
    /// Normalized text.
    pub output: String,
    /// Whether the output differs from the input.
    pub changed: bool,
    /// Suspicious markup found while formatting.
    pub warnings: Vec<String>,
}

/// Beautifies MDX source text. Never fails.
#[wasm_bindgen]
pub fn beautify(source: &str, config: JsValue) -> String {
    let cfg = parse_config(config);
    mdxtidy_core::beautify_with_options(source, &build_beautify_options(&cfg))
}

/// Beautifies MDX source and reports whether it changed, plus any warnings.
#[wasm_bindgen(js_name = beautifyReport)]
pub fn beautify_report(source: &str, config: JsValue) -> Result<JsValue, JsError> {
    let cfg = parse_config(config);
    let report = mdxtidy_core::beautify_with_report(source, &build_beautify_options(&cfg));
    to_js(&BeautifyResult {
        changed: report.changed,
        warnings: report.diagnostics.iter().map(ToString::to_string).collect(),
        output: report.output,
    })
}

/// Beautifies the body of a document while keeping its front matter.
#[wasm_bindgen(js_name = formatDocument)]
pub fn format_document(source: &str, config: JsValue) -> Result<String, JsError> {
    let cfg = parse_config(config);
    mdxtidy_core::format_source(source, &build_beautify_options(&cfg))
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Compiles a document for the live preview.
///
/// Returns `{ code, frontmatter, outline }`.
#[wasm_bindgen(js_name = compilePreview)]
pub fn compile_preview(source: &str, config: JsValue) -> Result<JsValue, JsError> {
    let cfg = parse_config(config);
    let output = mdxtidy_core::compile_preview(source, &build_preview_options(&cfg))
        .map_err(|e| JsError::new(&e.to_string()))?;
    to_js(&output)
}

// ============================================================================
// Editor API
// ============================================================================

/// An open document in the browser editor.
#[wasm_bindgen]
pub struct Editor {
    session: EditorSession,
}

#[wasm_bindgen]
impl Editor {
    /// Opens a document (front matter optional).
    #[wasm_bindgen(constructor)]
    pub fn new(source: &str, config: JsValue) -> Result<Editor, JsError> {
        let cfg = parse_config(config);
        let session = EditorSession::open(source, build_editor_config(&cfg))
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Editor { session })
    }

    /// Replaces the open document, dropping history and any pending preview.
    pub fn load(&mut self, source: &str) -> Result<(), JsError> {
        self.session
            .load(source)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Current body text.
    pub fn text(&self) -> String {
        self.session.text().to_string()
    }

    /// Replaces the body after a user edit.
    pub fn edit(&mut self, text: String, now_ms: Option<f64>) {
        self.session.edit(text, timestamp(now_ms));
    }

    /// Runs the Format action. Returns `{ changed, warnings }`.
    pub fn format(&mut self, now_ms: Option<f64>) -> Result<JsValue, JsError> {
        let outcome = self.session.format(timestamp(now_ms));
        to_js(&outcome)
    }

    /// Runs the Save action and returns the text to persist.
    pub fn save(&mut self) -> Result<String, JsError> {
        self.session
            .save()
            .map(|payload| payload.source)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Undoes one change.
    pub fn undo(&mut self, now_ms: Option<f64>) -> bool {
        self.session.undo(timestamp(now_ms))
    }

    /// Redoes one change.
    pub fn redo(&mut self, now_ms: Option<f64>) -> bool {
        self.session.redo(timestamp(now_ms))
    }

    /// Whether there are unsaved changes.
    #[wasm_bindgen(js_name = isDirty)]
    pub fn is_dirty(&self) -> bool {
        self.session.is_dirty()
    }

    /// Sets a front matter field.
    #[wasm_bindgen(js_name = setField)]
    pub fn set_field(&mut self, key: String, value: JsValue, now_ms: Option<f64>) -> Result<(), JsError> {
        let value: serde_json::Value = serde_wasm_bindgen::from_value(value)
            .map_err(|e| JsError::new(&format!("Invalid field value: {}", e)))?;
        self.session
            .set_frontmatter_field(key, value, timestamp(now_ms));
        Ok(())
    }

    /// Compiles the preview when its debounce delay has passed.
    ///
    /// Returns `undefined` while nothing is due.
    #[wasm_bindgen(js_name = pollPreview)]
    pub fn poll_preview(&mut self, now_ms: Option<f64>) -> Result<JsValue, JsError> {
        match self.session.poll_preview(timestamp(now_ms)) {
            None => Ok(JsValue::UNDEFINED),
            Some(Ok(output)) => to_js(&output),
            Some(Err(e)) => Err(JsError::new(&e.to_string())),
        }
    }
}
