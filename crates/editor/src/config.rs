use mdxtidy_core::{BeautifyOptions, PreviewOptions, TidyError};
use serde::{Deserialize, Serialize};

const DEFAULT_HISTORY_LIMIT: usize = 100;
const DEFAULT_PREVIEW_DELAY_MS: u64 = 400;

/// Configuration for an [`EditorSession`](crate::EditorSession).
///
/// Accepts both snake_case and camelCase keys so the same JSON object can be
/// passed from JavaScript hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of undo steps kept.
    #[serde(alias = "historyLimit")]
    pub history_limit: usize,
    /// Quiet period after the last change before the preview recompiles.
    #[serde(alias = "previewDelayMs")]
    pub preview_delay_ms: u64,
    /// Beautify the buffer before building the save payload.
    #[serde(alias = "formatOnSave")]
    pub format_on_save: bool,
    /// Beautifier options used by Format and Save.
    pub beautify: BeautifyOptions,
    /// Preview compilation options.
    pub preview: PreviewOptions,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            preview_delay_ms: DEFAULT_PREVIEW_DELAY_MS,
            format_on_save: true,
            beautify: BeautifyOptions::default(),
            preview: PreviewOptions::default(),
        }
    }
}

impl EditorConfig {
    /// Parses a JSON configuration object; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TidyError> {
        Ok(serde_json::from_str(json)?)
    }
}
