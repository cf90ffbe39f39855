#![deny(missing_docs)]
//! mdxtidy editor: session state behind the document editor's Format, Save,
//! Undo/Redo and live-preview actions.

/// Editor configuration.
pub mod config;
/// Clock-agnostic debouncing for preview compilation.
pub mod debounce;
/// Bounded undo/redo history.
pub mod history;
/// The editing session.
pub mod session;

pub use config::EditorConfig;
pub use debounce::Debouncer;
pub use history::History;
pub use session::{EditorSession, FormatOutcome, SavePayload};
