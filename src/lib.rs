//! Inline autocomplete overlay engine.
//!
//! Re-exports the core types (`ac_core`) and the field-facing model
//! (`ac_session`), and sets up optional JSONL tracing.

mod trace_init;

pub use trace_init::{init_tracing, DEFAULT_FILTER, TRACE_FILE};

pub use ac_core::{EditState, KeyEvent, Settings, SettingsError};
pub use ac_session::{
    CommandResult, CompositionCommand, ContentPayload, EditKind, EditableField, FieldBuffer,
    InputConnection, KeyResponse, Notification, OverlayModel, SurfacePolicy, TextChange,
};

/// Model over an in-memory field with the embedded default settings.
pub fn default_model() -> OverlayModel<FieldBuffer> {
    OverlayModel::new(FieldBuffer::new(), Settings::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_starts_empty() {
        let model = default_model();
        assert_eq!(model.user_visible_text(), "");
        assert!(!model.has_suggestion());
        assert!(model.is_focused());
    }

    #[test]
    fn init_tracing_installs_at_most_once() {
        let dir = std::env::temp_dir();
        let first = init_tracing(&dir);
        assert!(!init_tracing(&dir));
        assert_eq!(first, cfg!(feature = "trace"));
    }
}
