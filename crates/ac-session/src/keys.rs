use serde::Serialize;
use tracing::{debug, debug_span};

use ac_core::KeyEvent;

use crate::field::EditableField;
use crate::notify::EditKind;
use crate::OverlayModel;

/// Outcome of offering a host key to the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeyResponse {
    /// The host must not process the key further.
    pub consumed: bool,
    /// The suggestion was committed.
    pub accepted: bool,
    /// The suggestion was dropped.
    pub dismissed: bool,
}

impl KeyResponse {
    fn not_consumed() -> Self {
        Self::default()
    }

    fn accepted(consumed: bool) -> Self {
        Self {
            consumed,
            accepted: true,
            dismissed: false,
        }
    }

    fn dismissed() -> Self {
        Self {
            consumed: true,
            accepted: false,
            dismissed: true,
        }
    }
}

impl<F: EditableField> OverlayModel<F> {
    /// Host key handling while a suggestion is visible. Keys are ignored
    /// while an edit session is open.
    pub fn on_key_event(&mut self, key: KeyEvent) -> KeyResponse {
        let _span = debug_span!("on_key_event", ?key).entered();
        if self.session.is_open() || !self.current.has_suggestion() {
            return KeyResponse::not_consumed();
        }

        if key == KeyEvent::Enter {
            if !self.settings.keys.accept_on_enter {
                return KeyResponse::not_consumed();
            }
            self.commit_suggestion();
            return KeyResponse::accepted(false);
        }
        if self.settings.is_accept_key(key) {
            self.commit_suggestion();
            return KeyResponse::accepted(true);
        }
        if self.settings.is_dismiss_key(key) {
            self.dismiss_suggestion();
            return KeyResponse::dismissed();
        }
        KeyResponse::not_consumed()
    }

    /// Drops the visible suggestion, leaving the user text alone.
    fn dismiss_suggestion(&mut self) {
        debug!(suggestion = self.current.suggestion_text(), "dismissed");
        self.overlay.remove(&mut self.field);
        self.current = self.read_field_state();
        self.last_set = self.current.clone();
        self.last_edit_was_typing = false;
        self.notify_if_changed(EditKind::Deletion);
    }
}
