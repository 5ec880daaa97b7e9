use tracing::debug;

use ac_core::EditState;

use crate::field::EditableField;

/// Owns the suggestion text while it is shown in the field as an annotated
/// tail after the user text.
#[derive(Debug, Default)]
pub struct OverlayController {
    installed: Option<String>,
}

impl OverlayController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn installed(&self) -> Option<&str> {
        self.installed.as_deref()
    }

    pub fn is_installed(&self) -> bool {
        self.installed.is_some()
    }

    /// Shows `state`'s suggestion after its user text. Refuses unless the
    /// state carries a suggestion and a collapsed cursor at the end of the
    /// user text, and unless the field (overlay aside) holds exactly that
    /// user text. Reinstalling the overlay already shown leaves the field
    /// untouched.
    pub fn install<F: EditableField>(&mut self, field: &mut F, state: &EditState) -> bool {
        let Some(suggestion) = state.suggestion_text() else {
            return false;
        };
        if !state.is_cursor_at_end_of_user_text() {
            debug!(
                sel_start = state.sel_start(),
                sel_end = state.sel_end(),
                "overlay refused: cursor not at end of user text"
            );
            return false;
        }

        let user_len = state.user_text().len();
        if self.installed.as_deref() == Some(suggestion)
            && field.overlay() == Some(user_len..user_len + suggestion.len())
            && field.text() == state.text()
        {
            field.set_selection(user_len, user_len);
            return true;
        }

        self.remove(field);
        if field.text() != state.user_text() {
            debug!("overlay refused: field text diverges from user text");
            return false;
        }
        field.replace(user_len..user_len, suggestion);
        field.set_overlay(Some(user_len..user_len + suggestion.len()));
        field.set_selection(user_len, user_len);
        self.installed = Some(suggestion.to_string());
        true
    }

    /// Deletes the overlay text from the field. Returns whether anything
    /// was installed.
    pub fn remove<F: EditableField>(&mut self, field: &mut F) -> bool {
        if self.installed.take().is_none() {
            return false;
        }
        if let Some(range) = field.overlay() {
            field.set_overlay(None);
            field.replace(range, "");
        }
        true
    }

    /// Turns the suggestion into literal text after the user text and puts
    /// the cursor at the end.
    pub fn commit<F: EditableField>(&mut self, field: &mut F, state: &EditState) -> bool {
        let Some(suggestion) = state.suggestion_text() else {
            return false;
        };
        self.remove(field);
        if field.text() != state.user_text() {
            debug!("commit refused: field text diverges from user text");
            return false;
        }
        let user_len = state.user_text().len();
        field.replace(user_len..user_len, suggestion);
        let end = field.text().len();
        field.set_selection(end, end);
        true
    }
}
