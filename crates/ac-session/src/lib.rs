//! Inline autocomplete for a text field shared with a composition protocol.
//!
//! `OverlayModel` owns the field, shows the suggestion as an annotated tail
//! after the user text, hides it from the protocol while commands run, and
//! reconciles once when the outermost edit session closes.

pub mod coordinator;
pub mod field;
pub mod notify;
pub mod overlay;
pub mod policy;
pub mod protocol;
pub mod session;

mod keys;
mod reconcile;

#[cfg(test)]
mod tests;

use tracing::debug_span;

use ac_core::{EditState, Settings};

pub use coordinator::{CommandResult, CompositionCommand, InputConnection};
pub use field::{ContentPayload, EditableField, FieldBuffer};
pub use keys::KeyResponse;
pub use notify::{EditKind, Notification, TextChange};
pub use overlay::OverlayController;
pub use policy::SurfacePolicy;
pub use session::{EditSession, SessionOrigin};

/// Autocomplete state for one field.
pub struct OverlayModel<F: EditableField> {
    pub(crate) field: F,
    pub(crate) overlay: OverlayController,
    pub(crate) session: EditSession,

    /// State as last reconciled, suggestion included.
    pub(crate) current: EditState,
    /// State observers were last told about.
    pub(crate) last_notified: EditState,
    /// State as last annotated by the suggestion source.
    pub(crate) last_set: EditState,

    pub(crate) last_edit_was_typing: bool,
    /// Set while applying a pushed suggestion so the write-back is not
    /// reported to the suggestion source.
    pub(crate) ignore_self_change: bool,
    /// Classification imposed on the next reconciliation.
    pub(crate) forced_edit: Option<EditKind>,
    pub(crate) focused: bool,

    pub(crate) settings: Settings,
    pub(crate) policy: SurfacePolicy,
    pub(crate) surface_id: Option<String>,

    pub(crate) notifications: Vec<Notification>,
    pub(crate) reconciliations: u64,
}

impl<F: EditableField> OverlayModel<F> {
    pub fn new(field: F, settings: Settings) -> Self {
        let policy = SurfacePolicy::from_settings(&settings.policy);
        let mut model = Self {
            field,
            overlay: OverlayController::new(),
            session: EditSession::default(),
            current: EditState::default(),
            last_notified: EditState::default(),
            last_set: EditState::default(),
            last_edit_was_typing: false,
            ignore_self_change: false,
            forced_edit: None,
            focused: true,
            settings,
            policy,
            surface_id: None,
            notifications: Vec::new(),
            reconciliations: 0,
        };
        model.field.set_overlay(None);
        model.current = model.read_field_state();
        model.last_notified = model.current.clone();
        model.last_set = model.current.clone();
        model
    }

    /// Composition protocol endpoint.
    pub fn connection(&mut self) -> InputConnection<'_, F> {
        InputConnection::new(self)
    }

    /// Drains pending notifications.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn current_state(&self) -> &EditState {
        &self.current
    }

    pub fn has_suggestion(&self) -> bool {
        self.current.has_suggestion()
    }

    /// User text followed by the suggestion, as displayed.
    pub fn user_visible_text(&self) -> String {
        self.current.text()
    }

    pub fn user_text(&self) -> &str {
        self.current.user_text()
    }

    pub fn suggestion_text(&self) -> Option<&str> {
        self.current.suggestion_text()
    }

    pub fn additional_text(&self) -> Option<&str> {
        self.current.additional_text()
    }

    /// Whether the suggestion source should be asked for a new suggestion.
    pub fn should_request_suggestions(&self) -> bool {
        !self.session.is_open()
            && self.focused
            && self.last_edit_was_typing
            && self.current.is_cursor_at_end_of_user_text()
            && self
                .policy
                .allows(self.surface_id.as_deref(), self.current.user_text())
    }

    /// Identifies the active input surface (e.g. an input-method package).
    pub fn set_input_surface(&mut self, surface_id: Option<&str>) {
        self.surface_id = surface_id.map(str::to_string);
    }

    pub fn set_surface_policy(&mut self, policy: SurfacePolicy) {
        self.policy = policy;
    }

    pub fn session_depth(&self) -> usize {
        self.session.depth()
    }

    pub fn reconciliation_count(&self) -> u64 {
        self.reconciliations
    }

    pub fn last_edit_was_typing(&self) -> bool {
        self.last_edit_was_typing
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Replaces the whole text outside the composition protocol (e.g. a
    /// programmatic reset). Drops any suggestion; never counts as typing.
    pub fn on_external_text_replace(&mut self, text: &str) {
        let _span = debug_span!("on_external_text_replace", len = text.len()).entered();
        self.session.clear_pending_trim();
        self.begin_session(SessionOrigin::Host);
        let len = self.field.text().len();
        self.field.set_composing_region(None);
        self.field.replace(0..len, text);
        self.field.set_selection(text.len(), text.len());
        self.forced_edit = Some(EditKind::ExternalReplace);
        self.end_session();
    }

    /// Host paste: replaces the selection with `text`.
    pub fn paste(&mut self, text: &str) {
        let _span = debug_span!("paste", len = text.len()).entered();
        self.begin_session(SessionOrigin::Host);
        let sel = self.field.selection();
        self.field.replace(sel.clone(), text);
        let pos = sel.start + text.len();
        self.field.set_selection(pos, pos);
        self.forced_edit = Some(EditKind::ExternalReplace);
        self.end_session();
    }

    /// Runs a host-originated edit on the field inside an edit session.
    pub fn edit_field<R>(&mut self, edit: impl FnOnce(&mut F) -> R) -> R {
        let _span = debug_span!("edit_field").entered();
        self.begin_session(SessionOrigin::Host);
        let r = edit(&mut self.field);
        self.end_session();
        r
    }

    /// Host moved the selection (tap, drag). A tap inside the visible
    /// suggestion accepts it and keeps the cursor where it landed.
    pub fn on_selection_changed(&mut self, start: usize, end: usize) {
        let _span = debug_span!("on_selection_changed", start, end).entered();
        if self.session.is_open() {
            self.field.set_selection(start, end);
            return;
        }
        let user_len = self.current.user_text().len();
        if start == end
            && self.current.has_suggestion()
            && start > user_len
            && start <= self.current.text_len()
        {
            self.commit_suggestion();
            self.edit_field(|f| f.set_selection(start, end));
            return;
        }
        if (start, end) == (self.current.sel_start(), self.current.sel_end()) {
            return;
        }
        self.edit_field(|f| f.set_selection(start, end));
    }

    /// Losing focus drops the suggestion and forgets the last one pushed.
    pub fn on_focus_changed(&mut self, focused: bool) {
        let _span = debug_span!("on_focus_changed", focused).entered();
        self.focused = focused;
        if focused {
            return;
        }
        self.overlay.remove(&mut self.field);
        self.current = self.read_field_state();
        self.last_set = self.current.clone();
        self.last_edit_was_typing = false;
        self.session.clear_pending_trim();
        self.notify_if_changed(EditKind::Other);
    }

    /// The protocol has been told the current field state. Text restored for
    /// display after a deletion no longer needs trimming from its next
    /// command.
    pub fn on_protocol_state_synced(&mut self) {
        self.session.clear_pending_trim();
    }

    /// Field state with no overlay installed.
    pub(crate) fn read_field_state(&self) -> EditState {
        let sel = self.field.selection();
        EditState::new(self.field.text(), None, sel.start, sel.end)
    }
}
