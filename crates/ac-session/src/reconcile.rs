use tracing::{debug, debug_span, warn};

use ac_core::unicode::floor_char_boundary;
use ac_core::EditState;

use crate::field::EditableField;
use crate::notify::EditKind;
use crate::session::{SessionExit, SessionOrigin};
use crate::OverlayModel;

impl<F: EditableField> OverlayModel<F> {
    /// Opens a session level. The overlay is always taken out of the field;
    /// the outermost level of a protocol session also deletes text restored
    /// for display after an earlier deletion, unless a host edit changed the
    /// text in between.
    pub(crate) fn begin_session(&mut self, origin: SessionOrigin) {
        self.overlay.remove(&mut self.field);
        if !self.session.is_open() && origin == SessionOrigin::Protocol {
            self.apply_pending_trim();
        }
        self.session.begin(origin, &self.current);
    }

    /// Closes a session level, reconciling when it is the outermost one.
    pub(crate) fn end_session(&mut self) {
        match self.session.end() {
            SessionExit::Closing { pre, origin } => {
                self.reconcile(pre, origin);
                self.session.close();
            }
            SessionExit::Nested { .. } => {}
            SessionExit::Unbalanced => {
                warn!("unbalanced end_session ignored");
            }
        }
    }

    fn apply_pending_trim(&mut self) {
        let len = self.field.text().len();
        let trim = self.session.take_pending_trim(len);
        if trim == 0 {
            return;
        }
        let start = floor_char_boundary(self.field.text(), len - trim);
        debug!(trim = len - start, "trimming restored text");
        self.field.replace(start..len, "");
        self.current = self.read_field_state();
    }

    /// Runs once per outermost session, with the session still open so
    /// that its own edits nest.
    pub(crate) fn reconcile(&mut self, pre: EditState, origin: SessionOrigin) {
        let _span = debug_span!("reconcile", ?origin).entered();
        self.reconciliations += 1;

        // The trim deletes from the end of the text; once the host has
        // edited the text, the end is no longer the restored run.
        if origin == SessionOrigin::Host
            && self.session.pending_trim() > 0
            && self.field.text() != pre.user_text()
        {
            debug!("host edit cancels pending trim");
            self.session.clear_pending_trim();
        }

        if let Some(edit) = self.forced_edit.take() {
            self.current = self.read_field_state();
            self.last_set = self.current.clone();
            self.last_edit_was_typing = false;
            self.notify_if_changed(edit);
            return;
        }

        let mut post = self.read_field_state();

        // Deletion is checked strictly before suggestion reuse.
        if let Some(deleted) = post.backward_deleted_suffix_from(&pre) {
            if pre.has_suggestion() {
                debug!(deleted, "deletion reached into suggestion; restoring");
                self.restore_deleted_text(&deleted, origin);
                post = self.read_field_state();
            }
            self.last_edit_was_typing = false;
            self.current = post;
            self.last_set = self.current.clone();
            self.notify_if_changed(EditKind::Deletion);
            return;
        }

        let user_text_changed = post.user_text() != pre.user_text();
        let typed = post.is_forward_typed_from(&pre)
            || (pre.is_whole_user_text_selected()
                && !post.user_text().is_empty()
                && post.is_cursor_at_end_of_user_text()
                && user_text_changed);

        if !self.set_suggestion_span_if_eligible(&mut post) {
            self.last_set = post.clone();
        }

        self.last_edit_was_typing = origin.is_user_edit() && typed;
        let edit = if self.last_edit_was_typing {
            EditKind::Typing
        } else if user_text_changed && pre.user_text().starts_with(post.user_text()) {
            EditKind::Deletion
        } else if user_text_changed && origin.is_user_edit() {
            EditKind::ExternalReplace
        } else {
            EditKind::Other
        };
        debug!(?edit, suggestion = post.suggestion_text(), "reconciled");
        self.current = post;
        self.notify_if_changed(edit);
    }

    /// Reinstalls the overlay when the user text still extends the text the
    /// suggestion source last annotated. `state` gets the reused suggestion.
    fn set_suggestion_span_if_eligible(&mut self, state: &mut EditState) -> bool {
        if !state.is_cursor_at_end_of_user_text() {
            return false;
        }
        if !state.reuse_suggestion_if_prefix_extension(&self.last_set) {
            return false;
        }
        if !self.overlay.install(&mut self.field, state) {
            state.clear_suggestion();
            return false;
        }
        true
    }

    /// Puts deleted text back for display. The protocol already believes it
    /// gone, so its next session starts by deleting it again.
    fn restore_deleted_text(&mut self, deleted: &str, origin: SessionOrigin) {
        self.begin_session(SessionOrigin::Internal);
        let end = self.field.text().len();
        self.field.replace(end..end, deleted);
        let end = self.field.text().len();
        self.field.set_selection(end, end);
        self.end_session();
        if origin == SessionOrigin::Protocol {
            self.session.set_pending_trim(deleted.len());
        }
    }

    /// Applies a suggestion pushed by the suggestion source for `user_text`.
    ///
    /// Pushes for a user text other than the current one, or while the
    /// cursor is away from the end of the user text, are stale and ignored.
    /// Inside an open session the suggestion is recorded and installed by
    /// that session's reconciliation.
    pub fn set_suggestion(
        &mut self,
        user_text: &str,
        suggestion_text: Option<&str>,
        additional_text: Option<&str>,
    ) -> bool {
        let _span = debug_span!("set_suggestion", user_text, ?suggestion_text).entered();
        if !self.focused
            || user_text != self.current.user_text()
            || !self.current.is_cursor_at_end_of_user_text()
        {
            debug!(current = self.current.user_text(), "stale suggestion ignored");
            return false;
        }

        let mut next = self.current.clone();
        next.set_suggestion(suggestion_text, additional_text);
        self.last_set = next.clone();
        if self.session.is_open() {
            return true;
        }
        if next == self.current {
            return true;
        }

        self.ignore_self_change = true;
        if next.has_suggestion() {
            if !self.overlay.install(&mut self.field, &next) {
                next.clear_suggestion();
            }
        } else {
            self.overlay.remove(&mut self.field);
        }
        self.current = next;
        self.notify_if_changed(EditKind::Other);
        self.ignore_self_change = false;
        true
    }

    /// Turns the visible suggestion into user text, in one internal session
    /// so observers hear about it once.
    pub fn commit_suggestion(&mut self) -> bool {
        let _span = debug_span!("commit_suggestion").entered();
        if !self.current.has_suggestion() {
            return false;
        }
        let state = self.current.clone();
        self.begin_session(SessionOrigin::Internal);
        let committed = self.overlay.commit(&mut self.field, &state);
        self.last_edit_was_typing = false;
        self.forced_edit = Some(EditKind::Commit);
        self.end_session();
        committed
    }
}
