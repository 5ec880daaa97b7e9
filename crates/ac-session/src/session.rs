use tracing::{trace, warn};

use ac_core::EditState;

/// Who opened the outermost edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrigin {
    /// Composition protocol command.
    Protocol,
    /// Host-originated edit (paste, direct field edit, selection change).
    Host,
    /// The engine's own bookkeeping (commit, restore).
    Internal,
}

impl SessionOrigin {
    pub fn is_user_edit(self) -> bool {
        matches!(self, Self::Protocol | Self::Host)
    }
}

/// Result of closing one session level.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionExit {
    /// An outer level is still open.
    Nested { depth: usize },
    /// The outermost level is closing. The caller reconciles against `pre`
    /// and then calls [`EditSession::close`].
    Closing { pre: EditState, origin: SessionOrigin },
    /// `end` without a matching `begin`.
    Unbalanced,
}

/// Nesting counter plus the state captured when the outermost level opened.
#[derive(Debug, Default)]
pub struct EditSession {
    depth: usize,
    origin: Option<SessionOrigin>,
    pre_state: Option<EditState>,
    /// Bytes to delete from the end of the text at the next outermost
    /// protocol session.
    pending_trim: usize,
    /// Batch levels opened by the protocol and not yet closed.
    protocol_batches: usize,
}

impl EditSession {
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_open(&self) -> bool {
        self.depth > 0
    }

    pub fn origin(&self) -> Option<SessionOrigin> {
        self.origin
    }

    /// Opens a level. Returns true when it is the outermost one, in which
    /// case `current` is captured as the pre-session state.
    pub fn begin(&mut self, origin: SessionOrigin, current: &EditState) -> bool {
        self.depth += 1;
        trace!(depth = self.depth, ?origin, "session begin");
        if self.depth == 1 {
            self.origin = Some(origin);
            self.pre_state = Some(current.clone());
            true
        } else {
            false
        }
    }

    pub fn end(&mut self) -> SessionExit {
        match self.depth {
            0 => {
                warn!("session end without begin");
                SessionExit::Unbalanced
            }
            1 => {
                trace!("outermost session closing");
                let pre = self.pre_state.take().unwrap_or_default();
                let origin = self.origin.unwrap_or(SessionOrigin::Internal);
                SessionExit::Closing { pre, origin }
            }
            _ => {
                self.depth -= 1;
                trace!(depth = self.depth, "session end");
                SessionExit::Nested { depth: self.depth }
            }
        }
    }

    /// Drops the outermost level after reconciliation.
    pub fn close(&mut self) {
        self.depth = 0;
        self.origin = None;
        self.pre_state = None;
    }

    pub fn set_pending_trim(&mut self, len: usize) {
        self.pending_trim = len;
    }

    /// Takes the pending trim, clamped to `available`.
    pub fn take_pending_trim(&mut self, available: usize) -> usize {
        std::mem::take(&mut self.pending_trim).min(available)
    }

    pub fn pending_trim(&self) -> usize {
        self.pending_trim
    }

    pub fn clear_pending_trim(&mut self) {
        self.pending_trim = 0;
    }

    pub fn open_protocol_batch(&mut self) {
        self.protocol_batches += 1;
    }

    /// Returns false when the protocol had no batch open.
    pub fn close_protocol_batch(&mut self) -> bool {
        if self.protocol_batches == 0 {
            return false;
        }
        self.protocol_batches -= 1;
        true
    }

    pub fn protocol_batches(&self) -> usize {
        self.protocol_batches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outermost_begin_captures_pre_state() {
        let mut s = EditSession::default();
        let a = EditState::at_end("a");
        assert!(s.begin(SessionOrigin::Protocol, &a));
        assert!(!s.begin(SessionOrigin::Internal, &EditState::at_end("ab")));
        assert_eq!(s.depth(), 2);
        assert_eq!(s.end(), SessionExit::Nested { depth: 1 });
        match s.end() {
            SessionExit::Closing { pre, origin } => {
                assert_eq!(pre, a);
                assert_eq!(origin, SessionOrigin::Protocol);
            }
            other => panic!("expected closing, got {other:?}"),
        }
        assert!(s.is_open());
        s.close();
        assert!(!s.is_open());
    }

    #[test]
    fn end_without_begin() {
        let mut s = EditSession::default();
        assert_eq!(s.end(), SessionExit::Unbalanced);
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn pending_trim_is_clamped_and_taken_once() {
        let mut s = EditSession::default();
        s.set_pending_trim(5);
        assert_eq!(s.take_pending_trim(3), 3);
        assert_eq!(s.take_pending_trim(3), 0);
    }

    #[test]
    fn protocol_batches_balance() {
        let mut s = EditSession::default();
        assert!(!s.close_protocol_batch());
        s.open_protocol_batch();
        s.open_protocol_batch();
        assert_eq!(s.protocol_batches(), 2);
        assert!(s.close_protocol_batch());
        assert_eq!(s.protocol_batches(), 1);
    }
}
