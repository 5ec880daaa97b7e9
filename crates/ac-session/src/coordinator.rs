//! Decorator between the composition protocol and the field.
//!
//! Every command runs inside an edit session so the overlay is out of the
//! field while the protocol looks at it, and reconciliation runs once when
//! the outermost session closes.

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use ac_core::KeyEvent;

use crate::field::{ContentPayload, EditableField};
use crate::protocol;
use crate::session::SessionOrigin;
use crate::OverlayModel;

/// Commands of the composition protocol. Positions and lengths are in
/// code points except `DeleteSurroundingText`, which counts UTF-16 units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CompositionCommand {
    BeginBatchEdit,
    EndBatchEdit,
    CommitText {
        text: String,
        #[serde(default = "one")]
        new_cursor_position: i32,
    },
    SetComposingText {
        text: String,
        #[serde(default = "one")]
        new_cursor_position: i32,
    },
    SetComposingRegion {
        start: usize,
        end: usize,
    },
    FinishComposingText,
    DeleteSurroundingText {
        before: usize,
        after: usize,
    },
    DeleteSurroundingTextInCodePoints {
        before: usize,
        after: usize,
    },
    SetSelection {
        start: usize,
        end: usize,
    },
    SendKeyEvent {
        key: KeyEvent,
    },
    GetCursorCapsMode {
        req_modes: u32,
    },
    RequestCursorUpdates {
        mode: u32,
    },
    CommitCorrection {
        offset: usize,
        old_text: String,
        new_text: String,
    },
    CommitCompletion {
        text: String,
    },
    CommitContent(ContentPayload),
    CloseConnection,
}

fn one() -> i32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandResult {
    Handled(bool),
    CapsMode(u32),
}

impl CommandResult {
    pub fn handled(self) -> bool {
        match self {
            Self::Handled(b) => b,
            Self::CapsMode(_) => true,
        }
    }
}

/// Composition protocol endpoint for one model. Borrow it per dispatch:
/// `model.connection().commit_text("a", 1)`.
pub struct InputConnection<'m, F: EditableField> {
    model: &'m mut OverlayModel<F>,
}

impl<'m, F: EditableField> InputConnection<'m, F> {
    pub(crate) fn new(model: &'m mut OverlayModel<F>) -> Self {
        Self { model }
    }

    pub fn perform(&mut self, command: CompositionCommand) -> CommandResult {
        let _span = debug_span!("perform", ?command).entered();
        match command {
            CompositionCommand::BeginBatchEdit => {
                self.model.session.open_protocol_batch();
                self.model.begin_session(SessionOrigin::Protocol);
                CommandResult::Handled(true)
            }
            CompositionCommand::EndBatchEdit => {
                if !self.model.session.close_protocol_batch() {
                    debug!("end_batch_edit without an open batch");
                    return CommandResult::Handled(false);
                }
                self.model.end_session();
                // true while the protocol still has batches open
                CommandResult::Handled(self.model.session.protocol_batches() > 0)
            }
            CompositionCommand::CloseConnection => {
                let mut closed = 0;
                while self.model.session.close_protocol_batch() {
                    self.model.end_session();
                    closed += 1;
                }
                if closed > 0 {
                    debug!(closed, "closed batches left open by the protocol");
                }
                CommandResult::Handled(true)
            }
            command => {
                self.model.begin_session(SessionOrigin::Protocol);
                let result = protocol::execute(&mut self.model.field, &command);
                self.model.end_session();
                result
            }
        }
    }

    pub fn begin_batch_edit(&mut self) -> bool {
        self.perform(CompositionCommand::BeginBatchEdit).handled()
    }

    pub fn end_batch_edit(&mut self) -> bool {
        self.perform(CompositionCommand::EndBatchEdit).handled()
    }

    pub fn commit_text(&mut self, text: &str, new_cursor_position: i32) -> bool {
        self.perform(CompositionCommand::CommitText {
            text: text.to_string(),
            new_cursor_position,
        })
        .handled()
    }

    pub fn set_composing_text(&mut self, text: &str, new_cursor_position: i32) -> bool {
        self.perform(CompositionCommand::SetComposingText {
            text: text.to_string(),
            new_cursor_position,
        })
        .handled()
    }

    pub fn set_composing_region(&mut self, start: usize, end: usize) -> bool {
        self.perform(CompositionCommand::SetComposingRegion { start, end })
            .handled()
    }

    pub fn finish_composing_text(&mut self) -> bool {
        self.perform(CompositionCommand::FinishComposingText).handled()
    }

    pub fn delete_surrounding_text(&mut self, before: usize, after: usize) -> bool {
        self.perform(CompositionCommand::DeleteSurroundingText { before, after })
            .handled()
    }

    pub fn delete_surrounding_text_in_code_points(&mut self, before: usize, after: usize) -> bool {
        self.perform(CompositionCommand::DeleteSurroundingTextInCodePoints { before, after })
            .handled()
    }

    pub fn set_selection(&mut self, start: usize, end: usize) -> bool {
        self.perform(CompositionCommand::SetSelection { start, end })
            .handled()
    }

    pub fn send_key_event(&mut self, key: KeyEvent) -> bool {
        self.perform(CompositionCommand::SendKeyEvent { key }).handled()
    }

    pub fn get_cursor_caps_mode(&mut self, req_modes: u32) -> u32 {
        match self.perform(CompositionCommand::GetCursorCapsMode { req_modes }) {
            CommandResult::CapsMode(mode) => mode,
            CommandResult::Handled(_) => 0,
        }
    }

    pub fn request_cursor_updates(&mut self, mode: u32) -> bool {
        self.perform(CompositionCommand::RequestCursorUpdates { mode })
            .handled()
    }

    pub fn commit_correction(&mut self, offset: usize, old_text: &str, new_text: &str) -> bool {
        self.perform(CompositionCommand::CommitCorrection {
            offset,
            old_text: old_text.to_string(),
            new_text: new_text.to_string(),
        })
        .handled()
    }

    pub fn commit_completion(&mut self, text: &str) -> bool {
        self.perform(CompositionCommand::CommitCompletion {
            text: text.to_string(),
        })
        .handled()
    }

    pub fn commit_content(&mut self, content: ContentPayload) -> bool {
        self.perform(CompositionCommand::CommitContent(content))
            .handled()
    }

    pub fn close_connection(&mut self) {
        self.perform(CompositionCommand::CloseConnection);
    }
}
