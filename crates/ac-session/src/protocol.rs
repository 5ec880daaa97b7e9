//! Field-level semantics of each composition command.

use std::ops::Range;

use tracing::debug;

use ac_core::unicode::{
    byte_to_char_offset, char_to_byte_offset, offset_after_code_points, offset_after_utf16,
    offset_before_code_points, offset_before_utf16,
};
use ac_core::KeyEvent;

use crate::coordinator::{CommandResult, CompositionCommand};
use crate::field::EditableField;

pub const CAP_MODE_CHARACTERS: u32 = 0x1000;
pub const CAP_MODE_WORDS: u32 = 0x2000;
pub const CAP_MODE_SENTENCES: u32 = 0x4000;

pub(crate) fn execute<F: EditableField>(field: &mut F, command: &CompositionCommand) -> CommandResult {
    use CompositionCommand as C;
    let handled = match command {
        C::CommitText {
            text,
            new_cursor_position,
        } => {
            replace_with_cursor(field, text, *new_cursor_position, false);
            true
        }
        C::SetComposingText {
            text,
            new_cursor_position,
        } => {
            replace_with_cursor(field, text, *new_cursor_position, true);
            true
        }
        C::SetComposingRegion { start, end } => {
            let text = field.text();
            let (a, b) = (char_to_byte_offset(text, *start), char_to_byte_offset(text, *end));
            field.set_composing_region(Some(a.min(b)..a.max(b)));
            true
        }
        C::FinishComposingText => {
            field.set_composing_region(None);
            true
        }
        C::DeleteSurroundingText { before, after } => {
            delete_surrounding(field, *before, *after, offset_before_utf16, offset_after_utf16);
            true
        }
        C::DeleteSurroundingTextInCodePoints { before, after } => {
            delete_surrounding(
                field,
                *before,
                *after,
                offset_before_code_points,
                offset_after_code_points,
            );
            true
        }
        C::SetSelection { start, end } => set_selection(field, *start, *end),
        C::SendKeyEvent { key } => apply_key(field, *key),
        C::GetCursorCapsMode { req_modes } => {
            return CommandResult::CapsMode(cursor_caps_mode(field, *req_modes));
        }
        C::RequestCursorUpdates { mode } => field.request_cursor_updates(*mode),
        C::CommitCorrection {
            offset,
            old_text,
            new_text,
        } => commit_correction(field, *offset, old_text, new_text),
        C::CommitCompletion { text } => {
            replace_with_cursor(field, text, 1, false);
            true
        }
        C::CommitContent(content) => field.commit_content(content),
        C::BeginBatchEdit | C::EndBatchEdit | C::CloseConnection => true,
    };
    CommandResult::Handled(handled)
}

/// Replaces the composing region (else the selection) with `text` and
/// places the cursor relative to it: `ncp > 0` counts from the end of the
/// inserted text (1 = right after it), `ncp <= 0` from its start.
fn replace_with_cursor<F: EditableField>(field: &mut F, text: &str, ncp: i32, composing: bool) {
    let range = target_range(field);
    field.set_composing_region(None);
    field.replace(range.clone(), text);
    let inserted = range.start..range.start + text.len();
    if composing {
        field.set_composing_region(Some(inserted.clone()));
    }

    let full = field.text();
    let total = full.chars().count() as i64;
    let start_ch = byte_to_char_offset(full, inserted.start) as i64;
    let end_ch = byte_to_char_offset(full, inserted.end) as i64;
    let ncp = i64::from(ncp);
    let cursor = if ncp > 0 {
        end_ch + ncp - 1
    } else {
        start_ch + ncp
    }
    .clamp(0, total);
    let pos = char_to_byte_offset(full, cursor as usize);
    field.set_selection(pos, pos);
}

fn target_range<F: EditableField>(field: &F) -> Range<usize> {
    field.composing_region().unwrap_or_else(|| field.selection())
}

fn delete_surrounding<F: EditableField>(
    field: &mut F,
    before: usize,
    after: usize,
    back: fn(&str, usize, usize) -> usize,
    forward: fn(&str, usize, usize) -> usize,
) {
    let sel = field.selection();
    let tail_end = forward(field.text(), sel.end, after);
    if tail_end > sel.end {
        field.replace(sel.end..tail_end, "");
    }
    let head_start = back(field.text(), sel.start, before);
    if head_start < sel.start {
        field.replace(head_start..sel.start, "");
    }
}

/// Out-of-range positions are rejected rather than clamped.
fn set_selection<F: EditableField>(field: &mut F, start: usize, end: usize) -> bool {
    let total = field.text().chars().count();
    if start > total || end > total {
        debug!(start, end, total, "set_selection out of range");
        return false;
    }
    let text = field.text();
    let (a, b) = (char_to_byte_offset(text, start), char_to_byte_offset(text, end));
    field.set_selection(a, b);
    true
}

/// Applies an editing or navigation key. Enter, Tab and Escape are left to
/// the host.
fn apply_key<F: EditableField>(field: &mut F, key: KeyEvent) -> bool {
    if key.is_editing() {
        field.set_composing_region(None);
    }
    let sel = field.selection();
    let len = field.text().len();
    match key {
        KeyEvent::Backspace => {
            let start = if sel.is_empty() {
                offset_before_code_points(field.text(), sel.start, 1)
            } else {
                sel.start
            };
            field.replace(start..sel.end, "");
        }
        KeyEvent::ForwardDelete => {
            let end = if sel.is_empty() {
                offset_after_code_points(field.text(), sel.end, 1)
            } else {
                sel.end
            };
            field.replace(sel.start..end, "");
        }
        KeyEvent::Char(c) => {
            let mut buf = [0u8; 4];
            field.replace(sel.clone(), c.encode_utf8(&mut buf));
            let pos = sel.start + c.len_utf8();
            field.set_selection(pos, pos);
        }
        KeyEvent::ArrowLeft => {
            let pos = if sel.is_empty() {
                offset_before_code_points(field.text(), sel.start, 1)
            } else {
                sel.start
            };
            field.set_selection(pos, pos);
        }
        KeyEvent::ArrowRight => {
            let pos = if sel.is_empty() {
                offset_after_code_points(field.text(), sel.end, 1)
            } else {
                sel.end
            };
            field.set_selection(pos, pos);
        }
        KeyEvent::Home => field.set_selection(0, 0),
        KeyEvent::End => field.set_selection(len, len),
        KeyEvent::Enter | KeyEvent::Tab | KeyEvent::Escape => return false,
    }
    true
}

fn cursor_caps_mode<F: EditableField>(field: &F, req_modes: u32) -> u32 {
    let text = field.text();
    let before = &text[..field.selection().start];
    let mut mode = CAP_MODE_CHARACTERS;

    let prev = before.chars().next_back();
    if prev.map_or(true, char::is_whitespace) {
        mode |= CAP_MODE_WORDS;
    }
    let last_visible = before.trim_end().chars().next_back();
    let after_space = prev.map_or(true, char::is_whitespace);
    if last_visible.is_none() || (after_space && matches!(last_visible, Some('.' | '!' | '?'))) {
        mode |= CAP_MODE_SENTENCES;
    }
    mode & req_modes
}

/// Replaces `old_text` at code point `offset` with `new_text`, only when
/// the field still has `old_text` there.
fn commit_correction<F: EditableField>(
    field: &mut F,
    offset: usize,
    old_text: &str,
    new_text: &str,
) -> bool {
    let text = field.text();
    if offset > text.chars().count() {
        return false;
    }
    let start = char_to_byte_offset(text, offset);
    if !text[start..].starts_with(old_text) {
        debug!(offset, "correction target no longer present");
        return false;
    }
    field.replace(start..start + old_text.len(), new_text);
    true
}
