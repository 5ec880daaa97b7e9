//! Observer notifications, accumulated in the model and drained by the host.

use serde::Serialize;
use tracing::debug;

use ac_core::unicode::byte_to_char_offset;
use ac_core::EditState;

use crate::field::EditableField;
use crate::OverlayModel;

/// How the last change to the user text came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    Typing,
    Deletion,
    ExternalReplace,
    Commit,
    Other,
}

/// Before/after description of a text change. Indices and counts are in
/// code points of the displayed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextChange {
    pub before: String,
    pub after: String,
    pub from_index: usize,
    pub removed: usize,
    pub added: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// Accessibility: displayed text changed.
    TextChanged(TextChange),
    /// Accessibility: selection moved. Offsets in code points.
    SelectionChanged {
        start: usize,
        end: usize,
        text_len: usize,
    },
    /// Suggestion source: the user text changed. Never carries suggestion
    /// text.
    SuggestionStateChanged { user_text: String, edit: EditKind },
}

/// Describes `prev -> cur` by the shape of the edit: typing after the user
/// text, deleting from its end, swapping only the suggestion, or a full
/// replacement.
pub(crate) fn describe_text_change(prev: &EditState, cur: &EditState) -> Option<TextChange> {
    let before = prev.text();
    let after = cur.text();
    if before == after {
        return None;
    }
    let from = if cur.is_forward_typed_from(prev) {
        prev.user_text().len()
    } else if cur.is_backward_deleted_from(prev) || cur.user_text() == prev.user_text() {
        cur.user_text().len()
    } else {
        0
    };
    let from_index = byte_to_char_offset(&before, from);
    Some(TextChange {
        from_index,
        removed: before.chars().count() - from_index,
        added: after.chars().count() - from_index,
        before,
        after,
    })
}

impl<F: EditableField> OverlayModel<F> {
    /// Emits notifications when the current state differs from the one last
    /// notified, then records it as notified.
    pub(crate) fn notify_if_changed(&mut self, edit: EditKind) {
        if self.current == self.last_notified {
            return;
        }
        let prev = std::mem::replace(&mut self.last_notified, self.current.clone());
        debug!(?edit, user_text = self.current.user_text(), "state changed");

        if self.settings.announce.enabled {
            if let Some(change) = describe_text_change(&prev, &self.current) {
                self.notifications.push(Notification::TextChanged(change));
            }
            if (prev.sel_start(), prev.sel_end())
                != (self.current.sel_start(), self.current.sel_end())
            {
                let text = self.current.text();
                self.notifications.push(Notification::SelectionChanged {
                    start: byte_to_char_offset(&text, self.current.sel_start()),
                    end: byte_to_char_offset(&text, self.current.sel_end()),
                    text_len: text.chars().count(),
                });
            }
        }

        if !self.ignore_self_change {
            self.notifications.push(Notification::SuggestionStateChanged {
                user_text: self.current.user_text().to_string(),
                edit,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(user: &str, suggestion: Option<&str>) -> EditState {
        EditState::new(user, suggestion, user.len(), user.len())
    }

    #[test]
    fn typing_is_described_from_old_user_end() {
        let c = describe_text_change(&s("goo", Some("gle")), &s("goog", None)).unwrap();
        assert_eq!((c.from_index, c.removed, c.added), (3, 3, 1));
    }

    #[test]
    fn deletion_is_described_from_new_user_end() {
        let c = describe_text_change(&s("abc", None), &s("ab", None)).unwrap();
        assert_eq!((c.from_index, c.removed, c.added), (2, 1, 0));
    }

    #[test]
    fn suggestion_swap_keeps_user_text() {
        let c = describe_text_change(&s("日本", Some("語")), &s("日本", None)).unwrap();
        assert_eq!((c.from_index, c.removed, c.added), (2, 1, 0));
    }

    #[test]
    fn replacement_is_described_from_zero() {
        let c = describe_text_change(&s("cat", None), &s("dog", None)).unwrap();
        assert_eq!((c.from_index, c.removed, c.added), (0, 3, 3));
        assert!(describe_text_change(&s("a", None), &s("a", None)).is_none());
    }
}
