//! The editable field the engine decorates, and an in-memory implementation.
//!
//! All positions are UTF-8 byte offsets on char boundaries.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use ac_core::unicode::floor_char_boundary;

/// Rich content offered through the composition protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPayload {
    pub mime_type: String,
    #[serde(default)]
    pub description: String,
}

/// Host text field as seen by the engine.
///
/// `replace` keeps the selection and the composing region anchored to the
/// surrounding text: positions before the range stay, positions after it
/// shift by the length delta, positions inside collapse to the end of the
/// inserted text. The overlay annotation is dropped when an edit touches it.
pub trait EditableField {
    fn text(&self) -> &str;
    fn selection(&self) -> Range<usize>;
    fn set_selection(&mut self, start: usize, end: usize);
    fn replace(&mut self, range: Range<usize>, text: &str);

    fn composing_region(&self) -> Option<Range<usize>>;
    fn set_composing_region(&mut self, region: Option<Range<usize>>);

    /// Range currently annotated as suggestion.
    fn overlay(&self) -> Option<Range<usize>>;
    fn set_overlay(&mut self, range: Option<Range<usize>>);

    fn request_cursor_updates(&mut self, _mode: u32) -> bool {
        false
    }

    fn commit_content(&mut self, _content: &ContentPayload) -> bool {
        false
    }
}

#[derive(Debug, Clone, Default)]
pub struct FieldBuffer {
    text: String,
    selection: Range<usize>,
    composing: Option<Range<usize>>,
    overlay: Option<Range<usize>>,
    cursor_update_mode: Option<u32>,
    committed_content: Vec<ContentPayload>,
}

impl FieldBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field holding `text` with the cursor at its end.
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            selection: text.len()..text.len(),
            ..Self::default()
        }
    }

    pub fn cursor_update_mode(&self) -> Option<u32> {
        self.cursor_update_mode
    }

    pub fn committed_content(&self) -> &[ContentPayload] {
        &self.committed_content
    }

    fn clamp_range(&self, range: Range<usize>) -> Range<usize> {
        let (a, b) = if range.start <= range.end {
            (range.start, range.end)
        } else {
            (range.end, range.start)
        };
        floor_char_boundary(&self.text, a)..floor_char_boundary(&self.text, b)
    }
}

fn shift(pos: usize, range: &Range<usize>, inserted: usize) -> usize {
    if pos >= range.end {
        pos - range.end + range.start + inserted
    } else if pos <= range.start {
        pos
    } else {
        range.start + inserted
    }
}

/// Region with exclusive ends: an insertion at either edge does not grow it.
/// Returns `None` when the edit overlaps the region and `keep_on_overlap`
/// is false, or when the mapped region is empty.
fn map_region(
    region: &Range<usize>,
    edit: &Range<usize>,
    inserted: usize,
    keep_on_overlap: bool,
) -> Option<Range<usize>> {
    if edit.start >= region.end {
        return Some(region.clone());
    }
    if edit.end <= region.start {
        let start = region.start - edit.end + edit.start + inserted;
        return Some(start..start + region.len());
    }
    if !keep_on_overlap {
        return None;
    }
    let start = if region.start < edit.start {
        region.start
    } else {
        edit.start + inserted
    };
    let end = shift(region.end, edit, inserted).max(start);
    (start < end).then_some(start..end)
}

impl EditableField for FieldBuffer {
    fn text(&self) -> &str {
        &self.text
    }

    fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    fn set_selection(&mut self, start: usize, end: usize) {
        self.selection = self.clamp_range(start..end);
    }

    fn replace(&mut self, range: Range<usize>, text: &str) {
        let range = self.clamp_range(range);
        self.text.replace_range(range.clone(), text);
        let inserted = text.len();
        self.selection =
            shift(self.selection.start, &range, inserted)..shift(self.selection.end, &range, inserted);
        self.composing = self
            .composing
            .as_ref()
            .and_then(|r| map_region(r, &range, inserted, true));
        self.overlay = self
            .overlay
            .as_ref()
            .and_then(|r| map_region(r, &range, inserted, false));
    }

    fn composing_region(&self) -> Option<Range<usize>> {
        self.composing.clone()
    }

    fn set_composing_region(&mut self, region: Option<Range<usize>>) {
        self.composing = region
            .map(|r| self.clamp_range(r))
            .filter(|r| !r.is_empty());
    }

    fn overlay(&self) -> Option<Range<usize>> {
        self.overlay.clone()
    }

    fn set_overlay(&mut self, range: Option<Range<usize>>) {
        self.overlay = range
            .map(|r| self.clamp_range(r))
            .filter(|r| !r.is_empty());
    }

    fn request_cursor_updates(&mut self, mode: u32) -> bool {
        self.cursor_update_mode = Some(mode);
        true
    }

    fn commit_content(&mut self, content: &ContentPayload) -> bool {
        self.committed_content.push(content.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_at_cursor_moves_cursor() {
        let mut f = FieldBuffer::with_text("ab");
        f.replace(2..2, "cd");
        assert_eq!(f.text(), "abcd");
        assert_eq!(f.selection(), 4..4);
    }

    #[test]
    fn replace_inside_selection_collapses_to_end() {
        let mut f = FieldBuffer::with_text("hello world");
        f.set_selection(3, 8);
        f.replace(0..11, "x");
        assert_eq!(f.text(), "x");
        assert_eq!(f.selection(), 1..1);
    }

    #[test]
    fn edit_before_cursor_shifts() {
        let mut f = FieldBuffer::with_text("abc");
        f.set_selection(2, 2);
        f.replace(0..1, "xyz");
        assert_eq!(f.text(), "xyzbc");
        assert_eq!(f.selection(), 4..4);
    }

    #[test]
    fn selection_snaps_to_char_boundary() {
        let mut f = FieldBuffer::with_text("日本");
        f.set_selection(4, 1);
        assert_eq!(f.selection(), 0..3);
    }

    #[test]
    fn overlay_cleared_when_touched() {
        let mut f = FieldBuffer::with_text("abcdef");
        f.set_overlay(Some(3..6));
        f.replace(4..5, "");
        assert_eq!(f.overlay(), None);
    }

    #[test]
    fn overlay_shifts_with_earlier_edit_and_ignores_later() {
        let mut f = FieldBuffer::with_text("abcdef");
        f.set_overlay(Some(3..6));
        f.replace(0..1, "");
        assert_eq!(f.overlay(), Some(2..5));
        f.replace(5..5, "!");
        assert_eq!(f.overlay(), Some(2..5));
        f.replace(2..2, "?");
        assert_eq!(f.overlay(), Some(3..6));
    }

    #[test]
    fn composing_region_tracks_edits() {
        let mut f = FieldBuffer::with_text("abcdef");
        f.set_composing_region(Some(2..4));
        f.replace(3..4, "XYZ");
        assert_eq!(f.composing_region(), Some(2..6));
        f.replace(0..6, "");
        assert_eq!(f.composing_region(), None);
        f.set_composing_region(Some(1..1));
        assert_eq!(f.composing_region(), None);
    }
}
