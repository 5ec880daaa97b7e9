//! Value snapshot of a field carrying an autocomplete suggestion.
//!
//! Offsets are UTF-8 byte offsets into [`EditState::text`], always on char
//! boundaries.

use crate::unicode::floor_char_boundary;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditState {
    user_text: String,
    suggestion_text: Option<String>,
    additional_text: Option<String>,
    sel_start: usize,
    sel_end: usize,
}

impl EditState {
    /// Builds a snapshot. The selection is ordered, clamped to the full text
    /// and snapped to char boundaries; an empty suggestion is treated as none.
    pub fn new(
        user_text: impl Into<String>,
        suggestion_text: Option<&str>,
        sel_start: usize,
        sel_end: usize,
    ) -> Self {
        let mut state = Self {
            user_text: user_text.into(),
            suggestion_text: suggestion_text
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            additional_text: None,
            sel_start: 0,
            sel_end: 0,
        };
        state.set_selection(sel_start, sel_end);
        state
    }

    /// Snapshot of `text` with the cursor collapsed at its end.
    pub fn at_end(user_text: impl Into<String>) -> Self {
        let user_text = user_text.into();
        let len = user_text.len();
        Self::new(user_text, None, len, len)
    }

    pub fn with_additional_text(mut self, additional_text: Option<&str>) -> Self {
        self.additional_text = additional_text.map(str::to_string);
        self
    }

    /// User text followed by the suggestion, as displayed.
    pub fn text(&self) -> String {
        match &self.suggestion_text {
            Some(s) => format!("{}{}", self.user_text, s),
            None => self.user_text.clone(),
        }
    }

    pub fn text_len(&self) -> usize {
        self.user_text.len() + self.suggestion_text.as_ref().map_or(0, String::len)
    }

    pub fn user_text(&self) -> &str {
        &self.user_text
    }

    pub fn suggestion_text(&self) -> Option<&str> {
        self.suggestion_text.as_deref()
    }

    pub fn additional_text(&self) -> Option<&str> {
        self.additional_text.as_deref()
    }

    pub fn has_suggestion(&self) -> bool {
        self.suggestion_text.is_some()
    }

    pub fn sel_start(&self) -> usize {
        self.sel_start
    }

    pub fn sel_end(&self) -> usize {
        self.sel_end
    }

    pub fn is_selection_collapsed(&self) -> bool {
        self.sel_start == self.sel_end
    }

    pub fn is_cursor_at_end_of_user_text(&self) -> bool {
        self.sel_start == self.user_text.len() && self.sel_end == self.user_text.len()
    }

    /// The whole user text is selected (and there is some).
    pub fn is_whole_user_text_selected(&self) -> bool {
        !self.user_text.is_empty() && self.sel_start == 0 && self.sel_end == self.user_text.len()
    }

    /// Text removed from the end of `prev`'s user text to arrive at this
    /// state, when this state is exactly `prev` minus a trailing run and
    /// both cursors sit at the end of their user text.
    pub fn backward_deleted_suffix_from(&self, prev: &EditState) -> Option<String> {
        if !self.is_cursor_at_end_of_user_text() || !prev.is_cursor_at_end_of_user_text() {
            return None;
        }
        if self.user_text.len() >= prev.user_text.len()
            || !prev.user_text.starts_with(&self.user_text)
        {
            return None;
        }
        Some(prev.user_text[self.user_text.len()..].to_string())
    }

    pub fn is_backward_deleted_from(&self, prev: &EditState) -> bool {
        self.backward_deleted_suffix_from(prev).is_some()
    }

    /// Pure append at the cursor: `prev`'s user text is a strict prefix of
    /// ours and the cursor is collapsed at our end.
    pub fn is_forward_typed_from(&self, prev: &EditState) -> bool {
        self.is_cursor_at_end_of_user_text()
            && self.user_text.len() > prev.user_text.len()
            && self.user_text.starts_with(&prev.user_text)
    }

    /// Keeps the unconsumed tail of a previously set suggestion when the
    /// user typed into it. Succeeds iff our user text extends `prev_set`'s
    /// user text and is itself a prefix of `prev_set`'s full text with
    /// something left over.
    pub fn reuse_suggestion_if_prefix_extension(&mut self, prev_set: &EditState) -> bool {
        if !self.user_text.starts_with(&prev_set.user_text) {
            return false;
        }
        let prev_text = prev_set.text();
        if !prev_text.starts_with(&self.user_text) {
            return false;
        }
        let tail = &prev_text[self.user_text.len()..];
        if tail.is_empty() {
            return false;
        }
        self.suggestion_text = Some(tail.to_string());
        self.additional_text = prev_set.additional_text.clone();
        true
    }

    pub fn set_suggestion(&mut self, suggestion_text: Option<&str>, additional_text: Option<&str>) {
        self.suggestion_text = suggestion_text
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        self.additional_text = additional_text.map(str::to_string);
    }

    pub fn clear_suggestion(&mut self) {
        self.suggestion_text = None;
        self.additional_text = None;
        let len = self.user_text.len();
        self.sel_start = self.sel_start.min(len);
        self.sel_end = self.sel_end.min(len);
    }

    pub fn set_selection(&mut self, start: usize, end: usize) {
        let text = self.text();
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        self.sel_start = floor_char_boundary(&text, start);
        self.sel_end = floor_char_boundary(&text, end);
    }

    /// Replaces the user text, dropping any suggestion and clamping the
    /// selection.
    pub fn set_user_text(&mut self, user_text: impl Into<String>) {
        self.user_text = user_text.into();
        self.suggestion_text = None;
        self.additional_text = None;
        let (start, end) = (self.sel_start, self.sel_end);
        self.set_selection(start, end);
    }
}
