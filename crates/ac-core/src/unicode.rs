//! Offset arithmetic between UTF-8 byte offsets (what fields store) and the
//! code point / UTF-16 counts the composition protocol speaks in, plus the
//! script classification used by the suggestion policy.

/// Largest char boundary `<= index`, clamped to the text length.
pub fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    let mut i = index;
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Byte offset of the `chars`-th code point, or the text length past the end.
pub fn char_to_byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(i, _)| i)
}

pub fn byte_to_char_offset(text: &str, byte: usize) -> usize {
    text[..floor_char_boundary(text, byte)].chars().count()
}

/// Byte offset reached by walking `count` code points forward from `from`.
pub fn offset_after_code_points(text: &str, from: usize, count: usize) -> usize {
    let from = floor_char_boundary(text, from);
    text[from..]
        .char_indices()
        .nth(count)
        .map_or(text.len(), |(i, _)| from + i)
}

/// Byte offset reached by walking `count` code points backward from `from`.
pub fn offset_before_code_points(text: &str, from: usize, count: usize) -> usize {
    let from = floor_char_boundary(text, from);
    if count == 0 {
        return from;
    }
    text[..from]
        .char_indices()
        .rev()
        .nth(count - 1)
        .map_or(0, |(i, _)| i)
}

/// Byte offset reached by walking `units` UTF-16 code units forward.
/// A character whose surrogate pair straddles the limit is included whole.
pub fn offset_after_utf16(text: &str, from: usize, units: usize) -> usize {
    let from = floor_char_boundary(text, from);
    let mut walked = 0;
    let mut offset = from;
    for c in text[from..].chars() {
        if walked >= units {
            break;
        }
        walked += c.len_utf16();
        offset += c.len_utf8();
    }
    offset
}

/// Byte offset reached by walking `units` UTF-16 code units backward.
pub fn offset_before_utf16(text: &str, from: usize, units: usize) -> usize {
    let from = floor_char_boundary(text, from);
    let mut walked = 0;
    let mut offset = from;
    for c in text[..from].chars().rev() {
        if walked >= units {
            break;
        }
        walked += c.len_utf16();
        offset -= c.len_utf8();
    }
    offset
}

pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Characters typed without an input-method composition step: ASCII, the
/// Latin-1 and Latin Extended-A/B blocks, Latin Extended Additional, and
/// general punctuation. Combining marks are deliberately absent.
pub fn is_non_compositional_char(c: char) -> bool {
    c.is_ascii()
        || ('\u{00A0}'..='\u{024F}').contains(&c)
        || ('\u{1E00}'..='\u{1EFF}').contains(&c)
        || ('\u{2000}'..='\u{206F}').contains(&c)
}

/// True when every character of `text` is non-compositional.
/// The empty string qualifies.
pub fn is_non_compositional(text: &str) -> bool {
    text.chars().all(is_non_compositional_char)
}
