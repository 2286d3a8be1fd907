//! Offset conversions for text leaves.
//!
//! Stored offsets count Unicode scalar values (chars). The DOM reports and
//! accepts offsets in UTF-16 code units, and string slicing needs bytes, so
//! every boundary converts through these helpers. All conversions clamp to
//! the end of the string.

/// Length of `text` in chars.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the `char_offset`-th char, clamped to `text.len()`.
pub fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Convert a UTF-16 offset within `text` to a char offset.
///
/// An offset that falls inside a surrogate pair rounds up to the char after
/// the pair.
pub fn utf16_to_char_offset(text: &str, utf16_offset: usize) -> usize {
    let mut utf16_seen = 0;
    for (chars_seen, ch) in text.chars().enumerate() {
        if utf16_seen >= utf16_offset {
            return chars_seen;
        }
        utf16_seen += ch.len_utf16();
    }
    char_len(text)
}

/// Convert a char offset within `text` to a UTF-16 offset.
pub fn char_to_utf16_offset(text: &str, char_offset: usize) -> usize {
    text.chars().take(char_offset).map(char::len_utf16).sum()
}

/// Length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}
