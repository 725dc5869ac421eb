//! Tag-character codec: printable ASCII <-> `U+E0020..=U+E007F`.

use crate::tables::TAG_OFFSET;

/// Encode an ASCII codepoint in `0x20..=0x7F` as its tag mirror.
pub fn encode(c: char) -> Option<char> {
    let cp = c as u32;
    if (0x20..=0x7F).contains(&cp) {
        char::from_u32(cp + TAG_OFFSET)
    } else {
        None
    }
}

/// Decode a tag character back to ASCII.
pub fn decode(c: char) -> Option<char> {
    let cp = c as u32;
    if crate::is_tag_char(cp) {
        char::from_u32(cp - TAG_OFFSET)
    } else {
        None
    }
}

/// Encode every encodable char of `text`, dropping the rest.
pub fn encode_str(text: &str) -> String {
    text.chars().filter_map(encode).collect()
}

/// Decode every tag char of `text`, dropping the rest.
pub fn decode_str(text: &str) -> String {
    text.chars().filter_map(decode).collect()
}

/// Characters accepted by tag typing: ASCII letters, digits, space and `!@#$%^&*()`.
pub fn is_tag_typable(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '!' | '@' | '#' | '$' | '%' | '^' | '&' | '*' | '(' | ')')
}
