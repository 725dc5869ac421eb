//! Codepoint-indexed text buffer backed by `ropey::Rope`.
//!
//! Every public position is a *codepoint* index (ropey's char index). Byte
//! offsets appear only in `replace_at`, whose length argument is measured in
//! the native UTF-8 units of the codepoint being replaced. All edits splice
//! `before + new + after` over exact ranges; nothing outside the range moves.

use std::fmt;
use std::ops::Range;

use ropey::Rope;
use thiserror::Error;

pub mod normalize;

pub use normalize::{NormalizationForm, NormalizationSession};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("position {pos} is past the end of the buffer ({len} codepoints)")]
    OutOfBounds { pos: usize, len: usize },
    #[error("byte offset {0} does not fall on a codepoint boundary")]
    NotCharBoundary(usize),
}

/// A text buffer backed by a `ropey::Rope`.
#[derive(Clone, Default)]
pub struct Buffer {
    rope: Rope,
    pub name: String,
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("name", &self.name)
            .field("len_chars", &self.rope.len_chars())
            .finish()
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl Buffer {
    pub fn new(name: impl Into<String>, content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
            name: name.into(),
        }
    }

    /// Number of codepoints.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn char_at(&self, idx: usize) -> Option<char> {
        self.rope.get_char(idx)
    }

    /// Byte offset of codepoint `idx` (clamped to the end).
    pub fn char_to_byte(&self, idx: usize) -> usize {
        self.rope.char_to_byte(idx.min(self.rope.len_chars()))
    }

    /// Codepoint index containing byte `byte` (clamped to the end).
    pub fn byte_to_char(&self, byte: usize) -> usize {
        self.rope.byte_to_char(byte.min(self.rope.len_bytes()))
    }

    /// Text of codepoints `[range.start, range.end)` (clamped).
    pub fn slice(&self, range: Range<usize>) -> String {
        let (s, e) = self.clamp(range);
        self.rope.slice(s..e).to_string()
    }

    /// Replace the whole content.
    pub fn set_text(&mut self, content: &str) {
        self.rope = Rope::from_str(content);
    }

    /// Insert at codepoint `idx` (clamped). Returns inserted codepoint count.
    pub fn insert(&mut self, idx: usize, text: &str) -> usize {
        let idx = idx.min(self.rope.len_chars());
        self.rope.insert(idx, text);
        text.chars().count()
    }

    /// Remove codepoints in `range` (clamped). Returns removed text.
    pub fn remove(&mut self, range: Range<usize>) -> String {
        let (s, e) = self.clamp(range);
        if s == e {
            return String::new();
        }
        let removed = self.rope.slice(s..e).to_string();
        self.rope.remove(s..e);
        removed
    }

    /// Replace codepoints in `range` with `text`. Returns the codepoint range
    /// now occupied by `text`.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> Range<usize> {
        let (s, e) = self.clamp(range);
        if s < e {
            self.rope.remove(s..e);
        }
        let inserted = self.insert(s, text);
        s..s + inserted
    }

    /// Splice `text` over `[pos, pos + original_len_bytes)` where `pos` is a
    /// codepoint index and the length is in UTF-8 bytes.
    pub fn replace_at(
        &mut self,
        pos: usize,
        original_len_bytes: usize,
        text: &str,
    ) -> Result<Range<usize>, TextError> {
        let len = self.rope.len_chars();
        if pos > len {
            return Err(TextError::OutOfBounds { pos, len });
        }
        let start_byte = self.rope.char_to_byte(pos);
        let end_byte = start_byte + original_len_bytes;
        if end_byte > self.rope.len_bytes() {
            return Err(TextError::NotCharBoundary(end_byte));
        }
        let end = self.rope.byte_to_char(end_byte);
        if self.rope.char_to_byte(end) != end_byte {
            return Err(TextError::NotCharBoundary(end_byte));
        }
        Ok(self.replace(pos..end, text))
    }

    fn clamp(&self, range: Range<usize>) -> (usize, usize) {
        let len = self.rope.len_chars();
        let e = range.end.min(len);
        let s = range.start.min(e);
        (s, e)
    }
}

/// Grapheme helpers over plain strings.
pub mod grapheme {
    use unicode_segmentation::UnicodeSegmentation;

    pub fn count(text: &str) -> usize {
        text.graphemes(true).count()
    }

    /// Split `text` after `floor(n / 2)` of its `n` grapheme clusters.
    pub fn split_midpoint(text: &str) -> (&str, &str) {
        let n = count(text);
        let at = text
            .grapheme_indices(true)
            .nth(n / 2)
            .map_or(text.len(), |(idx, _)| idx);
        text.split_at(at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn indices_are_codepoints() {
        let b = Buffer::new("t", "a\u{E0041}b");
        assert_eq!(b.len_chars(), 3);
        assert_eq!(b.len_bytes(), 6);
        assert_eq!(b.char_at(1), Some('\u{E0041}'));
        assert_eq!(b.char_to_byte(2), 5);
        assert_eq!(b.byte_to_char(5), 2);
    }

    #[test]
    fn replace_selection_keeps_surroundings() {
        let mut b = Buffer::new("t", "hello");
        let r = b.replace(1..3, "\u{200B}");
        assert_eq!(b.to_string(), "h\u{200B}lo");
        assert_eq!(r, 1..2);
    }

    #[test]
    fn replace_at_astral_codepoint() {
        let mut b = Buffer::new("t", "x\u{1F600}y");
        let r = b.replace_at(1, '\u{1F600}'.len_utf8(), "ab").unwrap();
        assert_eq!(b.to_string(), "xaby");
        assert_eq!(r, 1..3);
    }

    #[test]
    fn replace_at_rejects_split_codepoint() {
        let mut b = Buffer::new("t", "x\u{1F600}y");
        assert_eq!(b.replace_at(1, 2, "z"), Err(TextError::NotCharBoundary(3)));
        assert_eq!(
            b.replace_at(9, 1, "z"),
            Err(TextError::OutOfBounds { pos: 9, len: 3 })
        );
        assert_eq!(b.to_string(), "x\u{1F600}y");
    }

    #[test]
    fn insert_and_remove_clamp() {
        let mut b = Buffer::new("t", "ab");
        assert_eq!(b.insert(99, "c"), 1);
        assert_eq!(b.to_string(), "abc");
        assert_eq!(b.remove(1..99), "bc");
        assert_eq!(b.remove(5..9), "");
        assert_eq!(b.to_string(), "a");
    }

    #[test]
    fn midpoint_splits_on_clusters() {
        assert_eq!(grapheme::split_midpoint("◀⚫⚫▶"), ("◀⚫", "⚫▶"));
        assert_eq!(grapheme::split_midpoint("e\u{0301}x"), ("e\u{0301}", "x"));
        assert_eq!(grapheme::split_midpoint(""), ("", ""));
    }
}
