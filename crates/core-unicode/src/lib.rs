//! Codepoint classification tables and classifier.
//!
//! Text is always walked by codepoint (`str::chars`), never by UTF-16 unit, so
//! astral characters (tags, supplementary CJK, emoji) classify correctly.

pub mod bidi;
pub mod classify;
pub mod tables;
pub mod tag;

pub use bidi::{BidiControl, ControlGroup, ControlGroupKind, Flow, LTR_GROUPS, RTL_GROUPS};
pub use classify::{
    Category, classify, is_ai_indicator, is_combining_mark, is_emoji, is_invisible, is_no_break,
    is_tag_char, is_variation_selector, is_word_break,
};

/// One classified unit of text. CRLF pairs collapse into a single span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedSpan {
    /// Index of the first codepoint of the span.
    pub index: usize,
    /// Byte offset into the source string.
    pub byte: usize,
    /// Source text covered by the span (one codepoint, or `"\r\n"`).
    pub source: String,
    pub category: Category,
}

impl ClassifiedSpan {
    /// Leading codepoint of the span.
    pub fn codepoint(&self) -> u32 {
        self.source.chars().next().map(u32::from).unwrap_or(0)
    }

    /// Number of codepoints covered.
    pub fn len_chars(&self) -> usize {
        self.source.chars().count()
    }
}

/// Classify every codepoint in `text`, pairing CR LF into `NewlineCrLf`.
pub fn classify_text(text: &str) -> Vec<ClassifiedSpan> {
    let mut out = Vec::new();
    let mut iter = text.char_indices().enumerate().peekable();
    while let Some((index, (byte, c))) = iter.next() {
        if c == '\r' && matches!(iter.peek(), Some((_, (_, '\n')))) {
            iter.next();
            out.push(ClassifiedSpan {
                index,
                byte,
                source: "\r\n".to_string(),
                category: Category::NewlineCrLf,
            });
            continue;
        }
        out.push(ClassifiedSpan {
            index,
            byte,
            source: c.to_string(),
            category: classify(c as u32),
        });
    }
    out
}

/// True if any codepoint of `text` is an AI indicator.
pub fn contains_ai_indicator(text: &str) -> bool {
    text.chars().any(|c| is_ai_indicator(c as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_collapses_and_indices_stay_in_codepoints() {
        let spans = classify_text("a\r\nb\rc\n\u{E0041}");
        let cats: Vec<Category> = spans.iter().map(|s| s.category).collect();
        assert_eq!(
            cats,
            vec![
                Category::Visible,
                Category::NewlineCrLf,
                Category::Visible,
                Category::NewlineCr,
                Category::Visible,
                Category::NewlineLf,
                Category::TagChar,
            ]
        );
        assert_eq!(spans[2].index, 3);
        assert_eq!(spans[6].index, 7);
        assert_eq!(spans[6].byte, 8);
        assert_eq!(spans[1].len_chars(), 2);
    }

    #[test]
    fn empty_text_has_no_spans() {
        assert!(classify_text("").is_empty());
    }

    #[test]
    fn ai_indicator_detection() {
        assert!(contains_ai_indicator("well — yes"));
        assert!(!contains_ai_indicator("plain - text"));
    }
}
