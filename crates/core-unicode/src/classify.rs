//! Codepoint classifier.
//!
//! Contract:
//! - `classify` is total: every `u32` (including surrogates and values past
//!   `0x10FFFF`) maps to exactly one [`Category`]; unknown input is `Visible`.
//! - Priority: newline > word-break > no-break > invisible (tag chars win inside
//!   invisible) > AI indicator > visible. Word-break therefore shadows the
//!   overlapping general-punctuation spaces in the AI indicator set.
//! - CRLF is a property of a *pair*; single-codepoint classification only ever
//!   yields `NewlineCr` or `NewlineLf`. Pairing happens in `classify_text`.

use crate::tables::{self, CodepointRange};

/// Semantic category of a single codepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Visible,
    Invisible,
    TagChar,
    WordBreak,
    NoBreak,
    AiIndicator,
    NewlineCr,
    NewlineLf,
    NewlineCrLf,
}

impl Category {
    /// Stable lowercase name (used by CLI output).
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Visible => "visible",
            Category::Invisible => "invisible",
            Category::TagChar => "tag",
            Category::WordBreak => "word-break",
            Category::NoBreak => "no-break",
            Category::AiIndicator => "ai-indicator",
            Category::NewlineCr => "newline-cr",
            Category::NewlineLf => "newline-lf",
            Category::NewlineCrLf => "newline-crlf",
        }
    }

    pub fn is_newline(self) -> bool {
        matches!(
            self,
            Category::NewlineCr | Category::NewlineLf | Category::NewlineCrLf
        )
    }

    /// Categories whose glyph is absent or blank and therefore get a label in
    /// annotated display.
    pub fn is_hidden(self) -> bool {
        matches!(
            self,
            Category::Invisible | Category::TagChar | Category::WordBreak | Category::NoBreak
        )
    }
}

pub fn is_invisible(cp: u32) -> bool {
    tables::contains(tables::INVISIBLE, cp)
}

/// Tag character mirroring printable ASCII (`U+E0020..=U+E007F`).
pub fn is_tag_char(cp: u32) -> bool {
    in_range(tables::TAG_CHARS, cp)
}

pub fn is_word_break(cp: u32) -> bool {
    tables::contains(tables::WORD_BREAK, cp)
}

pub fn is_no_break(cp: u32) -> bool {
    tables::contains(tables::NO_BREAK, cp)
}

pub fn is_ai_indicator(cp: u32) -> bool {
    tables::contains(tables::AI_INDICATOR, cp)
}

pub fn is_emoji(cp: u32) -> bool {
    tables::contains(tables::EMOJI, cp)
}

pub fn is_variation_selector(cp: u32) -> bool {
    in_range(tables::VARIATION_SELECTORS, cp)
}

/// Combining mark per the Unicode `M*` general categories.
pub fn is_combining_mark(cp: u32) -> bool {
    char::from_u32(cp).is_some_and(unicode_normalization::char::is_combining_mark)
}

fn in_range((start, end): CodepointRange, cp: u32) -> bool {
    (start..=end).contains(&cp)
}

/// Classify one codepoint.
pub fn classify(cp: u32) -> Category {
    match cp {
        0x0D => Category::NewlineCr,
        0x0A => Category::NewlineLf,
        _ if is_word_break(cp) => Category::WordBreak,
        _ if is_no_break(cp) => Category::NoBreak,
        _ if is_tag_char(cp) => Category::TagChar,
        _ if is_invisible(cp) => Category::Invisible,
        _ if is_ai_indicator(cp) => Category::AiIndicator,
        _ => Category::Visible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_cases() {
        assert_eq!(classify(0x200B), Category::Invisible);
        assert_eq!(classify(0xE0041), Category::TagChar);
        assert_eq!(classify(0x00A0), Category::NoBreak);
        assert_eq!(classify(0x0020), Category::WordBreak);
        assert_eq!(classify('a' as u32), Category::Visible);
        assert_eq!(classify(0x0D), Category::NewlineCr);
        assert_eq!(classify(0x0A), Category::NewlineLf);
    }

    #[test]
    fn word_break_shadows_general_punctuation() {
        // U+2003 EM SPACE is both a word-break space and inside 2000..206F.
        assert!(is_ai_indicator(0x2003));
        assert_eq!(classify(0x2003), Category::WordBreak);
        // U+2014 EM DASH only matches the AI set.
        assert_eq!(classify(0x2014), Category::AiIndicator);
    }

    #[test]
    fn invisible_shadows_ai_indicator() {
        // U+200D ZWJ sits in both tables.
        assert_eq!(classify(0x200D), Category::Invisible);
        assert_eq!(classify(0x2060), Category::Invisible);
    }

    #[test]
    fn tag_block_edges() {
        assert_eq!(classify(0xE0001), Category::Invisible);
        assert_eq!(classify(0xE001F), Category::Invisible);
        assert_eq!(classify(0xE0020), Category::TagChar);
        assert_eq!(classify(0xE007F), Category::TagChar);
        assert_eq!(classify(0xE0100), Category::Invisible);
    }

    #[test]
    fn garbage_input_is_visible() {
        assert_eq!(classify(0xD800), Category::Visible);
        assert_eq!(classify(0x11_0000), Category::Visible);
        assert_eq!(classify(u32::MAX), Category::Visible);
        assert!(!is_combining_mark(0xD800));
    }

    #[test]
    fn emoji_and_marks() {
        assert!(is_emoji(0x1F600));
        assert!(is_emoji(0x1F1E6));
        assert!(!is_emoji('x' as u32));
        assert!(is_combining_mark(0x0301));
        assert!(!is_combining_mark('e' as u32));
        assert!(is_variation_selector(0xFE0F));
    }
}
