//! Static codepoint range tables.
//!
//! Every table is a slice of inclusive `(start, end)` ranges sorted by `start`
//! with no overlaps, so membership is a single binary search (`contains`).
//! Single codepoints are written as one-element ranges.
//!
//! Invariants:
//! - Tables stay sorted & non-overlapping (enforced by `tables_are_sorted` test).
//! - No table contains a surrogate codepoint; every entry maps to a `char`.

use std::cmp::Ordering;

/// Inclusive codepoint range.
pub type CodepointRange = (u32, u32);

/// Codepoints rendered without a glyph.
pub const INVISIBLE: &[CodepointRange] = &[
    (0x00AD, 0x00AD),   // Soft hyphen
    (0x061C, 0x061C),   // Arabic letter mark
    (0x180E, 0x180E),   // Mongolian vowel separator
    (0x200B, 0x200F),   // Zero-width and directional marks
    (0x202A, 0x202E),   // Bidirectional text overrides
    (0x2060, 0x206F),   // Invisible operators and markers
    (0xFEFF, 0xFEFF),   // Zero-width no-break space
    (0x1D173, 0x1D17A), // Musical invisible symbols
    (0xE0000, 0xE007F), // Tags
    (0xE0100, 0xE01EF), // Variation selectors supplement
];

/// Subranges of [`INVISIBLE`] that random insertion must never draw from.
/// Random codepoints there either reshape neighbours (ZWNJ, overrides) or
/// carry payload meaning (tags, variation selectors).
pub const RANDOM_INVISIBLE_EXCLUDED: &[CodepointRange] = &[
    (0x200C, 0x200C),
    (0x202A, 0x202E),
    (0x1D173, 0x1D17A),
    (0xE0000, 0xE01FF),
];

/// Whole tag block (language tag + cancel tag + ASCII mirrors).
pub const TAG_BLOCK: CodepointRange = (0xE0000, 0xE007F);

/// Tag characters that mirror printable ASCII (`cp - 0xE0000`).
pub const TAG_CHARS: CodepointRange = (0xE0020, 0xE007F);

/// Offset between an ASCII codepoint and its tag mirror.
pub const TAG_OFFSET: u32 = 0xE0000;

/// Word-break spaces (WSegSpace plus form feed and line/paragraph separators).
pub const WORD_BREAK: &[CodepointRange] = &[
    (0x000C, 0x000C), // Form feed
    (0x0020, 0x0020), // Space
    (0x2000, 0x2006), // En quad .. six-per-em space
    (0x2008, 0x200A), // Punctuation space .. hair space
    (0x2028, 0x2029), // Line / paragraph separator
    (0x205F, 0x205F), // Medium mathematical space
    (0x3000, 0x3000), // Ideographic space
];

/// Spaces with a `<noBreak>` decomposition.
pub const NO_BREAK: &[CodepointRange] = &[
    (0x00A0, 0x00A0), // No-break space
    (0x2007, 0x2007), // Figure space
    (0x202F, 0x202F), // Narrow no-break space
];

/// Narrow word-break spaces used by the thin-space spoof.
pub const THIN_SPACES: &[CodepointRange] = &[
    (0x2006, 0x2006), // Six-per-em space
    (0x2009, 0x200A), // Thin space, hair space
    (0x205F, 0x205F), // Medium mathematical space
];

/// Standardized variation selectors VS1..VS16.
pub const VARIATION_SELECTORS: CodepointRange = (0xFE00, 0xFE0F);

/// Non-keyboard punctuation, arrows and operators typical of generated text.
pub const AI_INDICATOR: &[CodepointRange] = &[
    (0x00AB, 0x00AB), // «
    (0x00BB, 0x00BB), // »
    (0x02D7, 0x02D7), // Modifier minus
    (0x05BE, 0x05BE), // Hebrew maqaf
    (0x060C, 0x060C), // Arabic comma
    (0x061B, 0x061B), // Arabic semicolon
    (0x061F, 0x061F), // Arabic question mark
    (0x06D4, 0x06D4), // Arabic full stop
    (0x2000, 0x206F), // General punctuation
    (0x2190, 0x21FF), // Arrows
    (0x2212, 0x2212), // Minus sign
    (0x2794, 0x2794),
    (0x27A1, 0x27A1),
    (0x27A4, 0x27A4),
    (0x2CBA, 0x2CBA), // Coptic dialect-p ni
    (0x3001, 0x3002), // Ideographic comma / full stop
    (0x30FB, 0x30FB), // Katakana middle dot
    (0xFE58, 0xFE58), // Small em dash
    (0xFF01, 0xFF0F), // Fullwidth punctuation
    (0xFF1A, 0xFF1F),
];

/// Emoji blocks.
pub const EMOJI: &[CodepointRange] = &[
    (0x2600, 0x26FF),   // Misc symbols
    (0x2700, 0x27BF),   // Dingbats
    (0x1F1E6, 0x1F1FF), // Regional indicator symbols
    (0x1F300, 0x1F5FF), // Misc symbols and pictographs
    (0x1F600, 0x1F64F), // Emoticons
    (0x1F680, 0x1F6FF), // Transport & map
    (0x1F900, 0x1F9FF), // Supplemental symbols and pictographs
    (0x1FA70, 0x1FAFF), // Symbols and pictographs extended-A
];

/// Binary search a sorted range table.
pub fn contains(table: &[CodepointRange], cp: u32) -> bool {
    table
        .binary_search_by(|&(start, end)| {
            if end < cp {
                Ordering::Less
            } else if start > cp {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        })
        .is_ok()
}

/// Expand a table into its member characters (small tables only).
pub fn members(table: &[CodepointRange]) -> Vec<char> {
    table
        .iter()
        .flat_map(|&(start, end)| start..=end)
        .filter_map(char::from_u32)
        .collect()
}

/// Subtract sorted `excluded` ranges from sorted `ranges`.
pub fn subtract(ranges: &[CodepointRange], excluded: &[CodepointRange]) -> Vec<CodepointRange> {
    let mut out = Vec::new();
    for &(start, end) in ranges {
        let mut current = start;
        for &(ex_start, ex_end) in excluded {
            if ex_end < current {
                continue;
            }
            if ex_start > end {
                break;
            }
            if current < ex_start {
                out.push((current, end.min(ex_start - 1)));
            }
            current = current.max(ex_end.saturating_add(1));
        }
        if current <= end {
            out.push((current, end));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sorted_disjoint(table: &[CodepointRange]) -> bool {
        table.iter().all(|&(s, e)| s <= e) && table.windows(2).all(|w| w[0].1 < w[1].0)
    }

    #[test]
    fn tables_are_sorted() {
        for table in [
            INVISIBLE,
            RANDOM_INVISIBLE_EXCLUDED,
            WORD_BREAK,
            NO_BREAK,
            THIN_SPACES,
            AI_INDICATOR,
            EMOJI,
        ] {
            assert!(sorted_disjoint(table), "table out of order: {table:x?}");
        }
    }

    #[test]
    fn contains_hits_range_edges() {
        assert!(contains(INVISIBLE, 0x200B));
        assert!(contains(INVISIBLE, 0x200F));
        assert!(!contains(INVISIBLE, 0x2010));
        assert!(contains(INVISIBLE, 0xE01EF));
        assert!(!contains(INVISIBLE, 0xE01F0));
        assert!(!contains(&[], 0x41));
    }

    #[test]
    fn random_invisible_pool_excludes_payload_blocks() {
        let pool = subtract(INVISIBLE, RANDOM_INVISIBLE_EXCLUDED);
        assert_eq!(
            pool,
            vec![
                (0x00AD, 0x00AD),
                (0x061C, 0x061C),
                (0x180E, 0x180E),
                (0x200B, 0x200B),
                (0x200D, 0x200F),
                (0x2060, 0x206F),
                (0xFEFF, 0xFEFF),
            ]
        );
    }

    #[test]
    fn members_expands_word_break_set() {
        let all = members(WORD_BREAK);
        assert_eq!(all.len(), 16);
        assert!(all.contains(&' '));
        assert!(!all.contains(&'\u{2007}'));
    }
}
