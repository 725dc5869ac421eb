//! Random character pickers and the selection-aware insertion policy.
//!
//! Position policy without a selection: for text longer than four codepoints
//! the insert lands strictly inside (`1..len`), never before the first or
//! after the last codepoint; shorter text accepts any position `0..=len`.
//! With a selection the selected range is replaced and the caret ends up just
//! after the inserted text.

use std::ops::Range;
use std::sync::LazyLock;

use core_unicode::tables::{self, CodepointRange};
use rand::Rng;
use rand::seq::SliceRandom;

/// Invisible ranges minus the blocks unsafe for random insertion.
static RANDOM_INVISIBLE_POOL: LazyLock<Vec<CodepointRange>> =
    LazyLock::new(|| tables::subtract(tables::INVISIBLE, tables::RANDOM_INVISIBLE_EXCLUDED));
static WORD_BREAK_CHARS: LazyLock<Vec<char>> = LazyLock::new(|| tables::members(tables::WORD_BREAK));
static NO_BREAK_CHARS: LazyLock<Vec<char>> = LazyLock::new(|| tables::members(tables::NO_BREAK));
static THIN_SPACE_CHARS: LazyLock<Vec<char>> = LazyLock::new(|| tables::members(tables::THIN_SPACES));

const ZWSP: char = '\u{200B}';

/// Which family a random insert draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertKind {
    Invisible,
    WordBreak,
    NoBreak,
}

/// Uniform subrange, then uniform codepoint inside it.
pub fn random_invisible<R: Rng + ?Sized>(rng: &mut R) -> char {
    let Some(&(start, end)) = RANDOM_INVISIBLE_POOL.choose(rng) else {
        return ZWSP;
    };
    char::from_u32(rng.gen_range(start..=end)).unwrap_or(ZWSP)
}

fn pick<R: Rng + ?Sized>(set: &[char], rng: &mut R, default: char) -> char {
    set.choose(rng).copied().unwrap_or(default)
}

pub fn random_word_break<R: Rng + ?Sized>(rng: &mut R) -> char {
    pick(&WORD_BREAK_CHARS, rng, ' ')
}

pub fn random_no_break<R: Rng + ?Sized>(rng: &mut R) -> char {
    pick(&NO_BREAK_CHARS, rng, '\u{00A0}')
}

pub fn random_thin_space<R: Rng + ?Sized>(rng: &mut R) -> char {
    pick(&THIN_SPACE_CHARS, rng, '\u{2009}')
}

pub fn random_variation_selector<R: Rng + ?Sized>(rng: &mut R) -> char {
    let (start, end) = tables::VARIATION_SELECTORS;
    char::from_u32(rng.gen_range(start..=end)).unwrap_or('\u{FE0F}')
}

pub fn random_char<R: Rng + ?Sized>(kind: InsertKind, rng: &mut R) -> char {
    match kind {
        InsertKind::Invisible => random_invisible(rng),
        InsertKind::WordBreak => random_word_break(rng),
        InsertKind::NoBreak => random_no_break(rng),
    }
}

/// Random insert position for text of `len` codepoints.
pub fn random_position<R: Rng + ?Sized>(len: usize, rng: &mut R) -> usize {
    if len > 4 {
        rng.gen_range(1..len)
    } else {
        rng.gen_range(0..=len)
    }
}

/// Result of an insertion: new text and caret (codepoint index).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub text: String,
    pub caret: usize,
}

/// Insert `insert` at the selection (replacing it) or at a random position.
pub fn insert_with_policy<R: Rng + ?Sized>(
    text: &str,
    insert: &str,
    selection: Option<Range<usize>>,
    rng: &mut R,
) -> Insertion {
    let len = text.chars().count();
    let range = match selection {
        Some(sel) => {
            let end = sel.end.min(len);
            sel.start.min(end)..end
        }
        None => {
            let pos = random_position(len, rng);
            pos..pos
        }
    };
    splice(text, range, insert)
}

/// Replace codepoints `range` of `text` with `insert`.
pub fn splice(text: &str, range: Range<usize>, insert: &str) -> Insertion {
    let byte_at = |idx: usize| text.char_indices().nth(idx).map_or(text.len(), |(b, _)| b);
    let (start, end) = (byte_at(range.start), byte_at(range.end));
    let mut out = String::with_capacity(text.len() + insert.len());
    out.push_str(&text[..start]);
    out.push_str(insert);
    out.push_str(&text[end..]);
    Insertion {
        text: out,
        caret: range.start + insert.chars().count(),
    }
}
