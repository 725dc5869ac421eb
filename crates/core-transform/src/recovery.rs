//! Corruption / recovery guesses.
//!
//! Every transform reinterprets the input's bytes or UTF-16 code units under a
//! different (wrong) encoding assumption. Results are UTF-16 unit vectors so
//! lone surrogates survive until filtering; a candidate is dropped when it is
//! empty, equal to the input, or more than half unpaired low surrogates.

use std::collections::HashMap;
use std::sync::LazyLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryCandidate {
    pub label: &'static str,
    pub text: String,
}

type Transform = fn(&str) -> Vec<u16>;

const BATTERY: &[(&str, Transform)] = &[
    ("UTF-8 bytes shifted +1", utf8_shift_up),
    ("UTF-8 bytes shifted -1", utf8_shift_down),
    ("UTF-8 decoded as UTF-16", utf8_as_utf16),
    ("UTF-16 endianness swap", utf16_swap_endianness),
    ("UTF-16 bytes offset by one", utf16_byte_offset),
    ("UTF-16 truncated to low byte", utf16_low_byte),
    ("UTF-16 decoded as UTF-8", utf16_as_utf8),
    ("Latin-1 to UTF-8 recovery", latin1_as_utf8),
    ("Double UTF-8 (Windows-1252) recovery", cp1252_as_utf8),
];

/// Run the whole battery and keep plausible candidates.
pub fn recover(input: &str) -> Vec<RecoveryCandidate> {
    let original: Vec<u16> = input.encode_utf16().collect();
    BATTERY
        .iter()
        .filter_map(|&(label, transform)| {
            let units = transform(input);
            is_plausible(&original, &units).then(|| RecoveryCandidate {
                label,
                text: String::from_utf16_lossy(&units),
            })
        })
        .collect()
}

fn is_plausible(original: &[u16], units: &[u16]) -> bool {
    !units.is_empty() && units != original && unpaired_low_surrogates(units) * 2 <= units.len()
}

/// Low surrogates not preceded by a high surrogate.
pub fn unpaired_low_surrogates(units: &[u16]) -> usize {
    let is_high = |u: u16| (0xD800..=0xDBFF).contains(&u);
    let is_low = |u: u16| (0xDC00..=0xDFFF).contains(&u);
    units
        .iter()
        .enumerate()
        .filter(|&(i, &u)| is_low(u) && !(i > 0 && is_high(units[i - 1])))
        .count()
}

fn utf16(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

fn utf8_shifted(input: &str, delta: i8) -> Vec<u16> {
    let bytes: Vec<u8> = input.bytes().map(|b| b.wrapping_add_signed(delta)).collect();
    utf16(&String::from_utf8_lossy(&bytes))
}

fn utf8_shift_up(input: &str) -> Vec<u16> {
    utf8_shifted(input, 1)
}

fn utf8_shift_down(input: &str) -> Vec<u16> {
    utf8_shifted(input, -1)
}

fn pair_le(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

fn utf16_le_bytes(input: &str) -> Vec<u8> {
    input.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

fn utf8_as_utf16(input: &str) -> Vec<u16> {
    pair_le(input.as_bytes())
}

fn utf16_swap_endianness(input: &str) -> Vec<u16> {
    input.encode_utf16().map(u16::swap_bytes).collect()
}

fn utf16_byte_offset(input: &str) -> Vec<u16> {
    let bytes = utf16_le_bytes(input);
    pair_le(bytes.get(1..).unwrap_or_default())
}

fn utf16_low_byte(input: &str) -> Vec<u16> {
    input.encode_utf16().map(|u| u & 0x00FF).collect()
}

fn utf16_as_utf8(input: &str) -> Vec<u16> {
    utf16(&String::from_utf8_lossy(&utf16_le_bytes(input)))
}

fn latin1_as_utf8(input: &str) -> Vec<u16> {
    let bytes: Vec<u8> = input.chars().map(|c| (c as u32 & 0xFF) as u8).collect();
    utf16(&String::from_utf8_lossy(&bytes))
}

/// Windows-1252 codepoints in 0x80..=0x9F that differ from Latin-1.
const CP1252_HIGH: &[(char, u8)] = &[
    ('\u{20AC}', 0x80),
    ('\u{201A}', 0x82),
    ('\u{0192}', 0x83),
    ('\u{201E}', 0x84),
    ('\u{2026}', 0x85),
    ('\u{2020}', 0x86),
    ('\u{2021}', 0x87),
    ('\u{02C6}', 0x88),
    ('\u{2030}', 0x89),
    ('\u{0160}', 0x8A),
    ('\u{2039}', 0x8B),
    ('\u{0152}', 0x8C),
    ('\u{017D}', 0x8E),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201C}', 0x93),
    ('\u{201D}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('\u{02DC}', 0x98),
    ('\u{2122}', 0x99),
    ('\u{0161}', 0x9A),
    ('\u{203A}', 0x9B),
    ('\u{0153}', 0x9C),
    ('\u{017E}', 0x9E),
    ('\u{0178}', 0x9F),
];

static CP1252_REVERSE: LazyLock<HashMap<char, u8>> =
    LazyLock::new(|| CP1252_HIGH.iter().copied().collect());

fn cp1252_byte(c: char) -> Option<u8> {
    match u8::try_from(u32::from(c)) {
        Ok(b) => Some(b),
        Err(_) => CP1252_REVERSE.get(&c).copied(),
    }
}

/// Undo UTF-8 that was decoded as Windows-1252 and re-encoded. Empty when
/// the input holds a codepoint Windows-1252 cannot produce.
fn cp1252_as_utf8(input: &str) -> Vec<u16> {
    match input.chars().map(cp1252_byte).collect::<Option<Vec<u8>>>() {
        Some(bytes) => utf16(&String::from_utf8_lossy(&bytes)),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels(input: &str) -> Vec<&'static str> {
        recover(input).into_iter().map(|c| c.label).collect()
    }

    fn candidate(input: &str, label: &str) -> Option<String> {
        recover(input).into_iter().find(|c| c.label == label).map(|c| c.text)
    }

    #[test]
    fn identity_results_are_dropped() {
        let got = labels("hello");
        assert!(!got.contains(&"UTF-16 truncated to low byte"));
        assert!(!got.contains(&"Latin-1 to UTF-8 recovery"));
        assert!(got.contains(&"UTF-8 bytes shifted +1"));
        assert_eq!(candidate("hello", "UTF-8 bytes shifted +1").as_deref(), Some("ifmmp"));
    }

    #[test]
    fn endianness_swap_recovers_ascii() {
        let corrupted = "\u{6800}\u{6500}\u{6C00}\u{6C00}\u{6F00}\u{2100}";
        assert_eq!(
            candidate(corrupted, "UTF-16 endianness swap").as_deref(),
            Some("hello!")
        );
    }

    #[test]
    fn mojibake_is_undone() {
        assert_eq!(
            candidate("donâ€™t", "Double UTF-8 (Windows-1252) recovery").as_deref(),
            Some("don\u{2019}t")
        );
        assert_eq!(candidate("cafÃ©", "Latin-1 to UTF-8 recovery").as_deref(), Some("café"));
    }

    #[test]
    fn utf8_pairs_read_as_utf16() {
        assert_eq!(candidate("hi", "UTF-8 decoded as UTF-16").as_deref(), Some("\u{6968}"));
    }

    #[test]
    fn unpaired_low_surrogate_counting() {
        assert_eq!(unpaired_low_surrogates(&[0xD83D, 0xDE00]), 0);
        assert_eq!(unpaired_low_surrogates(&[0xDE00, 0x0041]), 1);
        assert!(!is_plausible(&[0x41], &[0xDC00, 0xDC01, 0x41]));
        assert!(is_plausible(&[0x41], &[0xDC00, 0x42]));
    }
}
