//! Random-codepoint noise wrapped around text.

use rand::Rng;
use rand::seq::SliceRandom;

use core_unicode::tables::CodepointRange;

pub const DEFAULT_RANGES: &str = "00A1-2BFF,FE00-FFFF,1D400-1D7FF,1F300-1F6FF,1F900-1FAFF";
pub const DEFAULT_COUNT: usize = 10;

/// Parse `"00A1-2BFF,FE00"` into ranges. Malformed, reversed or out-of-range
/// entries are skipped.
pub fn parse_ranges(spec: &str) -> Vec<CodepointRange> {
    spec.split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            let (start, end) = match entry.split_once('-') {
                Some((s, e)) => (s.trim(), e.trim()),
                None => (entry, entry),
            };
            let start = u32::from_str_radix(start, 16).ok()?;
            let end = u32::from_str_radix(end, 16).ok()?;
            (start <= end && end <= 0x10FFFF).then_some((start, end))
        })
        .collect()
}

/// Draw up to `count` codepoints from `ranges` (at most `count * 20` draws;
/// surrogates are skipped).
pub fn generate_noise<R: Rng + ?Sized>(ranges: &[CodepointRange], count: usize, rng: &mut R) -> String {
    let mut out = String::new();
    let mut produced = 0;
    for _ in 0..count.saturating_mul(20) {
        if produced == count {
            break;
        }
        let Some(&(start, end)) = ranges.choose(rng) else {
            break;
        };
        if let Some(c) = char::from_u32(rng.gen_range(start..=end)) {
            out.push(c);
            produced += 1;
        }
    }
    out
}

/// Wrap `text` inside fresh noise at a random split point.
pub fn add_noise<R: Rng + ?Sized>(text: &str, ranges: &str, count: usize, rng: &mut R) -> String {
    let ranges = parse_ranges(ranges);
    if ranges.is_empty() {
        return text.to_string();
    }
    let noise = generate_noise(&ranges, count, rng);
    let split = rng.gen_range(0..=noise.chars().count());
    let at = noise.char_indices().nth(split).map_or(noise.len(), |(b, _)| b);
    let (before, after) = noise.split_at(at);
    format!("{before}{text}{after}")
}
