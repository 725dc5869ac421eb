//! Homograph spoofing at a chaos fraction.
//!
//! Replace modes pick `min(n, max(1, floor(n * f)))` distinct positions out
//! of `n` codepoints, skip word-break positions and swap each remaining one for
//! a random member of its confusable group. A position without candidates is
//! left alone and does not count as a change.
//!
//! Add modes insert one randomly chosen thin space (or variation selector) at
//! `min(n-1, max(1, floor((n-1) * f)))` distinct interior gaps `1..=n-1`.

use std::fmt;
use std::str::FromStr;

use core_data::ConfusableSource;
use rand::Rng;
use rand::seq::SliceRandom;
use rand::seq::index;
use tracing::debug;

use crate::insert::{random_thin_space, random_variation_selector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpoofMode {
    #[default]
    ReplaceDifferent,
    ReplaceSame,
    AddThinSpaces,
    AddVariationSelectors,
}

impl SpoofMode {
    pub const ALL: [SpoofMode; 4] = [
        SpoofMode::ReplaceDifferent,
        SpoofMode::ReplaceSame,
        SpoofMode::AddThinSpaces,
        SpoofMode::AddVariationSelectors,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SpoofMode::ReplaceDifferent => "replace-different",
            SpoofMode::ReplaceSame => "replace-same",
            SpoofMode::AddThinSpaces => "add-thin-spaces",
            SpoofMode::AddVariationSelectors => "add-variation-selectors",
        }
    }
}

impl fmt::Display for SpoofMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpoofMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s.trim())
            .ok_or_else(|| format!("unknown spoof mode: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpoofOutcome {
    pub text: String,
    pub changes: usize,
}

impl SpoofOutcome {
    /// Human summary: "Made 3 changes." / "No changes made."
    pub fn summary(&self) -> String {
        match self.changes {
            0 => "No changes made.".to_string(),
            1 => "Made 1 change.".to_string(),
            n => format!("Made {n} changes."),
        }
    }
}

fn sanitize_fraction(f: f64) -> f64 {
    if f.is_nan() { 0.0 } else { f.clamp(0.0, 1.0) }
}

/// `min(count, max(1, floor(count * f)))`
fn target_count(count: usize, f: f64) -> usize {
    let scaled = (count as f64 * sanitize_fraction(f)).floor() as usize;
    count.min(scaled.max(1))
}

pub fn spoof<S, R>(text: &str, mode: SpoofMode, chaos: f64, source: &S, rng: &mut R) -> SpoofOutcome
where
    S: ConfusableSource + ?Sized,
    R: Rng + ?Sized,
{
    let outcome = match mode {
        SpoofMode::ReplaceDifferent | SpoofMode::ReplaceSame => {
            replace_confusables(text, mode == SpoofMode::ReplaceSame, chaos, source, rng)
        }
        SpoofMode::AddThinSpaces => {
            let c = random_thin_space(rng);
            add_random_characters(text, chaos, c, rng)
        }
        SpoofMode::AddVariationSelectors => {
            let c = random_variation_selector(rng);
            add_random_characters(text, chaos, c, rng)
        }
    };
    debug!(
        target: "transform.spoof",
        mode = mode.as_str(),
        chaos,
        len = text.chars().count(),
        changes = outcome.changes,
        "spoof_applied"
    );
    outcome
}

fn replace_confusables<S, R>(text: &str, same: bool, chaos: f64, source: &S, rng: &mut R) -> SpoofOutcome
where
    S: ConfusableSource + ?Sized,
    R: Rng + ?Sized,
{
    let mut chars: Vec<String> = text.chars().map(String::from).collect();
    let count = chars.len();
    if count == 0 {
        return SpoofOutcome {
            text: String::new(),
            changes: 0,
        };
    }
    let mut changes = 0;
    for idx in index::sample(rng, count, target_count(count, chaos)) {
        let current = &chars[idx];
        if current.chars().next().is_some_and(|c| core_unicode::is_word_break(c as u32)) {
            continue;
        }
        let groups = source.groups(current);
        let candidates = if same {
            &groups.normalize_same
        } else {
            &groups.normalize_different
        };
        if let Some(pick) = candidates.choose(rng) {
            chars[idx] = pick.clone();
            changes += 1;
        }
    }
    SpoofOutcome {
        text: chars.concat(),
        changes,
    }
}

/// Insert `c` at a fraction of the interior gaps of `text`.
pub fn add_random_characters<R: Rng + ?Sized>(text: &str, fraction: f64, c: char, rng: &mut R) -> SpoofOutcome {
    let mut chars: Vec<char> = text.chars().collect();
    if chars.len() <= 1 {
        return SpoofOutcome {
            text: text.to_string(),
            changes: 0,
        };
    }
    let gaps = chars.len() - 1;
    let mut positions: Vec<usize> = index::sample(rng, gaps, target_count(gaps, fraction))
        .into_iter()
        .map(|p| p + 1)
        .collect();
    positions.sort_unstable_by(|a, b| b.cmp(a));
    for &pos in &positions {
        chars.insert(pos, c);
    }
    SpoofOutcome {
        text: chars.into_iter().collect(),
        changes: positions.len(),
    }
}
