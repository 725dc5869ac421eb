//! URL twister: typo, leetspeak and decoy-domain variants of a URL.
//!
//! Twists apply to the domain label (the first host label after an optional
//! `www.`), spliced back into the input string so scheme, path and casing of
//! everything else survive. The host is located in the input as typed, so
//! internationalized hosts are twisted in their Unicode form, never punycode. Output order: the deduplicated, shuffled subtle
//! variants first, then the fixed always-at-end group (host after a decoy URL
//! in four forms, random filler) so the obvious spoofs come last.

use std::ops::Range;

use rand::Rng;
use rand::seq::SliceRandom;
use rand::seq::index;
use thiserror::Error;
use tracing::info;
use url::Url;

#[derive(Debug, Error)]
pub enum TwistError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("URL has no domain label to twist")]
    MissingDomain,
}

/// Number of entries always appended after the shuffled variants.
pub const ALWAYS_AT_END: usize = 5;

const DECOY_WORDS: &[&str] = &["secure", "login", "account", "verify", "support", "official", "auth"];
const FILLER_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// One transform of the domain label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Twist {
    CharSwap,
    MissingChar,
    AddedChar,
    Repetition,
    ReplacedChar,
    /// Replace up to `n` letters with look-alike digits.
    Leetspeak(usize),
    /// Swap one Latin letter for a Cyrillic look-alike.
    Homoglyph,
    RemoveVowels,
}

fn keyboard_neighbours(c: char) -> &'static str {
    match c {
        'q' => "wa",
        'w' => "qes",
        'e' => "wrd",
        'r' => "etf",
        't' => "ryg",
        'y' => "tuh",
        'u' => "yij",
        'i' => "uok",
        'o' => "ipl",
        'p' => "ol",
        'a' => "qsz",
        's' => "adwx",
        'd' => "sfec",
        'f' => "dgrv",
        'g' => "fhtb",
        'h' => "gjyn",
        'j' => "hkum",
        'k' => "jli",
        'l' => "ko",
        'z' => "asx",
        'x' => "zsc",
        'c' => "xdv",
        'v' => "cfb",
        'b' => "vgn",
        'n' => "bhm",
        'm' => "nj",
        _ => "",
    }
}

fn leet(c: char) -> Option<char> {
    match c.to_ascii_lowercase() {
        'a' => Some('4'),
        'b' => Some('8'),
        'e' => Some('3'),
        'g' => Some('9'),
        'i' | 'l' => Some('1'),
        'o' => Some('0'),
        's' => Some('5'),
        't' => Some('7'),
        _ => None,
    }
}

fn homoglyph(c: char) -> Option<char> {
    match c {
        'a' => Some('\u{430}'),
        'c' => Some('\u{441}'),
        'e' => Some('\u{435}'),
        'i' => Some('\u{456}'),
        'j' => Some('\u{458}'),
        'o' => Some('\u{43E}'),
        'p' => Some('\u{440}'),
        's' => Some('\u{455}'),
        'x' => Some('\u{445}'),
        'y' => Some('\u{443}'),
        _ => None,
    }
}

fn random_from<R: Rng + ?Sized>(alphabet: &[u8], rng: &mut R) -> char {
    alphabet.choose(rng).map_or('x', |&b| b as char)
}

impl Twist {
    pub fn apply<R: Rng + ?Sized>(self, label: &str, rng: &mut R) -> String {
        let mut chars: Vec<char> = label.chars().collect();
        let len = chars.len();
        match self {
            Twist::CharSwap if len >= 2 => {
                let i = rng.gen_range(0..len - 1);
                chars.swap(i, i + 1);
            }
            Twist::MissingChar if len >= 2 => {
                chars.remove(rng.gen_range(0..len));
            }
            Twist::AddedChar => {
                let c = random_from(LOWERCASE, rng);
                chars.insert(rng.gen_range(0..=len), c);
            }
            Twist::Repetition if len >= 1 => {
                let i = rng.gen_range(0..len);
                let c = chars[i];
                chars.insert(i, c);
            }
            Twist::ReplacedChar if len >= 1 => {
                let i = rng.gen_range(0..len);
                let near = keyboard_neighbours(chars[i].to_ascii_lowercase());
                let replacement = if near.is_empty() {
                    random_from(LOWERCASE, rng)
                } else {
                    random_from(near.as_bytes(), rng)
                };
                chars[i] = replacement;
            }
            Twist::Leetspeak(n) => {
                let candidates: Vec<usize> = (0..len).filter(|&i| leet(chars[i]).is_some()).collect();
                let amount = n.min(candidates.len());
                for pick in index::sample(rng, candidates.len(), amount) {
                    let i = candidates[pick];
                    if let Some(d) = leet(chars[i]) {
                        chars[i] = d;
                    }
                }
            }
            Twist::Homoglyph => {
                let candidates: Vec<usize> = (0..len).filter(|&i| homoglyph(chars[i]).is_some()).collect();
                if let Some(&i) = candidates.choose(rng) {
                    if let Some(h) = homoglyph(chars[i]) {
                        chars[i] = h;
                    }
                }
            }
            Twist::RemoveVowels => {
                let kept: Vec<char> = chars
                    .iter()
                    .copied()
                    .filter(|c| !matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'))
                    .collect();
                if !kept.is_empty() {
                    chars = kept;
                }
            }
            _ => {}
        }
        chars.into_iter().collect()
    }
}

/// Input split around its domain label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainParts<'a> {
    pub before: &'a str,
    pub label: &'a str,
    pub after: &'a str,
}

impl DomainParts<'_> {
    fn with_label(&self, label: &str) -> String {
        format!("{}{}{}", self.before, label, self.after)
    }
}

/// Byte range of the host in `input` as typed: userinfo and port excluded.
fn host_span(input: &str) -> Result<Range<usize>, TwistError> {
    let url = Url::parse(input)?;
    if url.host_str().is_none() {
        return Err(TwistError::MissingDomain);
    }
    let start = input.find("://").map(|i| i + 3).ok_or(TwistError::MissingDomain)?;
    let rest = &input[start..];
    let authority = &rest[..rest.find(['/', '\\', '?', '#']).unwrap_or(rest.len())];
    let host_start = authority.rfind('@').map_or(0, |i| i + 1);
    let host = &authority[host_start..];
    let host_len = if host.starts_with('[') {
        host.find(']').map_or(host.len(), |i| i + 1)
    } else {
        host.rfind(':').unwrap_or(host.len())
    };
    if host_len == 0 {
        return Err(TwistError::MissingDomain);
    }
    let from = start + host_start;
    Ok(from..from + host_len)
}

pub fn split_domain(input: &str) -> Result<DomainParts<'_>, TwistError> {
    let span = host_span(input)?;
    let host = &input[span.clone()];
    let skip = if host.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("www.")) { 4 } else { 0 };
    let bare = &host[skip..];
    let label_len = bare.find('.').unwrap_or(bare.len());
    if label_len == 0 {
        return Err(TwistError::MissingDomain);
    }
    let start = span.start + skip;
    let end = start + label_len;
    Ok(DomainParts {
        before: &input[..start],
        label: &input[start..end],
        after: &input[end..],
    })
}

/// Apply each twist to the domain label of `input`.
pub fn generate<R: Rng + ?Sized>(input: &str, twists: &[Twist], rng: &mut R) -> Result<Vec<String>, TwistError> {
    let parts = split_domain(input)?;
    Ok(twists
        .iter()
        .map(|t| parts.with_label(&t.apply(parts.label, rng)))
        .collect())
}

/// Attach a decoy word to the domain label (`paypal-login`, `secure-paypal`).
pub fn add_words_to_domain<R: Rng + ?Sized>(input: &str, rng: &mut R) -> Result<String, TwistError> {
    let parts = split_domain(input)?;
    let word = DECOY_WORDS.choose(rng).copied().unwrap_or("secure");
    let label = if rng.gen_bool(0.5) {
        format!("{}-{word}", parts.label)
    } else {
        format!("{word}-{}", parts.label)
    };
    Ok(parts.with_label(&label))
}

/// Put the real host after a decoy host, as a path or a fragment.
pub fn host_after_example_url<R: Rng + ?Sized>(
    input: &str,
    use_ip: bool,
    use_fragment: bool,
    rng: &mut R,
) -> Result<String, TwistError> {
    let span = host_span(input)?;
    let host = &input[span];
    let url = Url::parse(input)?;
    let decoy = if use_ip {
        format!("192.0.2.{}", rng.gen_range(1..=254))
    } else {
        "example.com".to_string()
    };
    let sep = if use_fragment { '#' } else { '/' };
    let path = url.path().trim_start_matches('/');
    let tail = if path.is_empty() {
        host.to_string()
    } else {
        format!("{host}/{path}")
    };
    Ok(format!("{}://{decoy}{sep}{tail}", url.scheme()))
}

/// Append a random alphanumeric filler to the domain label.
pub fn add_random_filler_to_domain<R: Rng + ?Sized>(input: &str, rng: &mut R) -> Result<String, TwistError> {
    let parts = split_domain(input)?;
    let len = rng.gen_range(3..=6);
    let filler: String = (0..len).map(|_| random_from(FILLER_ALPHABET, rng)).collect();
    Ok(parts.with_label(&format!("{}-{filler}", parts.label)))
}

const SUBTLE_BATTERY: &[Twist] = &[
    Twist::CharSwap,
    Twist::CharSwap,
    Twist::CharSwap,
    Twist::AddedChar,
    Twist::AddedChar,
    Twist::MissingChar,
    Twist::MissingChar,
    Twist::MissingChar,
    Twist::Repetition,
    Twist::Repetition,
    Twist::ReplacedChar,
    Twist::ReplacedChar,
    Twist::ReplacedChar,
    Twist::Homoglyph,
    Twist::Homoglyph,
    Twist::RemoveVowels,
];

const WORDED_BATTERY: &[Twist] = &[
    Twist::CharSwap,
    Twist::AddedChar,
    Twist::MissingChar,
    Twist::Repetition,
    Twist::ReplacedChar,
    Twist::Leetspeak(1),
];

/// Full twister run over a validated URL.
pub fn twist<R: Rng + ?Sized>(input: &str, rng: &mut R) -> Result<Vec<String>, TwistError> {
    let input = input.trim();
    let mut variants = vec![add_words_to_domain(input, rng)?];
    variants.extend(generate(input, SUBTLE_BATTERY, rng)?);
    for typo in generate(input, WORDED_BATTERY, rng)? {
        if let Ok(worded) = add_words_to_domain(&typo, rng) {
            variants.push(worded);
        }
    }

    let mut seen = std::collections::HashSet::new();
    variants.retain(|v| seen.insert(v.clone()));
    variants.shuffle(rng);

    for (use_ip, use_fragment) in [(false, false), (true, false), (false, true), (true, true)] {
        variants.push(host_after_example_url(input, use_ip, use_fragment, rng)?);
    }
    variants.push(add_random_filler_to_domain(input, rng)?);

    info!(target: "transform.url", variants = variants.len(), "url_twisted");
    Ok(variants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn splits_around_label() {
        let parts = split_domain("https://www.PayPal.com/login?x=1").unwrap();
        assert_eq!(parts.before, "https://www.");
        assert_eq!(parts.label, "PayPal");
        assert_eq!(parts.after, ".com/login?x=1");
    }

    #[test]
    fn host_is_found_past_userinfo_and_port() {
        let parts = split_domain("https://evil:x@evil.com:8443/evil").unwrap();
        assert_eq!(parts.before, "https://evil:x@");
        assert_eq!(parts.label, "evil");
        assert_eq!(parts.after, ".com:8443/evil");
    }

    #[test]
    fn unicode_hosts_keep_their_typed_form() {
        let parts = split_domain("https://www.B\u{FC}cher.de/x").unwrap();
        assert_eq!(parts.label, "B\u{FC}cher");
        assert_eq!(parts.after, ".de/x");
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(
            host_after_example_url("https://\u{43F}\u{440}\u{438}\u{43C}\u{435}\u{440}.\u{440}\u{444}", false, false, &mut rng).unwrap(),
            "https://example.com/\u{43F}\u{440}\u{438}\u{43C}\u{435}\u{440}.\u{440}\u{444}"
        );
    }

    #[test]
    fn homoglyph_swaps_one_letter() {
        let mut rng = StdRng::seed_from_u64(3);
        let out = Twist::Homoglyph.apply("paypal", &mut rng);
        assert_eq!(out.chars().count(), 6);
        assert_eq!(out.chars().filter(|c| !c.is_ascii()).count(), 1);
        assert_eq!(Twist::Homoglyph.apply("mn", &mut rng), "mn");
    }

    #[test]
    fn rejects_invalid_urls() {
        assert!(matches!(twist("not a url", &mut StdRng::seed_from_u64(1)), Err(TwistError::InvalidUrl(_))));
        assert!(matches!(split_domain("mailto:a@b.c"), Err(TwistError::MissingDomain)));
    }

    #[test]
    fn typos_change_the_label_length_as_expected() {
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(Twist::MissingChar.apply("paypal", &mut rng).len(), 5);
        assert_eq!(Twist::AddedChar.apply("paypal", &mut rng).len(), 7);
        assert_eq!(Twist::Repetition.apply("paypal", &mut rng).len(), 7);
        assert_eq!(Twist::RemoveVowels.apply("paypal", &mut rng), "pypl");
        assert_eq!(Twist::RemoveVowels.apply("aeiou", &mut rng), "aeiou");
        assert_eq!(Twist::CharSwap.apply("x", &mut rng), "x");
    }

    #[test]
    fn leetspeak_replaces_n_letters() {
        let mut rng = StdRng::seed_from_u64(4);
        let out = Twist::Leetspeak(1).apply("paypal", &mut rng);
        assert_eq!(out.chars().filter(char::is_ascii_digit).count(), 1);
        assert_eq!(Twist::Leetspeak(9).apply("paypal", &mut rng), "p4yp41");
    }

    #[test]
    fn decoy_host_variants() {
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(
            host_after_example_url("https://paypal.com", false, false, &mut rng).unwrap(),
            "https://example.com/paypal.com"
        );
        assert_eq!(
            host_after_example_url("https://paypal.com/pay", false, true, &mut rng).unwrap(),
            "https://example.com#paypal.com/pay"
        );
        let ip = host_after_example_url("https://paypal.com", true, false, &mut rng).unwrap();
        assert!(ip.starts_with("https://192.0.2.") && ip.ends_with("/paypal.com"));
    }

    #[test]
    fn worded_domain_keeps_tld() {
        let mut rng = StdRng::seed_from_u64(12);
        let out = add_words_to_domain("https://paypal.com", &mut rng).unwrap();
        assert!(out.ends_with(".com"));
        assert!(out.contains("paypal-") || out.contains("-paypal"));
    }
}
