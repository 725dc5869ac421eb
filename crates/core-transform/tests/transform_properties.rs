//! Property and scenario tests for the transformation engine.

use core_transform::insert::{InsertKind, insert_with_policy, random_char, random_position};
use core_transform::url_twist::{ALWAYS_AT_END, twist};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

proptest! {
    // short text: any position 0..=len
    #[test]
    fn short_text_positions_cover_both_ends(len in 0usize..=4, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let pos = random_position(len, &mut rng);
        prop_assert!(pos <= len);
    }

    // longer text: never prepend or append
    #[test]
    fn long_text_positions_are_interior(len in 5usize..500, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let pos = random_position(len, &mut rng);
        prop_assert!(pos >= 1 && pos < len);
    }

    // random insertion adds exactly one codepoint and keeps the rest in order
    #[test]
    fn random_insert_preserves_text(text in "[a-z]{0,20}", seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let c = random_char(InsertKind::Invisible, &mut rng);
        let out = insert_with_policy(&text, &c.to_string(), None, &mut rng);
        prop_assert_eq!(out.text.chars().count(), text.chars().count() + 1);
        let stripped: String = out.text.chars().filter(|&x| x != c).collect();
        prop_assert_eq!(stripped, text);
    }
}

#[test]
fn short_text_reaches_both_edges() {
    let mut rng = StdRng::seed_from_u64(0);
    let seen: std::collections::HashSet<usize> =
        (0..200).map(|_| random_position(3, &mut rng)).collect();
    assert!(seen.contains(&0));
    assert!(seen.contains(&3));
}

#[test]
fn twister_keeps_domain_spoofs_last() {
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let out = twist("https://paypal.com", &mut rng).unwrap();
        assert!(out.len() > ALWAYS_AT_END);
        let tail = &out[out.len() - ALWAYS_AT_END..];
        assert_eq!(tail[0], "https://example.com/paypal.com");
        assert!(tail[1].starts_with("https://192.0.2.") && tail[1].ends_with("/paypal.com"));
        assert_eq!(tail[2], "https://example.com#paypal.com");
        assert!(tail[3].starts_with("https://192.0.2.") && tail[3].ends_with("#paypal.com"));
        assert!(tail[4].starts_with("https://paypal-") && tail[4].ends_with(".com"));

        let head = &out[..out.len() - ALWAYS_AT_END];
        let unique: std::collections::HashSet<&String> = head.iter().collect();
        assert_eq!(unique.len(), head.len());
        assert!(head.iter().all(|v| !v.contains("example.com")));
    }
}

#[test]
fn twister_handles_internationalized_hosts() {
    let cases = [
        ("https://b\u{FC}cher.de/x", "b\u{FC}cher.de/x", "https://b\u{FC}cher-"),
        (
            "https://\u{43F}\u{440}\u{438}\u{43C}\u{435}\u{440}.\u{440}\u{444}",
            "\u{43F}\u{440}\u{438}\u{43C}\u{435}\u{440}.\u{440}\u{444}",
            "https://\u{43F}\u{440}\u{438}\u{43C}\u{435}\u{440}-",
        ),
    ];
    for (input, host_and_path, filler_prefix) in cases {
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = twist(input, &mut rng).unwrap();
            assert!(out.len() > ALWAYS_AT_END);
            let tail = &out[out.len() - ALWAYS_AT_END..];
            assert_eq!(tail[0], format!("https://example.com/{host_and_path}"));
            assert_eq!(tail[2], format!("https://example.com#{host_and_path}"));
            assert!(tail[4].starts_with(filler_prefix));
            let head = &out[..out.len() - ALWAYS_AT_END];
            assert!(head.iter().all(|v| !v.contains("xn--") && !v.contains("example.com")));
        }
    }
}

#[test]
fn twister_rejects_garbage() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(twist("paypal", &mut rng).is_err());
}
