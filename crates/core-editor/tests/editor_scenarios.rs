//! End-to-end editing scenarios.

use core_data::{ConfusablesStore, InlineAsset, MetadataStore};
use core_editor::{
    BlurCause, DisplayStyle, EditorSession, MAX_IMPORT_BYTES, Panel, ShareState,
};
use core_transform::insert::InsertKind;
use core_transform::spoof::SpoofMode;
use core_unicode::{Category, classify};
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn selected_range_is_replaced_by_inserted_invisible() {
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut session = EditorSession::new("hello");
        session.select(1, 3);
        session.blur(BlurCause::ToolButton);
        let out = session.insert_random(InsertKind::Invisible, &mut rng);

        let chars: Vec<char> = out.text.chars().collect();
        assert_eq!(chars.len(), 4);
        assert_eq!(chars[0], 'h');
        assert_eq!(chars[2..], ['l', 'o']);
        assert_eq!(classify(chars[1] as u32), Category::Invisible);
        assert_eq!(out.caret, 2);
        assert_eq!(session.text(), out.text);
    }
}

#[test]
fn spoof_then_annotate_reports_findings() {
    let confusables = ConfusablesStore::new(InlineAsset::new(
        "confusables.json",
        r#"{"a": ["а"], "o": ["о"]}"#,
    ));
    confusables.load();
    let metadata = MetadataStore::new(InlineAsset::new(
        "unicode-min.json",
        r#"{
            "0061": {"short": "LSLA", "long": "LATIN SMALL LETTER A", "category": "Ll", "script": "Latin"},
            "006F": {"short": "LSLO", "long": "LATIN SMALL LETTER O", "category": "Ll", "script": "Latin"},
            "0430": {"short": "CSLA", "long": "CYRILLIC SMALL LETTER A", "category": "Ll", "script": "Cyrillic"},
            "043E": {"short": "CSLO", "long": "CYRILLIC SMALL LETTER O", "category": "Ll", "script": "Cyrillic"}
        }"#,
    ));
    metadata.load();

    let mut session = EditorSession::new("aoao");
    let mut rng = StdRng::seed_from_u64(4);
    let outcome = session.apply_spoof(SpoofMode::ReplaceDifferent, 1.0, &confusables, &mut rng);
    assert_eq!(outcome.changes, 4);
    assert_eq!(session.text(), "\u{430}\u{43E}\u{430}\u{43E}");

    let annotation = session.annotate(&metadata, DisplayStyle::UHex);
    assert!(!annotation.has_findings);
    assert!(!annotation.is_mixed_script());

    session.set_text("a\u{430}");
    assert!(session.annotate(&metadata, DisplayStyle::UHex).is_mixed_script());
}

#[test]
fn share_link_restores_visible_state() {
    let mut session = EditorSession::new("tag\u{E0041} text");
    session.set_panel(Panel::Typing, true);
    session.set_panel(Panel::Normalization, true);
    session.toggle_direction();

    let url = session
        .share_state()
        .to_url(&url::Url::parse("https://example.org/tools/unseen").unwrap());
    let restored = EditorSession::from_share(&ShareState::from_url(url.as_str()).unwrap());

    assert_eq!(restored.text(), session.text());
    assert_eq!(restored.direction(), session.direction());
    assert_eq!(restored.panels(), session.panels());
}

#[test]
fn import_truncates_large_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.txt");
    std::fs::write(&path, "x".repeat(MAX_IMPORT_BYTES + 500)).unwrap();

    let mut session = EditorSession::new("keep");
    session.import(&path, MAX_IMPORT_BYTES).unwrap();
    assert_eq!(session.stats().bytes, MAX_IMPORT_BYTES);

    session.set_text("keep");
    assert!(session.import(&dir.path().join("missing.txt"), MAX_IMPORT_BYTES).is_err());
    assert_eq!(session.text(), "keep");
}

#[test]
fn export_writes_exact_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let session = EditorSession::new("a\u{202E}b\u{1F600}");
    session.export(&path).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), "a\u{202E}b\u{1F600}".as_bytes());
}

#[test]
fn only_latest_animation_mutates_text() {
    let mut session = EditorSession::new("");
    let timing = core_editor::AnimationTiming::default();
    let mut rng = StdRng::seed_from_u64(9);

    let mut first = session.start_animation(&["first"], timing);
    session.play_step(&mut first, &mut rng);
    let mut second = session.start_animation(&["second"], timing);

    assert!(session.play_step(&mut first, &mut rng).is_none());
    assert_eq!(session.text(), "f");
    session.play_step(&mut second, &mut rng);
    assert_eq!(session.text(), "s");
}
