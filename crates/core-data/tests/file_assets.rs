use std::fs;

use core_data::{ConfusableSource, ConfusablesStore, LoadState, MetadataStore};

#[test]
fn stores_load_from_disk_once() {
    let dir = tempfile::tempdir().unwrap();
    let meta_path = dir.path().join("unicode-min.json");
    let conf_path = dir.path().join("confusables.json");
    fs::write(
        &meta_path,
        r#"{"200B":{"short":"ZWSP","long":"ZERO WIDTH SPACE","category":"Cf","script":"Common"}}"#,
    )
    .unwrap();
    fs::write(&conf_path, r#"{"rn":["m"],"m":["rn"]}"#).unwrap();

    let meta = MetadataStore::from_path(&meta_path);
    let conf = ConfusablesStore::from_path(&conf_path);
    assert_eq!(meta.load(), LoadState::Loaded);
    assert_eq!(conf.load(), LoadState::Loaded);

    // Removing the files afterwards changes nothing: the tables are cached.
    fs::remove_file(&meta_path).unwrap();
    fs::remove_file(&conf_path).unwrap();
    assert_eq!(meta.load(), LoadState::Loaded);
    assert_eq!(meta.get(0x200B).unwrap().short, "ZWSP");
    assert_eq!(conf.confusables_for("m"), vec!["rn".to_string()]);
}

#[test]
fn missing_file_degrades_to_empty_lookups() {
    let dir = tempfile::tempdir().unwrap();
    let conf = ConfusablesStore::from_path(dir.path().join("absent.json"));
    assert_eq!(conf.load(), LoadState::Failed);
    assert!(conf.confusables_for("a").is_empty());
    assert!(conf.groups("a").is_empty());
}

#[test]
fn bundled_assets_parse() {
    let root = concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets");
    let meta = MetadataStore::from_path(format!("{root}/unicode-min.json"));
    let conf = ConfusablesStore::from_path(format!("{root}/confusables.json"));
    assert_eq!(meta.load(), LoadState::Loaded);
    assert_eq!(conf.load(), LoadState::Loaded);
    assert!(!meta.is_empty());
    assert!(!conf.confusables_for("a").is_empty());
}
