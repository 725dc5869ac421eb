//! Unicode metadata store: codepoint -> names, general category, script.
//!
//! The table is keyed by uppercase hex padded to at least four digits
//! (`"00A0"`, `"1F600"`). Codepoints missing from the table fall back to a
//! fixed list of large ideographic / syllabic blocks whose members are not
//! listed individually. Before the table is loaded (or after a failed load)
//! every lookup returns `None`.

use std::collections::HashMap;

use serde::Deserialize;

use crate::asset::{AssetSource, FileAsset, LazyTable, LoadState, read_json};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnicodeEntry {
    pub short: String,
    pub long: String,
    pub category: String,
    pub script: String,
}

struct FallbackRange {
    start: u32,
    end: u32,
    label: &'static str,
    script: &'static str,
}

const FALLBACK_RANGES: &[FallbackRange] = &[
    FallbackRange { start: 0x4E00, end: 0x9FFF, label: "CJK UNIFIED IDEOGRAPH", script: "Han" },
    FallbackRange { start: 0x3400, end: 0x4DBF, label: "CJK EXTENSION A", script: "Han" },
    FallbackRange { start: 0x20000, end: 0x2A6DF, label: "CJK EXTENSION B", script: "Han" },
    FallbackRange { start: 0xAC00, end: 0xD7AF, label: "HANGUL SYLLABLE", script: "Hangul" },
    FallbackRange { start: 0x3040, end: 0x309F, label: "HIRAGANA", script: "Hiragana" },
    FallbackRange { start: 0x30A0, end: 0x30FF, label: "KATAKANA", script: "Katakana" },
    FallbackRange { start: 0x17000, end: 0x187FF, label: "TANGUT CHARACTER", script: "Tangut" },
    FallbackRange { start: 0x18B00, end: 0x18CFF, label: "KHITAN CHARACTER", script: "Khitan Small Script" },
    FallbackRange { start: 0x1B170, end: 0x1B2FF, label: "NUSHU CHARACTER", script: "Nushu" },
];

fn fallback_entry(cp: u32) -> Option<UnicodeEntry> {
    let range = FALLBACK_RANGES
        .iter()
        .find(|r| (r.start..=r.end).contains(&cp))?;
    let short = range.label.split(' ').next().unwrap_or(range.label);
    Some(UnicodeEntry {
        short: short.to_string(),
        long: format!("{}-{:X}", range.label, cp),
        category: "Lo".to_string(),
        script: range.script.to_string(),
    })
}

/// Table key for a codepoint.
pub fn hex_key(cp: u32) -> String {
    format!("{cp:04X}")
}

pub struct MetadataStore {
    source: Box<dyn AssetSource>,
    table: LazyTable<HashMap<String, UnicodeEntry>>,
}

impl MetadataStore {
    pub fn new(source: impl AssetSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            table: LazyTable::new(),
        }
    }

    pub fn from_path(path: impl Into<std::path::PathBuf>) -> Self {
        Self::new(FileAsset::new(path))
    }

    /// Load the table (once). Returns the resulting state.
    pub fn load(&self) -> LoadState {
        let source = self.source.as_ref();
        self.table
            .ensure_loaded(source.name(), || read_json(source));
        self.table.state()
    }

    pub fn state(&self) -> LoadState {
        self.table.state()
    }

    pub fn len(&self) -> usize {
        self.table.try_get().map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry for `cp`: table hit, else fallback block, else `None`.
    pub fn get(&self, cp: u32) -> Option<UnicodeEntry> {
        let table = self.table.try_get()?;
        table
            .get(&hex_key(cp))
            .cloned()
            .or_else(|| fallback_entry(cp))
    }
}
