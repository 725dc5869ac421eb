//! Confusables store with NFD-aware expansion.
//!
//! Lookup for a string `s`:
//! 1. direct entries of `s`;
//! 2. if that is exactly one single-codepoint alternate, union in *its*
//!    entries (one hop, never further);
//! 3. if NFD(`s`) has more than one codepoint, add NFD(`s`) itself plus every
//!    alternate of its first codepoint re-joined with the decomposed tail;
//! 4. dedup (first occurrence wins), drop empties and `s`, stable sort by
//!    first codepoint.
//!
//! Groups split candidates by whether their NFKC form equals NFKC(`s`).
//! Before the table is loaded every lookup is empty.

use std::collections::HashMap;
use std::collections::HashSet;

use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::asset::{AssetSource, FileAsset, LazyTable, LoadState, read_json};

type ConfusableMap = HashMap<String, Vec<String>>;

/// Candidates split by NFKC equivalence with the original.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfusableGroups {
    /// Alternates that normalize back to the original (safe look-alikes).
    pub normalize_same: Vec<String>,
    /// Alternates that survive normalization (real spoofs).
    pub normalize_different: Vec<String>,
}

impl ConfusableGroups {
    pub fn is_empty(&self) -> bool {
        self.normalize_same.is_empty() && self.normalize_different.is_empty()
    }
}

/// Anything that can answer confusable queries.
pub trait ConfusableSource {
    fn confusables_for(&self, s: &str) -> Vec<String>;

    fn groups(&self, s: &str) -> ConfusableGroups {
        split_groups(s, self.confusables_for(s))
    }
}

pub struct ConfusablesStore {
    source: Box<dyn AssetSource>,
    table: LazyTable<ConfusableMap>,
}

impl ConfusablesStore {
    pub fn new(source: impl AssetSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            table: LazyTable::new(),
        }
    }

    pub fn from_path(path: impl Into<std::path::PathBuf>) -> Self {
        Self::new(FileAsset::new(path))
    }

    pub fn load(&self) -> LoadState {
        let source = self.source.as_ref();
        self.table
            .ensure_loaded(source.name(), || read_json(source));
        self.table.state()
    }

    pub fn state(&self) -> LoadState {
        self.table.state()
    }
}

impl ConfusableSource for ConfusablesStore {
    fn confusables_for(&self, s: &str) -> Vec<String> {
        match self.table.try_get() {
            Some(map) => expand(map, s),
            None => {
                debug!(target: "confusables", "lookup_before_load");
                Vec::new()
            }
        }
    }
}

fn entries<'a>(map: &'a ConfusableMap, key: &str) -> &'a [String] {
    map.get(key).map_or(&[], Vec::as_slice)
}

fn expand(map: &ConfusableMap, s: &str) -> Vec<String> {
    let direct = entries(map, s);
    let mut combined: Vec<String> = direct.to_vec();

    if let [only] = direct
        && only.chars().count() == 1
    {
        combined.extend(entries(map, only).iter().cloned());
    }

    let nfd: String = s.nfd().collect();
    let mut chars = nfd.chars();
    if let Some(first) = chars.next() {
        let rest = chars.as_str();
        if !rest.is_empty() {
            let mut buf = [0u8; 4];
            let first_alts = entries(map, first.encode_utf8(&mut buf));
            combined.push(nfd.clone());
            combined.extend(first_alts.iter().map(|alt| format!("{alt}{rest}")));
        }
    }

    let mut seen = HashSet::new();
    let mut out: Vec<String> = combined
        .into_iter()
        .filter(|c| !c.is_empty() && c != s)
        .filter(|c| seen.insert(c.clone()))
        .collect();
    out.sort_by_key(|c| c.chars().next().map_or(0, u32::from));
    out
}

/// Split candidates by NFKC equivalence with `original`.
pub fn split_groups(original: &str, candidates: Vec<String>) -> ConfusableGroups {
    let target: String = original.nfkc().collect();
    let mut groups = ConfusableGroups::default();
    for c in candidates {
        if c.nfkc().eq(target.chars()) {
            groups.normalize_same.push(c);
        } else {
            groups.normalize_different.push(c);
        }
    }
    groups
}
