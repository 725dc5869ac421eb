//! Read-only Unicode lookup tables loaded lazily from JSON assets.
//!
//! Both stores are explicit services: construct one per process, load it once
//! and hand out `&` references. Lookups never block and never fail; an
//! unloaded or failed table simply yields nothing.

pub mod asset;
pub mod confusables;
pub mod metadata;

pub use asset::{AssetError, AssetSource, FileAsset, InlineAsset, LazyTable, LoadState};
pub use confusables::{ConfusableGroups, ConfusableSource, ConfusablesStore, split_groups};
pub use metadata::{MetadataStore, UnicodeEntry, hex_key};
