//! Configuration loading and parsing.
//!
//! Parses `unseen.toml` (or an override path provided by the binary). Every
//! section and field is optional; a missing file or a file that fails to parse
//! yields the defaults. Unknown fields are ignored so older binaries accept
//! newer files.
//!
//! The raw parsed chaos fraction is retained next to the effective value,
//! which is clamped into `[0, 1]` by `Config::apply_limits` (a clamp is logged
//! under target `config`). Enumerated settings (`spoof.mode`, `crash.pairing`,
//! `crash.style`) stay strings here and are parsed by their consumers.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const FILE_NAME: &str = "unseen.toml";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AssetsConfig {
    #[serde(default = "AssetsConfig::default_metadata")]
    pub metadata: PathBuf,
    #[serde(default = "AssetsConfig::default_confusables")]
    pub confusables: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            metadata: Self::default_metadata(),
            confusables: Self::default_confusables(),
        }
    }
}

impl AssetsConfig {
    fn default_metadata() -> PathBuf {
        PathBuf::from("assets/unicode-min.json")
    }
    fn default_confusables() -> PathBuf {
        PathBuf::from("assets/confusables.json")
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SpoofConfig {
    #[serde(default = "SpoofConfig::default_chaos")]
    pub chaos: f64,
    #[serde(default = "SpoofConfig::default_mode")]
    pub mode: String,
}

impl Default for SpoofConfig {
    fn default() -> Self {
        Self {
            chaos: Self::default_chaos(),
            mode: Self::default_mode(),
        }
    }
}

impl SpoofConfig {
    const fn default_chaos() -> f64 {
        0.5
    }
    fn default_mode() -> String {
        "replace-different".to_string()
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CrashConfig {
    #[serde(default = "CrashConfig::default_pairing")]
    pub pairing: String,
    #[serde(default = "CrashConfig::default_length")]
    pub length: usize,
    #[serde(default = "CrashConfig::default_section_length")]
    pub section_length: usize,
    #[serde(default = "CrashConfig::default_style")]
    pub style: String,
}

impl Default for CrashConfig {
    fn default() -> Self {
        Self {
            pairing: Self::default_pairing(),
            length: Self::default_length(),
            section_length: Self::default_section_length(),
            style: Self::default_style(),
        }
    }
}

impl CrashConfig {
    fn default_pairing() -> String {
        "lrm-rlm".to_string()
    }
    const fn default_length() -> usize {
        4000
    }
    const fn default_section_length() -> usize {
        300
    }
    fn default_style() -> String {
        "pointer".to_string()
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    #[serde(default = "ImportConfig::default_max_bytes")] // upload cap
    pub max_bytes: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_bytes: Self::default_max_bytes(),
        }
    }
}

impl ImportConfig {
    const fn default_max_bytes() -> usize {
        10_000
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AnimationConfig {
    #[serde(default = "AnimationConfig::default_speed_ms")]
    pub speed_ms: u64,
    #[serde(default = "AnimationConfig::default_pause_before_delete_ms")]
    pub pause_before_delete_ms: u64,
    #[serde(default = "AnimationConfig::default_pause_between_items_ms")]
    pub pause_between_items_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            speed_ms: Self::default_speed_ms(),
            pause_before_delete_ms: Self::default_pause_before_delete_ms(),
            pause_between_items_ms: Self::default_pause_between_items_ms(),
        }
    }
}

impl AnimationConfig {
    const fn default_speed_ms() -> u64 {
        150
    }
    const fn default_pause_before_delete_ms() -> u64 {
        800
    }
    const fn default_pause_between_items_ms() -> u64 {
        600
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub spoof: SpoofConfig,
    #[serde(default)]
    pub crash: CrashConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
    pub effective_chaos: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            raw: None,
            file: ConfigFile::default(),
            effective_chaos: SpoofConfig::default_chaos(),
        }
    }
}

/// Local `unseen.toml` first, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("unseen").join(FILE_NAME);
    }
    PathBuf::from(FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            let mut cfg = Config {
                raw: Some(content),
                file,
                effective_chaos: 0.0, // computed below
            };
            cfg.apply_limits();
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(cfg)
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Clamp the chaos fraction into `[0, 1]` (NaN becomes 0). Returns the
    /// effective value.
    pub fn apply_limits(&mut self) -> f64 {
        let raw = self.file.spoof.chaos;
        let clamped = if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) };
        if clamped != raw || raw.is_nan() {
            info!(target: "config", raw, clamped, "spoof_chaos_clamped");
        }
        self.effective_chaos = clamped;
        clamped
    }
}
