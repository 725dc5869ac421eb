//! Subcommands. Each is a thin wrapper over the library crates that returns
//! the text to print; only `demo` needs the async runtime and lives in main.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Subcommand, ValueEnum};
use rand::rngs::StdRng;
use tracing::warn;

use core_config::Config;
use core_data::{ConfusableSource, ConfusablesStore, LoadState, MetadataStore};
use core_editor::{DisplayStyle, EditorSession, Panel, PanelSet, ShareState};
use core_text::NormalizationForm;
use core_transform::crash::{self, CrashPairing, CrashSpec, CrashStyle};
use core_transform::insert::InsertKind;
use core_transform::noise::{self, DEFAULT_COUNT, DEFAULT_RANGES};
use core_transform::{EncodingStrategy, SpoofMode, recover, twist};
use core_unicode::BidiControl;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show every codepoint with its label, category and direction.
    Inspect {
        text: String,
        #[arg(long, default_value = "u+hex")]
        style: DisplayStyle,
    },
    /// List confusables of a character, split by NFKC behaviour.
    Confusables { text: String },
    /// Replace characters with confusables, or sprinkle thin spaces / variation selectors.
    Spoof {
        text: String,
        #[arg(long)]
        mode: Option<SpoofMode>,
        #[arg(long)]
        chaos: Option<f64>,
    },
    /// Insert a random hidden character or a named bidi control.
    Insert {
        text: String,
        #[arg(long, value_enum, default_value_t = InsertArg::Invisible, conflicts_with = "bidi")]
        kind: InsertArg,
        /// Bidi control name (LRM, RLO, FSI, ...).
        #[arg(long)]
        bidi: Option<String>,
        /// Selection start (codepoint index); omitted = random position.
        #[arg(long)]
        start: Option<usize>,
        #[arg(long, requires = "start")]
        end: Option<usize>,
    },
    /// Generate a bidi crash sequence.
    Crash {
        #[arg(long)]
        pairing: Option<CrashPairing>,
        #[arg(long)]
        length: Option<usize>,
        #[arg(long)]
        section_length: Option<usize>,
        #[arg(long)]
        style: Option<CrashStyle>,
    },
    /// Typo-squat and domain-spoof variants of a URL.
    Twist { url: String },
    /// Guess what mis-decoded text originally was.
    Recover { text: String },
    /// Wrap text in random codepoints.
    Noise {
        text: String,
        #[arg(long, default_value = DEFAULT_RANGES)]
        ranges: String,
        #[arg(long, default_value_t = DEFAULT_COUNT)]
        count: usize,
    },
    /// Encode a prompt with an instruction prefix.
    Encode {
        text: String,
        #[arg(long, value_enum, default_value_t = EncodeArg::Base64)]
        strategy: EncodeArg,
        #[arg(long, default_value = "|")]
        delimiter: String,
    },
    /// Apply a Unicode normalization form.
    Normalize {
        text: String,
        #[arg(long, default_value = "nfc")]
        form: NormalizationForm,
    },
    /// Build a share link, or decode one with --decode.
    Share {
        text: String,
        #[arg(long)]
        dir: Option<core_editor::Direction>,
        /// Panel key to mark open (repeatable).
        #[arg(long = "panel")]
        panels: Vec<String>,
        #[arg(long, default_value = "https://example.org/unseen")]
        base: String,
        /// Treat TEXT as a share URL and print its state.
        #[arg(long)]
        decode: bool,
    },
    /// Read a text file (truncated to the import limit) and inspect it.
    Import {
        path: PathBuf,
        #[arg(long)]
        max_bytes: Option<usize>,
    },
    /// Play the typing animation.
    Demo {
        /// Play the longer examples instead of the intro.
        #[arg(long)]
        examples: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertArg {
    Invisible,
    WordBreak,
    NoBreak,
}

impl From<InsertArg> for InsertKind {
    fn from(arg: InsertArg) -> Self {
        match arg {
            InsertArg::Invisible => InsertKind::Invisible,
            InsertArg::WordBreak => InsertKind::WordBreak,
            InsertArg::NoBreak => InsertKind::NoBreak,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodeArg {
    Decimal,
    Reversed,
    Base64,
    Delimiter,
}

/// Shared state for one invocation.
pub struct Toolkit {
    pub config: Config,
    pub rng: StdRng,
    metadata: MetadataStore,
    confusables: ConfusablesStore,
}

impl Toolkit {
    pub fn new(config: Config, rng: StdRng) -> Self {
        let metadata = MetadataStore::from_path(config.file.assets.metadata.clone());
        let confusables = ConfusablesStore::from_path(config.file.assets.confusables.clone());
        Self {
            config,
            rng,
            metadata,
            confusables,
        }
    }

    fn metadata(&self) -> &MetadataStore {
        if self.metadata.load() != LoadState::Loaded {
            warn!(target: "runtime", "metadata_unavailable");
        }
        &self.metadata
    }

    fn load_confusables(&self) {
        if self.confusables.load() != LoadState::Loaded {
            warn!(target: "runtime", "confusables_unavailable");
        }
    }

    fn spoof_mode(&self) -> SpoofMode {
        let raw = &self.config.file.spoof.mode;
        raw.parse().unwrap_or_else(|_| {
            warn!(target: "config", raw = raw.as_str(), "unknown_spoof_mode");
            SpoofMode::default()
        })
    }

    fn crash_spec(&self) -> CrashSpec {
        let file = &self.config.file.crash;
        let pairing = file.pairing.parse().unwrap_or_else(|_| {
            warn!(target: "config", raw = file.pairing.as_str(), "unknown_crash_pairing");
            CrashPairing::default()
        });
        let style = file.style.parse().unwrap_or_else(|_| {
            warn!(target: "config", raw = file.style.as_str(), "unknown_crash_style");
            CrashStyle::default()
        });
        CrashSpec {
            pairing,
            length: file.length,
            section_length: file.section_length,
            style,
        }
    }
}

fn inspect_text(text: &str, metadata: &MetadataStore, style: DisplayStyle) -> String {
    let annotation = core_editor::annotate(text, metadata, style);
    let mut out = String::new();
    for entry in &annotation.entries {
        let label = if entry.category.is_newline() {
            "\\n".to_string()
        } else {
            entry.label.clone()
        };
        let flag = if entry.finding { "!" } else { " " };
        out.push_str(&format!(
            "{flag} {:>4}  U+{:04X}  {} {:<13} {}\n",
            entry.index,
            entry.codepoint(),
            entry.direction_marker(),
            entry.category.as_str(),
            label,
        ));
    }
    let verdict = if annotation.has_findings {
        "Hidden or suspicious characters found."
    } else {
        "Looks normal."
    };
    out.push_str(verdict);
    if annotation.is_mixed_script() {
        out.push_str(" Mixed scripts.");
    }
    out
}

pub fn run(command: Command, kit: &mut Toolkit) -> Result<String> {
    match command {
        Command::Inspect { text, style } => Ok(inspect_text(&text, kit.metadata(), style)),
        Command::Confusables { text } => {
            kit.load_confusables();
            let groups = kit.confusables.groups(&text);
            Ok(format!(
                "different: {}\nsame: {}",
                groups.normalize_different.join(" "),
                groups.normalize_same.join(" ")
            ))
        }
        Command::Spoof { text, mode, chaos } => {
            let mode = mode.unwrap_or_else(|| kit.spoof_mode());
            let chaos = chaos.unwrap_or(kit.config.effective_chaos);
            kit.load_confusables();
            let mut session = EditorSession::new(&text);
            let outcome = session.apply_spoof(mode, chaos, &kit.confusables, &mut kit.rng);
            Ok(format!("{}\n{}", outcome.text, outcome.summary()))
        }
        Command::Insert {
            text,
            kind,
            bidi,
            start,
            end,
        } => {
            let mut session = EditorSession::new(&text);
            if let Some(start) = start {
                session.select(start, end.unwrap_or(start));
            }
            let out = match bidi {
                Some(name) => {
                    let control = BidiControl::from_name(&name)
                        .with_context(|| format!("unknown bidi control `{name}`"))?;
                    session.insert_bidi_control(control, &mut kit.rng)
                }
                None => session.insert_random(kind.into(), &mut kit.rng),
            };
            Ok(out.text)
        }
        Command::Crash {
            pairing,
            length,
            section_length,
            style,
        } => {
            let defaults = kit.crash_spec();
            let spec = CrashSpec {
                pairing: pairing.unwrap_or(defaults.pairing),
                length: length.unwrap_or(defaults.length),
                section_length: section_length.unwrap_or(defaults.section_length),
                style: style.unwrap_or(defaults.style),
            };
            Ok(crash::generate(&spec))
        }
        Command::Twist { url } => {
            let variants = twist(&url, &mut kit.rng).with_context(|| format!("cannot twist `{url}`"))?;
            Ok(variants.join("\n"))
        }
        Command::Recover { text } => {
            let candidates = recover(&text);
            if candidates.is_empty() {
                return Ok("No plausible candidates.".to_string());
            }
            Ok(candidates
                .iter()
                .map(|c| format!("{}: {}", c.label, c.text))
                .collect::<Vec<_>>()
                .join("\n"))
        }
        Command::Noise { text, ranges, count } => Ok(noise::add_noise(&text, &ranges, count, &mut kit.rng)),
        Command::Encode {
            text,
            strategy,
            delimiter,
        } => {
            let strategy = match strategy {
                EncodeArg::Decimal => EncodingStrategy::Decimal,
                EncodeArg::Reversed => EncodingStrategy::Reversed,
                EncodeArg::Base64 => EncodingStrategy::Base64,
                EncodeArg::Delimiter => EncodingStrategy::DelimiterSplit(delimiter),
            };
            Ok(strategy.encode(&text, &mut kit.rng))
        }
        Command::Normalize { text, form } => Ok(form.apply(&text)),
        Command::Share {
            text,
            dir,
            panels,
            base,
            decode,
        } => {
            if decode {
                let state = ShareState::from_url(&text).with_context(|| format!("invalid share URL `{text}`"))?;
                let open: Vec<&str> = state.panels.open().map(Panel::key).collect();
                return Ok(format!(
                    "text: {}\ndir: {}\npanels: {}",
                    state.text,
                    state.direction,
                    open.join(",")
                ));
            }
            let mut set = PanelSet::default();
            for key in &panels {
                match Panel::from_key(key) {
                    Some(panel) => set.set(panel, true),
                    None => bail!("unknown panel `{key}`"),
                }
            }
            let state = ShareState {
                text,
                direction: dir.unwrap_or_default(),
                panels: set,
            };
            let base = url::Url::parse(&base).with_context(|| format!("invalid base URL `{base}`"))?;
            Ok(state.to_url(&base).to_string())
        }
        Command::Import { path, max_bytes } => {
            let max_bytes = max_bytes.unwrap_or(kit.config.file.import.max_bytes);
            let mut session = EditorSession::new("");
            session
                .import(&path, max_bytes)
                .with_context(|| format!("cannot import {}", path.display()))?;
            Ok(inspect_text(&session.text(), kit.metadata(), DisplayStyle::default()))
        }
        Command::Demo { .. } => bail!("demo runs on the async runtime"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn kit() -> Toolkit {
        let mut config = Config::default();
        let assets = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets");
        config.file.assets.metadata = assets.join("unicode-min.json");
        config.file.assets.confusables = assets.join("confusables.json");
        Toolkit::new(config, StdRng::seed_from_u64(1))
    }

    #[test]
    fn inspect_flags_hidden_characters() {
        let out = run(
            Command::Inspect {
                text: "a\u{200B}".to_string(),
                style: DisplayStyle::UHex,
            },
            &mut kit(),
        )
        .unwrap();
        assert!(out.contains("U+200B"));
        assert!(out.ends_with("Hidden or suspicious characters found."));
    }

    #[test]
    fn insert_at_selection() {
        let out = run(
            Command::Insert {
                text: "hello".to_string(),
                kind: InsertArg::Invisible,
                bidi: Some("rlo".to_string()),
                start: Some(1),
                end: Some(3),
            },
            &mut kit(),
        )
        .unwrap();
        assert_eq!(out, "h\u{202E}lo");
    }

    #[test]
    fn unknown_bidi_name_is_an_error() {
        let res = run(
            Command::Insert {
                text: "x".to_string(),
                kind: InsertArg::Invisible,
                bidi: Some("XYZ".to_string()),
                start: None,
                end: None,
            },
            &mut kit(),
        );
        assert!(res.is_err());
    }

    #[test]
    fn crash_uses_flags_over_config() {
        let out = run(
            Command::Crash {
                pairing: None,
                length: Some(8),
                section_length: Some(4),
                style: Some(CrashStyle::Invisible),
            },
            &mut kit(),
        )
        .unwrap();
        assert_eq!(out.chars().count(), 11);
    }

    #[test]
    fn share_encode_then_decode() {
        let mut kit = kit();
        let url = run(
            Command::Share {
                text: "hi there".to_string(),
                dir: Some(core_editor::Direction::Rtl),
                panels: vec!["fonts".to_string()],
                base: "https://example.org/unseen".to_string(),
                decode: false,
            },
            &mut kit,
        )
        .unwrap();
        assert_eq!(url, "https://example.org/unseen?text=hi+there&dir=rtl&fonts=1");
        let decoded = run(
            Command::Share {
                text: url,
                dir: None,
                panels: Vec::new(),
                base: String::new(),
                decode: true,
            },
            &mut kit,
        )
        .unwrap();
        assert_eq!(decoded, "text: hi there\ndir: rtl\npanels: fonts");
    }

    #[test]
    fn import_missing_file_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let res = run(
            Command::Import {
                path: dir.path().join("nope.txt"),
                max_bytes: None,
            },
            &mut kit(),
        );
        assert!(res.is_err());
    }

    #[test]
    fn twist_rejects_non_urls() {
        assert!(run(Command::Twist { url: "nope".to_string() }, &mut kit()).is_err());
    }
}
