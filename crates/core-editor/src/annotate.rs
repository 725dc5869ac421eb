//! Per-codepoint display annotations ("what the text really contains").
//!
//! Contract:
//! - Tag characters are labelled with the ASCII they encode.
//! - Plain space (U+0020) is word-break but is never relabelled.
//! - Any other invisible, word-break or no-break codepoint is labelled by
//!   `DisplayStyle`, falling back to `U+HEX` when metadata is missing.
//! - Combining marks of Inherited/Common/Latin/Greek/Cyrillic script are drawn
//!   on a dotted circle (U+25CC) so they stay visible in isolation.
//! - An entry is a finding when its label differs from its source or it is an
//!   AI indicator. CR, LF and CRLF each produce one newline entry.
//! - Visible codepoints get a script rank: the first distinct script seen is
//!   rank 0, the next rank 1, and so on. Rank > 0 marks mixed-script text.

use std::fmt;
use std::str::FromStr;

use core_data::MetadataStore;
use core_unicode::bidi::{self, Flow};
use core_unicode::{Category, classify_text, is_ai_indicator, is_emoji, tag};

const DOTTED_CIRCLE: char = '\u{25CC}';
const DOTTED_CIRCLE_SCRIPTS: &[&str] = &["Inherited", "Common", "Latin", "Greek", "Cyrillic"];
const UNKNOWN_SCRIPT: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayStyle {
    #[default]
    UHex,
    ShortName,
    FullName,
}

impl DisplayStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayStyle::UHex => "u+hex",
            DisplayStyle::ShortName => "short",
            DisplayStyle::FullName => "full",
        }
    }
}

impl fmt::Display for DisplayStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "u+hex" | "hex" => Ok(DisplayStyle::UHex),
            "short" | "short-name" => Ok(DisplayStyle::ShortName),
            "full" | "full-name" | "long" => Ok(DisplayStyle::FullName),
            other => Err(format!("unknown display style `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedChar {
    /// Codepoint index of the entry in the source text.
    pub index: usize,
    pub source: String,
    pub category: Category,
    pub label: String,
    pub flow: Flow,
    pub script: String,
    pub script_rank: Option<usize>,
    pub finding: bool,
}

impl AnnotatedChar {
    pub fn codepoint(&self) -> u32 {
        self.source.chars().next().map_or(0, u32::from)
    }

    /// Arrow for the entry's inline direction.
    pub fn direction_marker(&self) -> char {
        match self.flow {
            Flow::Rtl => '←',
            Flow::Ltr => '→',
            Flow::Neutral => '•',
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    pub entries: Vec<AnnotatedChar>,
    pub has_findings: bool,
}

impl Annotation {
    pub fn findings(&self) -> impl Iterator<Item = &AnnotatedChar> {
        self.entries.iter().filter(|e| e.finding)
    }

    pub fn is_mixed_script(&self) -> bool {
        self.entries.iter().any(|e| e.script_rank.is_some_and(|r| r > 0))
    }

    /// Labels concatenated in order.
    pub fn rendered(&self) -> String {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }
}

pub fn u_hex(cp: u32) -> String {
    format!("U+{cp:X}")
}

fn hidden_label(c: char, category: Category, style: DisplayStyle, metadata: &MetadataStore) -> Option<String> {
    let cp = u32::from(c);
    if !category.is_hidden() || cp == 0x20 {
        return None;
    }
    if let Some(ascii) = tag::decode(c) {
        return Some(ascii.to_string());
    }
    let label = match style {
        DisplayStyle::UHex => u_hex(cp),
        DisplayStyle::ShortName => metadata.get(cp).map_or_else(|| u_hex(cp), |e| e.short),
        DisplayStyle::FullName => metadata.get(cp).map_or_else(|| u_hex(cp), |e| e.long),
    };
    Some(label)
}

/// Annotate every codepoint of `text`.
pub fn annotate(text: &str, metadata: &MetadataStore, style: DisplayStyle) -> Annotation {
    let mut ranks: Vec<String> = Vec::new();
    let mut has_findings = false;
    let mut entries = Vec::new();

    for span in classify_text(text) {
        let Some(c) = span.source.chars().next() else {
            continue;
        };
        if span.category.is_newline() {
            entries.push(AnnotatedChar {
                index: span.index,
                source: span.source,
                category: span.category,
                label: "\n".to_string(),
                flow: Flow::Neutral,
                script: UNKNOWN_SCRIPT.to_string(),
                script_rank: None,
                finding: false,
            });
            continue;
        }

        let cp = u32::from(c);
        let entry = metadata.get(cp);
        let script = entry.as_ref().map_or(UNKNOWN_SCRIPT, |e| e.script.as_str()).to_string();
        let ai = is_ai_indicator(cp);

        let mut label =
            hidden_label(c, span.category, style, metadata).unwrap_or_else(|| span.source.clone());
        let is_mark = entry.as_ref().is_some_and(|e| e.category.starts_with('M'));
        if is_mark && DOTTED_CIRCLE_SCRIPTS.contains(&script.as_str()) {
            label = format!("{DOTTED_CIRCLE}{c}");
        }
        let finding = label != span.source || ai;
        has_findings |= finding;

        let ignore_script = (script == "Common" && cp < 1000)
            || is_emoji(cp)
            || script == "Inherited"
            || script == UNKNOWN_SCRIPT;
        let style_target = span.category == Category::Visible && !ai && !ignore_script;
        let script_rank = style_target.then(|| match ranks.iter().position(|s| *s == script) {
            Some(rank) => rank,
            None => {
                ranks.push(script.clone());
                ranks.len() - 1
            }
        });

        entries.push(AnnotatedChar {
            index: span.index,
            source: span.source,
            category: span.category,
            label,
            flow: bidi::flow(c),
            script,
            script_rank,
            finding,
        });
    }

    tracing::debug!(target: "editor", entries = entries.len(), has_findings, "annotated");
    Annotation {
        entries,
        has_findings,
    }
}
