//! Bidi "crash sequence" generator.
//!
//! Layout for `length` control codepoints and a section of `section_length`:
//! `length / 2` left+right pairs are emitted in chunks of
//! `max(1, section_length / 2)` pairs, each chunk followed by the pairing's
//! break codepoint, then one trailing break. `length = 8, section = 4` yields
//! `LR LR B LR LR B B` (11 codepoints).
//!
//! Decoration (pointer / framed) only wraps the sequence; sequences longer
//! than [`EASTER_EGG_THRESHOLD`] also carry a tag-encoded message.

use std::fmt;
use std::str::FromStr;

use core_unicode::BidiControl;
use core_unicode::tag;

/// Hidden message appended to large decorated sequences.
pub const EASTER_EGG: &str = "You found the hidden message!";
pub const EASTER_EGG_THRESHOLD: usize = 1000;

const ZWJ: char = '\u{200D}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrashPairing {
    #[default]
    LrmRlm,
    LrmAlm,
    LriRli,
    LroRlo,
    LreRle,
}

impl CrashPairing {
    pub const ALL: [CrashPairing; 5] = [
        CrashPairing::LrmRlm,
        CrashPairing::LrmAlm,
        CrashPairing::LriRli,
        CrashPairing::LroRlo,
        CrashPairing::LreRle,
    ];

    pub fn left(self) -> char {
        match self {
            CrashPairing::LrmRlm | CrashPairing::LrmAlm => BidiControl::Lrm.as_char(),
            CrashPairing::LriRli => BidiControl::Lri.as_char(),
            CrashPairing::LroRlo => BidiControl::Lro.as_char(),
            CrashPairing::LreRle => BidiControl::Lre.as_char(),
        }
    }

    pub fn right(self) -> char {
        match self {
            CrashPairing::LrmRlm => BidiControl::Rlm.as_char(),
            CrashPairing::LrmAlm => BidiControl::Alm.as_char(),
            CrashPairing::LriRli => BidiControl::Rli.as_char(),
            CrashPairing::LroRlo => BidiControl::Rlo.as_char(),
            CrashPairing::LreRle => BidiControl::Rle.as_char(),
        }
    }

    pub fn break_char(self) -> char {
        match self {
            CrashPairing::LrmRlm | CrashPairing::LrmAlm => ZWJ,
            CrashPairing::LriRli => BidiControl::Pdi.as_char(),
            CrashPairing::LroRlo | CrashPairing::LreRle => BidiControl::Pdf.as_char(),
        }
    }

    /// Coloured circle identifying the pairing.
    pub fn marker(self) -> char {
        match self {
            CrashPairing::LrmRlm => '\u{26AB}',
            CrashPairing::LrmAlm => '\u{1F7E3}',
            CrashPairing::LriRli => '\u{1F534}',
            CrashPairing::LroRlo => '\u{1F7E0}',
            CrashPairing::LreRle => '\u{1F7E1}',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CrashPairing::LrmRlm => "lrm-rlm",
            CrashPairing::LrmAlm => "lrm-alm",
            CrashPairing::LriRli => "lri-rli",
            CrashPairing::LroRlo => "lro-rlo",
            CrashPairing::LreRle => "lre-rle",
        }
    }

    /// Display label, e.g. `"⚫ LRM+RLM"`.
    pub fn label(self) -> String {
        format!("{} {}", self.marker(), self.as_str().replace('-', "+").to_uppercase())
    }
}

impl FromStr for CrashPairing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('+', "-");
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| format!("unknown crash pairing: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrashStyle {
    Invisible,
    #[default]
    Pointer,
    Framed,
}

impl CrashStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            CrashStyle::Invisible => "invisible",
            CrashStyle::Pointer => "pointer",
            CrashStyle::Framed => "framed",
        }
    }
}

impl fmt::Display for CrashStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrashStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [CrashStyle::Invisible, CrashStyle::Pointer, CrashStyle::Framed]
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown crash style: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrashSpec {
    pub pairing: CrashPairing,
    /// Number of control codepoints (two per pair).
    pub length: usize,
    pub section_length: usize,
    pub style: CrashStyle,
}

impl Default for CrashSpec {
    fn default() -> Self {
        Self {
            pairing: CrashPairing::default(),
            length: 4000,
            section_length: 300,
            style: CrashStyle::default(),
        }
    }
}

/// Bare control sequence without decoration.
fn sequence(spec: &CrashSpec) -> String {
    let (left, right, brk) = (spec.pairing.left(), spec.pairing.right(), spec.pairing.break_char());
    let total = spec.length / 2;
    let per_section = (spec.section_length / 2).max(1);
    let mut out = String::new();
    let mut emitted = 0;
    while emitted < total {
        let chunk = per_section.min(total - emitted);
        for _ in 0..chunk {
            out.push(left);
            out.push(right);
        }
        out.push(brk);
        emitted += chunk;
    }
    out.push(brk);
    out
}

pub fn generate(spec: &CrashSpec) -> String {
    let body = sequence(spec);
    let egg = if spec.length > EASTER_EGG_THRESHOLD {
        tag::encode_str(EASTER_EGG)
    } else {
        String::new()
    };
    let marker = spec.pairing.marker();
    match spec.style {
        CrashStyle::Invisible => body,
        CrashStyle::Pointer => format!("<{marker}>{body}{egg}\u{1F448}"),
        CrashStyle::Framed => {
            let frame = format!("\u{25C0}{marker}{marker}\u{25B6}");
            let (open, close) = core_text::grapheme::split_midpoint(&frame);
            format!("{open}{body}{egg}{close}")
        }
    }
}
