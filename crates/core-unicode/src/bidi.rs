//! Bidirectional control codepoints and per-codepoint flow lookup.
//!
//! Directional types come from [`unicode_bidi::bidi_class`]; nothing here runs
//! the full UAX#9 reordering.

use unicode_bidi::BidiClass;

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

/// Named bidi control codepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BidiControl {
    Lre,
    Rle,
    Pdf,
    Lro,
    Rlo,
    Lri,
    Rli,
    Fsi,
    Pdi,
    Lrm,
    Rlm,
    Alm,
}

impl BidiControl {
    pub const ALL: [BidiControl; 12] = [
        BidiControl::Lre,
        BidiControl::Rle,
        BidiControl::Pdf,
        BidiControl::Lro,
        BidiControl::Rlo,
        BidiControl::Lri,
        BidiControl::Rli,
        BidiControl::Fsi,
        BidiControl::Pdi,
        BidiControl::Lrm,
        BidiControl::Rlm,
        BidiControl::Alm,
    ];

    pub fn as_char(self) -> char {
        match self {
            BidiControl::Lre => '\u{202A}',
            BidiControl::Rle => '\u{202B}',
            BidiControl::Pdf => '\u{202C}',
            BidiControl::Lro => '\u{202D}',
            BidiControl::Rlo => '\u{202E}',
            BidiControl::Lri => '\u{2066}',
            BidiControl::Rli => '\u{2067}',
            BidiControl::Fsi => '\u{2068}',
            BidiControl::Pdi => '\u{2069}',
            BidiControl::Lrm => '\u{200E}',
            BidiControl::Rlm => '\u{200F}',
            BidiControl::Alm => '\u{061C}',
        }
    }

    /// Upper-case abbreviation (`"RLO"`).
    pub fn name(self) -> &'static str {
        match self {
            BidiControl::Lre => "LRE",
            BidiControl::Rle => "RLE",
            BidiControl::Pdf => "PDF",
            BidiControl::Lro => "LRO",
            BidiControl::Rlo => "RLO",
            BidiControl::Lri => "LRI",
            BidiControl::Rli => "RLI",
            BidiControl::Fsi => "FSI",
            BidiControl::Pdi => "PDI",
            BidiControl::Lrm => "LRM",
            BidiControl::Rlm => "RLM",
            BidiControl::Alm => "ALM",
        }
    }

    /// Case-insensitive lookup by abbreviation.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn from_char(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|ctl| ctl.as_char() == c)
    }
}

/// How a group of controls scopes its effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlGroupKind {
    Standalone,
    Embedding,
    Override,
    Isolate,
    NeutralIsolate,
}

/// A set of controls meant to be inserted together (opener then closer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlGroup {
    pub kind: ControlGroupKind,
    pub controls: &'static [BidiControl],
}

pub const RTL_GROUPS: &[ControlGroup] = &[
    ControlGroup {
        kind: ControlGroupKind::Standalone,
        controls: &[BidiControl::Rlm, BidiControl::Alm],
    },
    ControlGroup {
        kind: ControlGroupKind::Embedding,
        controls: &[BidiControl::Rle, BidiControl::Pdf],
    },
    ControlGroup {
        kind: ControlGroupKind::Override,
        controls: &[BidiControl::Rlo, BidiControl::Pdf],
    },
    ControlGroup {
        kind: ControlGroupKind::Isolate,
        controls: &[BidiControl::Rli, BidiControl::Pdi],
    },
    ControlGroup {
        kind: ControlGroupKind::NeutralIsolate,
        controls: &[BidiControl::Fsi, BidiControl::Pdi],
    },
];

pub const LTR_GROUPS: &[ControlGroup] = &[
    ControlGroup {
        kind: ControlGroupKind::Standalone,
        controls: &[BidiControl::Lrm],
    },
    ControlGroup {
        kind: ControlGroupKind::Embedding,
        controls: &[BidiControl::Lre, BidiControl::Pdf],
    },
    ControlGroup {
        kind: ControlGroupKind::Override,
        controls: &[BidiControl::Lro, BidiControl::Pdf],
    },
    ControlGroup {
        kind: ControlGroupKind::Isolate,
        controls: &[BidiControl::Lri, BidiControl::Pdi],
    },
    ControlGroup {
        kind: ControlGroupKind::NeutralIsolate,
        controls: &[BidiControl::Fsi, BidiControl::Pdi],
    },
];

// ---------------------------------------------------------------------------
// Flow
// ---------------------------------------------------------------------------

/// Strong direction of a single codepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    Ltr,
    Rtl,
    Neutral,
}

pub fn flow(c: char) -> Flow {
    match unicode_bidi::bidi_class(c) {
        BidiClass::R | BidiClass::AL => Flow::Rtl,
        BidiClass::L => Flow::Ltr,
        _ => Flow::Neutral,
    }
}

/// True when the first non-whitespace codepoint is right-to-left.
pub fn starts_rtl(text: &str) -> bool {
    text.chars()
        .find(|c| !c.is_whitespace())
        .is_some_and(|c| flow(c) == Flow::Rtl)
}
