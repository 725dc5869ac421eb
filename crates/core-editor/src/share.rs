//! Shareable editor state encoded as URL query parameters.
//!
//! Wire format (`application/x-www-form-urlencoded`):
//! - `text`: the buffer, omitted when empty
//! - `dir`: `ltr` | `rtl`, omitted for `auto`
//! - one key per open panel with value `1`
//!
//! Unknown keys are ignored on decode; a panel key with any value other than
//! `1` is treated as closed.

use std::fmt;
use std::str::FromStr;

use url::Url;
use url::form_urlencoded;

use core_unicode::bidi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Auto,
    Ltr,
    Rtl,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Auto => "auto",
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }

    /// Concrete direction for `text`: `Auto` becomes RTL when the first
    /// non-whitespace codepoint is right-to-left.
    pub fn resolve(self, text: &str) -> Direction {
        match self {
            Direction::Auto if bidi::starts_rtl(text) => Direction::Rtl,
            Direction::Auto => Direction::Ltr,
            other => other,
        }
    }

    pub fn toggled(self, text: &str) -> Direction {
        match self.resolve(text) {
            Direction::Rtl => Direction::Ltr,
            _ => Direction::Rtl,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Direction::Auto),
            "ltr" => Ok(Direction::Ltr),
            "rtl" => Ok(Direction::Rtl),
            other => Err(format!("unknown direction `{other}`")),
        }
    }
}

/// Collapsible tool panels, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Panel {
    Spoofing,
    Indicators,
    Typing,
    Noise,
    Unseen,
    BidiSupport,
    Normalization,
    Fonts,
}

impl Panel {
    pub const ALL: [Panel; 8] = [
        Panel::Spoofing,
        Panel::Indicators,
        Panel::Typing,
        Panel::Noise,
        Panel::Unseen,
        Panel::BidiSupport,
        Panel::Normalization,
        Panel::Fonts,
    ];

    /// Query key.
    pub fn key(self) -> &'static str {
        match self {
            Panel::Spoofing => "spoofing",
            Panel::Indicators => "indicators",
            Panel::Typing => "typing",
            Panel::Noise => "noise",
            Panel::Unseen => "unseen",
            Panel::BidiSupport => "BIDISupport",
            Panel::Normalization => "normalization",
            Panel::Fonts => "fonts",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Panel::Spoofing => "Homographic spoofing",
            Panel::Indicators => "Text Indicators",
            Panel::Typing => "Examples & Animations",
            Panel::Noise => "Noise Generator",
            Panel::Unseen => "Add Unseen Characters",
            Panel::BidiSupport => "Invisible BIDI Support",
            Panel::Normalization => "Normalization",
            Panel::Fonts => "Fonts",
        }
    }

    pub fn from_key(key: &str) -> Option<Panel> {
        Panel::ALL.into_iter().find(|p| p.key() == key)
    }
}

/// Set of open panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelSet {
    bits: u8,
}

impl PanelSet {
    fn bit(panel: Panel) -> u8 {
        1 << (panel as u8)
    }

    pub fn set(&mut self, panel: Panel, open: bool) {
        if open {
            self.bits |= Self::bit(panel);
        } else {
            self.bits &= !Self::bit(panel);
        }
    }

    pub fn is_open(&self, panel: Panel) -> bool {
        self.bits & Self::bit(panel) != 0
    }

    pub fn open(&self) -> impl Iterator<Item = Panel> + '_ {
        Panel::ALL.into_iter().filter(|p| self.is_open(*p))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShareState {
    pub text: String,
    pub direction: Direction,
    pub panels: PanelSet,
}

impl ShareState {
    /// Encode as a query string without the leading `?`.
    pub fn to_query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if !self.text.is_empty() {
            query.append_pair("text", &self.text);
        }
        if self.direction != Direction::Auto {
            query.append_pair("dir", self.direction.as_str());
        }
        for panel in self.panels.open() {
            query.append_pair(panel.key(), "1");
        }
        query.finish()
    }

    /// Decode a query string (leading `?` optional).
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut state = ShareState::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "text" => state.text = value.into_owned(),
                "dir" => state.direction = value.parse().unwrap_or_default(),
                other => {
                    if let Some(panel) = Panel::from_key(other) {
                        state.panels.set(panel, value == "1");
                    }
                }
            }
        }
        state
    }

    /// `base` with its query replaced by this state.
    pub fn to_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        let query = self.to_query();
        url.set_query((!query.is_empty()).then_some(query.as_str()));
        url
    }

    pub fn from_url(input: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(input)?;
        Ok(Self::from_query(url.query().unwrap_or_default()))
    }
}
