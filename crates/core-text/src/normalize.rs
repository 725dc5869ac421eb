//! Normalization forms and the freeze-on-first-use normalization session.
//!
//! Contract:
//! - Choosing any form freezes the current text as the session original (only
//!   the first time). Every later form is applied to that frozen original, so
//!   NFD -> NFC -> NFKD never compounds.
//! - Choosing "original" (`None`) hands the frozen text back.
//! - `observe` with text the session did not produce discards the frozen
//!   original: the user edited by hand and the next form starts over.
//! - Safety: never logs content.

use std::fmt;
use std::str::FromStr;

use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalizationForm {
    Nfc,
    Nfd,
    Nfkc,
    Nfkd,
}

impl NormalizationForm {
    pub const ALL: [NormalizationForm; 4] = [
        NormalizationForm::Nfc,
        NormalizationForm::Nfd,
        NormalizationForm::Nfkc,
        NormalizationForm::Nfkd,
    ];

    pub fn apply(self, input: &str) -> String {
        match self {
            NormalizationForm::Nfc => input.nfc().collect(),
            NormalizationForm::Nfd => input.nfd().collect(),
            NormalizationForm::Nfkc => input.nfkc().collect(),
            NormalizationForm::Nfkd => input.nfkd().collect(),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            NormalizationForm::Nfc => "Combine parts",
            NormalizationForm::Nfd => "Split into parts",
            NormalizationForm::Nfkc => "Simplify and combine",
            NormalizationForm::Nfkd => "Simplify and split",
        }
    }
}

impl fmt::Display for NormalizationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NormalizationForm::Nfc => "NFC",
            NormalizationForm::Nfd => "NFD",
            NormalizationForm::Nfkc => "NFKC",
            NormalizationForm::Nfkd => "NFKD",
        })
    }
}

impl FromStr for NormalizationForm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|form| form.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown normalization form: {s}"))
    }
}

#[derive(Debug, Clone, Default)]
pub struct NormalizationSession {
    frozen: Option<String>,
    selected: Option<NormalizationForm>,
    last_output: Option<String>,
}

impl NormalizationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected form (`None` = original).
    pub fn selected(&self) -> Option<NormalizationForm> {
        self.selected
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }

    /// Select a form for `current` text; returns the text to show.
    pub fn select(&mut self, current: &str, form: Option<NormalizationForm>) -> String {
        let out = match form {
            Some(form) => {
                let base = self.frozen.get_or_insert_with(|| current.to_string());
                form.apply(base)
            }
            None => self.frozen.clone().unwrap_or_else(|| current.to_string()),
        };
        self.selected = form;
        self.last_output = Some(out.clone());
        out
    }

    /// Return the frozen original (if any) and reset the session.
    pub fn restore(&mut self) -> Option<String> {
        self.selected = None;
        self.last_output = None;
        self.frozen.take()
    }

    /// Notify the session of the buffer's current text.
    pub fn observe(&mut self, text: &str) {
        if self.last_output.as_deref() != Some(text) {
            self.frozen = None;
            self.selected = None;
            self.last_output = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAFE: &str = "cafe\u{0301} ﬁ";

    #[test]
    fn forms_apply_to_frozen_original() {
        let mut s = NormalizationSession::new();
        let nfkd = s.select(CAFE, Some(NormalizationForm::Nfkd));
        assert_eq!(nfkd, "cafe\u{0301} fi");
        // Feeding the NFKD text back must not compound: NFC starts from the original.
        let nfc = s.select(&nfkd, Some(NormalizationForm::Nfc));
        assert_eq!(nfc, "caf\u{00E9} ﬁ");
        assert_eq!(s.select(&nfc, None), CAFE);
    }

    #[test]
    fn manual_edit_discards_frozen_original() {
        let mut s = NormalizationSession::new();
        let out = s.select(CAFE, Some(NormalizationForm::Nfc));
        s.observe(&out);
        assert!(s.is_frozen());
        s.observe("typed by hand");
        assert!(!s.is_frozen());
        assert_eq!(s.select("abc", Some(NormalizationForm::Nfd)), "abc");
    }

    #[test]
    fn restore_hands_back_original() {
        let mut s = NormalizationSession::new();
        s.select(CAFE, Some(NormalizationForm::Nfkc));
        assert_eq!(s.restore().as_deref(), Some(CAFE));
        assert_eq!(s.restore(), None);
    }

    #[test]
    fn parse_forms() {
        assert_eq!("nfkc".parse::<NormalizationForm>(), Ok(NormalizationForm::Nfkc));
        assert!("nfx".parse::<NormalizationForm>().is_err());
    }
}
