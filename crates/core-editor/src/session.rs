//! One editing session: buffer, remembered selection, caret and tool state.
//!
//! Every mutation is a splice over an exact codepoint range of the buffer
//! (`before + new + after`); nothing outside the range is touched. Positions
//! are codepoint indices throughout.
//!
//! Text replacement entry points (`set_text`, transforms, animation frames)
//! all route through `replace_all`, which keeps the normalization session in
//! sync: a change that is not the session's own output discards the frozen
//! original.

use std::ops::Range;
use std::path::Path;

use rand::Rng;

use core_data::{ConfusableSource, MetadataStore};
use core_text::{Buffer, NormalizationForm, NormalizationSession};
use core_transform::insert::{InsertKind, Insertion, insert_with_policy, random_char};
use core_transform::noise;
use core_transform::spoof::{SpoofMode, SpoofOutcome, spoof};
use core_unicode::{BidiControl, is_invisible, tag};

use crate::animation::{AnimationController, AnimationTiming, Frame, TypingPlayer};
use crate::annotate::{Annotation, DisplayStyle, annotate};
use crate::error::EditError;
use crate::io::{self, ExportError, ImportError};
use crate::selection::{BlurCause, Selection, SelectionTracker};
use crate::share::{Direction, Panel, PanelSet, ShareState};

/// Result of a codepoint edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Unchanged,
    Replaced(Range<usize>),
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStats {
    pub codepoints: usize,
    pub utf16_units: usize,
    pub bytes: usize,
    pub graphemes: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        Self {
            codepoints: text.chars().count(),
            utf16_units: text.encode_utf16().count(),
            bytes: text.len(),
            graphemes: core_text::grapheme::count(text),
        }
    }
}

/// Parse `U+XXXX` notation (1-6 hex digits, case-insensitive prefix).
pub fn parse_notation(input: &str) -> Result<char, EditError> {
    let bad = || EditError::BadNotation(input.to_string());
    let digits = input
        .strip_prefix("U+")
        .or_else(|| input.strip_prefix("u+"))
        .ok_or_else(bad)?;
    if digits.is_empty() || digits.len() > 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(bad());
    }
    let cp = u32::from_str_radix(digits, 16).map_err(|_| bad())?;
    char::from_u32(cp).ok_or(EditError::NotAScalar(cp))
}

fn is_notation(input: &str) -> bool {
    input.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("u+"))
}

#[derive(Debug, Default)]
pub struct EditorSession {
    buffer: Buffer,
    selection: SelectionTracker,
    caret: usize,
    tag_typing: bool,
    direction: Direction,
    panels: PanelSet,
    normalization: NormalizationSession,
    animation: AnimationController,
}

impl EditorSession {
    pub fn new(text: &str) -> Self {
        Self {
            buffer: Buffer::new("editor", text),
            caret: text.chars().count(),
            ..Default::default()
        }
    }

    pub fn from_share(state: &ShareState) -> Self {
        let mut session = Self::new(&state.text);
        session.direction = state.direction;
        session.panels = state.panels;
        session
    }

    pub fn share_state(&self) -> ShareState {
        ShareState {
            text: self.text(),
            direction: self.direction,
            panels: self.panels,
        }
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn stats(&self) -> TextStats {
        TextStats::of(&self.text())
    }

    /// Replace the whole text (typing, paste, import, transforms).
    pub fn set_text(&mut self, text: &str) {
        self.replace_all(text);
        self.caret = self.buffer.len_chars();
        self.selection.clear();
    }

    fn replace_all(&mut self, text: &str) {
        self.buffer.set_text(text);
        self.normalization.observe(text);
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    pub fn select(&mut self, start: usize, end: usize) {
        let len = self.buffer.len_chars();
        self.selection.select(start.min(len), end.min(len));
    }

    pub fn blur(&mut self, cause: BlurCause) {
        self.selection.blur(cause);
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection.current()
    }

    // ---------------------------------------------------------------------
    // Insertion
    // ---------------------------------------------------------------------

    pub fn tag_typing(&self) -> bool {
        self.tag_typing
    }

    pub fn set_tag_typing(&mut self, on: bool) {
        self.tag_typing = on;
    }

    /// Type `typed` at the selection (replacing it) or the caret. With tag
    /// typing on, only tag-typable characters survive and each becomes its
    /// tag mirror. Returns the new caret.
    pub fn type_text(&mut self, typed: &str) -> usize {
        let payload = if self.tag_typing {
            typed
                .chars()
                .filter(|&c| tag::is_tag_typable(c))
                .filter_map(tag::encode)
                .collect()
        } else {
            typed.to_string()
        };
        let range = self
            .selection
            .take()
            .map_or(self.caret..self.caret, |s| s.range());
        let placed = self.buffer.replace(range, &payload);
        self.normalization.observe(&self.buffer.to_string());
        self.caret = placed.end;
        self.selection.select(self.caret, self.caret);
        tracing::trace!(target: "editor", inserted = placed.len(), tag = self.tag_typing, "typed");
        self.caret
    }

    /// Insert a random invisible, word-break or no-break codepoint.
    pub fn insert_random<R: Rng + ?Sized>(&mut self, kind: InsertKind, rng: &mut R) -> Insertion {
        let c = random_char(kind, rng);
        self.insert_tool_char(c, rng)
    }

    pub fn insert_bidi_control<R: Rng + ?Sized>(&mut self, control: BidiControl, rng: &mut R) -> Insertion {
        self.insert_tool_char(control.as_char(), rng)
    }

    /// Tool-button insertion: consumes the remembered selection, else uses
    /// the random position policy.
    fn insert_tool_char<R: Rng + ?Sized>(&mut self, c: char, rng: &mut R) -> Insertion {
        let selection = self.selection.take().map(|s| s.range());
        let had_selection = selection.is_some();
        let result = insert_with_policy(&self.text(), &c.to_string(), selection, rng);
        self.replace_all(&result.text);
        self.caret = result.caret;
        tracing::debug!(target: "editor", codepoint = u32::from(c), had_selection, "tool_insert");
        result
    }

    // ---------------------------------------------------------------------
    // Codepoint editing
    // ---------------------------------------------------------------------

    /// Splice over `[pos, pos + original_len_bytes)`.
    pub fn replace_at(&mut self, pos: usize, original_len_bytes: usize, text: &str) -> Result<Range<usize>, EditError> {
        let placed = self.buffer.replace_at(pos, original_len_bytes, text)?;
        self.normalization.observe(&self.buffer.to_string());
        Ok(placed)
    }

    /// Apply the codepoint dialog's input to the codepoint at `index`.
    ///
    /// - empty input deletes the codepoint
    /// - `U+XXXX` (surrounding whitespace ignored) replaces it, unless it
    ///   names the same codepoint
    /// - a single ASCII char (0x20-0x7F) typed into an invisible slot is
    ///   stored as its tag mirror
    /// - anything else replaces it literally
    ///
    /// Malformed notation is an error and leaves the buffer untouched.
    pub fn edit_codepoint(&mut self, index: usize, input: &str) -> Result<EditOutcome, EditError> {
        let len = self.buffer.len_chars();
        let original = self
            .buffer
            .char_at(index)
            .ok_or(EditError::NoCodepoint { index, len })?;

        if input.is_empty() {
            self.replace_at(index, original.len_utf8(), "")?;
            return Ok(EditOutcome::Deleted);
        }

        let notation = input.trim();
        let replacement = if is_notation(notation) {
            let c = parse_notation(notation).inspect_err(|e| {
                tracing::debug!(target: "editor", error = %e, "notation_rejected");
            })?;
            if c == original {
                return Ok(EditOutcome::Unchanged);
            }
            c.to_string()
        } else {
            let mut chars = input.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if is_invisible(u32::from(original)) => {
                    tag::encode(c).unwrap_or(c).to_string()
                }
                _ => input.to_string(),
            }
        };
        let placed = self.replace_at(index, original.len_utf8(), &replacement)?;
        Ok(EditOutcome::Replaced(placed))
    }

    // ---------------------------------------------------------------------
    // Whole-text tools
    // ---------------------------------------------------------------------

    pub fn apply_spoof<S, R>(&mut self, mode: SpoofMode, chaos: f64, source: &S, rng: &mut R) -> SpoofOutcome
    where
        S: ConfusableSource + ?Sized,
        R: Rng + ?Sized,
    {
        let outcome = spoof(&self.text(), mode, chaos, source, rng);
        self.set_text(&outcome.text);
        outcome
    }

    pub fn apply_noise<R: Rng + ?Sized>(&mut self, ranges: &str, count: usize, rng: &mut R) {
        let noisy = noise::add_noise(&self.text(), ranges, count, rng);
        self.set_text(&noisy);
    }

    /// Show the text in `form` (`None` = the original).
    pub fn normalize(&mut self, form: Option<NormalizationForm>) {
        let shown = self.normalization.select(&self.text(), form);
        self.buffer.set_text(&shown);
        self.caret = self.buffer.len_chars();
    }

    pub fn normalization(&self) -> Option<NormalizationForm> {
        self.normalization.selected()
    }

    // ---------------------------------------------------------------------
    // Direction, panels, display
    // ---------------------------------------------------------------------

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.toggled(&self.text());
    }

    /// Open or close a panel. Any panel toggle stops a running animation.
    pub fn set_panel(&mut self, panel: Panel, open: bool) {
        self.animation.cancel();
        self.panels.set(panel, open);
    }

    pub fn panels(&self) -> PanelSet {
        self.panels
    }

    pub fn annotate(&self, metadata: &MetadataStore, style: DisplayStyle) -> Annotation {
        annotate(&self.text(), metadata, style)
    }

    // ---------------------------------------------------------------------
    // Animation
    // ---------------------------------------------------------------------

    pub fn animation(&self) -> &AnimationController {
        &self.animation
    }

    /// Start a typing animation, superseding any running one.
    pub fn start_animation<S: AsRef<str>>(&mut self, texts: &[S], timing: AnimationTiming) -> TypingPlayer {
        TypingPlayer::new(texts, timing, self.animation.start())
    }

    /// Advance `player` and show its frame. Stale players change nothing.
    pub fn play_step<R: Rng + ?Sized>(&mut self, player: &mut TypingPlayer, rng: &mut R) -> Option<Frame> {
        let frame = player.step(rng)?;
        self.set_text(&frame.text);
        Some(frame)
    }

    // ---------------------------------------------------------------------
    // Files
    // ---------------------------------------------------------------------

    /// Replace the text with the file's first `max_bytes` bytes. On error
    /// the text is left as it was.
    pub fn import(&mut self, path: &Path, max_bytes: usize) -> Result<(), ImportError> {
        let text = io::import(path, max_bytes)?;
        self.set_text(&text);
        Ok(())
    }

    pub fn export(&self, path: &Path) -> Result<(), ExportError> {
        io::export(path, &self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    #[test]
    fn notation_parsing() {
        assert_eq!(parse_notation("U+200B"), Ok('\u{200B}'));
        assert_eq!(parse_notation("u+1f600"), Ok('\u{1F600}'));
        assert_eq!(parse_notation("U+41"), Ok('A'));
        assert!(matches!(parse_notation("U+"), Err(EditError::BadNotation(_))));
        assert!(matches!(parse_notation("U+1234567"), Err(EditError::BadNotation(_))));
        assert!(matches!(parse_notation("U+XYZ"), Err(EditError::BadNotation(_))));
        assert_eq!(parse_notation("U+D800"), Err(EditError::NotAScalar(0xD800)));
        assert_eq!(parse_notation("U+110000"), Err(EditError::NotAScalar(0x110000)));
    }

    #[test]
    fn edit_with_notation() {
        let mut s = EditorSession::new("a\u{200B}b");
        assert_eq!(s.edit_codepoint(1, "U+200C"), Ok(EditOutcome::Replaced(1..2)));
        assert_eq!(s.text(), "a\u{200C}b");
        assert_eq!(s.edit_codepoint(1, "u+200c"), Ok(EditOutcome::Unchanged));
    }

    #[test]
    fn notation_ignores_surrounding_whitespace() {
        let mut s = EditorSession::new("a\u{200B}b");
        assert_eq!(s.edit_codepoint(1, " U+200C \n"), Ok(EditOutcome::Replaced(1..2)));
        assert_eq!(s.text(), "a\u{200C}b");
    }

    #[test]
    fn bad_notation_is_a_no_op() {
        let mut s = EditorSession::new("a\u{200B}b");
        assert!(s.edit_codepoint(1, "U+ZZ").is_err());
        assert!(s.edit_codepoint(1, "U+DFFF").is_err());
        assert_eq!(s.text(), "a\u{200B}b");
    }

    #[test]
    fn ascii_into_invisible_slot_becomes_tag() {
        let mut s = EditorSession::new("x\u{2060}y");
        s.edit_codepoint(1, "K").unwrap();
        assert_eq!(s.text(), "x\u{E004B}y");
        // visible slot: literal
        s.edit_codepoint(0, "Z").unwrap();
        assert_eq!(s.text(), "Z\u{E004B}y");
    }

    #[test]
    fn delete_and_astral_edits() {
        let mut s = EditorSession::new("a\u{1F600}b");
        assert_eq!(s.edit_codepoint(1, "xy"), Ok(EditOutcome::Replaced(1..3)));
        assert_eq!(s.text(), "axyb");
        assert_eq!(s.edit_codepoint(3, ""), Ok(EditOutcome::Deleted));
        assert_eq!(s.text(), "axy");
        assert!(matches!(s.edit_codepoint(9, "q"), Err(EditError::NoCodepoint { index: 9, len: 3 })));
    }

    #[test]
    fn tag_typing_filters_and_encodes() {
        let mut s = EditorSession::new("ab");
        s.select(1, 1);
        s.set_tag_typing(true);
        let caret = s.type_text("H-i!");
        assert_eq!(s.text(), "a\u{E0048}\u{E0069}\u{E0021}b");
        assert_eq!(caret, 4);
        s.set_tag_typing(false);
        s.type_text("-");
        assert_eq!(s.text(), "a\u{E0048}\u{E0069}\u{E0021}-b");
    }

    #[test]
    fn typing_replaces_selection() {
        let mut s = EditorSession::new("hello");
        s.select(4, 1);
        assert_eq!(s.type_text("E"), 2);
        assert_eq!(s.text(), "hEo");
    }

    #[test]
    fn bidi_insert_at_caret_selection() {
        let mut s = EditorSession::new("abc");
        s.select(3, 3);
        s.blur(BlurCause::ToolButton);
        let out = s.insert_bidi_control(BidiControl::Rlo, &mut rng());
        assert_eq!(out.text, "abc\u{202E}");
        assert_eq!(s.caret(), 4);
        assert_eq!(s.selection(), None);
    }

    #[test]
    fn other_blur_falls_back_to_random_policy() {
        let mut s = EditorSession::new("hello world");
        s.select(0, 0);
        s.blur(BlurCause::Other);
        let out = s.insert_random(InsertKind::NoBreak, &mut rng());
        let pos = out.caret - 1;
        assert!((1..11).contains(&pos));
    }

    #[test]
    fn normalization_round_trip_and_reset() {
        let mut s = EditorSession::new("e\u{301}");
        s.normalize(Some(NormalizationForm::Nfc));
        assert_eq!(s.text(), "\u{E9}");
        s.normalize(Some(NormalizationForm::Nfd));
        assert_eq!(s.text(), "e\u{301}");
        s.normalize(None);
        assert_eq!(s.text(), "e\u{301}");

        s.normalize(Some(NormalizationForm::Nfc));
        s.set_text("new");
        assert_eq!(s.normalization(), None);
        s.normalize(None);
        assert_eq!(s.text(), "new");
    }

    #[test]
    fn panel_toggle_cancels_animation() {
        let mut s = EditorSession::new("");
        let mut player = s.start_animation(&["abc"], AnimationTiming::default());
        let mut r = rng();
        assert!(s.play_step(&mut player, &mut r).is_some());
        s.set_panel(Panel::Noise, true);
        assert!(s.play_step(&mut player, &mut r).is_none());
        assert_eq!(s.text(), "a");
        assert!(s.panels().is_open(Panel::Noise));
    }

    #[test]
    fn share_state_round_trip() {
        let mut s = EditorSession::new("\u{5E9}\u{5DC}\u{5D5}\u{5DD}");
        s.toggle_direction();
        assert_eq!(s.direction(), Direction::Ltr);
        s.set_panel(Panel::Unseen, true);
        let state = s.share_state();
        let restored = EditorSession::from_share(&ShareState::from_query(&state.to_query()));
        assert_eq!(restored.share_state(), state);
    }

    #[test]
    fn stats_count_each_unit() {
        let s = EditorSession::new("e\u{301}\u{1F600}");
        assert_eq!(
            s.stats(),
            TextStats {
                codepoints: 3,
                utf16_units: 4,
                bytes: 7,
                graphemes: 2,
            }
        );
    }
}
