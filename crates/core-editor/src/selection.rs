//! Remembered selection for tool-button insertion.
//!
//! Tool buttons steal focus from the text area, so the last selection is
//! captured when the button is pressed and survives the resulting blur. Any
//! other blur forgets it. A captured selection is consumed by the next
//! insertion; without one, insertion falls back to the random position policy.
//!
//! Invariants:
//! - `start <= end` for every stored selection (normalized on construction).
//! - An empty selection (`start == end`) is a caret and still counts as a
//!   selection: insertion happens at the caret.

use std::ops::Range;

/// Codepoint range, normalized so `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(mut a: usize, mut b: usize) -> Self {
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        Self { start: a, end: b }
    }

    pub fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Why the text area lost focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurCause {
    /// A tool button (insert invisible, bidi control, ...) took focus.
    ToolButton,
    Other,
}

#[derive(Debug, Default, Clone)]
pub struct SelectionTracker {
    last: Option<Selection>,
}

impl SelectionTracker {
    pub fn select(&mut self, start: usize, end: usize) {
        self.last = Some(Selection::new(start, end));
    }

    pub fn blur(&mut self, cause: BlurCause) {
        if cause == BlurCause::Other {
            self.last = None;
        }
    }

    pub fn current(&self) -> Option<Selection> {
        self.last
    }

    /// Take the remembered selection, leaving none behind.
    pub fn take(&mut self) -> Option<Selection> {
        self.last.take()
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_is_normalized() {
        assert_eq!(Selection::new(5, 2), Selection { start: 2, end: 5 });
        assert!(Selection::caret(3).is_caret());
    }

    #[test]
    fn tool_button_blur_keeps_selection() {
        let mut t = SelectionTracker::default();
        t.select(1, 3);
        t.blur(BlurCause::ToolButton);
        assert_eq!(t.current(), Some(Selection::new(1, 3)));
        t.blur(BlurCause::Other);
        assert_eq!(t.current(), None);
    }

    #[test]
    fn take_consumes() {
        let mut t = SelectionTracker::default();
        t.select(0, 0);
        assert_eq!(t.take(), Some(Selection::caret(0)));
        assert_eq!(t.take(), None);
    }
}
