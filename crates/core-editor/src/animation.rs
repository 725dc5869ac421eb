//! Typed-text animation with generation-token cancellation.
//!
//! `AnimationController::start` bumps a shared generation counter and hands
//! out a `RunToken` holding the new value. A token is valid only while the
//! counter still equals its value, so starting another run (or `cancel`)
//! invalidates every earlier token at once.
//!
//! `TypingPlayer` is a pull-based state machine: each `step` yields the next
//! text to show and how long to wait before the following step. The caller
//! owns the clock. A step with a stale token returns `None` and leaves the
//! player untouched.
//!
//! Per item: type one codepoint at a time (`speed`, 1.5x after space, LF or
//! ZWSP), wait `pause_before_delete`, delete one codepoint at a time with a
//! 25-40 ms jitter, wait `pause_between_items`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rand::Rng;

/// Texts shown on first start.
pub const INTRO_TEXTS: &[&str] = &[
    "This text is \u{E0069}\u{E006E}visible\u{E0020}\u{E0062}\u{E0079}\u{E0020}\u{E0075}\u{E0073}\u{E0069}\u{E006E}\u{E0067}\u{E0020}\u{E0074}\u{E0061}\u{E0067}\u{E0073}!",
    "Only this character \u{202E}.kcatta edirrevo idib siht seod",
    "\u{5D6}\u{5D4} feature \u{5D6}\u{5D4} \u{5DC}\u{5D0} bug",
];

/// Longer examples: emoji ZWJ sequences, flags, mixed-direction code.
pub const EXAMPLE_TEXTS: &[&str] = &[
    "\u{1F6B6}\u{1F3FD}\u{200D}\u{27A1}\u{FE0F}\n\u{1F3C3}\u{1F3FB}\u{200D}\u{2642}\u{FE0F}\u{200D}\u{27A1}\u{FE0F}\n\u{1F9D1}\u{1F3FC}\u{200D}\u{1F91D}\u{200D}\u{1F9D1}\u{1F3FD}\n\u{1F469}\u{200D}\u{2764}\u{FE0F}\u{200D}\u{1F48B}\u{200D}\u{1F468}\n\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}\u{200D}\u{1F466}",
    "\u{1F636}\u{200D}\u{1F32B}\u{FE0F}\n\u{1F635}\u{200D}\u{1F4AB}\n\u{1F1FA}\u{1F1F3}\n\u{1F1FA}\u{1F1F8}\n\u{1F3F4}\u{E0067}\u{E0062}\u{E0077}\u{E006C}\u{E0073}\u{E007F}",
    "<div title=\"\u{644}\">\u{639}</div>",
    "Ok, \u{5E2}\u{5E9}\u{5D9}\u{5EA}\u{5D9} totalCount = 42 \u{5D5}\u{5D0}\u{5D6} \u{5E7}\u{5E8}\u{5D0}\u{5EA}\u{5D9} \u{5DC}eval().",
];

const DELETE_JITTER_MS: std::ops::RangeInclusive<u64> = 25..=40;

#[derive(Debug, Clone, Default)]
pub struct AnimationController {
    generation: Arc<AtomicU64>,
}

impl AnimationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new run, invalidating all earlier tokens.
    pub fn start(&self) -> RunToken {
        let id = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(target: "animation", run = id, "run_started");
        RunToken {
            id,
            generation: Arc::clone(&self.generation),
        }
    }

    pub fn cancel(&self) {
        let prev = self.generation.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(target: "animation", run = prev, "run_cancelled");
    }

    pub fn is_current(&self, token: &RunToken) -> bool {
        token.is_valid()
    }
}

#[derive(Debug, Clone)]
pub struct RunToken {
    id: u64,
    generation: Arc<AtomicU64>,
}

impl RunToken {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_valid(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationTiming {
    pub speed: Duration,
    pub pause_before_delete: Duration,
    pub pause_between_items: Duration,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            speed: Duration::from_millis(150),
            pause_before_delete: Duration::from_millis(800),
            pause_between_items: Duration::from_millis(600),
        }
    }
}

impl AnimationTiming {
    fn type_delay(&self, typed: char) -> Duration {
        if matches!(typed, ' ' | '\n' | '\u{200B}') {
            self.speed * 3 / 2
        } else {
            self.speed
        }
    }
}

/// One visible state of the animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub text: String,
    /// Wait before the next step.
    pub delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Typing,
    Deleting,
    Finished,
}

#[derive(Debug)]
pub struct TypingPlayer {
    items: Vec<Vec<char>>,
    timing: AnimationTiming,
    token: RunToken,
    item: usize,
    typed: usize,
    shown: Vec<char>,
    phase: Phase,
}

impl TypingPlayer {
    pub fn new<S: AsRef<str>>(texts: &[S], timing: AnimationTiming, token: RunToken) -> Self {
        let items: Vec<Vec<char>> = texts.iter().map(|t| t.as_ref().chars().collect()).collect();
        let phase = if items.is_empty() { Phase::Finished } else { Phase::Typing };
        Self {
            items,
            timing,
            token,
            item: 0,
            typed: 0,
            shown: Vec::new(),
            phase,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Advance one step. `None` when finished or superseded.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Frame> {
        if !self.token.is_valid() {
            tracing::trace!(target: "animation", run = self.token.id(), "stale_step_ignored");
            return None;
        }
        match self.phase {
            Phase::Finished => None,
            Phase::Typing => {
                let current = &self.items[self.item];
                let Some(&c) = current.get(self.typed) else {
                    // Empty item: nothing to type or delete.
                    return Some(self.finish_item());
                };
                self.shown.push(c);
                self.typed += 1;
                let mut delay = self.timing.type_delay(c);
                if self.typed == current.len() {
                    delay += self.timing.pause_before_delete;
                    self.phase = Phase::Deleting;
                }
                Some(self.frame(delay))
            }
            Phase::Deleting => {
                self.shown.pop();
                if self.shown.is_empty() {
                    return Some(self.finish_item());
                }
                let jitter = Duration::from_millis(rng.gen_range(DELETE_JITTER_MS));
                Some(self.frame(jitter))
            }
        }
    }

    fn finish_item(&mut self) -> Frame {
        self.item += 1;
        self.typed = 0;
        self.shown.clear();
        if self.item >= self.items.len() {
            self.phase = Phase::Finished;
            tracing::debug!(target: "animation", run = self.token.id(), "run_completed");
            return self.frame(Duration::ZERO);
        }
        self.phase = Phase::Typing;
        self.frame(self.timing.pause_between_items)
    }

    fn frame(&self, delay: Duration) -> Frame {
        Frame {
            text: self.shown.iter().collect(),
            delay,
        }
    }
}
