//! Codepoint-level editable text model.
//!
//! `EditorSession` owns the buffer and every piece of per-session tool state
//! (remembered selection, tag typing, direction, open panels, normalization,
//! animation). Lookup stores are borrowed per call, never owned, so any number
//! of sessions can share one loaded `MetadataStore` / `ConfusablesStore`.

pub mod animation;
pub mod annotate;
pub mod error;
pub mod io;
pub mod selection;
pub mod session;
pub mod share;

pub use animation::{AnimationController, AnimationTiming, Frame, RunToken, TypingPlayer};
pub use annotate::{AnnotatedChar, Annotation, DisplayStyle, annotate};
pub use error::EditError;
pub use io::{ExportError, ImportError, MAX_IMPORT_BYTES};
pub use selection::{BlurCause, Selection, SelectionTracker};
pub use session::{EditOutcome, EditorSession, TextStats, parse_notation};
pub use share::{Direction, Panel, PanelSet, ShareState};
