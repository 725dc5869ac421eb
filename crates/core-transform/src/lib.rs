//! Text transformation engine.
//!
//! Every transform is a plain function of its input, its parameters and an
//! injected `Rng`; seeding the `Rng` makes any output reproducible. None of
//! them log text content.

pub mod crash;
pub mod insert;
pub mod noise;
pub mod prompt;
pub mod recovery;
pub mod spoof;
pub mod url_twist;

pub use crash::{CrashPairing, CrashSpec, CrashStyle};
pub use insert::{InsertKind, Insertion, insert_with_policy, random_char};
pub use prompt::EncodingStrategy;
pub use recovery::{RecoveryCandidate, recover};
pub use spoof::{SpoofMode, SpoofOutcome, spoof};
pub use url_twist::{TwistError, twist};
