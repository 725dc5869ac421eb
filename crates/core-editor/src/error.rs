use core_text::TextError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("`{0}` is not valid U+XXXX notation")]
    BadNotation(String),
    #[error("U+{0:X} is not a Unicode scalar value")]
    NotAScalar(u32),
    #[error("no codepoint at index {index} (buffer has {len})")]
    NoCodepoint { index: usize, len: usize },
    #[error(transparent)]
    Text(#[from] TextError),
}
