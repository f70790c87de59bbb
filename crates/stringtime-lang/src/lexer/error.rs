use thiserror::Error;

use crate::range::Range;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexerError {
    #[error("Invalid token `{1}`")]
    InvalidToken(Range, String),
    #[error("Mismatched template delimiter, expected `}}}}`")]
    MismatchedTemplateDelimiter(Range),
}

impl LexerError {
    pub fn range(&self) -> Range {
        match self {
            LexerError::InvalidToken(range, _) => *range,
            LexerError::MismatchedTemplateDelimiter(range) => *range,
        }
    }
}
