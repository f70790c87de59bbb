use thiserror::Error;

use crate::{lexer::error::LexerError, range::Range};

type Found = String;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error(transparent)]
    Lexer(#[from] LexerError),
    #[error("Invalid token `{1}` at the start of a directive")]
    InvalidToken(Range, Found),
    #[error("Expected {1} but got `{2}`")]
    UnexpectedToken(Range, &'static str, Found),
    #[error("Missing item variable capture for `for ({1})`")]
    NoItemVariableCapture(Range, String),
    #[error("Mismatched template delimiter, expected `}}}}` but got `{1}`")]
    MismatchedTemplateDelimiter(Range, Found),
}

impl ParseError {
    pub fn range(&self) -> Range {
        match self {
            ParseError::Lexer(err) => err.range(),
            ParseError::InvalidToken(range, _)
            | ParseError::UnexpectedToken(range, _, _)
            | ParseError::NoItemVariableCapture(range, _)
            | ParseError::MismatchedTemplateDelimiter(range, _) => *range,
        }
    }
}
