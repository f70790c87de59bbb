use thiserror::Error;

use crate::{parser::error::ParseError, range::Range};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Mismatched template delimiter, `}}}}` without an opening `{{{{`")]
    MismatchedTemplateDelimiter(Range),
    #[error("Unexpected `end` without an open loop")]
    UnexpectedEnd(Range),
    #[error("Loop is never closed with `end`")]
    UnclosedLoop(Range),
}

impl CompileError {
    pub fn range(&self) -> Range {
        match self {
            CompileError::Parse(err) => err.range(),
            CompileError::MismatchedTemplateDelimiter(range)
            | CompileError::UnexpectedEnd(range)
            | CompileError::UnclosedLoop(range) => *range,
        }
    }
}
