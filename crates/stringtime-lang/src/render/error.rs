use smol_str::SmolStr;
use thiserror::Error;

use crate::range::Range;

type TypeName = &'static str;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Variable \"{1}\" not found")]
    VariableNameNotFound(Range, SmolStr),
    #[error("Cannot substitute \"{1}\", a {2} has no text form")]
    InvalidSubstitution(Range, SmolStr, TypeName),
    #[error("Cannot iterate over \"{1}\", expected a sequence but got a {2}")]
    NotIterable(Range, SmolStr, TypeName),
    #[error("Failed to format \"{1}\"")]
    Format(Range, SmolStr),
}

impl RenderError {
    pub fn range(&self) -> Range {
        match self {
            RenderError::VariableNameNotFound(range, _)
            | RenderError::InvalidSubstitution(range, _, _)
            | RenderError::NotIterable(range, _, _)
            | RenderError::Format(range, _) => *range,
        }
    }
}
