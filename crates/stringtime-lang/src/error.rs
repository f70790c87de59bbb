use std::fmt::{self, Display, Formatter};

use miette::{Diagnostic, SourceOffset, SourceSpan};

use crate::{
    compiler::error::CompileError, lexer::error::LexerError, parser::error::ParseError,
    range::Range, render::error::RenderError,
};

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum InnerError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl InnerError {
    pub fn range(&self) -> Range {
        match self {
            InnerError::Compile(err) => err.range(),
            InnerError::Render(err) => err.range(),
        }
    }
}

impl From<ParseError> for InnerError {
    fn from(err: ParseError) -> Self {
        InnerError::Compile(CompileError::Parse(err))
    }
}

impl From<LexerError> for InnerError {
    fn from(err: LexerError) -> Self {
        InnerError::Compile(CompileError::Parse(ParseError::Lexer(err)))
    }
}

/// The flat classification of every failure a template can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidToken,
    MismatchedTemplateDelimiter,
    ParseError,
    NoItemVariableCapture,
    VariableNameNotFound,
    InvalidSubstitution,
    NotIterable,
    UnexpectedEnd,
    UnclosedLoop,
    Format,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidToken => "InvalidToken",
            ErrorKind::MismatchedTemplateDelimiter => "MismatchedTemplateDelimiter",
            ErrorKind::ParseError => "ParseError",
            ErrorKind::NoItemVariableCapture => "NoItemVariableCapture",
            ErrorKind::VariableNameNotFound => "VariableNameNotFound",
            ErrorKind::InvalidSubstitution => "InvalidSubstitution",
            ErrorKind::NotIterable => "NotIterable",
            ErrorKind::UnexpectedEnd => "UnexpectedEnd",
            ErrorKind::UnclosedLoop => "UnclosedLoop",
            ErrorKind::Format => "Format",
        };

        write!(f, "{}", name)
    }
}

/// Represents a template error with diagnostic information for the user.
#[derive(PartialEq, Debug, thiserror::Error)]
#[error("{cause}")]
pub struct Error {
    /// The underlying cause of the error.
    pub cause: InnerError,
    /// The template the error was raised for.
    pub source_code: String,
    /// The location in the template for diagnostics.
    pub location: SourceSpan,
}

impl Error {
    pub fn from_error(source_code: impl Into<String>, cause: impl Into<InnerError>) -> Self {
        let source_code = source_code.into();
        let cause = cause.into();
        let range = cause.range();

        let start = SourceOffset::from_location(
            &source_code,
            range.start.line as usize,
            range.start.column,
        );
        let end =
            SourceOffset::from_location(&source_code, range.end.line as usize, range.end.column);

        // A range at end of input points past the source; label the last char instead.
        let location = if start.offset() >= source_code.len() {
            match source_code.char_indices().last() {
                Some((offset, c)) => SourceSpan::new(offset.into(), c.len_utf8()),
                None => SourceSpan::new(0.into(), 0),
            }
        } else {
            SourceSpan::new(
                start,
                std::cmp::max(end.offset().saturating_sub(start.offset()), 1),
            )
        };

        Self {
            cause,
            source_code,
            location,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match &self.cause {
            InnerError::Compile(err) => match err {
                CompileError::Parse(err) => match err {
                    ParseError::Lexer(LexerError::InvalidToken(_, _))
                    | ParseError::InvalidToken(_, _) => ErrorKind::InvalidToken,
                    ParseError::Lexer(LexerError::MismatchedTemplateDelimiter(_))
                    | ParseError::MismatchedTemplateDelimiter(_, _) => {
                        ErrorKind::MismatchedTemplateDelimiter
                    }
                    ParseError::UnexpectedToken(_, _, _) => ErrorKind::ParseError,
                    ParseError::NoItemVariableCapture(_, _) => ErrorKind::NoItemVariableCapture,
                },
                CompileError::MismatchedTemplateDelimiter(_) => {
                    ErrorKind::MismatchedTemplateDelimiter
                }
                CompileError::UnexpectedEnd(_) => ErrorKind::UnexpectedEnd,
                CompileError::UnclosedLoop(_) => ErrorKind::UnclosedLoop,
            },
            InnerError::Render(err) => match err {
                RenderError::VariableNameNotFound(_, _) => ErrorKind::VariableNameNotFound,
                RenderError::InvalidSubstitution(_, _, _) => ErrorKind::InvalidSubstitution,
                RenderError::NotIterable(_, _, _) => ErrorKind::NotIterable,
                RenderError::Format(_, _) => ErrorKind::Format,
            },
        }
    }
}

impl Diagnostic for Error {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        let stage = match self.cause {
            InnerError::Compile(CompileError::Parse(ParseError::Lexer(_))) => "LexerError",
            InnerError::Compile(CompileError::Parse(_)) => "ParseError",
            InnerError::Compile(_) => "CompileError",
            InnerError::Render(_) => "RenderError",
        };

        Some(Box::new(format!("{}::{}", stage, self.kind())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        let msg = match &self.cause {
            InnerError::Compile(CompileError::Parse(ParseError::Lexer(
                LexerError::InvalidToken(_, _),
            ))) => Some("Directives may only contain names, numbers, `for`, `end`, `(`, `)`, `..`, `|` and `,`.".to_string()),
            InnerError::Compile(CompileError::Parse(ParseError::InvalidToken(_, _))) => {
                Some("A directive starts with a name, `for` or `end`.".to_string())
            }
            InnerError::Compile(CompileError::Parse(ParseError::UnexpectedToken(_, _, _))) => {
                Some("Check the directive syntax, e.g. `{{ for (list) |item, i| }}`.".to_string())
            }
            InnerError::Compile(CompileError::Parse(ParseError::NoItemVariableCapture(_, list))) => {
                Some(format!("Name the current element, e.g. `for ({list}) |item|`."))
            }
            InnerError::Compile(CompileError::Parse(ParseError::Lexer(
                LexerError::MismatchedTemplateDelimiter(_),
            )))
            | InnerError::Compile(CompileError::Parse(ParseError::MismatchedTemplateDelimiter(
                _,
                _,
            )))
            | InnerError::Compile(CompileError::MismatchedTemplateDelimiter(_)) => Some(
                "Every `{{` must be closed by `}}`. Check for a missing or extra brace."
                    .to_string(),
            ),
            InnerError::Compile(CompileError::UnexpectedEnd(_)) => {
                Some("Remove the `end` or add the `for` it belongs to.".to_string())
            }
            InnerError::Compile(CompileError::UnclosedLoop(_)) => {
                Some("Close the loop with `{{ end }}`.".to_string())
            }
            InnerError::Render(RenderError::VariableNameNotFound(_, name)) => Some(format!(
                "'{name}' is neither a loop variable in scope nor a field of the context."
            )),
            InnerError::Render(RenderError::InvalidSubstitution(_, name, "sequence")) => {
                Some(format!(
                    "Iterate over '{name}' with `{{{{ for ({name}) |item| }}}}` instead."
                ))
            }
            InnerError::Render(RenderError::InvalidSubstitution(_, name, type_name)) => Some(
                format!("'{name}' is a {type_name}; substitute one of its fields instead."),
            ),
            InnerError::Render(RenderError::NotIterable(_, name, _)) => {
                Some(format!("'{name}' must be a sequence to be used in `for`."))
            }
            InnerError::Render(RenderError::Format(_, _)) => None,
        };

        msg.map(|m| Box::new(m) as Box<dyn Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(
            miette::LabeledSpan::new_with_span(Some(format!("{}", self.cause)), self.location),
        )))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.source_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::Position;
    use rstest::rstest;

    fn range(line: u32, start: usize, end: usize) -> Range {
        Range::new(Position::new(line, start), Position::new(line, end))
    }

    #[rstest]
    #[case::lexer_invalid_token(
        InnerError::from(LexerError::InvalidToken(range(1, 4, 5), "#".into())),
        ErrorKind::InvalidToken
    )]
    #[case::parse_invalid_token(
        InnerError::from(ParseError::InvalidToken(range(1, 4, 5), "(".into())),
        ErrorKind::InvalidToken
    )]
    #[case::parse_unexpected_token(
        InnerError::from(ParseError::UnexpectedToken(range(1, 4, 5), "`(`", "x".into())),
        ErrorKind::ParseError
    )]
    #[case::no_item_capture(
        InnerError::from(ParseError::NoItemVariableCapture(range(1, 1, 2), "list".into())),
        ErrorKind::NoItemVariableCapture
    )]
    #[case::lexer_mismatched(
        InnerError::from(LexerError::MismatchedTemplateDelimiter(range(1, 1, 2))),
        ErrorKind::MismatchedTemplateDelimiter
    )]
    #[case::parse_mismatched(
        InnerError::from(ParseError::MismatchedTemplateDelimiter(range(1, 1, 2), "!".into())),
        ErrorKind::MismatchedTemplateDelimiter
    )]
    #[case::compile_mismatched(
        InnerError::from(CompileError::MismatchedTemplateDelimiter(range(1, 1, 2))),
        ErrorKind::MismatchedTemplateDelimiter
    )]
    #[case::unexpected_end(
        InnerError::from(CompileError::UnexpectedEnd(range(1, 1, 2))),
        ErrorKind::UnexpectedEnd
    )]
    #[case::unclosed_loop(
        InnerError::from(CompileError::UnclosedLoop(range(1, 1, 2))),
        ErrorKind::UnclosedLoop
    )]
    #[case::variable_not_found(
        InnerError::from(RenderError::VariableNameNotFound(range(1, 1, 2), "x".into())),
        ErrorKind::VariableNameNotFound
    )]
    #[case::invalid_substitution(
        InnerError::from(RenderError::InvalidSubstitution(range(1, 1, 2), "x".into(), "sequence")),
        ErrorKind::InvalidSubstitution
    )]
    #[case::unsupported_substitution(
        InnerError::from(RenderError::InvalidSubstitution(range(1, 1, 2), "x".into(), "object")),
        ErrorKind::InvalidSubstitution
    )]
    #[case::not_iterable(
        InnerError::from(RenderError::NotIterable(range(1, 1, 2), "x".into(), "string")),
        ErrorKind::NotIterable
    )]
    fn test_kind_code_and_help(#[case] cause: InnerError, #[case] expected: ErrorKind) {
        let error = Error::from_error("Hi {{ x }}!", cause);

        assert_eq!(error.kind(), expected);
        assert!(
            error
                .code()
                .map(|code| code.to_string())
                .is_some_and(|code| code.ends_with(&expected.to_string()))
        );
        assert!(error.help().is_some());
        assert_eq!(error.labels().map(|labels| labels.count()), Some(1));
    }

    #[rstest]
    #[case::first_line("Hi {{user_name}}!", range(1, 6, 15), (5, 9))]
    #[case::second_line("a\nb {{ name }}", range(2, 7, 11), (8, 4))]
    #[case::multi_byte("héllo {{x}}", range(1, 9, 10), (9, 1))]
    #[case::empty_range("abc", range(1, 2, 2), (1, 1))]
    #[case::end_of_input("Hi {{user_name", range(1, 15, 15), (13, 1))]
    #[case::end_of_input_multi_byte("{{ 名前", range(1, 6, 6), (6, 3))]
    #[case::empty_source("", range(1, 1, 1), (0, 0))]
    fn test_location(
        #[case] source: &str,
        #[case] range: Range,
        #[case] expected: (usize, usize),
    ) {
        let error = Error::from_error(
            source,
            RenderError::VariableNameNotFound(range, "name".into()),
        );

        assert_eq!(error.source_code, source);
        assert_eq!(
            (error.location.offset(), error.location.len()),
            expected
        );
    }
}
