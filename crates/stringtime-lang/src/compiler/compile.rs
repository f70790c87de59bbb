//! Scanning of template text and folding of parsed directives.

use nom::Input;
use smol_str::SmolStr;

use super::command::{Command, CommandList};
use super::error::CompileError;
use super::scope::{LoopHeader, ScopeStack};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::parser::error::ParseError;
use crate::parser::expr::{Expr, ExprKind, ForExpr};
use crate::range::Span;

const OPEN_DELIMITER: &str = "{{";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Reject an `end` without an open loop and loops that are never closed.
    /// Also makes `for (list)` fail when `list` is missing or not a sequence.
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Literal,
    InsideDirective,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Open,
    Close,
}

#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: Options,
}

impl Compiler {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// Compiles `template` into a command tree.
    ///
    /// The whole compile fails on the first error; no partial tree is returned.
    /// Empty literal spans (between adjacent directives, or at either end of
    /// the template) produce no `Command::Literal`.
    pub fn compile(&self, template: &str) -> Result<CommandList, CompileError> {
        let mut scopes = ScopeStack::default();
        let mut state = State::Literal;
        let mut input = Span::new(template);

        loop {
            match state {
                State::Literal => {
                    let (literal_len, delimiter) = scan_literal(input.fragment());
                    let literal = &input.fragment()[..literal_len];

                    if !literal.is_empty() {
                        scopes.push(Command::Literal(literal.to_string()));
                    }

                    match delimiter {
                        Some(Delimiter::Open) => {
                            input = input.take_from(literal_len + OPEN_DELIMITER.len());
                            state = State::InsideDirective;
                        }
                        Some(Delimiter::Close) => {
                            let close = input.take_from(literal_len).take(2);
                            return Err(CompileError::MismatchedTemplateDelimiter(close.into()));
                        }
                        None => break,
                    }
                }
                State::InsideDirective => {
                    let mut parser = Parser::new(Lexer::new(input));
                    let expr = parser.parse()?;
                    input = parser.rest();

                    if let Some(expr) = expr {
                        self.fold(&mut scopes, expr)?;
                    }

                    state = State::Literal;
                }
            }
        }

        if self.options.strict {
            if let Some(header) = scopes.innermost() {
                return Err(CompileError::UnclosedLoop(header.range()));
            }
        }

        if scopes.depth() > 0 {
            log::debug!("closing {} unterminated loop(s) at end of template", scopes.depth());
        }

        Ok(scopes.finish())
    }

    fn fold(&self, scopes: &mut ScopeStack, expr: Expr) -> Result<(), CompileError> {
        log::trace!("directive at {:?}: {:?}", expr.range.start, expr.kind);

        match expr.kind {
            ExprKind::FieldQualifier(name) => scopes.push(Command::Substitution {
                name: SmolStr::new(name),
                range: expr.range,
            }),
            ExprKind::ForLoop {
                inner: ForExpr::Range { start, end },
                captures,
            } => scopes.open(LoopHeader::Range {
                iteration_count: end.saturating_sub(start),
                index_name: captures.first().map(SmolStr::new),
                range: expr.range,
            }),
            ExprKind::ForLoop {
                inner: ForExpr::Field(list_name),
                captures,
            } => {
                let Some(item_name) = captures.first() else {
                    return Err(ParseError::NoItemVariableCapture(
                        expr.range,
                        list_name.to_string(),
                    )
                    .into());
                };

                scopes.open(LoopHeader::Each {
                    list_name: SmolStr::new(list_name),
                    item_name: SmolStr::new(item_name),
                    index_name: captures.get(1).map(SmolStr::new),
                    range: expr.range,
                })
            }
            ExprKind::End => {
                if scopes.close().is_none() {
                    if self.options.strict {
                        return Err(CompileError::UnexpectedEnd(expr.range));
                    }
                    log::debug!("ignoring `end` without an open loop at {:?}", expr.range.start);
                }
            }
        }

        Ok(())
    }
}

/// Returns the length of the literal text before the first `{{` or `}}`,
/// and which of the two ended it.
fn scan_literal(text: &str) -> (usize, Option<Delimiter>) {
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match (c, chars.peek()) {
            ('{', Some((_, '{'))) => return (i, Some(Delimiter::Open)),
            ('}', Some((_, '}'))) => return (i, Some(Delimiter::Close)),
            _ => {}
        }
    }

    (text.len(), None)
}
