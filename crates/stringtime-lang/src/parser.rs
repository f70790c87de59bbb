pub mod error;
pub mod expr;

use error::ParseError;
use expr::{Captures, Expr, ExprKind, ForExpr};
use nom::Input;

use crate::lexer::Lexer;
use crate::lexer::token::{Token, TokenKind};
use crate::range::{Range, Span};

const EOF: &str = "EOF";

/// Recursive-descent parser for a single directive body.
///
/// ```text
/// directive       := expression end_template
/// expression      := field_qualifier
///                  | 'for' '(' for_expr ')' ( '|' identifier (',' identifier)* '|' )?
///                  | 'end'
/// field_qualifier := identifier ('.' identifier)*
/// for_expr        := field_qualifier | number '..' number
/// ```
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self { lexer }
    }

    /// The input following the last consumed token, i.e. the text after `}}`
    /// once [`Parser::parse`] succeeded.
    pub fn rest(&self) -> Span<'a> {
        self.lexer.rest()
    }

    /// Parses one directive including its closing `}}`.
    ///
    /// Returns `Ok(None)` for an empty directive.
    pub fn parse(&mut self) -> Result<Option<Expr<'a>>, ParseError> {
        let Some(token) = self.lexer.next_token()? else {
            return Err(ParseError::MismatchedTemplateDelimiter(
                self.eof_range(),
                EOF.to_string(),
            ));
        };

        let expr = match token.kind {
            TokenKind::EndTemplate => return Ok(None),
            TokenKind::Ident(name) => Expr {
                kind: ExprKind::FieldQualifier(name),
                range: token.range,
            },
            TokenKind::For => self.parse_for(token)?,
            TokenKind::End => Expr {
                kind: ExprKind::End,
                range: token.range,
            },
            _ => {
                return Err(ParseError::InvalidToken(
                    token.range,
                    token.to_string(),
                ));
            }
        };

        self.parse_end_template()?;

        Ok(Some(expr))
    }

    fn parse_for(&mut self, for_token: Token<'a>) -> Result<Expr<'a>, ParseError> {
        self.expect(|kind| matches!(kind, TokenKind::LParen), "`(`")?;

        let inner = match self.lexer.next_token()? {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => ForExpr::Field(name),
            Some(Token {
                kind: TokenKind::Number(start),
                ..
            }) => {
                self.expect(|kind| matches!(kind, TokenKind::Range), "`..`")?;
                let end = match self.lexer.next_token()? {
                    Some(Token {
                        kind: TokenKind::Number(end),
                        ..
                    }) => end,
                    token => return Err(self.unexpected(token, "a number")),
                };
                ForExpr::Range { start, end }
            }
            token => return Err(self.unexpected(token, "a field name or a range")),
        };

        let close = self.expect(|kind| matches!(kind, TokenKind::RParen), "`)`")?;
        let mut range = for_token.range.to(&close.range);

        let captures = match self.lexer.peek()? {
            Some(Token {
                kind: TokenKind::Pipe,
                ..
            }) => {
                self.lexer.next_token()?;
                let (captures, close_pipe) = self.parse_captures()?;
                range = range.to(&close_pipe);
                captures
            }
            _ => Captures::new(),
        };

        if let ForExpr::Field(name) = inner {
            if captures.is_empty() {
                return Err(ParseError::NoItemVariableCapture(range, name.to_string()));
            }
        }

        Ok(Expr {
            kind: ExprKind::ForLoop { inner, captures },
            range,
        })
    }

    // Parses `ident (, ident)* |` after the opening pipe.
    fn parse_captures(&mut self) -> Result<(Captures<'a>, Range), ParseError> {
        let mut captures = Captures::new();

        loop {
            match self.lexer.next_token()? {
                Some(Token {
                    kind: TokenKind::Ident(name),
                    ..
                }) if !name.contains('.') => captures.push(name),
                token => return Err(self.unexpected(token, "a variable name")),
            }

            match self.lexer.next_token()? {
                Some(Token {
                    kind: TokenKind::Comma,
                    ..
                }) => continue,
                Some(Token {
                    kind: TokenKind::Pipe,
                    range,
                }) => return Ok((captures, range)),
                token => return Err(self.unexpected(token, "`,` or `|`")),
            }
        }
    }

    fn parse_end_template(&mut self) -> Result<(), ParseError> {
        match self.lexer.next_token()? {
            Some(Token {
                kind: TokenKind::EndTemplate,
                ..
            }) => Ok(()),
            Some(token) => Err(ParseError::MismatchedTemplateDelimiter(
                token.range,
                token.to_string(),
            )),
            None => Err(ParseError::MismatchedTemplateDelimiter(
                self.eof_range(),
                EOF.to_string(),
            )),
        }
    }

    fn expect(
        &mut self,
        expected_kind: fn(&TokenKind) -> bool,
        expected: &'static str,
    ) -> Result<Token<'a>, ParseError> {
        match self.lexer.next_token()? {
            Some(token) if expected_kind(&token.kind) => Ok(token),
            token => Err(self.unexpected(token, expected)),
        }
    }

    #[cold]
    fn unexpected(&self, token: Option<Token<'a>>, expected: &'static str) -> ParseError {
        match token {
            Some(token) => ParseError::UnexpectedToken(token.range, expected, token.to_string()),
            None => ParseError::UnexpectedToken(self.eof_range(), expected, EOF.to_string()),
        }
    }

    fn eof_range(&self) -> Range {
        self.lexer.rest().take(0).into()
    }
}
