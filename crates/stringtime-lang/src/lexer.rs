pub mod error;
pub mod token;

use error::LexerError;
use nom::{
    IResult, Input, Parser,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{alpha1, alphanumeric1, char, digit1},
    combinator::{map, map_res, recognize},
    multi::many0,
    sequence::pair,
};
use token::{Token, TokenKind};

use crate::range::{Range, Span};

const KEYWORD_FOR: &str = "for";
const KEYWORD_END: &str = "end";

macro_rules! define_token_parser {
    ($name:ident, $tag:expr, $kind:expr) => {
        fn $name(input: Span) -> IResult<Span, Token> {
            map(tag($tag), |span: Span| Token {
                range: span.into(),
                kind: $kind,
            })
            .parse(input)
        }
    };
}

/// Produces the tokens of a directive body one at a time.
///
/// The lexer never buffers tokens. Lookahead works by scanning from a copy of
/// the cursor, which leaves the original position untouched.
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'a> {
    input: Span<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: Span<'a>) -> Self {
        Self { input }
    }

    /// The input that has not been consumed yet.
    pub fn rest(&self) -> Span<'a> {
        self.input
    }

    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, LexerError> {
        self.input = skip_whitespace(self.input);

        if self.input.fragment().is_empty() {
            return Ok(None);
        }

        match token(self.input) {
            Ok((rest, token)) => {
                self.input = rest;
                Ok(Some(token))
            }
            Err(_) => Err(self.unexpected_char()),
        }
    }

    #[inline(always)]
    pub fn peek(&self) -> Result<Option<Token<'a>>, LexerError> {
        self.peek_nth(0)
    }

    /// Returns the `n`-th upcoming token (zero based) without consuming input.
    pub fn peek_nth(&self, n: usize) -> Result<Option<Token<'a>>, LexerError> {
        let mut lookahead = *self;

        for _ in 0..n {
            if lookahead.next_token()?.is_none() {
                return Ok(None);
            }
        }

        lookahead.next_token()
    }

    #[cold]
    fn unexpected_char(&self) -> LexerError {
        let fragment = *self.input.fragment();
        let Some(c) = fragment.chars().next() else {
            return LexerError::InvalidToken(self.input.into(), String::new());
        };

        // Digits only get here when the run does not fit in a u64.
        if c.is_ascii_digit() {
            let len = fragment
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(fragment.len());
            return LexerError::InvalidToken(
                self.input.take(len).into(),
                fragment[..len].to_string(),
            );
        }

        let range: Range = self.input.take(c.len_utf8()).into();

        match c {
            '}' => LexerError::MismatchedTemplateDelimiter(range),
            _ => LexerError::InvalidToken(range, c.to_string()),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

fn skip_whitespace(input: Span) -> Span {
    let skipped: IResult<Span, Span> = take_while(|c: char| c.is_ascii_whitespace()).parse(input);
    skipped.map(|(rest, _)| rest).unwrap_or(input)
}

define_token_parser!(l_paren, "(", TokenKind::LParen);
define_token_parser!(r_paren, ")", TokenKind::RParen);
define_token_parser!(pipe, "|", TokenKind::Pipe);
define_token_parser!(comma, ",", TokenKind::Comma);
define_token_parser!(range, "..", TokenKind::Range);
define_token_parser!(end_template, "}}", TokenKind::EndTemplate);

fn punctuations(input: Span) -> IResult<Span, Token> {
    alt((l_paren, r_paren, pipe, comma, range, end_template)).parse(input)
}

fn number_literal(input: Span) -> IResult<Span, Token> {
    map_res(digit1, |span: Span| {
        span.fragment().parse::<u64>().map(|n| Token {
            range: span.into(),
            kind: TokenKind::Number(n),
        })
    })
    .parse(input)
}

fn ident_start(input: Span) -> IResult<Span, Span> {
    alt((alpha1, tag("_"))).parse(input)
}

// `a.b.c` and `posts.0.title` are single identifiers; `..` is never absorbed.
fn ident(input: Span) -> IResult<Span, Token> {
    let (rest, span) = recognize(pair(
        ident_start,
        many0(alt((
            alphanumeric1,
            tag("_"),
            recognize(pair(char('.'), alt((alphanumeric1, tag("_"))))),
        ))),
    ))
    .parse(input)?;

    let kind = match *span.fragment() {
        KEYWORD_FOR => TokenKind::For,
        KEYWORD_END => TokenKind::End,
        name => TokenKind::Ident(name),
    };

    Ok((
        rest,
        Token {
            range: span.into(),
            kind,
        },
    ))
}

fn token(input: Span) -> IResult<Span, Token> {
    alt((punctuations, number_literal, ident)).parse(input)
}
