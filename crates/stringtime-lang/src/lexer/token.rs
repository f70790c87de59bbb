use std::fmt::{self, Display, Formatter};

use crate::range::Range;

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Token<'a> {
    pub range: Range,
    pub kind: TokenKind<'a>,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum TokenKind<'a> {
    Comma,
    End,
    EndTemplate,
    For,
    Ident(&'a str),
    LParen,
    Number(u64),
    Pipe,
    RParen,
    Range,
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.kind)
    }
}

impl Display for TokenKind<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match &self {
            TokenKind::Comma => write!(f, ","),
            TokenKind::End => write!(f, "end"),
            TokenKind::EndTemplate => write!(f, "}}}}"),
            TokenKind::For => write!(f, "for"),
            TokenKind::Ident(ident) => write!(f, "{}", ident),
            TokenKind::LParen => write!(f, "("),
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::Pipe => write!(f, "|"),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Range => write!(f, ".."),
        }
    }
}
