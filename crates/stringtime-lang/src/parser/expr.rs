use smallvec::SmallVec;

use crate::range::Range;

/// Loop variables in the order they appear between the pipes.
pub type Captures<'a> = SmallVec<[&'a str; 2]>;

/// The result of parsing one directive body.
#[derive(PartialEq, Debug, Clone)]
pub struct Expr<'a> {
    pub kind: ExprKind<'a>,
    pub range: Range,
}

#[derive(PartialEq, Debug, Clone)]
pub enum ExprKind<'a> {
    /// A possibly dotted field path, kept as the original source slice.
    FieldQualifier(&'a str),
    ForLoop {
        inner: ForExpr<'a>,
        captures: Captures<'a>,
    },
    End,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum ForExpr<'a> {
    Range { start: u64, end: u64 },
    Field(&'a str),
}
