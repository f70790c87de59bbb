//! `stringtime-lang` compiles and renders stringtime templates.
//!
//! A template is plain text with `{{ ... }}` directives. A directive either
//! substitutes a named value, opens a loop, or closes one with `end`.
//!
//! ## Examples
//!
//! ```rust
//! let template = stringtime_lang::compile("Hi {{name}}!").unwrap();
//!
//! let output = template
//!     .render(&stringtime_lang::context! { "name" => "Zig stringtime" })
//!     .unwrap();
//! assert_eq!(output, "Hi Zig stringtime!");
//!
//! // The same compiled template can be rendered with another context
//! let output = stringtime_lang::render(
//!     &template,
//!     &stringtime_lang::context! { "name" => "second context" },
//! )
//! .unwrap();
//! assert_eq!(output, "Hi second context!");
//!
//! // Loops over a range or over a sequence from the context
//! let template = stringtime_lang::compile(
//!     "{{ for (list) |item, i| }}<li>{{item}} at index {{i}}</li>\n{{ end }}",
//! )
//! .unwrap();
//! let output = template
//!     .render(&stringtime_lang::context! { "list" => vec!["First", "Second"] })
//!     .unwrap();
//! assert_eq!(output, "<li>First at index 0</li>\n<li>Second at index 1</li>\n");
//!
//! // Strict mode rejects loops that are never closed
//! let mut engine = stringtime_lang::Engine::default();
//! engine.set_strict(true);
//! let err = engine.compile("{{ for (0..2) }}unclosed").unwrap_err();
//! assert_eq!(err.kind(), stringtime_lang::ErrorKind::UnclosedLoop);
//! ```
mod compiler;
mod context;
mod engine;
mod error;
mod lexer;
mod parser;
mod range;
mod render;
mod value;

use error::InnerError;
use range::Span;

pub use compiler::{Command, CommandList, Compiler, Options};
pub use context::{Context, FromFn, from_fn};
pub use engine::{CompiledTemplate, Engine};
pub use error::{Error, ErrorKind};
pub use lexer::Lexer;
pub use lexer::token::{Token, TokenKind};
pub use parser::Parser;
pub use parser::expr::{Expr, ExprKind, ForExpr};
pub use range::{Position, Range};
pub use smol_str::SmolStr;
pub use value::Value;

pub type StringtimeResult = Result<String, Error>;

/// Compiles `template` with the default [`Options`].
#[allow(clippy::result_large_err)]
pub fn compile(template: &str) -> Result<CompiledTemplate, Error> {
    Engine::default().compile(template)
}

/// Renders a compiled template against `context`.
#[allow(clippy::result_large_err)]
pub fn render<C: Context + ?Sized>(template: &CompiledTemplate, context: &C) -> StringtimeResult {
    template.render(context)
}

/// Splits the body of a single directive into tokens, up to and including
/// its closing `}}`.
#[allow(clippy::result_large_err)]
pub fn tokenize(directive: &str) -> Result<Vec<Token<'_>>, Error> {
    let mut tokens = Vec::new();

    for token in Lexer::new(Span::new(directive)) {
        let token = token.map_err(|e| Error::from_error(directive, InnerError::from(e)))?;
        let is_end = token.kind == TokenKind::EndTemplate;
        tokens.push(token);

        if is_end {
            break;
        }
    }

    Ok(tokens)
}
