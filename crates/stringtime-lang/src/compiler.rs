//! Template compiler for stringtime.
//!
//! The compiler scans a template once, alternating between literal text and
//! `{{ ... }}` directives. Each directive is handed to the [`crate::parser`]
//! and the resulting expression is folded into a tree of [`Command`]s.
//!
//! ## Design
//!
//! Loop bodies are built bottom-up. Opening a `for` pushes a scope that
//! collects commands; the matching `end` pops it and appends the finished
//! loop command to the enclosing scope. Nothing holds a reference into a list
//! that is still growing.
//!
//! ## Example
//!
//! ```rust
//! use stringtime_lang::Command;
//!
//! let template = stringtime_lang::compile("Hi {{name}}!").unwrap();
//! assert!(matches!(template.commands(), [
//!     Command::Literal(_),
//!     Command::Substitution { .. },
//!     Command::Literal(_),
//! ]));
//! ```

mod command;
mod compile;
pub(crate) mod error;
mod scope;
#[cfg(test)]
mod test_compiler;

pub use command::{Command, CommandList};
pub use compile::{Compiler, Options};
