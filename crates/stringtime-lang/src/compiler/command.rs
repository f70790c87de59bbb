use smol_str::SmolStr;

use crate::range::Range;

/// An ordered, owned sequence of commands.
pub type CommandList = Vec<Command>;

/// A node of a compiled template.
///
/// Loop commands exclusively own their body, so the tree has no sharing and
/// no cycles.
#[derive(PartialEq, Debug, Clone)]
pub enum Command {
    Literal(String),
    Substitution {
        name: SmolStr,
        range: Range,
    },
    /// Runs `body` `iteration_count` times. The index counts from zero.
    ForRange {
        iteration_count: u64,
        index_name: Option<SmolStr>,
        body: CommandList,
    },
    ForEach {
        list_name: SmolStr,
        item_name: SmolStr,
        index_name: Option<SmolStr>,
        body: CommandList,
        range: Range,
    },
}

impl Command {
    pub fn body(&self) -> Option<&[Command]> {
        match self {
            Command::ForRange { body, .. } | Command::ForEach { body, .. } => Some(body),
            Command::Literal(_) | Command::Substitution { .. } => None,
        }
    }
}
