use smol_str::SmolStr;

use super::command::{Command, CommandList};
use crate::range::Range;

/// A loop whose `end` has not been seen yet.
#[derive(Debug)]
pub(super) enum LoopHeader {
    Range {
        iteration_count: u64,
        index_name: Option<SmolStr>,
        range: Range,
    },
    Each {
        list_name: SmolStr,
        item_name: SmolStr,
        index_name: Option<SmolStr>,
        range: Range,
    },
}

impl LoopHeader {
    pub(super) fn range(&self) -> Range {
        match self {
            LoopHeader::Range { range, .. } | LoopHeader::Each { range, .. } => *range,
        }
    }

    fn into_command(self, body: CommandList) -> Command {
        match self {
            LoopHeader::Range {
                iteration_count,
                index_name,
                ..
            } => Command::ForRange {
                iteration_count,
                index_name,
                body,
            },
            LoopHeader::Each {
                list_name,
                item_name,
                index_name,
                range,
            } => Command::ForEach {
                list_name,
                item_name,
                index_name,
                body,
                range,
            },
        }
    }
}

/// The open-scope stack of the compiler.
///
/// The template root is kept apart from the open loops, so there is always a
/// list to append to.
#[derive(Debug, Default)]
pub(super) struct ScopeStack {
    root: CommandList,
    open: Vec<(LoopHeader, CommandList)>,
}

impl ScopeStack {
    pub(super) fn depth(&self) -> usize {
        self.open.len()
    }

    #[inline(always)]
    pub(super) fn push(&mut self, command: Command) {
        match self.open.last_mut() {
            Some((_, body)) => body.push(command),
            None => self.root.push(command),
        }
    }

    pub(super) fn open(&mut self, header: LoopHeader) {
        self.open.push((header, CommandList::new()));
    }

    /// Folds the innermost open loop into its parent. Returns the header of
    /// the closed loop, or `None` when no loop is open.
    pub(super) fn close(&mut self) -> Option<Range> {
        let (header, body) = self.open.pop()?;
        let range = header.range();
        self.push(header.into_command(body));
        Some(range)
    }

    /// The innermost loop that is still open.
    pub(super) fn innermost(&self) -> Option<&LoopHeader> {
        self.open.last().map(|(header, _)| header)
    }

    /// Closes every open loop and returns the root list.
    pub(super) fn finish(mut self) -> CommandList {
        while self.close().is_some() {}
        self.root
    }
}
