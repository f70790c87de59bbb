use std::borrow::Cow;

use crate::Value;

/// Loop-local bindings of one iteration.
///
/// Frames are linked to the frame of the enclosing loop and live on the
/// stack of the renderer, so a lookup walks from the innermost loop outwards.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ExecutionContext<'a> {
    parent: Option<&'a ExecutionContext<'a>>,
    pub(crate) list_name: Option<&'a str>,
    index_name: Option<&'a str>,
    item_name: Option<&'a str>,
    index: u64,
    item: Option<&'a Value>,
}

impl<'a> ExecutionContext<'a> {
    pub(crate) fn range(
        parent: Option<&'a ExecutionContext<'a>>,
        index_name: Option<&'a str>,
        index: u64,
    ) -> Self {
        Self {
            parent,
            index_name,
            index,
            ..Default::default()
        }
    }

    pub(crate) fn each(
        parent: Option<&'a ExecutionContext<'a>>,
        list_name: &'a str,
        item_name: &'a str,
        index_name: Option<&'a str>,
        index: u64,
        item: &'a Value,
    ) -> Self {
        Self {
            parent,
            list_name: Some(list_name),
            index_name,
            item_name: Some(item_name),
            index,
            item: Some(item),
        }
    }

    /// Resolves `name` against this frame, then against the enclosing ones.
    pub(crate) fn resolve(&self, name: &str) -> Option<Cow<'a, Value>> {
        if self.index_name == Some(name) {
            return Some(Cow::Owned(Value::from(self.index)));
        }

        if self.item_name == Some(name) {
            return self.item.map(Cow::Borrowed);
        }

        self.parent.and_then(|parent| parent.resolve(name))
    }
}
