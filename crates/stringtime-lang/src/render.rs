pub(crate) mod env;
pub(crate) mod error;

use std::borrow::Cow;
use std::fmt::Write;

use env::ExecutionContext;
use error::RenderError;
use smol_str::SmolStr;

use crate::compiler::Command;
use crate::range::Range;
use crate::{Context, Value};

/// Walks a compiled command tree and writes the output for one context.
pub(crate) struct Renderer<'c, C: Context + ?Sized> {
    context: &'c C,
    strict: bool,
}

impl<'c, C: Context + ?Sized> Renderer<'c, C> {
    pub(crate) fn new(context: &'c C, strict: bool) -> Self {
        Self { context, strict }
    }

    pub(crate) fn render(
        &self,
        commands: &[Command],
        size_hint: usize,
    ) -> Result<String, RenderError> {
        let mut out = String::with_capacity(size_hint);
        self.render_commands(commands, None, &mut out)?;
        Ok(out)
    }

    fn render_commands(
        &self,
        commands: &[Command],
        frame: Option<&ExecutionContext>,
        out: &mut String,
    ) -> Result<(), RenderError> {
        for command in commands {
            match command {
                Command::Literal(text) => out.push_str(text),
                Command::Substitution { name, range } => {
                    self.render_substitution(name, *range, frame, out)?
                }
                Command::ForRange {
                    iteration_count,
                    index_name,
                    body,
                } => {
                    for index in 0..*iteration_count {
                        let frame = ExecutionContext::range(frame, index_name.as_deref(), index);
                        self.render_commands(body, Some(&frame), out)?;
                    }
                }
                Command::ForEach {
                    list_name,
                    item_name,
                    index_name,
                    body,
                    range,
                } => {
                    let Some(list) = self.resolve_list(list_name, *range, frame)? else {
                        continue;
                    };

                    for (index, item) in list.iter().enumerate() {
                        let frame = ExecutionContext::each(
                            frame,
                            list_name,
                            item_name,
                            index_name.as_deref(),
                            index as u64,
                            item,
                        );
                        log::trace!("iteration {} of {:?}", index, frame.list_name);
                        self.render_commands(body, Some(&frame), out)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn render_substitution(
        &self,
        name: &SmolStr,
        range: Range,
        frame: Option<&ExecutionContext>,
        out: &mut String,
    ) -> Result<(), RenderError> {
        let value = self
            .lookup(name, frame)
            .ok_or_else(|| RenderError::VariableNameNotFound(range, name.clone()))?;

        match value.as_ref() {
            Value::String(s) => out.push_str(s),
            Value::Sequence(_) | Value::Unsupported(_) => {
                return Err(RenderError::InvalidSubstitution(
                    range,
                    name.clone(),
                    value.type_name(),
                ));
            }
            value => write!(out, "{}", value)
                .map_err(|_| RenderError::Format(range, name.clone()))?,
        }

        Ok(())
    }

    // Resolves the subject of a `for (list)` loop. `Ok(None)` skips the loop.
    fn resolve_list<'s>(
        &'s self,
        list_name: &SmolStr,
        range: Range,
        frame: Option<&'s ExecutionContext<'s>>,
    ) -> Result<Option<Cow<'s, [Value]>>, RenderError> {
        let value = match self.lookup(list_name, frame) {
            Some(value) => value,
            None if self.strict => {
                return Err(RenderError::VariableNameNotFound(range, list_name.clone()));
            }
            None => {
                log::debug!("`{}` is not defined, skipping loop", list_name);
                return Ok(None);
            }
        };

        match value {
            Cow::Borrowed(Value::Sequence(values)) => Ok(Some(Cow::Borrowed(values.as_slice()))),
            Cow::Owned(Value::Sequence(values)) => Ok(Some(Cow::Owned(values))),
            value if self.strict => Err(RenderError::NotIterable(
                range,
                list_name.clone(),
                value.type_name(),
            )),
            value => {
                log::debug!(
                    "`{}` is a {}, not a sequence, skipping loop",
                    list_name,
                    value.type_name()
                );
                Ok(None)
            }
        }
    }

    /// Loop bindings shadow context fields of the same name.
    #[inline(always)]
    fn lookup<'s>(
        &'s self,
        name: &str,
        frame: Option<&'s ExecutionContext<'s>>,
    ) -> Option<Cow<'s, Value>> {
        frame
            .and_then(|frame| frame.resolve(name))
            .or_else(|| self.context.get(name))
    }
}
