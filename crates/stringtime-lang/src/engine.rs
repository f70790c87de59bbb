use crate::{
    Context, StringtimeResult,
    compiler::{CommandList, Compiler, Options},
    error::Error,
    render::Renderer,
};

#[derive(Debug, Clone, Default)]
pub struct Engine {
    pub(crate) options: Options,
}

impl Engine {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.options.strict = strict;
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    #[allow(clippy::result_large_err)]
    pub fn compile(&self, template: &str) -> Result<CompiledTemplate, Error> {
        let commands = Compiler::new(self.options.clone())
            .compile(template)
            .map_err(|e| Error::from_error(template, e))?;

        log::debug!(
            "compiled template of {} bytes into {} top-level command(s)",
            template.len(),
            commands.len()
        );

        Ok(CompiledTemplate {
            source: template.to_string(),
            commands,
            options: self.options.clone(),
        })
    }

    #[allow(clippy::result_large_err)]
    pub fn render<C: Context + ?Sized>(
        &self,
        template: &CompiledTemplate,
        context: &C,
    ) -> StringtimeResult {
        template.render(context)
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

/// A template compiled once and rendered any number of times.
///
/// It never changes after compilation, so it can be shared between threads
/// and rendered with different contexts concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTemplate {
    source: String,
    commands: CommandList,
    options: Options,
}

impl CompiledTemplate {
    pub fn commands(&self) -> &[crate::Command] {
        &self.commands
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    #[allow(clippy::result_large_err)]
    pub fn render<C: Context + ?Sized>(&self, context: &C) -> StringtimeResult {
        let output = Renderer::new(context, self.options.strict)
            .render(&self.commands, self.source.len())
            .map_err(|e| Error::from_error(self.source.as_str(), e))?;

        log::debug!("rendered {} bytes", output.len());

        Ok(output)
    }
}
