use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::io::{self, BufWriter, Read, Write};
use std::{fs, path::PathBuf};

use clap::Parser;
use miette::{IntoDiagnostic, miette};
use stringtime_lang::{Command, CompiledTemplate, Context, Engine, Options, SmolStr, Value};

#[derive(Parser, Debug)]
#[command(name = "stringtime")]
#[command(version)]
#[command(after_help = "Examples:\n\n\
    To render a template with a JSON context:\n\
    $ stringtime 'Hi {{name}}!' --context '{\"name\": \"stringtime\"}'\n\n\
    To render a template from stdin into a file:\n\
    $ stringtime --arg title Home -o page.html < page.tmpl\n\n\
    To show the compiled command tree:\n\
    $ echo '{{ for (0..2) |i| }}{{i}}{{ end }}' | stringtime --dump")]
#[command(
    about = "stringtime compiles text templates with {{ ... }} directives and renders them.",
    long_about = None
)]
pub struct Cli {
    #[clap(flatten)]
    input: InputArgs,

    #[clap(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,

    /// Template text. Read from stdin when omitted
    template: Option<String>,
}

#[derive(Clone, Debug, clap::Args, Default)]
struct InputArgs {
    /// JSON object used as the render context
    #[arg(short, long, value_name = "JSON")]
    context: Option<String>,

    /// Sets a string field of the context, taking precedence over --context
    #[arg(long = "arg", value_names = ["NAME", "VALUE"], num_args = 2)]
    args: Option<Vec<String>>,

    /// Reject unbalanced `end`s and loops over values that are not sequences
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(Clone, Debug, clap::Args, Default)]
struct OutputArgs {
    /// Print the compiled command tree instead of rendering
    #[arg(long, default_value_t = false)]
    dump: bool,

    /// Unbuffered output
    #[clap(long, default_value_t = false)]
    unbuffered: bool,

    /// Output to the specified file
    #[clap(short = 'o', long = "output", value_name = "FILE")]
    output_file: Option<PathBuf>,
}

/// `--arg` values layered over the `--context` JSON.
#[derive(Debug, Default)]
struct CliContext {
    args: HashMap<SmolStr, Value>,
    json: serde_json::Value,
}

impl Context for CliContext {
    fn get(&self, name: &str) -> Option<Cow<'_, Value>> {
        self.args
            .get(name)
            .map(Cow::Borrowed)
            .or_else(|| Context::get(&self.json, name))
    }
}

impl Cli {
    pub fn run(&self) -> miette::Result<()> {
        // The output file is only opened once rendering has succeeded.
        let output = self.execute(&self.read_template()?)?;

        let stdout = io::stdout();
        let mut handle: Box<dyn Write> = if let Some(output_file) = &self.output.output_file {
            let file = fs::File::create(output_file).into_diagnostic()?;
            Box::new(BufWriter::new(file))
        } else if self.output.unbuffered {
            Box::new(stdout.lock())
        } else {
            Box::new(BufWriter::new(stdout.lock()))
        };

        handle.write_all(output.as_bytes()).into_diagnostic()?;
        handle.flush().into_diagnostic()
    }

    fn execute(&self, source: &str) -> miette::Result<String> {
        let engine = Engine::new(Options {
            strict: self.input.strict,
        });
        let template = engine.compile(source).map_err(miette::Report::new)?;

        if self.output.dump {
            let mut out = String::new();
            dump(template.commands(), 0, &mut out).into_diagnostic()?;
            return Ok(out);
        }

        self.render(&engine, &template)
    }

    fn render(&self, engine: &Engine, template: &CompiledTemplate) -> miette::Result<String> {
        let context = self.build_context()?;
        log::debug!(
            "rendering with {} argument(s) and a {} JSON context",
            context.args.len(),
            if context.json.is_null() { "missing" } else { "supplied" }
        );

        engine
            .render(template, &context)
            .map_err(miette::Report::new)
    }

    fn build_context(&self) -> miette::Result<CliContext> {
        let json = match &self.input.context {
            Some(context) => {
                let json: serde_json::Value = serde_json::from_str(context).into_diagnostic()?;
                if !json.is_object() {
                    return Err(miette!("The context must be a JSON object"));
                }
                json
            }
            None => serde_json::Value::Null,
        };

        let args = self
            .input
            .args
            .iter()
            .flatten()
            .collect::<Vec<_>>()
            .chunks(2)
            .filter_map(|v| match v {
                [name, value] => Some((SmolStr::new(name), Value::from(value.as_str()))),
                _ => None,
            })
            .collect();

        Ok(CliContext { args, json })
    }

    fn read_template(&self) -> miette::Result<String> {
        match &self.template {
            Some(template) => Ok(template.clone()),
            None => {
                let mut input = String::new();
                io::stdin().read_to_string(&mut input).into_diagnostic()?;
                Ok(input)
            }
        }
    }
}

fn dump(commands: &[Command], depth: usize, out: &mut String) -> fmt::Result {
    let indent = "  ".repeat(depth);

    for command in commands {
        match command {
            Command::Literal(text) => writeln!(out, "{indent}Literal({text:?})")?,
            Command::Substitution { name, .. } => writeln!(out, "{indent}Substitution({name})")?,
            Command::ForRange {
                iteration_count,
                index_name,
                ..
            } => writeln!(
                out,
                "{indent}ForRange(count: {iteration_count}, index: {})",
                index_name.as_deref().unwrap_or("-")
            )?,
            Command::ForEach {
                list_name,
                item_name,
                index_name,
                ..
            } => writeln!(
                out,
                "{indent}ForEach(list: {list_name}, item: {item_name}, index: {})",
                index_name.as_deref().unwrap_or("-")
            )?,
        }

        if let Some(body) = command.body() {
            dump(body, depth + 1, out)?;
        }
    }

    Ok(())
}
