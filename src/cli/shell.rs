use std::io::{self, BufRead};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::errors::CliError;

use super::commands::{CommandError, LoopControl};
use super::output;
use super::shell_context::{CliMode, ShellContext};

const SCRIPT_ENV: &str = "PROFIT_LEDGER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => {
            output::info("Profit Ledger. Type `help` for commands.");
            output::block(&context.dashboard_text());
            let mut editor = EditorInput::new(&context)?;
            drive(&mut context, &mut editor)
        }
        CliMode::Script => drive(&mut context, &mut ReaderInput(io::stdin().lock())),
    }
}

enum Input {
    Line(String),
    Interrupt,
    End,
}

/// Where shell lines come from: the line editor or a plain reader.
trait LineSource {
    fn next_input(&mut self, prompt: &str) -> Result<Input, CliError>;
}

struct EditorInput(Editor<CommandHelper, DefaultHistory>);

impl EditorInput {
    fn new(context: &ShellContext) -> Result<Self, CliError> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(CommandHelper::new(context.command_names())));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
        Ok(Self(editor))
    }
}

impl LineSource for EditorInput {
    fn next_input(&mut self, prompt: &str) -> Result<Input, CliError> {
        match self.0.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.0.add_history_entry(line.trim()).ok();
                }
                Ok(Input::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupt),
            Err(ReadlineError::Eof) => Ok(Input::End),
            Err(err) => Err(err.into()),
        }
    }
}

struct ReaderInput<R>(R);

impl<R: BufRead> LineSource for ReaderInput<R> {
    fn next_input(&mut self, _prompt: &str) -> Result<Input, CliError> {
        let mut line = String::new();
        if self.0.read_line(&mut line)? == 0 {
            return Ok(Input::End);
        }
        Ok(Input::Line(line))
    }
}

fn drive(context: &mut ShellContext, source: &mut dyn LineSource) -> Result<(), CliError> {
    while context.running {
        match source.next_input(&context.prompt())? {
            Input::Line(line) => match handle_line(context, &line) {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Exit) => context.running = false,
                Err(err) => context.report_error(err),
            },
            Input::Interrupt => {
                if context.confirm_exit().unwrap_or(true) {
                    context.running = false;
                }
            }
            Input::End => {
                if context.mode == CliMode::Interactive {
                    output::info("Exiting shell.");
                }
                context.running = false;
            }
        }
    }
    Ok(())
}

/// Runs one shell line. Blank lines and `#` comments do nothing.
fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = shell_words::split(line)
        .map_err(|err| CommandError::Usage(format!("could not read `{}`: {}", line.trim(), err)))?;
    let Some((head, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    if head.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    tracing::debug!(command = %head, "dispatching");
    context.dispatch(&head.to_lowercase(), &args)
}

/// Tab completion for the command word.
struct CommandHelper {
    names: Vec<&'static str>,
}

impl CommandHelper {
    fn new(mut names: Vec<&'static str>) -> Self {
        names.sort_unstable();
        Self { names }
    }
}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let typed = line[..pos].trim_start();
        if typed.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let needle = typed.to_ascii_lowercase();
        let candidates = self
            .names
            .iter()
            .filter(|name| name.starts_with(needle.as_str()))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();
        Ok((pos - typed.len(), candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}

impl Helper for CommandHelper {}
