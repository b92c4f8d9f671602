use std::{
    fmt,
    io::{self, BufRead, Lines},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::core::{CliError, CliMode, LoopControl, ShellContext};
use crate::cli::output::info as output_info;
use crate::core::collections::COLLECTION_NAMES;
use crate::core::FieldPath;

/// Set to any value to read commands from stdin instead of a line editor.
pub const SCRIPT_ENV: &str = "INTAKE_CORE_CLI_SCRIPT";

/// Commands whose first argument is a field path.
const PATH_COMMANDS: [&str; 4] = ["set", "toggle", "show", "paths"];

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => {
            let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
            editor.set_helper(Some(CommandHelper::new(context.command_names())));
            editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
            output_info("Intake shell. Type `help` for commands, `status` for the current step.");
            drive(&mut context, &mut EditorSource { editor })
        }
        CliMode::Script => {
            let lines = io::stdin().lock().lines();
            drive(&mut context, &mut ScriptSource { lines })
        }
    }
}

/// Where shell lines come from.
trait LineSource {
    /// Next command line, or `None` when the session should end.
    fn next_line(&mut self, context: &ShellContext) -> Result<Option<String>, CliError>;
}

fn drive(context: &mut ShellContext, source: &mut dyn LineSource) -> Result<(), CliError> {
    while context.running {
        let Some(line) = source.next_line(context)? else {
            break;
        };
        match context.process_line(&line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

struct EditorSource {
    editor: Editor<CommandHelper, DefaultHistory>,
}

impl LineSource for EditorSource {
    fn next_line(&mut self, context: &ShellContext) -> Result<Option<String>, CliError> {
        loop {
            match self.editor.readline(&context.prompt()) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    self.editor.add_history_entry(line).ok();
                    return Ok(Some(line.to_string()));
                }
                Err(ReadlineError::Interrupted) => {
                    if context.confirm_exit()? {
                        return Ok(None);
                    }
                }
                Err(ReadlineError::Eof) => {
                    output_info("Exiting shell.");
                    return Ok(None);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// One command per line. Blank lines and `#` comments are skipped.
struct ScriptSource<R> {
    lines: Lines<R>,
}

impl<R: BufRead> LineSource for ScriptSource<R> {
    fn next_line(&mut self, _context: &ShellContext) -> Result<Option<String>, CliError> {
        for line in self.lines.by_ref() {
            let line = line?;
            let trimmed = line.trim();
            if !trimmed.is_empty() && !trimmed.starts_with('#') {
                return Ok(Some(trimmed.to_string()));
            }
        }
        Ok(None)
    }
}

/// Completes and hints command names, then field paths or collection names
/// for the commands that take them.
struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }

    fn argument_candidates(&self, command: &str) -> Vec<&'static str> {
        if PATH_COMMANDS.contains(&command) {
            FieldPath::ALL.iter().map(|path| path.as_str()).collect()
        } else if matches!(command, "entry" | "help") {
            COLLECTION_NAMES.to_vec()
        } else {
            Vec::new()
        }
    }

    /// Start of the word under the cursor and the names it can expand to.
    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let needle = prefix[start..].to_ascii_lowercase();
        let words: Vec<&str> = prefix.split_whitespace().collect();

        if start == 0 {
            let names = self
                .commands
                .iter()
                .filter(|name| name.starts_with(&needle))
                .cloned()
                .collect();
            return (start, names);
        }

        let finished = words.len() - usize::from(!needle.is_empty());
        if finished != 1 {
            return (start, Vec::new());
        }
        let names = self
            .argument_candidates(&words[0].to_ascii_lowercase())
            .into_iter()
            .filter(|candidate| candidate.starts_with(&needle))
            .map(str::to_string)
            .collect();
        (start, names)
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, names) = self.candidates(line, pos);
        let pairs = names
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    /// Rest of the only name matching the word at the end of the line.
    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let (start, names) = self.candidates(line, pos);
        let typed = pos - start;
        match names.as_slice() {
            [only] if typed > 0 => only
                .get(typed..)
                .filter(|rest| !rest.is_empty())
                .map(str::to_string),
            _ => None,
        }
    }
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
