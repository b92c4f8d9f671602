//! Core CLI loop, dispatch, and shell context helpers.

use std::io;

use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;

use crate::{
    config::ConfigManager,
    core::{FieldPath, IntakeSession},
    errors::{ConfigError, FormError},
};

use super::commands;
use super::shell::parse_command_line;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Largest edit distance for which a command or path suggestion is shown.
const SUGGESTION_DISTANCE: usize = 3;

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        Self::with_config_manager(mode, config_manager)
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config = config_manager.load()?;
        cli_io::apply_config(&config);

        Ok(ShellContext {
            mode,
            registry,
            session: IntakeSession::new(&config),
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            last_command: None,
            running: true,
            exported_revision: None,
        })
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn prompt(&self) -> String {
        let wizard = self.session.wizard();
        let step = wizard.current();
        let marker = if self.session.submission().is_loading() {
            " …"
        } else {
            ""
        };
        match wizard.substep() {
            Some(substep) => format!(
                "intake [{}/{} {}.{}]{}> ",
                step.number,
                wizard.plan().len(),
                step.key,
                substep,
                marker
            ),
            None => format!(
                "intake [{}/{} {}]{}> ",
                step.number,
                wizard.plan().len(),
                step.key,
                marker
            ),
        }
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    /// Asks before a destructive action. Script mode and a disabled
    /// `confirm_destructive` setting always proceed.
    pub(crate) fn confirm_destructive(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script || !self.config.confirm_destructive {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    /// Tokenizes and runs one shell line. Quoting errors are reported as
    /// warnings and the shell carries on.
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };

        self.last_command = Some(line.trim().to_string());
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        let control = self.dispatch(&raw.to_lowercase(), raw, &args)?;
        if control == LoopControl::Exit {
            self.running = false;
        }
        Ok(control)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= SUGGESTION_DISTANCE {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        let (prompt, default) = if self.has_unexported_answers() {
            ("Exit and discard the unexported answers?", false)
        } else {
            ("Exit shell?", true)
        };
        Ok(cli_io::confirm_action(&self.theme, prompt, default)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Form(FormError::UnresolvablePath { path, suggestion }) => {
                self.print_error(&format!("Unresolvable path `{}`.", path));
                match suggestion {
                    Some(candidate) => self.print_hint(&format!("Did you mean `{}`?", candidate)),
                    None => self.print_hint("Use `paths` to list every addressable field."),
                }
                Ok(())
            }
            CommandError::Io(err) => Err(CliError::Io(err)),
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        cli_io::print_hint(message);
    }
}

/// Resolves a path argument, reporting unknown names with a suggestion.
pub(crate) fn parse_path(raw: &str) -> Result<FieldPath, CommandError> {
    Ok(raw.parse::<FieldPath>()?)
}

pub(crate) fn require_arg<'a>(
    args: &[&'a str],
    index: usize,
    usage: &str,
) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Line editor failed: {0}")]
    Readline(#[from] ReadlineError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Command failed: {0}")]
    Command(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Io(err) => CliError::Io(err),
            CommandError::Config(err) => CliError::Config(err),
            other => CliError::Command(other.to_string()),
        }
    }
}

/// Keeps the config directories of in-process scripts alive for the test run.
#[cfg(test)]
static SCRIPT_DIRS: once_cell::sync::Lazy<std::sync::Mutex<Vec<tempfile::TempDir>>> =
    once_cell::sync::Lazy::new(|| std::sync::Mutex::new(Vec::new()));

#[cfg(test)]
pub(crate) fn process_script(lines: &[&str]) -> Result<ShellContext, CliError> {
    let base = tempfile::tempdir()?;
    let manager = ConfigManager::with_base_dir(base.path().to_path_buf())?;
    if let Ok(mut dirs) = SCRIPT_DIRS.lock() {
        dirs.push(base);
    }
    let mut app = ShellContext::with_config_manager(CliMode::Script, manager)?;
    for line in lines {
        match app.process_line(line)? {
            LoopControl::Continue => {}
            LoopControl::Exit => break,
        }
    }
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DisorderModel, Medications, NavigationOutcome};
    use crate::form::{Faktorart, Geschlecht};

    #[test]
    fn parse_line_handles_quotes() {
        let tokens =
            crate::cli::shell::parse_command_line("set symptomatik.anlass \"Trennung 2023\"")
                .unwrap();
        assert_eq!(tokens, vec!["set", "symptomatik.anlass", "Trennung 2023"]);
    }

    #[test]
    fn script_fills_identification_and_advances() {
        let mut context = process_script(&[
            "set stammdaten.geschlecht w",
            "set stammdaten.alter 41",
            "set stammdaten.chiffre K-41",
            "set stammdaten.datum 2024-06-01",
            "next",
        ])
        .unwrap();
        let form = context.session.form();
        assert_eq!(form.stammdaten.geschlecht, Some(Geschlecht::Weiblich));
        assert_eq!(form.stammdaten.alter, Some(41));
        assert_eq!(context.session.wizard().step(), 2);
        assert_eq!(context.session.next(), NavigationOutcome::Advanced(3));
    }

    #[test]
    fn blocked_step_stays_put() {
        let context = process_script(&["set stammdaten.alter 30", "next"]).unwrap();
        assert_eq!(context.session.wizard().step(), 1);
    }

    #[test]
    fn unknown_path_is_reported_not_fatal() {
        let mut context = process_script(&[]).unwrap();
        let err = context
            .process_line("set stammdaten.alterr 30")
            .unwrap_err();
        assert!(matches!(
            err,
            CommandError::Form(FormError::UnresolvablePath { .. })
        ));
        assert!(context.report_error(err).is_ok());
    }

    #[test]
    fn entry_commands_edit_collections() {
        let mut context = process_script(&[
            "entry medikation add praeparat=Sertralin dosierung=\"50 mg\"",
            "entry stoerungsmodell add kategorie=auslösend beschreibung=Jobverlust",
        ])
        .unwrap();
        let store = context.session.store_mut();
        let id = {
            let medications = store.collection::<Medications>();
            assert_eq!(medications.len(), 1);
            assert_eq!(medications.entries()[0].data.dosierung, "50 mg");
            medications.entries()[0].id
        };
        assert_eq!(
            store.collection::<DisorderModel>().entries()[0].data.kategorie,
            Faktorart::Ausloesend
        );

        let line = format!("entry medikation update {} dosierung=\"100 mg\"", id.short());
        context.process_line(&line).unwrap();
        let medications = context.session.store_mut().collection::<Medications>();
        assert_eq!(medications.entries()[0].data.dosierung, "100 mg");
    }

    #[test]
    fn exit_stops_the_script() {
        let context = process_script(&["exit", "set stammdaten.alter 30"]).unwrap();
        assert_eq!(context.session.form().stammdaten.alter, None);
    }
}
