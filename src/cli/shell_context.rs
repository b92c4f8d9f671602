use dialoguer::theme::ColorfulTheme;

use crate::{
    config::{Config, ConfigManager},
    core::IntakeSession,
    form::Form,
};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub session: IntakeSession,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub last_command: Option<String>,
    pub running: bool,
    /// Form revision written by the last `export`.
    pub exported_revision: Option<u64>,
}

impl ShellContext {
    /// Answers exist that no `export` has written yet.
    pub fn has_unexported_answers(&self) -> bool {
        let store = self.session.store();
        store.form() != &Form::new() && self.exported_revision != Some(store.revision())
    }

    pub(crate) fn mark_exported(&mut self) {
        self.exported_revision = Some(self.session.store().revision());
    }
}
