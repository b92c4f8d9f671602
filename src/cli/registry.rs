use std::collections::HashMap;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Heading under which a command is listed by `help`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandGroup {
    Answers,
    Entries,
    Navigation,
    Sections,
    Report,
    Settings,
    Shell,
}

impl CommandGroup {
    pub const ALL: [CommandGroup; 7] = [
        CommandGroup::Answers,
        CommandGroup::Entries,
        CommandGroup::Navigation,
        CommandGroup::Sections,
        CommandGroup::Report,
        CommandGroup::Settings,
        CommandGroup::Shell,
    ];

    pub fn title(self) -> &'static str {
        match self {
            CommandGroup::Answers => "Answers",
            CommandGroup::Entries => "Collections",
            CommandGroup::Navigation => "Wizard",
            CommandGroup::Sections => "Sections",
            CommandGroup::Report => "Report",
            CommandGroup::Settings => "Settings",
            CommandGroup::Shell => "Shell",
        }
    }
}

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

/// Shell commands keyed by lower-case name, remembered per group in
/// registration order.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, (CommandGroup, CommandEntry)>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry` under `group`. A later entry with the same name replaces
    /// the handler but keeps the original position.
    pub fn register(&mut self, group: CommandGroup, entry: CommandEntry) {
        let name = entry.name;
        if self.commands.insert(name, (group, entry)).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.commands.get(name).map(|(_, entry)| entry)
    }

    pub fn group_of(&self, name: &str) -> Option<CommandGroup> {
        self.commands.get(name).map(|(group, _)| *group)
    }

    /// Commands of `group` in registration order.
    pub fn in_group(&self, group: CommandGroup) -> Vec<&CommandEntry> {
        self.order
            .iter()
            .filter_map(|name| self.commands.get(name))
            .filter(|(owner, _)| *owner == group)
            .map(|(_, entry)| entry)
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }
}
