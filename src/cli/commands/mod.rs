pub mod config;
pub mod entry;
pub mod form;
pub mod sections;
pub mod submission;
pub mod system;
pub mod wizard;

use crate::cli::registry::{CommandEntry, CommandGroup, CommandRegistry};

/// Every command module with the group its commands are listed under.
pub(crate) fn all_entries() -> Vec<(CommandGroup, Vec<CommandEntry>)> {
    vec![
        (CommandGroup::Answers, form::definitions()),
        (CommandGroup::Entries, entry::definitions()),
        (CommandGroup::Navigation, wizard::definitions()),
        (CommandGroup::Sections, sections::definitions()),
        (CommandGroup::Report, submission::definitions()),
        (CommandGroup::Settings, config::definitions()),
        (CommandGroup::Shell, system::definitions()),
    ]
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for (group, entries) in all_entries() {
        for entry in entries {
            registry.register(group, entry);
        }
    }
}
