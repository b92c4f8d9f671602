//! `help` output: commands by group, fields by wizard step.

use crate::cli::core::ShellContext;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::parse::input_hint;
use crate::cli::preview::chapter_collection;
use crate::cli::registry::{CommandEntry, CommandGroup};
use crate::core::{Collection, FieldPath, StepDefinition};
use crate::form::EntryData;
use crate::with_collection;

fn chapter_paths(chapter: &str) -> Vec<&'static str> {
    FieldPath::ALL
        .iter()
        .filter(|path| path.chapter() == chapter)
        .map(|path| path.as_str())
        .collect()
}

pub fn print_overview(context: &ShellContext) {
    for group in CommandGroup::ALL {
        let entries = context.registry.in_group(group);
        if entries.is_empty() {
            continue;
        }
        output_section(group.title());
        for entry in entries {
            io::print_info(format!("  {:<10} {}", entry.name, entry.description));
        }
    }
    print_step(context.session.wizard().current());
    io::print_info("Use `help <command|path|collection|step>` for details.");
}

/// Prints help for a command, field path, collection or wizard step.
/// Returns `false` when `topic` names none of them.
pub fn print_topic(context: &ShellContext, topic: &str) -> bool {
    let key = topic.trim().to_lowercase();
    if let Some(entry) = context.registry.get(&key) {
        print_command(context, entry);
        return true;
    }
    if let Ok(path) = key.parse::<FieldPath>() {
        print_path(context, path);
        return true;
    }
    if with_collection!(key.as_str(), C => print_collection::<C>()).is_some() {
        return true;
    }

    let plan = context.session.wizard().plan();
    let step = key
        .parse::<u8>()
        .ok()
        .and_then(|number| plan.get(number))
        .or_else(|| plan.find(&key));
    match step {
        Some(step) => {
            print_step(step);
            true
        }
        None => false,
    }
}

fn print_command(context: &ShellContext, entry: &CommandEntry) {
    output_section(format!("Help: {}", entry.name));
    io::print_info(format!("  {}", entry.description));
    io::print_info(format!("  Usage: {}", entry.usage));
    if let Some(group) = context.registry.group_of(entry.name) {
        io::print_info(format!("  Group: {}", group.title()));
    }
}

fn print_path(context: &ShellContext, path: FieldPath) {
    output_section(format!("Field: {}", path));
    io::print_info(format!("  Type: {}", path.kind()));
    io::print_info(format!("  Input: {}", input_hint(path.kind())));
    if let Some(parent) = path.parent() {
        io::print_info(format!("  Part of `{}`; set that record first.", parent));
    }
    if let Some(step) = context.session.wizard().plan().for_chapter(path.chapter()) {
        io::print_info(format!("  Step {}: {}", step.number, step.title));
        if step.required.contains(&path) {
            io::print_hint(format!("Required before leaving step {}.", step.number));
        }
    }
}

fn print_collection<C: Collection>() {
    output_section(format!("Collection: {}", C::NAME));
    io::print_info(format!(
        "  Fields: {}",
        <C::Item as EntryData>::FIELDS.join(", ")
    ));
    io::print_info(format!(
        "  Usage: entry {} add|update <id>|remove <id>|clear|list",
        C::NAME
    ));
}

fn print_step(step: &StepDefinition) {
    output_section(format!("Step {}: {}", step.number, step.title));
    if step.chapters.is_empty() {
        io::print_info("  Review the answers, then `submit` to generate the report.");
        return;
    }
    for (number, title) in step.substeps.iter().enumerate() {
        io::print_info(format!("  substep {}: {}", number + 1, title));
    }
    for chapter in step.chapters {
        io::print_info(format!("  {}", chapter_paths(chapter).join(", ")));
        if let Some(name) = chapter_collection(chapter) {
            io::print_info(format!("  entry {} ...", name));
        }
    }
    if !step.required.is_empty() {
        let required: Vec<&str> = step.required.iter().map(|path| path.as_str()).collect();
        io::print_hint(format!("Required before `next`: {}", required.join(", ")));
    }
}
