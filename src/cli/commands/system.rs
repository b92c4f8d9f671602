use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::core::{get_field, FieldPath};
use crate::form::Form;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "help",
            "Show commands and the fields of the current step",
            "help [command|path|collection|step]",
            cmd_help,
        ),
        CommandEntry::new(
            "exit",
            "Leave the shell, asking first when answers are not exported",
            "exit",
            cmd_exit,
        ),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        Some(topic) => {
            if !help::print_topic(context, topic) {
                context.suggest_command(topic);
            }
        }
        None => help::print_overview(context),
    }
    Ok(())
}

/// Paths whose value differs from a fresh form.
fn answered_fields(form: &Form) -> usize {
    let empty = Form::new();
    FieldPath::ALL
        .iter()
        .filter(|path| get_field(form, **path).ok() != get_field(&empty, **path).ok())
        .count()
}

fn cmd_exit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.has_unexported_answers() {
        let form = context.session.form();
        let summary = format!(
            "{} answered fields and {} entries are not exported.",
            answered_fields(form),
            form.entry_count()
        );
        if !context.confirm_destructive("Exit and discard the unexported answers?")? {
            io::print_info("Exit cancelled. Use `export <file>` to keep the answers.");
            return Ok(());
        }
        io::print_warning(summary);
    }
    io::print_info(format!(
        "Leaving at {}.",
        context.session.wizard().progress_label()
    ));
    Err(CommandError::ExitRequested)
}
