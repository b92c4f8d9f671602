use crate::cli::core::{require_arg, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::parse;
use crate::cli::registry::CommandEntry;
use crate::core::collections::{entries, Collection, COLLECTION_NAMES};
use crate::form::{EntryData, EntryId, Form};
use crate::with_collection;

const USAGE: &str = "entry <collection> <add|update|remove|clear|list> [id] [field=value...]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "entry",
        "Manage medication, drug use, prior treatment, SORKC and model entries",
        USAGE,
        cmd_entry,
    )]
}

/// Listing lines of one collection, `[short-id] summary`.
pub(crate) fn entry_lines<C: Collection>(form: &Form) -> Vec<String> {
    entries::<C>(form)
        .iter()
        .map(|entry| format!("[{}] {}", entry.id.short(), entry.data.summary()))
        .collect()
}

fn cmd_entry(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = require_arg(args, 0, USAGE)?.to_lowercase();
    let action = args.get(1).copied().unwrap_or("list").to_lowercase();
    let rest = args.get(2..).unwrap_or_default();

    with_collection!(name.as_str(), C => dispatch_entry_action::<C>(context, &action, rest))
        .unwrap_or_else(|| {
            Err(CommandError::InvalidArguments(format!(
                "unknown collection `{}` (expected one of: {})",
                name,
                COLLECTION_NAMES.join(", ")
            )))
        })
}

fn dispatch_entry_action<C: Collection>(
    context: &mut ShellContext,
    action: &str,
    args: &[&str],
) -> CommandResult {
    match action {
        "add" => handle_add::<C>(context, args),
        "update" => handle_update::<C>(context, args),
        "remove" => handle_remove::<C>(context, args),
        "clear" => handle_clear::<C>(context),
        "list" => handle_list::<C>(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown entry subcommand `{}`",
            other
        ))),
    }
}

fn resolve<C: Collection>(context: &mut ShellContext, needle: &str) -> Result<EntryId, CommandError> {
    context
        .session
        .store_mut()
        .collection::<C>()
        .resolve(needle)
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "no single {} entry matches `{}`",
                C::NAME,
                needle
            ))
        })
}

fn handle_add<C: Collection>(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let patch = parse::entry_patch::<C::Item>(C::NAME, args)?;
    let mut item = C::Item::default();
    item.merge(patch);
    let summary = item.summary();
    let id = context.session.store_mut().collection::<C>().add(item);
    io::print_success(format!("Added {} entry [{}]: {}", C::NAME, id.short(), summary));
    Ok(())
}

fn handle_update<C: Collection>(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = format!("entry {} update <id> field=value...", C::NAME);
    let needle = require_arg(args, 0, &usage)?;
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(format!("usage: {}", usage)));
    }
    let patch = parse::entry_patch::<C::Item>(C::NAME, &args[1..])?;
    let id = resolve::<C>(context, needle)?;
    let mut handler = context.session.store_mut().collection::<C>();
    if handler.update(id, patch) {
        let summary = handler
            .get(id)
            .map(|entry| entry.data.summary())
            .unwrap_or_default();
        io::print_success(format!("Updated [{}]: {}", id.short(), summary));
    } else {
        io::print_warning(format!("Entry [{}] no longer exists.", id.short()));
    }
    Ok(())
}

fn handle_remove<C: Collection>(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = format!("entry {} remove <id>", C::NAME);
    let needle = require_arg(args, 0, &usage)?;
    let id = resolve::<C>(context, needle)?;
    if context.session.store_mut().collection::<C>().remove(id) {
        io::print_success(format!("Removed [{}].", id.short()));
    }
    Ok(())
}

fn handle_clear<C: Collection>(context: &mut ShellContext) -> CommandResult {
    let count = context.session.store_mut().collection::<C>().len();
    let prompt = format!("Remove all {} {} entries and reset the section?", count, C::NAME);
    if !context.confirm_destructive(&prompt)? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    context.session.store_mut().collection::<C>().clear();
    io::print_success(format!("Cleared {}.", C::NAME));
    Ok(())
}

fn handle_list<C: Collection>(context: &mut ShellContext) -> CommandResult {
    output_section(format!("Entries: {}", C::NAME));
    let lines = entry_lines::<C>(context.session.form());
    if lines.is_empty() {
        io::print_info("  (keine Einträge)");
    }
    for line in lines {
        io::print_info(format!("  {}", line));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::core::{process_script, CommandError};
    use crate::core::{Medications, PriorTreatments};
    use crate::errors::FormError;

    #[test]
    fn remove_and_clear_by_short_id() {
        let mut context = process_script(&[
            "entry vorbehandlungen add art=ambulant zeitraum=2019",
            "entry vorbehandlungen add art=stationär zeitraum=2021",
        ])
        .unwrap();
        let first = context.session.store_mut().collection::<PriorTreatments>().entries()[0].id;

        context
            .process_line(&format!("entry vorbehandlungen remove {}", first.short()))
            .unwrap();
        assert_eq!(
            context.session.store_mut().collection::<PriorTreatments>().len(),
            1
        );

        context.process_line("entry vorbehandlungen clear").unwrap();
        assert!(context
            .session
            .store_mut()
            .collection::<PriorTreatments>()
            .is_empty());
    }

    #[test]
    fn unknown_field_and_collection_are_reported() {
        let mut context = process_script(&[]).unwrap();
        let err = context
            .process_line("entry medikation add wirkstoff=Lithium")
            .unwrap_err();
        assert!(matches!(
            err,
            CommandError::Form(FormError::UnknownEntryField { collection: "medikation", .. })
        ));
        assert!(context.process_line("entry medis add").is_err());
        assert!(context
            .session
            .store_mut()
            .collection::<Medications>()
            .is_empty());
    }

    #[test]
    fn unknown_id_is_an_argument_error() {
        let mut context = process_script(&["entry medikation add praeparat=Lithium"]).unwrap();
        let err = context
            .process_line("entry medikation update ffffffff dosierung=1")
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));
    }
}
