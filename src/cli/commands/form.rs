use crate::cli::commands::entry::entry_lines;
use crate::cli::core::{parse_path, require_arg, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::parse::{self, UNSET};
use crate::cli::preview::{chapter_collection, CHAPTERS};
use crate::cli::registry::CommandEntry;
use crate::core::{get_field, FieldPath, FieldValue, MAX_CHILDREN};
use crate::form::{FacetSet, Form, Suizidalitaet, Wohnsituation};
use crate::with_collection;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "show",
            "Show expanded sections, one chapter, or one field",
            "show [chapter|path]",
            cmd_show,
        ),
        CommandEntry::new(
            "set",
            "Write a field value (`-` clears optional values)",
            "set <path> <value>",
            cmd_set,
        ),
        CommandEntry::new(
            "toggle",
            "Add or remove one item of a list field",
            "toggle <path> <item>",
            cmd_toggle,
        ),
        CommandEntry::new(
            "wohnen",
            "Toggle a living situation facet",
            "wohnen <lebtAllein|mitPartner|mitKindern|beiEltern|inWG>",
            cmd_wohnen,
        ),
        CommandEntry::new(
            "suizid",
            "Toggle a suicidality facet",
            "suizid <keine|passiveTodeswuensche|gedanken|plaene|versuche>",
            cmd_suizid,
        ),
        CommandEntry::new(
            "kinder",
            "Set the number of children (`-` for not asked)",
            "kinder <count|->",
            cmd_kinder,
        ),
        CommandEntry::new(
            "kind",
            "Edit one child record",
            "kind <number> [alter=<n|->] [geschlecht=<m|w|d|->]",
            cmd_kind,
        ),
        CommandEntry::new(
            "paths",
            "List addressable fields",
            "paths [prefix]",
            cmd_paths,
        ),
    ]
}

fn field_name(path: FieldPath) -> &'static str {
    let name = path.as_str();
    name.split_once('.').map_or(name, |(_, rest)| rest)
}

fn print_chapter(form: &Form, key: &str, heading: &str) {
    output_section(heading);
    for path in FieldPath::ALL.iter().filter(|path| path.chapter() == key) {
        // Paths below an absent record are skipped.
        if let Ok(value) = get_field(form, *path) {
            io::print_info(format!("  {:<28} {}", field_name(*path), value));
        }
    }
    let lines = chapter_collection(key)
        .and_then(|name| with_collection!(name, C => entry_lines::<C>(form)))
        .unwrap_or_default();
    for line in lines {
        io::print_info(format!("  {}", line));
    }
}

fn cmd_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let form = context.session.form();
    let Some(target) = args.first() else {
        let expansion = context.session.expansion();
        let mut collapsed = Vec::new();
        for (key, heading) in CHAPTERS.iter() {
            if expansion.is_expanded(key) {
                print_chapter(form, key, heading);
            } else {
                collapsed.push(*key);
            }
        }
        if !collapsed.is_empty() {
            io::print_hint(format!(
                "Collapsed: {} (use `expand <section>`)",
                collapsed.join(", ")
            ));
        }
        return Ok(());
    };

    if let Some((key, heading)) = CHAPTERS
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(target))
    {
        print_chapter(form, key, heading);
        return Ok(());
    }

    let path = parse_path(target)?;
    let value = get_field(form, path)?;
    io::print_info(format!("{} = {}", path, value));
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = require_arg(args, 0, "set <path> <value>")?;
    let path = parse_path(raw)?;
    let value = parse::parse_value(path, &args[1..])?;
    let store = context.session.store_mut();
    store.set_field(path, value)?;
    io::print_success(format!("{} = {}", path, store.get_field(path)?));
    Ok(())
}

fn cmd_toggle(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = require_arg(args, 0, "toggle <path> <item>")?;
    require_arg(args, 1, "toggle <path> <item>")?;
    let path = parse_path(raw)?;
    let item = args[1..].join(" ");
    let store = context.session.store_mut();
    store.toggle(path, item.trim())?;
    io::print_success(format!("{} = {}", path, store.get_field(path)?));
    Ok(())
}

fn unknown_facet<S: FacetSet>(raw: &str) -> CommandError {
    CommandError::InvalidArguments(format!(
        "unknown facet `{}` (expected one of: {})",
        raw,
        S::facet_keys().join(", ")
    ))
}

fn cmd_wohnen(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = require_arg(args, 0, "wohnen <facet>")?;
    let facet = Wohnsituation::parse_facet(raw).ok_or_else(|| unknown_facet::<Wohnsituation>(raw))?;
    let store = context.session.store_mut();
    store.toggle_living(facet);
    let value = store.get_field(FieldPath::Wohnsituation)?;
    io::print_success(format!("{} = {}", FieldPath::Wohnsituation, value));
    Ok(())
}

fn cmd_suizid(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = require_arg(args, 0, "suizid <facet>")?;
    let facet = Suizidalitaet::parse_facet(raw).ok_or_else(|| unknown_facet::<Suizidalitaet>(raw))?;
    let store = context.session.store_mut();
    store.toggle_suicidality(facet);
    let value = store.get_field(FieldPath::Suizidalitaet)?;
    io::print_success(format!("{} = {}", FieldPath::Suizidalitaet, value));
    Ok(())
}

fn cmd_kinder(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = require_arg(args, 0, "kinder <count|->")?;
    let store = context.session.store_mut();
    if raw.trim() == UNSET {
        store.set_field(FieldPath::Kinder, FieldValue::Children(None))?;
    } else {
        let count = raw.trim().parse::<u8>().map_err(|_| {
            CommandError::InvalidArguments(format!(
                "expected a child count between 0 and {}, got `{}`",
                MAX_CHILDREN, raw
            ))
        })?;
        store.set_children_count(usize::from(count))?;
    }
    io::print_success(format!(
        "{} = {}",
        FieldPath::Kinder,
        store.get_field(FieldPath::Kinder)?
    ));
    Ok(())
}

fn cmd_kind(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "kind <number> [alter=<n|->] [geschlecht=<m|w|d|->]";
    let raw = require_arg(args, 0, usage)?;
    let number = raw
        .parse::<usize>()
        .ok()
        .filter(|number| *number > 0)
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))?;
    let patch = parse::child_patch(&args[1..])?;
    let store = context.session.store_mut();
    if !store.update_child(number - 1, patch) {
        return Err(CommandError::InvalidArguments(format!(
            "no child #{} (set the count with `kinder <n>`)",
            number
        )));
    }
    io::print_success(format!(
        "{} = {}",
        FieldPath::Kinder,
        store.get_field(FieldPath::Kinder)?
    ));
    Ok(())
}

fn cmd_paths(_context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let prefix = args.first().copied().unwrap_or_default().to_lowercase();
    output_section("Addressable fields");
    for path in FieldPath::ALL
        .iter()
        .filter(|path| path.as_str().starts_with(&prefix))
    {
        io::print_info(format!("  {:<40} {}", path.as_str(), path.kind()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::core::{process_script, CommandError};
    use crate::errors::FormError;
    use crate::form::{Geschlecht, Kind};

    #[test]
    fn children_resize_and_edit() {
        let mut context = process_script(&[
            "kinder 3",
            "kind 1 alter=7 geschlecht=w",
            "kinder 1",
        ])
        .unwrap();
        assert_eq!(
            context.session.form().familie.kinder,
            Some(vec![Kind {
                alter: Some(7),
                geschlecht: Some(Geschlecht::Weiblich),
            }])
        );
        assert!(context.process_line("kind 2 alter=3").is_err());
        context.process_line("kinder -").unwrap();
        assert_eq!(context.session.form().familie.kinder, None);
    }

    #[test]
    fn oversized_child_counts_leave_the_form_alone() {
        let mut context = process_script(&["kinder 2"]).unwrap();
        let err = context
            .process_line("kinder 18446744073709551615")
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));
        let err = context.process_line("kinder 200").unwrap_err();
        assert!(matches!(err, CommandError::Form(FormError::InvalidValue { .. })));
        assert_eq!(
            context.session.form().familie.kinder.as_ref().map(Vec::len),
            Some(2)
        );
    }

    #[test]
    fn blank_record_fields_are_refused() {
        let mut context = process_script(&[
            r#"set beruf.arbeitslosigkeit '{"dauer": "4 Monate", "leistungsbezug": false}'"#,
        ])
        .unwrap();
        let err = context
            .process_line(r#"set beruf.arbeitslosigkeit '{"dauer": " ", "leistungsbezug": true}'"#)
            .unwrap_err();
        assert!(matches!(err, CommandError::Form(FormError::InvalidValue { .. })));
        let dauer = context
            .session
            .form()
            .beruf
            .arbeitslosigkeit
            .as_ref()
            .map(|record| record.dauer.clone());
        assert_eq!(dauer.as_deref(), Some("4 Monate"));
    }

    #[test]
    fn living_facets_respect_exclusivity() {
        let context = process_script(&["wohnen mitPartner", "wohnen lebtAllein"]).unwrap();
        let living = context.session.form().familie.wohnsituation.clone().unwrap();
        assert!(living.lebt_allein);
        assert!(!living.mit_partner);
    }

    #[test]
    fn toggle_requires_a_list_field() {
        let mut context = process_script(&["toggle befund.affekt gedrückt"]).unwrap();
        assert_eq!(context.session.form().befund.affekt, vec!["gedrückt"]);
        let err = context
            .process_line("toggle stammdaten.alter 3")
            .unwrap_err();
        assert!(matches!(err, CommandError::Form(FormError::NotAToggleSet { .. })));
    }

    #[test]
    fn nested_write_into_absent_record_fails() {
        let mut context = process_script(&[]).unwrap();
        let err = context
            .process_line("set beruf.arbeitslosigkeit.dauer 6 Monate")
            .unwrap_err();
        assert!(matches!(err, CommandError::Form(FormError::AbsentBranch { .. })));
    }
}
