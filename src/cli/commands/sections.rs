use crate::cli::core::{require_arg, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::preview::CHAPTERS;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "expand",
            "Expand or collapse a section of `show`",
            "expand <section> [on|off]",
            cmd_expand,
        ),
        CommandEntry::new(
            "sections",
            "List sections and whether they are expanded",
            "sections",
            cmd_sections,
        ),
    ]
}

fn cmd_expand(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "expand <section> [on|off]";
    let section = require_arg(args, 0, usage)?.to_lowercase();
    if !CHAPTERS.iter().any(|(key, _)| *key == section) {
        return Err(CommandError::InvalidArguments(format!(
            "unknown section `{}` (see `sections`)",
            section
        )));
    }

    let expansion = context.session.expansion_mut();
    let expanded = match args.get(1).map(|raw| raw.to_lowercase()) {
        None => expansion.toggle(&section),
        Some(state) => {
            let expanded = match state.as_str() {
                "on" => true,
                "off" => false,
                _ => return Err(CommandError::InvalidArguments(format!("usage: {}", usage))),
            };
            expansion.set(&section, expanded);
            expanded
        }
    };
    let label = if expanded { "expanded" } else { "collapsed" };
    io::print_success(format!("Section `{}` {}.", section, label));
    Ok(())
}

fn cmd_sections(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let expansion = context.session.expansion();
    output_section("Sections");
    for (key, heading) in CHAPTERS.iter() {
        let marker = if expansion.is_expanded(key) { "[-]" } else { "[+]" };
        io::print_info(format!("  {} {:<20} {}", marker, key, heading));
    }
    Ok(())
}
