use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::config::CONFIG_KEYS;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change shell preferences",
        "config [show|set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    CONFIG_KEYS.join("|")
                )));
            }
            let key = args[1];
            let value = args[2..].join(" ");
            set_config_value(context, key, value.trim())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config subcommand `{}`",
            other
        ))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    let config = &context.config;
    output_section("Configuration");
    io::print_info(format!("  {:<22} {}", "locale", config.locale));
    io::print_info(format!(
        "  {:<22} {}",
        "expanded_sections",
        config.expanded_sections.join(", ")
    ));
    io::print_info(format!(
        "  {:<22} {}",
        "confirm_destructive", config.confirm_destructive
    ));
    io::print_info(format!(
        "  {:<22} {}",
        "screen_reader_mode", config.screen_reader_mode
    ));
    io::print_info(format!("  File: {}", context.config_manager.path().display()));
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let mut next = context.config.clone();
    next.set(key, value).map_err(CommandError::InvalidArguments)?;
    context.config = next;
    context.persist_config()?;
    io::apply_config(&context.config);
    io::print_success(format!("`{}` updated.", key));
    if key == "expanded_sections" {
        io::print_hint("New defaults apply to the next session.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::core::{process_script, CommandError};

    #[test]
    fn settings_are_saved_to_disk() {
        let mut context = process_script(&["config set confirm_destructive off"]).unwrap();
        assert!(!context.config.confirm_destructive);
        let saved = context.config_manager.load().unwrap();
        assert!(!saved.confirm_destructive);

        let err = context.process_line("config set theme dark").unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));
    }
}
