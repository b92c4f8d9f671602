use std::fs;
use std::path::PathBuf;

use futures::executor::block_on;

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::preview::PreviewGenerator;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "submit",
            "Generate the report from the current answers (review step only)",
            "submit",
            cmd_submit,
        ),
        CommandEntry::new(
            "result",
            "Show the last generated report",
            "result",
            cmd_result,
        ),
        CommandEntry::new(
            "export",
            "Write the answers as JSON to a file or stdout",
            "export [file]",
            cmd_export,
        ),
        CommandEntry::new(
            "reset",
            "Discard all answers and start over",
            "reset",
            cmd_reset,
        ),
    ]
}

fn cmd_submit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.session.wizard().is_review() {
        io::print_warning("Reports are generated from the review step. Finish the wizard first.");
        return Ok(());
    }
    if !block_on(context.session.submit(&PreviewGenerator)) {
        io::print_warning("A submission is already in progress.");
        return Ok(());
    }

    let submission = context.session.submission();
    if let Some(message) = submission.error() {
        io::print_error(format!("Report generation failed: {}", message));
        io::print_hint("Fix the answers and run `submit` again.");
    } else if submission.result().is_some() {
        io::print_success("Report generated. Use `result` to read it.");
    }
    Ok(())
}

fn cmd_result(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let submission = context.session.submission();
    let Some(text) = submission.result() else {
        match submission.error() {
            Some(message) => io::print_warning(format!("Last submission failed: {}", message)),
            None => io::print_info("No report yet. Use `submit` at the review step."),
        }
        return Ok(());
    };

    for section in &text.structure.content {
        output_section(&section.heading);
        for paragraph in &section.paragraphs {
            io::print_info(format!("  {}", paragraph));
        }
    }
    if let Some(at) = text.highlight_timestamp {
        output_section(format!("Hinweise ({})", at.format("%d.%m.%Y %H:%M UTC")));
        for sentence in &text.highlighted_sentences {
            io::print_warning(sentence);
        }
    }
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let json = context.session.form().to_json()?;
    match args.first() {
        Some(target) => {
            let path = PathBuf::from(*target);
            fs::write(&path, json)?;
            context.mark_exported();
            io::print_success(format!("Answers written to {}", path.display()));
        }
        None => io::print_info(json),
    }
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.confirm_destructive("Discard all answers and start over?")? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    context.session.reset();
    io::print_success("Session reset.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::core::process_script;
    use crate::form::Form;

    fn identified(chiffre: &str) -> Vec<String> {
        vec![
            "set stammdaten.geschlecht m".to_string(),
            "set stammdaten.alter 35".to_string(),
            "set stammdaten.datum 2024-06-01".to_string(),
            format!("set stammdaten.chiffre {}", chiffre),
        ]
    }

    #[test]
    fn submit_is_limited_to_the_review_step() {
        let lines = identified("C-1");
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut context = process_script(&lines).unwrap();
        context.process_line("submit").unwrap();
        assert!(context.session.submission().result().is_none());

        for _ in 0..7 {
            context.process_line("next").unwrap();
        }
        assert!(context.session.wizard().is_review());
        context.process_line("submit").unwrap();
        assert!(context.session.submission().result().is_some());
    }

    #[test]
    fn failed_submission_can_be_retried() {
        let lines = identified("C-2");
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut context = process_script(&lines).unwrap();
        for _ in 0..7 {
            context.process_line("next").unwrap();
        }
        context.process_line("set stammdaten.chiffre -").unwrap();
        context.process_line("submit").unwrap();
        assert!(context.session.submission().error().is_some());

        context.process_line("set stammdaten.chiffre C-2").unwrap();
        context.process_line("submit").unwrap();
        assert!(context.session.submission().error().is_none());
        assert!(context.session.submission().result().is_some());
    }

    #[test]
    fn export_writes_the_form_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("intake.json");
        let mut context = process_script(&["set symptomatik.anlass Trennung"]).unwrap();
        context
            .process_line(&format!("export {}", target.display()))
            .unwrap();
        let form = Form::from_json(&std::fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(form.symptomatik.anlass.as_deref(), Some("Trennung"));
    }
}
