use crate::cli::core::{require_arg, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::core::{FieldPath, NavigationOutcome, SubmissionState};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "status",
            "Show the current step, open requirements and submission state",
            "status",
            cmd_status,
        ),
        CommandEntry::new(
            "next",
            "Advance to the next step once its required fields are filled",
            "next",
            cmd_next,
        ),
        CommandEntry::new("back", "Go back one step", "back", cmd_back),
        CommandEntry::new(
            "goto",
            "Jump back to an earlier step",
            "goto <number|key>",
            cmd_goto,
        ),
        CommandEntry::new(
            "substep",
            "Move within the substeps of the current step",
            "substep <number|next|prev>",
            cmd_substep,
        ),
    ]
}

fn list_paths(paths: &[FieldPath]) -> String {
    paths
        .iter()
        .map(|path| path.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_position(context: &ShellContext) {
    io::print_info(context.session.wizard().progress_label());
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let session = &context.session;
    let wizard = session.wizard();
    output_section("Status");
    io::print_info(format!("  {}", wizard.progress_label()));

    let missing = wizard.missing_requirements(session.form());
    if missing.is_empty() {
        io::print_info("  Required fields: complete");
    } else {
        io::print_info(format!("  Required fields missing: {}", list_paths(&missing)));
    }
    io::print_info(format!("  Entries: {}", session.form().entry_count()));
    io::print_info(format!("  Revision: {}", session.store().revision()));

    let submission = match session.submission().state() {
        SubmissionState::Idle => "idle".to_string(),
        SubmissionState::Loading { ticket } => format!("loading ({})", ticket),
        SubmissionState::Success(_) => "report ready (`result`)".to_string(),
        SubmissionState::Error(message) => format!("failed: {}", message),
    };
    io::print_info(format!("  Submission: {}", submission));
    Ok(())
}

fn cmd_next(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.session.next() {
        NavigationOutcome::Advanced(_) => print_position(context),
        NavigationOutcome::Blocked(missing) => {
            io::print_warning(format!(
                "Step incomplete. Missing: {}",
                list_paths(&missing)
            ));
        }
        NavigationOutcome::AtReview => {
            io::print_info("Already at the review step. Use `submit` to generate the report.");
        }
    }
    Ok(())
}

fn cmd_back(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.session.wizard_mut().previous() {
        print_position(context);
    } else {
        io::print_info("Already at the first step.");
    }
    Ok(())
}

fn cmd_goto(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = require_arg(args, 0, "goto <number|key>")?;
    let step = match raw.parse::<u8>() {
        Ok(number) => number,
        Err(_) => context
            .session
            .wizard()
            .plan()
            .find(&raw.to_lowercase())
            .map(|step| step.number)
            .ok_or_else(|| CommandError::InvalidArguments(format!("unknown step `{}`", raw)))?,
    };

    if context.session.wizard_mut().go_to(step)? {
        print_position(context);
    } else {
        io::print_warning(format!(
            "Step {} lies ahead. Use `next` to move forward.",
            step
        ));
    }
    Ok(())
}

fn cmd_substep(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = require_arg(args, 0, "substep <number|next|prev>")?;
    let wizard = context.session.wizard_mut();
    let moved = match raw.to_lowercase().as_str() {
        "next" => wizard.next_substep(),
        "prev" | "previous" => wizard.previous_substep(),
        other => {
            let substep = other.parse::<u8>().map_err(|_| {
                CommandError::InvalidArguments("usage: substep <number|next|prev>".into())
            })?;
            let step = wizard.step();
            wizard.set_substep(step, substep)?;
            true
        }
    };
    if moved {
        print_position(context);
    } else {
        io::print_info("No further substep in that direction.");
    }
    Ok(())
}
