pub mod commands;
pub mod core;
pub mod help;
pub mod io;
pub mod output;
pub mod parse;
pub mod preview;
pub mod registry;
mod shell;
pub mod shell_context;

pub use preview::PreviewGenerator;
pub use shell::{run_cli, SCRIPT_ENV};
