use std::io;

use thiserror::Error;

use crate::core::path::ValueKind;

/// Programmer-facing failures of the form engine.
///
/// None of these is recovered inside the engine: a path that does not
/// resolve or a value of the wrong shape must surface to the caller instead of
/// silently dropping the write.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Unresolvable path `{path}`{}", suggestion_hint(.suggestion))]
    UnresolvablePath {
        path: String,
        suggestion: Option<String>,
    },
    #[error("Path `{path}` lies below a record that is not present")]
    AbsentBranch { path: String },
    #[error("Path `{path}` expects a {expected} value, got {found}")]
    KindMismatch {
        path: String,
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("Path `{path}` is not a toggle-set")]
    NotAToggleSet { path: String },
    #[error("Invalid value for `{path}`: {message}")]
    InvalidValue { path: String, message: String },
    #[error("Step {0} does not exist")]
    InvalidStep(u8),
    #[error("Step {step} has no substep {substep}")]
    InvalidSubstep { step: u8, substep: u8 },
    #[error("Collection `{collection}` has no field `{field}`")]
    UnknownEntryField {
        collection: &'static str,
        field: String,
    },
    #[error("Invalid value for `{collection}.{field}`: {message}")]
    InvalidEntryValue {
        collection: &'static str,
        field: String,
        message: String,
    },
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(candidate) => format!(" (did you mean `{}`?)", candidate),
        None => String::new(),
    }
}

/// Failures reported by a [`ReportGenerator`](crate::core::submission::ReportGenerator).
///
/// The submission lifecycle shows the display text verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("Report service unavailable: {0}")]
    Unavailable(String),
    #[error("Report request rejected: {0}")]
    Rejected(String),
    #[error("Malformed report response: {0}")]
    Malformed(String),
}

/// Failures while loading or saving the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err.to_string())
    }
}
