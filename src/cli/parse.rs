//! Turns shell arguments into typed values for the form engine.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use crate::cli::core::CommandError;
use crate::core::{FieldPath, FieldValue, ValueKind};
use crate::errors::FormError;
use crate::form::{AssignError, EntryData, Geschlecht, KindPatch};

/// Token that clears an optional value.
pub const UNSET: &str = "-";

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];

fn invalid(path: FieldPath, message: impl Into<String>) -> CommandError {
    CommandError::InvalidArguments(format!("`{}`: {}", path, message.into()))
}

pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "ja" | "j" | "yes" | "true" | "on" | "1" => Some(true),
        "nein" | "n" | "no" | "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw.trim(), format).ok())
}

fn optional<T>(
    raw: &str,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Result<Option<T>, String> {
    if raw.trim() == UNSET {
        Ok(None)
    } else {
        parse(raw).map(Some)
    }
}

fn json<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_str(raw).map_err(|err| format!("expected JSON ({})", err))
}

/// Parses the value for `path` from the remaining shell arguments.
///
/// Records and facet sets are given as JSON objects; lists are comma
/// separated; `-` clears optional values.
pub fn parse_value(path: FieldPath, args: &[&str]) -> Result<FieldValue, CommandError> {
    let raw = args.join(" ");
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(invalid(path, format!("missing {} value", path.kind())));
    }

    let value = match path.kind() {
        ValueKind::Flag => parse_flag(raw)
            .map(FieldValue::Flag)
            .ok_or_else(|| format!("expected ja/nein, got `{}`", raw)),
        ValueKind::Text => Ok(FieldValue::Text(raw.to_string())),
        ValueKind::OptionalText => {
            optional(raw, |text| Ok(text.to_string())).map(FieldValue::OptionalText)
        }
        ValueKind::Number => optional(raw, |text| {
            text.parse::<u32>()
                .map_err(|_| format!("expected a whole number, got `{}`", text))
        })
        .map(FieldValue::Number),
        ValueKind::Date => optional(raw, |text| {
            parse_date(text).ok_or_else(|| format!("invalid date `{}` (use YYYY-MM-DD)", text))
        })
        .map(FieldValue::Date),
        ValueKind::Gender => optional(raw, |text| text.parse::<Geschlecht>()).map(FieldValue::Gender),
        ValueKind::List => Ok(FieldValue::List(if raw == UNSET {
            Vec::new()
        } else {
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })),
        ValueKind::Unemployment => optional(raw, json).map(FieldValue::Unemployment),
        ValueKind::Doctorate => optional(raw, json).map(FieldValue::Doctorate),
        ValueKind::Living => optional(raw, json).map(FieldValue::Living),
        ValueKind::Children => optional(raw, json).map(FieldValue::Children),
        ValueKind::Suicidality => optional(raw, json).map(FieldValue::Suicidality),
    };
    value.map_err(|message| invalid(path, message))
}

/// How `set` expects a value of `kind` to be written.
pub(crate) fn input_hint(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Flag => "ja | nein",
        ValueKind::Text => "text, not blank",
        ValueKind::OptionalText => "text, or - to clear",
        ValueKind::Number => "whole number, or -",
        ValueKind::Date => "YYYY-MM-DD or DD.MM.YYYY, or -",
        ValueKind::Gender => "m | w | d, or -",
        ValueKind::List => "comma separated values, or `toggle <path> <value>`",
        ValueKind::Unemployment => r#"{"dauer": "...", "leistungsbezug": true}, or -"#,
        ValueKind::Doctorate => r#"{"fach": "...", "status": "..."}, or -"#,
        ValueKind::Living => "`wohnen <facet>`, or a JSON object",
        ValueKind::Children => "`kinder <count|->` and `kind <number> ...`",
        ValueKind::Suicidality => "`suizid <facet>`, or a JSON object",
    }
}

/// Splits `key=value` arguments.
pub fn split_assignments<'a>(args: &[&'a str]) -> Result<Vec<(&'a str, &'a str)>, CommandError> {
    args.iter()
        .map(|arg| {
            arg.split_once('=').ok_or_else(|| {
                CommandError::InvalidArguments(format!("expected key=value, got `{}`", arg))
            })
        })
        .collect()
}

/// Builds an entry patch from `key=value` arguments.
pub fn entry_patch<T: EntryData>(
    collection: &'static str,
    args: &[&str],
) -> Result<T::Patch, CommandError> {
    let pairs = split_assignments(args)?;
    T::patch_from_pairs(pairs).map_err(|err| {
        let err = match err {
            AssignError::UnknownField(field) => FormError::UnknownEntryField { collection, field },
            AssignError::InvalidValue { field, message } => FormError::InvalidEntryValue {
                collection,
                field,
                message,
            },
        };
        CommandError::Form(err)
    })
}

/// Builds a child patch from `alter=` / `geschlecht=` assignments.
pub fn child_patch(args: &[&str]) -> Result<KindPatch, CommandError> {
    let mut patch = KindPatch::default();
    for (key, value) in split_assignments(args)? {
        match key {
            "alter" => {
                let age = optional(value, |text| {
                    text.parse::<u32>()
                        .map_err(|_| format!("expected a whole number, got `{}`", text))
                })
                .map_err(CommandError::InvalidArguments)?;
                patch.alter = Some(age);
            }
            "geschlecht" => {
                let gender = optional(value, |text| text.parse::<Geschlecht>())
                    .map_err(CommandError::InvalidArguments)?;
                patch.geschlecht = Some(gender);
            }
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown child field `{}` (alter, geschlecht)",
                    other
                )))
            }
        }
    }
    Ok(patch)
}
