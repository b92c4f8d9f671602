//! Offline report generator used by the shell.

use async_trait::async_trait;
use chrono::Utc;

use crate::core::collections::{entries, Collection};
use crate::core::submission::{GeneratedText, ReportGenerator, ReportSection, ReportStructure};
use crate::core::{get_field, FieldPath};
use crate::errors::ReportError;
use crate::form::{EntryData, FacetSet, Form};

/// Chapter keys and headings, in report order.
pub(crate) const CHAPTERS: [(&str, &str); 12] = [
    ("stammdaten", "Stammdaten"),
    ("symptomatik", "Symptomatik"),
    ("beruf", "Beruf"),
    ("bildung", "Bildung"),
    ("familie", "Familie und Wohnsituation"),
    ("medikation", "Medikation"),
    ("drogenkonsum", "Drogenkonsum"),
    ("befund", "Psychischer Befund"),
    ("vorbehandlungen", "Vorbehandlungen"),
    ("verhaltensanalyse", "Verhaltensanalyse"),
    ("stoerungsmodell", "Störungsmodell"),
    ("diagnostik", "Diagnostik"),
];

/// Builds a deterministic outline of every answered field.
///
/// The request is rejected without a patient code, so the shell can exercise
/// the failure path without a backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewGenerator;

#[async_trait]
impl ReportGenerator for PreviewGenerator {
    async fn generate(&self, form: &Form) -> Result<GeneratedText, ReportError> {
        let code = form
            .stammdaten
            .chiffre
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        if code.is_empty() {
            return Err(ReportError::Rejected(
                "patient code (stammdaten.chiffre) is missing".into(),
            ));
        }
        Ok(render(form))
    }
}

/// Collection stored in `chapter`, if it holds one.
pub(crate) fn chapter_collection(chapter: &str) -> Option<&'static str> {
    match chapter {
        "medikation" => Some("medikation"),
        "drogenkonsum" => Some("drogenkonsum"),
        "vorbehandlungen" => Some("vorbehandlungen"),
        "verhaltensanalyse" => Some("sorkc"),
        "stoerungsmodell" => Some("stoerungsmodell"),
        _ => None,
    }
}

fn collection_lines<C: Collection>(form: &Form) -> Vec<String> {
    entries::<C>(form)
        .iter()
        .map(|entry| format!("{}: {}", C::NAME, entry.data.summary()))
        .collect()
}

fn chapter_paragraphs(form: &Form, chapter: &str) -> Vec<String> {
    let mut paragraphs: Vec<String> = FieldPath::ALL
        .iter()
        .filter(|path| path.chapter() == chapter)
        .filter_map(|path| {
            let value = get_field(form, *path).ok()?;
            if value.is_blank() {
                return None;
            }
            let name = path.as_str().trim_start_matches(chapter).trim_start_matches('.');
            Some(format!("{}: {}", name, value))
        })
        .collect();

    if let Some(lines) = chapter_collection(chapter)
        .and_then(|name| crate::with_collection!(name, C => collection_lines::<C>(form)))
    {
        paragraphs.extend(lines);
    }
    paragraphs
}

/// Sentences that need the reviewer's attention.
fn highlights(form: &Form) -> Vec<String> {
    let Some(findings) = form.befund.suizidalitaet.as_ref() else {
        return Vec::new();
    };
    if findings.keine || !findings.any_set() {
        return Vec::new();
    }
    vec![format!(
        "Suizidalität: {}.",
        findings.active_keys().join(", ")
    )]
}

fn render(form: &Form) -> GeneratedText {
    let content: Vec<ReportSection> = CHAPTERS
        .iter()
        .filter_map(|(key, heading)| {
            let paragraphs = chapter_paragraphs(form, key);
            if paragraphs.is_empty() {
                None
            } else {
                Some(ReportSection {
                    heading: heading.to_string(),
                    paragraphs,
                })
            }
        })
        .collect();

    let text = content
        .iter()
        .map(|section| format!("{}\n{}", section.heading, section.paragraphs.join("\n")))
        .collect::<Vec<_>>()
        .join("\n\n");
    let highlighted_sentences = highlights(form);
    let highlight_timestamp = if highlighted_sentences.is_empty() {
        None
    } else {
        Some(Utc::now())
    };

    GeneratedText {
        structure: ReportStructure { content },
        text,
        highlighted_sentences,
        highlight_timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collections::{add, Medications};
    use crate::core::toggle::toggle_suicidality;
    use crate::core::{set_field, FieldValue};
    use crate::form::{Medikament, SuizidFacet};
    use futures::executor::block_on;
    use insta::assert_snapshot;

    fn coded() -> Form {
        set_field(
            &Form::new(),
            FieldPath::Chiffre,
            FieldValue::OptionalText(Some("A-12".into())),
        )
        .unwrap()
    }

    #[test]
    fn missing_code_is_rejected() {
        let err = block_on(PreviewGenerator.generate(&Form::new())).unwrap_err();
        assert!(matches!(err, ReportError::Rejected(_)));
    }

    #[test]
    fn outline_lists_answered_fields_and_entries() {
        let form = set_field(&coded(), FieldPath::Alter, FieldValue::Number(Some(52))).unwrap();
        let (form, _) = add::<Medications>(
            &form,
            Medikament {
                praeparat: "Lithium".into(),
                dosierung: "450 mg".into(),
                ..Medikament::default()
            },
        );
        let text = block_on(PreviewGenerator.generate(&form)).unwrap();
        assert_snapshot!(text.text, @r###"
        Stammdaten
        alter: 52
        chiffre: A-12

        Beruf
        erwerbstaetig: nein

        Medikation
        keine: nein
        medikation: Lithium · 450 mg

        Vorbehandlungen
        keine: nein
        "###);
        assert!(text.highlight_timestamp.is_none());
    }

    #[test]
    fn active_suicidality_is_highlighted() {
        let form = toggle_suicidality(&coded(), SuizidFacet::Gedanken);
        let text = block_on(PreviewGenerator.generate(&form)).unwrap();
        assert_eq!(text.highlighted_sentences, vec!["Suizidalität: gedanken."]);
        assert!(text.highlight_timestamp.is_some());
    }
}
