use serde::{Deserialize, Serialize};

use super::facets::Wohnsituation;
use super::personal::Geschlecht;

/// Employment history (chapter 3).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Beruf {
    pub taetigkeit: Option<String>,
    pub erwerbstaetig: bool,
    pub arbeitslosigkeit: Option<Arbeitslosigkeit>,
}

/// Present only when the patient is unemployed; all fields are required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Arbeitslosigkeit {
    pub dauer: String,
    pub leistungsbezug: bool,
}

/// Education (chapter 3).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Bildung {
    pub schulabschluss: Option<String>,
    pub berufsausbildung: Option<String>,
    pub studium: Option<String>,
    pub promotion: Option<Promotion>,
}

/// Doctorate; present only when both fields are answered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub fach: String,
    pub status: String,
}

/// Family and living situation (chapter 3).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Familie {
    pub familienstand: Option<String>,
    pub wohnsituation: Option<Wohnsituation>,
    /// `None` until the number of children has been answered.
    pub kinder: Option<Vec<Kind>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Kind {
    pub alter: Option<u32>,
    pub geschlecht: Option<Geschlecht>,
}

/// Partial update of one child; `Some(None)` clears a field.
#[derive(Debug, Clone, Default)]
pub struct KindPatch {
    pub alter: Option<Option<u32>>,
    pub geschlecht: Option<Option<Geschlecht>>,
}

impl Kind {
    pub fn merge(&mut self, patch: KindPatch) {
        if let Some(alter) = patch.alter {
            self.alter = alter;
        }
        if let Some(geschlecht) = patch.geschlecht {
            self.geschlecht = geschlecht;
        }
    }
}
