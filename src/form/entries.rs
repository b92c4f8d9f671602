//! Id-keyed entries stored in the Form's collections.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of an entry inside its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// First eight hex digits, used by the shell for display and lookup.
    pub fn short(&self) -> String {
        let mut short = self.0.simple().to_string();
        short.truncate(8);
        short
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim()).map(Self)
    }
}

/// One element of an id-keyed collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry<T> {
    pub id: EntryId,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Entry<T> {
    pub fn new(id: EntryId, data: T) -> Self {
        Self { id, data }
    }
}

/// Failure while building a patch from `key=value` assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignError {
    UnknownField(String),
    InvalidValue { field: String, message: String },
}

/// Payload of a collection entry together with its partial-update shape.
pub trait EntryData: Clone + Default + PartialEq + fmt::Debug {
    type Patch: Default + fmt::Debug;

    const FIELDS: &'static [&'static str];

    /// Overwrites the fields present in `patch`, leaving the rest untouched.
    fn merge(&mut self, patch: Self::Patch);

    fn assign(patch: &mut Self::Patch, field: &str, value: &str) -> Result<(), AssignError>;

    /// One-line description for listings.
    fn summary(&self) -> String;

    fn patch_from_pairs<'a, I>(pairs: I) -> Result<Self::Patch, AssignError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut patch = Self::Patch::default();
        for (field, value) in pairs {
            Self::assign(&mut patch, field, value)?;
        }
        Ok(patch)
    }
}

fn apply(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn unknown(field: &str) -> AssignError {
    AssignError::UnknownField(field.to_string())
}

fn joined(parts: &[&str]) -> String {
    let filled: Vec<&str> = parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect();
    if filled.is_empty() {
        "(leer)".into()
    } else {
        filled.join(" · ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Medikament {
    pub praeparat: String,
    pub dosierung: String,
    pub seit: String,
    pub verordnet_von: String,
}

#[derive(Debug, Clone, Default)]
pub struct MedikamentPatch {
    pub praeparat: Option<String>,
    pub dosierung: Option<String>,
    pub seit: Option<String>,
    pub verordnet_von: Option<String>,
}

impl EntryData for Medikament {
    type Patch = MedikamentPatch;

    const FIELDS: &'static [&'static str] = &["praeparat", "dosierung", "seit", "verordnetVon"];

    fn merge(&mut self, patch: MedikamentPatch) {
        apply(&mut self.praeparat, patch.praeparat);
        apply(&mut self.dosierung, patch.dosierung);
        apply(&mut self.seit, patch.seit);
        apply(&mut self.verordnet_von, patch.verordnet_von);
    }

    fn assign(patch: &mut MedikamentPatch, field: &str, value: &str) -> Result<(), AssignError> {
        let value = Some(value.to_string());
        match field {
            "praeparat" => patch.praeparat = value,
            "dosierung" => patch.dosierung = value,
            "seit" => patch.seit = value,
            "verordnetVon" => patch.verordnet_von = value,
            other => return Err(unknown(other)),
        }
        Ok(())
    }

    fn summary(&self) -> String {
        joined(&[&self.praeparat, &self.dosierung, &self.seit])
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Substanzkonsum {
    pub substanz: String,
    pub menge: String,
    pub haeufigkeit: String,
    pub letzter_konsum: String,
}

#[derive(Debug, Clone, Default)]
pub struct SubstanzkonsumPatch {
    pub substanz: Option<String>,
    pub menge: Option<String>,
    pub haeufigkeit: Option<String>,
    pub letzter_konsum: Option<String>,
}

impl EntryData for Substanzkonsum {
    type Patch = SubstanzkonsumPatch;

    const FIELDS: &'static [&'static str] = &["substanz", "menge", "haeufigkeit", "letzterKonsum"];

    fn merge(&mut self, patch: SubstanzkonsumPatch) {
        apply(&mut self.substanz, patch.substanz);
        apply(&mut self.menge, patch.menge);
        apply(&mut self.haeufigkeit, patch.haeufigkeit);
        apply(&mut self.letzter_konsum, patch.letzter_konsum);
    }

    fn assign(
        patch: &mut SubstanzkonsumPatch,
        field: &str,
        value: &str,
    ) -> Result<(), AssignError> {
        let value = Some(value.to_string());
        match field {
            "substanz" => patch.substanz = value,
            "menge" => patch.menge = value,
            "haeufigkeit" => patch.haeufigkeit = value,
            "letzterKonsum" => patch.letzter_konsum = value,
            other => return Err(unknown(other)),
        }
        Ok(())
    }

    fn summary(&self) -> String {
        joined(&[&self.substanz, &self.menge, &self.haeufigkeit])
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Vorbehandlung {
    pub art: String,
    pub zeitraum: String,
    pub einrichtung: String,
    pub ergebnis: String,
}

#[derive(Debug, Clone, Default)]
pub struct VorbehandlungPatch {
    pub art: Option<String>,
    pub zeitraum: Option<String>,
    pub einrichtung: Option<String>,
    pub ergebnis: Option<String>,
}

impl EntryData for Vorbehandlung {
    type Patch = VorbehandlungPatch;

    const FIELDS: &'static [&'static str] = &["art", "zeitraum", "einrichtung", "ergebnis"];

    fn merge(&mut self, patch: VorbehandlungPatch) {
        apply(&mut self.art, patch.art);
        apply(&mut self.zeitraum, patch.zeitraum);
        apply(&mut self.einrichtung, patch.einrichtung);
        apply(&mut self.ergebnis, patch.ergebnis);
    }

    fn assign(patch: &mut VorbehandlungPatch, field: &str, value: &str) -> Result<(), AssignError> {
        let value = Some(value.to_string());
        match field {
            "art" => patch.art = value,
            "zeitraum" => patch.zeitraum = value,
            "einrichtung" => patch.einrichtung = value,
            "ergebnis" => patch.ergebnis = value,
            other => return Err(unknown(other)),
        }
        Ok(())
    }

    fn summary(&self) -> String {
        joined(&[&self.art, &self.zeitraum, &self.einrichtung])
    }
}

/// Behavioural analysis along situation, organism, reaction, consequence and
/// contingency.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SorkcAnalyse {
    pub situation: String,
    pub organismus: String,
    pub reaktion: String,
    pub konsequenz: String,
    pub kontingenz: String,
}

#[derive(Debug, Clone, Default)]
pub struct SorkcAnalysePatch {
    pub situation: Option<String>,
    pub organismus: Option<String>,
    pub reaktion: Option<String>,
    pub konsequenz: Option<String>,
    pub kontingenz: Option<String>,
}

impl EntryData for SorkcAnalyse {
    type Patch = SorkcAnalysePatch;

    const FIELDS: &'static [&'static str] = &[
        "situation",
        "organismus",
        "reaktion",
        "konsequenz",
        "kontingenz",
    ];

    fn merge(&mut self, patch: SorkcAnalysePatch) {
        apply(&mut self.situation, patch.situation);
        apply(&mut self.organismus, patch.organismus);
        apply(&mut self.reaktion, patch.reaktion);
        apply(&mut self.konsequenz, patch.konsequenz);
        apply(&mut self.kontingenz, patch.kontingenz);
    }

    fn assign(patch: &mut SorkcAnalysePatch, field: &str, value: &str) -> Result<(), AssignError> {
        let value = Some(value.to_string());
        match field {
            "situation" => patch.situation = value,
            "organismus" => patch.organismus = value,
            "reaktion" => patch.reaktion = value,
            "konsequenz" => patch.konsequenz = value,
            "kontingenz" => patch.kontingenz = value,
            other => return Err(unknown(other)),
        }
        Ok(())
    }

    fn summary(&self) -> String {
        joined(&[&self.situation, &self.reaktion])
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Faktorart {
    #[default]
    Praedisponierend,
    Ausloesend,
    Aufrechterhaltend,
}

impl Faktorart {
    pub fn label(self) -> &'static str {
        match self {
            Faktorart::Praedisponierend => "prädisponierend",
            Faktorart::Ausloesend => "auslösend",
            Faktorart::Aufrechterhaltend => "aufrechterhaltend",
        }
    }
}

impl FromStr for Faktorart {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "praedisponierend" | "prädisponierend" | "p" => Ok(Faktorart::Praedisponierend),
            "ausloesend" | "auslösend" | "a" => Ok(Faktorart::Ausloesend),
            "aufrechterhaltend" => Ok(Faktorart::Aufrechterhaltend),
            other => Err(format!(
                "unknown factor kind `{}` (praedisponierend, ausloesend, aufrechterhaltend)",
                other
            )),
        }
    }
}

/// One factor of the disorder model.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Modellfaktor {
    pub kategorie: Faktorart,
    pub beschreibung: String,
}

#[derive(Debug, Clone, Default)]
pub struct ModellfaktorPatch {
    pub kategorie: Option<Faktorart>,
    pub beschreibung: Option<String>,
}

impl EntryData for Modellfaktor {
    type Patch = ModellfaktorPatch;

    const FIELDS: &'static [&'static str] = &["kategorie", "beschreibung"];

    fn merge(&mut self, patch: ModellfaktorPatch) {
        if let Some(kategorie) = patch.kategorie {
            self.kategorie = kategorie;
        }
        apply(&mut self.beschreibung, patch.beschreibung);
    }

    fn assign(patch: &mut ModellfaktorPatch, field: &str, value: &str) -> Result<(), AssignError> {
        match field {
            "kategorie" => {
                let kategorie = value.parse::<Faktorart>().map_err(|message| AssignError::InvalidValue {
                    field: field.to_string(),
                    message,
                })?;
                patch.kategorie = Some(kategorie);
            }
            "beschreibung" => patch.beschreibung = Some(value.to_string()),
            other => return Err(unknown(other)),
        }
        Ok(())
    }

    fn summary(&self) -> String {
        format!("{}: {}", self.kategorie.label(), joined(&[&self.beschreibung]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_overwrites_only_present_fields() {
        let mut medikament = Medikament {
            praeparat: "Sertralin".into(),
            dosierung: "50 mg".into(),
            ..Medikament::default()
        };
        medikament.merge(MedikamentPatch {
            dosierung: Some("100 mg".into()),
            ..MedikamentPatch::default()
        });
        assert_eq!(medikament.praeparat, "Sertralin");
        assert_eq!(medikament.dosierung, "100 mg");
        assert!(medikament.seit.is_empty());
    }

    #[test]
    fn patch_from_pairs_rejects_unknown_fields() {
        let result = Vorbehandlung::patch_from_pairs([("art", "ambulant"), ("dauer", "2 Jahre")]);
        assert_eq!(result.unwrap_err(), AssignError::UnknownField("dauer".into()));
    }

    #[test]
    fn factor_kind_is_parsed_from_patch_values() {
        let patch = Modellfaktor::patch_from_pairs([("kategorie", "auslösend")]).unwrap();
        assert_eq!(patch.kategorie, Some(Faktorart::Ausloesend));
        assert!(matches!(
            Modellfaktor::patch_from_pairs([("kategorie", "später")]),
            Err(AssignError::InvalidValue { .. })
        ));
    }

    #[test]
    fn entry_flattens_payload_next_to_id() {
        let entry = Entry::new(
            EntryId::generate(),
            Substanzkonsum {
                substanz: "Alkohol".into(),
                ..Substanzkonsum::default()
            },
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["substanz"], "Alkohol");
        assert_eq!(json["id"], entry.id.to_string());
    }

    #[test]
    fn short_id_has_eight_hex_digits() {
        let id = EntryId::generate();
        assert_eq!(id.short().len(), 8);
        assert!(id.to_string().replace('-', "").starts_with(&id.short()));
    }
}
