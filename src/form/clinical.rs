use serde::{Deserialize, Serialize};

use super::entries::{Entry, Medikament, Modellfaktor, SorkcAnalyse, Substanzkonsum, Vorbehandlung};
use super::facets::Suizidalitaet;

/// Presenting symptoms (chapter 2).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Symptomatik {
    pub psychisch: Vec<String>,
    pub somatisch: Vec<String>,
    pub beginn: Option<String>,
    pub anlass: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Medikation {
    pub keine: bool,
    pub eintraege: Vec<Entry<Medikament>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Drogenkonsum {
    pub anmerkung: Option<String>,
    pub eintraege: Vec<Entry<Substanzkonsum>>,
}

/// Mental status examination (chapter 5).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Befund {
    pub bewusstsein: Vec<String>,
    pub orientierung: Vec<String>,
    pub affekt: Vec<String>,
    pub denken: Vec<String>,
    pub suizidalitaet: Option<Suizidalitaet>,
    pub freitext: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Vorbehandlungen {
    pub keine: bool,
    pub eintraege: Vec<Entry<Vorbehandlung>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Verhaltensanalyse {
    pub zusammenfassung: Option<String>,
    pub sorkc: Vec<Entry<SorkcAnalyse>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Stoerungsmodell {
    pub freitext: Option<String>,
    pub eintraege: Vec<Entry<Modellfaktor>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostik {
    pub diagnosen: Vec<String>,
    pub therapieziele: Vec<String>,
    pub behandlungsplan: Option<String>,
}
