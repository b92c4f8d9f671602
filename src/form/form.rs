use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{
    clinical::{
        Befund, Diagnostik, Drogenkonsum, Medikation, Stoerungsmodell, Symptomatik,
        Verhaltensanalyse, Vorbehandlungen,
    },
    personal::Stammdaten,
    social::{Beruf, Bildung, Familie},
};

/// Root aggregate of one intake session.
///
/// Chapters sit behind [`Arc`]: cloning a `Form` only bumps reference counts,
/// and writers copy-on-write the single chapter they touch (see
/// [`crate::core::path::set_field`]). Two snapshots therefore share every
/// chapter that was not edited in between.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub stammdaten: Arc<Stammdaten>,
    pub symptomatik: Arc<Symptomatik>,
    pub beruf: Arc<Beruf>,
    pub bildung: Arc<Bildung>,
    pub familie: Arc<Familie>,
    pub medikation: Arc<Medikation>,
    pub drogenkonsum: Arc<Drogenkonsum>,
    pub befund: Arc<Befund>,
    pub vorbehandlungen: Arc<Vorbehandlungen>,
    pub verhaltensanalyse: Arc<Verhaltensanalyse>,
    pub stoerungsmodell: Arc<Stoerungsmodell>,
    pub diagnostik: Arc<Diagnostik>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// Number of entries across all id-keyed collections.
    pub fn entry_count(&self) -> usize {
        self.medikation.eintraege.len()
            + self.drogenkonsum.eintraege.len()
            + self.vorbehandlungen.eintraege.len()
            + self.verhaltensanalyse.sorkc.len()
            + self.stoerungsmodell.eintraege.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Geschlecht;

    #[test]
    fn clone_shares_every_chapter() {
        let form = Form::new();
        let copy = form.clone();
        assert!(Arc::ptr_eq(&form.stammdaten, &copy.stammdaten));
        assert!(Arc::ptr_eq(&form.diagnostik, &copy.diagnostik));
    }

    #[test]
    fn json_uses_camel_case_and_round_trips() {
        let mut form = Form::new();
        Arc::make_mut(&mut form.stammdaten).geschlecht = Some(Geschlecht::Divers);
        Arc::make_mut(&mut form.beruf).erwerbstaetig = true;

        let json = form.to_json().unwrap();
        assert!(json.contains("\"erwerbstaetig\": true"));
        assert!(json.contains("\"verhaltensanalyse\""));

        let restored = Form::from_json(&json).unwrap();
        assert_eq!(restored, form);
    }
}
