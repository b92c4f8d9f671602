use std::collections::HashSet;

use intake_core::{
    core::{
        collections::entries, Collection, DisorderModel, FormStore, Medications, SorkcAnalyses,
    },
    form::{
        EntryData, EntryId, Faktorart, Medikament, MedikamentPatch, Modellfaktor, SorkcAnalyse,
    },
    with_collection,
};

#[test]
fn ids_stay_unique_across_adds_and_removes() {
    let mut store = FormStore::new();
    let mut handler = store.collection::<Medications>();
    let mut seen = HashSet::new();
    for round in 0..50 {
        let id = handler.add(Medikament {
            praeparat: format!("Präparat {}", round),
            ..Medikament::default()
        });
        assert!(seen.insert(id), "id {} issued twice", id);
        if round % 3 == 0 {
            assert!(handler.remove(id));
        }
    }
    let live: HashSet<EntryId> = handler.entries().iter().map(|entry| entry.id).collect();
    assert_eq!(live.len(), handler.len());
}

#[test]
fn handler_writes_bump_the_revision_once_each() {
    let mut store = FormStore::new();
    let id = store.collection::<Medications>().add(Medikament::default());
    assert_eq!(store.revision(), 1);

    let patch = MedikamentPatch {
        praeparat: Some("Quetiapin".into()),
        ..MedikamentPatch::default()
    };
    assert!(store.collection::<Medications>().update(id, patch));
    assert_eq!(store.revision(), 2);

    assert!(!store
        .collection::<Medications>()
        .update(EntryId::generate(), MedikamentPatch::default()));
    assert!(!store.collection::<Medications>().remove(EntryId::generate()));
    assert_eq!(store.revision(), 2);
}

#[test]
fn patch_only_overwrites_named_fields() {
    let mut store = FormStore::new();
    let mut handler = store.collection::<SorkcAnalyses>();
    let id = handler.add(SorkcAnalyse {
        situation: "Supermarkt".into(),
        reaktion: "Herzrasen".into(),
        ..SorkcAnalyse::default()
    });
    let patch = SorkcAnalyse::patch_from_pairs([("konsequenz", "Flucht")]).unwrap();
    assert!(handler.update(id, patch));

    let entry = handler.get(id).unwrap();
    assert_eq!(entry.data.situation, "Supermarkt");
    assert_eq!(entry.data.reaktion, "Herzrasen");
    assert_eq!(entry.data.konsequenz, "Flucht");
}

#[test]
fn model_factor_category_is_parsed() {
    let patch = Modellfaktor::patch_from_pairs([
        ("kategorie", "aufrechterhaltend"),
        ("beschreibung", "Vermeidung"),
    ])
    .unwrap();
    let mut factor = Modellfaktor::default();
    factor.merge(patch);
    assert_eq!(factor.kategorie, Faktorart::Aufrechterhaltend);
    assert!(Modellfaktor::patch_from_pairs([("kategorie", "irgendwie")]).is_err());
}

#[test]
fn clear_empties_only_its_own_collection() {
    let mut store = FormStore::new();
    store.collection::<Medications>().add(Medikament::default());
    store.collection::<DisorderModel>().add(Modellfaktor::default());
    store.collection::<Medications>().clear();

    assert!(store.collection::<Medications>().is_empty());
    assert_eq!(store.collection::<DisorderModel>().len(), 1);
    assert_eq!(store.form().entry_count(), 1);
}

#[test]
fn runtime_names_cover_every_collection() {
    let store = FormStore::new();
    for name in ["medikation", "drogenkonsum", "vorbehandlungen", "sorkc", "stoerungsmodell"] {
        let resolved = with_collection!(name, C => (C::NAME, entries::<C>(store.form()).len()));
        assert_eq!(resolved, Some((name, 0)));
    }
    assert_eq!(with_collection!("termine", C => C::NAME), None);
}
