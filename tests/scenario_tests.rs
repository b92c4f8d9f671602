mod common;

use common::{identified_form, FlakyGenerator};
use futures::executor::block_on;
use intake_core::{
    core::{FieldPath, FieldValue, FormStore, IntakeSession, Medications, NavigationOutcome},
    form::{Geschlecht, KindPatch, Medikament, SuizidFacet, WohnFacet},
};

#[test]
fn children_count_shrinks_from_three_to_one() {
    let mut store = FormStore::new();
    assert_eq!(
        store.get_field(FieldPath::Kinder).unwrap(),
        FieldValue::Children(None)
    );

    store.set_children_count(3).unwrap();
    assert!(store.update_child(
        0,
        KindPatch {
            alter: Some(Some(12)),
            geschlecht: Some(Some(Geschlecht::Maennlich)),
        }
    ));
    assert!(store.update_child(
        2,
        KindPatch {
            alter: Some(Some(4)),
            ..KindPatch::default()
        }
    ));

    store.set_children_count(1).unwrap();
    let kinder = store.form().familie.kinder.clone().unwrap();
    assert_eq!(kinder.len(), 1);
    assert_eq!(kinder[0].alter, Some(12));
    assert!(!store.update_child(2, KindPatch::default()));

    store.set_children_count(0).unwrap();
    assert_eq!(store.form().familie.kinder, Some(Vec::new()));
}

#[test]
fn living_alone_excludes_every_other_facet() {
    let mut store = FormStore::new();
    store.toggle_living(WohnFacet::MitPartner);
    store.toggle_living(WohnFacet::MitKindern);
    store.toggle_living(WohnFacet::LebtAllein);
    let living = store.form().familie.wohnsituation.clone().unwrap();
    assert!(living.lebt_allein);
    assert!(!living.mit_partner && !living.mit_kindern);

    store.toggle_living(WohnFacet::InWg);
    let living = store.form().familie.wohnsituation.clone().unwrap();
    assert!(!living.lebt_allein);
    assert!(living.in_wg);

    store.toggle_living(WohnFacet::InWg);
    assert_eq!(store.form().familie.wohnsituation, None);
}

#[test]
fn no_suicidality_excludes_findings() {
    let mut store = FormStore::new();
    store.toggle_suicidality(SuizidFacet::Gedanken);
    store.toggle_suicidality(SuizidFacet::Plaene);
    store.toggle_suicidality(SuizidFacet::Keine);
    let findings = store.form().befund.suizidalitaet.clone().unwrap();
    assert!(findings.keine);
    assert!(!findings.gedanken && !findings.plaene);
}

#[test]
fn toggling_a_list_value_twice_restores_it() {
    let mut store = FormStore::new();
    store.toggle(FieldPath::PsychischeSymptome, "Grübeln").unwrap();
    store.toggle(FieldPath::PsychischeSymptome, "Schlafstörung").unwrap();
    store.toggle(FieldPath::PsychischeSymptome, "Grübeln").unwrap();
    assert_eq!(store.form().symptomatik.psychisch, vec!["Schlafstörung"]);
}

#[test]
fn full_intake_with_failed_then_successful_submission() {
    let generator = FlakyGenerator::new(1);
    let mut session = IntakeSession::default();
    session.store_mut().replace(identified_form());
    session
        .store_mut()
        .collection::<Medications>()
        .add(Medikament {
            praeparat: "Venlafaxin".into(),
            dosierung: "75 mg".into(),
            ..Medikament::default()
        });

    while let NavigationOutcome::Advanced(_) = session.next() {}
    assert!(session.wizard().is_review());

    assert!(block_on(session.submit(&generator)));
    assert!(session.submission().error().is_some());

    assert!(block_on(session.submit(&generator)));
    assert!(session.submission().result().is_some());
    assert_eq!(session.form().entry_count(), 1);
}
