//! Form data model: chapters, collection entries, and exclusive facet sets.

pub mod clinical;
pub mod entries;
pub mod facets;
#[allow(clippy::module_inception)]
pub mod form;
pub mod personal;
pub mod social;

pub use clinical::{
    Befund, Diagnostik, Drogenkonsum, Medikation, Stoerungsmodell, Symptomatik, Verhaltensanalyse,
    Vorbehandlungen,
};
pub use entries::{
    AssignError, Entry, EntryData, EntryId, Faktorart, Medikament, MedikamentPatch, Modellfaktor,
    ModellfaktorPatch, SorkcAnalyse, SorkcAnalysePatch, Substanzkonsum, SubstanzkonsumPatch,
    Vorbehandlung, VorbehandlungPatch,
};
pub use facets::{
    toggle_facet, FacetRule, FacetSet, SuizidFacet, Suizidalitaet, WohnFacet, Wohnsituation,
};
pub use form::Form;
pub use personal::{Geschlecht, Stammdaten};
pub use social::{Arbeitslosigkeit, Beruf, Bildung, Familie, Kind, KindPatch, Promotion};
