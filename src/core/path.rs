//! Path Mutator: addressable fields of the [`Form`] and pure read/write access.
//!
//! Every editable field or subtree is one variant of [`FieldPath`]. The dotted
//! string form (`"beruf.arbeitslosigkeit.dauer"`) exists for the shell and
//! for logging; parsing it either yields a known variant or fails with
//! [`FormError::UnresolvablePath`]. Writes never create branches: a path below
//! an absent optional record fails with [`FormError::AbsentBranch`] and the
//! caller replaces the whole record instead.

use std::{collections::HashMap, fmt, str::FromStr, sync::Arc};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use strsim::levenshtein;

use crate::core::collections::{too_many_children, MAX_CHILDREN};
use crate::errors::FormError;
use crate::form::{
    Arbeitslosigkeit, FacetSet, Form, Geschlecht, Kind, Promotion, Suizidalitaet, Wohnsituation,
};

/// Largest edit distance for which a known path is offered as a suggestion.
const SUGGESTION_DISTANCE: usize = 4;

/// Static shape of the value stored at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Flag,
    Text,
    OptionalText,
    Number,
    Date,
    Gender,
    List,
    Unemployment,
    Doctorate,
    Living,
    Children,
    Suicidality,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ValueKind::Flag => "flag",
            ValueKind::Text => "text",
            ValueKind::OptionalText => "optional text",
            ValueKind::Number => "number",
            ValueKind::Date => "date",
            ValueKind::Gender => "gender",
            ValueKind::List => "list",
            ValueKind::Unemployment => "unemployment record",
            ValueKind::Doctorate => "doctorate record",
            ValueKind::Living => "living situation",
            ValueKind::Children => "children",
            ValueKind::Suicidality => "suicidality",
        };
        f.write_str(label)
    }
}

/// Value carried into or out of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    OptionalText(Option<String>),
    Number(Option<u32>),
    Date(Option<NaiveDate>),
    Gender(Option<Geschlecht>),
    List(Vec<String>),
    Unemployment(Option<Arbeitslosigkeit>),
    Doctorate(Option<Promotion>),
    Living(Option<Wohnsituation>),
    Children(Option<Vec<Kind>>),
    Suicidality(Option<Suizidalitaet>),
}

impl FieldValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Flag(_) => ValueKind::Flag,
            FieldValue::Text(_) => ValueKind::Text,
            FieldValue::OptionalText(_) => ValueKind::OptionalText,
            FieldValue::Number(_) => ValueKind::Number,
            FieldValue::Date(_) => ValueKind::Date,
            FieldValue::Gender(_) => ValueKind::Gender,
            FieldValue::List(_) => ValueKind::List,
            FieldValue::Unemployment(_) => ValueKind::Unemployment,
            FieldValue::Doctorate(_) => ValueKind::Doctorate,
            FieldValue::Living(_) => ValueKind::Living,
            FieldValue::Children(_) => ValueKind::Children,
            FieldValue::Suicidality(_) => ValueKind::Suicidality,
        }
    }

    /// True when nothing has been entered. `Flag(false)` counts as an answer.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Flag(_) => false,
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::OptionalText(text) => {
                text.as_deref().map_or(true, |text| text.trim().is_empty())
            }
            FieldValue::Number(value) => value.is_none(),
            FieldValue::Date(value) => value.is_none(),
            FieldValue::Gender(value) => value.is_none(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Unemployment(value) => value.is_none(),
            FieldValue::Doctorate(value) => value.is_none(),
            FieldValue::Living(value) => value.is_none(),
            FieldValue::Children(value) => value.is_none(),
            FieldValue::Suicidality(value) => value.is_none(),
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "ja"
    } else {
        "nein"
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const EMPTY: &str = "-";
        match self {
            FieldValue::Flag(value) => f.write_str(yes_no(*value)),
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::OptionalText(text) => f.write_str(text.as_deref().unwrap_or(EMPTY)),
            FieldValue::Number(Some(value)) => write!(f, "{}", value),
            FieldValue::Date(Some(date)) => write!(f, "{}", date.format("%d.%m.%Y")),
            FieldValue::Gender(Some(gender)) => write!(f, "{}", gender),
            FieldValue::List(items) if !items.is_empty() => f.write_str(&items.join(", ")),
            FieldValue::Unemployment(Some(record)) => write!(
                f,
                "seit {}, Leistungsbezug: {}",
                record.dauer,
                yes_no(record.leistungsbezug)
            ),
            FieldValue::Doctorate(Some(record)) => write!(f, "{} ({})", record.fach, record.status),
            FieldValue::Living(Some(living)) => f.write_str(&living.active_keys().join(", ")),
            FieldValue::Suicidality(Some(findings)) => {
                f.write_str(&findings.active_keys().join(", "))
            }
            FieldValue::Children(Some(children)) => {
                write!(f, "{} Kind(er)", children.len())?;
                for (index, child) in children.iter().enumerate() {
                    let age = child
                        .alter
                        .map(|age| age.to_string())
                        .unwrap_or_else(|| "?".into());
                    let gender = child.geschlecht.map(|g| g.label()).unwrap_or("?");
                    write!(f, "; #{} {} J., {}", index + 1, age, gender)?;
                }
                Ok(())
            }
            _ => f.write_str(EMPTY),
        }
    }
}

/// Closed set of addressable locations inside the [`Form`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldPath {
    Geschlecht,
    Alter,
    Chiffre,
    Datum,
    PsychischeSymptome,
    SomatischeSymptome,
    Beschwerdebeginn,
    Anlass,
    Taetigkeit,
    Erwerbstaetig,
    Arbeitslosigkeit,
    ArbeitslosigkeitDauer,
    Leistungsbezug,
    Schulabschluss,
    Berufsausbildung,
    Studium,
    Promotion,
    PromotionFach,
    PromotionStatus,
    Familienstand,
    Wohnsituation,
    Kinder,
    KeineMedikation,
    DrogenAnmerkung,
    Bewusstsein,
    Orientierung,
    Affekt,
    Denken,
    Suizidalitaet,
    BefundFreitext,
    KeineVorbehandlung,
    Zusammenfassung,
    ModellFreitext,
    Diagnosen,
    Therapieziele,
    Behandlungsplan,
}

impl FieldPath {
    pub const ALL: [FieldPath; 36] = [
        FieldPath::Geschlecht,
        FieldPath::Alter,
        FieldPath::Chiffre,
        FieldPath::Datum,
        FieldPath::PsychischeSymptome,
        FieldPath::SomatischeSymptome,
        FieldPath::Beschwerdebeginn,
        FieldPath::Anlass,
        FieldPath::Taetigkeit,
        FieldPath::Erwerbstaetig,
        FieldPath::Arbeitslosigkeit,
        FieldPath::ArbeitslosigkeitDauer,
        FieldPath::Leistungsbezug,
        FieldPath::Schulabschluss,
        FieldPath::Berufsausbildung,
        FieldPath::Studium,
        FieldPath::Promotion,
        FieldPath::PromotionFach,
        FieldPath::PromotionStatus,
        FieldPath::Familienstand,
        FieldPath::Wohnsituation,
        FieldPath::Kinder,
        FieldPath::KeineMedikation,
        FieldPath::DrogenAnmerkung,
        FieldPath::Bewusstsein,
        FieldPath::Orientierung,
        FieldPath::Affekt,
        FieldPath::Denken,
        FieldPath::Suizidalitaet,
        FieldPath::BefundFreitext,
        FieldPath::KeineVorbehandlung,
        FieldPath::Zusammenfassung,
        FieldPath::ModellFreitext,
        FieldPath::Diagnosen,
        FieldPath::Therapieziele,
        FieldPath::Behandlungsplan,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldPath::Geschlecht => "stammdaten.geschlecht",
            FieldPath::Alter => "stammdaten.alter",
            FieldPath::Chiffre => "stammdaten.chiffre",
            FieldPath::Datum => "stammdaten.datum",
            FieldPath::PsychischeSymptome => "symptomatik.psychisch",
            FieldPath::SomatischeSymptome => "symptomatik.somatisch",
            FieldPath::Beschwerdebeginn => "symptomatik.beginn",
            FieldPath::Anlass => "symptomatik.anlass",
            FieldPath::Taetigkeit => "beruf.taetigkeit",
            FieldPath::Erwerbstaetig => "beruf.erwerbstaetig",
            FieldPath::Arbeitslosigkeit => "beruf.arbeitslosigkeit",
            FieldPath::ArbeitslosigkeitDauer => "beruf.arbeitslosigkeit.dauer",
            FieldPath::Leistungsbezug => "beruf.arbeitslosigkeit.leistungsbezug",
            FieldPath::Schulabschluss => "bildung.schulabschluss",
            FieldPath::Berufsausbildung => "bildung.berufsausbildung",
            FieldPath::Studium => "bildung.studium",
            FieldPath::Promotion => "bildung.promotion",
            FieldPath::PromotionFach => "bildung.promotion.fach",
            FieldPath::PromotionStatus => "bildung.promotion.status",
            FieldPath::Familienstand => "familie.familienstand",
            FieldPath::Wohnsituation => "familie.wohnsituation",
            FieldPath::Kinder => "familie.kinder",
            FieldPath::KeineMedikation => "medikation.keine",
            FieldPath::DrogenAnmerkung => "drogenkonsum.anmerkung",
            FieldPath::Bewusstsein => "befund.bewusstsein",
            FieldPath::Orientierung => "befund.orientierung",
            FieldPath::Affekt => "befund.affekt",
            FieldPath::Denken => "befund.denken",
            FieldPath::Suizidalitaet => "befund.suizidalitaet",
            FieldPath::BefundFreitext => "befund.freitext",
            FieldPath::KeineVorbehandlung => "vorbehandlungen.keine",
            FieldPath::Zusammenfassung => "verhaltensanalyse.zusammenfassung",
            FieldPath::ModellFreitext => "stoerungsmodell.freitext",
            FieldPath::Diagnosen => "diagnostik.diagnosen",
            FieldPath::Therapieziele => "diagnostik.therapieziele",
            FieldPath::Behandlungsplan => "diagnostik.behandlungsplan",
        }
    }

    pub fn kind(self) -> ValueKind {
        match self {
            FieldPath::Geschlecht => ValueKind::Gender,
            FieldPath::Alter => ValueKind::Number,
            FieldPath::Datum => ValueKind::Date,
            FieldPath::Erwerbstaetig
            | FieldPath::Leistungsbezug
            | FieldPath::KeineMedikation
            | FieldPath::KeineVorbehandlung => ValueKind::Flag,
            FieldPath::ArbeitslosigkeitDauer
            | FieldPath::PromotionFach
            | FieldPath::PromotionStatus => ValueKind::Text,
            FieldPath::PsychischeSymptome
            | FieldPath::SomatischeSymptome
            | FieldPath::Bewusstsein
            | FieldPath::Orientierung
            | FieldPath::Affekt
            | FieldPath::Denken
            | FieldPath::Diagnosen
            | FieldPath::Therapieziele => ValueKind::List,
            FieldPath::Arbeitslosigkeit => ValueKind::Unemployment,
            FieldPath::Promotion => ValueKind::Doctorate,
            FieldPath::Wohnsituation => ValueKind::Living,
            FieldPath::Kinder => ValueKind::Children,
            FieldPath::Suizidalitaet => ValueKind::Suicidality,
            FieldPath::Chiffre
            | FieldPath::Beschwerdebeginn
            | FieldPath::Anlass
            | FieldPath::Taetigkeit
            | FieldPath::Schulabschluss
            | FieldPath::Berufsausbildung
            | FieldPath::Studium
            | FieldPath::Familienstand
            | FieldPath::DrogenAnmerkung
            | FieldPath::BefundFreitext
            | FieldPath::Zusammenfassung
            | FieldPath::ModellFreitext
            | FieldPath::Behandlungsplan => ValueKind::OptionalText,
        }
    }

    /// Optional record this path lives in, if any.
    pub fn parent(self) -> Option<FieldPath> {
        match self {
            FieldPath::ArbeitslosigkeitDauer | FieldPath::Leistungsbezug => {
                Some(FieldPath::Arbeitslosigkeit)
            }
            FieldPath::PromotionFach | FieldPath::PromotionStatus => Some(FieldPath::Promotion),
            _ => None,
        }
    }

    /// True when one path addresses a subtree containing the other.
    pub fn overlaps(self, other: FieldPath) -> bool {
        self == other || self.parent() == Some(other) || other.parent() == Some(self)
    }

    /// First segment of the dotted name.
    pub fn chapter(self) -> &'static str {
        let name = self.as_str();
        name.split('.').next().unwrap_or(name)
    }

    /// Resolves a dotted path, failing loudly with the closest known name.
    pub fn parse(raw: &str) -> Result<FieldPath, FormError> {
        let key = raw.trim();
        if let Some(path) = PATH_INDEX.get(key) {
            return Ok(*path);
        }
        Err(FormError::UnresolvablePath {
            path: key.to_string(),
            suggestion: closest_path(key).map(|path| path.as_str().to_string()),
        })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldPath {
    type Err = FormError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        FieldPath::parse(raw)
    }
}

static PATH_INDEX: Lazy<HashMap<&'static str, FieldPath>> = Lazy::new(|| {
    FieldPath::ALL
        .iter()
        .map(|path| (path.as_str(), *path))
        .collect()
});

fn closest_path(raw: &str) -> Option<FieldPath> {
    FieldPath::ALL
        .iter()
        .map(|path| (levenshtein(path.as_str(), raw), *path))
        .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, path)| path)
}

fn present<'a, T>(path: FieldPath, record: Option<&'a T>) -> Result<&'a T, FormError> {
    record.ok_or_else(|| FormError::AbsentBranch {
        path: path.as_str().to_string(),
    })
}

/// Optional record inside `chapter`, ready for writing.
///
/// Presence is checked on the shared chapter first, so a write below an absent
/// record fails without copying the chapter.
fn record_mut<'a, C: Clone, T>(
    path: FieldPath,
    chapter: &'a mut Arc<C>,
    read: fn(&C) -> Option<&T>,
    write: fn(&mut C) -> Option<&mut T>,
) -> Result<&'a mut T, FormError> {
    present(path, read(&**chapter))?;
    write(Arc::make_mut(chapter)).ok_or_else(|| FormError::AbsentBranch {
        path: path.as_str().to_string(),
    })
}

fn blank_required(path: FieldPath) -> FormError {
    FormError::InvalidValue {
        path: path.as_str().to_string(),
        message: "required text of a present record cannot be blank".to_string(),
    }
}

/// Optional records are absent or complete: their text fields must not be
/// blank. The children list stays within [`MAX_CHILDREN`].
fn check_complete(path: FieldPath, value: &FieldValue) -> Result<(), FormError> {
    if let FieldValue::Children(Some(kinder)) = value {
        if kinder.len() > MAX_CHILDREN {
            return Err(too_many_children(kinder.len()));
        }
    }
    let blank = |text: &str| text.trim().is_empty();
    let incomplete = match value {
        FieldValue::Text(text) => blank(text),
        FieldValue::Unemployment(Some(record)) => blank(&record.dauer),
        FieldValue::Doctorate(Some(record)) => blank(&record.fach) || blank(&record.status),
        _ => false,
    };
    if incomplete {
        return Err(blank_required(path));
    }
    Ok(())
}

/// Reads the value stored at `path`.
pub fn get_field(form: &Form, path: FieldPath) -> Result<FieldValue, FormError> {
    let value = match path {
        FieldPath::Geschlecht => FieldValue::Gender(form.stammdaten.geschlecht),
        FieldPath::Alter => FieldValue::Number(form.stammdaten.alter),
        FieldPath::Chiffre => FieldValue::OptionalText(form.stammdaten.chiffre.clone()),
        FieldPath::Datum => FieldValue::Date(form.stammdaten.datum),
        FieldPath::PsychischeSymptome => FieldValue::List(form.symptomatik.psychisch.clone()),
        FieldPath::SomatischeSymptome => FieldValue::List(form.symptomatik.somatisch.clone()),
        FieldPath::Beschwerdebeginn => FieldValue::OptionalText(form.symptomatik.beginn.clone()),
        FieldPath::Anlass => FieldValue::OptionalText(form.symptomatik.anlass.clone()),
        FieldPath::Taetigkeit => FieldValue::OptionalText(form.beruf.taetigkeit.clone()),
        FieldPath::Erwerbstaetig => FieldValue::Flag(form.beruf.erwerbstaetig),
        FieldPath::Arbeitslosigkeit => {
            FieldValue::Unemployment(form.beruf.arbeitslosigkeit.clone())
        }
        FieldPath::ArbeitslosigkeitDauer => FieldValue::Text(
            present(path, form.beruf.arbeitslosigkeit.as_ref())?
                .dauer
                .clone(),
        ),
        FieldPath::Leistungsbezug => FieldValue::Flag(
            present(path, form.beruf.arbeitslosigkeit.as_ref())?.leistungsbezug,
        ),
        FieldPath::Schulabschluss => FieldValue::OptionalText(form.bildung.schulabschluss.clone()),
        FieldPath::Berufsausbildung => {
            FieldValue::OptionalText(form.bildung.berufsausbildung.clone())
        }
        FieldPath::Studium => FieldValue::OptionalText(form.bildung.studium.clone()),
        FieldPath::Promotion => FieldValue::Doctorate(form.bildung.promotion.clone()),
        FieldPath::PromotionFach => {
            FieldValue::Text(present(path, form.bildung.promotion.as_ref())?.fach.clone())
        }
        FieldPath::PromotionStatus => {
            FieldValue::Text(present(path, form.bildung.promotion.as_ref())?.status.clone())
        }
        FieldPath::Familienstand => FieldValue::OptionalText(form.familie.familienstand.clone()),
        FieldPath::Wohnsituation => FieldValue::Living(form.familie.wohnsituation.clone()),
        FieldPath::Kinder => FieldValue::Children(form.familie.kinder.clone()),
        FieldPath::KeineMedikation => FieldValue::Flag(form.medikation.keine),
        FieldPath::DrogenAnmerkung => FieldValue::OptionalText(form.drogenkonsum.anmerkung.clone()),
        FieldPath::Bewusstsein => FieldValue::List(form.befund.bewusstsein.clone()),
        FieldPath::Orientierung => FieldValue::List(form.befund.orientierung.clone()),
        FieldPath::Affekt => FieldValue::List(form.befund.affekt.clone()),
        FieldPath::Denken => FieldValue::List(form.befund.denken.clone()),
        FieldPath::Suizidalitaet => FieldValue::Suicidality(form.befund.suizidalitaet.clone()),
        FieldPath::BefundFreitext => FieldValue::OptionalText(form.befund.freitext.clone()),
        FieldPath::KeineVorbehandlung => FieldValue::Flag(form.vorbehandlungen.keine),
        FieldPath::Zusammenfassung => {
            FieldValue::OptionalText(form.verhaltensanalyse.zusammenfassung.clone())
        }
        FieldPath::ModellFreitext => FieldValue::OptionalText(form.stoerungsmodell.freitext.clone()),
        FieldPath::Diagnosen => FieldValue::List(form.diagnostik.diagnosen.clone()),
        FieldPath::Therapieziele => FieldValue::List(form.diagnostik.therapieziele.clone()),
        FieldPath::Behandlungsplan => {
            FieldValue::OptionalText(form.diagnostik.behandlungsplan.clone())
        }
    };
    Ok(value)
}

/// Returns a new Form whose subtree at `path` is replaced by `value`.
///
/// Only the chapter on the path is reallocated; every other chapter is shared
/// with `form`, which itself is left untouched.
pub fn set_field(form: &Form, path: FieldPath, value: FieldValue) -> Result<Form, FormError> {
    if value.kind() != path.kind() {
        return Err(FormError::KindMismatch {
            path: path.as_str().to_string(),
            expected: path.kind(),
            found: value.kind(),
        });
    }
    check_complete(path, &value)?;
    let mut next = form.clone();
    write(&mut next, path, value)?;
    tracing::debug!(path = %path, "field replaced");
    Ok(next)
}

/// [`set_field`] for flag paths.
pub fn set_boolean(form: &Form, path: FieldPath, value: bool) -> Result<Form, FormError> {
    set_field(form, path, FieldValue::Flag(value))
}

fn unemployment_mut(path: FieldPath, form: &mut Form) -> Result<&mut Arbeitslosigkeit, FormError> {
    record_mut(
        path,
        &mut form.beruf,
        |beruf| beruf.arbeitslosigkeit.as_ref(),
        |beruf| beruf.arbeitslosigkeit.as_mut(),
    )
}

fn doctorate_mut(path: FieldPath, form: &mut Form) -> Result<&mut Promotion, FormError> {
    record_mut(
        path,
        &mut form.bildung,
        |bildung| bildung.promotion.as_ref(),
        |bildung| bildung.promotion.as_mut(),
    )
}

fn write(form: &mut Form, path: FieldPath, value: FieldValue) -> Result<(), FormError> {
    use FieldPath as P;
    use FieldValue as V;

    match (path, value) {
        (P::Geschlecht, V::Gender(v)) => Arc::make_mut(&mut form.stammdaten).geschlecht = v,
        (P::Alter, V::Number(v)) => Arc::make_mut(&mut form.stammdaten).alter = v,
        (P::Chiffre, V::OptionalText(v)) => Arc::make_mut(&mut form.stammdaten).chiffre = v,
        (P::Datum, V::Date(v)) => Arc::make_mut(&mut form.stammdaten).datum = v,
        (P::PsychischeSymptome, V::List(v)) => Arc::make_mut(&mut form.symptomatik).psychisch = v,
        (P::SomatischeSymptome, V::List(v)) => Arc::make_mut(&mut form.symptomatik).somatisch = v,
        (P::Beschwerdebeginn, V::OptionalText(v)) => {
            Arc::make_mut(&mut form.symptomatik).beginn = v
        }
        (P::Anlass, V::OptionalText(v)) => Arc::make_mut(&mut form.symptomatik).anlass = v,
        (P::Taetigkeit, V::OptionalText(v)) => Arc::make_mut(&mut form.beruf).taetigkeit = v,
        (P::Erwerbstaetig, V::Flag(v)) => Arc::make_mut(&mut form.beruf).erwerbstaetig = v,
        (P::Arbeitslosigkeit, V::Unemployment(v)) => {
            Arc::make_mut(&mut form.beruf).arbeitslosigkeit = v
        }
        (P::ArbeitslosigkeitDauer, V::Text(v)) => {
            unemployment_mut(path, form)?.dauer = v
        }
        (P::Leistungsbezug, V::Flag(v)) => {
            unemployment_mut(path, form)?.leistungsbezug = v
        }
        (P::Schulabschluss, V::OptionalText(v)) => {
            Arc::make_mut(&mut form.bildung).schulabschluss = v
        }
        (P::Berufsausbildung, V::OptionalText(v)) => {
            Arc::make_mut(&mut form.bildung).berufsausbildung = v
        }
        (P::Studium, V::OptionalText(v)) => Arc::make_mut(&mut form.bildung).studium = v,
        (P::Promotion, V::Doctorate(v)) => Arc::make_mut(&mut form.bildung).promotion = v,
        (P::PromotionFach, V::Text(v)) => {
            doctorate_mut(path, form)?.fach = v
        }
        (P::PromotionStatus, V::Text(v)) => {
            doctorate_mut(path, form)?.status = v
        }
        (P::Familienstand, V::OptionalText(v)) => {
            Arc::make_mut(&mut form.familie).familienstand = v
        }
        (P::Wohnsituation, V::Living(v)) => Arc::make_mut(&mut form.familie).wohnsituation = v,
        (P::Kinder, V::Children(v)) => Arc::make_mut(&mut form.familie).kinder = v,
        (P::KeineMedikation, V::Flag(v)) => Arc::make_mut(&mut form.medikation).keine = v,
        (P::DrogenAnmerkung, V::OptionalText(v)) => {
            Arc::make_mut(&mut form.drogenkonsum).anmerkung = v
        }
        (P::Bewusstsein, V::List(v)) => Arc::make_mut(&mut form.befund).bewusstsein = v,
        (P::Orientierung, V::List(v)) => Arc::make_mut(&mut form.befund).orientierung = v,
        (P::Affekt, V::List(v)) => Arc::make_mut(&mut form.befund).affekt = v,
        (P::Denken, V::List(v)) => Arc::make_mut(&mut form.befund).denken = v,
        (P::Suizidalitaet, V::Suicidality(v)) => Arc::make_mut(&mut form.befund).suizidalitaet = v,
        (P::BefundFreitext, V::OptionalText(v)) => Arc::make_mut(&mut form.befund).freitext = v,
        (P::KeineVorbehandlung, V::Flag(v)) => Arc::make_mut(&mut form.vorbehandlungen).keine = v,
        (P::Zusammenfassung, V::OptionalText(v)) => {
            Arc::make_mut(&mut form.verhaltensanalyse).zusammenfassung = v
        }
        (P::ModellFreitext, V::OptionalText(v)) => {
            Arc::make_mut(&mut form.stoerungsmodell).freitext = v
        }
        (P::Diagnosen, V::List(v)) => Arc::make_mut(&mut form.diagnostik).diagnosen = v,
        (P::Therapieziele, V::List(v)) => Arc::make_mut(&mut form.diagnostik).therapieziele = v,
        (P::Behandlungsplan, V::OptionalText(v)) => {
            Arc::make_mut(&mut form.diagnostik).behandlungsplan = v
        }
        (path, value) => {
            return Err(FormError::KindMismatch {
                path: path.as_str().to_string(),
                expected: path.kind(),
                found: value.kind(),
            })
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_path_round_trips_through_its_name() {
        for path in FieldPath::ALL {
            assert_eq!(FieldPath::parse(path.as_str()).unwrap(), path);
        }
    }

    #[test]
    fn typo_fails_with_suggestion() {
        let err = FieldPath::parse("beruf.arbeitslosigkeit.dauerr").unwrap_err();
        assert_eq!(
            err,
            FormError::UnresolvablePath {
                path: "beruf.arbeitslosigkeit.dauerr".into(),
                suggestion: Some("beruf.arbeitslosigkeit.dauer".into()),
            }
        );
    }

    #[test]
    fn unrelated_name_has_no_suggestion() {
        let err = "kontakt.telefonnummer".parse::<FieldPath>().unwrap_err();
        assert!(matches!(
            err,
            FormError::UnresolvablePath {
                suggestion: None,
                ..
            }
        ));
    }

    #[test]
    fn write_below_absent_record_fails() {
        let form = Form::new();
        let err = set_field(
            &form,
            FieldPath::ArbeitslosigkeitDauer,
            FieldValue::Text("6 Monate".into()),
        )
        .unwrap_err();
        assert_eq!(
            err,
            FormError::AbsentBranch {
                path: "beruf.arbeitslosigkeit.dauer".into()
            }
        );
        assert!(get_field(&form, FieldPath::PromotionFach).is_err());
    }

    #[test]
    fn write_below_present_record_succeeds() {
        let form = set_field(
            &Form::new(),
            FieldPath::Arbeitslosigkeit,
            FieldValue::Unemployment(Some(Arbeitslosigkeit {
                dauer: "3 Monate".into(),
                leistungsbezug: false,
            })),
        )
        .unwrap();
        let form = set_field(
            &form,
            FieldPath::ArbeitslosigkeitDauer,
            FieldValue::Text("6 Monate".into()),
        )
        .unwrap();
        assert_eq!(
            form.beruf.arbeitslosigkeit.as_ref().unwrap().dauer,
            "6 Monate"
        );
    }

    #[test]
    fn blank_record_text_is_rejected() {
        let blank_record = set_field(
            &Form::new(),
            FieldPath::Arbeitslosigkeit,
            FieldValue::Unemployment(Some(Arbeitslosigkeit {
                dauer: "  ".into(),
                leistungsbezug: true,
            })),
        );
        assert!(matches!(blank_record, Err(FormError::InvalidValue { .. })));

        let half_doctorate = set_field(
            &Form::new(),
            FieldPath::Promotion,
            FieldValue::Doctorate(Some(Promotion {
                fach: "Chemie".into(),
                status: String::new(),
            })),
        );
        assert!(matches!(half_doctorate, Err(FormError::InvalidValue { .. })));
    }

    #[test]
    fn blank_nested_text_keeps_the_record_complete() {
        let form = set_field(
            &Form::new(),
            FieldPath::Promotion,
            FieldValue::Doctorate(Some(Promotion {
                fach: "Chemie".into(),
                status: "abgeschlossen".into(),
            })),
        )
        .unwrap();
        let err = set_field(&form, FieldPath::PromotionFach, FieldValue::Text(String::new()))
            .unwrap_err();
        assert_eq!(
            err,
            FormError::InvalidValue {
                path: "bildung.promotion.fach".into(),
                message: "required text of a present record cannot be blank".into(),
            }
        );
        assert_eq!(
            get_field(&form, FieldPath::PromotionFach).unwrap(),
            FieldValue::Text("Chemie".into())
        );
    }

    #[test]
    fn failed_nested_write_does_not_copy_the_chapter() {
        let form = Form::new();
        let mut next = form.clone();
        assert!(unemployment_mut(FieldPath::Leistungsbezug, &mut next).is_err());
        assert!(Arc::ptr_eq(&form.beruf, &next.beruf));
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let err = set_field(&Form::new(), FieldPath::Alter, FieldValue::Flag(true)).unwrap_err();
        assert!(matches!(err, FormError::KindMismatch { .. }));
        assert!(set_boolean(&Form::new(), FieldPath::Chiffre, true).is_err());
    }

    #[test]
    fn write_reallocates_only_the_touched_chapter() {
        let form = Form::new();
        let next = set_boolean(&form, FieldPath::Erwerbstaetig, true).unwrap();
        assert!(!Arc::ptr_eq(&form.beruf, &next.beruf));
        assert!(Arc::ptr_eq(&form.stammdaten, &next.stammdaten));
        assert!(Arc::ptr_eq(&form.befund, &next.befund));
        assert!(!form.beruf.erwerbstaetig);
        assert!(next.beruf.erwerbstaetig);
    }

    #[test]
    fn blank_values_are_detected() {
        assert!(FieldValue::OptionalText(Some("  ".into())).is_blank());
        assert!(!FieldValue::Flag(false).is_blank());
        assert!(FieldValue::List(Vec::new()).is_blank());
    }

    #[test]
    fn values_render_for_display() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(FieldValue::Date(Some(date)).to_string(), "05.03.2024");
        assert_eq!(FieldValue::OptionalText(None).to_string(), "-");
        assert_eq!(
            FieldValue::List(vec!["Schlafstörung".into(), "Grübeln".into()]).to_string(),
            "Schlafstörung, Grübeln"
        );
    }
}
