//! Id-keyed collections embedded in the [`Form`].
//!
//! Each collection is described by a marker type implementing [`Collection`];
//! the free functions here are pure (they return a new Form) and
//! [`CollectionHandler`] applies them to a [`FormStore`].

use std::{marker::PhantomData, sync::Arc};

use tracing::{debug, warn};

use crate::core::{path::FieldPath, store::FormStore};
use crate::errors::FormError;
use crate::form::{
    Drogenkonsum, Entry, EntryData, EntryId, Form, Kind, KindPatch, Medikament, Medikation,
    Modellfaktor, SorkcAnalyse, Stoerungsmodell, Substanzkonsum, Verhaltensanalyse,
    Vorbehandlung, Vorbehandlungen,
};

/// Location of one entry list and of the sub-record that owns it.
pub trait Collection {
    type Item: EntryData;
    type Owner: Clone + Default + 'static;

    /// Name used by the shell and in log events.
    const NAME: &'static str;

    fn owner(form: &Form) -> &Arc<Self::Owner>;

    fn owner_mut(form: &mut Form) -> &mut Arc<Self::Owner>;

    fn list(owner: &Self::Owner) -> &Vec<Entry<Self::Item>>;

    fn list_mut(owner: &mut Self::Owner) -> &mut Vec<Entry<Self::Item>>;
}

macro_rules! collection {
    ($marker:ident, $name:literal, $item:ty, $owner:ty, $chapter:ident, $list:ident) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $marker;

        impl Collection for $marker {
            type Item = $item;
            type Owner = $owner;

            const NAME: &'static str = $name;

            fn owner(form: &Form) -> &Arc<$owner> {
                &form.$chapter
            }

            fn owner_mut(form: &mut Form) -> &mut Arc<$owner> {
                &mut form.$chapter
            }

            fn list(owner: &$owner) -> &Vec<Entry<$item>> {
                &owner.$list
            }

            fn list_mut(owner: &mut $owner) -> &mut Vec<Entry<$item>> {
                &mut owner.$list
            }
        }
    };
}

collection!(Medications, "medikation", Medikament, Medikation, medikation, eintraege);
collection!(DrugUse, "drogenkonsum", Substanzkonsum, Drogenkonsum, drogenkonsum, eintraege);
collection!(
    PriorTreatments,
    "vorbehandlungen",
    Vorbehandlung,
    Vorbehandlungen,
    vorbehandlungen,
    eintraege
);
collection!(SorkcAnalyses, "sorkc", SorkcAnalyse, Verhaltensanalyse, verhaltensanalyse, sorkc);
collection!(
    DisorderModel,
    "stoerungsmodell",
    Modellfaktor,
    Stoerungsmodell,
    stoerungsmodell,
    eintraege
);

/// Names accepted by [`with_collection!`](crate::with_collection).
pub const COLLECTION_NAMES: [&str; 5] = [
    Medications::NAME,
    DrugUse::NAME,
    PriorTreatments::NAME,
    SorkcAnalyses::NAME,
    DisorderModel::NAME,
];

/// Dispatches a runtime collection name to a generic body.
///
/// `with_collection!(name, C => expr)` evaluates `expr` with `C` bound to the
/// marker type and yields `Some(result)`, or `None` for an unknown name.
#[macro_export]
macro_rules! with_collection {
    ($name:expr, $marker:ident => $body:expr) => {{
        use $crate::core::collections::{
            Collection as _, DisorderModel, DrugUse, Medications, PriorTreatments, SorkcAnalyses,
        };
        match $name {
            name if name == Medications::NAME => {
                type $marker = Medications;
                Some($body)
            }
            name if name == DrugUse::NAME => {
                type $marker = DrugUse;
                Some($body)
            }
            name if name == PriorTreatments::NAME => {
                type $marker = PriorTreatments;
                Some($body)
            }
            name if name == SorkcAnalyses::NAME => {
                type $marker = SorkcAnalyses;
                Some($body)
            }
            name if name == DisorderModel::NAME => {
                type $marker = DisorderModel;
                Some($body)
            }
            _ => None,
        }
    }};
}

pub fn entries<C: Collection>(form: &Form) -> &[Entry<C::Item>] {
    C::list(C::owner(form))
}

pub fn find<C: Collection>(form: &Form, id: EntryId) -> Option<&Entry<C::Item>> {
    entries::<C>(form).iter().find(|entry| entry.id == id)
}

fn fresh_id<T>(live: &[Entry<T>]) -> EntryId {
    loop {
        let id = EntryId::generate();
        if live.iter().all(|entry| entry.id != id) {
            return id;
        }
    }
}

/// Appends a new entry built from `defaults` and returns its id.
pub fn add<C: Collection>(form: &Form, defaults: C::Item) -> (Form, EntryId) {
    let id = fresh_id(entries::<C>(form));
    let mut next = form.clone();
    C::list_mut(Arc::make_mut(C::owner_mut(&mut next))).push(Entry::new(id, defaults));
    debug!(collection = C::NAME, id = %id, "entry added");
    (next, id)
}

/// Shallow-merges `patch` into the entry with `id`. `None` when no such entry
/// exists.
pub fn update<C: Collection>(
    form: &Form,
    id: EntryId,
    patch: <C::Item as EntryData>::Patch,
) -> Option<Form> {
    let Some(position) = entries::<C>(form).iter().position(|entry| entry.id == id) else {
        warn!(collection = C::NAME, id = %id, "update ignored: no such entry");
        return None;
    };
    let mut next = form.clone();
    C::list_mut(Arc::make_mut(C::owner_mut(&mut next)))[position]
        .data
        .merge(patch);
    debug!(collection = C::NAME, id = %id, "entry updated");
    Some(next)
}

/// Drops the entry with `id`. `None` when no such entry exists.
pub fn remove<C: Collection>(form: &Form, id: EntryId) -> Option<Form> {
    if find::<C>(form, id).is_none() {
        warn!(collection = C::NAME, id = %id, "remove ignored: no such entry");
        return None;
    }
    let mut next = form.clone();
    C::list_mut(Arc::make_mut(C::owner_mut(&mut next))).retain(|entry| entry.id != id);
    debug!(collection = C::NAME, id = %id, "entry removed");
    Some(next)
}

/// Resets the whole owning sub-record to its empty shape.
pub fn clear<C: Collection>(form: &Form) -> Form {
    let mut next = form.clone();
    *C::owner_mut(&mut next) = Arc::new(C::Owner::default());
    debug!(collection = C::NAME, "collection cleared");
    next
}

/// Largest number of children the family chapter records.
pub const MAX_CHILDREN: usize = 20;

/// Sets the number of children.
///
/// Starting from an unanswered list every child is blank. Later changes keep
/// the leading children and append blanks or truncate.
pub fn resize_children(form: &Form, count: usize) -> Result<Form, FormError> {
    if count > MAX_CHILDREN {
        return Err(too_many_children(count));
    }
    let mut next = form.clone();
    let familie = Arc::make_mut(&mut next.familie);
    let kinder = familie.kinder.get_or_insert_with(Vec::new);
    kinder.resize_with(count, Kind::default);
    debug!(count, "children resized");
    Ok(next)
}

pub(crate) fn too_many_children(count: usize) -> FormError {
    FormError::InvalidValue {
        path: FieldPath::Kinder.as_str().to_string(),
        message: format!("{} children exceed the limit of {}", count, MAX_CHILDREN),
    }
}

/// Edits the child at `index`. `None` when the index is out of range.
pub fn update_child(form: &Form, index: usize, patch: KindPatch) -> Option<Form> {
    let in_range = form
        .familie
        .kinder
        .as_ref()
        .map_or(false, |kinder| index < kinder.len());
    if !in_range {
        warn!(index, "child update ignored: no such child");
        return None;
    }
    let mut next = form.clone();
    if let Some(child) = Arc::make_mut(&mut next.familie)
        .kinder
        .as_mut()
        .and_then(|kinder| kinder.get_mut(index))
    {
        child.merge(patch);
    }
    debug!(index, "child updated");
    Some(next)
}

/// Operation set over one collection of a [`FormStore`].
pub struct CollectionHandler<'a, C: Collection> {
    store: &'a mut FormStore,
    marker: PhantomData<C>,
}

impl<'a, C: Collection> CollectionHandler<'a, C> {
    pub(crate) fn new(store: &'a mut FormStore) -> Self {
        Self {
            store,
            marker: PhantomData,
        }
    }

    pub fn entries(&self) -> &[Entry<C::Item>] {
        entries::<C>(self.store.form())
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry<C::Item>> {
        find::<C>(self.store.form(), id)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn add(&mut self, defaults: C::Item) -> EntryId {
        let (next, id) = add::<C>(self.store.form(), defaults);
        self.store.replace(next);
        id
    }

    /// Returns `false` and leaves the store untouched for an unknown id.
    pub fn update(&mut self, id: EntryId, patch: <C::Item as EntryData>::Patch) -> bool {
        match update::<C>(self.store.form(), id, patch) {
            Some(next) => {
                self.store.replace(next);
                true
            }
            None => false,
        }
    }

    /// Returns `false` and leaves the store untouched for an unknown id.
    pub fn remove(&mut self, id: EntryId) -> bool {
        match remove::<C>(self.store.form(), id) {
            Some(next) => {
                self.store.replace(next);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        let next = clear::<C>(self.store.form());
        self.store.replace(next);
    }

    /// Resolves a full id or a unique prefix of its hex form.
    pub fn resolve(&self, needle: &str) -> Option<EntryId> {
        resolve_id(self.entries(), needle)
    }
}

/// Matches `needle` against full ids and unique short-id prefixes.
pub fn resolve_id<T>(list: &[Entry<T>], needle: &str) -> Option<EntryId> {
    let needle = needle.trim().to_lowercase();
    if let Ok(id) = needle.parse::<EntryId>() {
        return list.iter().find(|entry| entry.id == id).map(|entry| entry.id);
    }
    if needle.is_empty() {
        return None;
    }
    let mut matches = list
        .iter()
        .filter(|entry| entry.id.as_uuid().simple().to_string().starts_with(&needle));
    match (matches.next(), matches.next()) {
        (Some(entry), None) => Some(entry.id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{Geschlecht, MedikamentPatch};

    fn sertralin() -> Medikament {
        Medikament {
            praeparat: "Sertralin".into(),
            dosierung: "50 mg".into(),
            ..Medikament::default()
        }
    }

    #[test]
    fn add_then_remove_restores_collection() {
        let (form, _) = add::<Medications>(&Form::new(), sertralin());
        let (with_two, id) = add::<Medications>(&form, Medikament::default());
        let restored = remove::<Medications>(&with_two, id).unwrap();
        assert_eq!(entries::<Medications>(&restored), entries::<Medications>(&form));
    }

    #[test]
    fn update_keeps_identity_and_position() {
        let (form, first) = add::<Medications>(&Form::new(), sertralin());
        let (form, second) = add::<Medications>(&form, Medikament::default());
        let patch = MedikamentPatch {
            dosierung: Some("100 mg".into()),
            ..MedikamentPatch::default()
        };
        let next = update::<Medications>(&form, first, patch).unwrap();
        let list = entries::<Medications>(&next);
        assert_eq!(list[0].id, first);
        assert_eq!(list[1].id, second);
        assert_eq!(list[0].data.dosierung, "100 mg");
        assert_eq!(list[0].data.praeparat, "Sertralin");
    }

    #[test]
    fn update_on_missing_id_is_a_no_op() {
        let (form, _) = add::<PriorTreatments>(&Form::new(), Vorbehandlung::default());
        assert!(update::<PriorTreatments>(&form, EntryId::generate(), Default::default()).is_none());
        assert!(remove::<PriorTreatments>(&form, EntryId::generate()).is_none());
    }

    #[test]
    fn clear_resets_owner_record() {
        let mut form = Form::new();
        Arc::make_mut(&mut form.medikation).keine = true;
        let (form, _) = add::<Medications>(&form, sertralin());
        let cleared = clear::<Medications>(&form);
        assert_eq!(*cleared.medikation, Medikation::default());
        assert!(Arc::ptr_eq(&form.befund, &cleared.befund));
    }

    #[test]
    fn collections_do_not_interfere() {
        let (form, _) = add::<DrugUse>(&Form::new(), Substanzkonsum::default());
        let (form, _) = add::<SorkcAnalyses>(&form, SorkcAnalyse::default());
        assert_eq!(entries::<DrugUse>(&form).len(), 1);
        assert_eq!(entries::<SorkcAnalyses>(&form).len(), 1);
        assert!(entries::<DisorderModel>(&form).is_empty());
    }

    #[test]
    fn children_resize_keeps_leading_entries() {
        let form = resize_children(&Form::new(), 3).unwrap();
        assert_eq!(form.familie.kinder.as_ref().unwrap().len(), 3);
        let form = update_child(
            &form,
            0,
            KindPatch {
                alter: Some(Some(7)),
                geschlecht: Some(Some(Geschlecht::Weiblich)),
            },
        )
        .unwrap();
        let form = resize_children(&form, 1).unwrap();
        let kinder = form.familie.kinder.as_ref().unwrap();
        assert_eq!(kinder.len(), 1);
        assert_eq!(kinder[0].alter, Some(7));
        assert!(update_child(&form, 4, KindPatch::default()).is_none());
    }

    #[test]
    fn children_count_is_bounded() {
        let form = resize_children(&Form::new(), 2).unwrap();
        assert!(resize_children(&form, MAX_CHILDREN).is_ok());
        let err = resize_children(&form, usize::MAX).unwrap_err();
        assert!(matches!(err, FormError::InvalidValue { ref path, .. } if path == "familie.kinder"));
        assert!(resize_children(&form, MAX_CHILDREN + 1).is_err());
    }

    #[test]
    fn short_prefix_resolves_unique_entry() {
        let (form, id) = add::<Medications>(&Form::new(), sertralin());
        let list = entries::<Medications>(&form);
        assert_eq!(resolve_id(list, &id.short()), Some(id));
        assert_eq!(resolve_id(list, &id.to_string()), Some(id));
        assert_eq!(resolve_id(list, ""), None);
    }

    #[test]
    fn collection_names_dispatch() {
        let count = with_collection!("sorkc", C => entries::<C>(&Form::new()).len());
        assert_eq!(count, Some(0));
        assert!(with_collection!("unbekannt", C => C::NAME).is_none());
    }
}
