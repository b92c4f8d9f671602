use crate::core::collections::{self, Collection, CollectionHandler};
use crate::core::path::{self, FieldPath, FieldValue};
use crate::core::toggle;
use crate::errors::FormError;
use crate::form::{Form, KindPatch, SuizidFacet, WohnFacet};

/// Single owner of the current [`Form`] snapshot.
///
/// Every handler computes a new Form from the current one and hands it to
/// [`FormStore::replace`]; the revision counter lets views notice that the
/// snapshot changed.
#[derive(Debug, Clone, Default)]
pub struct FormStore {
    form: Form,
    revision: u64,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form(form: Form) -> Self {
        Self { form, revision: 0 }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Cheap owned copy of the current Form.
    pub fn snapshot(&self) -> Form {
        self.form.clone()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn replace(&mut self, form: Form) {
        self.form = form;
        self.revision += 1;
    }

    /// Runs a pure Form transformation and stores its result.
    pub fn apply<F>(&mut self, change: F) -> Result<(), FormError>
    where
        F: FnOnce(&Form) -> Result<Form, FormError>,
    {
        let next = change(&self.form)?;
        self.replace(next);
        Ok(())
    }

    pub fn get_field(&self, path: FieldPath) -> Result<FieldValue, FormError> {
        path::get_field(&self.form, path)
    }

    pub fn set_field(&mut self, path: FieldPath, value: FieldValue) -> Result<(), FormError> {
        self.apply(|form| path::set_field(form, path, value))
    }

    pub fn set_boolean(&mut self, path: FieldPath, value: bool) -> Result<(), FormError> {
        self.apply(|form| path::set_boolean(form, path, value))
    }

    pub fn toggle(&mut self, path: FieldPath, value: &str) -> Result<(), FormError> {
        self.apply(|form| toggle::toggle(form, path, value))
    }

    pub fn toggle_living(&mut self, facet: WohnFacet) {
        let next = toggle::toggle_living(&self.form, facet);
        self.replace(next);
    }

    pub fn toggle_suicidality(&mut self, facet: SuizidFacet) {
        let next = toggle::toggle_suicidality(&self.form, facet);
        self.replace(next);
    }

    pub fn set_children_count(&mut self, count: usize) -> Result<(), FormError> {
        let next = collections::resize_children(&self.form, count)?;
        self.replace(next);
        Ok(())
    }

    pub fn update_child(&mut self, index: usize, patch: KindPatch) -> bool {
        match collections::update_child(&self.form, index, patch) {
            Some(next) => {
                self.replace(next);
                true
            }
            None => false,
        }
    }

    pub fn collection<C: Collection>(&mut self) -> CollectionHandler<'_, C> {
        CollectionHandler::new(self)
    }

    /// Drops every answer.
    pub fn reset(&mut self) {
        self.replace(Form::new());
    }
}
