//! Presence toggles over list fields and exclusive facet sets.

use std::sync::Arc;

use tracing::debug;

use crate::core::path::{self, FieldPath, FieldValue, ValueKind};
use crate::errors::FormError;
use crate::form::{toggle_facet, Form, SuizidFacet, WohnFacet};

/// Removes `value` from the list at `path` when present, appends it otherwise.
///
/// The result never holds duplicates: toggling a value off drops every copy.
pub fn toggle(form: &Form, path: FieldPath, value: &str) -> Result<Form, FormError> {
    if path.kind() != ValueKind::List {
        return Err(FormError::NotAToggleSet {
            path: path.as_str().to_string(),
        });
    }
    let FieldValue::List(mut items) = path::get_field(form, path)? else {
        return Err(FormError::NotAToggleSet {
            path: path.as_str().to_string(),
        });
    };

    if items.iter().any(|item| item == value) {
        items.retain(|item| item != value);
        debug!(path = %path, value, "toggle-set value removed");
    } else {
        items.push(value.to_string());
        debug!(path = %path, value, "toggle-set value added");
    }
    path::set_field(form, path, FieldValue::List(items))
}

pub fn toggle_living(form: &Form, facet: WohnFacet) -> Form {
    let mut next = form.clone();
    let familie = Arc::make_mut(&mut next.familie);
    familie.wohnsituation = toggle_facet(familie.wohnsituation.as_ref(), facet);
    debug!(?facet, "living situation toggled");
    next
}

pub fn toggle_suicidality(form: &Form, facet: SuizidFacet) -> Form {
    let mut next = form.clone();
    let befund = Arc::make_mut(&mut next.befund);
    befund.suizidalitaet = toggle_facet(befund.suizidalitaet.as_ref(), facet);
    debug!(?facet, "suicidality toggled");
    next
}
