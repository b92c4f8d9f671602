//! Step gates evaluated against the live Form.

use crate::core::path::{get_field, FieldPath};
use crate::form::Form;

/// Fields that must be answered before leaving the identification step.
pub const IDENTIFICATION: &[FieldPath] = &[
    FieldPath::Geschlecht,
    FieldPath::Alter,
    FieldPath::Chiffre,
    FieldPath::Datum,
];

/// True when the value at `path` is present and non-blank. A path below an
/// absent record counts as unanswered.
pub fn is_answered(form: &Form, path: FieldPath) -> bool {
    get_field(form, path)
        .map(|value| !value.is_blank())
        .unwrap_or(false)
}

/// Required paths that are still unanswered, in declaration order.
pub fn missing_requirements(form: &Form, required: &[FieldPath]) -> Vec<FieldPath> {
    required
        .iter()
        .copied()
        .filter(|path| !is_answered(form, *path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::path::{set_field, FieldValue};
    use crate::form::Geschlecht;
    use chrono::NaiveDate;

    fn identified() -> Form {
        let form = Form::new();
        let form = set_field(
            &form,
            FieldPath::Geschlecht,
            FieldValue::Gender(Some(Geschlecht::Weiblich)),
        )
        .unwrap();
        let form = set_field(&form, FieldPath::Alter, FieldValue::Number(Some(34))).unwrap();
        let form = set_field(
            &form,
            FieldPath::Chiffre,
            FieldValue::OptionalText(Some("M-1984".into())),
        )
        .unwrap();
        set_field(
            &form,
            FieldPath::Datum,
            FieldValue::Date(NaiveDate::from_ymd_opt(2024, 5, 2)),
        )
        .unwrap()
    }

    #[test]
    fn complete_identification_has_no_gaps() {
        assert!(missing_requirements(&identified(), IDENTIFICATION).is_empty());
    }

    #[test]
    fn blank_code_counts_as_missing() {
        let form = set_field(
            &identified(),
            FieldPath::Chiffre,
            FieldValue::OptionalText(Some("   ".into())),
        )
        .unwrap();
        assert_eq!(missing_requirements(&form, IDENTIFICATION), vec![FieldPath::Chiffre]);
    }

    #[test]
    fn nested_path_under_absent_record_is_unanswered() {
        assert!(!is_answered(&Form::new(), FieldPath::PromotionFach));
    }
}
