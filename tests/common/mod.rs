#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use chrono::NaiveDate;
use intake_core::{
    config::ConfigManager,
    core::{set_field, FieldPath, FieldValue, GeneratedText, ReportGenerator},
    errors::ReportError,
    form::{Form, Geschlecht},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a config manager backed by a unique directory.
pub fn setup_config_manager() -> ConfigManager {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    ConfigManager::with_base_dir(base).expect("create config manager for temp dir")
}

/// Form with every identification field of step 1 answered.
pub fn identified_form() -> Form {
    let answers = [
        (FieldPath::Geschlecht, FieldValue::Gender(Some(Geschlecht::Weiblich))),
        (FieldPath::Alter, FieldValue::Number(Some(41))),
        (FieldPath::Chiffre, FieldValue::OptionalText(Some("K-41".into()))),
        (
            FieldPath::Datum,
            FieldValue::Date(NaiveDate::from_ymd_opt(2024, 6, 1)),
        ),
    ];
    answers
        .into_iter()
        .fold(Form::new(), |form, (path, value)| {
            set_field(&form, path, value).expect("identification paths accept their values")
        })
}

/// Answers with the patient code it was given.
pub struct EchoGenerator;

#[async_trait]
impl ReportGenerator for EchoGenerator {
    async fn generate(&self, form: &Form) -> Result<GeneratedText, ReportError> {
        Ok(GeneratedText {
            text: form.stammdaten.chiffre.clone().unwrap_or_default(),
            ..GeneratedText::default()
        })
    }
}

/// Fails the first `failures` calls, then succeeds.
pub struct FlakyGenerator {
    failures: AtomicUsize,
}

impl FlakyGenerator {
    pub fn new(failures: usize) -> Self {
        Self {
            failures: AtomicUsize::new(failures),
        }
    }
}

#[async_trait]
impl ReportGenerator for FlakyGenerator {
    async fn generate(&self, form: &Form) -> Result<GeneratedText, ReportError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(ReportError::Unavailable("503 from report service".into()));
        }
        EchoGenerator.generate(form).await
    }
}
