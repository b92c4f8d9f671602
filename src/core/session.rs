use crate::config::Config;
use crate::core::expansion::SectionExpansion;
use crate::core::store::FormStore;
use crate::core::submission::{
    PendingSubmission, ReportGenerator, Settlement, SubmissionLifecycle,
};
use crate::core::wizard::{NavigationOutcome, WizardController};
use crate::form::Form;

/// Everything one intake session holds: the Form, the wizard position, the
/// expanded sections and the submission lifecycle.
#[derive(Debug, Clone)]
pub struct IntakeSession {
    store: FormStore,
    wizard: WizardController,
    expansion: SectionExpansion,
    submission: SubmissionLifecycle,
}

impl Default for IntakeSession {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl IntakeSession {
    pub fn new(config: &Config) -> Self {
        Self {
            store: FormStore::new(),
            wizard: WizardController::default(),
            expansion: SectionExpansion::new(config.expanded_sections.iter().cloned()),
            submission: SubmissionLifecycle::new(),
        }
    }

    pub fn form(&self) -> &Form {
        self.store.form()
    }

    pub fn store(&self) -> &FormStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut FormStore {
        &mut self.store
    }

    pub fn wizard(&self) -> &WizardController {
        &self.wizard
    }

    pub fn wizard_mut(&mut self) -> &mut WizardController {
        &mut self.wizard
    }

    pub fn expansion(&self) -> &SectionExpansion {
        &self.expansion
    }

    pub fn expansion_mut(&mut self) -> &mut SectionExpansion {
        &mut self.expansion
    }

    pub fn submission(&self) -> &SubmissionLifecycle {
        &self.submission
    }

    pub fn can_proceed(&self) -> bool {
        self.wizard.can_proceed(self.store.form())
    }

    /// Advances the wizard, gated on the current Form.
    pub fn next(&mut self) -> NavigationOutcome {
        self.wizard.next(self.store.form())
    }

    /// Captures the current Form and marks the submission as loading.
    pub fn begin_submission(&mut self) -> Option<PendingSubmission> {
        let snapshot = self.store.snapshot();
        self.submission.begin(snapshot)
    }

    pub fn settle(&mut self, settlement: Settlement) -> bool {
        self.submission.settle(settlement)
    }

    /// Runs a whole submission. `false` when one was already in flight.
    pub async fn submit(&mut self, generator: &dyn ReportGenerator) -> bool {
        let Some(pending) = self.begin_submission() else {
            return false;
        };
        let settlement = pending.run(generator).await;
        self.settle(settlement)
    }

    /// Full session reset.
    pub fn reset(&mut self) {
        self.store.reset();
        self.wizard.reset();
        self.expansion.reset();
        self.submission.reset();
        tracing::info!("session reset");
    }
}
