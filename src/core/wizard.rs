//! Wizard navigation over the chapters of the intake.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::core::path::FieldPath;
use crate::core::validation::{self, IDENTIFICATION};
use crate::errors::FormError;
use crate::form::Form;

/// One top-level chapter of the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDefinition {
    pub number: u8,
    pub key: &'static str,
    pub title: &'static str,
    /// Titles of the substeps; empty when the step has none.
    pub substeps: &'static [&'static str],
    /// Paths that gate leaving this step.
    pub required: &'static [FieldPath],
    /// Form chapters answered on this step.
    pub chapters: &'static [&'static str],
}

impl StepDefinition {
    pub const fn new(key: &'static str, title: &'static str) -> Self {
        Self {
            number: 0,
            key,
            title,
            substeps: &[],
            required: &[],
            chapters: &[],
        }
    }

    pub const fn with_substeps(mut self, substeps: &'static [&'static str]) -> Self {
        self.substeps = substeps;
        self
    }

    pub const fn with_required(mut self, required: &'static [FieldPath]) -> Self {
        self.required = required;
        self
    }

    pub const fn with_chapters(mut self, chapters: &'static [&'static str]) -> Self {
        self.chapters = chapters;
        self
    }

    /// Plans reject steps with more than `u8::MAX` substeps.
    pub fn substep_count(&self) -> u8 {
        u8::try_from(self.substeps.len()).unwrap_or(u8::MAX)
    }

    pub fn has_substeps(&self) -> bool {
        !self.substeps.is_empty()
    }
}

/// Ordered list of steps. The last step is the review step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPlan {
    steps: Vec<StepDefinition>,
}

impl StepPlan {
    /// Numbers the steps from 1. `None` for an empty plan, or when the steps
    /// or the substeps of one step do not fit the `u8` numbering.
    pub fn new(steps: Vec<StepDefinition>) -> Option<Self> {
        let too_long = |len: usize| u8::try_from(len).is_err();
        if steps.is_empty()
            || too_long(steps.len())
            || steps.iter().any(|step| too_long(step.substeps.len()))
        {
            return None;
        }
        Some(Self::numbered(steps))
    }

    /// The eight chapters of the clinical intake.
    pub fn intake() -> Self {
        Self::numbered(vec![
            StepDefinition::new("stammdaten", "Stammdaten")
                .with_required(IDENTIFICATION)
                .with_chapters(&["stammdaten"]),
            StepDefinition::new("symptomatik", "Symptomatik").with_chapters(&["symptomatik"]),
            StepDefinition::new("lebensgeschichte", "Lebensgeschichte")
                .with_substeps(&["Beruf und Bildung", "Familie und Wohnen"])
                .with_chapters(&["beruf", "bildung", "familie"]),
            StepDefinition::new("somatik", "Somatik")
                .with_substeps(&["Medikation", "Drogenkonsum"])
                .with_chapters(&["medikation", "drogenkonsum"]),
            StepDefinition::new("befund", "Psychischer Befund").with_chapters(&["befund"]),
            StepDefinition::new("vorbehandlungen", "Vorbehandlungen")
                .with_chapters(&["vorbehandlungen"]),
            StepDefinition::new("verhaltensanalyse", "Verhaltensanalyse")
                .with_substeps(&["SORKC", "Störungsmodell", "Diagnostik"])
                .with_chapters(&["verhaltensanalyse", "stoerungsmodell", "diagnostik"]),
            StepDefinition::new("zusammenfassung", "Zusammenfassung"),
        ])
    }

    fn numbered(steps: Vec<StepDefinition>) -> Self {
        let steps = steps
            .into_iter()
            .zip(1..=u8::MAX)
            .map(|(mut step, number)| {
                step.number = number;
                step
            })
            .collect();
        Self { steps }
    }

    pub fn len(&self) -> u8 {
        u8::try_from(self.steps.len()).unwrap_or(u8::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, number: u8) -> Option<&StepDefinition> {
        let index = usize::from(number).checked_sub(1)?;
        self.steps.get(index)
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    /// Step on which `chapter` is answered.
    pub fn for_chapter(&self, chapter: &str) -> Option<&StepDefinition> {
        self.steps
            .iter()
            .find(|step| step.chapters.contains(&chapter))
    }

    pub fn find(&self, key: &str) -> Option<&StepDefinition> {
        self.steps
            .iter()
            .find(|step| step.key.eq_ignore_ascii_case(key.trim()))
    }
}

impl Default for StepPlan {
    fn default() -> Self {
        Self::intake()
    }
}

/// Current position of the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub step: u8,
    /// Current substep of every step that has substeps.
    pub substeps: BTreeMap<u8, u8>,
}

impl WizardState {
    pub fn initial(plan: &StepPlan) -> Self {
        let substeps = plan
            .steps()
            .iter()
            .filter(|step| step.has_substeps())
            .map(|step| (step.number, 1))
            .collect();
        Self { step: 1, substeps }
    }
}

/// Result of a forward navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Advanced(u8),
    Blocked(Vec<FieldPath>),
    AtReview,
}

#[derive(Debug, Clone)]
pub struct WizardController {
    plan: StepPlan,
    state: WizardState,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new(StepPlan::intake())
    }
}

impl WizardController {
    pub fn new(plan: StepPlan) -> Self {
        let state = WizardState::initial(&plan);
        Self { plan, state }
    }

    pub fn plan(&self) -> &StepPlan {
        &self.plan
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> u8 {
        self.state.step
    }

    pub fn current(&self) -> &StepDefinition {
        // The state only ever holds steps of the plan.
        &self.plan.steps[usize::from(self.state.step) - 1]
    }

    /// Substep of the current step, if it has substeps.
    pub fn substep(&self) -> Option<u8> {
        self.substep_of(self.state.step)
    }

    pub fn substep_of(&self, step: u8) -> Option<u8> {
        self.state.substeps.get(&step).copied()
    }

    pub fn is_review(&self) -> bool {
        self.state.step == self.plan.len()
    }

    pub fn missing_requirements(&self, form: &Form) -> Vec<FieldPath> {
        validation::missing_requirements(form, self.current().required)
    }

    /// Whether `next` would advance from the current step.
    pub fn can_proceed(&self, form: &Form) -> bool {
        !self.is_review() && self.missing_requirements(form).is_empty()
    }

    pub fn next(&mut self, form: &Form) -> NavigationOutcome {
        if self.is_review() {
            return NavigationOutcome::AtReview;
        }
        let missing = self.missing_requirements(form);
        if !missing.is_empty() {
            info!(step = self.state.step, missing = missing.len(), "step gate blocked");
            return NavigationOutcome::Blocked(missing);
        }
        self.state.step += 1;
        debug!(step = self.state.step, "advanced");
        NavigationOutcome::Advanced(self.state.step)
    }

    /// Steps back; `false` on the first step.
    pub fn previous(&mut self) -> bool {
        if self.state.step <= 1 {
            return false;
        }
        self.state.step -= 1;
        debug!(step = self.state.step, "stepped back");
        true
    }

    /// Jumps back to an earlier or the current step; forward jumps return
    /// `false`.
    pub fn go_to(&mut self, step: u8) -> Result<bool, FormError> {
        if self.plan.get(step).is_none() {
            return Err(FormError::InvalidStep(step));
        }
        if step > self.state.step {
            return Ok(false);
        }
        self.state.step = step;
        debug!(step, "jumped to step");
        Ok(true)
    }

    /// Sets a step's substep counter, regardless of the step gate.
    pub fn set_substep(&mut self, step: u8, substep: u8) -> Result<(), FormError> {
        let definition = self.plan.get(step).ok_or(FormError::InvalidStep(step))?;
        if substep == 0 || substep > definition.substep_count() {
            return Err(FormError::InvalidSubstep { step, substep });
        }
        self.state.substeps.insert(step, substep);
        debug!(step, substep, "substep set");
        Ok(())
    }

    pub fn next_substep(&mut self) -> bool {
        match self.substep() {
            Some(current) if current < self.current().substep_count() => self
                .set_substep(self.state.step, current + 1)
                .is_ok(),
            _ => false,
        }
    }

    pub fn previous_substep(&mut self) -> bool {
        match self.substep() {
            Some(current) if current > 1 => self.set_substep(self.state.step, current - 1).is_ok(),
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.state = WizardState::initial(&self.plan);
    }

    /// Human-readable position, e.g. `Schritt 3/8: Lebensgeschichte (1/2 Beruf und Bildung)`.
    pub fn progress_label(&self) -> String {
        let step = self.current();
        let mut label = format!("Schritt {}/{}: {}", step.number, self.plan.len(), step.title);
        if let Some(substep) = self.substep() {
            let title = step
                .substeps
                .get(usize::from(substep) - 1)
                .copied()
                .unwrap_or_default();
            label.push_str(&format!(
                " ({}/{} {})",
                substep,
                step.substep_count(),
                title
            ));
        }
        label
    }
}
