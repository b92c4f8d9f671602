//! Submission lifecycle around the asynchronous report generation call.
//!
//! A submission is split into three phases so that the Form stays editable
//! while the backend works:
//!
//! 1. [`SubmissionLifecycle::begin`] captures the Form snapshot and moves to
//!    `Loading`; it refuses while a submission is already in flight.
//! 2. [`PendingSubmission::run`] awaits the [`ReportGenerator`] without
//!    borrowing any session state.
//! 3. [`SubmissionLifecycle::settle`] stores the outcome, provided the ticket
//!    still matches the one that is loading.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::ReportError;
use crate::form::Form;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportSection {
    pub heading: String,
    pub paragraphs: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportStructure {
    pub content: Vec<ReportSection>,
}

/// Report returned by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedText {
    pub structure: ReportStructure,
    pub text: String,
    pub highlighted_sentences: Vec<String>,
    pub highlight_timestamp: Option<DateTime<Utc>>,
}

/// Backend that turns a Form snapshot into report text.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(&self, form: &Form) -> Result<GeneratedText, ReportError>;
}

/// Identifies one submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionTicket(u64);

impl fmt::Display for SubmissionTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Loading {
        ticket: SubmissionTicket,
    },
    Success(GeneratedText),
    Error(String),
}

impl SubmissionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SubmissionState::Loading { .. })
    }

    pub fn result(&self) -> Option<&GeneratedText> {
        match self {
            SubmissionState::Success(text) => Some(text),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SubmissionState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// A submission that has been started but not yet run.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    ticket: SubmissionTicket,
    snapshot: Form,
}

impl PendingSubmission {
    pub fn ticket(&self) -> SubmissionTicket {
        self.ticket
    }

    /// Form captured when the submission began.
    pub fn snapshot(&self) -> &Form {
        &self.snapshot
    }

    pub async fn run(self, generator: &dyn ReportGenerator) -> Settlement {
        let outcome = generator
            .generate(&self.snapshot)
            .await
            .map_err(|err| err.to_string());
        Settlement {
            ticket: self.ticket,
            outcome,
        }
    }
}

/// Outcome of a finished backend call, ready to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub ticket: SubmissionTicket,
    pub outcome: Result<GeneratedText, String>,
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionLifecycle {
    state: SubmissionState,
    issued: u64,
}

impl SubmissionLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn result(&self) -> Option<&GeneratedText> {
        self.state.result()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    /// Starts a submission of `snapshot`. `None` while another one is loading.
    pub fn begin(&mut self, snapshot: Form) -> Option<PendingSubmission> {
        if let SubmissionState::Loading { ticket } = self.state {
            warn!(%ticket, "submission already in flight");
            return None;
        }
        self.issued += 1;
        let ticket = SubmissionTicket(self.issued);
        self.state = SubmissionState::Loading { ticket };
        info!(%ticket, "submission started");
        Some(PendingSubmission { ticket, snapshot })
    }

    /// Applies a finished call. Settlements of stale tickets are dropped.
    pub fn settle(&mut self, settlement: Settlement) -> bool {
        match self.state {
            SubmissionState::Loading { ticket } if ticket == settlement.ticket => {}
            _ => {
                warn!(ticket = %settlement.ticket, "stale settlement dropped");
                return false;
            }
        }
        self.state = match settlement.outcome {
            Ok(text) => {
                info!(ticket = %settlement.ticket, "submission succeeded");
                SubmissionState::Success(text)
            }
            Err(message) => {
                info!(ticket = %settlement.ticket, error = %message, "submission failed");
                SubmissionState::Error(message)
            }
        };
        true
    }

    /// Back to `Idle`; a submission still in flight will settle as stale.
    pub fn reset(&mut self) {
        self.state = SubmissionState::Idle;
    }
}
