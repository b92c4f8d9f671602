//! Form state engine: path mutation, collections, toggles, wizard navigation
//! and the submission lifecycle.

pub mod collections;
pub mod expansion;
pub mod path;
pub mod session;
pub mod store;
pub mod submission;
pub mod toggle;
pub mod validation;
pub mod wizard;

pub use collections::{
    Collection, CollectionHandler, DisorderModel, DrugUse, Medications, PriorTreatments,
    SorkcAnalyses, MAX_CHILDREN,
};
pub use expansion::SectionExpansion;
pub use path::{get_field, set_boolean, set_field, FieldPath, FieldValue, ValueKind};
pub use session::IntakeSession;
pub use store::FormStore;
pub use submission::{
    GeneratedText, PendingSubmission, ReportGenerator, ReportSection, ReportStructure,
    Settlement, SubmissionLifecycle, SubmissionState, SubmissionTicket,
};
pub use wizard::{NavigationOutcome, StepDefinition, StepPlan, WizardController, WizardState};
