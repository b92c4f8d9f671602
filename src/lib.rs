#![doc(test(attr(deny(warnings))))]

//! Intake Core holds the state engine behind a clinical intake questionnaire:
//! path-addressed answers, id-keyed entry collections, exclusive facet sets,
//! gated wizard navigation and the report submission lifecycle, plus a shell
//! that drives them.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod form;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Intake Core tracing initialized.");
    });
}
