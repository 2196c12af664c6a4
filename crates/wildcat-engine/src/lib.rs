//! Oil field simulation for the wildcatting decision engine.
//!
//! This crate is the field/site collaborator of the decision core: it owns the grid of
//! [`Site`]s, the [`Theme`] that bounds every site attribute, the oil price model, and the
//! random fillers used to generate playable fields. The decision core only ever reads from
//! an [`OilField`]; nothing here depends on the evaluator.

pub use self::{core::*, simulation::*};

pub mod core;
pub mod simulation;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("invalid theme: {reason}")]
pub struct InvalidThemeError {
    reason: &'static str,
}

impl InvalidThemeError {
    pub(crate) fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}
