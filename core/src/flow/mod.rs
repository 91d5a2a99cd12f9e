// larder/src/flow/mod.rs

//! A small step pipeline used to sequence multi-stage operations like checkout.
//!
//! A [`Flow`] is an ordered list of named steps. Each step may carry `on` and
//! `after` handlers that receive a clone of the shared [`FlowContext`] and decide
//! whether the flow continues or halts.

pub mod context;
pub mod control;
pub mod definition;
pub mod error;
pub mod execution;
pub mod step;

pub use context::FlowContext;
pub use control::{FlowOutcome, StepControl};
pub use definition::{Flow, StepHandler};
pub use error::FlowError;
pub use step::StepDef;
