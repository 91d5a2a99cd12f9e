// larder/src/flow/step.rs

/// A named position in a flow.
///
/// Optional steps may be left without handlers; required ones fail the run with
/// [`FlowError::HandlerMissing`](super::FlowError::HandlerMissing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDef {
  pub name: String,
  pub optional: bool,
}
