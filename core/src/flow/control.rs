// larder/src/flow/control.rs

/// Returned by a handler to tell the flow what to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  Continue,
  /// Stop the whole flow; no further handlers or steps run.
  Halt,
}

/// How a flow run ended when no handler returned an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
  Completed,
  Halted,
}
