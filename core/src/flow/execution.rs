// larder/src/flow/execution.rs

//! `Flow::run`, which walks the steps in order against one shared context.

use super::context::FlowContext;
use super::control::{FlowOutcome, StepControl};
use super::definition::{Flow, StepHandler};
use super::error::FlowError;
use tracing::{event, instrument, span, Instrument, Level};

impl<T, E> Flow<T, E>
where
  T: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every step against `ctx`.
  ///
  /// Returns `Halted` as soon as a handler asks for it, the first handler error as-is,
  /// and `FlowError::HandlerMissing` (converted into `E`) for a required step that
  /// nobody handles.
  #[instrument(name = "Flow::run", skip_all, fields(flow = %self.name, num_steps = self.steps.len()), err(Display))]
  pub async fn run(&self, ctx: FlowContext<T>) -> Result<FlowOutcome, E> {
    event!(Level::DEBUG, "Flow run starting.");

    for (step_idx, step) in self.steps.iter().enumerate() {
      let step_span = span!(
        Level::INFO,
        "flow_step",
        step_name = step.name.as_str(),
        step_index = step_idx,
        optional = step.optional
      );

      let on_handlers = self.on.get(&step.name).filter(|v| !v.is_empty());
      let after_handlers = self.after.get(&step.name).filter(|v| !v.is_empty());

      if on_handlers.is_none() && after_handlers.is_none() {
        if step.optional {
          event!(parent: &step_span, Level::DEBUG, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(parent: &step_span, Level::ERROR, "Required step has no handlers.");
        return Err(E::from(FlowError::HandlerMissing {
          step_name: step.name.clone(),
        }));
      }

      for (phase, handlers) in [("on", on_handlers), ("after", after_handlers)] {
        let Some(handlers) = handlers else { continue };
        let control = run_phase(handlers, &ctx, phase).instrument(step_span.clone()).await?;
        if control == StepControl::Halt {
          event!(parent: &step_span, Level::INFO, phase, "Flow halted by handler.");
          return Ok(FlowOutcome::Halted);
        }
      }
    }

    event!(Level::DEBUG, "Flow run completed.");
    Ok(FlowOutcome::Completed)
  }
}

async fn run_phase<T, E>(handlers: &[StepHandler<T, E>], ctx: &FlowContext<T>, phase: &str) -> Result<StepControl, E>
where
  T: 'static + Send + Sync,
  E: std::error::Error + Send + Sync + 'static,
{
  for (handler_idx, handler) in handlers.iter().enumerate() {
    match handler(ctx.clone()).await {
      Ok(StepControl::Continue) => {}
      Ok(StepControl::Halt) => return Ok(StepControl::Halt),
      Err(e) => {
        event!(Level::ERROR, error = %e, phase, handler_index = handler_idx, "Handler failed.");
        return Err(e);
      }
    }
  }
  Ok(StepControl::Continue)
}
