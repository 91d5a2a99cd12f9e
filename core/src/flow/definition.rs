// larder/src/flow/definition.rs

//! The `Flow<T, E>` type and the methods that shape it before it runs.

use super::context::FlowContext;
use super::control::StepControl;
use super::error::FlowError;
use super::step::StepDef;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

/// A boxed async handler over `FlowContext<T>`.
///
/// Handlers must release any lock guard on the context before awaiting.
pub type StepHandler<T, E> =
  Box<dyn Fn(FlowContext<T>) -> Pin<Box<dyn Future<Output = Result<StepControl, E>> + Send>> + Send + Sync>;

pub struct Flow<T, E>
where
  T: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) name: String,
  pub(crate) steps: Vec<StepDef>,
  pub(crate) on: HashMap<String, Vec<StepHandler<T, E>>>,
  pub(crate) after: HashMap<String, Vec<StepHandler<T, E>>>,
}

impl<T, E> Flow<T, E>
where
  T: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Builds a flow from `(step_name, optional)` pairs, in execution order.
  pub fn new(name: impl Into<String>, step_defs: &[(&str, bool)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional)| StepDef {
        name: (*name).to_string(),
        optional: *optional,
      })
      .collect();

    Self {
      name: name.into(),
      steps,
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  fn position(&self, step_name: &str) -> Option<usize> {
    self.steps.iter().position(|s| s.name == step_name)
  }

  // Registering a handler on an unknown step is a wiring bug, not a runtime condition.
  fn ensure_step_exists(&self, step_name: &str) {
    if self.position(step_name).is_none() {
      panic!("flow '{}': step '{}' is not defined", self.name, step_name);
    }
  }

  /// Adds a new step right after `existing_step`.
  pub fn insert_after(&mut self, existing_step: &str, new_step: &str, optional: bool) -> Result<(), FlowError> {
    let idx = self.position(existing_step).ok_or_else(|| FlowError::StepNotFound {
      step_name: existing_step.to_string(),
    })?;
    if self.position(new_step).is_some() {
      panic!("flow '{}': step '{}' already exists", self.name, new_step);
    }
    self.steps.insert(
      idx + 1,
      StepDef {
        name: new_step.to_string(),
        optional,
      },
    );
    Ok(())
  }

  pub fn set_optional(&mut self, step_name: &str, optional: bool) -> Result<(), FlowError> {
    let step = self
      .steps
      .iter_mut()
      .find(|s| s.name == step_name)
      .ok_or_else(|| FlowError::StepNotFound {
        step_name: step_name.to_string(),
      })?;
    step.optional = optional;
    Ok(())
  }

  /// Registers the main handler for a step. Several handlers run in registration order.
  pub fn on<F, UserErr>(&mut self, step_name: &str, handler_fn: impl Fn(FlowContext<T>) -> F + Send + Sync + 'static)
  where
    F: Future<Output = Result<StepControl, UserErr>> + Send + 'static,
    UserErr: Into<E> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    let handler = Self::box_handler(handler_fn);
    self.on.entry(step_name.to_string()).or_default().push(handler);
  }

  /// Registers a handler that runs once every `on` handler of the step continued.
  pub fn after<F, UserErr>(&mut self, step_name: &str, handler_fn: impl Fn(FlowContext<T>) -> F + Send + Sync + 'static)
  where
    F: Future<Output = Result<StepControl, UserErr>> + Send + 'static,
    UserErr: Into<E> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    let handler = Self::box_handler(handler_fn);
    self.after.entry(step_name.to_string()).or_default().push(handler);
  }

  fn box_handler<F, UserErr>(handler_fn: impl Fn(FlowContext<T>) -> F + Send + Sync + 'static) -> StepHandler<T, E>
  where
    F: Future<Output = Result<StepControl, UserErr>> + Send + 'static,
    UserErr: Into<E> + Send + Sync + 'static,
  {
    Box::new(move |ctx| {
      let fut = handler_fn(ctx);
      Box::pin(async move { fut.await.map_err(Into::into) })
    })
  }
}
