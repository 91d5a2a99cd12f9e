// larder-server/src/flows/mod.rs

//! Account flows built on `larder::flow`. Each is built once at startup and shared.

pub mod contexts;
pub mod signin_flow;
pub mod signup_flow;

use crate::errors::AppError;
use contexts::{SigninCtxData, SignupCtxData};
use larder::flow::{Flow, FlowContext, FlowOutcome};
use larder::models::User;
use larder::UserStore;
use tracing::instrument;

pub struct AuthFlows {
  signup: Flow<SignupCtxData, AppError>,
  signin: Flow<SigninCtxData, AppError>,
}

impl AuthFlows {
  pub fn new(users: UserStore) -> Self {
    Self {
      signup: signup_flow::build_signup_flow(users.clone()),
      signin: signin_flow::build_signin_flow(users),
    }
  }

  #[instrument(name = "AuthFlows::signup", skip(self, password))]
  pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User, AppError> {
    let ctx = FlowContext::new(SignupCtxData {
      name: name.to_string(),
      email: email.to_string(),
      password: password.to_string(),
      created_user: None,
    });
    if self.signup.run(ctx.clone()).await? == FlowOutcome::Halted {
      return Err(AppError::Internal("Signup was halted by an internal step.".to_string()));
    }
    let created = ctx.write().created_user.take();
    created.ok_or_else(|| AppError::Internal("Signup completed without creating a user.".to_string()))
  }

  #[instrument(name = "AuthFlows::signin", skip(self, password))]
  pub async fn signin(&self, email: &str, password: &str) -> Result<User, AppError> {
    let ctx = FlowContext::new(SigninCtxData {
      email: email.to_string(),
      password: password.to_string(),
      ..Default::default()
    });
    if self.signin.run(ctx.clone()).await? == FlowOutcome::Halted {
      return Err(AppError::Auth("Authentication was unexpectedly halted.".to_string()));
    }
    let mut guard = ctx.write();
    match (guard.authenticated, guard.candidate.take()) {
      (true, Some(user)) => Ok(user),
      _ => Err(AppError::Auth("Invalid email or password.".to_string())),
    }
  }
}
