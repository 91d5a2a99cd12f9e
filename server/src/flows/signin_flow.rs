// larder-server/src/flows/signin_flow.rs

use crate::errors::AppError;
use crate::flows::contexts::SigninCtxData;
use crate::services::auth_service;
use larder::flow::{Flow, FlowContext, StepControl};
use larder::UserStore;
use tracing::warn;

pub const VALIDATE_STEP: &str = "validate_signin_input";
pub const LOAD_USER_STEP: &str = "load_user";
pub const VERIFY_PASSWORD_STEP: &str = "verify_password";

// Unknown email and wrong password must be indistinguishable to the caller.
const BAD_CREDENTIALS: &str = "Invalid email or password.";

pub fn build_signin_flow(users: UserStore) -> Flow<SigninCtxData, AppError> {
  let mut flow = Flow::<SigninCtxData, AppError>::new(
    "signin",
    &[(VALIDATE_STEP, false), (LOAD_USER_STEP, false), (VERIFY_PASSWORD_STEP, false)],
  );

  flow.on(VALIDATE_STEP, |ctx: FlowContext<SigninCtxData>| async move {
    let missing = {
      let guard = ctx.read();
      guard.email.trim().is_empty() || guard.password.is_empty()
    };
    if missing {
      return Err(AppError::Validation("Email and password are required.".to_string()));
    }
    Ok(StepControl::Continue)
  });

  flow.on(LOAD_USER_STEP, move |ctx: FlowContext<SigninCtxData>| {
    let users = users.clone();
    async move {
      let email = ctx.read().email.clone();
      match users.find_by_email(&email).await? {
        Some(user) => {
          ctx.write().candidate = Some(user);
          Ok::<_, AppError>(StepControl::Continue)
        }
        None => {
          warn!("Signin for an unknown email.");
          Err(AppError::Auth(BAD_CREDENTIALS.to_string()))
        }
      }
    }
  });

  flow.on(VERIFY_PASSWORD_STEP, |ctx: FlowContext<SigninCtxData>| async move {
    let (stored_hash, password) = {
      let guard = ctx.read();
      let user = guard
        .candidate
        .as_ref()
        .ok_or_else(|| AppError::Internal("password check without a loaded user".to_string()))?;
      (user.password_hash.clone(), guard.password.clone())
    };
    if !auth_service::verify_password(&stored_hash, &password)? {
      warn!("Signin with a wrong password.");
      return Err(AppError::Auth(BAD_CREDENTIALS.to_string()));
    }
    ctx.write().authenticated = true;
    Ok::<_, AppError>(StepControl::Continue)
  });

  flow
}
