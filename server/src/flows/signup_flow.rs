// larder-server/src/flows/signup_flow.rs

use crate::errors::AppError;
use crate::flows::contexts::SignupCtxData;
use crate::services::auth_service::{self, MIN_PASSWORD_LEN};
use larder::flow::{Flow, FlowContext, StepControl};
use larder::UserStore;
use tracing::{info, warn};

pub const VALIDATE_STEP: &str = "validate_signup_input";
pub const CHECK_EMAIL_STEP: &str = "check_existing_email";
pub const CREATE_USER_STEP: &str = "create_user";

pub fn build_signup_flow(users: UserStore) -> Flow<SignupCtxData, AppError> {
  let mut flow = Flow::<SignupCtxData, AppError>::new(
    "signup",
    &[(VALIDATE_STEP, false), (CHECK_EMAIL_STEP, false), (CREATE_USER_STEP, false)],
  );

  flow.on(VALIDATE_STEP, |ctx: FlowContext<SignupCtxData>| async move {
    let (name_blank, email_ok, password_len) = {
      let guard = ctx.read();
      (guard.name.trim().is_empty(), guard.email.contains('@'), guard.password.chars().count())
    };
    if name_blank {
      return Err(AppError::Validation("Name is required.".to_string()));
    }
    if !email_ok {
      warn!("Signup with an invalid email.");
      return Err(AppError::Validation("Valid email is required.".to_string()));
    }
    if password_len < MIN_PASSWORD_LEN {
      return Err(AppError::Validation(format!(
        "Password must be at least {} characters long.",
        MIN_PASSWORD_LEN
      )));
    }
    Ok(StepControl::Continue)
  });

  let check_users = users.clone();
  flow.on(CHECK_EMAIL_STEP, move |ctx: FlowContext<SignupCtxData>| {
    let users = check_users.clone();
    async move {
      let email = ctx.read().email.clone();
      if users.email_taken(&email).await? {
        warn!("Signup with an email that is already registered.");
        return Err(AppError::Validation("An account with this email already exists.".to_string()));
      }
      Ok::<_, AppError>(StepControl::Continue)
    }
  });

  flow.on(CREATE_USER_STEP, move |ctx: FlowContext<SignupCtxData>| {
    let users = users.clone();
    async move {
      let (name, email, password) = {
        let guard = ctx.read();
        (guard.name.clone(), guard.email.clone(), guard.password.clone())
      };
      let password_hash = auth_service::hash_password(&password)?;
      let user = users.register(&name, &email, &password_hash).await?;
      info!(user_id = user.user_id, "User signed up.");
      ctx.write().created_user = Some(user);
      Ok::<_, AppError>(StepControl::Continue)
    }
  });

  flow
}
