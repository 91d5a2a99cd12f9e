// larder-server/src/flows/contexts.rs
use larder::models::User;

#[derive(Debug, Clone, Default)]
pub struct SignupCtxData {
  pub name: String,
  pub email: String,
  pub password: String,
  pub created_user: Option<User>,
}

#[derive(Debug, Clone, Default)]
pub struct SigninCtxData {
  pub email: String,
  pub password: String,
  /// Loaded in `load_user`, trusted only once `verify_password` continued.
  pub candidate: Option<User>,
  pub authenticated: bool,
}
