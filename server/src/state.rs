// larder-server/src/state.rs
use crate::config::AppConfig;
use crate::flows::AuthFlows;
use larder::Storefront;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub storefront: Storefront,
  pub auth_flows: Arc<AuthFlows>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  pub fn new(storefront: Storefront, config: AppConfig) -> Self {
    let auth_flows = Arc::new(AuthFlows::new(storefront.users.clone()));
    Self {
      storefront,
      auth_flows,
      config: Arc::new(config),
    }
  }
}
