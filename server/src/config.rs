// larder-server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub db_max_connections: u32,

  /// Payment methods the simulated authorizer refuses.
  pub payment_decline_methods: Vec<String>,

  pub seed_db: bool,
  /// When set together with `seed_db`, an admin account is created with this password.
  pub seed_admin_password: Option<String>,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      database_url: "sqlite://larder.db?mode=rwc".to_string(),
      db_max_connections: 5,
      payment_decline_methods: vec!["declined".to_string()],
      seed_db: false,
      seed_admin_password: None,
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source; unset variables fall back to defaults.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let defaults = Self::default();
    let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let server_port = match get("SERVER_PORT") {
      Some(raw) => raw
        .parse::<u16>()
        .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT '{}': {}", raw, e)))?,
      None => defaults.server_port,
    };

    let db_max_connections = match get("DB_MAX_CONNECTIONS") {
      Some(raw) => match raw.parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => {
          return Err(AppError::Config(format!(
            "Invalid DB_MAX_CONNECTIONS '{}': expected a positive integer",
            raw
          )))
        }
      },
      None => defaults.db_max_connections,
    };

    let payment_decline_methods = match get("PAYMENT_DECLINE_METHODS") {
      Some(raw) => raw
        .split(',')
        .map(|m| m.trim().to_lowercase())
        .filter(|m| !m.is_empty())
        .collect(),
      None => defaults.payment_decline_methods,
    };

    let seed_db = match get("SEED_DB") {
      Some(raw) => raw
        .parse::<bool>()
        .map_err(|e| AppError::Config(format!("Invalid SEED_DB value '{}': {}", raw, e)))?,
      None => defaults.seed_db,
    };

    let config = Self {
      server_host: get("SERVER_HOST").unwrap_or(defaults.server_host),
      server_port,
      database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
      db_max_connections,
      payment_decline_methods,
      seed_db,
      seed_admin_password: get("SEED_ADMIN_PASSWORD"),
    };

    tracing::info!(
      host = %config.server_host,
      port = config.server_port,
      seed_db = config.seed_db,
      "Application configuration loaded."
    );
    Ok(config)
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
