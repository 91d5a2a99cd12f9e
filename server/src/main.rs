// larder-server/src/main.rs

mod config;
mod errors;
mod flows;
mod seed;
mod services;
mod state;
mod web;

use crate::config::AppConfig;
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use larder::{SimulatedAuthorizer, Storefront};
use std::sync::Arc;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting larder server...");

  let app_config = AppConfig::from_env().context("loading configuration")?;

  let pool = larder::db::connect(&app_config.database_url, app_config.db_max_connections)
    .await
    .with_context(|| format!("opening database at {}", app_config.database_url))?;

  let authorizer = Arc::new(SimulatedAuthorizer::new(&app_config.payment_decline_methods));
  let storefront = Storefront::new(pool, authorizer);

  if app_config.seed_db {
    seed::run(&storefront, app_config.seed_admin_password.as_deref())
      .await
      .context("seeding database")?;
  }

  let server_address = app_config.bind_address();
  let app_state = AppState::new(storefront, app_config);

  tracing::info!("Binding server to {}...", server_address);
  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("binding {}", server_address))?
  .run()
  .await?;

  Ok(())
}
