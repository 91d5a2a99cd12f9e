// larder-server/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use larder::models::format_cents;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

fn default_quantity() -> i64 {
  1
}

#[derive(Deserialize, Debug)]
pub struct CartLinePayload {
  pub product_id: i64,
  #[serde(default = "default_quantity")]
  pub quantity: i64,
}

#[instrument(name = "handler::view_cart", skip(app_state), fields(user_id = auth_user.user_id))]
pub async fn view_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let snapshot = app_state.storefront.cart.snapshot(auth_user.user_id).await?;
  let lines: Vec<_> = snapshot
    .lines()
    .map(|line| {
      json!({
        "product_id": line.product_id,
        "name": line.name,
        "quantity": line.quantity,
        "unit_price_cents": line.unit_price_cents,
        "subtotal_cents": line.subtotal_cents(),
      })
    })
    .collect();

  Ok(HttpResponse::Ok().json(json!({
    "items": lines,
    "item_count": snapshot.item_count(),
    "total_cents": snapshot.total_cents(),
    "total": format_cents(snapshot.total_cents()),
  })))
}

#[instrument(name = "handler::add_to_cart", skip(app_state), fields(user_id = auth_user.user_id))]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  payload: web::Json<CartLinePayload>,
) -> Result<HttpResponse, AppError> {
  let line = app_state
    .storefront
    .cart
    .add(auth_user.user_id, payload.product_id, payload.quantity)
    .await?;
  info!(product_id = line.product_id, quantity = line.quantity, "Cart line updated.");
  Ok(HttpResponse::Ok().json(json!({ "item": line })))
}

#[instrument(name = "handler::decrement_cart", skip(app_state), fields(user_id = auth_user.user_id))]
pub async fn decrement_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  payload: web::Json<CartLinePayload>,
) -> Result<HttpResponse, AppError> {
  let remaining = app_state
    .storefront
    .cart
    .decrement(auth_user.user_id, payload.product_id, payload.quantity)
    .await?;
  Ok(HttpResponse::Ok().json(json!({
    "removed": remaining.is_none(),
    "item": remaining,
  })))
}

#[instrument(name = "handler::remove_from_cart", skip(app_state), fields(user_id = auth_user.user_id))]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let removed = app_state
    .storefront
    .cart
    .remove(auth_user.user_id, path.into_inner())
    .await?;
  Ok(HttpResponse::Ok().json(json!({ "removed": removed })))
}

#[instrument(name = "handler::clear_cart", skip(app_state), fields(user_id = auth_user.user_id))]
pub async fn clear_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let removed = app_state.storefront.cart.clear(auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "removed_lines": removed })))
}
