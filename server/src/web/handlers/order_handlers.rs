// larder-server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use larder::models::{Order, OrderDetails};
use larder::LarderError;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct CommitOrderPayload {
  pub delivery_address: String,
}

#[derive(Deserialize, Debug)]
pub struct PayOrderPayload {
  pub payment_method: String,
  /// Defaults to the order total.
  pub amount_cents: Option<i64>,
}

// Other users' orders are reported as missing rather than forbidden.
async fn owned_order(app_state: &AppState, auth_user: &AuthenticatedUser, order_id: i64) -> Result<Order, AppError> {
  let order = app_state.storefront.orders.order(order_id).await?;
  if order.user_id != auth_user.user_id {
    warn!(order_id, "Order requested by someone other than its owner.");
    return Err(LarderError::NotFound(format!("order {}", order_id)).into());
  }
  Ok(order)
}

#[instrument(name = "handler::commit_order", skip(app_state, payload), fields(user_id = auth_user.user_id))]
pub async fn commit_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  payload: web::Json<CommitOrderPayload>,
) -> Result<HttpResponse, AppError> {
  let committed = app_state
    .storefront
    .orders
    .commit(auth_user.user_id, &payload.delivery_address)
    .await?;
  info!(order_id = committed.order_id, "Order committed from cart.");
  Ok(HttpResponse::Created().json(committed))
}

#[instrument(name = "handler::list_orders", skip(app_state), fields(user_id = auth_user.user_id))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.storefront.orders.list_for_user(auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

#[instrument(name = "handler::get_order", skip(app_state), fields(user_id = auth_user.user_id))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  owned_order(&app_state, &auth_user, order_id).await?;
  let details: OrderDetails = app_state.storefront.orders.get(order_id).await?;
  let payments = app_state.storefront.payments.for_order(order_id).await?;
  Ok(HttpResponse::Ok().json(json!({
    "order": details,
    "payments": payments,
  })))
}

#[instrument(name = "handler::cancel_order", skip(app_state), fields(user_id = auth_user.user_id))]
pub async fn cancel_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  owned_order(&app_state, &auth_user, order_id).await?;
  let order = app_state.storefront.orders.cancel(order_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "order": order })))
}

/// Records one payment attempt. A completed payment also clears the caller's cart; a
/// declined one answers 402 and leaves both the order and the cart untouched.
#[instrument(name = "handler::pay_order", skip(app_state, payload), fields(user_id = auth_user.user_id))]
pub async fn pay_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<i64>,
  payload: web::Json<PayOrderPayload>,
) -> Result<HttpResponse, AppError> {
  let order = owned_order(&app_state, &auth_user, path.into_inner()).await?;
  let amount_cents = payload.amount_cents.unwrap_or(order.total_cents);

  let outcome = app_state
    .storefront
    .payments
    .record(order.order_id, amount_cents, &payload.payment_method)
    .await?;

  if !outcome.is_completed() {
    return Err(
      LarderError::PaymentDeclined {
        order_id: outcome.order_id,
        payment_id: outcome.payment_id,
      }
      .into(),
    );
  }

  let storefront = &app_state.storefront;
  let removed = match storefront.orders.get(order.order_id).await {
    Ok(details) => storefront.cart.remove_ordered(auth_user.user_id, &details.items).await,
    Err(e) => Err(e),
  };
  let cart_cleared = match removed {
    Ok(_) => true,
    Err(e) => {
      warn!(error = %e, "Payment completed but the cart could not be cleared.");
      false
    }
  };

  Ok(HttpResponse::Created().json(json!({
    "payment": outcome,
    "cart_cleared": cart_cleared,
  })))
}
