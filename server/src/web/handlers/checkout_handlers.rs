// larder-server/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use larder::CheckoutRequest;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct CheckoutPayload {
  pub delivery_address: String,
  pub payment_method: String,
}

/// Commit, pay and clear in one call. Failures keep their own status code: 422 for an
/// empty cart, 402 for a declined payment (the order stays pending and the cart is kept).
#[instrument(name = "handler::checkout", skip(app_state, payload), fields(user_id = auth_user.user_id))]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  payload: web::Json<CheckoutPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  let receipt = app_state
    .storefront
    .checkout
    .run(CheckoutRequest {
      user_id: auth_user.user_id,
      delivery_address: payload.delivery_address,
      payment_method: payload.payment_method,
    })
    .await?;

  info!(order_id = receipt.order_id, cart_cleared = receipt.cart_cleared, "Checkout finished.");
  Ok(HttpResponse::Created().json(receipt))
}
