// larder-server/src/web/handlers/payment_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[instrument(name = "handler::payment_history", skip(app_state), fields(user_id = auth_user.user_id))]
pub async fn payment_history_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let payments = app_state.storefront.payments.history_for_user(auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "payments": payments })))
}
