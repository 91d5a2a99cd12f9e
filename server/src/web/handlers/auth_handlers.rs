// larder-server/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::USER_ID_HEADER;

#[derive(Deserialize, Debug)]
pub struct SignupRequestPayload {
  pub name: String,
  pub email: String,
  pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct SigninRequestPayload {
  pub email: String,
  pub password: String,
}

#[instrument(name = "handler::signup", skip(app_state, req_payload), fields(req_email = %req_payload.email))]
pub async fn signup_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SignupRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let user = app_state
    .auth_flows
    .signup(&payload.name, &payload.email, &payload.password)
    .await?;

  info!(user_id = user.user_id, "Signup successful.");
  Ok(HttpResponse::Created().json(json!({
    "message": "User created successfully.",
    "user": user,
  })))
}

#[instrument(name = "handler::signin", skip(app_state, req_payload), fields(req_email = %req_payload.email))]
pub async fn signin_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SigninRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let user = app_state
    .auth_flows
    .signin(&req_payload.email, &req_payload.password)
    .await?;

  info!(user_id = user.user_id, "Signin successful.");
  Ok(HttpResponse::Ok().json(json!({
    "message": "Signin successful.",
    "user": user,
    "session_header": USER_ID_HEADER,
  })))
}
