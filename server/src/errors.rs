// larder-server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use larder::flow::FlowError;
use larder::LarderError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error(transparent)]
  Storefront(#[from] LarderError),

  #[error("Workflow Error: {0}")]
  Workflow(#[from] FlowError),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  /// Stable machine-readable error code, independent of the message text.
  pub fn code(&self) -> &'static str {
    match self {
      AppError::Validation(_) => "validation_error",
      AppError::Auth(_) => "unauthorized",
      AppError::Forbidden(_) => "forbidden",
      AppError::Config(_) => "config_error",
      AppError::Workflow(_) | AppError::Internal(_) => "internal_error",
      AppError::Storefront(e) => match e {
        LarderError::InvalidArgument(_) => "invalid_argument",
        LarderError::NotFound(_) => "not_found",
        LarderError::EmptyCart => "empty_cart",
        LarderError::PaymentDeclined { .. } => "payment_declined",
        LarderError::Persistence(_) | LarderError::Migration(_) => "storage_error",
        LarderError::Internal(_) => "internal_error",
      },
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::Config(_) | AppError::Workflow(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
      AppError::Storefront(e) => match e {
        LarderError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        LarderError::NotFound(_) => StatusCode::NOT_FOUND,
        LarderError::EmptyCart => StatusCode::UNPROCESSABLE_ENTITY,
        LarderError::PaymentDeclined { .. } => StatusCode::PAYMENT_REQUIRED,
        LarderError::Persistence(_) | LarderError::Migration(_) | LarderError::Internal(_) => {
          StatusCode::INTERNAL_SERVER_ERROR
        }
      },
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, code = self.code(), "Responding with error");
    } else {
      tracing::warn!(application_error = %self, code = self.code(), "Responding with error");
    }

    let body = match self {
      // Storage details stay in the logs.
      AppError::Storefront(LarderError::Persistence(_) | LarderError::Migration(_)) => json!({
        "code": self.code(),
        "error": "Database operation failed",
        "retryable": true,
      }),
      AppError::Config(_) | AppError::Workflow(_) | AppError::Internal(_) => json!({
        "code": self.code(),
        "error": "An internal error occurred",
      }),
      AppError::Storefront(LarderError::PaymentDeclined { order_id, payment_id }) => json!({
        "code": self.code(),
        "error": self.to_string(),
        "order_id": order_id,
        "payment_id": payment_id,
      }),
      _ => json!({
        "code": self.code(),
        "error": self.to_string(),
      }),
    };

    HttpResponse::build(status).json(body)
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
