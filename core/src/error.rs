// larder/src/error.rs
use thiserror::Error;

use crate::flow::FlowError;

/// Every failure a cart, order or payment operation can surface.
///
/// Storage failures are never swallowed: an open transaction is rolled back and the
/// cause travels up as `Persistence` so the caller can tell it apart from business
/// rejections like `EmptyCart` or `PaymentDeclined`.
#[derive(Debug, Error)]
pub enum LarderError {
  #[error("Invalid argument: {0}")]
  InvalidArgument(String),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Cart is empty or has no billable value")]
  EmptyCart,

  #[error("Payment {payment_id} for order {order_id} was declined")]
  PaymentDeclined { order_id: i64, payment_id: i64 },

  #[error("Persistence error: {0}")]
  Persistence(#[from] sqlx::Error),

  #[error("Schema migration failed: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Internal error: {0}")]
  Internal(String),
}

impl LarderError {
  /// Only storage failures are worth retrying as-is; everything else needs the
  /// caller to change something first.
  pub fn is_retryable(&self) -> bool {
    matches!(self, LarderError::Persistence(_))
  }
}

impl From<FlowError> for LarderError {
  fn from(err: FlowError) -> Self {
    LarderError::Internal(err.to_string())
  }
}

pub type Result<T, E = LarderError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_persistence_errors_are_retryable() {
    assert!(LarderError::Persistence(sqlx::Error::PoolTimedOut).is_retryable());
    assert!(!LarderError::EmptyCart.is_retryable());
    assert!(!LarderError::PaymentDeclined { order_id: 1, payment_id: 2 }.is_retryable());
    assert!(!LarderError::InvalidArgument("qty".into()).is_retryable());
  }

  #[test]
  fn flow_errors_become_internal() {
    let err: LarderError = FlowError::HandlerMissing {
      step_name: "commit_order".into(),
    }
    .into();
    match err {
      LarderError::Internal(msg) => assert!(msg.contains("commit_order")),
      other => panic!("expected Internal, got {:?}", other),
    }
  }
}
