// larder/src/models/payment.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
  Pending,
  Completed,
  Failed,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Payment {
  pub payment_id: i64,
  pub order_id: i64,
  pub amount_cents: i64,
  pub status: PaymentStatus,
  pub payment_method: String,
  pub reference: String,
  pub payment_date: DateTime<Utc>,
}

/// Result of one `PaymentRecorder::record` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentOutcome {
  pub payment_id: i64,
  pub order_id: i64,
  pub amount_cents: i64,
  pub status: PaymentStatus,
  pub reference: String,
}

impl PaymentOutcome {
  pub fn is_completed(&self) -> bool {
    self.status == PaymentStatus::Completed
  }
}

/// A payment row joined with its order total, for a user's payment history.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PaymentRecord {
  pub payment_id: i64,
  pub order_id: i64,
  pub amount_cents: i64,
  pub status: PaymentStatus,
  pub payment_method: String,
  pub payment_date: DateTime<Utc>,
  pub order_total_cents: i64,
}
