// larder/src/store/payments.rs
use crate::error::{LarderError, Result};
use crate::models::{OrderStatus, Payment, PaymentOutcome, PaymentRecord, PaymentStatus};
use crate::payment::{AuthorizationRequest, PaymentAuthorizer};
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Records payment attempts and confirms the order they pay for.
#[derive(Clone)]
pub struct PaymentRecorder {
  pool: SqlitePool,
  authorizer: Arc<dyn PaymentAuthorizer>,
}

impl std::fmt::Debug for PaymentRecorder {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PaymentRecorder").finish_non_exhaustive()
  }
}

impl PaymentRecorder {
  pub fn new(pool: SqlitePool, authorizer: Arc<dyn PaymentAuthorizer>) -> Self {
    Self { pool, authorizer }
  }

  /// Authorizes and records one payment attempt against a pending order.
  ///
  /// The payment insert and, on approval, the `pending -> confirmed` update share one
  /// transaction, so a completed payment never sits next to a pending order. A declined
  /// attempt is stored as `failed` and returned as `Ok`; the order stays pending.
  #[instrument(name = "payments::record", skip(self, method), fields(method = %method), err(Display))]
  pub async fn record(&self, order_id: i64, amount_cents: i64, method: &str) -> Result<PaymentOutcome> {
    let method = method.trim();
    if method.is_empty() {
      return Err(LarderError::InvalidArgument("payment method is required".into()));
    }
    if amount_cents <= 0 {
      return Err(LarderError::InvalidArgument(format!(
        "payment amount must be positive, got {}",
        amount_cents
      )));
    }

    let mut tx = self.pool.begin().await?;

    let (status, total_cents) =
      sqlx::query_as::<_, (OrderStatus, i64)>("SELECT status, total_cents FROM orders WHERE order_id = ?")
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| LarderError::NotFound(format!("order {}", order_id)))?;

    if status != OrderStatus::Pending {
      warn!(?status, "Rejected payment for a non-pending order.");
      return Err(LarderError::InvalidArgument(format!(
        "order {} is {:?}; only pending orders accept payments",
        order_id, status
      )));
    }
    if amount_cents != total_cents {
      warn!(total_cents, "Rejected payment that does not match the order total.");
      return Err(LarderError::InvalidArgument(format!(
        "payment of {} cents does not match order total of {} cents",
        amount_cents, total_cents
      )));
    }

    let authorization = self
      .authorizer
      .authorize(&AuthorizationRequest {
        order_id,
        amount_cents,
        method: method.to_string(),
      })
      .await;
    let payment_status = if authorization.approved {
      PaymentStatus::Completed
    } else {
      PaymentStatus::Failed
    };

    let payment_id = sqlx::query(
      "INSERT INTO payments (order_id, amount_cents, status, payment_method, reference, payment_date) \
       VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(order_id)
    .bind(amount_cents)
    .bind(payment_status)
    .bind(method)
    .bind(&authorization.reference)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    if payment_status == PaymentStatus::Completed {
      let updated = sqlx::query("UPDATE orders SET status = ? WHERE order_id = ? AND status = ?")
        .bind(OrderStatus::Confirmed)
        .bind(order_id)
        .bind(OrderStatus::Pending)
        .execute(&mut *tx)
        .await?;
      if updated.rows_affected() != 1 {
        // Someone moved the order since we read it; dropping `tx` discards the payment row.
        return Err(LarderError::InvalidArgument(format!(
          "order {} is no longer pending",
          order_id
        )));
      }
    }

    tx.commit().await?;

    info!(payment_id, status = ?payment_status, "Payment recorded.");
    Ok(PaymentOutcome {
      payment_id,
      order_id,
      amount_cents,
      status: payment_status,
      reference: authorization.reference,
    })
  }

  /// All attempts for one order, oldest first.
  pub async fn for_order(&self, order_id: i64) -> Result<Vec<Payment>> {
    let payments = sqlx::query_as::<_, Payment>(
      "SELECT payment_id, order_id, amount_cents, status, payment_method, reference, payment_date \
       FROM payments WHERE order_id = ? ORDER BY payment_id ASC",
    )
    .bind(order_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(payments)
  }

  /// Every payment on the user's orders, newest first.
  #[instrument(name = "payments::history", skip(self))]
  pub async fn history_for_user(&self, user_id: i64) -> Result<Vec<PaymentRecord>> {
    let records = sqlx::query_as::<_, PaymentRecord>(
      "SELECT p.payment_id, p.order_id, p.amount_cents, p.status, p.payment_method, p.payment_date, \
              o.total_cents AS order_total_cents \
       FROM payments p JOIN orders o ON o.order_id = p.order_id \
       WHERE o.user_id = ? ORDER BY p.payment_date DESC, p.payment_id DESC",
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(records)
  }
}
