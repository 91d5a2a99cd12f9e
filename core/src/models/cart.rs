// larder/src/models/cart.rs
use crate::error::{LarderError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// One (user, product) row of a persisted cart. `quantity` is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CartLine {
  pub user_id: i64,
  pub product_id: i64,
  pub quantity: i64,
  pub added_at: DateTime<Utc>,
}

/// A cart line joined with the catalog price current at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct SnapshotLine {
  pub product_id: i64,
  pub name: String,
  pub quantity: i64,
  pub unit_price_cents: i64,
}

impl SnapshotLine {
  /// `None` when quantity times price overflows `i64`.
  pub fn subtotal_cents(&self) -> Option<i64> {
    self.quantity.checked_mul(self.unit_price_cents)
  }
}

/// Read-consistent view of a user's cart used as the input of an order commit.
///
/// The lines are owned, so [`CartSnapshot::lines`] can be iterated any number of times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSnapshot {
  pub user_id: i64,
  lines: Vec<SnapshotLine>,
  total_cents: i64,
}

impl CartSnapshot {
  /// Fails with `InvalidArgument` when a subtotal or the total overflows.
  pub fn new(user_id: i64, lines: Vec<SnapshotLine>) -> Result<Self> {
    let total_cents = lines
      .iter()
      .try_fold(0i64, |acc, line| line.subtotal_cents().and_then(|sub| acc.checked_add(sub)))
      .ok_or_else(|| LarderError::InvalidArgument("cart total exceeds the supported amount".into()))?;
    Ok(Self {
      user_id,
      lines,
      total_cents,
    })
  }

  pub fn lines(&self) -> impl ExactSizeIterator<Item = &SnapshotLine> + '_ {
    self.lines.iter()
  }

  pub fn total_cents(&self) -> i64 {
    self.total_cents
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  /// Whether this snapshot may become an order: at least one line and a positive total.
  pub fn is_billable(&self) -> bool {
    !self.is_empty() && self.total_cents > 0
  }

  pub fn item_count(&self) -> i64 {
    self.lines.iter().fold(0i64, |acc, l| acc.saturating_add(l.quantity))
  }
}
