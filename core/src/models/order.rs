// larder/src/models/order.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Confirmed,
  Cancelled,
}

impl OrderStatus {
  /// `pending` is the only state with outgoing transitions.
  pub fn can_transition_to(self, next: OrderStatus) -> bool {
    matches!(
      (self, next),
      (OrderStatus::Pending, OrderStatus::Confirmed) | (OrderStatus::Pending, OrderStatus::Cancelled)
    )
  }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub order_id: i64,
  pub user_id: i64,
  pub total_cents: i64,
  pub delivery_address: String,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
}

/// Frozen price/quantity line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct OrderItem {
  pub order_id: i64,
  pub product_id: i64,
  pub product_name: String,
  pub quantity: i64,
  pub unit_price_cents: i64,
}

impl OrderItem {
  pub fn subtotal_cents(&self) -> Option<i64> {
    self.quantity.checked_mul(self.unit_price_cents)
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails {
  #[serde(flatten)]
  pub order: Order,
  pub items: Vec<OrderItem>,
}

impl OrderDetails {
  /// `None` on overflow; a committed order never overflows since its total was checked.
  pub fn items_total_cents(&self) -> Option<i64> {
    self
      .items
      .iter()
      .try_fold(0i64, |acc, item| item.subtotal_cents().and_then(|sub| acc.checked_add(sub)))
  }
}

/// What a successful commit hands back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommittedOrder {
  pub order_id: i64,
  pub total_cents: i64,
}

#[cfg(test)]
mod tests {
  use super::OrderStatus::*;

  #[test]
  fn only_pending_orders_move() {
    assert!(Pending.can_transition_to(Confirmed));
    assert!(Pending.can_transition_to(Cancelled));
    assert!(!Confirmed.can_transition_to(Pending));
    assert!(!Confirmed.can_transition_to(Cancelled));
    assert!(!Cancelled.can_transition_to(Confirmed));
    assert!(!Pending.can_transition_to(Pending));
  }
}
