// larder/src/store/orders.rs
use crate::error::{LarderError, Result};
use crate::models::{CommittedOrder, Order, OrderDetails, OrderItem, OrderStatus};
use crate::store::cart::CartStore;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{error, info, instrument, warn};

const ORDER_COLUMNS: &str = "order_id, user_id, total_cents, delivery_address, status, created_at";

/// Turns cart snapshots into immutable orders and serves them back.
#[derive(Debug, Clone)]
pub struct OrderCommitter {
  pool: SqlitePool,
  cart: CartStore,
}

impl OrderCommitter {
  pub fn new(pool: SqlitePool, cart: CartStore) -> Self {
    Self { pool, cart }
  }

  /// Persists the user's current cart as a `pending` order with frozen line prices.
  ///
  /// The order row and all its items are written in one transaction; any failure drops
  /// the transaction, which rolls it back. The cart is left untouched: clearing it is a
  /// separate decision for the caller once payment is confirmed.
  #[instrument(name = "orders::commit", skip(self, delivery_address), err(Display))]
  pub async fn commit(&self, user_id: i64, delivery_address: &str) -> Result<CommittedOrder> {
    let delivery_address = delivery_address.trim();
    if delivery_address.is_empty() {
      warn!("Rejected commit without a delivery address.");
      return Err(LarderError::InvalidArgument("delivery address is required".into()));
    }

    let snapshot = self.cart.snapshot(user_id).await?;
    if !snapshot.is_billable() {
      warn!(lines = snapshot.lines().len(), total_cents = snapshot.total_cents(), "Nothing to commit.");
      return Err(LarderError::EmptyCart);
    }

    let mut tx = self.pool.begin().await?;

    let order_id = sqlx::query(
      "INSERT INTO orders (user_id, total_cents, delivery_address, status, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(snapshot.total_cents())
    .bind(delivery_address)
    .bind(OrderStatus::Pending)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await
    .map_err(|e| {
      error!(error = %e, "Failed to insert order row.");
      LarderError::Persistence(e)
    })?
    .last_insert_rowid();

    for line in snapshot.lines() {
      sqlx::query(
        "INSERT INTO order_items (order_id, product_id, product_name, quantity, unit_price_cents) \
         VALUES (?, ?, ?, ?, ?)",
      )
      .bind(order_id)
      .bind(line.product_id)
      .bind(&line.name)
      .bind(line.quantity)
      .bind(line.unit_price_cents)
      .execute(&mut *tx)
      .await
      .map_err(|e| {
        error!(error = %e, order_id, product_id = line.product_id, "Failed to insert order item.");
        LarderError::Persistence(e)
      })?;
    }

    tx.commit().await?;

    info!(order_id, total_cents = snapshot.total_cents(), items = snapshot.lines().len(), "Order committed.");
    Ok(CommittedOrder {
      order_id,
      total_cents: snapshot.total_cents(),
    })
  }

  #[instrument(name = "orders::get", skip(self))]
  pub async fn get(&self, order_id: i64) -> Result<OrderDetails> {
    let order = self.order(order_id).await?;
    let items = sqlx::query_as::<_, OrderItem>(
      "SELECT order_id, product_id, product_name, quantity, unit_price_cents \
       FROM order_items WHERE order_id = ? ORDER BY product_id ASC",
    )
    .bind(order_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(OrderDetails { order, items })
  }

  /// The order row alone, without its items.
  pub async fn order(&self, order_id: i64) -> Result<Order> {
    sqlx::query_as::<_, Order>(&format!("SELECT {} FROM orders WHERE order_id = ?", ORDER_COLUMNS))
      .bind(order_id)
      .fetch_optional(&self.pool)
      .await?
      .ok_or_else(|| LarderError::NotFound(format!("order {}", order_id)))
  }

  /// Newest first.
  pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!(
      "SELECT {} FROM orders WHERE user_id = ? ORDER BY created_at DESC, order_id DESC",
      ORDER_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(orders)
  }

  /// Moves a `pending` order to `cancelled`. Confirmed and cancelled orders are final.
  #[instrument(name = "orders::cancel", skip(self), err(Display))]
  pub async fn cancel(&self, order_id: i64) -> Result<Order> {
    let cancelled = sqlx::query_as::<_, Order>(&format!(
      "UPDATE orders SET status = ? WHERE order_id = ? AND status = ? RETURNING {}",
      ORDER_COLUMNS
    ))
    .bind(OrderStatus::Cancelled)
    .bind(order_id)
    .bind(OrderStatus::Pending)
    .fetch_optional(&self.pool)
    .await?;

    match cancelled {
      Some(order) => {
        info!("Order cancelled.");
        Ok(order)
      }
      None => {
        let existing = self.order(order_id).await?;
        Err(LarderError::InvalidArgument(format!(
          "order {} is {:?} and can no longer be cancelled",
          order_id, existing.status
        )))
      }
    }
  }
}
