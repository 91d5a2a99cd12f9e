// larder/src/store/cart.rs
use crate::error::{LarderError, Result};
use crate::models::{CartLine, CartSnapshot, OrderItem, SnapshotLine};
use crate::store::catalog::ProductCatalog;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, instrument, warn};

/// Upper bound on the quantity of a single cart line.
pub const MAX_LINE_QUANTITY: i64 = 10_000;

/// Per-user cart lines keyed by (user_id, product_id).
#[derive(Debug, Clone)]
pub struct CartStore {
  pool: SqlitePool,
  catalog: ProductCatalog,
}

impl CartStore {
  pub fn new(pool: SqlitePool, catalog: ProductCatalog) -> Self {
    Self { pool, catalog }
  }

  /// Adds `quantity` of a product, summing into an existing line instead of duplicating it.
  ///
  /// The upsert is a single statement keyed on the (user_id, product_id) primary key,
  /// so concurrent adds for the same pair serialize in the database.
  #[instrument(name = "cart::add", skip(self))]
  pub async fn add(&self, user_id: i64, product_id: i64, quantity: i64) -> Result<CartLine> {
    if quantity < 1 {
      warn!("Rejected cart add with non-positive quantity.");
      return Err(LarderError::InvalidArgument(format!(
        "quantity must be at least 1, got {}",
        quantity
      )));
    }
    if quantity > MAX_LINE_QUANTITY {
      warn!("Rejected cart add above the line cap.");
      return Err(line_cap_exceeded());
    }
    if !self.catalog.exists(product_id).await? {
      warn!("Rejected cart add for unknown product.");
      return Err(LarderError::NotFound(format!("product {}", product_id)));
    }

    // The guarded update returns no row when the sum would pass the cap; nothing is written then.
    let line = sqlx::query_as::<_, CartLine>(
      "INSERT INTO cart_items (user_id, product_id, quantity, added_at) VALUES (?, ?, ?, ?) \
       ON CONFLICT (user_id, product_id) DO UPDATE SET quantity = cart_items.quantity + excluded.quantity \
       WHERE cart_items.quantity + excluded.quantity <= ? \
       RETURNING user_id, product_id, quantity, added_at",
    )
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .bind(Utc::now())
    .bind(MAX_LINE_QUANTITY)
    .fetch_optional(&self.pool)
    .await?
    .ok_or_else(|| {
      warn!("Rejected cart add that would pass the line cap.");
      line_cap_exceeded()
    })?;

    info!(new_quantity = line.quantity, "Cart line upserted.");
    Ok(line)
  }

  /// Deletes the line if present. Returns whether a row existed; a missing row is not an error.
  #[instrument(name = "cart::remove", skip(self))]
  pub async fn remove(&self, user_id: i64, product_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = ? AND product_id = ?")
      .bind(user_id)
      .bind(product_id)
      .execute(&self.pool)
      .await?;
    let existed = result.rows_affected() > 0;
    debug!(existed, "Cart line removal finished.");
    Ok(existed)
  }

  /// Lowers a line's quantity. A line that would reach zero is deleted and `None` returned.
  #[instrument(name = "cart::decrement", skip(self))]
  pub async fn decrement(&self, user_id: i64, product_id: i64, quantity: i64) -> Result<Option<CartLine>> {
    if quantity < 1 {
      return Err(LarderError::InvalidArgument(format!(
        "quantity must be at least 1, got {}",
        quantity
      )));
    }

    let mut tx = self.pool.begin().await?;
    let current = sqlx::query_scalar::<_, i64>("SELECT quantity FROM cart_items WHERE user_id = ? AND product_id = ?")
      .bind(user_id)
      .bind(product_id)
      .fetch_optional(&mut *tx)
      .await?
      .ok_or_else(|| LarderError::NotFound(format!("product {} is not in the cart", product_id)))?;

    let remaining = if current > quantity {
      let line = sqlx::query_as::<_, CartLine>(
        "UPDATE cart_items SET quantity = ? WHERE user_id = ? AND product_id = ? \
         RETURNING user_id, product_id, quantity, added_at",
      )
      .bind(current - quantity)
      .bind(user_id)
      .bind(product_id)
      .fetch_one(&mut *tx)
      .await?;
      Some(line)
    } else {
      sqlx::query("DELETE FROM cart_items WHERE user_id = ? AND product_id = ?")
        .bind(user_id)
        .bind(product_id)
        .execute(&mut *tx)
        .await?;
      None
    };
    tx.commit().await?;

    info!(remaining = remaining.as_ref().map(|l| l.quantity).unwrap_or(0), "Cart line decremented.");
    Ok(remaining)
  }

  /// The stored line for one product, if any.
  pub async fn line(&self, user_id: i64, product_id: i64) -> Result<Option<CartLine>> {
    let line = sqlx::query_as::<_, CartLine>(
      "SELECT user_id, product_id, quantity, added_at FROM cart_items WHERE user_id = ? AND product_id = ?",
    )
    .bind(user_id)
    .bind(product_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(line)
  }

  /// Joins the user's lines with current catalog prices.
  ///
  /// This is a plain read: a price can still change before the order is committed.
  #[instrument(name = "cart::snapshot", skip(self))]
  pub async fn snapshot(&self, user_id: i64) -> Result<CartSnapshot> {
    let lines = sqlx::query_as::<_, SnapshotLine>(
      "SELECT c.product_id, p.name, c.quantity, p.price_cents AS unit_price_cents \
       FROM cart_items c JOIN products p ON p.product_id = c.product_id \
       WHERE c.user_id = ? ORDER BY c.added_at ASC, c.product_id ASC",
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;

    let snapshot = CartSnapshot::new(user_id, lines)?;
    debug!(lines = snapshot.lines().len(), total_cents = snapshot.total_cents(), "Cart snapshot taken.");
    Ok(snapshot)
  }

  /// Takes the ordered quantities back out of the cart once an order is paid.
  ///
  /// Lines the order did not cover, and units added after the order was committed, stay.
  /// Returns how many lines were removed or reduced.
  #[instrument(name = "cart::remove_ordered", skip(self, items), fields(items = items.len()))]
  pub async fn remove_ordered(&self, user_id: i64, items: &[OrderItem]) -> Result<u64> {
    let mut tx = self.pool.begin().await?;
    let mut touched = 0;
    for item in items {
      let deleted = sqlx::query("DELETE FROM cart_items WHERE user_id = ? AND product_id = ? AND quantity <= ?")
        .bind(user_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .execute(&mut *tx)
        .await?
        .rows_affected();
      let reduced = if deleted == 0 {
        sqlx::query("UPDATE cart_items SET quantity = quantity - ? WHERE user_id = ? AND product_id = ? AND quantity > ?")
          .bind(item.quantity)
          .bind(user_id)
          .bind(item.product_id)
          .bind(item.quantity)
          .execute(&mut *tx)
          .await?
          .rows_affected()
      } else {
        0
      };
      touched += deleted + reduced;
    }
    tx.commit().await?;
    info!(touched, "Ordered lines removed from cart.");
    Ok(touched)
  }

  /// Deletes every line of the user and returns how many there were.
  #[instrument(name = "cart::clear", skip(self))]
  pub async fn clear(&self, user_id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = ?")
      .bind(user_id)
      .execute(&self.pool)
      .await?;
    info!(removed = result.rows_affected(), "Cart cleared.");
    Ok(result.rows_affected())
  }
}

fn line_cap_exceeded() -> LarderError {
  LarderError::InvalidArgument(format!("a cart line holds at most {} units", MAX_LINE_QUANTITY))
}
