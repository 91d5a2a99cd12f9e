// larder/src/models/product.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub product_id: i64,
  pub name: String,
  pub description: Option<String>,
  pub price_cents: i64,
  pub stock: i64,
  pub created_at: DateTime<Utc>,
}

/// Fields an admin supplies when creating or replacing a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
  pub name: String,
  pub description: Option<String>,
  pub price_cents: i64,
  #[serde(default)]
  pub stock: i64,
}
