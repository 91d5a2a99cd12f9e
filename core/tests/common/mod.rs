// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use larder::models::NewProduct;
use larder::{Authorization, AuthorizationRequest, PaymentAuthorizer, SimulatedAuthorizer, Storefront};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// A fresh in-memory storefront whose authorizer declines the method "declined".
pub async fn storefront() -> Storefront {
  setup_tracing();
  let pool = larder::db::connect_in_memory().await.expect("in-memory database");
  Storefront::new(pool, Arc::new(SimulatedAuthorizer::default()))
}

pub async fn storefront_with(authorizer: Arc<dyn PaymentAuthorizer>) -> Storefront {
  setup_tracing();
  let pool = larder::db::connect_in_memory().await.expect("in-memory database");
  Storefront::new(pool, authorizer)
}

pub async fn seed_product(sf: &Storefront, name: &str, price_cents: i64) -> i64 {
  sf.catalog
    .create(&NewProduct {
      name: name.to_string(),
      description: Some(format!("Fresh {}", name.to_lowercase())),
      price_cents,
      stock: 100,
    })
    .await
    .expect("seed product")
    .product_id
}

/// The tomato/bread cart used throughout: 2 x $2.99 + 1 x $1.99 = $7.97.
pub async fn tomato_and_bread_cart(sf: &Storefront, user_id: i64) -> (i64, i64) {
  let tomato = seed_product(sf, "Tomato", 299).await;
  let bread = seed_product(sf, "Bread", 199).await;
  sf.cart.add(user_id, tomato, 2).await.expect("add tomato");
  sf.cart.add(user_id, bread, 1).await.expect("add bread");
  (tomato, bread)
}

pub async fn count(sf: &Storefront, table: &str) -> i64 {
  sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
    .fetch_one(&sf.pool)
    .await
    .expect("count rows")
}

/// Declines every request.
pub struct AlwaysDecline;

#[async_trait]
impl PaymentAuthorizer for AlwaysDecline {
  async fn authorize(&self, request: &AuthorizationRequest) -> Authorization {
    Authorization {
      approved: false,
      reference: format!("decline_{}", request.order_id),
    }
  }
}
