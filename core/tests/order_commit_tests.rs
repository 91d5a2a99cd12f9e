// tests/order_commit_tests.rs
mod common;

use common::*;
use larder::models::{NewProduct, OrderStatus};
use larder::LarderError;

#[tokio::test]
async fn commit_freezes_prices_and_totals() {
  let sf = storefront().await;
  let (tomato, bread) = tomato_and_bread_cart(&sf, 9).await;

  let committed = sf.orders.commit(9, "123 Main St").await.unwrap();
  assert_eq!(committed.total_cents, 797);

  // Later price changes must not leak into the order.
  sf.catalog
    .update(
      tomato,
      &NewProduct {
        name: "Tomato".into(),
        description: None,
        price_cents: 999,
        stock: 10,
      },
    )
    .await
    .unwrap();

  let details = sf.orders.get(committed.order_id).await.unwrap();
  assert_eq!(details.order.status, OrderStatus::Pending);
  assert_eq!(details.order.total_cents, 797);
  assert_eq!(details.order.delivery_address, "123 Main St");
  assert_eq!(details.items.len(), 2);
  assert_eq!(details.items_total_cents(), Some(details.order.total_cents));

  let prices: Vec<(i64, i64, i64)> = details
    .items
    .iter()
    .map(|i| (i.product_id, i.quantity, i.unit_price_cents))
    .collect();
  assert!(prices.contains(&(tomato, 2, 299)));
  assert!(prices.contains(&(bread, 1, 199)));
}

#[tokio::test]
async fn empty_cart_commit_writes_nothing() {
  let sf = storefront().await;

  assert!(matches!(sf.orders.commit(1, "123 Main St").await, Err(LarderError::EmptyCart)));
  assert_eq!(count(&sf, "orders").await, 0);
  assert_eq!(count(&sf, "order_items").await, 0);
}

#[tokio::test]
async fn zero_value_cart_is_treated_as_empty() {
  let sf = storefront().await;
  let sample = seed_product(&sf, "Free sample", 0).await;
  sf.cart.add(1, sample, 3).await.unwrap();

  assert!(matches!(sf.orders.commit(1, "123 Main St").await, Err(LarderError::EmptyCart)));
  assert_eq!(count(&sf, "orders").await, 0);
}

#[tokio::test]
async fn blank_address_is_rejected_before_any_write() {
  let sf = storefront().await;
  tomato_and_bread_cart(&sf, 1).await;

  assert!(matches!(sf.orders.commit(1, "   ").await, Err(LarderError::InvalidArgument(_))));
  assert_eq!(count(&sf, "orders").await, 0);
}

#[tokio::test]
async fn commit_leaves_the_cart_alone() {
  let sf = storefront().await;
  tomato_and_bread_cart(&sf, 1).await;

  sf.orders.commit(1, "123 Main St").await.unwrap();
  assert_eq!(sf.cart.snapshot(1).await.unwrap().total_cents(), 797);
}

#[tokio::test]
async fn orders_are_listed_newest_first_per_user() {
  let sf = storefront().await;
  tomato_and_bread_cart(&sf, 1).await;

  let first = sf.orders.commit(1, "A street").await.unwrap();
  let second = sf.orders.commit(1, "B street").await.unwrap();

  let listed: Vec<i64> = sf.orders.list_for_user(1).await.unwrap().iter().map(|o| o.order_id).collect();
  assert_eq!(listed, vec![second.order_id, first.order_id]);
  assert!(sf.orders.list_for_user(2).await.unwrap().is_empty());
}

#[tokio::test]
async fn only_pending_orders_can_be_cancelled() {
  let sf = storefront().await;
  tomato_and_bread_cart(&sf, 1).await;
  let committed = sf.orders.commit(1, "123 Main St").await.unwrap();

  let cancelled = sf.orders.cancel(committed.order_id).await.unwrap();
  assert_eq!(cancelled.status, OrderStatus::Cancelled);

  assert!(matches!(
    sf.orders.cancel(committed.order_id).await,
    Err(LarderError::InvalidArgument(_))
  ));
  assert!(matches!(sf.orders.cancel(12345).await, Err(LarderError::NotFound(_))));
}

#[tokio::test]
async fn unknown_order_is_not_found() {
  let sf = storefront().await;
  assert!(matches!(sf.orders.get(77).await, Err(LarderError::NotFound(_))));
}

#[tokio::test]
async fn overflowing_cart_total_is_rejected_before_any_write() {
  let sf = storefront().await;
  let caviar = seed_product(&sf, "Caviar", i64::MAX / 2).await;
  sf.cart.add(4, caviar, 3).await.unwrap();

  assert!(matches!(sf.orders.commit(4, "1 Elm St").await, Err(LarderError::InvalidArgument(_))));
  assert_eq!(count(&sf, "orders").await, 0);
  assert_eq!(count(&sf, "order_items").await, 0);
  assert_eq!(sf.cart.line(4, caviar).await.unwrap().unwrap().quantity, 3);
}

#[tokio::test]
async fn failed_item_insert_rolls_back_the_order_header() {
  let sf = storefront().await;
  let (tomato, bread) = tomato_and_bread_cart(&sf, 6).await;
  sqlx::query(
    "CREATE TRIGGER refuse_order_items BEFORE INSERT ON order_items \
     BEGIN SELECT RAISE(ABORT, 'item insert refused'); END",
  )
  .execute(&sf.pool)
  .await
  .unwrap();

  let err = sf.orders.commit(6, "1 Elm St").await.unwrap_err();
  assert!(matches!(err, LarderError::Persistence(_)), "got {:?}", err);
  assert_eq!(count(&sf, "orders").await, 0);
  assert_eq!(count(&sf, "order_items").await, 0);

  assert_eq!(sf.cart.line(6, tomato).await.unwrap().unwrap().quantity, 2);
  assert_eq!(sf.cart.line(6, bread).await.unwrap().unwrap().quantity, 1);
}
