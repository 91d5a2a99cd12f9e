// tests/checkout_tests.rs
mod common;

use common::*;
use larder::models::{OrderStatus, PaymentStatus};
use larder::{CheckoutRequest, LarderError};

fn request(user_id: i64, method: &str) -> CheckoutRequest {
  CheckoutRequest {
    user_id,
    delivery_address: "123 Main St".into(),
    payment_method: method.into(),
  }
}

#[tokio::test]
async fn successful_checkout_confirms_and_clears_the_cart() {
  let sf = storefront().await;
  tomato_and_bread_cart(&sf, 5).await;

  let receipt = sf.checkout.run(request(5, "card")).await.unwrap();
  assert_eq!(receipt.total_cents, 797);
  assert_eq!(receipt.payment.status, PaymentStatus::Completed);
  assert_eq!(receipt.payment.order_id, receipt.order_id);
  assert!(receipt.cart_cleared);

  assert_eq!(sf.orders.order(receipt.order_id).await.unwrap().status, OrderStatus::Confirmed);
  assert!(sf.cart.snapshot(5).await.unwrap().is_empty());
}

#[tokio::test]
async fn declined_checkout_keeps_the_cart_for_a_retry() {
  let sf = storefront().await;
  tomato_and_bread_cart(&sf, 5).await;

  let (order_id, payment_id) = match sf.checkout.run(request(5, "declined")).await {
    Err(LarderError::PaymentDeclined { order_id, payment_id }) => (order_id, payment_id),
    other => panic!("expected PaymentDeclined, got {:?}", other),
  };

  assert_eq!(sf.orders.order(order_id).await.unwrap().status, OrderStatus::Pending);
  let attempts = sf.payments.for_order(order_id).await.unwrap();
  assert_eq!(attempts.len(), 1);
  assert_eq!(attempts[0].payment_id, payment_id);
  assert_eq!(attempts[0].status, PaymentStatus::Failed);
  assert_eq!(sf.cart.snapshot(5).await.unwrap().total_cents(), 797);

  let receipt = sf.checkout.run(request(5, "card")).await.unwrap();
  assert_ne!(receipt.order_id, order_id);
  assert!(sf.cart.snapshot(5).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_cart_checkout_writes_nothing() {
  let sf = storefront().await;

  assert!(matches!(sf.checkout.run(request(5, "card")).await, Err(LarderError::EmptyCart)));
  assert_eq!(count(&sf, "orders").await, 0);
  assert_eq!(count(&sf, "payments").await, 0);
}

#[tokio::test]
async fn checkout_steps_are_fixed() {
  let sf = storefront().await;
  assert_eq!(sf.checkout.step_names(), vec!["commit_order", "record_payment", "clear_cart"]);
}
