// tests/catalog_tests.rs
mod common;

use common::*;
use larder::models::NewProduct;
use larder::LarderError;

fn product(name: &str, price_cents: i64) -> NewProduct {
  NewProduct {
    name: name.into(),
    description: None,
    price_cents,
    stock: 5,
  }
}

#[tokio::test]
async fn search_matches_name_or_description() {
  let sf = storefront().await;
  let tomato = seed_product(&sf, "Tomato", 299).await;
  seed_product(&sf, "Bread", 199).await;
  sf.catalog
    .create(&NewProduct {
      name: "Ketchup".into(),
      description: Some("Made from tomatoes".into()),
      price_cents: 349,
      stock: 3,
    })
    .await
    .unwrap();

  let names: Vec<String> = sf.catalog.search("TOMATO").await.unwrap().into_iter().map(|p| p.name).collect();
  assert_eq!(names, vec!["Ketchup", "Tomato"]);

  assert_eq!(sf.catalog.search("  ").await.unwrap().len(), 3);
  assert!(sf.catalog.search("100%").await.unwrap().is_empty());
  assert_eq!(sf.catalog.price_cents(tomato).await.unwrap(), 299);
}

#[tokio::test]
async fn invalid_products_are_rejected() {
  let sf = storefront().await;
  assert!(matches!(sf.catalog.create(&product(" ", 100)).await, Err(LarderError::InvalidArgument(_))));
  assert!(matches!(sf.catalog.create(&product("Salt", -1)).await, Err(LarderError::InvalidArgument(_))));
  assert_eq!(count(&sf, "products").await, 0);
}

#[tokio::test]
async fn update_and_lookup_of_missing_products_is_not_found() {
  let sf = storefront().await;
  assert!(matches!(sf.catalog.update(42, &product("Salt", 100)).await, Err(LarderError::NotFound(_))));
  assert!(matches!(sf.catalog.get(42).await, Err(LarderError::NotFound(_))));
  assert!(matches!(sf.catalog.price_cents(42).await, Err(LarderError::NotFound(_))));
  assert!(!sf.catalog.exists(42).await.unwrap());
}

#[tokio::test]
async fn deleting_a_product_drops_it_from_carts_but_not_from_orders() {
  let sf = storefront().await;
  let (tomato, _bread) = tomato_and_bread_cart(&sf, 1).await;
  let committed = sf.orders.commit(1, "123 Main St").await.unwrap();

  assert!(sf.catalog.delete(tomato).await.unwrap());
  assert!(!sf.catalog.delete(tomato).await.unwrap());

  assert!(sf.cart.line(1, tomato).await.unwrap().is_none());
  assert_eq!(sf.cart.snapshot(1).await.unwrap().total_cents(), 199);

  let details = sf.orders.get(committed.order_id).await.unwrap();
  assert_eq!(details.items.len(), 2);
  assert_eq!(details.order.total_cents, 797);
}
