// larder/src/storefront.rs
use crate::checkout::Checkout;
use crate::payment::PaymentAuthorizer;
use crate::store::{CartStore, OrderCommitter, PaymentRecorder, ProductCatalog, UserStore};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Every component wired to one pool, the way a server or a test wants them.
#[derive(Clone)]
pub struct Storefront {
  pub pool: SqlitePool,
  pub catalog: ProductCatalog,
  pub users: UserStore,
  pub cart: CartStore,
  pub orders: OrderCommitter,
  pub payments: PaymentRecorder,
  pub checkout: Arc<Checkout>,
}

impl Storefront {
  pub fn new(pool: SqlitePool, authorizer: Arc<dyn PaymentAuthorizer>) -> Self {
    let catalog = ProductCatalog::new(pool.clone());
    let users = UserStore::new(pool.clone());
    let cart = CartStore::new(pool.clone(), catalog.clone());
    let orders = OrderCommitter::new(pool.clone(), cart.clone());
    let payments = PaymentRecorder::new(pool.clone(), authorizer);
    let checkout = Arc::new(Checkout::new(cart.clone(), orders.clone(), payments.clone()));

    Self {
      pool,
      catalog,
      users,
      cart,
      orders,
      payments,
      checkout,
    }
  }
}
