// larder-server/src/seed.rs

use crate::errors::Result;
use crate::services::auth_service;
use larder::models::{NewProduct, Role};
use larder::Storefront;
use tracing::{info, instrument};

const SEED_ADMIN_EMAIL: &str = "admin@larder.local";

const GROCERIES: &[(&str, &str, i64, i64)] = &[
  ("Tomato", "Vine-ripened, sold each", 299, 120),
  ("Bread", "Sourdough loaf", 199, 40),
  ("Milk", "1 litre, whole", 129, 60),
  ("Eggs", "Free range, dozen", 349, 30),
  ("Apples", "Gala, 1kg bag", 425, 25),
  ("Rice", "Basmati, 2kg", 699, 15),
];

/// Fills an empty catalog with a few groceries and, when a password is given, creates the
/// admin account. Safe to run on every start.
#[instrument(name = "seed::run", skip(storefront, admin_password))]
pub async fn run(storefront: &Storefront, admin_password: Option<&str>) -> Result<()> {
  if storefront.catalog.list().await?.is_empty() {
    for (name, description, price_cents, stock) in GROCERIES {
      storefront
        .catalog
        .create(&NewProduct {
          name: name.to_string(),
          description: Some(description.to_string()),
          price_cents: *price_cents,
          stock: *stock,
        })
        .await?;
    }
    info!(count = GROCERIES.len(), "Seeded catalog.");
  }

  if let Some(password) = admin_password {
    if !storefront.users.email_taken(SEED_ADMIN_EMAIL).await? {
      let hash = auth_service::hash_password(password)?;
      storefront
        .users
        .register_with_role("Administrator", SEED_ADMIN_EMAIL, &hash, Role::Admin)
        .await?;
      info!(email = SEED_ADMIN_EMAIL, "Seeded admin account.");
    }
  }
  Ok(())
}
