// larder/src/store/catalog.rs
use crate::error::{LarderError, Result};
use crate::models::{NewProduct, Product};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, instrument, warn};

const PRODUCT_COLUMNS: &str = "product_id, name, description, price_cents, stock, created_at";

/// Product lookups used by the cart, plus the admin-facing catalog maintenance.
#[derive(Debug, Clone)]
pub struct ProductCatalog {
  pool: SqlitePool,
}

impl ProductCatalog {
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }

  #[instrument(name = "catalog::exists", skip(self))]
  pub async fn exists(&self, product_id: i64) -> Result<bool> {
    let found = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE product_id = ?)")
      .bind(product_id)
      .fetch_one(&self.pool)
      .await?;
    Ok(found)
  }

  #[instrument(name = "catalog::price_cents", skip(self))]
  pub async fn price_cents(&self, product_id: i64) -> Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT price_cents FROM products WHERE product_id = ?")
      .bind(product_id)
      .fetch_optional(&self.pool)
      .await?
      .ok_or_else(|| LarderError::NotFound(format!("product {}", product_id)))
  }

  #[instrument(name = "catalog::get", skip(self))]
  pub async fn get(&self, product_id: i64) -> Result<Product> {
    sqlx::query_as::<_, Product>(&format!("SELECT {} FROM products WHERE product_id = ?", PRODUCT_COLUMNS))
      .bind(product_id)
      .fetch_optional(&self.pool)
      .await?
      .ok_or_else(|| LarderError::NotFound(format!("product {}", product_id)))
  }

  pub async fn list(&self) -> Result<Vec<Product>> {
    let products =
      sqlx::query_as::<_, Product>(&format!("SELECT {} FROM products ORDER BY name ASC, product_id ASC", PRODUCT_COLUMNS))
        .fetch_all(&self.pool)
        .await?;
    Ok(products)
  }

  /// Case-insensitive substring match on name or description. A blank term lists everything.
  #[instrument(name = "catalog::search", skip(self))]
  pub async fn search(&self, term: &str) -> Result<Vec<Product>> {
    let term = term.trim();
    if term.is_empty() {
      return self.list().await;
    }
    let pattern = format!("%{}%", escape_like(term));
    let products = sqlx::query_as::<_, Product>(&format!(
      "SELECT {} FROM products \
       WHERE name LIKE ?1 ESCAPE '\\' OR description LIKE ?1 ESCAPE '\\' \
       ORDER BY name ASC, product_id ASC",
      PRODUCT_COLUMNS
    ))
    .bind(pattern)
    .fetch_all(&self.pool)
    .await?;
    Ok(products)
  }

  #[instrument(name = "catalog::create", skip(self, product), fields(name = %product.name))]
  pub async fn create(&self, product: &NewProduct) -> Result<Product> {
    validate(product)?;
    let created = sqlx::query_as::<_, Product>(&format!(
      "INSERT INTO products (name, description, price_cents, stock, created_at) \
       VALUES (?, ?, ?, ?, ?) RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(product.name.trim())
    .bind(&product.description)
    .bind(product.price_cents)
    .bind(product.stock)
    .bind(Utc::now())
    .fetch_one(&self.pool)
    .await?;
    info!(product_id = created.product_id, "Product created.");
    Ok(created)
  }

  /// Replaces a product's editable fields. Existing order items keep their frozen prices.
  #[instrument(name = "catalog::update", skip(self, product))]
  pub async fn update(&self, product_id: i64, product: &NewProduct) -> Result<Product> {
    validate(product)?;
    let updated = sqlx::query_as::<_, Product>(&format!(
      "UPDATE products SET name = ?, description = ?, price_cents = ?, stock = ? \
       WHERE product_id = ? RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(product.name.trim())
    .bind(&product.description)
    .bind(product.price_cents)
    .bind(product.stock)
    .bind(product_id)
    .fetch_optional(&self.pool)
    .await?
    .ok_or_else(|| LarderError::NotFound(format!("product {}", product_id)))?;
    info!("Product updated.");
    Ok(updated)
  }

  /// Returns whether a product was removed. Cart lines referencing it go with it.
  #[instrument(name = "catalog::delete", skip(self))]
  pub async fn delete(&self, product_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM products WHERE product_id = ?")
      .bind(product_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}

fn validate(product: &NewProduct) -> Result<()> {
  if product.name.trim().is_empty() {
    warn!("Rejected product without a name.");
    return Err(LarderError::InvalidArgument("product name is required".into()));
  }
  if product.price_cents < 0 {
    return Err(LarderError::InvalidArgument("price must not be negative".into()));
  }
  if product.stock < 0 {
    return Err(LarderError::InvalidArgument("stock must not be negative".into()));
  }
  Ok(())
}

fn escape_like(term: &str) -> String {
  let mut escaped = String::with_capacity(term.len());
  for c in term.chars() {
    if matches!(c, '%' | '_' | '\\') {
      escaped.push('\\');
    }
    escaped.push(c);
  }
  escaped
}
