// larder/src/store/users.rs
use crate::error::{LarderError, Result};
use crate::models::{Role, User};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, instrument, warn};

const USER_COLUMNS: &str = "user_id, name, email, password_hash, role, created_at";

/// Account rows. Password hashing happens before anything reaches this store.
#[derive(Debug, Clone)]
pub struct UserStore {
  pool: SqlitePool,
}

impl UserStore {
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }

  pub async fn register(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
    self.register_with_role(name, email, password_hash, Role::Customer).await
  }

  #[instrument(name = "users::register", skip(self, name, password_hash))]
  pub async fn register_with_role(&self, name: &str, email: &str, password_hash: &str, role: Role) -> Result<User> {
    let name = name.trim();
    let email = normalize_email(email);
    if name.is_empty() {
      return Err(LarderError::InvalidArgument("name is required".into()));
    }
    if !email.contains('@') {
      return Err(LarderError::InvalidArgument("a valid email is required".into()));
    }
    if password_hash.is_empty() {
      return Err(LarderError::InvalidArgument("password hash is required".into()));
    }

    let inserted = sqlx::query_as::<_, User>(&format!(
      "INSERT INTO users (name, email, password_hash, role, created_at) VALUES (?, ?, ?, ?, ?) RETURNING {}",
      USER_COLUMNS
    ))
    .bind(name)
    .bind(&email)
    .bind(password_hash)
    .bind(role)
    .bind(Utc::now())
    .fetch_one(&self.pool)
    .await;

    match inserted {
      Ok(user) => {
        info!(user_id = user.user_id, "User registered.");
        Ok(user)
      }
      Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
        warn!("Registration with an email that is already taken.");
        Err(LarderError::InvalidArgument("an account with this email already exists".into()))
      }
      Err(e) => Err(e.into()),
    }
  }

  pub async fn email_taken(&self, email: &str) -> Result<bool> {
    let taken = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
      .bind(normalize_email(email))
      .fetch_one(&self.pool)
      .await?;
    Ok(taken)
  }

  pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
      .bind(normalize_email(email))
      .fetch_optional(&self.pool)
      .await?;
    Ok(user)
  }

  pub async fn get(&self, user_id: i64) -> Result<User> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE user_id = ?", USER_COLUMNS))
      .bind(user_id)
      .fetch_optional(&self.pool)
      .await?
      .ok_or_else(|| LarderError::NotFound(format!("user {}", user_id)))
  }
}

fn normalize_email(email: &str) -> String {
  email.trim().to_lowercase()
}
