// larder/src/payment.rs

//! The seam between the payment recorder and whatever decides if a charge goes through.
//! Only the outcome is persisted; no gateway protocol lives in this crate.

use async_trait::async_trait;
use std::collections::HashSet;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
  pub order_id: i64,
  pub amount_cents: i64,
  pub method: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
  pub approved: bool,
  /// Provider-side identifier, stored on the payment row either way.
  pub reference: String,
}

#[async_trait]
pub trait PaymentAuthorizer: Send + Sync {
  async fn authorize(&self, request: &AuthorizationRequest) -> Authorization;
}

/// Approves everything except a configured set of payment method names.
#[derive(Debug, Clone)]
pub struct SimulatedAuthorizer {
  declined_methods: HashSet<String>,
}

impl SimulatedAuthorizer {
  pub fn new<I, S>(declined_methods: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    Self {
      declined_methods: declined_methods
        .into_iter()
        .map(|m| m.as_ref().trim().to_lowercase())
        .filter(|m| !m.is_empty())
        .collect(),
    }
  }

  pub fn declines(&self, method: &str) -> bool {
    self.declined_methods.contains(&method.trim().to_lowercase())
  }
}

impl Default for SimulatedAuthorizer {
  fn default() -> Self {
    Self::new(["declined"])
  }
}

#[async_trait]
impl PaymentAuthorizer for SimulatedAuthorizer {
  #[instrument(skip(self, request), fields(order_id = request.order_id, amount_cents = request.amount_cents, method = %request.method))]
  async fn authorize(&self, request: &AuthorizationRequest) -> Authorization {
    let approved = !self.declines(&request.method);
    let reference = format!("sim_{}", Uuid::new_v4().simple());
    info!(approved, %reference, "Simulated authorization decided.");
    Authorization { approved, reference }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn request(method: &str) -> AuthorizationRequest {
    AuthorizationRequest {
      order_id: 5,
      amount_cents: 797,
      method: method.to_string(),
    }
  }

  #[tokio::test]
  async fn default_declines_only_the_declined_method() {
    let auth = SimulatedAuthorizer::default();
    assert!(auth.authorize(&request("card")).await.approved);
    assert!(!auth.authorize(&request("declined")).await.approved);
    assert!(!auth.authorize(&request(" Declined ")).await.approved);
  }

  #[tokio::test]
  async fn references_are_unique_and_prefixed() {
    let auth = SimulatedAuthorizer::new(Vec::<String>::new());
    let a = auth.authorize(&request("card")).await;
    let b = auth.authorize(&request("card")).await;
    assert!(a.reference.starts_with("sim_"));
    assert_ne!(a.reference, b.reference);
  }
}
