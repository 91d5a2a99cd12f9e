// larder/src/models/mod.rs

//! Row types for the storefront tables, plus the derived views built from them.

pub mod cart;
pub mod order;
pub mod payment;
pub mod product;
pub mod user;

pub use cart::{CartLine, CartSnapshot, SnapshotLine};
pub use order::{CommittedOrder, Order, OrderDetails, OrderItem, OrderStatus};
pub use payment::{Payment, PaymentOutcome, PaymentRecord, PaymentStatus};
pub use product::{NewProduct, Product};
pub use user::{Role, User};

/// Renders integer cents as a dollar string, e.g. `797` -> `"$7.97"`.
pub fn format_cents(cents: i64) -> String {
  let sign = if cents < 0 { "-" } else { "" };
  let abs = cents.unsigned_abs();
  format!("{}${}.{:02}", sign, abs / 100, abs % 100)
}
