// larder/src/lib.rs

//! Larder: the cart → order → payment protocol of a small grocery storefront.
//!
//!  - [`CartStore`] keeps one row per (user, product) and sums repeated adds.
//!  - [`OrderCommitter`] freezes a cart snapshot into an order and its items in one transaction.
//!  - [`PaymentRecorder`] stores a payment attempt and confirms the order atomically on success.
//!  - [`Checkout`] chains the three with the [`flow`] engine and clears the cart only after
//!    a confirmed payment.

pub mod checkout;
pub mod db;
pub mod error;
pub mod flow;
pub mod models;
pub mod payment;
pub mod store;
pub mod storefront;

pub use crate::checkout::{Checkout, CheckoutReceipt, CheckoutRequest};
pub use crate::error::{LarderError, Result};
pub use crate::payment::{Authorization, AuthorizationRequest, PaymentAuthorizer, SimulatedAuthorizer};
pub use crate::store::{CartStore, OrderCommitter, PaymentRecorder, ProductCatalog, UserStore, MAX_LINE_QUANTITY};
pub use crate::storefront::Storefront;
