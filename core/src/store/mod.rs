// larder/src/store/mod.rs

//! SQL-backed components. Each one owns a clone of the pool handed to it at
//! construction and scopes connections and transactions to a single call.

pub mod cart;
pub mod catalog;
pub mod orders;
pub mod payments;
pub mod users;

pub use cart::{CartStore, MAX_LINE_QUANTITY};
pub use catalog::ProductCatalog;
pub use orders::OrderCommitter;
pub use payments::PaymentRecorder;
pub use users::UserStore;
