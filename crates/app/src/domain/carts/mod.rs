//! Carts

pub mod snapshot;
pub mod store;

pub use snapshot::{CartSnapshot, SnapshotError};
pub use store::{CART_STORAGE_KEY, CartStore};
