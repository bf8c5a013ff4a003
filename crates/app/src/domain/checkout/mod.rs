//! Checkout

pub mod clear;
pub mod errors;
pub mod flow;
pub mod settings;

pub use clear::{DeferredClear, PendingClear};
pub use errors::CheckoutError;
pub use flow::{CheckoutEntry, CheckoutFlow, OrderPlaced};
pub use settings::{CheckoutSettings, ClearPolicy, IdempotencyPolicy};
