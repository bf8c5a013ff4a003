//! Storefront
//!
//! Cart and order-submission domain for a multi-vendor storefront: merge-on-add
//! cart lines, derived totals, delivery detail checks and the order payload
//! written at checkout.

pub mod cart;
pub mod checkout;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
