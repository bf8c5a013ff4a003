//! Storefront application services: the shopper's durable cart, checkout and
//! order submission, and the collaborators they talk to.

pub mod config;
pub mod context;
pub mod domain;
pub mod navigation;
pub mod observability;
pub mod persistence;
pub mod storage;
