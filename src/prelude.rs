//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine, ColorSelection, NewCartLine, QuantityUpdate},
    checkout::{BankDetails, CheckoutState, DeliveryDetails, DeliveryField, MissingFields},
    orders::{IdempotencyKey, NewOrder, OrderError, OrderStatus, PaymentReference},
    pricing::{PricingError, STORE_CURRENCY, format_amount, to_money},
    products::{Color, Product, ProductId, UNKNOWN_VENDOR, VendorRef},
};
