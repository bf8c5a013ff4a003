//! Checkout errors.

use storefront::{
    checkout::{CheckoutState, MissingFields},
    orders::OrderError,
    pricing::PricingError,
};
use thiserror::Error;

use crate::domain::orders::OrdersServiceError;

/// Checkout error variants.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Another confirmation from this checkout is still being written.
    #[error("an order submission is already in progress")]
    AlreadySubmitting,

    /// The requested step is not valid from the current state.
    #[error("checkout is {current}, expected {expected}")]
    InvalidState {
        /// Where the checkout is.
        current: CheckoutState,

        /// Where it needed to be.
        expected: CheckoutState,
    },

    /// Required delivery details are missing.
    #[error("missing delivery details: {0:?}")]
    IncompleteDetails(MissingFields),

    /// The cart was emptied after checkout began.
    #[error("cart is empty")]
    EmptyCart,

    /// The order total could not be computed.
    #[error("failed to compute order total")]
    Pricing(#[source] PricingError),

    /// The order write failed. Nothing was recorded; the shopper may retry.
    #[error("failed to save order")]
    Persistence(#[source] OrdersServiceError),
}

impl CheckoutError {
    /// Whether the shopper can retry the same confirmation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_) | Self::AlreadySubmitting)
    }
}

impl From<OrderError> for CheckoutError {
    fn from(error: OrderError) -> Self {
        match error {
            OrderError::EmptyCart => Self::EmptyCart,
            OrderError::IncompleteDetails(missing) => Self::IncompleteDetails(missing),
            OrderError::Pricing(source) => Self::Pricing(source),
        }
    }
}

impl From<OrdersServiceError> for CheckoutError {
    fn from(error: OrdersServiceError) -> Self {
        Self::Persistence(error)
    }
}
