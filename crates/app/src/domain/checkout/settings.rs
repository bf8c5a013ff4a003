//! Checkout settings.

use std::time::Duration;

use storefront::checkout::BankDetails;

/// Default pause between leaving checkout and clearing the cart.
pub const DEFAULT_CLEAR_DELAY: Duration = Duration::from_millis(500);

/// When the cart is cleared after a successful order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearPolicy {
    /// Clear on a timer once this much time has passed after navigating away.
    AfterDelay(Duration),

    /// Clear when the destination view acknowledges the order, or drops its
    /// handle.
    OnAcknowledge,
}

impl Default for ClearPolicy {
    fn default() -> Self {
        Self::AfterDelay(DEFAULT_CLEAR_DELAY)
    }
}

/// Whether order writes carry a client-generated idempotency key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdempotencyPolicy {
    /// No key is sent. A retry after an ambiguous failure may create a
    /// duplicate order.
    #[default]
    Disabled,

    /// One key per checkout, reused across retries from that checkout.
    ///
    /// The key is written to an `idempotency_key` column, so the backend's
    /// orders table needs one (ideally with a unique constraint). Without it
    /// the insert is rejected and every confirmation fails.
    ClientToken,
}

/// Settings shared by every checkout in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// Account shown to the shopper for the bank transfer.
    pub bank: BankDetails,

    /// When to clear the cart after an order is placed.
    pub clear_policy: ClearPolicy,

    /// Idempotency key behaviour.
    pub idempotency: IdempotencyPolicy,
}

impl CheckoutSettings {
    /// Settings with the default clear and idempotency policies.
    pub fn new(bank: BankDetails) -> Self {
        Self {
            bank,
            clear_policy: ClearPolicy::default(),
            idempotency: IdempotencyPolicy::default(),
        }
    }
}
