//! Cart snapshots.
//!
//! The stored form of a cart is a JSON array of lines. Each write replaces the
//! whole array; there are no deltas.

use storefront::{
    cart::{Cart, CartError, CartLine},
    pricing::{self, PricingError},
};
use thiserror::Error;

/// Errors raised while decoding a stored snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Stored text is not a valid list of lines.
    #[error("failed to parse cart snapshot")]
    Parse(#[from] serde_json::Error),

    /// Lines parsed but break a cart invariant.
    #[error("cart snapshot is inconsistent")]
    Invalid(#[from] CartError),
}

/// Point-in-time copy of the cart. Totals are derived from the lines on
/// every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSnapshot {
    lines: Vec<CartLine>,
}

impl CartSnapshot {
    /// Capture the lines of `cart`.
    pub fn of(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().to_vec(),
        }
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Check if the snapshot holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of `unit_price * quantity`, in minor units.
    pub fn subtotal(&self) -> Result<u64, PricingError> {
        pricing::subtotal(&self.lines)
    }

    /// Total number of units.
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .fold(0_u64, |count, line| count.saturating_add(line.quantity))
    }

    /// Encode as the stored JSON form.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.lines)
    }

    /// Decode the stored JSON form back into a cart.
    pub fn decode(raw: &str) -> Result<Cart, SnapshotError> {
        let lines: Vec<CartLine> = serde_json::from_str(raw)?;

        Ok(Cart::from_lines(lines)?)
    }
}
