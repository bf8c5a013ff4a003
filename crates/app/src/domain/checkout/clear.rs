//! Deferred cart clearing.
//!
//! After an order is placed the shopper is sent to the confirmation view
//! first, and the cart is emptied afterwards, so that view can still read
//! what was ordered.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::carts::CartStore;

/// How the post-order cart clear will happen.
#[derive(Debug)]
pub enum DeferredClear {
    /// A timer task that clears the cart when it fires.
    Timer(JoinHandle<()>),

    /// A handle the destination view releases once it has what it needs.
    Acknowledge(PendingClear),
}

impl DeferredClear {
    pub(crate) fn after(cart: Arc<CartStore>, delay: std::time::Duration) -> Self {
        Self::Timer(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            debug!(?delay, "clear delay elapsed");

            cart.clear();
        }))
    }

    pub(crate) fn on_acknowledge(cart: Arc<CartStore>) -> Self {
        Self::Acknowledge(PendingClear { cart: Some(cart) })
    }

    /// Wait for, or trigger, the clear.
    ///
    /// For a timer this waits until it has fired; for an acknowledgement
    /// handle it clears immediately.
    pub async fn complete(self) {
        match self {
            Self::Timer(handle) => {
                if let Err(error) = handle.await {
                    debug!(%error, "cart clear task did not finish");
                }
            }
            Self::Acknowledge(pending) => pending.acknowledge(),
        }
    }
}

/// Clears the cart when acknowledged or dropped, whichever comes first.
#[derive(Debug)]
#[must_use = "dropping a PendingClear clears the cart immediately"]
pub struct PendingClear {
    cart: Option<Arc<CartStore>>,
}

impl PendingClear {
    /// The destination view has captured the order; clear the cart now.
    pub fn acknowledge(mut self) {
        self.clear_now();
    }

    fn clear_now(&mut self) {
        if let Some(cart) = self.cart.take() {
            cart.clear();
        }
    }
}

impl Drop for PendingClear {
    fn drop(&mut self) {
        self.clear_now();
    }
}
