//! Cart store.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard},
};

use storefront::{
    cart::{Cart, CartLine, NewCartLine, QuantityUpdate},
    pricing::PricingError,
    products::ProductId,
};
use tracing::{debug, warn};

use crate::{domain::carts::snapshot::CartSnapshot, storage::LocalStorage};

/// Storage key the cart snapshot is kept under.
pub const CART_STORAGE_KEY: &str = "storefront_cart";

/// The shopper's cart for the current session, kept durable in local storage.
///
/// Created once per session and handed to whatever needs it. Every mutation
/// updates the in-memory cart and then writes a complete snapshot; a failed
/// write is logged and the in-memory update stands.
pub struct CartStore {
    cart: RwLock<Cart>,
    storage: Arc<dyn LocalStorage>,
    key: String,
}

impl Debug for CartStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("cart", &self.cart)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Restore the cart stored under [`CART_STORAGE_KEY`].
    pub fn open(storage: Arc<dyn LocalStorage>) -> Self {
        Self::open_with_key(storage, CART_STORAGE_KEY)
    }

    /// Restore the cart stored under `key`.
    ///
    /// A missing, unreadable or inconsistent snapshot yields an empty cart.
    pub fn open_with_key(storage: Arc<dyn LocalStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let cart = restore(storage.as_ref(), &key);

        debug!(key = %key, lines = cart.len(), "restored cart");

        Self {
            cart: RwLock::new(cart),
            storage,
            key,
        }
    }

    /// Copy of the current cart.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::of(&self.read())
    }

    /// Current lines, in insertion order.
    pub fn lines(&self) -> Vec<CartLine> {
        self.read().lines().to_vec()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Total number of units.
    pub fn item_count(&self) -> u64 {
        self.read().item_count()
    }

    /// Sum of `unit_price * quantity`, in minor units.
    pub fn subtotal(&self) -> Result<u64, PricingError> {
        self.read().subtotal()
    }

    /// Add one unit of a product. See [`Cart::add_item`].
    ///
    /// Returns the line's quantity after the add.
    pub fn add_item(&self, item: NewCartLine) -> u64 {
        let product_id = item.product_id.clone();
        let quantity = self.mutate(|cart| cart.add_item(item));

        debug!(%product_id, quantity, "added item to cart");

        quantity
    }

    /// Add `units` units of a product, one [`CartStore::add_item`] at a time.
    ///
    /// Returns the line's quantity afterwards, or `None` when `units` is zero
    /// and nothing was added.
    pub fn add_units(&self, item: &NewCartLine, units: u32) -> Option<u64> {
        (0..units).fold(None, |_, _| Some(self.add_item(item.clone())))
    }

    /// Remove the line for `product_id`, if present.
    pub fn remove_item(&self, product_id: &ProductId) -> bool {
        let removed = self.mutate(|cart| cart.remove_item(product_id));

        debug!(%product_id, removed, "removed item from cart");

        removed
    }

    /// Overwrite a line's quantity; zero or less removes it.
    pub fn set_quantity(&self, product_id: &ProductId, quantity: i64) -> QuantityUpdate {
        let update = self.mutate(|cart| cart.set_quantity(product_id, quantity));

        debug!(%product_id, quantity, ?update, "set cart item quantity");

        update
    }

    /// Empty the cart.
    pub fn clear(&self) {
        self.mutate(Cart::clear);

        debug!("cleared cart");
    }

    fn read(&self) -> RwLockReadGuard<'_, Cart> {
        self.cart.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate<R>(&self, change: impl FnOnce(&mut Cart) -> R) -> R {
        let mut cart = self.cart.write().unwrap_or_else(PoisonError::into_inner);

        let result = change(&mut cart);

        // Persist while still holding the write lock so snapshots land in
        // mutation order.
        self.persist(&cart);

        result
    }

    fn persist(&self, cart: &Cart) {
        let encoded = match CartSnapshot::of(cart).encode() {
            Ok(encoded) => encoded,
            Err(error) => {
                warn!(key = %self.key, %error, "failed to encode cart snapshot");
                return;
            }
        };

        if let Err(error) = self.storage.set(&self.key, &encoded) {
            warn!(key = %self.key, %error, "failed to persist cart snapshot");
        }
    }
}

fn restore(storage: &dyn LocalStorage, key: &str) -> Cart {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Cart::new(),
        Err(error) => {
            warn!(key, %error, "failed to read cart snapshot, starting empty");
            return Cart::new();
        }
    };

    CartSnapshot::decode(&raw).unwrap_or_else(|error| {
        warn!(key, %error, "discarding unreadable cart snapshot");
        Cart::new()
    })
}
