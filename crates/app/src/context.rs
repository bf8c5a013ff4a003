//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    config::AppConfig,
    domain::{
        carts::CartStore,
        checkout::{CheckoutEntry, CheckoutFlow, CheckoutSettings},
        orders::{BackendOrdersService, OrdersService},
    },
    navigation::Navigator,
    persistence::RestClient,
    storage::{FileStorage, LocalStorage},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to open local storage")]
    Storage(#[source] std::io::Error),
}

/// Everything a storefront session shares: one cart store, the orders
/// service and the navigator. Built once and passed to whatever needs it.
#[derive(Clone)]
pub struct AppContext {
    pub cart: Arc<CartStore>,
    pub orders: Arc<dyn OrdersService>,
    pub navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("cart", &self.cart)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the storage directory cannot be created.
    pub fn from_config(
        config: &AppConfig,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, AppInitError> {
        let storage =
            FileStorage::open(&config.storage.storage_dir).map_err(AppInitError::Storage)?;

        let client = RestClient::new(config.backend.rest_config());

        Ok(Self::new(
            Arc::new(storage),
            Arc::new(BackendOrdersService::with_collection(
                Arc::new(client),
                config.backend.orders_table.clone(),
            )),
            navigator,
        ))
    }

    /// Build application context from its collaborators.
    pub fn new(
        storage: Arc<dyn LocalStorage>,
        orders: Arc<dyn OrdersService>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            cart: Arc::new(CartStore::open(storage)),
            orders,
            navigator,
        }
    }

    /// Enter checkout with the session's cart.
    pub fn begin_checkout(&self, settings: CheckoutSettings) -> CheckoutEntry {
        CheckoutFlow::enter(
            Arc::clone(&self.cart),
            Arc::clone(&self.orders),
            Arc::clone(&self.navigator),
            settings,
        )
    }
}
