//! Orders service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use storefront::orders::NewOrder;
use tracing::{Span, info};

use crate::{
    domain::orders::errors::OrdersServiceError,
    persistence::{PersistenceClient, RecordId},
};

/// Default backend collection orders are written to.
pub const ORDERS_COLLECTION: &str = "orders";

/// Writes orders through the backend persistence client.
#[derive(Clone)]
pub struct BackendOrdersService {
    client: Arc<dyn PersistenceClient>,
    collection: String,
}

impl std::fmt::Debug for BackendOrdersService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendOrdersService")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

impl BackendOrdersService {
    #[must_use]
    pub fn new(client: Arc<dyn PersistenceClient>) -> Self {
        Self::with_collection(client, ORDERS_COLLECTION)
    }

    #[must_use]
    pub fn with_collection(client: Arc<dyn PersistenceClient>, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
        }
    }
}

#[async_trait]
impl OrdersService for BackendOrdersService {
    #[tracing::instrument(
        name = "orders.service.place_order",
        skip(self, order),
        fields(
            collection = %self.collection,
            lines = order.items.len(),
            total_amount = order.total_amount,
            order_id = tracing::field::Empty
        ),
        err
    )]
    async fn place_order(&self, order: NewOrder) -> Result<RecordId, OrdersServiceError> {
        let record = serde_json::to_value(&order)?;

        let id = self.client.insert(&self.collection, record).await?;

        Span::current().record("order_id", tracing::field::display(&id));

        info!(order_id = %id, "placed order");

        Ok(id)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Write a new order. Issues exactly one insert and never retries.
    async fn place_order(&self, order: NewOrder) -> Result<RecordId, OrdersServiceError>;
}
