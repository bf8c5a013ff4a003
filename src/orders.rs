//! Orders
//!
//! The record written once when a shopper confirms payment. Status changes
//! after that point are made by the back office, never here.

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    cart::{CartLine, ColorSelection},
    checkout::{DeliveryDetails, MissingFields},
    pricing::{self, PricingError},
    products::ProductId,
};

/// Errors raised while building an order payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// There is nothing to order.
    #[error("cannot place an order for an empty cart")]
    EmptyCart,

    /// Required delivery details are missing.
    #[error("missing delivery details: {0:?}")]
    IncompleteDetails(MissingFields),

    /// The order total could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Awaiting payment confirmation.
    #[default]
    Pending,

    /// Payment confirmed and order fulfilled.
    Completed,

    /// Order cancelled.
    Cancelled,
}

/// How the order is paid for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentReference {
    /// Manual bank transfer, confirmed out of band.
    #[default]
    #[serde(rename = "BANK_TRANSFER")]
    BankTransfer,
}

/// Client-generated token identifying one checkout's order write, so that a
/// backend that honours it can drop duplicate inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(Uuid);

impl IdempotencyKey {
    /// Generate a fresh, time-ordered key.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    pub const fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Display for IdempotencyKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// Order write payload.
///
/// Amounts are held in minor units but written in major units, matching the
/// backend's decimal `price` and `total_amount` columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrder {
    /// Contact email address.
    pub user_email: String,

    /// Shopper's full name.
    pub user_name: String,

    /// Contact phone number.
    pub user_phone: String,

    /// Delivery address.
    pub user_address: String,

    /// Cart lines at the time of submission.
    #[serde(serialize_with = "serialize_items")]
    pub items: Vec<CartLine>,

    /// Sum of line totals, in minor units.
    #[serde(serialize_with = "serialize_major")]
    pub total_amount: u64,

    /// Payment method marker.
    pub payment_reference: PaymentReference,

    /// Initial status.
    pub status: OrderStatus,

    /// Optional de-duplication token. Only send one to a backend whose orders
    /// table has an `idempotency_key` column; PostgREST rejects unknown
    /// columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<IdempotencyKey>,
}

impl NewOrder {
    /// Build a pending bank-transfer order from the cart lines and delivery
    /// details.
    ///
    /// # Errors
    ///
    /// - [`OrderError::EmptyCart`]: `items` is empty.
    /// - [`OrderError::IncompleteDetails`]: a required delivery field is empty.
    /// - [`OrderError::Pricing`]: the total overflowed.
    pub fn bank_transfer(
        items: &[CartLine],
        delivery: &DeliveryDetails,
        idempotency_key: Option<IdempotencyKey>,
    ) -> Result<Self, OrderError> {
        if items.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let missing = delivery.missing_fields();

        if !missing.is_empty() {
            return Err(OrderError::IncompleteDetails(missing));
        }

        Ok(Self {
            user_email: delivery.email.clone(),
            user_name: delivery.full_name.clone(),
            user_phone: delivery.phone.clone(),
            user_address: delivery.address.clone(),
            items: items.to_vec(),
            total_amount: pricing::subtotal(items)?,
            payment_reference: PaymentReference::BankTransfer,
            status: OrderStatus::Pending,
            idempotency_key,
        })
    }
}

/// A cart line as written into the order's `items` column.
#[derive(Serialize)]
struct OrderItemRecord<'a> {
    id: &'a ProductId,
    name: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    quantity: u64,
    image_url: Option<&'a str>,
    vendor: &'a str,
    colors: &'a ColorSelection,
}

impl<'a> From<&'a CartLine> for OrderItemRecord<'a> {
    fn from(line: &'a CartLine) -> Self {
        Self {
            id: &line.product_id,
            name: &line.name,
            price: pricing::major_from_minor(line.unit_price),
            quantity: line.quantity,
            image_url: line.image_url.as_deref(),
            vendor: &line.vendor_label,
            colors: &line.colors,
        }
    }
}

fn serialize_items<S>(items: &[CartLine], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(items.iter().map(OrderItemRecord::from))
}

fn serialize_major<S>(amount: &u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    rust_decimal::serde::float::serialize(&pricing::major_from_minor(*amount), serializer)
}
