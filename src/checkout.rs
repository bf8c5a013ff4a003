//! Checkout
//!
//! Delivery details, their completeness check, and the states a checkout
//! moves through. The async submission itself lives with the services that
//! own the backend connection.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A required delivery/contact field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryField {
    /// Shopper's full name.
    FullName,

    /// Contact email address.
    Email,

    /// Contact phone number.
    Phone,

    /// Delivery address.
    Address,
}

impl DeliveryField {
    /// Every required field, in form order.
    pub const ALL: [Self; 4] = [Self::FullName, Self::Email, Self::Phone, Self::Address];

    /// Human readable field label.
    pub fn label(self) -> &'static str {
        match self {
            Self::FullName => "full name",
            Self::Email => "email address",
            Self::Phone => "phone number",
            Self::Address => "delivery address",
        }
    }
}

impl Display for DeliveryField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.label())
    }
}

/// Fields that were left empty.
pub type MissingFields = SmallVec<[DeliveryField; 4]>;

/// Shopper-entered contact and address details.
///
/// Only presence is checked. Format checks on email or phone are left to
/// whatever collects the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryDetails {
    /// Shopper's full name.
    pub full_name: String,

    /// Contact email address.
    pub email: String,

    /// Contact phone number.
    pub phone: String,

    /// Delivery address.
    pub address: String,
}

impl DeliveryDetails {
    /// Current value of `field`.
    pub fn get(&self, field: DeliveryField) -> &str {
        match field {
            DeliveryField::FullName => &self.full_name,
            DeliveryField::Email => &self.email,
            DeliveryField::Phone => &self.phone,
            DeliveryField::Address => &self.address,
        }
    }

    /// Replace the value of `field`.
    pub fn set(&mut self, field: DeliveryField, value: impl Into<String>) {
        let slot = match field {
            DeliveryField::FullName => &mut self.full_name,
            DeliveryField::Email => &mut self.email,
            DeliveryField::Phone => &mut self.phone,
            DeliveryField::Address => &mut self.address,
        };

        *slot = value.into();
    }

    /// Required fields that are currently empty, in form order.
    pub fn missing_fields(&self) -> MissingFields {
        DeliveryField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_empty())
            .collect()
    }

    /// Whether every required field has a value.
    pub fn is_complete(&self) -> bool {
        DeliveryField::ALL
            .into_iter()
            .all(|field| !self.get(field).is_empty())
    }
}

/// Where a checkout currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckoutState {
    /// Shopper is filling in delivery details.
    #[default]
    Collecting,

    /// Payment instructions are shown; waiting for the shopper to confirm
    /// they have paid.
    Confirming,

    /// The order has been written. Terminal.
    Submitted,
}

impl Display for CheckoutState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Collecting => "collecting",
            Self::Confirming => "confirming",
            Self::Submitted => "submitted",
        })
    }
}

/// Bank account the shopper pays into, shown while confirming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDetails {
    /// Account holder name.
    pub account_name: String,

    /// Bank name.
    pub bank_name: String,

    /// Account number.
    pub account_number: String,

    /// Where proof of payment should be sent, e.g. a messaging link.
    pub support_contact: Option<String>,
}
