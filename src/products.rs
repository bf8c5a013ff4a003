//! Products

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};

use crate::pricing;

/// Label shown when a vendor reference cannot be resolved to a name.
pub const UNKNOWN_VENDOR: &str = "Unknown vendor";

/// Stable product identity, as assigned by the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap a catalogue identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A colour token picked on the product page, e.g. `"#1e3a8a"` or `"red"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    /// Wrap a colour token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Borrow the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Vendor reference attached to a catalogue row.
///
/// Rows coming back from the backend carry the vendor either as a bare string,
/// as an embedded `{ id, business_name }` object (sometimes wrapped in a
/// one-element array), or not at all. Every shape is folded into one of these
/// variants when the row is deserialized, so call sites never inspect the raw
/// JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawVendor")]
pub enum VendorRef {
    /// A bare vendor string.
    Identifier(String),

    /// An embedded vendor object.
    Embedded {
        /// Vendor id, when the backend included one.
        id: Option<String>,

        /// Vendor business name.
        name: String,
    },

    /// Missing or unrecognised vendor data.
    #[default]
    Unknown,
}

impl VendorRef {
    /// Name to show for this vendor. Never fails; unresolvable references
    /// map to [`UNKNOWN_VENDOR`].
    pub fn display_name(&self) -> &str {
        match self {
            Self::Identifier(name) | Self::Embedded { name, .. } if !name.is_empty() => name,
            _ => UNKNOWN_VENDOR,
        }
    }

    /// Vendor id, when the reference carries a non-empty one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Embedded { id: Some(id), .. } if !id.is_empty() => Some(id),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawVendor {
    Name(String),
    Embedded(RawEmbeddedVendor),
    List(Vec<RawEmbeddedVendor>),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
struct RawEmbeddedVendor {
    #[serde(default)]
    id: Option<String>,

    #[serde(default, alias = "business_name")]
    name: String,
}

impl From<RawEmbeddedVendor> for VendorRef {
    fn from(value: RawEmbeddedVendor) -> Self {
        Self::Embedded {
            id: value.id,
            name: value.name,
        }
    }
}

impl From<RawVendor> for VendorRef {
    fn from(value: RawVendor) -> Self {
        match value {
            RawVendor::Name(name) => Self::Identifier(name),
            RawVendor::Embedded(vendor) => vendor.into(),
            RawVendor::List(vendors) => vendors
                .into_iter()
                .next()
                .map_or(Self::Unknown, Into::into),
            RawVendor::Other(_) => Self::Unknown,
        }
    }
}

/// Catalogue product row, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Product {
    /// Product identity.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Unit price in minor currency units. The backend column holds the
    /// decimal major-unit amount, e.g. `15000.5` for ₦15,000.50.
    #[serde(deserialize_with = "deserialize_major_price")]
    pub price: u64,

    /// Primary image, if any.
    #[serde(default)]
    pub image_url: Option<String>,

    /// Owning vendor id column.
    #[serde(default)]
    pub vendor_id: Option<String>,

    /// Joined vendor data.
    #[serde(default, rename = "vendors")]
    pub vendor: VendorRef,
}

impl Product {
    /// Vendor label recorded on cart lines: the vendor id when present,
    /// otherwise the resolved vendor name.
    pub fn vendor_label(&self) -> &str {
        self.vendor_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| self.vendor.id())
            .unwrap_or_else(|| self.vendor.display_name())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Integer(u64),
    Float(f64),
    Text(String),
}

fn deserialize_major_price<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    let amount = match RawPrice::deserialize(deserializer)? {
        RawPrice::Integer(amount) => Decimal::from(amount),
        RawPrice::Float(amount) => {
            Decimal::from_str(&amount.to_string()).map_err(D::Error::custom)?
        }
        RawPrice::Text(amount) => Decimal::from_str(amount.trim()).map_err(D::Error::custom)?,
    };

    pricing::minor_from_major(amount).map_err(D::Error::custom)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn vendor_from_plain_string() -> TestResult {
        let vendor: VendorRef = serde_json::from_value(json!("Ade Fabrics"))?;

        assert_eq!(vendor, VendorRef::Identifier("Ade Fabrics".to_string()));
        assert_eq!(vendor.display_name(), "Ade Fabrics");
        assert_eq!(vendor.id(), None);

        Ok(())
    }

    #[test]
    fn vendor_from_embedded_business_name() -> TestResult {
        let vendor: VendorRef =
            serde_json::from_value(json!({ "id": "v-1", "business_name": "Kemi Crafts" }))?;

        assert_eq!(vendor.display_name(), "Kemi Crafts");
        assert_eq!(vendor.id(), Some("v-1"));

        Ok(())
    }

    #[test]
    fn vendor_from_array_takes_first_entry() -> TestResult {
        let vendor: VendorRef = serde_json::from_value(json!([
            { "business_name": "First" },
            { "business_name": "Second" }
        ]))?;

        assert_eq!(vendor.display_name(), "First");

        Ok(())
    }

    #[test]
    fn vendor_from_embedded_id_without_name() -> TestResult {
        let vendor: VendorRef = serde_json::from_value(json!({ "id": "v-1" }))?;

        assert_eq!(vendor.id(), Some("v-1"));
        assert_eq!(vendor.display_name(), UNKNOWN_VENDOR);

        Ok(())
    }

    #[test]
    fn vendor_from_unexpected_shapes_is_unknown() -> TestResult {
        for value in [json!(null), json!(42), json!([]), json!(["v-1"])] {
            let vendor: VendorRef = serde_json::from_value(value.clone())?;

            assert_eq!(vendor, VendorRef::Unknown, "{value} should be unknown");
            assert_eq!(vendor.display_name(), UNKNOWN_VENDOR);
        }

        Ok(())
    }

    #[test]
    fn empty_vendor_name_displays_unknown() {
        assert_eq!(
            VendorRef::Identifier(String::new()).display_name(),
            UNKNOWN_VENDOR
        );
    }

    #[test]
    fn product_vendor_label_prefers_vendor_id() -> TestResult {
        let product: Product = serde_json::from_value(json!({
            "id": "p1",
            "name": "Ankara Tote",
            "price": 1000,
            "vendor_id": "v-9",
            "vendors": { "id": "v-1", "business_name": "Kemi Crafts" }
        }))?;

        assert_eq!(product.vendor_label(), "v-9");

        Ok(())
    }

    #[test]
    fn product_vendor_label_uses_embedded_id_without_name() -> TestResult {
        let product: Product = serde_json::from_value(json!({
            "id": "p1",
            "name": "Ankara Tote",
            "price": 1000,
            "vendors": { "id": "v-1" }
        }))?;

        assert_eq!(product.vendor_label(), "v-1");

        Ok(())
    }

    #[test]
    fn product_price_is_read_as_major_units() -> TestResult {
        for (price, expected) in [
            (json!(15000), 1_500_000),
            (json!(15000.5), 1_500_050),
            (json!(15000.00), 1_500_000),
            (json!("2499.99"), 249_999),
            (json!(0), 0),
        ] {
            let product: Product = serde_json::from_value(json!({
                "id": "p1",
                "name": "Ankara Tote",
                "price": price.clone(),
                "vendors": "Kemi Crafts"
            }))?;

            assert_eq!(product.price, expected, "price {price}");
        }

        Ok(())
    }

    #[test]
    fn product_price_rejects_negative_and_garbage() {
        for price in [json!(-5), json!(-0.5), json!("abc"), json!(null)] {
            let result = serde_json::from_value::<Product>(json!({
                "id": "p1",
                "name": "Ankara Tote",
                "price": price.clone(),
            }));

            assert!(result.is_err(), "price {price} should be rejected");
        }
    }

    #[test]
    fn product_vendor_label_falls_back_to_name() -> TestResult {
        let product: Product = serde_json::from_value(json!({
            "id": "p1",
            "name": "Ankara Tote",
            "price": 1000,
            "vendor_id": "",
            "vendors": "Kemi Crafts"
        }))?;

        assert_eq!(product.vendor_label(), "Kemi Crafts");
        assert_eq!(product.image_url, None);

        Ok(())
    }
}
