//! Cart
//!
//! The in-memory cart: an ordered list of lines, at most one per product.
//! Totals are never stored; they are recomputed from the lines on every read.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    pricing::{self, PricingError},
    products::{Color, Product, ProductId},
};

/// Colours recorded against a line. Holds zero or one entry: the colour that
/// was selected when the line was first created.
pub type ColorSelection = SmallVec<[Color; 1]>;

/// Errors raised when rebuilding a cart from previously stored lines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The same product appears on more than one line.
    #[error("product {0} appears on more than one line")]
    DuplicateLine(ProductId),

    /// A line has a quantity of zero.
    #[error("product {0} has a zero quantity")]
    ZeroQuantity(ProductId),
}

/// One distinct product held in the cart.
///
/// Field names on the wire match the stored snapshot format:
/// `{ id, name, price, quantity, image_url, vendor, colors }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product identity; unique within a cart.
    #[serde(rename = "id")]
    pub product_id: ProductId,

    /// Product name at the time it was added.
    pub name: String,

    /// Unit price in minor currency units. The local snapshot stores it as
    /// is; order payloads convert it to major units.
    #[serde(rename = "price")]
    pub unit_price: u64,

    /// Number of units, always at least one.
    pub quantity: u64,

    /// Product image, if any.
    #[serde(default)]
    pub image_url: Option<String>,

    /// Vendor id or display name.
    #[serde(rename = "vendor", default)]
    pub vendor_label: String,

    /// Selected colour, if any.
    #[serde(default)]
    pub colors: ColorSelection,
}

impl CartLine {
    /// `unit_price * quantity`, in minor units.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the product overflows.
    pub fn line_total(&self) -> Result<u64, PricingError> {
        pricing::line_total(self)
    }
}

/// Input to [`Cart::add_item`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartLine {
    /// Product identity.
    pub product_id: ProductId,

    /// Product name.
    pub name: String,

    /// Unit price in minor currency units.
    pub unit_price: u64,

    /// Product image, if any.
    pub image_url: Option<String>,

    /// Vendor id or display name.
    pub vendor_label: String,

    /// Currently selected colour, if any.
    pub color: Option<Color>,
}

impl NewCartLine {
    /// Build a cart line input from a catalogue row and the colour selected
    /// on the product page.
    pub fn from_product(product: &Product, color: Option<Color>) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            image_url: product.image_url.clone(),
            vendor_label: product.vendor_label().to_string(),
            color,
        }
    }
}

impl From<NewCartLine> for CartLine {
    fn from(item: NewCartLine) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name,
            unit_price: item.unit_price,
            quantity: 1,
            image_url: item.image_url,
            vendor_label: item.vendor_label,
            colors: item.color.into_iter().collect(),
        }
    }
}

/// Result of [`Cart::set_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// The line now holds the requested quantity.
    Updated,

    /// The line already held the requested quantity.
    Unchanged,

    /// The line was removed.
    Removed,

    /// The product has no line in the cart.
    NotInCart,
}

impl QuantityUpdate {
    /// Whether the cart was modified.
    pub const fn changed(self) -> bool {
        matches!(self, Self::Updated | Self::Removed)
    }
}

/// Cart
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from stored lines, checking the per-product uniqueness
    /// and positive-quantity invariants.
    ///
    /// # Errors
    ///
    /// - [`CartError::DuplicateLine`]: two lines share a product id.
    /// - [`CartError::ZeroQuantity`]: a line has a quantity of zero.
    pub fn from_lines(lines: impl Into<Vec<CartLine>>) -> Result<Self, CartError> {
        let lines = lines.into();
        let mut seen = FxHashSet::default();

        for line in &lines {
            if line.quantity == 0 {
                return Err(CartError::ZeroQuantity(line.product_id.clone()));
            }

            if !seen.insert(&line.product_id) {
                return Err(CartError::DuplicateLine(line.product_id.clone()));
            }
        }

        Ok(Self { lines })
    }

    /// Add one unit of a product.
    ///
    /// If the product already has a line its quantity goes up by exactly one
    /// and the existing colour selection is kept as-is, even when `item`
    /// carries a different colour. Otherwise a new line is appended with a
    /// quantity of one.
    ///
    /// Returns the line's quantity after the add.
    pub fn add_item(&mut self, item: NewCartLine) -> u64 {
        if let Some(line) = self.line_mut(&item.product_id) {
            line.quantity = line.quantity.saturating_add(1);

            return line.quantity;
        }

        self.lines.push(item.into());

        1
    }

    /// Remove the line for `product_id`. Returns `false` if there was none.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let before = self.lines.len();

        self.lines.retain(|line| &line.product_id != product_id);

        self.lines.len() != before
    }

    /// Overwrite the quantity of the line for `product_id`.
    ///
    /// A quantity of zero or less removes the line. Products without a line
    /// are left alone. No upper bound is applied.
    ///
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) -> QuantityUpdate {
        let quantity = u64::try_from(quantity).unwrap_or_default();

        if quantity == 0 {
            return if self.remove_item(product_id) {
                QuantityUpdate::Removed
            } else {
                QuantityUpdate::NotInCart
            };
        }

        match self.line_mut(product_id) {
            Some(line) if line.quantity == quantity => QuantityUpdate::Unchanged,
            Some(line) => {
                line.quantity = quantity;
                QuantityUpdate::Updated
            }
            None => QuantityUpdate::NotInCart,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Line for `product_id`, if present.
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.product_id == product_id)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .fold(0_u64, |count, line| count.saturating_add(line.quantity))
    }

    /// Sum of `unit_price * quantity` across all lines, in minor units.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the sum overflows.
    pub fn subtotal(&self) -> Result<u64, PricingError> {
        pricing::subtotal(&self.lines)
    }

    /// Consume the cart, returning its lines.
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| &line.product_id == product_id)
    }
}

#[cfg(test)]
pub(crate) fn test_line(id: &str, unit_price: u64, quantity: u64) -> CartLine {
    CartLine {
        product_id: ProductId::new(id),
        name: format!("Product {id}"),
        unit_price,
        quantity,
        image_url: None,
        vendor_label: "Test Vendor".to_string(),
        colors: ColorSelection::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn new_line(id: &str, unit_price: u64, color: Option<&str>) -> NewCartLine {
        NewCartLine {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            unit_price,
            image_url: Some(format!("https://img.example/{id}.jpg")),
            vendor_label: "Test Vendor".to_string(),
            color: color.map(Color::new),
        }
    }

    #[test]
    fn add_item_appends_new_line_with_quantity_one() -> TestResult {
        let mut cart = Cart::new();

        let quantity = cart.add_item(new_line("p1", 1000, Some("red")));

        assert_eq!(quantity, 1);
        assert_eq!(cart.len(), 1);

        let line = cart.lines().first().ok_or("missing line")?;

        assert_eq!(line.quantity, 1);
        assert_eq!(line.colors.as_slice(), &[Color::new("red")]);

        Ok(())
    }

    #[test]
    fn add_item_without_color_records_empty_selection() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(new_line("p1", 1000, None));

        let line = cart.lines().first().ok_or("missing line")?;

        assert!(line.colors.is_empty());

        Ok(())
    }

    #[test]
    fn repeated_adds_merge_into_one_line() {
        let mut cart = Cart::new();

        for _ in 0..5 {
            cart.add_item(new_line("p1", 1000, None));
        }

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn merge_keeps_first_color_selection() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(new_line("p1", 1000, Some("red")));
        cart.add_item(new_line("p1", 1000, Some("blue")));

        let line = cart.lines().first().ok_or("missing line")?;

        assert_eq!(line.quantity, 2);
        assert_eq!(line.colors.as_slice(), &[Color::new("red")]);

        Ok(())
    }

    #[test]
    fn add_to_existing_line_increments_subtotal() -> TestResult {
        let mut cart = Cart::from_lines(vec![test_line("p1", 1000, 2)])?;

        cart.add_item(new_line("p1", 1000, None));

        assert_eq!(cart.line(&ProductId::new("p1")).map(|l| l.quantity), Some(3));
        assert_eq!(cart.subtotal()?, 3000);

        Ok(())
    }

    #[test]
    fn lines_keep_insertion_order() {
        let mut cart = Cart::new();

        cart.add_item(new_line("b", 1, None));
        cart.add_item(new_line("a", 1, None));
        cart.add_item(new_line("b", 1, None));

        let ids: Vec<_> = cart.lines().iter().map(|l| l.product_id.as_str()).collect();

        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn remove_item_removes_line() -> TestResult {
        let mut cart = Cart::from_lines(vec![test_line("p1", 100, 1), test_line("p2", 200, 1)])?;

        assert!(cart.remove_item(&ProductId::new("p1")));
        assert_eq!(cart.len(), 1);
        assert!(cart.line(&ProductId::new("p1")).is_none());

        Ok(())
    }

    #[test]
    fn remove_and_zero_quantity_on_missing_product_are_noops() -> TestResult {
        let mut cart = Cart::from_lines(vec![test_line("p1", 100, 2)])?;
        let before = cart.clone();

        assert!(!cart.remove_item(&ProductId::new("missing")));
        assert_eq!(
            cart.set_quantity(&ProductId::new("missing"), 0),
            QuantityUpdate::NotInCart
        );
        assert_eq!(
            cart.set_quantity(&ProductId::new("missing"), 4),
            QuantityUpdate::NotInCart
        );

        assert_eq!(cart, before);

        Ok(())
    }

    #[test]
    fn set_quantity_overwrites() -> TestResult {
        let mut cart = Cart::from_lines(vec![test_line("p1", 100, 2)])?;

        assert_eq!(cart.set_quantity(&ProductId::new("p1"), 7), QuantityUpdate::Updated);
        assert_eq!(cart.item_count(), 7);
        assert_eq!(cart.subtotal()?, 700);

        Ok(())
    }

    #[test]
    fn set_quantity_to_same_value_reports_no_change() -> TestResult {
        let mut cart = Cart::from_lines(vec![test_line("p1", 100, 2)])?;

        let update = cart.set_quantity(&ProductId::new("p1"), 2);

        assert_eq!(update, QuantityUpdate::Unchanged);
        assert!(!update.changed());
        assert_eq!(cart.item_count(), 2);

        Ok(())
    }

    #[test]
    fn set_quantity_zero_or_negative_removes() -> TestResult {
        let mut cart = Cart::from_lines(vec![test_line("p1", 100, 2), test_line("p2", 100, 2)])?;

        assert_eq!(cart.set_quantity(&ProductId::new("p1"), 0), QuantityUpdate::Removed);
        assert_eq!(cart.set_quantity(&ProductId::new("p2"), -3), QuantityUpdate::Removed);
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn clear_empties_cart() -> TestResult {
        let mut cart = Cart::from_lines(vec![test_line("p1", 100, 2)])?;

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.subtotal()?, 0);

        Ok(())
    }

    #[test]
    fn from_lines_rejects_duplicates() {
        let result = Cart::from_lines(vec![test_line("p1", 100, 1), test_line("p1", 100, 2)]);

        assert_eq!(result, Err(CartError::DuplicateLine(ProductId::new("p1"))));
    }

    #[test]
    fn from_lines_rejects_zero_quantity() {
        let result = Cart::from_lines(vec![test_line("p1", 100, 0)]);

        assert_eq!(result, Err(CartError::ZeroQuantity(ProductId::new("p1"))));
    }

    #[test]
    fn line_serializes_with_stored_field_names() -> TestResult {
        let mut line = test_line("p1", 1000, 2);
        line.colors.push(Color::new("red"));

        let value = serde_json::to_value(&line)?;

        assert_eq!(
            value,
            json!({
                "id": "p1",
                "name": "Product p1",
                "price": 1000,
                "quantity": 2,
                "image_url": null,
                "vendor": "Test Vendor",
                "colors": ["red"]
            })
        );

        Ok(())
    }

    #[test]
    fn line_without_colors_field_deserializes_to_empty_selection() -> TestResult {
        let line: CartLine = serde_json::from_value(json!({
            "id": "p1",
            "name": "Product p1",
            "price": 1000,
            "quantity": 1,
            "vendor": "Test Vendor"
        }))?;

        assert!(line.colors.is_empty());
        assert_eq!(line.image_url, None);

        Ok(())
    }

    #[test]
    fn from_product_uses_vendor_label() -> TestResult {
        let product: Product = serde_json::from_value(json!({
            "id": "p1",
            "name": "Ankara Tote",
            "price": 1500,
            "image_url": "https://img.example/p1.jpg",
            "vendors": [{ "id": "v-1", "business_name": "Kemi Crafts" }]
        }))?;

        let item = NewCartLine::from_product(&product, Some(Color::new("green")));

        assert_eq!(item.vendor_label, "v-1");
        assert_eq!(item.unit_price, 150_000);
        assert_eq!(item.color, Some(Color::new("green")));

        Ok(())
    }
}
