//! Integration tests for cart invariants and order construction

use serde_json::json;
use testresult::TestResult;

use storefront::{
    cart::{Cart, CartLine, NewCartLine},
    checkout::{DeliveryDetails, DeliveryField},
    orders::{NewOrder, OrderError, OrderStatus},
    pricing::{PricingError, format_amount},
    products::{Color, Product, ProductId},
};

/// Catalogue row with `price` in naira, as the backend stores it.
fn product(id: &str, price: u64, vendors: serde_json::Value) -> Result<Product, serde_json::Error> {
    serde_json::from_value(json!({
        "id": id,
        "name": format!("Product {id}"),
        "price": price,
        "image_url": null,
        "vendors": vendors,
    }))
}

fn delivery() -> DeliveryDetails {
    DeliveryDetails {
        full_name: "Amina Bello".to_string(),
        email: "amina@example.com".to_string(),
        phone: "08012345678".to_string(),
        address: "12 Marina Road, Lagos".to_string(),
    }
}

fn assert_invariants(cart: &Cart) -> TestResult {
    let mut ids: Vec<&ProductId> = cart.lines().iter().map(|line| &line.product_id).collect();
    ids.sort();
    ids.dedup();

    assert_eq!(ids.len(), cart.len(), "one line per product");
    assert!(cart.lines().iter().all(|line| line.quantity >= 1));

    let expected = cart
        .lines()
        .iter()
        .map(|line| line.unit_price * line.quantity)
        .sum::<u64>();

    assert_eq!(cart.subtotal()?, expected);
    assert_eq!(
        cart.item_count(),
        cart.lines().iter().map(|line| line.quantity).sum::<u64>()
    );

    Ok(())
}

#[test]
fn invariants_hold_across_mixed_operations() -> TestResult {
    let tote = product("tote", 1000, json!({ "id": "v-1", "business_name": "Ada Crafts" }))?;
    let scarf = product("scarf", 2500, json!("Lagos Looms"))?;
    let beads = product("beads", 750, json!([{ "id": "v-3", "name": "Bead House" }]))?;

    let mut cart = Cart::new();

    cart.add_item(NewCartLine::from_product(&tote, Some(Color::new("red"))));
    assert_invariants(&cart)?;

    cart.add_item(NewCartLine::from_product(&scarf, None));
    cart.add_item(NewCartLine::from_product(&tote, Some(Color::new("blue"))));
    assert_invariants(&cart)?;

    cart.add_item(NewCartLine::from_product(&beads, None));
    cart.set_quantity(&beads.id, 5);
    assert_invariants(&cart)?;

    cart.set_quantity(&scarf.id, -3);
    assert_invariants(&cart)?;

    cart.remove_item(&ProductId::new("not-in-cart"));
    cart.set_quantity(&ProductId::new("not-in-cart"), 4);
    assert_invariants(&cart)?;

    let tote_line = cart.line(&tote.id).ok_or("tote line missing")?;

    assert_eq!(tote_line.quantity, 2);
    assert_eq!(tote_line.colors.as_slice(), &[Color::new("red")]);
    assert_eq!(tote_line.vendor_label, "v-1");
    assert_eq!(cart.line(&beads.id).ok_or("beads line missing")?.vendor_label, "v-3");
    assert_eq!(cart.line(&scarf.id), None);
    assert_eq!(cart.subtotal()?, (2000 + 3750) * 100);

    Ok(())
}

#[test]
fn vendor_falls_back_to_display_name_or_unknown() -> TestResult {
    let named = product("a", 100, json!("Lagos Looms"))?;
    let missing = product("b", 100, json!(null))?;
    let odd = product("c", 100, json!(42))?;

    assert_eq!(NewCartLine::from_product(&named, None).vendor_label, "Lagos Looms");
    assert_eq!(NewCartLine::from_product(&missing, None).vendor_label, "Unknown vendor");
    assert_eq!(NewCartLine::from_product(&odd, None).vendor_label, "Unknown vendor");

    Ok(())
}

#[test]
fn stored_lines_restore_to_the_same_cart() -> TestResult {
    let mut cart = Cart::new();
    let tote = product("tote", 1000, json!("Ada Crafts"))?;

    cart.add_item(NewCartLine::from_product(&tote, Some(Color::new("red"))));
    cart.add_item(NewCartLine::from_product(&tote, None));

    let stored = serde_json::to_value(cart.lines())?;

    assert_eq!(
        stored,
        json!([{
            "id": "tote",
            "name": "Product tote",
            "price": 100_000,
            "quantity": 2,
            "image_url": null,
            "vendor": "Ada Crafts",
            "colors": ["red"],
        }])
    );

    let lines: Vec<CartLine> = serde_json::from_value(stored)?;

    assert_eq!(Cart::from_lines(lines)?, cart);

    Ok(())
}

#[test]
fn order_totals_match_cart_subtotal() -> TestResult {
    let mut cart = Cart::new();

    for (id, price) in [("a", 1000), ("b", 250), ("a", 1000)] {
        cart.add_item(NewCartLine::from_product(&product(id, price, json!("v"))?, None));
    }

    let order = NewOrder::bank_transfer(cart.lines(), &delivery(), None)?;

    assert_eq!(order.total_amount, cart.subtotal()?);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.items, cart.lines());
    assert!(format_amount(order.total_amount)?.contains("2,250.00"));

    let payload = serde_json::to_value(&order)?;

    assert_eq!(payload["total_amount"], json!(2250.0));
    assert_eq!(payload["items"][0]["price"], json!(1000.0));
    assert_eq!(payload["items"][1]["price"], json!(250.0));

    Ok(())
}

#[test]
fn order_requires_every_delivery_field() -> TestResult {
    let mut cart = Cart::new();
    cart.add_item(NewCartLine::from_product(&product("a", 1000, json!("v"))?, None));

    for field in DeliveryField::ALL {
        let mut details = delivery();
        details.set(field, "");

        let Err(OrderError::IncompleteDetails(missing)) =
            NewOrder::bank_transfer(cart.lines(), &details, None)
        else {
            return Err(format!("{field} should be required").into());
        };

        assert_eq!(missing.as_slice(), &[field]);
    }

    Ok(())
}

#[test]
fn overflowing_total_is_an_error() -> TestResult {
    let mut cart = Cart::new();
    let pricey = NewCartLine {
        product_id: ProductId::new("gold"),
        name: "Gold".to_string(),
        unit_price: u64::MAX / 2 + 1,
        image_url: None,
        vendor_label: "v".to_string(),
        color: None,
    };

    cart.add_item(pricey.clone());
    cart.add_item(pricey);

    assert!(matches!(cart.subtotal(), Err(PricingError::LineOverflow(_))));
    assert!(matches!(
        NewOrder::bank_transfer(cart.lines(), &delivery(), None),
        Err(OrderError::Pricing(_))
    ));

    Ok(())
}
