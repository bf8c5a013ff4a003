use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use storefront::{
    cart::{NewCartLine, QuantityUpdate},
    pricing::{format_amount, minor_from_major},
    products::{Color, ProductId, UNKNOWN_VENDOR},
};
use storefront_app::{context::AppContext, domain::carts::CartSnapshot};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Add units of a product
    Add(AddArgs),

    /// Remove a product's line
    Remove(RemoveArgs),

    /// Overwrite a line's quantity; zero or less removes it
    SetQuantity(SetQuantityArgs),

    /// Print the cart
    Show,

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Product id
    product_id: String,

    /// Product name
    #[arg(long)]
    name: String,

    /// Unit price in naira, e.g. 15000.50
    #[arg(long)]
    price: Decimal,

    /// Vendor label shown on the line
    #[arg(long, default_value = UNKNOWN_VENDOR)]
    vendor: String,

    /// Product image URL
    #[arg(long)]
    image_url: Option<String>,

    /// Selected colour
    #[arg(long)]
    color: Option<String>,

    /// Number of units to add
    #[arg(long, default_value_t = 1u32)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Product id
    product_id: String,
}

#[derive(Debug, Args)]
struct SetQuantityArgs {
    /// Product id
    product_id: String,

    /// New quantity
    #[arg(allow_negative_numbers = true)]
    quantity: i64,
}

pub(crate) fn run(command: CartCommand, context: &AppContext) -> Result<(), String> {
    let cart = &context.cart;

    match command.command {
        CartSubcommand::Add(args) => {
            let item = NewCartLine {
                product_id: ProductId::new(args.product_id),
                name: args.name,
                unit_price: minor_from_major(args.price).map_err(|error| error.to_string())?,
                image_url: args.image_url,
                vendor_label: args.vendor,
                color: args.color.map(Color::new),
            };

            if cart.add_units(&item, args.quantity).is_none() {
                return Err("quantity must be at least 1".to_string());
            }
        }
        CartSubcommand::Remove(args) => {
            if !cart.remove_item(&ProductId::new(args.product_id.as_str())) {
                return Err(format!("{} is not in the cart", args.product_id));
            }
        }
        CartSubcommand::SetQuantity(args) => {
            let update = cart.set_quantity(&ProductId::new(args.product_id.as_str()), args.quantity);

            if update == QuantityUpdate::NotInCart {
                return Err(format!("{} is not in the cart", args.product_id));
            }
        }
        CartSubcommand::Show => {}
        CartSubcommand::Clear => cart.clear(),
    }

    print_cart(&cart.snapshot())
}

#[expect(clippy::print_stdout, reason = "CLI output")]
pub(crate) fn print_cart(snapshot: &CartSnapshot) -> Result<(), String> {
    if snapshot.is_empty() {
        println!("cart is empty");

        return Ok(());
    }

    for line in snapshot.lines() {
        let total = line
            .line_total()
            .and_then(format_amount)
            .map_err(|error| error.to_string())?;

        let colors = line
            .colors
            .iter()
            .map(Color::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        println!(
            "{}  {} x {} ({}){}  {total}",
            line.product_id,
            line.quantity,
            line.name,
            line.vendor_label,
            if colors.is_empty() {
                String::new()
            } else {
                format!(" [{colors}]")
            },
        );
    }

    let subtotal = snapshot
        .subtotal()
        .and_then(format_amount)
        .map_err(|error| error.to_string())?;

    println!("items: {}", snapshot.item_count());
    println!("subtotal: {subtotal}");

    Ok(())
}
