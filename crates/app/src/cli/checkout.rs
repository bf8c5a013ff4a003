use clap::Args;
use storefront::{
    checkout::{BankDetails, DeliveryField},
    pricing::format_amount,
};
use storefront_app::{
    config::checkout::CheckoutConfig,
    context::AppContext,
    domain::checkout::{CheckoutEntry, CheckoutError, OrderPlaced},
};

use crate::cli::cart::print_cart;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    #[command(flatten)]
    checkout: CheckoutConfig,

    /// Shopper's full name
    #[arg(long, default_value = "")]
    full_name: String,

    /// Contact email address
    #[arg(long, default_value = "")]
    email: String,

    /// Contact phone number
    #[arg(long, default_value = "")]
    phone: String,

    /// Delivery address
    #[arg(long, default_value = "")]
    address: String,

    /// Confirm the bank transfer has been made and place the order
    #[arg(long)]
    confirm_payment: bool,
}

pub(crate) async fn run(args: CheckoutArgs, context: &AppContext) -> Result<(), String> {
    let flow = match context.begin_checkout(args.checkout.settings()) {
        CheckoutEntry::Ready(flow) => flow,
        CheckoutEntry::RedirectedToCart => {
            return Err("cart is empty; add items before checking out".to_string());
        }
    };

    for (field, value) in [
        (DeliveryField::FullName, args.full_name),
        (DeliveryField::Email, args.email),
        (DeliveryField::Phone, args.phone),
        (DeliveryField::Address, args.address),
    ] {
        flow.set_field(field, value).map_err(|error| error.to_string())?;
    }

    print_cart(&context.cart.snapshot())?;

    let bank = flow.continue_to_payment().map_err(|error| match error {
        CheckoutError::IncompleteDetails(missing) => format!(
            "missing delivery details: {}",
            missing
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
        error => error.to_string(),
    })?;

    print_instructions(bank);

    if !args.confirm_payment {
        return Ok(());
    }

    let placed = flow
        .confirm_payment()
        .await
        .map_err(|error| match error {
            CheckoutError::Persistence(_) => {
                format!("{error}; your cart is unchanged, please try again")
            }
            error => error.to_string(),
        })?;

    print_confirmation(&placed)?;

    placed.clear.complete().await;

    Ok(())
}

#[expect(clippy::print_stdout, reason = "CLI output")]
fn print_instructions(bank: &BankDetails) {
    println!();
    println!("pay by bank transfer to:");
    println!("  account name:   {}", bank.account_name);
    println!("  bank:           {}", bank.bank_name);
    println!("  account number: {}", bank.account_number);

    if let Some(contact) = &bank.support_contact {
        println!("send proof of payment to {contact}");
    }
}

#[expect(clippy::print_stdout, reason = "CLI output")]
fn print_confirmation(placed: &OrderPlaced) -> Result<(), String> {
    let total = format_amount(placed.order.total_amount).map_err(|error| error.to_string())?;

    println!();
    println!("thank you, {}!", placed.order.user_name);
    println!("order {} placed for {total}", placed.order_id);

    Ok(())
}
