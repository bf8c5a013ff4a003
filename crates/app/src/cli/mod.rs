use std::sync::Arc;

use clap::{Parser, Subcommand};
use storefront_app::{
    config::AppConfig, context::AppContext, navigation::RecordingNavigator,
    observability::init_logging,
};

mod cart;
mod checkout;

#[derive(Debug, Parser)]
#[command(name = "storefront-app", about = "Storefront cart and checkout CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect or change the cart
    Cart(cart::CartCommand),

    /// Enter delivery details and place the order
    Checkout(checkout::CheckoutArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        init_logging(&self.config.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        let context = AppContext::from_config(&self.config, Arc::new(RecordingNavigator::new()))
            .map_err(|error| format!("failed to start storefront: {error}"))?;

        match self.command {
            Commands::Cart(command) => cart::run(command, &context),
            Commands::Checkout(args) => checkout::run(args, &context).await,
        }
    }
}
