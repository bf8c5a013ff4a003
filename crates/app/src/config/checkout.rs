//! Checkout & Payment Config

use std::time::Duration;

use clap::Args;
use storefront::checkout::BankDetails;

use crate::domain::checkout::{CheckoutSettings, ClearPolicy, IdempotencyPolicy};

/// Bank transfer instructions shown before the shopper confirms payment.
#[derive(Debug, Args)]
pub struct PaymentConfig {
    /// Name on the receiving account
    #[arg(long, env = "STOREFRONT_BANK_ACCOUNT_NAME")]
    pub bank_account_name: String,

    /// Receiving bank
    #[arg(long, env = "STOREFRONT_BANK_NAME")]
    pub bank_name: String,

    /// Receiving account number
    #[arg(long, env = "STOREFRONT_BANK_ACCOUNT_NUMBER")]
    pub bank_account_number: String,

    /// Where shoppers send proof of payment
    #[arg(long, env = "STOREFRONT_SUPPORT_CONTACT")]
    pub support_contact: Option<String>,
}

impl PaymentConfig {
    #[must_use]
    pub fn bank_details(&self) -> BankDetails {
        BankDetails {
            account_name: self.bank_account_name.clone(),
            bank_name: self.bank_name.clone(),
            account_number: self.bank_account_number.clone(),
            support_contact: self.support_contact.clone(),
        }
    }
}

/// Checkout behaviour settings.
#[derive(Debug, Args)]
pub struct CheckoutConfig {
    /// Payment instructions.
    #[command(flatten)]
    pub payment: PaymentConfig,

    /// Milliseconds between leaving checkout and clearing the cart
    #[arg(long, env = "STOREFRONT_CLEAR_DELAY_MS", default_value_t = 500u64)]
    pub clear_delay_ms: u64,

    /// Clear the cart when the confirmation view acknowledges the order
    /// instead of after a delay
    #[arg(long, env = "STOREFRONT_CLEAR_ON_ACK", default_value_t = false)]
    pub clear_on_ack: bool,

    /// Attach a client-generated idempotency key to order writes; the orders table must have an `idempotency_key` column
    #[arg(long, env = "STOREFRONT_IDEMPOTENCY_KEYS", default_value_t = false)]
    pub idempotency_keys: bool,
}

impl CheckoutConfig {
    /// Settings for a checkout flow.
    #[must_use]
    pub fn settings(&self) -> CheckoutSettings {
        CheckoutSettings {
            bank: self.payment.bank_details(),
            clear_policy: if self.clear_on_ack {
                ClearPolicy::OnAcknowledge
            } else {
                ClearPolicy::AfterDelay(Duration::from_millis(self.clear_delay_ms))
            },
            idempotency: if self.idempotency_keys {
                IdempotencyPolicy::ClientToken
            } else {
                IdempotencyPolicy::Disabled
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        checkout: CheckoutConfig,
    }

    const BANK_ARGS: [&str; 7] = [
        "test",
        "--bank-account-name",
        "Storefront Ltd",
        "--bank-name",
        "Test Bank",
        "--bank-account-number",
        "0123456789",
    ];

    #[test]
    fn defaults_clear_after_half_a_second_without_keys() -> Result<(), clap::Error> {
        let cli = TestCli::try_parse_from(BANK_ARGS)?;
        let settings = cli.checkout.settings();

        assert_eq!(
            settings.clear_policy,
            ClearPolicy::AfterDelay(Duration::from_millis(500))
        );
        assert_eq!(settings.idempotency, IdempotencyPolicy::Disabled);
        assert_eq!(settings.bank.account_number, "0123456789");
        assert_eq!(settings.bank.support_contact, None);

        Ok(())
    }

    #[test]
    fn flags_switch_policies() -> Result<(), clap::Error> {
        let cli = TestCli::try_parse_from(
            BANK_ARGS
                .into_iter()
                .chain(["--clear-on-ack", "--idempotency-keys"]),
        )?;
        let settings = cli.checkout.settings();

        assert_eq!(settings.clear_policy, ClearPolicy::OnAcknowledge);
        assert_eq!(settings.idempotency, IdempotencyPolicy::ClientToken);

        Ok(())
    }

    #[test]
    fn idempotency_flag_help_names_required_column() {
        let help = TestCli::command().render_long_help().to_string();

        assert!(help.contains("--idempotency-keys"));
        assert!(help.contains("idempotency_key"));
    }
}
