//! Prices

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso};
use thiserror::Error;

use crate::{cart::CartLine, products::ProductId};

/// Currency every price in the store is quoted in.
pub const STORE_CURRENCY: &iso::Currency = iso::NGN;

/// Decimal places between a major unit (naira) and a minor unit (kobo).
const MINOR_UNIT_SCALE: u32 = 2;

/// Errors that can occur while calculating totals.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// `unit_price * quantity` does not fit in the amount type.
    #[error("line total for product {0} overflows")]
    LineOverflow(ProductId),

    /// Summing line totals overflowed the amount type.
    #[error("subtotal overflows")]
    SubtotalOverflow,

    /// Amount is too large to be represented as money.
    #[error("amount {0} cannot be represented as money")]
    Unrepresentable(u64),

    /// A major-unit amount is negative or too large for minor units.
    #[error("amount {0} cannot be converted to minor units")]
    InvalidAmount(Decimal),
}

/// Calculates `unit_price * quantity` for a single line, in minor units.
///
/// # Errors
///
/// Returns [`PricingError::LineOverflow`] if the product overflows.
pub fn line_total(line: &CartLine) -> Result<u64, PricingError> {
    line.unit_price
        .checked_mul(line.quantity)
        .ok_or_else(|| PricingError::LineOverflow(line.product_id.clone()))
}

/// Calculates the subtotal of a list of lines, in minor units.
///
/// An empty list has a subtotal of zero.
///
/// # Errors
///
/// - [`PricingError::LineOverflow`]: a single line total overflowed.
/// - [`PricingError::SubtotalOverflow`]: the running sum overflowed.
pub fn subtotal<'a>(lines: impl IntoIterator<Item = &'a CartLine>) -> Result<u64, PricingError> {
    lines.into_iter().try_fold(0_u64, |acc, line| {
        acc.checked_add(line_total(line)?)
            .ok_or(PricingError::SubtotalOverflow)
    })
}

/// Converts a minor-unit amount into [`Money`] in the store currency.
///
/// # Errors
///
/// Returns [`PricingError::Unrepresentable`] if the amount exceeds `i64::MAX`.
pub fn to_money(amount: u64) -> Result<Money<'static, iso::Currency>, PricingError> {
    let Ok(minor) = i64::try_from(amount) else {
        return Err(PricingError::Unrepresentable(amount));
    };

    Ok(Money::from_minor(minor, STORE_CURRENCY))
}

/// Converts a major-unit amount, as the backend stores prices, into minor
/// units. Fractions of a minor unit round half away from zero.
///
/// # Errors
///
/// Returns [`PricingError::InvalidAmount`] for negative amounts and amounts
/// that do not fit in `u64` minor units.
pub fn minor_from_major(amount: Decimal) -> Result<u64, PricingError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PricingError::InvalidAmount(amount));
    }

    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|minor| minor.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|minor| minor.to_u64())
        .ok_or(PricingError::InvalidAmount(amount))
}

/// Converts a minor-unit amount back into major units, exactly.
pub fn major_from_minor(amount: u64) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(amount), MINOR_UNIT_SCALE)
}

/// Formats a minor-unit amount for display, e.g. `₦1,000.00`.
///
/// # Errors
///
/// Returns [`PricingError::Unrepresentable`] if the amount exceeds `i64::MAX`.
pub fn format_amount(amount: u64) -> Result<String, PricingError> {
    Ok(to_money(amount)?.to_string())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::cart::test_line;

    use super::*;

    #[test]
    fn test_line_total() -> TestResult {
        let line = test_line("p1", 1000, 3);

        assert_eq!(line_total(&line)?, 3000);

        Ok(())
    }

    #[test]
    fn test_line_total_overflow() {
        let line = test_line("p1", u64::MAX, 2);

        assert_eq!(
            line_total(&line),
            Err(PricingError::LineOverflow(ProductId::new("p1")))
        );
    }

    #[test]
    fn test_subtotal() -> TestResult {
        let lines = [test_line("p1", 1000, 2), test_line("p2", 250, 4)];

        assert_eq!(subtotal(&lines)?, 3000);

        Ok(())
    }

    #[test]
    fn test_subtotal_empty() -> TestResult {
        let lines: [CartLine; 0] = [];

        assert_eq!(subtotal(&lines)?, 0);

        Ok(())
    }

    #[test]
    fn test_subtotal_overflow() {
        let lines = [test_line("p1", u64::MAX, 1), test_line("p2", 1, 1)];

        assert_eq!(subtotal(&lines), Err(PricingError::SubtotalOverflow));
    }

    #[test]
    fn test_to_money_uses_store_currency() -> TestResult {
        let money = to_money(150_000)?;

        assert_eq!(money, Money::from_minor(150_000, iso::NGN));

        Ok(())
    }

    #[test]
    fn test_format_amount_keeps_exact_decimals() -> TestResult {
        let formatted = format_amount(100_050)?;

        assert!(
            formatted.contains("1,000.50"),
            "unexpected formatting: {formatted}"
        );

        Ok(())
    }

    #[test]
    fn test_minor_from_major_handles_decimal_prices() -> TestResult {
        assert_eq!(minor_from_major(Decimal::new(150_005, 1))?, 1_500_050);
        assert_eq!(minor_from_major(Decimal::new(1_500_000, 2))?, 1_500_000);
        assert_eq!(minor_from_major(Decimal::from(15_000))?, 1_500_000);
        assert_eq!(minor_from_major(Decimal::new(1_005, 3))?, 101);
        assert_eq!(minor_from_major(Decimal::ZERO)?, 0);

        Ok(())
    }

    #[test]
    fn test_minor_from_major_rejects_negative_and_huge_amounts() {
        let negative = Decimal::new(-1, 0);

        assert_eq!(
            minor_from_major(negative),
            Err(PricingError::InvalidAmount(negative))
        );
        assert!(matches!(
            minor_from_major(Decimal::MAX),
            Err(PricingError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_major_from_minor_is_exact() {
        assert_eq!(major_from_minor(1_500_050), Decimal::new(150_005, 1));
        assert_eq!(major_from_minor(0), Decimal::ZERO);
        assert_eq!(major_from_minor(1).to_string(), "0.01");
    }

    #[test]
    fn test_to_money_rejects_huge_amounts() {
        assert!(matches!(
            to_money(u64::MAX),
            Err(PricingError::Unrepresentable(u64::MAX))
        ));
    }
}
