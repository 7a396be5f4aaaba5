//! Value Parsing

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::iso::{self, Currency};

use crate::fixtures::FixtureError;

/// Parse a value string (e.g., "60.00 USD") into minor units and currency.
///
/// Any ISO currency is accepted. The amount must be exact in the currency's minor
/// units, so "1.005 USD" is rejected rather than rounded.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", if the
/// amount is not a decimal number exact in minor units, or if the currency code
/// is not recognized.
pub fn parse_value(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidValue(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidValue(s.to_string()))?;

    let currency = iso::find(currency_code)
        .ok_or_else(|| FixtureError::UnknownCurrency((*currency_code).to_string()))?;

    let scale = 10_i64
        .checked_pow(currency.exponent)
        .map(Decimal::from)
        .ok_or_else(|| FixtureError::InvalidValue(s.to_string()))?;

    let scaled = amount
        .checked_mul(scale)
        .ok_or_else(|| FixtureError::InvalidValue(s.to_string()))?;

    if !scaled.fract().is_zero() {
        return Err(FixtureError::InvalidValue(format!(
            "{s} is not a whole number of {} minor units",
            currency.iso_alpha_code
        )));
    }

    let minor_units = scaled
        .to_i64()
        .ok_or_else(|| FixtureError::InvalidValue(s.to_string()))?;

    Ok((minor_units, currency))
}
