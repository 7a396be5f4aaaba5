//! Value Totals

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors that can occur while calculating a total value.
#[derive(Debug, Error, PartialEq)]
pub enum TotalValueError {
    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Sums a sequence of money amounts, starting from zero in `currency`.
///
/// An empty sequence totals to zero.
///
/// # Errors
///
/// - [`TotalValueError::Money`]: Wrapped money arithmetic or currency mismatch error.
pub fn total_value<'a, 'b>(
    currency: &'a Currency,
    values: impl IntoIterator<Item = &'b Money<'a, Currency>>,
) -> Result<Money<'a, Currency>, TotalValueError>
where
    'a: 'b,
{
    let total = values
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, value| acc.add(*value))?;

    Ok(total)
}
