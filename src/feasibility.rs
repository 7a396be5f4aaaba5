//! Feasibility Pre-check
//!
//! A necessary (not sufficient) condition for any assignment to exist: the
//! items must be worth at least as much as the categories require in total.
//! Passing this check does not mean the solver will find an assignment.

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{categories::CategorySet, items::pool::ItemPool, pricing::TotalValueError};

/// Errors raised by the feasibility pre-check.
#[derive(Debug, Error)]
pub enum FeasibilityError {
    /// The items are worth less than the categories require in total.
    #[error(
        "total item value {total_value} is less than total category minimum {total_minimum}; add more items or lower the minimums"
    )]
    PreconditionViolation {
        /// Sum of all item values, in minor units
        total_value: i64,

        /// Sum of all category minimums, in minor units
        total_minimum: i64,
    },

    /// The item pool and category set use different currencies.
    #[error("items are valued in {0} but categories in {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Wrapped total calculation error.
    #[error(transparent)]
    TotalValue(#[from] TotalValueError),

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Aggregate totals computed by a successful pre-check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeasibilitySummary<'a> {
    /// Sum of all item values
    pub total_value: Money<'a, Currency>,

    /// Sum of all category minimums
    pub total_minimum: Money<'a, Currency>,

    /// Amount by which the item value exceeds the requirement
    pub surplus: Money<'a, Currency>,
}

/// Check that the total item value covers the total category minimum.
///
/// # Errors
///
/// Returns [`FeasibilityError::PreconditionViolation`] when the items are worth
/// less than the categories require, or a wrapped error if the totals cannot be
/// computed.
pub fn check<'a>(
    items: &ItemPool<'a>,
    categories: &CategorySet<'a>,
) -> Result<FeasibilitySummary<'a>, FeasibilityError> {
    if items.currency() != categories.currency() {
        return Err(FeasibilityError::CurrencyMismatch(
            items.currency().iso_alpha_code,
            categories.currency().iso_alpha_code,
        ));
    }

    let total_value = items.total_value()?;
    let total_minimum = categories.total_minimum()?;

    debug!(
        total_value = total_value.to_minor_units(),
        total_minimum = total_minimum.to_minor_units(),
        "feasibility pre-check"
    );

    if total_value.to_minor_units() < total_minimum.to_minor_units() {
        return Err(FeasibilityError::PreconditionViolation {
            total_value: total_value.to_minor_units(),
            total_minimum: total_minimum.to_minor_units(),
        });
    }

    Ok(FeasibilitySummary {
        total_value,
        total_minimum,
        surplus: total_value.sub(total_minimum)?,
    })
}
