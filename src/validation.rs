//! Validation
//!
//! Recomputes what each category actually received from an assignment and checks
//! it against the category's minimum.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::warn;

use crate::{
    assignment::{Assignment, ResolveError},
    categories::CategorySet,
    items::pool::ItemPool,
    pricing::{TotalValueError, total_value},
};

/// Errors raised while validating an assignment.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// An assignment index did not resolve.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Error summing assigned values.
    #[error(transparent)]
    TotalValue(#[from] TotalValueError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// What one category received.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCoverage<'a> {
    /// Category name
    pub name: String,

    /// Required minimum
    pub minimum: Money<'a, Currency>,

    /// Sum of the values of the items assigned to the category
    pub assigned_total: Money<'a, Currency>,

    /// Number of items assigned to the category
    pub item_count: usize,
}

impl<'a> CategoryCoverage<'a> {
    /// Whether the assigned total meets the minimum.
    pub fn is_covered(&self) -> bool {
        self.assigned_total.to_minor_units() >= self.minimum.to_minor_units()
    }

    /// Assigned total minus minimum; negative when the category is short.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction fails.
    pub fn surplus(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.assigned_total.sub(self.minimum)
    }

    /// Assigned total as a fraction of the minimum. A zero minimum is always fully
    /// covered.
    pub fn coverage_percent(&self) -> Percentage {
        let minimum_minor = self.minimum.to_minor_units();

        if minimum_minor == 0 {
            return Percentage::from(1.0);
        }

        let assigned_dec =
            Decimal::from_i64(self.assigned_total.to_minor_units()).unwrap_or(Decimal::ZERO);
        let minimum_dec = Decimal::from_i64(minimum_minor).unwrap_or(Decimal::ONE);

        Percentage::from(assigned_dec / minimum_dec)
    }
}

/// Per-category coverage of an assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport<'a> {
    categories: Vec<CategoryCoverage<'a>>,
    unassigned: Vec<String>,
    currency: &'a Currency,
}

impl<'a> ValidationReport<'a> {
    /// Coverage of each category, in category order.
    pub fn categories(&self) -> &[CategoryCoverage<'a>] {
        &self.categories
    }

    /// Ids of items that were not placed.
    pub fn unassigned(&self) -> &[String] {
        &self.unassigned
    }

    /// Categories whose minimum was not met.
    pub fn uncovered(&self) -> impl Iterator<Item = &CategoryCoverage<'a>> {
        self.categories.iter().filter(|coverage| !coverage.is_covered())
    }

    /// `true` when every category is covered and every item was placed.
    pub fn is_valid(&self) -> bool {
        self.unassigned.is_empty() && self.uncovered().next().is_none()
    }

    /// Sum of the assigned totals of every category.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalValueError`] if the sum cannot be computed.
    pub fn assigned_total(&self) -> Result<Money<'a, Currency>, TotalValueError> {
        total_value(
            self.currency,
            self.categories.iter().map(|coverage| &coverage.assigned_total),
        )
    }

    /// Currency of every amount in the report.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }
}

/// Recompute each category's total from `assignment` and compare it to the minimum.
///
/// # Errors
///
/// Returns a [`ValidationError`] if an index in the assignment does not exist or a
/// total cannot be computed.
pub fn validate<'a>(
    assignment: &Assignment,
    items: &ItemPool<'a>,
    categories: &CategorySet<'a>,
) -> Result<ValidationReport<'a>, ValidationError> {
    let resolved = assignment.resolve(items, categories)?;

    let coverage = resolved
        .into_iter()
        .map(|(category, assigned)| -> Result<_, ValidationError> {
            let assigned_total =
                total_value(items.currency(), assigned.iter().map(|item| item.value()))?;

            Ok(CategoryCoverage {
                name: category.name().to_string(),
                minimum: *category.minimum(),
                assigned_total,
                item_count: assigned.len(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let unassigned = assignment
        .unassigned()
        .iter()
        .map(|&item_idx| {
            items
                .get_item(item_idx)
                .map(|item| item.id().to_string())
                .map_err(ResolveError::from)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let report = ValidationReport {
        categories: coverage,
        unassigned,
        currency: items.currency(),
    };

    for coverage in report.uncovered() {
        warn!(
            category = coverage.name.as_str(),
            minimum = coverage.minimum.to_minor_units(),
            assigned = coverage.assigned_total.to_minor_units(),
            "category below minimum"
        );
    }

    Ok(report)
}
