//! Categories
//!
//! A category is a bin with a lower bound: every assignment must give it items
//! worth at least its `minimum`.

use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::pricing::{TotalValueError, total_value};

/// Errors related to category set construction or lookups.
#[derive(Debug, Error)]
pub enum CategoryError {
    /// A category's currency differs from the set currency (index, category currency, set currency).
    #[error("Category {0} has currency {1}, but set has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// A category has a negative minimum.
    #[error("Category {name} has a negative minimum of {minor_units} minor units")]
    NegativeMinimum {
        /// Name of the offending category
        name: String,

        /// Minimum in minor units
        minor_units: i64,
    },

    /// A category has an empty name (index).
    #[error("Category {0} has an empty name")]
    EmptyName(usize),

    /// Two categories share the same name; the name-keyed result would merge them.
    #[error("Duplicate category name: {0}")]
    DuplicateCategoryName(String),

    /// A category was not found in the set.
    #[error("Category {0} not found")]
    CategoryNotFound(usize),
}

/// A named category that must receive at least `minimum` worth of items.
#[derive(Clone, Debug, PartialEq)]
pub struct Category<'a> {
    name: String,
    minimum: Money<'a, Currency>,
}

impl<'a> Category<'a> {
    /// Creates a new category.
    #[must_use]
    pub fn new(name: impl Into<String>, minimum: Money<'a, Currency>) -> Self {
        Self {
            name: name.into(),
            minimum,
        }
    }

    /// Returns the name of the category
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the minimum total value the category requires
    pub fn minimum(&self) -> &Money<'a, Currency> {
        &self.minimum
    }
}

/// Ordered collection of uniquely named categories sharing a single currency.
#[derive(Debug, Clone)]
pub struct CategorySet<'a> {
    categories: Vec<Category<'a>>,
    currency: &'a Currency,
}

impl<'a> CategorySet<'a> {
    /// Create an empty category set.
    #[must_use]
    pub fn empty(currency: &'a Currency) -> Self {
        CategorySet {
            categories: Vec::new(),
            currency,
        }
    }

    /// Create a new category set, validating every category.
    ///
    /// # Errors
    ///
    /// Returns a [`CategoryError`] if a category has a different currency, a negative
    /// minimum, an empty name, or a name already used by another category.
    pub fn new(
        categories: impl Into<Vec<Category<'a>>>,
        currency: &'a Currency,
    ) -> Result<Self, CategoryError> {
        let categories = categories.into();

        validate_categories(&categories, currency)?;

        Ok(CategorySet {
            categories,
            currency,
        })
    }

    /// Iterate over the categories in the set.
    pub fn iter(&self) -> impl Iterator<Item = &Category<'a>> {
        self.categories.iter()
    }

    /// Get a category from the set by its index.
    ///
    /// # Errors
    ///
    /// Returns a `CategoryError::CategoryNotFound` if the category is not found.
    pub fn get_category(&self, category: usize) -> Result<&Category<'a>, CategoryError> {
        self.categories
            .get(category)
            .ok_or(CategoryError::CategoryNotFound(category))
    }

    /// Sum of all category minimums.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalValueError`] if money arithmetic fails.
    pub fn total_minimum(&self) -> Result<Money<'a, Currency>, TotalValueError> {
        total_value(self.currency, self.categories.iter().map(Category::minimum))
    }

    /// Get the currency of the set.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Get the number of categories in the set.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

fn validate_categories(
    categories: &[Category<'_>],
    currency: &Currency,
) -> Result<(), CategoryError> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();

    for (idx, category) in categories.iter().enumerate() {
        let category_currency = category.minimum().currency();

        if category_currency != currency {
            return Err(CategoryError::CurrencyMismatch(
                idx,
                category_currency.iso_alpha_code,
                currency.iso_alpha_code,
            ));
        }

        let minor_units = category.minimum().to_minor_units();

        if minor_units < 0 {
            return Err(CategoryError::NegativeMinimum {
                name: category.name().to_string(),
                minor_units,
            });
        }

        if category.name().trim().is_empty() {
            return Err(CategoryError::EmptyName(idx));
        }

        if !seen.insert(category.name()) {
            return Err(CategoryError::DuplicateCategoryName(
                category.name().to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn total_minimum_sums_all_categories() -> TestResult {
        let set = CategorySet::new(
            [
                Category::new("X", Money::from_minor(4_000, USD)),
                Category::new("Y", Money::from_minor(2_000, USD)),
            ],
            USD,
        )?;

        assert_eq!(set.total_minimum()?, Money::from_minor(6_000, USD));
        assert_eq!(set.len(), 2);

        Ok(())
    }

    #[test]
    fn get_category_returns_category() -> TestResult {
        let set = CategorySet::new([Category::new("X", Money::from_minor(1, USD))], USD)?;

        assert_eq!(set.get_category(0)?.name(), "X");
        assert!(matches!(
            set.get_category(3),
            Err(CategoryError::CategoryNotFound(3))
        ));

        Ok(())
    }

    #[test]
    fn new_rejects_duplicate_category_name() {
        let err = CategorySet::new(
            [
                Category::new("Acme", Money::from_minor(100, USD)),
                Category::new("Acme", Money::from_minor(200, USD)),
            ],
            USD,
        )
        .err();

        assert!(matches!(
            err,
            Some(CategoryError::DuplicateCategoryName(name)) if name == "Acme"
        ));
    }

    #[test]
    fn new_rejects_negative_minimum() {
        let err = CategorySet::new([Category::new("X", Money::from_minor(-50, USD))], USD).err();

        assert!(matches!(
            err,
            Some(CategoryError::NegativeMinimum {
                minor_units: -50,
                ..
            })
        ));
    }

    #[test]
    fn new_rejects_empty_name() {
        let err = CategorySet::new([Category::new("", Money::from_minor(50, USD))], USD).err();

        assert!(matches!(err, Some(CategoryError::EmptyName(0))));
    }

    #[test]
    fn new_rejects_currency_mismatch() {
        let err = CategorySet::new([Category::new("X", Money::from_minor(50, EUR))], USD).err();

        assert!(matches!(
            err,
            Some(CategoryError::CurrencyMismatch(0, "EUR", "USD"))
        ));
    }
}
