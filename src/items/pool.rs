//! Item Pools

use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    items::Item,
    pricing::{TotalValueError, total_value},
};

/// Errors related to item pool construction or lookups.
#[derive(Debug, Error)]
pub enum ItemPoolError {
    /// An item's currency differs from the pool currency (index, item currency, pool currency).
    #[error("Item {0} has currency {1}, but pool has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// An item has a negative value.
    #[error("Item {id} has a negative value of {minor_units} minor units")]
    NegativeValue {
        /// Identifier of the offending item
        id: String,

        /// Value in minor units
        minor_units: i64,
    },

    /// An item has an empty identifier (index).
    #[error("Item {0} has an empty identifier")]
    EmptyId(usize),

    /// Two items share the same identifier.
    #[error("Duplicate item identifier: {0}")]
    DuplicateId(String),

    /// An item was not found in the pool.
    #[error("Item {0} not found")]
    ItemNotFound(usize),
}

/// Ordered collection of items sharing a single currency.
///
/// The position of an item in the pool is its index everywhere else in the
/// crate (solver variables, assignments, records).
#[derive(Debug, Clone)]
pub struct ItemPool<'a> {
    items: Vec<Item<'a>>,
    currency: &'a Currency,
}

impl<'a> ItemPool<'a> {
    /// Create an empty item pool.
    #[must_use]
    pub fn empty(currency: &'a Currency) -> Self {
        ItemPool {
            items: Vec::new(),
            currency,
        }
    }

    /// Create a new item pool, validating every item.
    ///
    /// # Errors
    ///
    /// Returns an [`ItemPoolError`] if an item has a different currency, a negative
    /// value, an empty identifier, or an identifier already used by another item.
    pub fn new(
        items: impl Into<Vec<Item<'a>>>,
        currency: &'a Currency,
    ) -> Result<Self, ItemPoolError> {
        let items = items.into();

        validate_items(&items, currency)?;

        Ok(ItemPool { items, currency })
    }

    /// Iterate over the items in the pool.
    pub fn iter(&self) -> impl Iterator<Item = &Item<'a>> {
        self.items.iter()
    }

    /// Get an item from the pool by its index.
    ///
    /// # Errors
    ///
    /// Returns a `ItemPoolError::ItemNotFound` if the item is not found.
    pub fn get_item(&self, item: usize) -> Result<&Item<'a>, ItemPoolError> {
        self.items
            .get(item)
            .ok_or(ItemPoolError::ItemNotFound(item))
    }

    /// Sum of all item values.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalValueError`] if money arithmetic fails.
    pub fn total_value(&self) -> Result<Money<'a, Currency>, TotalValueError> {
        total_value(self.currency, self.items.iter().map(Item::value))
    }

    /// Get the currency of the pool.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Get the number of items in the pool.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Check currency, sign, and identifier uniqueness of every item.
fn validate_items(items: &[Item<'_>], currency: &Currency) -> Result<(), ItemPoolError> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();

    for (idx, item) in items.iter().enumerate() {
        let item_currency = item.value().currency();

        if item_currency != currency {
            return Err(ItemPoolError::CurrencyMismatch(
                idx,
                item_currency.iso_alpha_code,
                currency.iso_alpha_code,
            ));
        }

        let minor_units = item.value().to_minor_units();

        if minor_units < 0 {
            return Err(ItemPoolError::NegativeValue {
                id: item.id().to_string(),
                minor_units,
            });
        }

        if item.id().trim().is_empty() {
            return Err(ItemPoolError::EmptyId(idx));
        }

        if !seen.insert(item.id()) {
            return Err(ItemPoolError::DuplicateId(item.id().to_string()));
        }
    }

    Ok(())
}
