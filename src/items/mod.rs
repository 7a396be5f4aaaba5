//! Items

use rusty_money::{Money, iso::Currency};

pub mod pool;

/// A priced item that can be assigned to exactly one category.
#[derive(Clone, Debug, PartialEq)]
pub struct Item<'a> {
    id: String,
    value: Money<'a, Currency>,
}

impl<'a> Item<'a> {
    /// Creates a new item with the given identifier and value.
    #[must_use]
    pub fn new(id: impl Into<String>, value: Money<'a, Currency>) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }

    /// Returns the identifier of the item
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the value of the item
    pub fn value(&self) -> &Money<'a, Currency> {
        &self.value
    }
}
