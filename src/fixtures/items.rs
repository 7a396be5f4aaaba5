//! Item Fixtures

use rusty_money::Money;
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, values::parse_value},
    items::Item,
};

/// Wrapper for items in YAML
#[derive(Debug, Deserialize)]
pub struct ItemsFixture {
    /// Items in pool order
    pub items: Vec<ItemFixture>,
}

/// Item Fixture
#[derive(Debug, Deserialize)]
pub struct ItemFixture {
    /// Item identifier (e.g., a CUSIP)
    pub id: String,

    /// Item value (e.g., "60.00 USD")
    pub value: String,
}

impl TryFrom<ItemFixture> for Item<'static> {
    type Error = FixtureError;

    fn try_from(fixture: ItemFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_value(&fixture.value)?;

        let value = Money::from_minor(minor_units, currency);

        Ok(Item::new(fixture.id, value))
    }
}
