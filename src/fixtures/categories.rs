//! Category Fixtures

use rusty_money::Money;
use serde::Deserialize;

use crate::{
    categories::Category,
    fixtures::{FixtureError, values::parse_value},
};

/// Wrapper for categories in YAML
#[derive(Debug, Deserialize)]
pub struct CategoriesFixture {
    /// Categories in set order
    pub categories: Vec<CategoryFixture>,
}

/// Category Fixture
#[derive(Debug, Deserialize)]
pub struct CategoryFixture {
    /// Category name
    pub name: String,

    /// Required minimum (e.g., "50.00 USD")
    pub minimum: String,
}

impl TryFrom<CategoryFixture> for Category<'static> {
    type Error = FixtureError;

    fn try_from(fixture: CategoryFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_value(&fixture.minimum)?;

        Ok(Category::new(
            fixture.name,
            Money::from_minor(minor_units, currency),
        ))
    }
}
