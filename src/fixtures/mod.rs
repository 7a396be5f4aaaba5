//! Fixtures
//!
//! YAML input sets: `<base>/items/<name>.yml` and `<base>/categories/<name>.yml`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::{
    categories::{Category, CategoryError, CategorySet},
    fixtures::{categories::CategoriesFixture, items::ItemsFixture},
    items::{
        Item,
        pool::{ItemPool, ItemPoolError},
    },
};

pub mod categories;
pub mod items;
pub mod values;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,

        /// Underlying error
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid value format
    #[error("Invalid value format: {0}")]
    InvalidValue(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between rows
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Neither items nor categories are loaded
    #[error("No items or categories loaded yet; currency unknown")]
    NoCurrency,

    /// Loaded items do not form a valid pool
    #[error(transparent)]
    ItemPool(#[from] ItemPoolError),

    /// Loaded categories do not form a valid set
    #[error(transparent)]
    Category(#[from] CategoryError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Loaded items, in file order
    items: Vec<Item<'static>>,

    /// Loaded categories, in file order
    categories: Vec<Category<'static>>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            items: Vec::new(),
            categories: Vec::new(),
            currency: None,
        }
    }

    /// Load items from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a value is
    /// invalid or in a different currency.
    pub fn load_items(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = read_fixture(&self.base_path.join("items").join(format!("{name}.yml")))?;
        let fixture: ItemsFixture = serde_norway::from_str(&contents)?;

        for item_fixture in fixture.items {
            let item = Item::try_from(item_fixture)?;

            self.check_currency(item.value().currency())?;
            self.items.push(item);
        }

        debug!(set = name, items = self.items.len(), "loaded item fixtures");

        Ok(self)
    }

    /// Load categories from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a minimum is
    /// invalid or in a different currency.
    pub fn load_categories(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = read_fixture(
            &self
                .base_path
                .join("categories")
                .join(format!("{name}.yml")),
        )?;
        let fixture: CategoriesFixture = serde_norway::from_str(&contents)?;

        for category_fixture in fixture.categories {
            let category = Category::try_from(category_fixture)?;

            self.check_currency(category.minimum().currency())?;
            self.categories.push(category);
        }

        debug!(
            set = name,
            categories = self.categories.len(),
            "loaded category fixtures"
        );

        Ok(self)
    }

    /// Load a complete fixture set (items and categories with the same name) from
    /// the default base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in("./fixtures", name)
    }

    /// Load a complete fixture set from `base_path`
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture.load_items(name)?.load_categories(name)?;

        Ok(fixture)
    }

    /// Currency shared by every loaded row.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCurrency`] if nothing has been loaded.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Build a validated item pool from the loaded items
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is loaded or the items fail pool validation
    /// (empty or duplicate ids, negative values).
    pub fn items(&self) -> Result<ItemPool<'static>, FixtureError> {
        Ok(ItemPool::new(self.items.clone(), self.currency()?)?)
    }

    /// Build a validated category set from the loaded categories
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is loaded or the categories fail validation
    /// (empty or duplicate names, negative minimums).
    pub fn categories(&self) -> Result<CategorySet<'static>, FixtureError> {
        Ok(CategorySet::new(self.categories.clone(), self.currency()?)?)
    }

    fn check_currency(&mut self, currency: &'static Currency) -> Result<(), FixtureError> {
        match self.currency {
            Some(existing) if existing != currency => Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            )),
            Some(_) => Ok(()),
            None => {
                self.currency = Some(currency);

                Ok(())
            }
        }
    }
}

fn read_fixture(path: &Path) -> Result<String, FixtureError> {
    fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rusty_money::iso::USD;
    use tempfile::{TempDir, tempdir};
    use testresult::TestResult;

    use super::*;

    fn write_set(items: &str, categories: &str) -> Result<TempDir, std::io::Error> {
        let dir = tempdir()?;

        fs::create_dir_all(dir.path().join("items"))?;
        fs::create_dir_all(dir.path().join("categories"))?;
        fs::write(dir.path().join("items").join("test.yml"), items)?;
        fs::write(dir.path().join("categories").join("test.yml"), categories)?;

        Ok(dir)
    }

    #[test]
    fn from_set_in_loads_items_and_categories() -> TestResult {
        let dir = write_set(
            "items:\n  - id: A\n    value: \"60.00 USD\"\n  - id: B\n    value: \"40.00 USD\"\n",
            "categories:\n  - name: X\n    minimum: \"50.00 USD\"\n",
        )?;

        let fixture = Fixture::from_set_in(dir.path(), "test")?;

        let items = fixture.items()?;
        let categories = fixture.categories()?;

        assert_eq!(fixture.currency()?, USD);
        assert_eq!(items.len(), 2);
        assert_eq!(items.total_value()?.to_minor_units(), 10_000);
        assert_eq!(categories.get_category(0)?.name(), "X");

        Ok(())
    }

    #[test]
    fn mixed_currencies_are_rejected() -> TestResult {
        let dir = write_set(
            "items:\n  - id: A\n    value: \"60.00 USD\"\n",
            "categories:\n  - name: X\n    minimum: \"50.00 GBP\"\n",
        )?;

        let result = Fixture::from_set_in(dir.path(), "test");

        assert!(matches!(
            result,
            Err(FixtureError::CurrencyMismatch(expected, found)) if expected == "USD" && found == "GBP"
        ));

        Ok(())
    }

    #[test]
    fn duplicate_ids_fail_pool_validation() -> TestResult {
        let dir = write_set(
            "items:\n  - id: A\n    value: \"1.00 USD\"\n  - id: A\n    value: \"2.00 USD\"\n",
            "categories: []\n",
        )?;

        let fixture = Fixture::from_set_in(dir.path(), "test")?;

        assert!(matches!(
            fixture.items(),
            Err(FixtureError::ItemPool(ItemPoolError::DuplicateId(id))) if id == "A"
        ));

        Ok(())
    }

    #[test]
    fn empty_set_has_no_currency() -> TestResult {
        let dir = write_set("items: []\n", "categories: []\n")?;

        let fixture = Fixture::from_set_in(dir.path(), "test")?;

        assert!(matches!(fixture.items(), Err(FixtureError::NoCurrency)));

        Ok(())
    }

    #[test]
    fn missing_file_reports_path() -> TestResult {
        let dir = tempdir()?;

        let result = Fixture::from_set_in(dir.path(), "missing");

        assert!(
            matches!(result, Err(FixtureError::Io { path, .. }) if path.ends_with("items/missing.yml"))
        );

        Ok(())
    }

    #[test]
    fn bundled_basic_set_loads() -> TestResult {
        let fixture = Fixture::from_set_in(
            Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures"),
            "basic",
        )?;

        assert!(!fixture.items()?.is_empty());
        assert!(!fixture.categories()?.is_empty());

        Ok(())
    }
}
