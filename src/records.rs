//! Assignment Records
//!
//! Serialisable form of an assignment, keyed by category name in category order.

use std::{fs::File, io::BufWriter, path::Path};

use rusty_money::{Money, iso::Currency};
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::{
    assignment::{Assignment, ResolveError},
    categories::CategorySet,
    items::pool::ItemPool,
};

/// Errors raised while building or writing records.
#[derive(Debug, Error)]
pub enum RecordError {
    /// An assignment index did not resolve.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// JSON serialisation failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The output file could not be created.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Which fields to write for each item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordShape {
    /// `{ "id": .., "value": .. }` per item
    #[default]
    WithValues,

    /// Item ids only
    IdsOnly,
}

/// One item in a category's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ItemRecord {
    /// Id only
    Id(String),

    /// Id and value, the value formatted as `"<amount> <ISO code>"`
    Valued {
        /// Item id
        id: String,

        /// Item value
        value: String,
    },
}

/// Serialisable assignment: a category-name keyed map plus unassigned ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentRecord {
    #[serde(serialize_with = "serialize_in_category_order")]
    assignment: Vec<(String, Vec<ItemRecord>)>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    unassigned: Vec<String>,
}

impl AssignmentRecord {
    /// Build a record from a solved assignment.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Resolve`] if the assignment refers to an item or
    /// category that does not exist.
    pub fn from_assignment(
        assignment: &Assignment,
        items: &ItemPool<'_>,
        categories: &CategorySet<'_>,
        shape: RecordShape,
    ) -> Result<Self, RecordError> {
        let resolved = assignment.resolve(items, categories)?;

        let records = resolved
            .into_iter()
            .map(|(category, assigned)| {
                let entries = assigned
                    .into_iter()
                    .map(|item| match shape {
                        RecordShape::WithValues => ItemRecord::Valued {
                            id: item.id().to_string(),
                            value: format_value(item.value()),
                        },
                        RecordShape::IdsOnly => ItemRecord::Id(item.id().to_string()),
                    })
                    .collect();

                (category.name().to_string(), entries)
            })
            .collect();

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

        Ok(Self {
            assignment: records,
            unassigned,
        })
    }

    /// Items recorded for `category`, if the category exists.
    pub fn items_for(&self, category: &str) -> Option<&[ItemRecord]> {
        self.assignment
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, entries)| entries.as_slice())
    }

    /// Ids of unassigned items.
    pub fn unassigned(&self) -> &[String] {
        &self.unassigned
    }

    /// Serialise as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Json`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write pretty-printed JSON to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns a [`RecordError`] if the file cannot be created or written.
    pub fn write_to(&self, path: &Path) -> Result<(), RecordError> {
        let writer = BufWriter::new(File::create(path)?);

        serde_json::to_writer_pretty(writer, self)?;

        Ok(())
    }
}

/// Format a value the same way fixtures spell it, e.g. `"60.00 USD"`.
fn format_value(value: &Money<'_, Currency>) -> String {
    format!("{} {}", value.amount(), value.currency().iso_alpha_code)
}

fn serialize_in_category_order<S: Serializer>(
    entries: &[(String, Vec<ItemRecord>)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(entries.iter().map(|(name, items)| (name, items)))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use serde_json::{Value, json};
    use tempfile::tempdir;
    use testresult::TestResult;

    use crate::{categories::Category, items::Item};

    use super::*;

    fn inputs() -> Result<(ItemPool<'static>, CategorySet<'static>, Assignment), RecordError> {
        let items = ItemPool::new(
            [
                Item::new("912828YK0", Money::from_minor(6_000, USD)),
                Item::new("912828ZT0", Money::from_minor(4_050, USD)),
                Item::new("912810RZ3", Money::from_minor(100, USD)),
            ],
            USD,
        )
        .map_err(ResolveError::from)?;

        let categories = CategorySet::new(
            [
                Category::new("Zeta", Money::from_minor(5_000, USD)),
                Category::new("Acme", Money::from_minor(4_000, USD)),
            ],
            USD,
        )
        .map_err(ResolveError::from)?;

        let mut assignment = Assignment::with_categories(2);
        assignment.assign(0, 0).map_err(ResolveError::from)?;
        assignment.assign(1, 1).map_err(ResolveError::from)?;
        assignment.mark_unassigned(2);

        Ok((items, categories, assignment))
    }

    #[test]
    fn values_are_written_with_currency() -> TestResult {
        let (items, categories, assignment) = inputs()?;

        let record = AssignmentRecord::from_assignment(
            &assignment,
            &items,
            &categories,
            RecordShape::WithValues,
        )?;

        let value: Value = serde_json::from_str(&record.to_json()?)?;

        assert_eq!(
            value,
            json!({
                "assignment": {
                    "Zeta": [{ "id": "912828YK0", "value": "60.00 USD" }],
                    "Acme": [{ "id": "912828ZT0", "value": "40.50 USD" }],
                },
                "unassigned": ["912810RZ3"],
            })
        );

        Ok(())
    }

    #[test]
    fn ids_only_shape_drops_values() -> TestResult {
        let (items, categories, assignment) = inputs()?;

        let record = AssignmentRecord::from_assignment(
            &assignment,
            &items,
            &categories,
            RecordShape::IdsOnly,
        )?;

        assert_eq!(
            record.items_for("Acme"),
            Some([ItemRecord::Id("912828ZT0".to_string())].as_slice())
        );
        assert_eq!(record.items_for("Missing"), None);
        assert_eq!(record.unassigned(), &["912810RZ3".to_string()]);

        Ok(())
    }

    #[test]
    fn categories_keep_their_order() -> TestResult {
        let (items, categories, assignment) = inputs()?;

        let record = AssignmentRecord::from_assignment(
            &assignment,
            &items,
            &categories,
            RecordShape::IdsOnly,
        )?;

        let json = record.to_json()?;

        let zeta = json.find("Zeta").ok_or("missing Zeta")?;
        let acme = json.find("Acme").ok_or("missing Acme")?;

        assert!(zeta < acme);

        Ok(())
    }

    #[test]
    fn complete_assignment_omits_unassigned() -> TestResult {
        let items = ItemPool::new([Item::new("A", Money::from_minor(100, USD))], USD)?;
        let categories = CategorySet::new([Category::new("X", Money::from_minor(50, USD))], USD)?;

        let mut assignment = Assignment::with_categories(1);
        assignment.assign(0, 0)?;

        let record = AssignmentRecord::from_assignment(
            &assignment,
            &items,
            &categories,
            RecordShape::IdsOnly,
        )?;

        let value: Value = serde_json::from_str(&record.to_json()?)?;

        assert_eq!(value, json!({ "assignment": { "X": ["A"] } }));

        Ok(())
    }

    #[test]
    fn write_to_creates_json_file() -> TestResult {
        let (items, categories, assignment) = inputs()?;
        let dir = tempdir()?;
        let path = dir.path().join("assignment.json");

        AssignmentRecord::from_assignment(&assignment, &items, &categories, RecordShape::IdsOnly)?
            .write_to(&path)?;

        let value: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;

        assert_eq!(
            value.pointer("/assignment/Zeta"),
            Some(&json!(["912828YK0"]))
        );

        Ok(())
    }
}
