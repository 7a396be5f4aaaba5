//! Assignments
//!
//! The result of a solve: which items went to which category, by index into the
//! [`ItemPool`] and [`CategorySet`] that were solved.

use smallvec::{SmallVec, smallvec};
use thiserror::Error;

use crate::{
    categories::{Category, CategoryError, CategorySet},
    items::{
        Item,
        pool::{ItemPool, ItemPoolError},
    },
};

type ItemIndexList = SmallVec<[usize; 10]>;

/// Item indexes assigned to each category, plus any items left unassigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    /// Item indexes per category index, in extraction order
    category_items: SmallVec<[ItemIndexList; 10]>,

    /// Item indexes the solver did not place in any category
    unassigned_items: ItemIndexList,
}

impl Assignment {
    /// Create an assignment with no items for `category_count` categories.
    #[must_use]
    pub fn with_categories(category_count: usize) -> Self {
        Self {
            category_items: smallvec![ItemIndexList::new(); category_count],
            unassigned_items: ItemIndexList::new(),
        }
    }

    /// Record that `item_idx` was assigned to `category_idx`.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError::CategoryNotFound`] if the category index is out of range.
    pub fn assign(&mut self, item_idx: usize, category_idx: usize) -> Result<(), CategoryError> {
        self.category_items
            .get_mut(category_idx)
            .ok_or(CategoryError::CategoryNotFound(category_idx))?
            .push(item_idx);

        Ok(())
    }

    /// Record that `item_idx` could not be placed.
    pub fn mark_unassigned(&mut self, item_idx: usize) {
        self.unassigned_items.push(item_idx);
    }

    /// Item indexes assigned to the category at `category_idx`.
    pub fn items_in(&self, category_idx: usize) -> &[usize] {
        self.category_items
            .get(category_idx)
            .map(SmallVec::as_slice)
            .unwrap_or_default()
    }

    /// Iterate over `(category index, item indexes)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.category_items
            .iter()
            .map(SmallVec::as_slice)
            .enumerate()
    }

    /// Items the solver did not place in any category.
    pub fn unassigned(&self) -> &[usize] {
        &self.unassigned_items
    }

    /// Category index holding `item_idx`, if any.
    pub fn category_of(&self, item_idx: usize) -> Option<usize> {
        self.category_items
            .iter()
            .position(|items| items.contains(&item_idx))
    }

    /// Number of categories covered by this assignment.
    pub fn category_count(&self) -> usize {
        self.category_items.len()
    }

    /// Number of items placed in some category.
    pub fn assigned_count(&self) -> usize {
        self.category_items.iter().map(SmallVec::len).sum()
    }

    /// `true` when every item was placed.
    pub fn is_complete(&self) -> bool {
        self.unassigned_items.is_empty()
    }

    /// Resolve the assignment into `(category, items)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if an index does not exist in `items` or `categories`.
    pub fn resolve<'p, 'a>(
        &self,
        items: &'p ItemPool<'a>,
        categories: &'p CategorySet<'a>,
    ) -> Result<Vec<(&'p Category<'a>, Vec<&'p Item<'a>>)>, ResolveError> {
        self.iter()
            .map(|(category_idx, item_indexes)| -> Result<_, ResolveError> {
                let category = categories.get_category(category_idx)?;

                let assigned = item_indexes
                    .iter()
                    .map(|&item_idx| items.get_item(item_idx))
                    .collect::<Result<Vec<_>, _>>()?;

                Ok((category, assigned))
            })
            .collect()
    }
}

/// Errors raised while resolving assignment indexes back to items and categories.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Wrapped item pool error
    #[error(transparent)]
    ItemPool(#[from] ItemPoolError),

    /// Wrapped category error
    #[error(transparent)]
    Category(#[from] CategoryError),
}
