//! Assignment Solvers

use good_lp::ResolutionError;
use thiserror::Error;

use crate::{
    assignment::Assignment,
    categories::{CategoryError, CategorySet},
    items::pool::{ItemPool, ItemPoolError},
};

pub mod ilp;

/// Solver Errors
#[derive(Debug, Error)]
pub enum SolverError {
    /// Money amount in minor units cannot be represented exactly as a solver coefficient.
    #[error(
        "money amount in minor units cannot be represented exactly as a solver coefficient: {minor_units}"
    )]
    MinorUnitsNotRepresentable {
        /// Money amount in minor units
        minor_units: i64,
    },

    /// No assignment satisfies every exactly-one and coverage constraint.
    #[error("no assignment satisfies every category minimum")]
    Infeasible,

    /// There are items to place but no categories to place them in.
    #[error("{items} items cannot be assigned without any categories")]
    NoCategories {
        /// Number of items that could not be placed
        items: usize,
    },

    /// The item pool and category set use different currencies.
    #[error("items are valued in {0} but categories in {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Wrapped item pool error
    #[error(transparent)]
    ItemPool(#[from] ItemPoolError),

    /// Wrapped category error
    #[error(transparent)]
    Category(#[from] CategoryError),

    /// Wrapped solver resolution error (other than proven infeasibility)
    #[error(transparent)]
    ResolutionError(ResolutionError),

    /// Internal solver invariant was violated (this is a bug).
    #[error("solver invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },
}

impl From<ResolutionError> for SolverError {
    fn from(err: ResolutionError) -> Self {
        match err {
            ResolutionError::Infeasible => SolverError::Infeasible,
            other => SolverError::ResolutionError(other),
        }
    }
}

/// Trait for assigning a pool of items to a set of categories
pub trait Solver {
    /// Assign every item to exactly one category so that each category's minimum is covered.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the solver encounters an error, including
    /// [`SolverError::Infeasible`] when no such assignment exists.
    fn solve(items: &ItemPool<'_>, categories: &CategorySet<'_>)
    -> Result<Assignment, SolverError>;
}
