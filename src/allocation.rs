//! Allocation
//!
//! The full pipeline: run the feasibility pre-check, then the solver. Either step
//! can refuse, and the caller gets a single error type with a coarse status.

use thiserror::Error;
use tracing::info;

use crate::{
    assignment::Assignment,
    categories::CategorySet,
    feasibility::{self, FeasibilityError, FeasibilitySummary},
    items::pool::ItemPool,
    solvers::{
        SolverError,
        ilp::{ILPObserver, ILPSolver, NoopObserver},
    },
};

/// Outcome of an allocation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationStatus {
    /// Every item was placed and every minimum met.
    Feasible,

    /// The items are worth less than the categories require; the solver did not run.
    PreconditionFailed,

    /// The solver proved no assignment exists.
    SolverInfeasible,
}

/// Errors raised by [`allocate`].
#[derive(Debug, Error)]
pub enum AllocationError {
    /// Pre-check failure
    #[error(transparent)]
    Feasibility(#[from] FeasibilityError),

    /// Solver failure
    #[error(transparent)]
    Solver(#[from] SolverError),
}

impl AllocationError {
    /// Coarse status for this failure, if it corresponds to one.
    ///
    /// Input and backend errors (currency mismatches, unrepresentable amounts,
    /// solver crashes) have no status and return `None`.
    pub fn status(&self) -> Option<AllocationStatus> {
        match self {
            Self::Feasibility(FeasibilityError::PreconditionViolation { .. }) => {
                Some(AllocationStatus::PreconditionFailed)
            }
            Self::Solver(SolverError::Infeasible | SolverError::NoCategories { .. }) => {
                Some(AllocationStatus::SolverInfeasible)
            }
            _ => None,
        }
    }
}

/// A successful allocation: the pre-check totals and the assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation<'a> {
    /// Totals computed by the pre-check
    pub summary: FeasibilitySummary<'a>,

    /// Solved assignment
    pub assignment: Assignment,
}

impl Allocation<'_> {
    /// Always [`AllocationStatus::Feasible`].
    pub fn status(&self) -> AllocationStatus {
        AllocationStatus::Feasible
    }
}

/// Check feasibility and solve.
///
/// # Errors
///
/// Returns [`AllocationError::Feasibility`] if the pre-check fails (the solver is
/// never invoked), or [`AllocationError::Solver`] if solving fails.
pub fn allocate<'a>(
    items: &ItemPool<'a>,
    categories: &CategorySet<'a>,
) -> Result<Allocation<'a>, AllocationError> {
    allocate_with_observer(items, categories, &mut NoopObserver)
}

/// Check feasibility and solve, reporting the formulation to `observer`.
///
/// # Errors
///
/// See [`allocate`].
#[tracing::instrument(
    name = "allocate",
    skip_all,
    fields(items = items.len(), categories = categories.len())
)]
pub fn allocate_with_observer<'a>(
    items: &ItemPool<'a>,
    categories: &CategorySet<'a>,
    observer: &mut dyn ILPObserver,
) -> Result<Allocation<'a>, AllocationError> {
    let summary = feasibility::check(items, categories)?;

    let assignment = ILPSolver::solve_with_observer(items, categories, observer)?;

    info!(
        surplus = summary.surplus.to_minor_units(),
        unassigned = assignment.unassigned().len(),
        "allocation complete"
    );

    Ok(Allocation {
        summary,
        assignment,
    })
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::{categories::Category, items::Item, solvers::ilp::TracingObserver};

    use super::*;

    fn inputs(
        items: &[(&str, i64)],
        categories: &[(&str, i64)],
    ) -> Result<(ItemPool<'static>, CategorySet<'static>), AllocationError> {
        let items = ItemPool::new(
            items
                .iter()
                .map(|(id, value)| Item::new(*id, Money::from_minor(*value, USD)))
                .collect::<Vec<_>>(),
            USD,
        )
        .map_err(SolverError::from)?;

        let categories = CategorySet::new(
            categories
                .iter()
                .map(|(name, minimum)| Category::new(*name, Money::from_minor(*minimum, USD)))
                .collect::<Vec<_>>(),
            USD,
        )
        .map_err(SolverError::from)?;

        Ok((items, categories))
    }

    #[test]
    fn feasible_allocation_places_everything() -> TestResult {
        let (items, categories) = inputs(&[("A", 60), ("B", 40)], &[("X", 50)])?;

        let allocation = allocate(&items, &categories)?;

        assert_eq!(allocation.status(), AllocationStatus::Feasible);
        assert_eq!(allocation.assignment.items_in(0), &[0, 1]);
        assert_eq!(allocation.summary.surplus.to_minor_units(), 50);

        Ok(())
    }

    #[test]
    fn precondition_failure_skips_the_solver() -> TestResult {
        let (items, categories) = inputs(&[("A", 10)], &[("X", 50)])?;

        let mut observer = TracingObserver::default();

        let err = allocate_with_observer(&items, &categories, &mut observer).err();

        assert!(matches!(
            err,
            Some(AllocationError::Feasibility(
                FeasibilityError::PreconditionViolation {
                    total_value: 10,
                    total_minimum: 50
                }
            ))
        ));
        assert_eq!(
            err.as_ref().and_then(AllocationError::status),
            Some(AllocationStatus::PreconditionFailed)
        );
        assert_eq!(observer.variables(), 0);
        assert_eq!(observer.constraints(), 0);

        Ok(())
    }

    #[test]
    fn solver_infeasibility_has_its_own_status() -> TestResult {
        let (items, categories) = inputs(&[("A", 30), ("B", 30)], &[("X", 40), ("Y", 20)])?;

        let err = allocate(&items, &categories).err();

        assert!(matches!(
            err,
            Some(AllocationError::Solver(SolverError::Infeasible))
        ));
        assert_eq!(
            err.as_ref().and_then(AllocationError::status),
            Some(AllocationStatus::SolverInfeasible)
        );

        Ok(())
    }

    #[test]
    fn items_without_categories_report_solver_infeasible() -> TestResult {
        let (items, categories) = inputs(&[("A", 30)], &[])?;

        let err = allocate(&items, &categories).err();

        assert_eq!(
            err.as_ref().and_then(AllocationError::status),
            Some(AllocationStatus::SolverInfeasible)
        );

        Ok(())
    }

    #[test]
    fn backend_errors_have_no_status() {
        let err = AllocationError::Solver(SolverError::InvariantViolation { message: "test" });

        assert_eq!(err.status(), None);
    }
}
