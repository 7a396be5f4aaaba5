//! ILP Solver

use good_lp::{Expression, Solution, SolverModel};
use num_traits::ToPrimitive;
use tracing::{debug, info, warn};

#[cfg(feature = "solver-highs")]
use good_lp::solvers::highs::highs as default_solver;
#[cfg(all(not(feature = "solver-highs"), feature = "solver-microlp"))]
use good_lp::solvers::microlp::microlp as default_solver;

use crate::solvers::ilp::state::{ConstraintRelation, ILPConstraint};
use crate::{
    assignment::Assignment,
    categories::CategorySet,
    items::pool::ItemPool,
    solvers::{Solver, SolverError},
};

pub mod observer;
pub mod renderers;
pub(crate) mod state;

pub use observer::{ILPObserver, NoopObserver, TracingObserver};
pub use state::AssignmentRow;
pub(crate) use state::ILPState;

/// Binary threshold for determining truthiness
pub const BINARY_THRESHOLD: f64 = 0.5;

/// Solver using Integer Linear Programming (ILP)
#[derive(Debug)]
pub struct ILPSolver;

impl ILPSolver {
    /// Solve with an observer for capturing the ILP formulation.
    ///
    /// The observer receives a callback for every assignment variable, every
    /// exactly-one constraint and every coverage constraint as the model is built.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Infeasible`] if no assignment covers every category
    /// minimum, or another [`SolverError`] if the model cannot be built or solved.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use collate::solvers::ilp::{ILPSolver, renderers::typst::TypstRenderer};
    /// use std::path::PathBuf;
    /// # use collate::fixtures::Fixture;
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let fixture = Fixture::from_set("basic")?;
    /// # let items = fixture.items()?;
    /// # let categories = fixture.categories()?;
    ///
    /// let mut renderer = TypstRenderer::new(PathBuf::from("formulation.typ"));
    /// let assignment = ILPSolver::solve_with_observer(&items, &categories, &mut renderer)?;
    /// renderer.write()?;
    /// # Ok(())
    /// # }
    /// ```
    #[tracing::instrument(
        name = "ilp.solve",
        skip_all,
        fields(items = items.len(), categories = categories.len())
    )]
    pub fn solve_with_observer(
        items: &ItemPool<'_>,
        categories: &CategorySet<'_>,
        observer: &mut dyn ILPObserver,
    ) -> Result<Assignment, SolverError> {
        if items.currency() != categories.currency() {
            return Err(SolverError::CurrencyMismatch(
                items.currency().iso_alpha_code,
                categories.currency().iso_alpha_code,
            ));
        }

        if items.is_empty() {
            return solve_without_items(categories);
        }

        if categories.is_empty() {
            return Err(SolverError::NoCategories { items: items.len() });
        }

        // One binary variable per (item, category) pair.
        let mut state = ILPState::with_assignment_variables(items, categories, observer)?;

        // Every item goes to exactly one category.
        for item_idx in 0..items.len() {
            let Some(constraint_expr) = state.item_expression(item_idx) else {
                return Err(SolverError::InvariantViolation {
                    message: "missing assignment variables for item",
                });
            };

            observer.on_exactly_one_constraint(item_idx, &constraint_expr);

            state.add_eq_constraint(constraint_expr, 1.0);
        }

        // Every category reaches its minimum.
        for (category_idx, category) in categories.iter().enumerate() {
            let minimum_minor = category.minimum().to_minor_units();

            let Some(rhs) = i64_to_f64_exact(minimum_minor) else {
                return Err(SolverError::MinorUnitsNotRepresentable {
                    minor_units: minimum_minor,
                });
            };

            let constraint_expr = state.category_expression(category_idx);

            observer.on_coverage_constraint(category_idx, &constraint_expr, minimum_minor);

            state.add_geq_constraint(constraint_expr, rhs);
        }

        let (pb, assignment_vars, constraints) = state.into_parts();

        ensure_assignment_vars_shape(&assignment_vars, items.len(), categories.len())?;

        debug!(
            variables = items.len() * categories.len(),
            constraints = constraints.len(),
            "built assignment model"
        );

        // Pure feasibility program: any assignment satisfying the constraints will do.
        let mut model = pb.minimise(Expression::default()).using(default_solver);

        model = apply_recorded_constraints(model, constraints);

        let solution = model.solve()?;

        let assignment = collect_assignment(&solution, &assignment_vars, categories.len())?;

        info!(
            assigned = assignment.assigned_count(),
            unassigned = assignment.unassigned().len(),
            "solved assignment model"
        );

        Ok(assignment)
    }
}

impl Solver for ILPSolver {
    fn solve(
        items: &ItemPool<'_>,
        categories: &CategorySet<'_>,
    ) -> Result<Assignment, SolverError> {
        let mut observer = NoopObserver;

        Self::solve_with_observer(items, categories, &mut observer)
    }
}

/// Check if an i64 value is exactly representable as f64.
pub fn i64_to_f64_exact(v: i64) -> Option<f64> {
    let f = v.to_f64()?;

    (f.to_i64() == Some(v)).then_some(f)
}

/// With nothing to place, the only question is whether every minimum is zero.
fn solve_without_items(categories: &CategorySet<'_>) -> Result<Assignment, SolverError> {
    if categories
        .iter()
        .any(|category| category.minimum().to_minor_units() > 0)
    {
        return Err(SolverError::Infeasible);
    }

    Ok(Assignment::with_categories(categories.len()))
}

fn apply_recorded_constraints<S: SolverModel>(mut model: S, constraints: Vec<ILPConstraint>) -> S {
    for constraint in constraints {
        model = match constraint.relation {
            ConstraintRelation::Eq => model.with(constraint.lhs.eq(constraint.rhs)),
            ConstraintRelation::Geq => model.with(constraint.lhs.geq(constraint.rhs)),
        };
    }

    model
}

/// Ensure there is one row of assignment variables per item, each with one
/// variable per category.
fn ensure_assignment_vars_shape(
    rows: &[AssignmentRow],
    items_len: usize,
    categories_len: usize,
) -> Result<(), SolverError> {
    if rows.len() != items_len {
        return Err(SolverError::InvariantViolation {
            message: "assignment variable rows do not match number of items",
        });
    }

    if rows.iter().any(|row| row.len() != categories_len) {
        return Err(SolverError::InvariantViolation {
            message: "assignment variable columns do not match number of categories",
        });
    }

    Ok(())
}

/// Translate solved assignment variables into an [`Assignment`].
///
/// Each item goes to the first category whose variable reads as set. Items with
/// no set variable are recorded as unassigned rather than dropped.
///
/// # Errors
///
/// Returns [`SolverError::Category`] if a category index is out of range.
fn collect_assignment(
    solution: &impl Solution,
    rows: &[AssignmentRow],
    category_count: usize,
) -> Result<Assignment, SolverError> {
    let mut assignment = Assignment::with_categories(category_count);

    for (item_idx, row) in rows.iter().enumerate() {
        // The solver returns floats; treat values above 0.5 as set to tolerate noise.
        let chosen = row
            .iter()
            .position(|var| solution.value(*var) > BINARY_THRESHOLD);

        match chosen {
            Some(category_idx) => assignment.assign(item_idx, category_idx)?,
            None => {
                warn!(item_idx, "item has no category in solver output");

                assignment.mark_unassigned(item_idx);
            }
        }
    }

    Ok(assignment)
}
