//! ILP State

use std::fmt;

use good_lp::{Expression, ProblemVariables, Variable, variable};
use smallvec::SmallVec;

use crate::{
    categories::CategorySet,
    items::pool::ItemPool,
    solvers::{
        SolverError,
        ilp::{i64_to_f64_exact, observer::ILPObserver},
    },
};

/// Assignment variables for one item, one per category.
pub type AssignmentRow = SmallVec<[Variable; 10]>;

/// Relation operator for a linear ILP constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintRelation {
    /// Equality (`lhs == rhs`)
    Eq,

    /// Greater than or equal (`lhs >= rhs`)
    Geq,
}

/// Recorded linear ILP constraint emitted during model construction.
#[derive(Debug, Clone)]
pub(crate) struct ILPConstraint {
    /// Left-hand side expression
    pub(crate) lhs: Expression,

    /// Relation operator
    pub(crate) relation: ConstraintRelation,

    /// Right-hand side scalar
    pub(crate) rhs: f64,
}

/// Builder state for the assignment model: variables, per-item coefficients and
/// recorded constraints.
pub struct ILPState {
    pb: ProblemVariables,
    assignment: SmallVec<[AssignmentRow; 10]>,
    coefficients: SmallVec<[f64; 10]>,
    constraints: Vec<ILPConstraint>,
}

impl fmt::Debug for ILPState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variables: usize = self.assignment.iter().map(SmallVec::len).sum();

        f.debug_struct("ILPState")
            .field("pb", &"<ProblemVariables>")
            .field("assignment", &format!("[{variables} variables]"))
            .field(
                "constraints",
                &format!("[{} constraints]", self.constraints.len()),
            )
            .finish()
    }
}

impl ILPState {
    /// Create ILP state with one binary variable per (item, category) pair.
    ///
    /// Each item's value in minor units becomes its coefficient in every coverage
    /// constraint, so it is converted once here.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::MinorUnitsNotRepresentable`] if any item's value cannot
    /// be represented exactly as a solver coefficient.
    pub(crate) fn with_assignment_variables<O: ILPObserver + ?Sized>(
        items: &ItemPool<'_>,
        categories: &CategorySet<'_>,
        observer: &mut O,
    ) -> Result<Self, SolverError> {
        let mut pb = ProblemVariables::new();
        let mut assignment: SmallVec<[AssignmentRow; 10]> = SmallVec::with_capacity(items.len());
        let mut coefficients: SmallVec<[f64; 10]> = SmallVec::with_capacity(items.len());

        for (item_idx, item) in items.iter().enumerate() {
            let minor_units = item.value().to_minor_units();

            let coeff = i64_to_f64_exact(minor_units)
                .ok_or(SolverError::MinorUnitsNotRepresentable { minor_units })?;

            let row: AssignmentRow = (0..categories.len())
                .map(|category_idx| {
                    let var = pb.add(variable().binary());

                    observer.on_assignment_variable(item_idx, category_idx, var, minor_units);

                    var
                })
                .collect();

            assignment.push(row);
            coefficients.push(coeff);
        }

        Ok(Self {
            pb,
            assignment,
            coefficients,
            constraints: Vec::new(),
        })
    }

    /// Assignment variables of every item, indexed `[item][category]`.
    pub fn assignment(&self) -> &[AssignmentRow] {
        &self.assignment
    }

    /// Exactly-one expression for an item: `Σ_j x[item][j]`.
    pub fn item_expression(&self, item_idx: usize) -> Option<Expression> {
        self.assignment
            .get(item_idx)
            .map(|row| row.iter().copied().map(Expression::from).sum())
    }

    /// Coverage expression for a category: `Σ_i value(i) · x[i][category]`.
    pub fn category_expression(&self, category_idx: usize) -> Expression {
        self.assignment
            .iter()
            .zip(self.coefficients.iter().copied())
            .filter_map(|(row, coeff)| row.get(category_idx).map(|var| coeff * *var))
            .sum()
    }

    /// Record an equality constraint.
    pub fn add_eq_constraint(&mut self, lhs: Expression, rhs: f64) {
        self.constraints.push(ILPConstraint {
            lhs,
            relation: ConstraintRelation::Eq,
            rhs,
        });
    }

    /// Record a greater-than-or-equal constraint.
    pub fn add_geq_constraint(&mut self, lhs: Expression, rhs: f64) {
        self.constraints.push(ILPConstraint {
            lhs,
            relation: ConstraintRelation::Geq,
            rhs,
        });
    }

    /// Extract the problem variables, assignment variables, and all recorded
    /// constraints.
    pub(crate) fn into_parts(
        self,
    ) -> (
        ProblemVariables,
        SmallVec<[AssignmentRow; 10]>,
        Vec<ILPConstraint>,
    ) {
        (self.pb, self.assignment, self.constraints)
    }
}
