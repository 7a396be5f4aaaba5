//! ILP Observers
//!
//! Callbacks fired while the assignment model is being built, used to render or
//! log the formulation without coupling the solver to any output format.

use std::fmt::Debug;

use good_lp::{Expression, IntoAffineExpression, Variable};
use tracing::trace;

/// Observer of the ILP formulation as it is constructed.
pub trait ILPObserver: Debug {
    /// Called for each assignment variable `x[item][category]`.
    fn on_assignment_variable(
        &mut self,
        item_idx: usize,
        category_idx: usize,
        var: Variable,
        value_minor: i64,
    );

    /// Called for each item's exactly-one constraint (`expr == 1`).
    fn on_exactly_one_constraint(&mut self, item_idx: usize, constraint_expr: &Expression);

    /// Called for each category's coverage constraint (`expr >= minimum`).
    fn on_coverage_constraint(
        &mut self,
        category_idx: usize,
        constraint_expr: &Expression,
        minimum_minor: i64,
    );
}

/// Observer that ignores every callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ILPObserver for NoopObserver {
    fn on_assignment_variable(&mut self, _: usize, _: usize, _: Variable, _: i64) {}

    fn on_exactly_one_constraint(&mut self, _: usize, _: &Expression) {}

    fn on_coverage_constraint(&mut self, _: usize, _: &Expression, _: i64) {}
}

/// Observer that emits the formulation as `trace` level events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver {
    variables: usize,
    constraints: usize,
}

impl TracingObserver {
    /// Number of variables seen so far.
    pub fn variables(&self) -> usize {
        self.variables
    }

    /// Number of constraints seen so far.
    pub fn constraints(&self) -> usize {
        self.constraints
    }
}

impl ILPObserver for TracingObserver {
    fn on_assignment_variable(
        &mut self,
        item_idx: usize,
        category_idx: usize,
        _var: Variable,
        value_minor: i64,
    ) {
        self.variables += 1;

        trace!(item_idx, category_idx, value_minor, "assignment variable");
    }

    fn on_exactly_one_constraint(&mut self, item_idx: usize, constraint_expr: &Expression) {
        self.constraints += 1;

        let terms = constraint_expr.linear_coefficients().count();

        trace!(item_idx, terms, "exactly-one constraint");
    }

    fn on_coverage_constraint(
        &mut self,
        category_idx: usize,
        constraint_expr: &Expression,
        minimum_minor: i64,
    ) {
        self.constraints += 1;

        let terms = constraint_expr.linear_coefficients().count();

        trace!(category_idx, terms, minimum_minor, "coverage constraint");
    }
}
