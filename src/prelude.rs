//! Collate prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    allocation::{Allocation, AllocationError, AllocationStatus, allocate, allocate_with_observer},
    assignment::{Assignment, ResolveError},
    categories::{Category, CategoryError, CategorySet},
    feasibility::{FeasibilityError, FeasibilitySummary},
    items::{
        Item,
        pool::{ItemPool, ItemPoolError},
    },
    records::{AssignmentRecord, ItemRecord, RecordError, RecordShape},
    solvers::{
        Solver, SolverError,
        ilp::{
            ILPObserver, ILPSolver, NoopObserver, TracingObserver,
            renderers::typst::{TypstRenderError, TypstRenderer},
        },
    },
    validation::{CategoryCoverage, ValidationError, ValidationReport, validate},
};
