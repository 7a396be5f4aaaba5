//! Collate
//!
//! Collate assigns priced items to categories so that every category receives at least
//! its minimum value and every item is placed exactly once, solved as a binary integer
//! program.

pub mod allocation;
pub mod assignment;
pub mod categories;
pub mod cli;
pub mod feasibility;
pub mod fixtures;
pub mod items;
pub mod prelude;
pub mod pricing;
pub mod records;
pub mod report;
pub mod solvers;
pub mod validation;
