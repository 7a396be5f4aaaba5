//! ILP Typst Renderer
//!
//! This module provides a renderer that captures the assignment formulation and
//! outputs it as a Typst mathematical document.
//!
//! # Example
//!
//! ```rust,no_run
//! use collate::solvers::ilp::{ILPSolver, renderers::typst::TypstRenderer};
//! use std::path::PathBuf;
//! # use collate::fixtures::Fixture;
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! # let fixture = Fixture::from_set("basic")?;
//! # let items = fixture.items()?;
//! # let categories = fixture.categories()?;
//!
//! let mut renderer =
//!     TypstRenderer::new_with_labels(PathBuf::from("formulation.typ"), &items, &categories);
//!
//! let _assignment = ILPSolver::solve_with_observer(&items, &categories, &mut renderer)?;
//!
//! renderer.write()?;
//! # Ok(())
//! # }
//! ```

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use good_lp::{Expression, IntoAffineExpression, Variable};
use rustc_hash::FxHashMap;

use crate::{categories::CategorySet, items::pool::ItemPool, solvers::ilp::ILPObserver};

/// Errors that can occur during Typst rendering.
#[derive(Debug, thiserror::Error)]
pub enum TypstRenderError {
    /// Failed to write to the output file.
    #[error("Failed to write to output file: {0}")]
    IoError(#[from] std::io::Error),
}

/// Captured assignment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentVariable {
    /// Item index the variable refers to.
    pub item_idx: usize,

    /// Category index the variable refers to.
    pub category_idx: usize,

    /// Item value in minor units.
    pub value_minor: i64,
}

/// Captured ILP formulation data.
#[derive(Debug, Clone, Default)]
pub struct ILPFormulation {
    /// Assignment variables, keyed by solver variable
    pub assignment_vars: FxHashMap<Variable, AssignmentVariable>,

    /// Exactly-one constraints: `item_idx` -> expression
    pub exactly_one_constraints: FxHashMap<usize, Expression>,

    /// Coverage constraints: `category_idx` -> (expression, minimum in minor units)
    pub coverage_constraints: FxHashMap<usize, (Expression, i64)>,
}

impl ILPFormulation {
    /// Create a new empty formulation.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Typst renderer that implements `ILPObserver`.
///
/// Captures the formulation as it's being built and can render it to a Typst
/// document.
#[derive(Debug, Clone)]
pub struct TypstRenderer {
    /// Captured formulation
    formulation: Arc<Mutex<ILPFormulation>>,

    /// Output path for the .typ file
    output_path: PathBuf,

    /// Item index -> item id
    item_ids: Vec<String>,

    /// Category index -> category name
    category_names: Vec<String>,
}

impl TypstRenderer {
    /// Create a new Typst renderer.
    pub fn new(output_path: PathBuf) -> Self {
        Self {
            formulation: Arc::new(Mutex::new(ILPFormulation::new())),
            output_path,
            item_ids: Vec::new(),
            category_names: Vec::new(),
        }
    }

    /// Create a renderer that labels constraints with item ids and category names.
    pub fn new_with_labels(
        output_path: PathBuf,
        items: &ItemPool<'_>,
        categories: &CategorySet<'_>,
    ) -> Self {
        Self {
            formulation: Arc::new(Mutex::new(ILPFormulation::new())),
            output_path,
            item_ids: items.iter().map(|item| item.id().to_string()).collect(),
            category_names: categories
                .iter()
                .map(|category| category.name().to_string())
                .collect(),
        }
    }

    /// Get a copy of the captured formulation.
    pub fn formulation(&self) -> ILPFormulation {
        self.formulation.lock().map_or_else(
            |poisoned| poisoned.into_inner().clone(),
            |formulation| formulation.clone(),
        )
    }

    /// Get the output path.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Render the captured ILP formulation to Typst syntax.
    pub fn render(&self) -> String {
        let formulation = self.formulation();
        let mut output = String::new();

        output.push_str("= ILP Formulation for Category Assignment\n\n");

        output.push_str("== Decision Variables\n\n");
        Self::render_variables(&formulation, &mut output);

        output.push_str("\n== Objective Function\n\n");
        output.push_str(
            "Feasibility only, any assignment satisfying the constraints is accepted:\n\n",
        );
        output.push_str("$ \"minimize\" quad 0 $\n");

        output.push_str("\n== Constraints\n\n");
        self.render_constraints(&formulation, &mut output);

        output
    }

    /// Write the rendered formulation to the output file.
    ///
    /// # Errors
    ///
    /// Returns [`TypstRenderError::IoError`] if the file cannot be created or written.
    pub fn write(&self) -> Result<(), TypstRenderError> {
        let content = self.render();
        let mut file = File::create(&self.output_path)?;

        file.write_all(content.as_bytes())?;

        Ok(())
    }

    fn item_label(&self, item_idx: usize) -> String {
        let display_idx = item_idx + 1;

        match self.item_ids.get(item_idx) {
            Some(id) => format!("Item {display_idx} ({id})"),
            None => format!("Item {display_idx}"),
        }
    }

    fn category_label(&self, category_idx: usize) -> String {
        let display_idx = category_idx + 1;

        match self.category_names.get(category_idx) {
            Some(name) => format!("Category {display_idx} (\"{name}\")"),
            None => format!("Category {display_idx}"),
        }
    }

    fn render_number(value: f64) -> String {
        if (value - value.round()).abs() < 1e-9 {
            format!("{value:.0}")
        } else {
            format!("{value}")
        }
    }

    /// Variables are labelled `x_(i,j)` with 1-based item and category numbers.
    fn var_label(formulation: &ILPFormulation, var: Variable) -> String {
        formulation.assignment_vars.get(&var).map_or_else(
            || format!("{var:?}"),
            |captured| {
                format!(
                    "x_({},{})",
                    captured.item_idx + 1,
                    captured.category_idx + 1
                )
            },
        )
    }

    fn var_sort_key(formulation: &ILPFormulation, var: Variable) -> (usize, usize) {
        formulation
            .assignment_vars
            .get(&var)
            .map_or((usize::MAX, usize::MAX), |captured| {
                (captured.item_idx, captured.category_idx)
            })
    }

    /// Render an Expression to Typst math notation.
    fn render_expression(formulation: &ILPFormulation, expr: &Expression) -> String {
        let mut terms: Vec<(Variable, f64)> = expr.linear_coefficients().collect();

        terms.sort_by_key(|(var, _)| Self::var_sort_key(formulation, *var));

        let mut out = String::new();

        for (var, coeff) in terms {
            if coeff.abs() < f64::EPSILON {
                continue;
            }

            let label = Self::var_label(formulation, var);

            let term = if (coeff.abs() - 1.0).abs() < f64::EPSILON {
                label
            } else {
                format!("{} {label}", Self::render_number(coeff.abs()))
            };

            match (out.is_empty(), coeff < 0.0) {
                (true, true) => out.push_str("- "),
                (true, false) => {}
                (false, true) => out.push_str(" - "),
                (false, false) => out.push_str(" + "),
            }

            out.push_str(&term);
        }

        let constant = expr.constant();

        if constant.abs() >= f64::EPSILON {
            let constant_str = Self::render_number(constant.abs());

            match (out.is_empty(), constant < 0.0) {
                (true, true) => out.push('-'),
                (true, false) => {}
                (false, true) => out.push_str(" - "),
                (false, false) => out.push_str(" + "),
            }

            out.push_str(&constant_str);
        }

        if out.is_empty() {
            out.push('0');
        }

        out
    }

    fn render_variables(formulation: &ILPFormulation, output: &mut String) {
        output.push_str("$ x_(i,j) in {0,1} $: item $i$ is assigned to category $j$\n\n");

        let mut vars: Vec<&AssignmentVariable> = formulation.assignment_vars.values().collect();

        vars.sort_by_key(|captured| (captured.item_idx, captured.category_idx));

        for captured in vars {
            output.push_str(&format!(
                "- $x_({},{})$: value {}\n",
                captured.item_idx + 1,
                captured.category_idx + 1,
                captured.value_minor
            ));
        }
    }

    fn render_constraints(&self, formulation: &ILPFormulation, output: &mut String) {
        output.push_str("=== Exactly-One Constraints\n\n");

        output.push_str("Each item must be assigned to exactly one category:\n\n");

        let mut exactly_one: Vec<_> = formulation.exactly_one_constraints.iter().collect();

        exactly_one.sort_by_key(|(item_idx, _)| **item_idx);

        for (item_idx, expr) in exactly_one {
            output.push_str("$ ");
            output.push_str(&Self::render_expression(formulation, expr));
            output.push_str(" = 1 $ (");
            output.push_str(&self.item_label(*item_idx));
            output.push_str(")\n\n");
        }

        output.push_str("\n=== Coverage Constraints\n\n");

        output.push_str("Each category must receive at least its minimum value:\n\n");

        let mut coverage: Vec<_> = formulation.coverage_constraints.iter().collect();

        coverage.sort_by_key(|(category_idx, _)| **category_idx);

        for (category_idx, (expr, minimum_minor)) in coverage {
            output.push_str("$ ");
            output.push_str(&Self::render_expression(formulation, expr));
            output.push_str(&format!(" >= {minimum_minor} $ ("));
            output.push_str(&self.category_label(*category_idx));
            output.push_str(")\n\n");
        }
    }
}

impl ILPObserver for TypstRenderer {
    fn on_assignment_variable(
        &mut self,
        item_idx: usize,
        category_idx: usize,
        var: Variable,
        value_minor: i64,
    ) {
        let mut formulation = self
            .formulation
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        formulation.assignment_vars.insert(
            var,
            AssignmentVariable {
                item_idx,
                category_idx,
                value_minor,
            },
        );
    }

    fn on_exactly_one_constraint(&mut self, item_idx: usize, constraint_expr: &Expression) {
        let mut formulation = self
            .formulation
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        formulation
            .exactly_one_constraints
            .insert(item_idx, constraint_expr.clone());
    }

    fn on_coverage_constraint(
        &mut self,
        category_idx: usize,
        constraint_expr: &Expression,
        minimum_minor: i64,
    ) {
        let mut formulation = self
            .formulation
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        formulation
            .coverage_constraints
            .insert(category_idx, (constraint_expr.clone(), minimum_minor));
    }
}
