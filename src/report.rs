//! Validation Report
//!
//! Renders a [`ValidationReport`] as a table, one row per category.

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::MoneyError;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{pricing::TotalValueError, validation::ValidationReport};

/// Errors that can occur when writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Error summing the assigned totals.
    #[error(transparent)]
    TotalValue(#[from] TotalValueError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Write the report as a table followed by a one-line summary.
///
/// # Errors
///
/// Returns a [`ReportError`] if an amount cannot be computed or the output cannot
/// be written.
pub fn write_to(
    out: &mut impl io::Write,
    report: &ValidationReport<'_>,
) -> Result<(), ReportError> {
    let mut builder = Builder::default();
    let mut status_colors: Vec<(usize, Color)> = Vec::with_capacity(report.categories().len());

    builder.push_record([
        "#", "Category", "Items", "Minimum", "Assigned", "Surplus", "Coverage", "Covered",
    ]);

    for (row_idx, coverage) in report.categories().iter().enumerate() {
        let percent_points =
            percent_points_from_fractional_percentage(coverage.coverage_percent());

        builder.push_record([
            format!("#{:<3}", row_idx + 1),
            coverage.name.clone(),
            coverage.item_count.to_string(),
            format!("{}", coverage.minimum),
            format!("{}", coverage.assigned_total),
            format!("{}", coverage.surplus()?),
            format!("{percent_points:.2}%"),
            if coverage.is_covered() { "yes" } else { "no" }.to_string(),
        ]);

        let color = if coverage.is_covered() {
            Color::FG_GREEN
        } else {
            Color::FG_RED
        };

        // Header is row 0.
        status_colors.push((row_idx + 1, color));
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..7), Alignment::right());

    for (row, color) in status_colors {
        table.modify((row, 7), color);
    }

    writeln!(out, "\n{table}").map_err(|_err| ReportError::IO)?;

    write_summary(out, report)
}

fn write_summary(
    out: &mut impl io::Write,
    report: &ValidationReport<'_>,
) -> Result<(), ReportError> {
    let covered = report
        .categories()
        .iter()
        .filter(|coverage| coverage.is_covered())
        .count();

    writeln!(
        out,
        " Covered: {covered}/{}  Assigned: {}",
        report.categories().len(),
        report.assigned_total()?
    )
    .map_err(|_err| ReportError::IO)?;

    if !report.unassigned().is_empty() {
        writeln!(out, " Unassigned: {}", report.unassigned().join(", "))
            .map_err(|_err| ReportError::IO)?;
    }

    writeln!(out).map_err(|_err| ReportError::IO)
}

/// Converts a fractional percentage to percent points for display.
fn percent_points_from_fractional_percentage(percentage: Percentage) -> Decimal {
    ((percentage * Decimal::ONE) * Decimal::from_i64(100).unwrap_or(Decimal::ZERO)).round_dp(2)
}
