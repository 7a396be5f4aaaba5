//! Collate
//!
//! Loads a fixture set, assigns every item to a category so each category meets
//! its minimum, prints the coverage table, and optionally writes the assignment
//! as JSON.
//!
//! Use `-s` to load a fixture set by name
//! Use `-o` to write the assignment JSON
//! Use `--formulation` to write the ILP formulation as a Typst document

use std::{io, io::Write, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use tracing::info;

use collate::{
    allocation::{allocate, allocate_with_observer},
    cli::{CliArgs, init_logging},
    fixtures::Fixture,
    records::{AssignmentRecord, RecordShape},
    report,
    solvers::ilp::renderers::typst::TypstRenderer,
    validation::validate,
};

#[expect(clippy::print_stdout, reason = "Command line output to user")]
fn main() -> Result<()> {
    let args = CliArgs::parse();

    init_logging(&args.logging)?;

    let fixture = Fixture::from_set_in(&args.fixtures, &args.set)
        .with_context(|| format!("loading fixture set {:?}", args.set))?;

    let items = fixture.items()?;
    let categories = fixture.categories()?;

    info!(
        set = args.set.as_str(),
        items = items.len(),
        categories = categories.len(),
        "loaded fixture set"
    );

    let start = Instant::now();

    let allocation = if let Some(path) = args.formulation.as_deref() {
        let mut renderer = TypstRenderer::new_with_labels(path.to_path_buf(), &items, &categories);

        let allocation = allocate_with_observer(&items, &categories, &mut renderer);

        // Written even when solving fails; the formulation is most useful then.
        renderer.write()?;

        println!(
            "\nILP formulation written to: {}",
            renderer.output_path().display()
        );

        allocation?
    } else {
        allocate(&items, &categories)?
    };

    let elapsed = start.elapsed();

    let validation = validate(&allocation.assignment, &items, &categories)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    report::write_to(&mut handle, &validation)?;

    writeln!(
        handle,
        " {} ({}s)",
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    )?;

    if let Some(out) = args.out.as_deref() {
        let shape = if args.ids_only {
            RecordShape::IdsOnly
        } else {
            RecordShape::WithValues
        };

        AssignmentRecord::from_assignment(&allocation.assignment, &items, &categories, shape)?
            .write_to(out)
            .with_context(|| format!("writing assignment to {}", out.display()))?;

        writeln!(handle, " Assignment written to: {}", out.display())?;
    }

    anyhow::ensure!(validation.is_valid(), "assignment does not cover every category");

    Ok(())
}
