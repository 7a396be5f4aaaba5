//! Integration tests for the allocation pipeline on small hand-built inputs.
//!
//! Every feasible run is checked for the two output invariants: the category
//! lists partition the item set, and each category's assigned total meets its
//! minimum.

use rusty_money::{Money, iso::USD};
use testresult::TestResult;

use collate::prelude::*;

fn items(values: &[(&str, i64)]) -> Result<ItemPool<'static>, ItemPoolError> {
    ItemPool::new(
        values
            .iter()
            .map(|(id, value)| Item::new(*id, Money::from_minor(*value, USD)))
            .collect::<Vec<_>>(),
        USD,
    )
}

fn categories(minimums: &[(&str, i64)]) -> Result<CategorySet<'static>, CategoryError> {
    CategorySet::new(
        minimums
            .iter()
            .map(|(name, minimum)| Category::new(*name, Money::from_minor(*minimum, USD)))
            .collect::<Vec<_>>(),
        USD,
    )
}

fn assert_valid(
    assignment: &Assignment,
    items: &ItemPool<'_>,
    categories: &CategorySet<'_>,
) -> TestResult {
    let report = validate(assignment, items, categories)?;

    assert!(report.is_valid(), "assignment should cover every category");
    assert_eq!(
        assignment.assigned_count(),
        items.len(),
        "every item should be placed"
    );

    let mut placed: Vec<usize> = assignment
        .iter()
        .flat_map(|(_, item_indexes)| item_indexes.iter().copied())
        .collect();
    placed.sort_unstable();
    placed.dedup();

    assert_eq!(placed.len(), items.len(), "no item should be placed twice");

    assert_eq!(
        report.assigned_total()?,
        items.total_value()?,
        "assigned value should equal total item value"
    );

    Ok(())
}

#[test]
fn one_category_takes_both_items() -> TestResult {
    let items = items(&[("A", 60), ("B", 40)])?;
    let categories = categories(&[("X", 50)])?;

    let allocation = allocate(&items, &categories)?;

    let resolved = allocation.assignment.resolve(&items, &categories)?;
    let (category, assigned) = resolved.first().ok_or("expected one category")?;
    let ids: Vec<&str> = assigned.iter().map(|item| item.id()).collect();

    assert_eq!(category.name(), "X");
    assert_eq!(ids, vec!["A", "B"]);
    assert_eq!(allocation.status(), AllocationStatus::Feasible);

    assert_valid(&allocation.assignment, &items, &categories)
}

#[test]
fn insufficient_value_fails_precondition() -> TestResult {
    let items = items(&[("A", 10)])?;
    let categories = categories(&[("X", 50)])?;

    let err = allocate(&items, &categories).err().ok_or("expected an error")?;

    assert_eq!(err.status(), Some(AllocationStatus::PreconditionFailed));
    assert!(
        err.to_string().contains("less than total category minimum"),
        "unexpected message: {err}"
    );

    Ok(())
}

#[test]
fn exact_total_without_valid_split_is_solver_infeasible() -> TestResult {
    let items = items(&[("A", 30), ("B", 30)])?;
    let categories = categories(&[("X", 40), ("Y", 20)])?;

    // The aggregate check passes: 60 >= 60.
    let summary = collate::feasibility::check(&items, &categories)?;
    assert_eq!(summary.surplus.to_minor_units(), 0);

    for _ in 0..3 {
        let err = allocate(&items, &categories).err().ok_or("expected an error")?;

        assert_eq!(err.status(), Some(AllocationStatus::SolverInfeasible));
    }

    Ok(())
}

#[test]
fn exact_total_with_valid_split_is_feasible() -> TestResult {
    let items = items(&[("A", 40), ("B", 20)])?;
    let categories = categories(&[("X", 40), ("Y", 20)])?;

    let allocation = allocate(&items, &categories)?;

    assert_eq!(allocation.assignment.items_in(0), &[0]);
    assert_eq!(allocation.assignment.items_in(1), &[1]);

    assert_valid(&allocation.assignment, &items, &categories)
}

#[test]
fn many_items_across_many_categories() -> TestResult {
    let items = items(&[
        ("912828YK0", 1_250_000),
        ("912828ZT0", 980_000),
        ("912810RZ3", 760_500),
        ("9128284V9", 540_000),
        ("912828X88", 415_250),
        ("912810SF6", 390_000),
        ("91282CAE1", 210_000),
        ("91282CBL4", 125_000),
        ("91282CCB5", 99_999),
        ("91282CDH2", 45_000),
    ])?;
    let categories = categories(&[
        ("Acme Corp", 1_200_000),
        ("Globex", 1_000_000),
        ("Initech", 800_000),
        ("Umbrella", 500_000),
        ("Hooli", 0),
    ])?;

    let allocation = allocate(&items, &categories)?;

    assert_valid(&allocation.assignment, &items, &categories)
}

#[test]
fn zero_minimum_categories_accept_no_items() -> TestResult {
    let categories = categories(&[("X", 0), ("Y", 0)])?;

    let allocation = allocate(&ItemPool::empty(USD), &categories)?;

    assert_eq!(allocation.assignment.category_count(), 2);
    assert!(allocation.assignment.items_in(0).is_empty());
    assert!(allocation.assignment.items_in(1).is_empty());

    Ok(())
}

#[test]
fn duplicate_category_names_are_rejected() {
    let result = categories(&[("X", 10), ("X", 20)]);

    assert!(
        matches!(result, Err(CategoryError::DuplicateCategoryName(name)) if name == "X"),
        "duplicate names should be rejected"
    );
}

#[test]
fn records_reflect_the_solved_assignment() -> TestResult {
    let items = items(&[("A", 6_000), ("B", 4_000)])?;
    let categories = categories(&[("X", 5_000)])?;

    let allocation = allocate(&items, &categories)?;

    let record = AssignmentRecord::from_assignment(
        &allocation.assignment,
        &items,
        &categories,
        RecordShape::IdsOnly,
    )?;

    assert_eq!(
        record.items_for("X"),
        Some(
            [
                ItemRecord::Id("A".to_string()),
                ItemRecord::Id("B".to_string())
            ]
            .as_slice()
        )
    );
    assert!(record.unassigned().is_empty());

    Ok(())
}
