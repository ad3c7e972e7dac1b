//! End-to-end orchestrator tests against the in-memory SQLite provider:
//! validate, commit, strict rejection, cancellation, and utilization.

use chrono::NaiveDate;
use resourcing_core::{
    config::EngineConfig,
    conflict::Severity,
    engine::AllocationEngine,
    error::EngineError,
    model::{Allocation, DateRange, Effort, Employee, Proficiency, SkillRequirement},
    store::{AllocationStore, SqliteStore},
};

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn engine_with_fixture() -> AllocationEngine<SqliteStore> {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = SqliteStore::in_memory().unwrap();
    store.migrate().unwrap();

    let employee = Employee::new("emp-1", "Avery Cole")
        .with_capacity(40.0)
        .with_rate(95.0)
        .with_skill("react", Proficiency::Advanced)
        .with_skill("sql", Proficiency::Intermediate);
    store.insert_employee(&employee).unwrap();

    // 32h/week on project atlas through Q1 2024.
    let mut existing = Allocation::new(
        "emp-1",
        "atlas",
        d("2024-01-01"),
        Some(d("2024-03-31")),
        Effort::HoursPerWeek(32.0),
    );
    existing.id = "alloc-existing".into();
    store.upsert_allocation(&existing).unwrap();

    AllocationEngine::new(EngineConfig::default_test(), store)
}

fn week_range() -> DateRange {
    DateRange::new(d("2024-01-15"), d("2024-01-19"))
}

/// A committed no-conflict allocation re-evaluates to none against the
/// same snapshot: the pure computation is idempotent.
#[test]
fn committed_allocation_revalidates_clean() {
    let engine = engine_with_fixture();

    let alloc = Allocation::new(
        "emp-1",
        "borealis",
        d("2024-01-15"),
        Some(d("2024-01-19")),
        Effort::HoursPerWeek(6.0),
    );
    let (committed, result) = engine.commit_assignment(alloc, false).unwrap();
    assert_eq!(result.severity, Severity::None);
    assert!(!committed.id.is_empty(), "orchestrator mints an id");

    // Re-evaluating the persisted allocation (an update of itself)
    // excludes its own load and stays clean.
    let again = engine
        .provider()
        .get_allocation(&committed.id)
        .unwrap()
        .unwrap();
    let (_, result) = engine.commit_assignment(again, true).unwrap();
    assert_eq!(result.severity, Severity::None);
}

/// Scenario A through the facade: 32h + 10h on a 40h week → warning,
/// but the permissive commit still succeeds.
#[test]
fn permissive_commit_records_over_allocation() {
    let engine = engine_with_fixture();

    let alloc = Allocation::new(
        "emp-1",
        "borealis",
        d("2024-01-15"),
        Some(d("2024-01-19")),
        Effort::HoursPerWeek(10.0),
    );
    let (committed, result) = engine.commit_assignment(alloc, false).unwrap();

    assert_eq!(result.severity, Severity::Warning);
    assert!((result.overage_hours - 2.0).abs() < 1e-9);
    assert!(engine
        .provider()
        .get_allocation(&committed.id)
        .unwrap()
        .is_some());
}

/// Scenario B: strict validation rejects 130% naming the week and the
/// utilization, and writes nothing.
#[test]
fn strict_commit_rejects_and_names_the_week() {
    let engine = engine_with_fixture();

    let err = engine
        .validate_assignment_strict("emp-1", week_range(), Effort::HoursPerWeek(20.0))
        .unwrap_err();
    match err {
        EngineError::CapacityExceeded {
            employee_id,
            week,
            utilization_pct,
        } => {
            assert_eq!(employee_id, "emp-1");
            assert_eq!(week, d("2024-01-15"));
            assert!((utilization_pct - 130.0).abs() < 1e-9);
        }
        other => panic!("expected CapacityExceeded, got {other}"),
    }

    let alloc = Allocation::new(
        "emp-1",
        "borealis",
        d("2024-01-15"),
        Some(d("2024-01-19")),
        Effort::HoursPerWeek(20.0),
    );
    assert!(engine.commit_assignment(alloc, true).is_err());
}

/// Cancellation is a status transition that frees the capacity.
#[test]
fn cancel_frees_capacity() {
    let engine = engine_with_fixture();

    let before = engine
        .validate_assignment("emp-1", week_range(), Effort::HoursPerWeek(10.0))
        .unwrap();
    assert_eq!(before.severity, Severity::Warning);

    let cancelled = engine.cancel_allocation("alloc-existing").unwrap();
    assert_eq!(
        cancelled.status,
        resourcing_core::model::AllocationStatus::Cancelled
    );

    let after = engine
        .validate_assignment("emp-1", week_range(), Effort::HoursPerWeek(10.0))
        .unwrap();
    assert_eq!(after.severity, Severity::None);
}

/// Unknown employees are rejected before any computation.
#[test]
fn unknown_employee_is_an_error() {
    let engine = engine_with_fixture();
    let err = engine
        .validate_assignment("nobody", week_range(), Effort::HoursPerWeek(5.0))
        .unwrap_err();
    assert!(matches!(err, EngineError::UnknownEmployee { .. }));
}

/// Malformed input names the offending field.
#[test]
fn inverted_range_names_the_field() {
    let engine = engine_with_fixture();
    let err = engine
        .validate_assignment(
            "emp-1",
            DateRange::new(d("2024-02-01"), d("2024-01-01")),
            Effort::HoursPerWeek(5.0),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Validation {
            field: "date_range",
            ..
        }
    ));
}

/// Utilization buckets reflect the persisted allocations.
#[test]
fn utilization_buckets_report_the_ledger() {
    let engine = engine_with_fixture();

    let buckets = engine
        .get_utilization("emp-1", DateRange::new(d("2024-01-15"), d("2024-01-28")))
        .unwrap();
    assert_eq!(buckets.len(), 2);
    for bucket in &buckets {
        assert!((bucket.allocated_hours - 32.0).abs() < 1e-9);
        assert!((bucket.utilization_pct - 80.0).abs() < 1e-9);
    }
}

/// Matching pulls the directory and ranks best-first.
#[test]
fn matching_ranks_candidates() {
    let engine = engine_with_fixture();
    let second = Employee::new("emp-2", "Blake Reyes")
        .with_capacity(40.0)
        .with_skill("react", Proficiency::Beginner);
    engine.provider().insert_employee(&second).unwrap();

    let requirements = vec![SkillRequirement::new("react", Proficiency::Advanced)];
    let results = engine
        .match_employees_to_requirements(&requirements, None, None)
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].employee_id, "emp-1");
    assert!(results[0].overall_score > results[1].overall_score);
}

/// The optimization window feeds ledger availability into the result.
#[test]
fn optimization_window_lowers_availability() {
    let engine = engine_with_fixture();

    let requirements = vec![SkillRequirement::new("react", Proficiency::Advanced)];
    let constraints = resourcing_core::optimizer::TeamConstraints::new(1)
        .with_window(DateRange::new(d("2024-01-15"), d("2024-01-28")));

    let team = engine.optimize_team(&requirements, &constraints).unwrap();
    assert_eq!(team.members.len(), 1);
    // 32 of 40 hours committed: 20% free.
    assert!((team.availability_score - 20.0).abs() < 1e-9);
}
