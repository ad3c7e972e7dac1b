//! Team optimizer integration tests: selection bounds, determinism,
//! risk factors, and recommendation ordering.

use resourcing_core::{
    config::EngineConfig,
    model::{Employee, Proficiency, RequirementPriority, SkillRequirement},
    optimizer::{self, RiskKind, RiskSeverity, TeamConstraints, TeamStatus},
};

fn full_availability(_e: &Employee) -> f64 {
    100.0
}

/// Scenario D: an empty candidate pool degrades to an insufficient-data
/// result with a high skill-gap risk and a hiring recommendation.
#[test]
fn empty_pool_returns_insufficient_data() {
    let config = EngineConfig::default_test();
    let requirements = vec![SkillRequirement::new("react", Proficiency::Advanced)];

    let team = optimizer::optimize_team(
        &requirements,
        &[],
        &TeamConstraints::new(3),
        full_availability,
        &config,
    );

    assert_eq!(team.status, TeamStatus::InsufficientData);
    assert_eq!(team.coverage_score, 0.0);
    assert!(team.members.is_empty());
    assert!(team
        .risk_factors
        .iter()
        .any(|r| r.kind == RiskKind::SkillGap && r.severity == RiskSeverity::High));
    assert!(team.recommendations.iter().any(|r| r.contains("hire")));
}

/// An empty requirement list is insufficient data too, never a panic.
#[test]
fn empty_requirements_return_insufficient_data() {
    let config = EngineConfig::default_test();
    let pool = vec![Employee::new("e1", "Avery Cole")];

    let team = optimizer::optimize_team(
        &[],
        &pool,
        &TeamConstraints::new(3),
        full_availability,
        &config,
    );
    assert_eq!(team.status, TeamStatus::InsufficientData);
}

/// The team never exceeds the size cap and coverage never exceeds 100.
#[test]
fn respects_team_size_and_coverage_bounds() {
    let config = EngineConfig::default_test();
    let requirements = vec![
        SkillRequirement::new("react", Proficiency::Intermediate),
        SkillRequirement::new("rust", Proficiency::Intermediate),
        SkillRequirement::new("sql", Proficiency::Intermediate),
    ];
    let pool: Vec<Employee> = (0..6)
        .map(|i| {
            Employee::new(format!("e{i}"), format!("Employee {i}"))
                .with_skill("react", Proficiency::Advanced)
        })
        .collect();

    let team = optimizer::optimize_team(
        &requirements,
        &pool,
        &TeamConstraints::new(2),
        full_availability,
        &config,
    );

    assert!(team.members.len() <= 2);
    assert!(team.coverage_score <= 100.0);
}

/// Ranking ties break by hourly rate ascending, then id, reproducibly.
#[test]
fn tie_breaks_are_deterministic() {
    let config = EngineConfig::default_test();
    let requirements = vec![SkillRequirement::new("react", Proficiency::Intermediate)];
    let pool = vec![
        Employee::new("e-expensive", "Costly")
            .with_skill("react", Proficiency::Advanced)
            .with_rate(150.0),
        Employee::new("e-cheap", "Frugal")
            .with_skill("react", Proficiency::Advanced)
            .with_rate(80.0),
    ];

    for _ in 0..3 {
        let team = optimizer::optimize_team(
            &requirements,
            &pool,
            &TeamConstraints::new(1),
            full_availability,
            &config,
        );
        assert_eq!(team.members.len(), 1);
        assert_eq!(team.members[0].employee_id, "e-cheap");
    }
}

/// Selection stops once everything is covered; redundant candidates are
/// not added even with slots to spare.
#[test]
fn stops_once_requirements_are_covered() {
    let config = EngineConfig::default_test();
    let requirements = vec![SkillRequirement::new("react", Proficiency::Intermediate)];
    let pool = vec![
        Employee::new("e1", "A").with_skill("react", Proficiency::Expert),
        Employee::new("e2", "B").with_skill("react", Proficiency::Expert),
        Employee::new("e3", "C").with_skill("react", Proficiency::Expert),
    ];

    let team = optimizer::optimize_team(
        &requirements,
        &pool,
        &TeamConstraints::new(3),
        full_availability,
        &config,
    );

    assert_eq!(team.members.len(), 1);
    assert_eq!(team.coverage_score, 100.0);
    assert!(team.risk_factors.is_empty());
}

/// Estimated cost near the budget ceiling raises a high cost risk.
#[test]
fn budget_pressure_raises_cost_risk() {
    let config = EngineConfig::default_test();
    let requirements = vec![SkillRequirement::new("rust", Proficiency::Intermediate)
        .with_estimated_hours(100.0)];
    let pool = vec![Employee::new("e1", "Avery Cole")
        .with_skill("rust", Proficiency::Advanced)
        .with_rate(100.0)];

    // 100h × 100/h = 10_000, over 90% of the 10_500 ceiling.
    let team = optimizer::optimize_team(
        &requirements,
        &pool,
        &TeamConstraints::new(1).with_budget(10_500.0),
        full_availability,
        &config,
    );

    assert!((team.estimated_cost - 10_000.0).abs() < 1e-9);
    assert!(team
        .risk_factors
        .iter()
        .any(|r| r.kind == RiskKind::Cost && r.severity == RiskSeverity::High));

    // A comfortable ceiling raises no cost risk.
    let team = optimizer::optimize_team(
        &requirements,
        &pool,
        &TeamConstraints::new(1).with_budget(20_000.0),
        full_availability,
        &config,
    );
    assert!(!team.risk_factors.iter().any(|r| r.kind == RiskKind::Cost));
}

/// Uncovered skills flag a skill-gap risk and hiring comes before training
/// in the recommendation order.
#[test]
fn hiring_recommendations_precede_training() {
    let config = EngineConfig::default_test();
    let requirements = vec![
        // Nobody holds kubernetes at all: a hiring case.
        SkillRequirement::new("kubernetes", Proficiency::Advanced)
            .with_priority(RequirementPriority::Critical),
        // The pool holds go below level: a training case.
        SkillRequirement::new("go", Proficiency::Expert),
        SkillRequirement::new("react", Proficiency::Intermediate),
    ];
    let pool = vec![Employee::new("e1", "Avery Cole")
        .with_skill("react", Proficiency::Advanced)
        .with_skill("go", Proficiency::Intermediate)];

    let team = optimizer::optimize_team(
        &requirements,
        &pool,
        &TeamConstraints::new(2),
        full_availability,
        &config,
    );

    assert!(team.missing_skills.contains(&"kubernetes".to_string()));
    assert!(team
        .risk_factors
        .iter()
        .any(|r| r.kind == RiskKind::SkillGap));

    let hire_pos = team
        .recommendations
        .iter()
        .position(|r| r.contains("kubernetes"))
        .expect("hiring recommendation present");
    let train_pos = team
        .recommendations
        .iter()
        .position(|r| r.contains("Train up 'go'"))
        .expect("training recommendation present");
    assert!(hire_pos < train_pos, "hiring must precede training");
}

/// Low candidate availability surfaces a medium availability risk.
#[test]
fn low_availability_raises_medium_risk() {
    let config = EngineConfig::default_test();
    let requirements = vec![SkillRequirement::new("react", Proficiency::Intermediate)];
    let pool = vec![Employee::new("e1", "Avery Cole").with_skill("react", Proficiency::Advanced)];

    let team = optimizer::optimize_team(
        &requirements,
        &pool,
        &TeamConstraints::new(1),
        |_| 40.0,
        &config,
    );

    assert!((team.availability_score - 40.0).abs() < 1e-9);
    assert!(team
        .risk_factors
        .iter()
        .any(|r| r.kind == RiskKind::Availability && r.severity == RiskSeverity::Medium));
    assert!(team
        .recommendations
        .iter()
        .any(|r| r.contains("reschedule") || r.contains("allocations")));
}
