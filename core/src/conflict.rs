//! Conflict detector — classifies a proposed allocation against capacity.
//!
//! Over-allocation is a business condition, not a failure: `evaluate`
//! always returns a result, and callers decide whether to block on it.
//! Strict enforcement lives in the orchestrator, which turns anything
//! above `Severity::None` into an error.

use crate::{
    config::{EngineConfig, SeverityThresholds},
    ledger,
    model::{Allocation, Employee},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Escalation tiers for a capacity conflict, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    None,
    Warning,
    Danger,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Critical => "critical",
        }
    }
}

/// Map a utilization percentage to a severity tier.
///
/// Standalone pure function: summary and alerting views reuse it without
/// building a full conflict evaluation.
pub fn classify_severity(utilization_pct: f64, thresholds: &SeverityThresholds) -> Severity {
    if utilization_pct <= thresholds.warning_pct {
        Severity::None
    } else if utilization_pct <= thresholds.danger_pct {
        Severity::Warning
    } else if utilization_pct <= thresholds.critical_pct {
        Severity::Danger
    } else {
        Severity::Critical
    }
}

/// Load breakdown for one week touched by a proposed allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekLoad {
    pub week_start: NaiveDate,
    pub existing_hours: f64,
    pub proposed_hours: f64,
    pub capacity_hours: f64,
    pub utilization_pct: f64,
    pub severity: Severity,
}

/// Outcome of checking one proposed allocation against existing load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictResult {
    /// Worst severity across all touched weeks.
    pub severity: Severity,
    /// Hours over capacity in the worst week (0 when within capacity).
    pub overage_hours: f64,
    /// Utilization percentage of the worst week.
    pub max_utilization_pct: f64,
    /// Per-week breakdown, in week order.
    pub weeks: Vec<WeekLoad>,
    /// Existing allocations that load any over-capacity week.
    pub contributing: Vec<Allocation>,
    /// Human-readable explanations, one per over-capacity week.
    pub messages: Vec<String>,
}

impl ConflictResult {
    /// The first week at which the proposal pushes past capacity, if any.
    pub fn first_conflict(&self) -> Option<&WeekLoad> {
        self.weeks.iter().find(|w| w.severity > Severity::None)
    }

    pub fn is_over_capacity(&self) -> bool {
        self.severity > Severity::None
    }
}

/// Evaluate a proposed allocation against an employee's existing allocations.
///
/// For every week the proposal touches, compares existing + proposed load
/// against capacity and classifies the worst outcome. Pure function of its
/// inputs; never fails.
pub fn evaluate(
    employee: &Employee,
    proposed: &Allocation,
    existing: &[Allocation],
    config: &EngineConfig,
) -> ConflictResult {
    let capacity = employee.capacity_or_default(config);
    let mut weeks = Vec::new();
    let mut worst: Option<&WeekLoad> = None;

    for week_start in ledger::weeks_touching_allocation(proposed, config) {
        let existing_hours = ledger::weekly_load(employee, existing, week_start, config);
        let proposed_hours =
            ledger::allocation_weekly_hours(employee, proposed, week_start, config);
        let total = existing_hours + proposed_hours;
        let utilization_pct = if capacity > 0.0 {
            total / capacity * 100.0
        } else {
            0.0
        };
        weeks.push(WeekLoad {
            week_start,
            existing_hours,
            proposed_hours,
            capacity_hours: capacity,
            utilization_pct,
            severity: classify_severity(utilization_pct, &config.severity),
        });
    }

    for week in &weeks {
        if worst.is_none_or(|w| week.utilization_pct > w.utilization_pct) {
            worst = Some(week);
        }
    }

    let severity = weeks
        .iter()
        .map(|w| w.severity)
        .max()
        .unwrap_or(Severity::None);
    let (overage_hours, max_utilization_pct) = worst
        .map(|w| {
            (
                (w.existing_hours + w.proposed_hours - w.capacity_hours).max(0.0),
                w.utilization_pct,
            )
        })
        .unwrap_or((0.0, 0.0));

    let over_weeks: Vec<NaiveDate> = weeks
        .iter()
        .filter(|w| w.severity > Severity::None)
        .map(|w| w.week_start)
        .collect();

    // Existing allocations loading any over-capacity week.
    let mut contributing: Vec<Allocation> = Vec::new();
    for alloc in existing {
        let loads_conflict = over_weeks
            .iter()
            .any(|&ws| ledger::allocation_weekly_hours(employee, alloc, ws, config) > 0.0);
        if loads_conflict {
            contributing.push(alloc.clone());
        }
    }

    let mut messages = Vec::new();
    for week in weeks.iter().filter(|w| w.severity > Severity::None) {
        let mut projects: Vec<&str> = contributing
            .iter()
            .filter(|a| {
                ledger::allocation_weekly_hours(employee, a, week.week_start, config) > 0.0
            })
            .map(|a| a.project_id.as_str())
            .chain(std::iter::once(proposed.project_id.as_str()))
            .collect();
        projects.sort_unstable();
        projects.dedup();
        let over = (week.existing_hours + week.proposed_hours - week.capacity_hours).max(0.0);
        messages.push(format!(
            "Week of {}: {:.1}h allocated against {:.0}h capacity ({:.0}%), {:.1}h over; projects: {}",
            week.week_start,
            week.existing_hours + week.proposed_hours,
            week.capacity_hours,
            week.utilization_pct,
            over,
            projects.join(", "),
        ));
    }

    ConflictResult {
        severity,
        overage_hours,
        max_utilization_pct,
        weeks,
        contributing,
        messages,
    }
}
