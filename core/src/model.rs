//! Domain records consumed by the engine.
//!
//! All records arrive already validated at the persistence boundary except
//! where a `validate()` is provided; the engine calls those before any
//! computation and rejects malformed input with the offending field named.
//! Records are immutable during a single engine invocation.

use crate::{
    config::EngineConfig,
    error::{EngineError, EngineResult},
    types::{EmployeeId, ProjectId, SkillId},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Skills ───────────────────────────────────────────────────────────────────

/// Ordered skill-strength rating. Weights 1–4 are used for gap arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Proficiency {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Proficiency {
    pub fn weight(&self) -> u8 {
        match self {
            Self::Beginner => 1,
            Self::Intermediate => 2,
            Self::Advanced => 3,
            Self::Expert => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }
}

/// Requirement priority. Weights 4–1: failing a critical requirement
/// depresses a coverage score more than failing a low one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementPriority {
    Critical,
    High,
    Medium,
    Low,
}

impl RequirementPriority {
    pub fn weight(&self) -> u8 {
        match self {
            Self::Critical => 4,
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Catalog metadata for a skill. Display only; scoring operates on ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillInfo {
    pub id: SkillId,
    pub name: String,
    pub category: String,
}

/// One skill an employee holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillHolding {
    pub proficiency: Proficiency,
    pub years_experience: f64,
    pub certified: bool,
}

/// One role/skill requirement in a project's requirement list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub skill_id: SkillId,
    pub min_proficiency: Proficiency,
    pub mandatory: bool,
    pub priority: RequirementPriority,
    pub estimated_hours: f64,
}

impl SkillRequirement {
    pub fn new(skill_id: impl Into<SkillId>, min_proficiency: Proficiency) -> Self {
        Self {
            skill_id: skill_id.into(),
            min_proficiency,
            mandatory: true,
            priority: RequirementPriority::Medium,
            estimated_hours: 0.0,
        }
    }

    pub fn optional(mut self) -> Self {
        self.mandatory = false;
        self
    }

    pub fn with_priority(mut self, priority: RequirementPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = hours;
        self
    }
}

// ── Employees ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    /// Maximum committable effort per week, in hours.
    pub weekly_capacity_hours: f64,
    pub skills: HashMap<SkillId, SkillHolding>,
    pub hourly_rate: f64,
    pub department: String,
}

impl Employee {
    pub fn new(id: impl Into<EmployeeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            weekly_capacity_hours: 40.0,
            skills: HashMap::new(),
            hourly_rate: 0.0,
            department: String::new(),
        }
    }

    pub fn with_capacity(mut self, hours: f64) -> Self {
        self.weekly_capacity_hours = hours;
        self
    }

    pub fn with_rate(mut self, hourly_rate: f64) -> Self {
        self.hourly_rate = hourly_rate;
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    pub fn with_skill(mut self, skill_id: impl Into<SkillId>, proficiency: Proficiency) -> Self {
        self.skills.insert(
            skill_id.into(),
            SkillHolding {
                proficiency,
                years_experience: 0.0,
                certified: false,
            },
        );
        self
    }

    /// Proficiency held for a skill, if any.
    pub fn proficiency(&self, skill_id: &str) -> Option<Proficiency> {
        self.skills.get(skill_id).map(|s| s.proficiency)
    }

    /// Capacity with the configured default applied when the record has none.
    pub fn capacity_or_default(&self, config: &EngineConfig) -> f64 {
        if self.weekly_capacity_hours > 0.0 {
            self.weekly_capacity_hours
        } else {
            config.default_weekly_capacity_hours
        }
    }
}

// ── Allocations ──────────────────────────────────────────────────────────────

/// Effort of an allocation, resolved to hours/week at query time so
/// capacity changes retroactively affect reported utilization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum Effort {
    PercentOfCapacity(f64),
    HoursPerWeek(f64),
}

impl Effort {
    /// Hours per week against the given weekly capacity.
    pub fn hours_per_week(&self, weekly_capacity_hours: f64) -> f64 {
        match self {
            Self::PercentOfCapacity(pct) => weekly_capacity_hours * pct / 100.0,
            Self::HoursPerWeek(hours) => *hours,
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        match self {
            Self::PercentOfCapacity(pct) if *pct <= 0.0 || *pct > 200.0 => Err(
                EngineError::validation("effort", format!("percent {pct} outside (0, 200]")),
            ),
            Self::HoursPerWeek(hours) if *hours <= 0.0 => Err(EngineError::validation(
                "effort",
                format!("hours/week {hours} must be positive"),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    Active,
    Planned,
    Completed,
    Cancelled,
}

impl AllocationStatus {
    /// Whether allocations in this status participate in capacity accounting.
    pub fn counts_against_capacity(&self, config: &EngineConfig) -> bool {
        match self {
            Self::Active => true,
            Self::Planned => config.count_planned_allocations,
            Self::Completed | Self::Cancelled => false,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Planned => "planned",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "planned" => Some(Self::Planned),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// A commitment of one employee to one project over a closed date interval.
///
/// Never deleted: cancellation is a status transition, and every transition
/// lands in the allocation log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allocation {
    pub id: String,
    pub employee_id: EmployeeId,
    pub project_id: ProjectId,
    pub start: NaiveDate,
    /// `None` means open-ended; the ledger bounds it by the configured horizon.
    pub end: Option<NaiveDate>,
    pub effort: Effort,
    pub status: AllocationStatus,
}

impl Allocation {
    pub fn new(
        employee_id: impl Into<EmployeeId>,
        project_id: impl Into<ProjectId>,
        start: NaiveDate,
        end: Option<NaiveDate>,
        effort: Effort,
    ) -> Self {
        Self {
            id: String::new(),
            employee_id: employee_id.into(),
            project_id: project_id.into(),
            start,
            end,
            effort,
            status: AllocationStatus::Active,
        }
    }

    pub fn with_status(mut self, status: AllocationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.employee_id.trim().is_empty() {
            return Err(EngineError::validation("employee_id", "must not be blank"));
        }
        if self.project_id.trim().is_empty() {
            return Err(EngineError::validation("project_id", "must not be blank"));
        }
        if let Some(end) = self.end {
            if end < self.start {
                return Err(EngineError::validation(
                    "end",
                    format!("end date {end} before start date {}", self.start),
                ));
            }
        }
        self.effort.validate()
    }
}

// ── Date ranges and weekly buckets ───────────────────────────────────────────

/// A closed date interval [start, end].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.end < self.start {
            return Err(EngineError::validation(
                "date_range",
                format!("end {} before start {}", self.end, self.start),
            ));
        }
        Ok(())
    }

    pub fn intersects(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Allocated hours for one employee in one calendar week. Derived on every
/// query, never cached across requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyBucket {
    pub week_start: NaiveDate,
    pub allocated_hours: f64,
    pub capacity_hours: f64,
    pub utilization_pct: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn proficiency_ordering_matches_weights() {
        assert!(Proficiency::Beginner < Proficiency::Expert);
        assert_eq!(Proficiency::Advanced.weight(), 3);
        assert_eq!(RequirementPriority::Critical.weight(), 4);
        assert_eq!(RequirementPriority::Low.weight(), 1);
    }

    #[test]
    fn effort_resolves_against_capacity_at_query_time() {
        let half = Effort::PercentOfCapacity(50.0);
        assert!((half.hours_per_week(40.0) - 20.0).abs() < 1e-9);
        // Capacity change retroactively changes the resolved hours.
        assert!((half.hours_per_week(32.0) - 16.0).abs() < 1e-9);
        assert!((Effort::HoursPerWeek(10.0).hours_per_week(32.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn allocation_rejects_inverted_interval() {
        let a = Allocation::new(
            "e1",
            "p1",
            d("2024-01-15"),
            Some(d("2024-01-10")),
            Effort::HoursPerWeek(10.0),
        );
        let err = a.validate().unwrap_err();
        assert!(err.to_string().contains("end"), "unexpected error: {err}");
    }

    #[test]
    fn allocation_rejects_negative_hours() {
        let a = Allocation::new(
            "e1",
            "p1",
            d("2024-01-15"),
            None,
            Effort::HoursPerWeek(-4.0),
        );
        assert!(a.validate().is_err());
    }

    #[test]
    fn date_range_intersection_is_inclusive() {
        let a = DateRange::new(d("2024-01-01"), d("2024-01-07"));
        let b = DateRange::new(d("2024-01-07"), d("2024-01-14"));
        let c = DateRange::new(d("2024-01-08"), d("2024-01-14"));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }
}
