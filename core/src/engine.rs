//! The allocation orchestrator — the engine's facade.
//!
//! RULES:
//!   - Input is validated before any computation; malformed input is the
//!     only fatal condition.
//!   - Over-allocation is data, not an error: permissive calls return the
//!     conflict result and still commit. Strict calls reject anything
//!     above `Severity::None`.
//!   - Every read is a pure function over a snapshot pulled from the
//!     providers; the only write is the allocation upsert, performed
//!     after the conflict check.
//!   - The provider serializes check + write per employee (see store).

use crate::{
    conflict::{self, ConflictResult, Severity},
    config::EngineConfig,
    error::{EngineError, EngineResult},
    ledger,
    matcher::{self, MatchResult},
    model::{Allocation, DateRange, Effort, Employee, SkillRequirement, WeeklyBucket},
    optimizer::{self, TeamConstraints, TeamMatch},
    store::{AllocationStore, EmployeeDirectory},
    types::EmployeeId,
};

pub struct AllocationEngine<P> {
    config: EngineConfig,
    provider: P,
}

impl<P> AllocationEngine<P>
where
    P: EmployeeDirectory + AllocationStore,
{
    pub fn new(config: EngineConfig, provider: P) -> Self {
        Self { config, provider }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn require_employee(&self, id: &str) -> EngineResult<Employee> {
        self.provider
            .get_employee(id)?
            .ok_or_else(|| EngineError::UnknownEmployee { id: id.to_string() })
    }

    /// Existing allocations relevant to a proposal, excluding the proposal
    /// itself when this is an update.
    fn existing_for(&self, proposed: &Allocation) -> EngineResult<Vec<Allocation>> {
        let horizon_end = proposed.end.unwrap_or_else(|| {
            proposed.start + chrono::Duration::weeks(self.config.open_ended_horizon_weeks as i64)
        });
        let range = DateRange::new(proposed.start, horizon_end);
        let mut existing = self
            .provider
            .active_allocations(&proposed.employee_id, &range)?;
        if !proposed.id.is_empty() {
            existing.retain(|a| a.id != proposed.id);
        }
        Ok(existing)
    }

    fn evaluate_proposal(&self, proposed: &Allocation) -> EngineResult<ConflictResult> {
        proposed.validate()?;
        let employee = self.require_employee(&proposed.employee_id)?;
        let existing = self.existing_for(proposed)?;
        let result = conflict::evaluate(&employee, proposed, &existing, &self.config);
        log::debug!(
            "employee={} project={} severity={} max_utilization={:.0}%",
            proposed.employee_id,
            proposed.project_id,
            result.severity.label(),
            result.max_utilization_pct,
        );
        Ok(result)
    }

    /// Check a proposed assignment without writing anything.
    ///
    /// Over-allocation comes back as data in the result, never as an error.
    pub fn validate_assignment(
        &self,
        employee_id: &str,
        range: DateRange,
        effort: Effort,
    ) -> EngineResult<ConflictResult> {
        range.validate()?;
        let proposed = Allocation::new(employee_id, "proposed", range.start, Some(range.end), effort);
        self.evaluate_proposal(&proposed)
    }

    /// Strict variant: anything above `Severity::None` is an error naming
    /// the first conflicting week and the maximum observed utilization.
    pub fn validate_assignment_strict(
        &self,
        employee_id: &str,
        range: DateRange,
        effort: Effort,
    ) -> EngineResult<ConflictResult> {
        let result = self.validate_assignment(employee_id, range, effort)?;
        self.reject_if_over(employee_id, result)
    }

    fn reject_if_over(
        &self,
        employee_id: &str,
        result: ConflictResult,
    ) -> EngineResult<ConflictResult> {
        if let Some(week) = result.first_conflict() {
            return Err(EngineError::CapacityExceeded {
                employee_id: employee_id.to_string(),
                week: week.week_start,
                utilization_pct: result.max_utilization_pct,
            });
        }
        Ok(result)
    }

    /// Validate and persist an allocation in one pass.
    ///
    /// Mints an id when the allocation has none. With `strict` set, an
    /// over-capacity proposal is rejected and nothing is written;
    /// otherwise it commits and the conflict result carries the warning.
    pub fn commit_assignment(
        &self,
        mut alloc: Allocation,
        strict: bool,
    ) -> EngineResult<(Allocation, ConflictResult)> {
        let result = self.evaluate_proposal(&alloc)?;
        if strict {
            self.reject_if_over(&alloc.employee_id, result.clone())?;
        }
        if alloc.id.is_empty() {
            alloc.id = uuid::Uuid::new_v4().to_string();
        }
        self.provider.upsert_allocation(&alloc)?;
        match result.severity {
            Severity::None => log::info!(
                "employee={} project={} allocation={} committed",
                alloc.employee_id,
                alloc.project_id,
                alloc.id,
            ),
            _ => log::warn!(
                "employee={} project={} allocation={} committed {} over-allocation ({:.0}%)",
                alloc.employee_id,
                alloc.project_id,
                alloc.id,
                result.severity.label(),
                result.max_utilization_pct,
            ),
        }
        Ok((alloc, result))
    }

    /// Transition an allocation to cancelled. Frees its capacity; the
    /// record itself is never deleted.
    pub fn cancel_allocation(&self, id: &str) -> EngineResult<Allocation> {
        let mut alloc = self.provider.get_allocation(id)?.ok_or_else(|| {
            EngineError::validation("allocation_id", format!("no allocation '{id}'"))
        })?;
        alloc.status = crate::model::AllocationStatus::Cancelled;
        self.provider.upsert_allocation(&alloc)?;
        log::info!(
            "employee={} allocation={} cancelled",
            alloc.employee_id,
            alloc.id,
        );
        Ok(alloc)
    }

    /// Weekly utilization buckets for calendars, heat maps, and dashboards.
    pub fn get_utilization(
        &self,
        employee_id: &str,
        range: DateRange,
    ) -> EngineResult<Vec<WeeklyBucket>> {
        range.validate()?;
        let employee = self.require_employee(employee_id)?;
        let allocations = self.provider.active_allocations(employee_id, &range)?;
        Ok(ledger::weekly_buckets(
            &employee,
            &allocations,
            &range,
            &self.config,
        ))
    }

    /// Mean free capacity (0–100) over a window; 100 when unconstrained.
    fn availability_pct(
        &self,
        employee: &Employee,
        window: Option<&DateRange>,
    ) -> EngineResult<f64> {
        let Some(range) = window else {
            return Ok(100.0);
        };
        let allocations = self.provider.active_allocations(&employee.id, range)?;
        let buckets = ledger::weekly_buckets(employee, &allocations, range, &self.config);
        if buckets.is_empty() {
            return Ok(100.0);
        }
        let free: f64 = buckets
            .iter()
            .map(|b| (100.0 - b.utilization_pct).max(0.0))
            .sum();
        Ok(free / buckets.len() as f64)
    }

    fn validate_requirements(requirements: &[SkillRequirement]) -> EngineResult<()> {
        for req in requirements {
            if req.skill_id.trim().is_empty() {
                return Err(EngineError::validation("skill_id", "must not be blank"));
            }
            if req.estimated_hours < 0.0 {
                return Err(EngineError::validation(
                    "estimated_hours",
                    format!("{} for '{}' must not be negative", req.estimated_hours, req.skill_id),
                ));
            }
        }
        Ok(())
    }

    /// Score a candidate pool against a requirement list, best first.
    ///
    /// With no candidate ids, the whole directory is scored. Availability
    /// is derived from the ledger over `window` when one is given.
    pub fn match_employees_to_requirements(
        &self,
        requirements: &[SkillRequirement],
        candidate_ids: Option<&[EmployeeId]>,
        window: Option<DateRange>,
    ) -> EngineResult<Vec<MatchResult>> {
        Self::validate_requirements(requirements)?;
        if let Some(range) = &window {
            range.validate()?;
        }
        let pool = match candidate_ids {
            Some(ids) => self.provider.get_employees_by_ids(ids)?,
            None => self.provider.all_employees()?,
        };
        let mut results = Vec::with_capacity(pool.len());
        for employee in &pool {
            let availability = self.availability_pct(employee, window.as_ref())?;
            results.push(matcher::score_employee(
                employee,
                requirements,
                availability,
                &self.config.score_blend,
            ));
        }
        results.sort_by(|a, b| {
            b.overall_score
                .total_cmp(&a.overall_score)
                .then(a.employee_id.cmp(&b.employee_id))
        });
        Ok(results)
    }

    /// Run a full team optimization pass over the directory.
    pub fn optimize_team(
        &self,
        requirements: &[SkillRequirement],
        constraints: &TeamConstraints,
    ) -> EngineResult<TeamMatch> {
        Self::validate_requirements(requirements)?;
        if let Some(range) = &constraints.window {
            range.validate()?;
        }
        let pool = self.provider.all_employees()?;
        let mut availability = std::collections::HashMap::new();
        for employee in &pool {
            availability.insert(
                employee.id.clone(),
                self.availability_pct(employee, constraints.window.as_ref())?,
            );
        }
        let team = optimizer::optimize_team(
            requirements,
            &pool,
            constraints,
            |e| availability.get(&e.id).copied().unwrap_or(100.0),
            &self.config,
        );
        log::info!(
            "optimize requirements={} pool={} members={} coverage={:.0}% cost={:.0}",
            requirements.len(),
            pool.len(),
            team.members.len(),
            team.coverage_score,
            team.estimated_cost,
        );
        Ok(team)
    }
}
