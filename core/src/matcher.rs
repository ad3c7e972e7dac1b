//! Skill matcher — scores how well an employee satisfies a requirement list.
//!
//! Scoring:
//!   1. A requirement is covered when the held proficiency weight is at
//!      least the required proficiency weight. Absence of the skill is a
//!      gap of the full requirement weight.
//!   2. Coverage = 100 · Σ(priority_weight · covered) / Σ(priority_weight),
//!      so failing a critical requirement costs more than failing a low one.
//!   3. The overall score blends coverage with availability through the
//!      configured `ScoreBlend` — a tunable blend, not a constant.
//!   4. Gaps are sorted by requirement priority, then gap size, descending.

use crate::{
    config::ScoreBlend,
    model::{Employee, Proficiency, RequirementPriority, SkillRequirement},
    types::{EmployeeId, SkillId},
};
use serde::{Deserialize, Serialize};

/// How one requirement matched against one employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillMatch {
    pub skill_id: SkillId,
    pub required: Proficiency,
    pub held: Option<Proficiency>,
    pub mandatory: bool,
    pub priority: RequirementPriority,
    pub covered: bool,
    /// Proficiency levels short of the requirement (0 when covered).
    pub gap_levels: u8,
}

/// Per-employee result of matching a requirement list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub employee_id: EmployeeId,
    /// Blended 0–100 score (coverage × availability per the configured blend).
    pub overall_score: f64,
    /// Priority-weighted fraction of requirements covered, 0–100.
    pub coverage_score: f64,
    /// Free capacity over the evaluation window, 0–100.
    pub availability_score: f64,
    pub hourly_rate: f64,
    pub matches: Vec<SkillMatch>,
    /// The uncovered subset of `matches`, worst first.
    pub gaps: Vec<SkillMatch>,
}

impl MatchResult {
    /// Whether every mandatory requirement is covered.
    pub fn mandatory_covered(&self) -> bool {
        self.matches.iter().all(|m| !m.mandatory || m.covered)
    }
}

/// Score one employee against a requirement list.
///
/// `availability_pct` is the employee's free capacity over the window the
/// caller cares about (100 when unconstrained); the orchestrator computes
/// it from the capacity ledger.
pub fn score_employee(
    employee: &Employee,
    requirements: &[SkillRequirement],
    availability_pct: f64,
    blend: &ScoreBlend,
) -> MatchResult {
    let mut matches = Vec::with_capacity(requirements.len());
    let mut weight_total: u32 = 0;
    let mut weight_covered: u32 = 0;

    for req in requirements {
        let held = employee.proficiency(&req.skill_id);
        let required_weight = req.min_proficiency.weight();
        let held_weight = held.map(|p| p.weight()).unwrap_or(0);
        let covered = held_weight >= required_weight;
        let priority_weight = req.priority.weight() as u32;

        weight_total += priority_weight;
        if covered {
            weight_covered += priority_weight;
        }

        matches.push(SkillMatch {
            skill_id: req.skill_id.clone(),
            required: req.min_proficiency,
            held,
            mandatory: req.mandatory,
            priority: req.priority,
            covered,
            gap_levels: required_weight.saturating_sub(held_weight),
        });
    }

    // Nothing required: full coverage by definition.
    let coverage_score = if weight_total == 0 {
        100.0
    } else {
        100.0 * weight_covered as f64 / weight_total as f64
    };

    let availability_score = availability_pct.clamp(0.0, 100.0);
    let overall_score = blend.blend(coverage_score, availability_score);

    let mut gaps: Vec<SkillMatch> = matches.iter().filter(|m| !m.covered).cloned().collect();
    gaps.sort_by(|a, b| {
        b.priority
            .weight()
            .cmp(&a.priority.weight())
            .then(b.gap_levels.cmp(&a.gap_levels))
            .then(a.skill_id.cmp(&b.skill_id))
    });

    MatchResult {
        employee_id: employee.id.clone(),
        overall_score,
        coverage_score,
        availability_score,
        hourly_rate: employee.hourly_rate,
        matches,
        gaps,
    }
}
