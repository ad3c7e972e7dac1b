//! Team optimizer — constraint-driven team selection.
//!
//! Greedy and deterministic:
//!   1. Score every candidate against the full requirement list.
//!   2. Rank by match score, then availability, then ascending hourly rate,
//!      then employee id. The tie-break order is exact and reproducible.
//!   3. Select in rank order up to the team-size cap, tracking uncovered
//!      requirements. Once every mandatory requirement is covered, only
//!      candidates that cover something still uncovered are added.
//!   4. Aggregate coverage, availability, cost, and timeline.
//!   5. Derive risk factors from the configured floors, each with a
//!      mitigation, and ordered recommendations (hiring, then training,
//!      then scheduling).
//!
//! Optimization never fails hard: an empty pool or requirement list
//! degrades to an `InsufficientData` result with explanatory risks.

use crate::{
    config::EngineConfig,
    matcher::{self, MatchResult},
    model::{DateRange, Employee, SkillRequirement},
    types::SkillId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamConstraints {
    pub max_team_size: usize,
    pub budget_ceiling: Option<f64>,
    /// Window over which candidate availability is evaluated.
    pub window: Option<DateRange>,
}

impl TeamConstraints {
    pub fn new(max_team_size: usize) -> Self {
        Self {
            max_team_size,
            budget_ceiling: None,
            window: None,
        }
    }

    pub fn with_budget(mut self, ceiling: f64) -> Self {
        self.budget_ceiling = Some(ceiling);
        self
    }

    pub fn with_window(mut self, window: DateRange) -> Self {
        self.window = Some(window);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamStatus {
    Optimized,
    /// Empty candidate pool or empty requirement list.
    InsufficientData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    SkillGap,
    Availability,
    Cost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSeverity {
    Medium,
    High,
}

/// A flagged condition on a team match, with a suggested mitigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
    pub kind: RiskKind,
    pub severity: RiskSeverity,
    pub description: String,
    pub mitigation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMatch {
    pub status: TeamStatus,
    /// Selected members with their individual match results, in rank order.
    pub members: Vec<MatchResult>,
    /// Fraction of requirements covered by at least one member, 0–100.
    pub coverage_score: f64,
    /// Mean availability of selected members, 0–100.
    pub availability_score: f64,
    /// Σ estimated hours × covering member's rate (team average when uncovered).
    pub estimated_cost: f64,
    pub estimated_hours: f64,
    /// Rough calendar weeks to burn the estimated hours at the team's free capacity.
    pub estimated_weeks: f64,
    /// Required skills no selected member covers.
    pub missing_skills: Vec<SkillId>,
    pub risk_factors: Vec<RiskFactor>,
    pub recommendations: Vec<String>,
}

/// Select a team for a requirement list from a candidate pool.
///
/// `availability` reports each candidate's free capacity (0–100) over the
/// constraint window; the orchestrator derives it from the capacity ledger.
pub fn optimize_team(
    requirements: &[SkillRequirement],
    pool: &[Employee],
    constraints: &TeamConstraints,
    availability: impl Fn(&Employee) -> f64,
    config: &EngineConfig,
) -> TeamMatch {
    if pool.is_empty() || requirements.is_empty() || constraints.max_team_size == 0 {
        return insufficient_data(requirements);
    }

    // 1–2. Score and rank.
    let mut ranked: Vec<(MatchResult, &Employee)> = pool
        .iter()
        .map(|e| {
            (
                matcher::score_employee(e, requirements, availability(e), &config.score_blend),
                e,
            )
        })
        .collect();
    ranked.sort_by(|(a, ea), (b, eb)| {
        b.overall_score
            .total_cmp(&a.overall_score)
            .then(b.availability_score.total_cmp(&a.availability_score))
            .then(ea.hourly_rate.total_cmp(&eb.hourly_rate))
            .then(ea.id.cmp(&eb.id))
    });

    // 3. Greedy selection.
    let mut members: Vec<MatchResult> = Vec::new();
    let mut selected: Vec<&Employee> = Vec::new();
    let mut uncovered: Vec<usize> = (0..requirements.len()).collect();
    let mut mandatory_uncovered = requirements.iter().filter(|r| r.mandatory).count();

    for (result, employee) in ranked {
        if members.len() >= constraints.max_team_size {
            break;
        }
        let newly_covered: Vec<usize> = uncovered
            .iter()
            .copied()
            .filter(|&i| result.matches[i].covered)
            .collect();
        if mandatory_uncovered == 0 && newly_covered.is_empty() {
            continue;
        }
        for &i in &newly_covered {
            if requirements[i].mandatory {
                mandatory_uncovered -= 1;
            }
        }
        uncovered.retain(|i| !newly_covered.contains(i));
        members.push(result);
        selected.push(employee);
        if uncovered.is_empty() {
            break;
        }
    }

    // 4. Aggregates.
    let covered_count = requirements.len() - uncovered.len();
    let coverage_score = 100.0 * covered_count as f64 / requirements.len() as f64;
    let availability_score = if members.is_empty() {
        0.0
    } else {
        members.iter().map(|m| m.availability_score).sum::<f64>() / members.len() as f64
    };

    let avg_rate = if selected.is_empty() {
        0.0
    } else {
        selected.iter().map(|e| e.hourly_rate).sum::<f64>() / selected.len() as f64
    };
    let mut estimated_cost = 0.0;
    let mut estimated_hours = 0.0;
    for (i, req) in requirements.iter().enumerate() {
        estimated_hours += req.estimated_hours;
        // First covering member in rank order owns the requirement's hours.
        let rate = members
            .iter()
            .zip(&selected)
            .find(|(m, _)| m.matches[i].covered)
            .map(|(_, e)| e.hourly_rate)
            .unwrap_or(avg_rate);
        estimated_cost += req.estimated_hours * rate;
    }

    let weekly_free_hours: f64 = selected
        .iter()
        .zip(&members)
        .map(|(e, m)| e.capacity_or_default(config) * m.availability_score / 100.0)
        .sum();
    let estimated_weeks = if weekly_free_hours > 0.0 {
        estimated_hours / weekly_free_hours
    } else {
        0.0
    };

    // Missing means nobody selected holds the skill at all; an uncovered
    // requirement someone holds below level is a partial gap instead.
    let mut missing_skills: Vec<SkillId> = uncovered
        .iter()
        .filter(|&&i| members.iter().all(|m| m.matches[i].held.is_none()))
        .map(|&i| requirements[i].skill_id.clone())
        .collect();
    missing_skills.dedup();

    // 5. Risk factors.
    let mut risk_factors = Vec::new();
    if coverage_score < config.risk.coverage_floor_pct {
        risk_factors.push(RiskFactor {
            kind: RiskKind::SkillGap,
            severity: RiskSeverity::High,
            description: if missing_skills.is_empty() {
                format!("Only {coverage_score:.0}% of requirements covered; gaps are partial")
            } else {
                format!(
                    "Only {coverage_score:.0}% of requirements covered; missing: {}",
                    missing_skills.join(", "),
                )
            },
            mitigation: "Hire or contract for the missing skills, or relax proficiency floors"
                .into(),
        });
    }
    if availability_score < config.risk.availability_floor_pct {
        risk_factors.push(RiskFactor {
            kind: RiskKind::Availability,
            severity: RiskSeverity::Medium,
            description: format!(
                "Mean team availability {availability_score:.0}% is below the {:.0}% floor",
                config.risk.availability_floor_pct,
            ),
            mitigation: "Extend the timeline or stagger start dates around existing commitments"
                .into(),
        });
    }
    if let Some(budget) = constraints.budget_ceiling {
        if estimated_cost > budget * config.risk.budget_alert_ratio {
            risk_factors.push(RiskFactor {
                kind: RiskKind::Cost,
                severity: RiskSeverity::High,
                description: format!(
                    "Estimated cost {estimated_cost:.0} is over {:.0}% of the {budget:.0} budget",
                    config.risk.budget_alert_ratio * 100.0,
                ),
                mitigation: "Reduce scope, substitute lower-rate members, or raise the budget"
                    .into(),
            });
        }
    }

    // 6. Recommendations: hiring, then training, then scheduling.
    let mut recommendations = Vec::new();
    for skill in &missing_skills {
        recommendations.push(format!(
            "No selected member meets the '{skill}' requirement; hire or contract externally"
        ));
    }
    for &i in &uncovered {
        let req = &requirements[i];
        // A partial gap: someone on the team holds the skill, just below level.
        let best_held = members
            .iter()
            .filter_map(|m| m.matches[i].held)
            .max_by_key(|p| p.weight());
        if let Some(held) = best_held {
            recommendations.push(format!(
                "Train up '{}' from {} to {} to close the gap internally",
                req.skill_id,
                held.label(),
                req.min_proficiency.label(),
            ));
        }
    }
    if availability_score < config.risk.availability_floor_pct && !members.is_empty() {
        recommendations.push(
            "Team availability is constrained; reschedule around members' existing allocations"
                .into(),
        );
    }

    TeamMatch {
        status: TeamStatus::Optimized,
        members,
        coverage_score,
        availability_score,
        estimated_cost,
        estimated_hours,
        estimated_weeks,
        missing_skills,
        risk_factors,
        recommendations,
    }
}

/// Best-effort result for an empty pool or requirement list.
fn insufficient_data(requirements: &[SkillRequirement]) -> TeamMatch {
    let mut missing_skills: Vec<SkillId> =
        requirements.iter().map(|r| r.skill_id.clone()).collect();
    missing_skills.dedup();
    TeamMatch {
        status: TeamStatus::InsufficientData,
        members: Vec::new(),
        coverage_score: 0.0,
        availability_score: 0.0,
        estimated_cost: 0.0,
        estimated_hours: requirements.iter().map(|r| r.estimated_hours).sum(),
        estimated_weeks: 0.0,
        missing_skills,
        risk_factors: vec![RiskFactor {
            kind: RiskKind::SkillGap,
            severity: RiskSeverity::High,
            description: "No candidates or no requirements to optimize against".into(),
            mitigation: "Hire externally or supply a candidate pool and requirement list".into(),
        }],
        recommendations: vec![
            "Insufficient data for optimization; hire externally or widen the candidate pool"
                .into(),
        ],
    }
}
