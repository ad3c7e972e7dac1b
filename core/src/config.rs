//! Engine configuration.
//!
//! Every threshold the engine compares against lives here as named
//! configuration rather than a literal: severity tiers, score blend
//! weights, risk floors, the week boundary, and the open-ended horizon.
//! Tests probe exact boundary values through `default_test()`.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Utilization percentages at which a proposed allocation escalates.
///
/// Utilization at or below `warning_pct` is fine; above it the severity
/// climbs one tier per threshold crossed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeverityThresholds {
    pub warning_pct: f64,
    pub danger_pct: f64,
    pub critical_pct: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            warning_pct: 100.0,
            danger_pct: 120.0,
            critical_pct: 150.0,
        }
    }
}

/// How an employee's overall match score blends coverage and availability.
///
/// Weights are relative; the blend normalizes them at use, so (1.0, 1.0)
/// and (0.5, 0.5) are the same 50/50 split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBlend {
    pub coverage_weight: f64,
    pub availability_weight: f64,
}

impl Default for ScoreBlend {
    fn default() -> Self {
        Self {
            coverage_weight: 0.5,
            availability_weight: 0.5,
        }
    }
}

impl ScoreBlend {
    /// Blend a coverage score and an availability score into one 0–100 value.
    pub fn blend(&self, coverage: f64, availability: f64) -> f64 {
        let total = self.coverage_weight + self.availability_weight;
        if total <= 0.0 {
            return coverage;
        }
        (coverage * self.coverage_weight + availability * self.availability_weight) / total
    }
}

/// Floors below which a team match grows a risk factor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Team coverage below this percentage flags a skill-gap risk.
    pub coverage_floor_pct: f64,
    /// Mean availability below this percentage flags an availability risk.
    pub availability_floor_pct: f64,
    /// Estimated cost above this fraction of the budget flags a cost risk.
    pub budget_alert_ratio: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            coverage_floor_pct: 80.0,
            availability_floor_pct: 70.0,
            budget_alert_ratio: 0.9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub severity: SeverityThresholds,
    pub score_blend: ScoreBlend,
    pub risk: RiskThresholds,
    /// First day of the capacity week. Mon–Sun by default.
    #[serde(with = "weekday_serde")]
    pub week_start: Weekday,
    /// Capacity assumed when an employee record carries none.
    pub default_weekly_capacity_hours: f64,
    /// Whether `planned` allocations participate in capacity accounting.
    pub count_planned_allocations: bool,
    /// Horizon for allocations with no end date, in weeks past the query week.
    pub open_ended_horizon_weeks: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            severity: SeverityThresholds::default(),
            score_blend: ScoreBlend::default(),
            risk: RiskThresholds::default(),
            week_start: Weekday::Mon,
            default_weekly_capacity_hours: 40.0,
            count_planned_allocations: true,
            open_ended_horizon_weeks: 26,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file. In tests, use `EngineConfig::default_test()`.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self::default()
    }
}

/// Weekday as a lowercase three-letter string ("mon".."sun") in config files.
mod weekday_serde {
    use chrono::Weekday;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(day: &Weekday, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&day.to_string().to_lowercase())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Weekday, D::Error> {
        let s = String::deserialize(de)?;
        Weekday::from_str(&s).map_err(|_| D::Error::custom(format!("invalid weekday: {s}")))
    }
}
