//! Capacity ledger — weekly capacity accounting.
//!
//! Pure functions over caller-supplied snapshots: the ledger performs no
//! writes and holds no state, so every query is deterministic and may run
//! concurrently with any other.
//!
//! Week folding:
//!   1. A week runs 7 days from the configured start day (Mon–Sun default).
//!   2. An allocation contributes to every week its date interval touches.
//!   3. The contribution is its weekly hours pro-rated by the working days
//!      (Mon–Fri) of the intersection, out of the 5 working days of a week.
//!   4. Percent efforts resolve against the employee's capacity at query
//!      time, not at allocation-creation time.
//!   5. An allocation with no end date contributes to every week from its
//!      start onward; conflict checks bound it by the configured horizon.

use crate::{
    config::EngineConfig,
    model::{Allocation, DateRange, Employee, WeeklyBucket},
};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// The start of the week containing `date`, given the configured week boundary.
pub fn week_start_of(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let days_back = (date.weekday().num_days_from_monday() + 7
        - week_start.num_days_from_monday())
        % 7;
    date - Duration::days(days_back as i64)
}

/// Week starts for every week the range touches, in order.
pub fn weeks_touching(range: &DateRange, week_start: Weekday) -> Vec<NaiveDate> {
    let mut weeks = Vec::new();
    let mut week = week_start_of(range.start, week_start);
    while week <= range.end {
        weeks.push(week);
        week += Duration::days(7);
    }
    weeks
}

/// Week starts for every week a proposed allocation touches. Open-ended
/// allocations are bounded at `open_ended_horizon_weeks` past their start.
pub fn weeks_touching_allocation(alloc: &Allocation, config: &EngineConfig) -> Vec<NaiveDate> {
    let end = alloc.end.unwrap_or_else(|| {
        alloc.start + Duration::weeks(config.open_ended_horizon_weeks as i64)
    });
    weeks_touching(&DateRange::new(alloc.start, end), config.week_start)
}

/// Working days (Mon–Fri) in the closed interval [from, to].
fn working_days(from: NaiveDate, to: NaiveDate) -> u32 {
    let mut count = 0;
    let mut day = from;
    while day <= to {
        if day.weekday().num_days_from_monday() < 5 {
            count += 1;
        }
        day += Duration::days(1);
    }
    count
}

/// Hours one allocation contributes to the week starting at `week_start`.
///
/// Zero when the allocation's status does not count against capacity or its
/// interval misses the week entirely.
pub fn allocation_weekly_hours(
    employee: &Employee,
    alloc: &Allocation,
    week_start: NaiveDate,
    config: &EngineConfig,
) -> f64 {
    if !alloc.status.counts_against_capacity(config) {
        return 0.0;
    }
    let week_end = week_start + Duration::days(6);
    let effective_end = alloc.end.unwrap_or(week_end);
    let overlap_start = alloc.start.max(week_start);
    let overlap_end = effective_end.min(week_end);
    if overlap_start > overlap_end {
        return 0.0;
    }
    let weekly_hours = alloc
        .effort
        .hours_per_week(employee.capacity_or_default(config));
    weekly_hours * working_days(overlap_start, overlap_end) as f64 / 5.0
}

/// Total allocated hours for one employee in the week starting at `week_start`.
pub fn weekly_load(
    employee: &Employee,
    allocations: &[Allocation],
    week_start: NaiveDate,
    config: &EngineConfig,
) -> f64 {
    allocations
        .iter()
        .map(|a| allocation_weekly_hours(employee, a, week_start, config))
        .sum()
}

/// Weekly buckets across a date range, one per touched week.
pub fn weekly_buckets(
    employee: &Employee,
    allocations: &[Allocation],
    range: &DateRange,
    config: &EngineConfig,
) -> Vec<WeeklyBucket> {
    let capacity = employee.capacity_or_default(config);
    weeks_touching(range, config.week_start)
        .into_iter()
        .map(|week_start| {
            let allocated = weekly_load(employee, allocations, week_start, config);
            WeeklyBucket {
                week_start,
                allocated_hours: allocated,
                capacity_hours: capacity,
                utilization_pct: if capacity > 0.0 {
                    allocated / capacity * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Effort;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn week_start_backs_up_to_monday() {
        // 2024-01-17 is a Wednesday.
        assert_eq!(week_start_of(d("2024-01-17"), Weekday::Mon), d("2024-01-15"));
        assert_eq!(week_start_of(d("2024-01-15"), Weekday::Mon), d("2024-01-15"));
        assert_eq!(week_start_of(d("2024-01-21"), Weekday::Mon), d("2024-01-15"));
    }

    #[test]
    fn week_start_honors_configured_boundary() {
        // Sunday-start weeks: Wed 2024-01-17 belongs to the week of Sun 2024-01-14.
        assert_eq!(week_start_of(d("2024-01-17"), Weekday::Sun), d("2024-01-14"));
    }

    #[test]
    fn weeks_touching_spans_partial_edges() {
        let range = DateRange::new(d("2024-01-17"), d("2024-01-29"));
        let weeks = weeks_touching(&range, Weekday::Mon);
        assert_eq!(weeks, vec![d("2024-01-15"), d("2024-01-22"), d("2024-01-29")]);
    }

    #[test]
    fn partial_week_is_prorated_by_working_days() {
        let employee = Employee::new("e1", "Test").with_capacity(40.0);
        let config = EngineConfig::default_test();
        // Thu 2024-01-18 .. Fri 2024-01-19: 2 of 5 working days.
        let alloc = Allocation::new(
            "e1",
            "p1",
            d("2024-01-18"),
            Some(d("2024-01-19")),
            Effort::HoursPerWeek(20.0),
        );
        let hours = allocation_weekly_hours(&employee, &alloc, d("2024-01-15"), &config);
        assert!((hours - 8.0).abs() < 1e-9, "expected 8h, got {hours}");
    }

    #[test]
    fn weekend_only_overlap_contributes_nothing() {
        let employee = Employee::new("e1", "Test");
        let config = EngineConfig::default_test();
        let alloc = Allocation::new(
            "e1",
            "p1",
            d("2024-01-20"), // Saturday
            Some(d("2024-01-21")),
            Effort::HoursPerWeek(20.0),
        );
        let hours = allocation_weekly_hours(&employee, &alloc, d("2024-01-15"), &config);
        assert_eq!(hours, 0.0);
    }
}
