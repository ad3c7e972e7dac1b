//! Deterministic sample dataset generation.
//!
//! Builds a reproducible employee pool with skills, rates, and a spread of
//! existing allocations. `plan-runner` seeds an empty store with it, and
//! the determinism tests rely on it: same seed, same dataset.

use crate::{
    model::{Allocation, AllocationStatus, Effort, Employee, Proficiency, SkillInfo},
    rng::SampleRng,
};
use chrono::{Duration, NaiveDate};

/// A generated pool of employees plus their existing allocations.
pub struct SampleDataset {
    pub employees: Vec<Employee>,
    pub allocations: Vec<Allocation>,
    pub skills: Vec<SkillInfo>,
}

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "Michael", "Jennifer", "William", "Linda", "David",
    "Elizabeth", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah", "Daniel", "Karen",
    "Matthew", "Lisa", "Anthony", "Nancy", "Mark", "Betty", "Steven", "Margaret", "Andrew",
    "Sandra", "Joshua", "Ashley", "Kevin", "Emily", "Brian", "Donna", "George", "Michelle",
    "Timothy", "Carol", "Ronald", "Amanda",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris", "Sanchez",
    "Clark", "Ramirez", "Lewis", "Robinson", "Walker", "Young", "Allen", "King", "Wright",
    "Scott", "Torres", "Nguyen", "Hill", "Flores",
];

// (id, display name, category) — the catalog the store serves back.
const SKILLS: &[(&str, &str, &str)] = &[
    ("react", "React", "frontend"),
    ("typescript", "TypeScript", "frontend"),
    ("rust", "Rust", "backend"),
    ("go", "Go", "backend"),
    ("python", "Python", "backend"),
    ("sql", "SQL", "data"),
    ("kubernetes", "Kubernetes", "platform"),
    ("terraform", "Terraform", "platform"),
    ("java", "Java", "backend"),
    ("ux_design", "UX Design", "design"),
    ("data_engineering", "Data Engineering", "data"),
    ("security", "Security", "security"),
];

const DEPARTMENTS: &[&str] = &["engineering", "platform", "data", "design", "security"];

const PROJECTS: &[&str] = &["atlas", "borealis", "cascade", "delta", "ember"];

fn pick<'a>(rng: &mut SampleRng, items: &'a [&'a str]) -> &'a str {
    items[rng.next_u64_below(items.len() as u64) as usize]
}

fn pick_proficiency(rng: &mut SampleRng) -> Proficiency {
    match rng.next_u64_below(4) {
        0 => Proficiency::Beginner,
        1 => Proficiency::Intermediate,
        2 => Proficiency::Advanced,
        _ => Proficiency::Expert,
    }
}

/// Generate `count` employees with allocations starting around `anchor`.
pub fn generate(seed: u64, count: usize, anchor: NaiveDate) -> SampleDataset {
    let mut rng = SampleRng::new(seed);
    let mut employees = Vec::with_capacity(count);
    let mut allocations = Vec::new();

    for i in 0..count {
        let name = format!(
            "{} {}",
            pick(&mut rng, FIRST_NAMES),
            pick(&mut rng, LAST_NAMES)
        );
        let mut employee = Employee::new(format!("emp-{i:04}"), name)
            .with_capacity(40.0)
            .with_rate((rng.range_f64(45.0, 160.0) * 100.0).round() / 100.0)
            .with_department(pick(&mut rng, DEPARTMENTS));

        // 2–5 skills each.
        let skill_count = 2 + rng.next_u64_below(4);
        for _ in 0..skill_count {
            let (skill_id, _, _) = SKILLS[rng.next_u64_below(SKILLS.len() as u64) as usize];
            let proficiency = pick_proficiency(&mut rng);
            employee = employee.with_skill(skill_id, proficiency);
        }

        // 0–2 existing allocations, each 2–12 weeks, 20–80% effort.
        let alloc_count = rng.next_u64_below(3);
        for j in 0..alloc_count {
            let start = anchor + Duration::weeks(rng.next_u64_below(4) as i64);
            let weeks = 2 + rng.next_u64_below(11);
            let mut alloc = Allocation::new(
                employee.id.clone(),
                pick(&mut rng, PROJECTS),
                start,
                Some(start + Duration::weeks(weeks as i64) - Duration::days(1)),
                Effort::PercentOfCapacity((2.0 + rng.next_u64_below(7) as f64) * 10.0),
            );
            alloc.id = format!("alloc-{i:04}-{j}");
            if rng.chance(0.2) {
                alloc = alloc.with_status(AllocationStatus::Planned);
            }
            allocations.push(alloc);
        }

        employees.push(employee);
    }

    let skills = SKILLS
        .iter()
        .map(|(id, name, category)| SkillInfo {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
        })
        .collect();

    SampleDataset {
        employees,
        allocations,
        skills,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_dataset() {
        let anchor = "2024-01-15".parse().unwrap();
        let a = generate(42, 20, anchor);
        let b = generate(42, 20, anchor);
        assert_eq!(a.employees.len(), b.employees.len());
        for (x, y) in a.employees.iter().zip(&b.employees) {
            assert_eq!(x.name, y.name);
            assert_eq!(x.hourly_rate, y.hourly_rate);
        }
        assert_eq!(a.allocations.len(), b.allocations.len());
    }

    #[test]
    fn generated_allocations_validate() {
        let anchor = "2024-01-15".parse().unwrap();
        let dataset = generate(7, 30, anchor);
        for alloc in &dataset.allocations {
            alloc.validate().unwrap();
        }
    }
}
