//! plan-runner: headless runner for the resourcing engine.
//!
//! Usage:
//!   plan-runner --seed 42 --pool 25 optimize --requirements reqs.json
//!   plan-runner --db plan.db validate --employee emp-0001 \
//!       --project atlas --start 2024-01-15 --end 2024-03-01 --hours 10
//!   plan-runner --seed 42 utilization --employee emp-0001 \
//!       --start 2024-01-15 --end 2024-02-26

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use resourcing_core::{
    config::EngineConfig,
    engine::AllocationEngine,
    model::{DateRange, Effort, Proficiency, RequirementPriority, SkillRequirement},
    optimizer::TeamConstraints,
    sample,
    store::{SkillCatalog, SqliteStore},
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let command = args
        .iter()
        .skip(1)
        .find(|a| !a.starts_with("--") && !is_flag_value(&args, a.as_str()))
        .map(String::as_str)
        .unwrap_or("optimize");

    let seed = parse_arg(&args, "--seed", 42u64);
    let pool = parse_arg(&args, "--pool", 25usize);
    let db = str_arg(&args, "--db").unwrap_or(":memory:");
    let anchor: NaiveDate = str_arg(&args, "--anchor")
        .unwrap_or("2024-01-15")
        .parse()
        .context("--anchor must be YYYY-MM-DD")?;
    let config = match str_arg(&args, "--config") {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    println!("resourcing plan-runner");
    println!("  command: {command}");
    println!("  db:      {db}");
    println!("  seed:    {seed}");
    println!();

    let store = if db == ":memory:" {
        SqliteStore::in_memory()?
    } else {
        SqliteStore::open(db)?
    };
    store.migrate()?;

    // An empty store gets the deterministic sample pool.
    if resourcing_core::store::EmployeeDirectory::all_employees(&store)?.is_empty() {
        log::info!("seeding sample dataset seed={seed} pool={pool}");
        let dataset = sample::generate(seed, pool, anchor);
        for employee in &dataset.employees {
            store.insert_employee(employee)?;
        }
        for alloc in &dataset.allocations {
            resourcing_core::store::AllocationStore::upsert_allocation(&store, alloc)?;
        }
        for skill in &dataset.skills {
            store.insert_skill(skill)?;
        }
    }

    let engine = AllocationEngine::new(config, store);

    match command {
        "optimize" => run_optimize(&engine, &args),
        "validate" => run_validate(&engine, &args),
        "utilization" => run_utilization(&engine, &args),
        other => bail!("unknown command '{other}' (expected optimize | validate | utilization)"),
    }
}

fn run_optimize(engine: &AllocationEngine<SqliteStore>, args: &[String]) -> Result<()> {
    let requirements = match str_arg(args, "--requirements") {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read {path}"))?;
            serde_json::from_str(&content)?
        }
        None => demo_requirements(),
    };
    let mut constraints = TeamConstraints::new(parse_arg(args, "--max-team", 4usize));
    if let Some(budget) = str_arg(args, "--budget") {
        constraints = constraints.with_budget(budget.parse().context("--budget must be a number")?);
    }
    if let (Some(start), Some(end)) = (str_arg(args, "--start"), str_arg(args, "--end")) {
        constraints = constraints.with_window(DateRange::new(start.parse()?, end.parse()?));
    }

    let team = engine.optimize_team(&requirements, &constraints)?;
    println!("{}", serde_json::to_string_pretty(&team)?);

    if !team.missing_skills.is_empty() {
        let catalog = engine.provider();
        let names: Vec<String> = team
            .missing_skills
            .iter()
            .map(|id| {
                SkillCatalog::skill_name(catalog, id)
                    .ok()
                    .flatten()
                    .unwrap_or_else(|| id.clone())
            })
            .collect();
        println!();
        println!("missing skills: {}", names.join(", "));
    }
    Ok(())
}

fn run_validate(engine: &AllocationEngine<SqliteStore>, args: &[String]) -> Result<()> {
    let employee = str_arg(args, "--employee").context("validate needs --employee")?;
    let start: NaiveDate = str_arg(args, "--start")
        .context("validate needs --start")?
        .parse()?;
    let end: NaiveDate = str_arg(args, "--end")
        .context("validate needs --end")?
        .parse()?;
    let effort = match (str_arg(args, "--hours"), str_arg(args, "--percent")) {
        (Some(h), _) => Effort::HoursPerWeek(h.parse()?),
        (None, Some(p)) => Effort::PercentOfCapacity(p.parse()?),
        (None, None) => bail!("validate needs --hours or --percent"),
    };
    let strict = args.iter().any(|a| a == "--strict");

    let range = DateRange::new(start, end);
    let result = if strict {
        engine.validate_assignment_strict(employee, range, effort)?
    } else {
        engine.validate_assignment(employee, range, effort)?
    };
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn run_utilization(engine: &AllocationEngine<SqliteStore>, args: &[String]) -> Result<()> {
    let employee = str_arg(args, "--employee").context("utilization needs --employee")?;
    let start: NaiveDate = str_arg(args, "--start")
        .context("utilization needs --start")?
        .parse()?;
    let end: NaiveDate = str_arg(args, "--end")
        .context("utilization needs --end")?
        .parse()?;

    let buckets = engine.get_utilization(employee, DateRange::new(start, end))?;
    for b in &buckets {
        println!(
            "week of {}  {:>6.1}h / {:>5.1}h  ({:>5.1}%)",
            b.week_start, b.allocated_hours, b.capacity_hours, b.utilization_pct,
        );
    }
    Ok(())
}

/// Demo requirement list used when none is supplied.
fn demo_requirements() -> Vec<SkillRequirement> {
    vec![
        SkillRequirement::new("react", Proficiency::Advanced)
            .with_priority(RequirementPriority::Critical)
            .with_estimated_hours(120.0),
        SkillRequirement::new("rust", Proficiency::Intermediate)
            .with_priority(RequirementPriority::High)
            .with_estimated_hours(200.0),
        SkillRequirement::new("sql", Proficiency::Intermediate)
            .with_priority(RequirementPriority::Medium)
            .with_estimated_hours(60.0)
            .optional(),
    ]
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Whether `value` is the value of some `--flag value` pair (not a command).
fn is_flag_value(args: &[String], value: &str) -> bool {
    args.windows(2)
        .any(|w| w[0].starts_with("--") && w[1] == value)
}
