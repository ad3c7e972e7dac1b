//! Collaborator contracts and the SQLite reference provider.
//!
//! RULE: Only this module and its submodules talk to the database.
//! The engine consumes the traits; hosts plug in their own directory and
//! allocation storage, or use `SqliteStore` as shipped.
//!
//! Concurrency note: the conflict check and the allocation write must be
//! one atomic unit per employee. `SqliteStore` satisfies this through
//! SQLite's connection-level serialization; other providers must bring
//! their own transaction or per-employee mutex.

mod allocation;
mod employee;

use crate::{
    error::EngineResult,
    model::{Allocation, DateRange, Employee},
    types::EmployeeId,
};
use rusqlite::Connection;

/// Read access to the employee registry.
pub trait EmployeeDirectory {
    fn get_employee(&self, id: &str) -> EngineResult<Option<Employee>>;

    fn get_employees_by_ids(&self, ids: &[EmployeeId]) -> EngineResult<Vec<Employee>> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(e) = self.get_employee(id)? {
                out.push(e);
            }
        }
        Ok(out)
    }

    /// The full pool, used when an optimization request names no candidates.
    fn all_employees(&self) -> EngineResult<Vec<Employee>>;
}

/// Read/write access to allocation records.
pub trait AllocationStore {
    /// Allocations for one employee that can count against capacity
    /// (active and planned) and intersect the range.
    fn active_allocations(
        &self,
        employee_id: &str,
        range: &DateRange,
    ) -> EngineResult<Vec<Allocation>>;

    /// Insert or replace. Called by the orchestrator only after a
    /// successful conflict check; also records the transition in the log.
    fn upsert_allocation(&self, alloc: &Allocation) -> EngineResult<()>;

    fn get_allocation(&self, id: &str) -> EngineResult<Option<Allocation>>;
}

/// Skill display metadata. Not consulted by scoring, which operates on ids.
pub trait SkillCatalog {
    fn skill_name(&self, skill_id: &str) -> EngineResult<Option<String>>;
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> EngineResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> EngineResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> EngineResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_schema.sql"))?;
        Ok(())
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn insert_skill(&self, skill: &crate::model::SkillInfo) -> EngineResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO skill (skill_id, name, category) VALUES (?1, ?2, ?3)",
            rusqlite::params![&skill.id, &skill.name, &skill.category],
        )?;
        Ok(())
    }
}

impl SkillCatalog for SqliteStore {
    fn skill_name(&self, skill_id: &str) -> EngineResult<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM skill WHERE skill_id = ?1")?;
        let name = stmt
            .query_row(rusqlite::params![skill_id], |row| row.get(0))
            .ok();
        Ok(name)
    }
}
