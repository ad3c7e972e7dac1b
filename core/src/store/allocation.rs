use super::{AllocationStore, SqliteStore};
use crate::{
    error::{EngineError, EngineResult},
    model::{Allocation, AllocationStatus, DateRange, Effort},
};
use chrono::NaiveDate;
use rusqlite::params;

impl SqliteStore {
    // ── Allocation ────────────────────────────────────────────────

    /// Mark an allocation cancelled. A status transition, never a delete.
    pub fn cancel_allocation(&self, id: &str) -> EngineResult<Option<Allocation>> {
        let existing = self.get_allocation(id)?;
        let Some(mut alloc) = existing else {
            return Ok(None);
        };
        alloc.status = AllocationStatus::Cancelled;
        self.upsert_allocation(&alloc)?;
        Ok(Some(alloc))
    }

    pub fn allocations_for_project(&self, project_id: &str) -> EngineResult<Vec<Allocation>> {
        let mut stmt = self.conn().prepare(
            "SELECT allocation_id, employee_id, project_id, start_date, end_date,
                    effort_json, status
             FROM allocation WHERE project_id = ?1
             ORDER BY allocation_id",
        )?;
        let rows = stmt.query_map(params![project_id], row_to_raw)?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(EngineError::from)?
            .into_iter()
            .map(raw_to_allocation)
            .collect()
    }
}

type RawAllocation = (
    String,
    String,
    String,
    String,
    Option<String>,
    String,
    String,
);

fn row_to_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawAllocation> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn raw_to_allocation(raw: RawAllocation) -> EngineResult<Allocation> {
    let (id, employee_id, project_id, start, end, effort_json, status) = raw;
    let start: NaiveDate = start
        .parse()
        .map_err(|e| EngineError::validation("start_date", format!("{e}")))?;
    let end = end
        .map(|s| s.parse::<NaiveDate>())
        .transpose()
        .map_err(|e| EngineError::validation("end_date", format!("{e}")))?;
    let effort: Effort = serde_json::from_str(&effort_json)?;
    let status = AllocationStatus::parse(&status)
        .ok_or_else(|| EngineError::validation("status", format!("unknown status '{status}'")))?;
    Ok(Allocation {
        id,
        employee_id,
        project_id,
        start,
        end,
        effort,
        status,
    })
}

impl AllocationStore for SqliteStore {
    fn active_allocations(
        &self,
        employee_id: &str,
        range: &DateRange,
    ) -> EngineResult<Vec<Allocation>> {
        let mut stmt = self.conn().prepare(
            "SELECT allocation_id, employee_id, project_id, start_date, end_date,
                    effort_json, status
             FROM allocation
             WHERE employee_id = ?1
               AND status IN ('active', 'planned')
               AND start_date <= ?2
               AND (end_date IS NULL OR end_date >= ?3)
             ORDER BY allocation_id",
        )?;
        let rows = stmt.query_map(
            params![
                employee_id,
                range.end.to_string(),
                range.start.to_string()
            ],
            row_to_raw,
        )?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(EngineError::from)?
            .into_iter()
            .map(raw_to_allocation)
            .collect()
    }

    fn upsert_allocation(&self, alloc: &Allocation) -> EngineResult<()> {
        let effort_json = serde_json::to_string(&alloc.effort)?;
        self.conn().execute(
            "INSERT OR REPLACE INTO allocation (
                allocation_id, employee_id, project_id, start_date, end_date,
                effort_json, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &alloc.id,
                &alloc.employee_id,
                &alloc.project_id,
                alloc.start.to_string(),
                alloc.end.map(|d| d.to_string()),
                &effort_json,
                alloc.status.label(),
            ],
        )?;
        // Every write is also a log entry; the log is append-only.
        self.conn().execute(
            "INSERT INTO allocation_log (allocation_id, employee_id, status, payload)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                &alloc.id,
                &alloc.employee_id,
                alloc.status.label(),
                serde_json::to_string(alloc)?,
            ],
        )?;
        Ok(())
    }

    fn get_allocation(&self, id: &str) -> EngineResult<Option<Allocation>> {
        let mut stmt = self.conn().prepare(
            "SELECT allocation_id, employee_id, project_id, start_date, end_date,
                    effort_json, status
             FROM allocation WHERE allocation_id = ?1",
        )?;
        let raw = stmt.query_row(params![id], row_to_raw).ok();
        raw.map(raw_to_allocation).transpose()
    }
}
