use super::{EmployeeDirectory, SqliteStore};
use crate::{
    error::{EngineError, EngineResult},
    model::{Employee, Proficiency, SkillHolding},
    types::EmployeeId,
};
use rusqlite::params;
use std::collections::HashMap;

impl SqliteStore {
    // ── Employee ──────────────────────────────────────────────────

    pub fn insert_employee(&self, e: &Employee) -> EngineResult<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO employee (
                employee_id, name, weekly_capacity_hours, hourly_rate, department
            ) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &e.id,
                &e.name,
                e.weekly_capacity_hours,
                e.hourly_rate,
                &e.department,
            ],
        )?;
        self.conn().execute(
            "DELETE FROM employee_skill WHERE employee_id = ?1",
            params![&e.id],
        )?;
        for (skill_id, holding) in &e.skills {
            self.conn().execute(
                "INSERT INTO employee_skill (
                    employee_id, skill_id, proficiency, years_experience, certified
                ) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    &e.id,
                    skill_id,
                    holding.proficiency.label(),
                    holding.years_experience,
                    if holding.certified { 1 } else { 0 },
                ],
            )?;
        }
        Ok(())
    }

    fn skills_for(&self, employee_id: &str) -> EngineResult<HashMap<String, SkillHolding>> {
        let mut stmt = self.conn().prepare(
            "SELECT skill_id, proficiency, years_experience, certified
             FROM employee_skill WHERE employee_id = ?1",
        )?;
        let rows = stmt.query_map(params![employee_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, i32>(3)? != 0,
            ))
        })?;

        let mut skills = HashMap::new();
        for row in rows {
            let (skill_id, label, years_experience, certified) = row?;
            let proficiency = parse_proficiency(&label)?;
            skills.insert(
                skill_id,
                SkillHolding {
                    proficiency,
                    years_experience,
                    certified,
                },
            );
        }
        Ok(skills)
    }

    fn row_to_employee(row: &rusqlite::Row<'_>) -> rusqlite::Result<Employee> {
        Ok(Employee {
            id: row.get(0)?,
            name: row.get(1)?,
            weekly_capacity_hours: row.get(2)?,
            hourly_rate: row.get(3)?,
            department: row.get(4)?,
            skills: HashMap::new(), // filled by skills_for
        })
    }
}

fn parse_proficiency(label: &str) -> EngineResult<Proficiency> {
    match label {
        "beginner" => Ok(Proficiency::Beginner),
        "intermediate" => Ok(Proficiency::Intermediate),
        "advanced" => Ok(Proficiency::Advanced),
        "expert" => Ok(Proficiency::Expert),
        other => Err(EngineError::validation(
            "proficiency",
            format!("unknown level '{other}' in employee_skill"),
        )),
    }
}

impl EmployeeDirectory for SqliteStore {
    fn get_employee(&self, id: &str) -> EngineResult<Option<Employee>> {
        let mut stmt = self.conn().prepare(
            "SELECT employee_id, name, weekly_capacity_hours, hourly_rate, department
             FROM employee WHERE employee_id = ?1",
        )?;
        let employee = stmt
            .query_row(params![id], Self::row_to_employee)
            .ok();
        match employee {
            Some(mut e) => {
                e.skills = self.skills_for(id)?;
                Ok(Some(e))
            }
            None => Ok(None),
        }
    }

    fn get_employees_by_ids(&self, ids: &[EmployeeId]) -> EngineResult<Vec<Employee>> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(e) = self.get_employee(id)? {
                out.push(e);
            }
        }
        Ok(out)
    }

    fn all_employees(&self) -> EngineResult<Vec<Employee>> {
        let mut stmt = self.conn().prepare(
            "SELECT employee_id, name, weekly_capacity_hours, hourly_rate, department
             FROM employee ORDER BY employee_id",
        )?;
        let rows = stmt.query_map([], Self::row_to_employee)?;
        let mut employees = rows.collect::<Result<Vec<_>, _>>()?;
        for e in &mut employees {
            e.skills = self.skills_for(&e.id)?;
        }
        Ok(employees)
    }
}
