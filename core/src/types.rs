//! Shared primitive types used across the entire engine.

/// A stable, unique identifier for an employee in the directory.
pub type EmployeeId = String;

/// A stable, unique identifier for a project.
pub type ProjectId = String;

/// A stable, unique identifier for a skill in the catalog.
pub type SkillId = String;
