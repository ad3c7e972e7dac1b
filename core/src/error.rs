use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Unknown employee '{id}'")]
    UnknownEmployee { id: String },

    #[error(
        "Capacity exceeded for '{employee_id}' in week of {week}: {utilization_pct:.0}% utilization"
    )]
    CapacityExceeded {
        employee_id: String,
        week: NaiveDate,
        utilization_pct: f64,
    },

    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EngineError {
    /// Shorthand for a validation failure naming the offending field.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
