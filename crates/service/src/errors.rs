use thiserror::Error;

/// Outcomes the HTTP layer maps to status codes.
///
/// `NotFound` and `Conflict` are expected, caller-recoverable results with
/// specific messages; `Db` is the catch-all for unexpected store failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{} not found", entity))
    }

    pub fn duplicate_email() -> Self {
        Self::Conflict("a user with this email already exists".to_string())
    }
}
