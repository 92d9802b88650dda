use thiserror::Error;

use models::errors::ModelError;

/// Failures of marketplace actions. Missing targets and conflicts are not
/// errors; they travel as `common::ActionOutcome`. `Conflict` only carries a
/// unique-key rejection from the store to the action that reports it.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    /// Read failed or the entity a read depends on is missing.
    #[error("lookup error: {0}")]
    Lookup(String),
    /// Write rejected or failed at the store.
    #[error("persistence error: {0}")]
    Persistence(String),
    /// Cross-document invariant would be violated.
    #[error("consistency error: {0}")]
    Consistency(String),
    /// Store rejected a write on a unique key.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl ServiceError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::Lookup(_) => 1101,
            ServiceError::Persistence(_) => 1201,
            ServiceError::Consistency(_) => 1301,
            ServiceError::Conflict(_) => 1401,
        }
    }

    /// Wrap a read failure with the action it happened in.
    pub fn lookup(context: &str, cause: impl std::fmt::Display) -> Self {
        Self::Lookup(format!("an error occurred while {context}: {cause}"))
    }

    /// Wrap a write failure with the action it happened in.
    pub fn persistence(context: &str, cause: impl std::fmt::Display) -> Self {
        Self::Persistence(format!("an error occurred while {context}: {cause}"))
    }
}

/// Read-side mapping of model errors.
pub fn read_err(e: ModelError) -> ServiceError {
    match e {
        ModelError::Validation(m) => ServiceError::Validation(m),
        ModelError::Db(m) | ModelError::Corrupt(m) | ModelError::Conflict(m) => ServiceError::Lookup(m),
    }
}

/// Write-side mapping of model errors.
pub fn write_err(e: ModelError) -> ServiceError {
    match e {
        ModelError::Validation(m) => ServiceError::Validation(m),
        ModelError::Db(m) => ServiceError::Persistence(m),
        ModelError::Corrupt(m) => ServiceError::Consistency(m),
        ModelError::Conflict(m) => ServiceError::Conflict(m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_keep_original_message() {
        let e = ServiceError::persistence("creating service", "connection reset");
        assert_eq!(e.to_string(), "persistence error: an error occurred while creating service: connection reset");
        assert_eq!(e.code(), 1201);
    }

    #[test]
    fn model_errors_map_by_side() {
        assert!(matches!(read_err(ModelError::Db("x".into())), ServiceError::Lookup(_)));
        assert!(matches!(write_err(ModelError::Db("x".into())), ServiceError::Persistence(_)));
        assert!(matches!(write_err(ModelError::Validation("x".into())), ServiceError::Validation(_)));
        let e = write_err(ModelError::Conflict("company already exists".into()));
        assert!(matches!(e, ServiceError::Conflict(ref m) if m == "company already exists"));
        assert_eq!(e.code(), 1401);
    }
}
