use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("corrupt record: {0}")]
    Corrupt(String),
    /// A unique constraint rejected the write; carries the user-facing reason.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl ModelError {
    /// Prefix a field rule failure with the field name.
    pub fn field(field: &str, msg: String) -> Self { Self::Validation(format!("{field} {msg}")) }
}

/// Reason reported for a unique violation, keyed on the constraint named in
/// the driver message (`provider_company_name_key`, `provider_user_id_key`).
pub fn unique_violation_reason(detail: &str) -> &'static str {
    if detail.contains("company_name") {
        "company already exists"
    } else if detail.contains("user_id") {
        "provider already registered"
    } else {
        "duplicate entry"
    }
}

impl From<DbErr> for ModelError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::Conflict(unique_violation_reason(&detail).into()),
            _ => Self::Db(e.to_string()),
        }
    }
}
