//! Shared Diesel error classification for the repository adapters.
//!
//! Each repository maps a [`DieselFailure`] onto its own port error, so the
//! connection/unique/query split is decided in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse classification of a Diesel failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped mid-operation.
    Connection(String),
    /// A unique constraint rejected the write.
    UniqueViolation {
        message: String,
        constraint: Option<String>,
    },
    /// Any other query or mutation failure.
    Query(String),
}

/// Extract a readable message from a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error and emit debug context for the failed operation.
pub(crate) fn classify_diesel_error(error: DieselError, operation: &str) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            %operation,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => {
            DieselFailure::Query("database query error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation {
                message: info.message().to_owned(),
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error".to_owned())
        }
        _ => DieselFailure::Query("database error".to_owned()),
    }
}

/// Convert an unsigned domain counter into a `BIGINT` column value.
pub(crate) fn to_bigint(value: u64, field: &str) -> Result<i64, String> {
    i64::try_from(value).map_err(|_| format!("{field} exceeds the storable range: {value}"))
}

/// Convert a `BIGINT` column value back into an unsigned domain counter.
pub(crate) fn from_bigint(value: i64, field: &str) -> Result<u64, String> {
    u64::try_from(value).map_err(|_| format!("negative {field} in database: {value}"))
}
