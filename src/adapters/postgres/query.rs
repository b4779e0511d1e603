//! Shared query plumbing: per-operation timeout and error mapping.

use std::future::Future;
use std::time::Duration;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Upper bound for any single database round trip.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs one query under [`QUERY_TIMEOUT`].
///
/// Unique violations become `Conflict`; a timeout becomes `Timeout`; all
/// other failures are `DatabaseError`.
pub(crate) async fn bounded<T, F>(operation: &'static str, query: F) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    bounded_within(QUERY_TIMEOUT, operation, query).await
}

async fn bounded_within<T, F>(limit: Duration, operation: &'static str, query: F) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, query).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(map_sqlx_error(operation, e)),
        Err(_) => Err(DomainError::new(
            ErrorCode::Timeout,
            format!("{} timed out after {}ms", operation, limit.as_millis()),
        )),
    }
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return DomainError::new(ErrorCode::Conflict, format!("{}: duplicate key", operation))
                .with_detail("constraint", db_err.constraint().unwrap_or_default());
        }
    }
    DomainError::database(format!("Failed to {}: {}", operation, err))
}

/// Maps a stored string that no longer parses into a `DatabaseError`.
pub(crate) fn corrupt(column: &str, value: &str) -> DomainError {
    DomainError::database(format!("Invalid {} value in database: {}", column, value))
}
