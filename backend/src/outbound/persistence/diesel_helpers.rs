//! Error mapping and SQL helpers shared by the Diesel adapter.

use tracing::debug;

use crate::domain::ports::DocumentStoreError;

use super::pool::PoolError;

/// Map pool failures to connection errors.
pub fn map_pool_error(error: PoolError) -> DocumentStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            DocumentStoreError::connection(message)
        }
    }
}

/// Map Diesel failures, treating lost connections as connection errors.
pub fn map_diesel_error(error: diesel::result::Error, operation: &str) -> DocumentStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        _ => debug!(%error, %operation, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::DatabaseError(DatabaseErrorKind::UnableToSendCommand, _)
        | DieselError::BrokenTransactionManager => {
            DocumentStoreError::connection(format!("{operation}: database connection error"))
        }
        DieselError::DeserializationError(err) | DieselError::SerializationError(err) => {
            DocumentStoreError::query(format!("{operation}: {err}"))
        }
        _ => DocumentStoreError::query(format!("{operation}: database error")),
    }
}

/// Escape `needle` for use inside an `ILIKE` pattern and wrap it in `%`.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Split a dotted field path into the segments used by `#>` and `#>>`.
pub fn json_path(path: &str) -> Vec<String> {
    path.split('.').map(str::to_owned).collect()
}
