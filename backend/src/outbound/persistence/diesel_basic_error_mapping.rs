//! Shared Diesel error mapping for the repository adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map common Diesel error variants into query/connection constructors.
///
/// Raw database messages are logged at `debug` and never forwarded, so the
/// resulting port errors carry stable, non-sensitive text.
pub fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}

/// Report whether `error` is a unique violation on the named constraint.
///
/// When the driver does not report a constraint name, any unique violation
/// matches.
pub fn is_unique_violation(error: &DieselError, constraint: &str) -> bool {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => info
            .constraint_name()
            .is_none_or(|name| name == constraint),
        _ => false,
    }
}

/// Failure inside a repository transaction.
///
/// `Rejected` carries a port error decided by the adapter (for example a
/// status conflict) and rolls the transaction back like any database error.
#[derive(Debug)]
pub enum TransactionFailure<E> {
    Database(DieselError),
    Rejected(E),
}

impl<E> From<DieselError> for TransactionFailure<E> {
    fn from(error: DieselError) -> Self {
        Self::Database(error)
    }
}

impl<E> TransactionFailure<E> {
    /// Collapse into the port error, mapping database failures with `map`.
    pub fn into_port_error(self, map: impl FnOnce(DieselError) -> E) -> E {
        match self {
            Self::Database(error) => map(error),
            Self::Rejected(error) => error,
        }
    }
}

/// Convert a `COUNT(*)` result into an unsigned count.
pub fn count_from_sql<E>(value: i64, query: impl FnOnce(String) -> E) -> Result<u64, E> {
    u64::try_from(value).map_err(|_| query(format!("negative count returned: {value}")))
}
