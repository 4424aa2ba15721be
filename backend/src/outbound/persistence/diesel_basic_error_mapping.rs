//! Shared Diesel error mapping for every repository adapter.

use tracing::debug;

use crate::domain::ports::RepositoryError;

use super::pool::PoolError;

/// Map pool failures to [`RepositoryError::Connection`].
pub(super) fn map_pool_error(error: PoolError) -> RepositoryError {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    RepositoryError::connection(message)
}

/// Map Diesel failures to repository errors.
///
/// Unique violations become [`RepositoryError::Duplicate`] carrying the
/// constraint name; closed connections become
/// [`RepositoryError::Connection`]; everything else is a query error.
pub(super) fn map_diesel_error(error: diesel::result::Error) -> RepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            RepositoryError::duplicate(info.constraint_name().unwrap_or("unique constraint"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RepositoryError::connection("database connection error")
        }
        DieselError::NotFound => RepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => RepositoryError::query("database query error"),
        _ => RepositoryError::query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    struct Info(Option<&'static str>);

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "violation"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.0
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info(constraint)))
    }

    #[rstest]
    fn unique_violation_names_constraint() {
        let err = map_diesel_error(database_error(
            DatabaseErrorKind::UniqueViolation,
            Some("relationships_pair_key"),
        ));
        assert_eq!(err, RepositoryError::duplicate("relationships_pair_key"));
    }

    #[rstest]
    #[case(DatabaseErrorKind::ClosedConnection, "Connection")]
    #[case(DatabaseErrorKind::ForeignKeyViolation, "Query")]
    #[case(DatabaseErrorKind::CheckViolation, "Query")]
    fn other_database_errors(#[case] kind: DatabaseErrorKind, #[case] expected: &str) {
        let err = map_diesel_error(database_error(kind, None));
        let variant = match err {
            RepositoryError::Connection { .. } => "Connection",
            RepositoryError::Query { .. } => "Query",
            RepositoryError::Duplicate { .. } => "Duplicate",
        };
        assert_eq!(variant, expected);
    }

    #[rstest]
    fn pool_errors_are_connection_failures() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, RepositoryError::connection("timed out"));
    }
}
