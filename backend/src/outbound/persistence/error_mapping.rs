//! Shared classification of Diesel and pool failures.
//!
//! Repositories turn a [`DieselFailure`] into their own port error, choosing
//! what a constraint violation means for the operation at hand.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Storage failure reduced to the cases repositories distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    UniqueViolation { constraint: Option<String> },
    ForeignKeyViolation { constraint: Option<String> },
    CheckViolation { constraint: Option<String> },
    Connection(&'static str),
    Query(&'static str),
}

/// Extract a readable message from a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error and emit debug context.
pub(crate) fn classify(error: &DieselError) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(kind, info) => {
            let constraint = info.constraint_name().map(str::to_owned);
            match kind {
                DatabaseErrorKind::UniqueViolation => {
                    DieselFailure::UniqueViolation { constraint }
                }
                DatabaseErrorKind::ForeignKeyViolation => {
                    DieselFailure::ForeignKeyViolation { constraint }
                }
                DatabaseErrorKind::CheckViolation => DieselFailure::CheckViolation { constraint },
                DatabaseErrorKind::ClosedConnection => {
                    DieselFailure::Connection("database connection error")
                }
                _ => DieselFailure::Query("database error"),
            }
        }
        _ => DieselFailure::Query("database error"),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for Diesel failure classification.
    use super::*;
    use rstest::rstest;

    #[derive(Debug)]
    struct Info(Option<&'static str>);

    impl diesel::result::DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "constraint failed"
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
    fn unique_violations_keep_the_constraint_name() {
        let failure = classify(&database_error(
            DatabaseErrorKind::UniqueViolation,
            Some("favorites_user_recipe_key"),
        ));
        assert_eq!(
            failure,
            DieselFailure::UniqueViolation {
                constraint: Some("favorites_user_recipe_key".to_owned())
            }
        );
    }

    #[rstest]
    #[case(database_error(DatabaseErrorKind::ClosedConnection, None), DieselFailure::Connection("database connection error"))]
    #[case(DieselError::NotFound, DieselFailure::Query("record not found"))]
    #[case(database_error(DatabaseErrorKind::SerializationFailure, None), DieselFailure::Query("database error"))]
    fn other_failures_reduce_to_connection_or_query(
        #[case] error: DieselError,
        #[case] expected: DieselFailure,
    ) {
        assert_eq!(classify(&error), expected);
    }

    #[rstest]
    fn pool_errors_yield_their_message() {
        assert_eq!(pool_error_message(PoolError::checkout("timed out")), "timed out");
    }
}
