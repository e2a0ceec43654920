use crate::domain_port::StoreError;
use sqlx::error::ErrorKind;

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.kind() == ErrorKind::UniqueViolation,
        _ => false,
    }
}

pub fn store_error(err: sqlx::Error) -> StoreError {
    if is_unique_violation(&err) {
        let message = err
            .as_database_error()
            .map(|db| db.message().to_string())
            .unwrap_or_default();
        return StoreError::UniqueViolation(message);
    }

    StoreError::Backend(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::DatabaseError;
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    #[derive(Debug)]
    struct TestDbError {
        unique: bool,
    }

    impl fmt::Display for TestDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "test database error")
        }
    }

    impl StdError for TestDbError {}

    impl DatabaseError for TestDbError {
        fn message(&self) -> &str {
            "UNIQUE constraint failed: user.username"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed("2067"))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            if self.unique {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::Other
            }
        }
    }

    #[test]
    fn unique_violation_is_detected_by_kind() {
        let err = sqlx::Error::Database(Box::new(TestDbError { unique: true }));
        assert!(is_unique_violation(&err));
        assert!(matches!(
            store_error(err),
            StoreError::UniqueViolation(m) if m.contains("user.username")
        ));

        let err = sqlx::Error::Database(Box::new(TestDbError { unique: false }));
        assert!(!is_unique_violation(&err));
        assert!(matches!(store_error(err), StoreError::Backend(_)));

        let err = sqlx::Error::RowNotFound;
        assert!(!is_unique_violation(&err));
        assert!(matches!(store_error(err), StoreError::Backend(_)));
    }
}
