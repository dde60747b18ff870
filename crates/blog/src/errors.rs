use sqlx::error::ErrorKind;
use sqlx::migrate::MigrateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error")]
    Database(#[source] sqlx::Error),

    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("Foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    #[error("Migration error")]
    Migrate(#[from] MigrateError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Not found")]
    NotFound,
}

impl DbError {
    /// True for errors caused by a constraint the schema enforces.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. }
        )
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            match db_err.kind() {
                ErrorKind::UniqueViolation => return DbError::UniqueViolation { constraint },
                ErrorKind::ForeignKeyViolation => {
                    return DbError::ForeignKeyViolation { constraint };
                }
                _ => {}
            }
        }
        DbError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_stays_database_error() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::Database(sqlx::Error::RowNotFound)));
        assert!(!err.is_constraint_violation());
    }

    #[test]
    fn test_driver_error_reported_once_in_chain() {
        let err = DbError::from(sqlx::Error::PoolClosed);
        assert!(std::error::Error::source(&err).is_some());

        let driver = sqlx::Error::PoolClosed.to_string();
        let chain = format!("{:#}", anyhow::Error::from(err));
        assert!(chain.starts_with("Database error: "), "{chain}");
        assert_eq!(chain.matches(&driver).count(), 1, "{chain}");
    }

    #[test]
    fn test_constraint_violation_display() {
        let err = DbError::UniqueViolation {
            constraint: "users_username_key".to_string(),
        };
        assert!(err.is_constraint_violation());
        assert_eq!(
            err.to_string(),
            "Unique constraint violated: users_username_key"
        );
    }
}
