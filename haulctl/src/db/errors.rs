//! Unified error type for database operations that application code can handle.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// Entity not found by the given identifier
    #[error("Entity not found")]
    NotFound,

    /// Unique constraint violation
    #[error("Unique constraint violation")]
    UniqueViolation {
        table: Option<String>,
        column: Option<String>,
        message: String,
    },

    /// Foreign key constraint violation; either raised by the database or by
    /// an explicit existence probe before a write.
    #[error("Foreign key constraint violation")]
    ForeignKeyViolation { message: String },

    /// Check constraint violation
    #[error("Check constraint violation")]
    CheckViolation { message: String },

    /// Catch-all for non-recoverable errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convert from sqlx::Error using sqlx's error categorization
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    // SQLite names the violated column in its diagnostic:
                    // "UNIQUE constraint failed: bank_accounts.card_number"
                    let message = db_err.message().to_string();
                    let (table, column) = parse_unique_violation(&message);
                    DbError::UniqueViolation { table, column, message }
                } else if db_err.is_foreign_key_violation() {
                    DbError::ForeignKeyViolation {
                        message: db_err.message().to_string(),
                    }
                } else if db_err.is_check_violation() {
                    DbError::CheckViolation {
                        message: db_err.message().to_string(),
                    }
                } else {
                    DbError::Other(anyhow::Error::from(err))
                }
            }
            _ => DbError::Other(anyhow::Error::from(err)),
        }
    }
}

/// Extract the violated (table, column) pair from SQLite's unique-violation
/// diagnostic. When several columns collide at once SQLite lists them
/// comma-separated; the first one is attributed.
fn parse_unique_violation(message: &str) -> (Option<String>, Option<String>) {
    let Some(rest) = message.strip_prefix("UNIQUE constraint failed: ") else {
        return (None, None);
    };
    let first = rest.split(',').next().unwrap_or(rest).trim();
    match first.split_once('.') {
        Some((table, column)) => (Some(table.to_string()), Some(column.to_string())),
        None => (None, Some(first.to_string())),
    }
}

/// Type alias for database operation results
pub type Result<T> = std::result::Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_column_violation() {
        let (table, column) = parse_unique_violation("UNIQUE constraint failed: bank_accounts.card_number");
        assert_eq!(table.as_deref(), Some("bank_accounts"));
        assert_eq!(column.as_deref(), Some("card_number"));
    }

    #[test]
    fn attributes_first_of_multiple_columns() {
        let (table, column) = parse_unique_violation("UNIQUE constraint failed: drivers.phone_number, drivers.national_id");
        assert_eq!(table.as_deref(), Some("drivers"));
        assert_eq!(column.as_deref(), Some("phone_number"));
    }

    #[test]
    fn unknown_message_yields_no_attribution() {
        let (table, column) = parse_unique_violation("something else entirely");
        assert_eq!(table, None);
        assert_eq!(column, None);
    }
}
