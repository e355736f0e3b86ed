//! Database layer: pool construction, error categorization, and one
//! repository per resource.

use std::str::FromStr;

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};

pub mod errors;
pub mod handlers;
pub mod models;

/// Open the application pool.
///
/// Foreign-key enforcement is off by default in SQLite and must be switched
/// on per connection; the connect options apply it to every pooled
/// connection. WAL keeps readers from blocking writers.
pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}
