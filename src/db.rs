//! Global database connection

use once_cell::sync::OnceCell;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;

static DB_POOL: OnceCell<DatabaseConnection> = OnceCell::new();

/// Open a connection pool for `database_url`.
///
/// In-memory SQLite databases live and die with their connection, so they are
/// pinned to a single one.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    if database_url.starts_with("sqlite::memory:") {
        options.max_connections(1).min_connections(1);
    } else {
        options.max_connections(16);
    }

    Database::connect(options).await
}

/// Initialize the global pool.
/// Panics if the database is unreachable or the pool was already set.
pub async fn init_db(database_url: String) {
    let db = connect(&database_url)
        .await
        .expect("Failed to connect to database.");
    DB_POOL
        .set(db)
        .expect("Database pool was already initialized.");
}

/// Panics if [`init_db`] has not run.
pub fn get_db_pool() -> &'static DatabaseConnection {
    DB_POOL.get().expect("Database pool is not initialized.")
}
