//! Test database setup
#![allow(dead_code)]

use sea_orm::{DatabaseConnection, DbErr};
use std::env;

/// Connect to the test database and create the tables.
///
/// Uses TEST_DATABASE_URL when set, otherwise a fresh in-memory SQLite
/// database, so every test starts empty.
pub async fn setup_test_database() -> Result<DatabaseConnection, DbErr> {
    let database_url =
        env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());

    let db = ptv::db::connect(&database_url).await?;
    ptv::schema::create_tables(&db).await?;
    Ok(db)
}
