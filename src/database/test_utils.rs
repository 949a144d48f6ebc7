use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::database::migrations::Migrator;
use sea_orm_migration::MigratorTrait;

/// In-memory SQLite pinned to a single connection so every query sees the
/// same database.
pub async fn setup_test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_string());
    opts.max_connections(1);

    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}
