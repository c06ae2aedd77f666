use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::time::Duration;

use crate::models::table::KnownTable;

pub mod officer_store;
pub mod table_store;

pub use officer_store::OfficerStore;
pub use table_store::TableStore;

pub type DbPool = Pool<Sqlite>;

/// Initialize the database connection pool
pub async fn init_db_pool(database_url: &str) -> Result<DbPool> {
    // Create the database if it doesn't exist
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        Sqlite::create_database(database_url).await?;
    }

    // Create connection pool
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?;

    setup_database(&pool).await?;

    Ok(pool)
}

/// Set up the database schema
pub(crate) async fn setup_database(pool: &DbPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS inventory_officers (
            batch_number TEXT PRIMARY KEY NOT NULL,
            name TEXT,
            password_hash TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    for table in KnownTable::ALL {
        sqlx::query(table.create_table()).execute(pool).await?;
    }

    // Seed one officer if the table is empty, so a fresh install is usable
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM inventory_officers")
        .fetch_one(pool)
        .await?;

    if count.0 == 0 {
        sqlx::query(
            "INSERT INTO inventory_officers (batch_number, name, password_hash) VALUES (?, ?, ?)",
        )
        .bind("OFF-1001")
        .bind("Duty Officer")
        .bind(officer_store::hash_password("changeme"))
        .execute(pool)
        .await?;

        tracing::warn!("seeded default officer OFF-1001; change its password before going live");
    }

    Ok(())
}
