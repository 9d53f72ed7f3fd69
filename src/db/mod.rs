pub mod models;
pub mod repositories;

mod error;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::config;

pub use error::DatabaseError;

/// Initialize the database connection pool from the global config
pub async fn init_pool() -> Result<SqlitePool> {
    let config = config::get();
    connect_pool(
        &config.database.url,
        config.database.max_connections.unwrap_or(10),
    )
    .await
}

/// Connect to a SQLite database, enforce foreign keys, and run migrations
pub async fn connect_pool(url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
