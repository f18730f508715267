//! # SQLite database methods
//!
//! "Low-level" SQLite interactions live here, as plain functions taking a `&mut SqliteConnection`. Callers
//! obtain a connection from a pool, or open a transaction when several writes must land atomically, and call
//! through without any other changes.
use std::env;

use log::info;
use sqlx::{sqlite::SqlitePoolOptions, Error as SqlxError, SqlitePool};

pub mod orders;
pub mod shipping;

const SQLITE_DB_URL: &str = "sqlite://data/osync.db";

pub fn db_url() -> String {
    let result = env::var("OSYNC_DATABASE_URL").unwrap_or_else(|_| {
        info!("OSYNC_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    Ok(pool)
}
