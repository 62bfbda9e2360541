//! Low-level SQLite interactions.
//!
//! Plain functions over a `&mut SqliteConnection` rather than stateful structs, so callers can
//! run them on a pooled connection or inside a transaction without changes.

use sqlx::{sqlite::SqlitePoolOptions, Error as SqlxError, SqlitePool};

pub mod orders;

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    Ok(pool)
}

/// Create the schema if it does not exist yet.
pub async fn create_schema(pool: &SqlitePool) -> Result<(), SqlxError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            order_id       TEXT NOT NULL UNIQUE,
            order_key      TEXT NOT NULL,
            customer_id    TEXT NOT NULL,
            payment_method TEXT NOT NULL,
            status         TEXT NOT NULL DEFAULT 'on-hold',
            memo           TEXT NOT NULL,
            asset          TEXT NOT NULL,
            amount         INTEGER NOT NULL,
            qr_ref         TEXT NOT NULL DEFAULT '',
            locked         BOOLEAN NOT NULL DEFAULT 0,
            checked        BOOLEAN NOT NULL DEFAULT 0,
            txid           TEXT,
            paid_at        TIMESTAMP,
            version        INTEGER NOT NULL DEFAULT 1,
            created_at     TIMESTAMP NOT NULL,
            updated_at     TIMESTAMP NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS order_notes (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            order_id   TEXT NOT NULL,
            note       TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}
