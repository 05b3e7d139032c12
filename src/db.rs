//! SQLite pool setup and schema bootstrap.
//!
//! The schema is created with idempotent statements at startup, so a fresh
//! database file (or an in-memory database in tests) is usable immediately.

use std::str::FromStr;
use std::time::Duration;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Pool, Sqlite,
};

use crate::error::AppResult;

/// Connect to the database and ensure the schema exists.
pub async fn connect(url: &str, max_connections: u32) -> AppResult<Pool<Sqlite>> {
    let options = SqliteConnectOptions::from_str(url)
        .map_err(sqlx::Error::from)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes if they do not exist yet.
pub async fn init_schema(pool: &Pool<Sqlite>) -> AppResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS members (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT,
            fine_balance_cents INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS titles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT,
            genre TEXT,
            publication_year INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS units (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title_id INTEGER NOT NULL,
            barcode TEXT UNIQUE,
            condition_note TEXT,
            location TEXT,
            on_loan INTEGER NOT NULL DEFAULT 0,
            active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (title_id) REFERENCES titles(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_units_title_id ON units(title_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS borrowings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_id INTEGER NOT NULL,
            unit_id INTEGER NOT NULL,
            title_id INTEGER NOT NULL,
            checkout_date TEXT NOT NULL,
            due_date TEXT NOT NULL,
            return_date TEXT,
            returned_by INTEGER,
            fine_cents INTEGER,
            renewal_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            FOREIGN KEY (member_id) REFERENCES members(id),
            FOREIGN KEY (unit_id) REFERENCES units(id),
            FOREIGN KEY (title_id) REFERENCES titles(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_borrowings_member_id ON borrowings(member_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_borrowings_unit_id ON borrowings(unit_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_borrowings_return_date ON borrowings(return_date)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS renewal_requests (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            borrowing_id INTEGER NOT NULL,
            member_id INTEGER NOT NULL,
            extension_days INTEGER NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            reviewer_id INTEGER,
            review_date TEXT,
            review_notes TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY (borrowing_id) REFERENCES borrowings(id),
            FOREIGN KEY (member_id) REFERENCES members(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_renewal_requests_borrowing_id ON renewal_requests(borrowing_id)",
    )
    .execute(pool)
    .await?;

    // One pending request per borrowing, enforced by the store itself.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_renewal_requests_one_pending
        ON renewal_requests(borrowing_id) WHERE status = 'pending'
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
