//! Shared test fixtures: an in-memory store, a pinned clock, and seed data.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

use velin_server::{
    clock::FixedClock,
    config::CirculationConfig,
    db,
    models::{member::CreateMember, title::CreateTitle, unit::CreateUnit},
    repository::Repository,
};

/// Per-day fine rate used throughout the suite, in cents.
pub const FINE_RATE_CENTS: i64 = 50;

/// "Day zero" for scenario tests; a fixed, boring Monday noon.
pub fn day_zero() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

pub fn test_config() -> CirculationConfig {
    CirculationConfig {
        default_loan_days: 21,
        fine_rate_cents_per_day: FINE_RATE_CENTS,
        max_renewal_extension_days: 28,
        max_renewals: None,
    }
}

/// One-connection in-memory SQLite pool with the schema applied.
///
/// A single connection keeps the in-memory database alive for the whole
/// test and serializes statements the way a small deployment would.
pub async fn memory_pool() -> Pool<Sqlite> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");

    db::init_schema(&pool).await.expect("failed to apply schema");

    pool
}

pub async fn setup() -> (Repository, Arc<FixedClock>) {
    setup_with_config(test_config()).await
}

pub async fn setup_with_config(config: CirculationConfig) -> (Repository, Arc<FixedClock>) {
    let pool = memory_pool().await;
    let clock = Arc::new(FixedClock::new(day_zero()));
    let repository = Repository::new(pool, clock.clone(), config);
    (repository, clock)
}

pub async fn seed_member(repo: &Repository, name: &str) -> i64 {
    repo.members
        .create(&CreateMember {
            name: name.to_string(),
            email: None,
        })
        .await
        .expect("failed to create member")
        .id
}

/// Create a title with `units` lendable copies; returns (title_id, unit_ids).
pub async fn seed_title(repo: &Repository, name: &str, units: usize) -> (i64, Vec<i64>) {
    let title = repo
        .titles
        .create(&CreateTitle {
            title: name.to_string(),
            author: Some("Test Author".to_string()),
            genre: None,
            publication_year: Some(1999),
        })
        .await
        .expect("failed to create title");

    let mut unit_ids = Vec::with_capacity(units);
    for n in 0..units {
        let unit = repo
            .units
            .create(
                title.id,
                &CreateUnit {
                    barcode: Some(format!("{}-{}", title.id, n + 1)),
                    condition_note: None,
                    location: None,
                },
            )
            .await
            .expect("failed to create unit");
        unit_ids.push(unit.id);
    }

    (title.id, unit_ids)
}

/// Assert the core invariant: a unit's flag agrees with the open side of
/// the borrowing ledger.
pub async fn assert_flag_matches_ledger(repo: &Repository, unit_id: i64) {
    let unit = repo.units.get_by_id(unit_id).await.expect("unit must exist");

    let open_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM borrowings WHERE unit_id = ? AND return_date IS NULL",
    )
    .bind(unit_id)
    .fetch_one(&repo.pool)
    .await
    .expect("count query failed");

    assert!(
        open_count <= 1,
        "unit {} has {} open borrowings",
        unit_id,
        open_count
    );
    assert_eq!(
        unit.on_loan,
        open_count == 1,
        "unit {} flag ({}) disagrees with ledger ({} open)",
        unit_id,
        unit.on_loan,
        open_count
    );
}
