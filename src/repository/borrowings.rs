//! Borrowings repository: the checkout/return ledger.
//!
//! Checkout and return each touch two tables (the borrowing row and the
//! unit flag; return also posts the fine). Both writes run in one SQLite
//! transaction, and the whole read-decide-write sequence holds a per-title
//! async mutex, so two operations racing on the same title serialize as
//! whole operations rather than statement by statement. That is what keeps
//! a unit from ever carrying two open borrowings, or sitting "available"
//! with one still open.

use std::sync::Arc;

use chrono::Duration;
use dashmap::DashMap;
use sqlx::{Pool, Row, Sqlite};
use tokio::sync::Mutex;

use crate::{
    clock::Clock,
    config::CirculationConfig,
    error::{AppError, AppResult},
    fines,
    models::borrowing::{AccruedFine, Borrowing, BorrowingDetails, ReturnOutcome},
    repository::units::UnitsRepository,
};

#[derive(Clone)]
pub struct BorrowingsRepository {
    pool: Pool<Sqlite>,
    clock: Arc<dyn Clock>,
    config: CirculationConfig,
    units: UnitsRepository,
    title_locks: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl BorrowingsRepository {
    pub fn new(
        pool: Pool<Sqlite>,
        clock: Arc<dyn Clock>,
        config: CirculationConfig,
        units: UnitsRepository,
    ) -> Self {
        Self {
            pool,
            clock,
            config,
            units,
            title_locks: Arc::new(DashMap::new()),
        }
    }

    /// Get borrowing by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Borrowing> {
        sqlx::query_as::<_, Borrowing>("SELECT * FROM borrowings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrowing with id {} not found", id)))
    }

    /// Check out one available unit of a title to a member.
    ///
    /// Falls back to the configured default loan period when `loan_days`
    /// is not given.
    pub async fn checkout(
        &self,
        member_id: i64,
        title_id: i64,
        loan_days: Option<i64>,
    ) -> AppResult<Borrowing> {
        let loan_days = loan_days.unwrap_or(self.config.default_loan_days);

        let member_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM members WHERE id = ?)")
                .bind(member_id)
                .fetch_one(&self.pool)
                .await?;
        if !member_exists {
            return Err(AppError::NotFound(format!(
                "Member with id {} not found",
                member_id
            )));
        }

        let lock = self.title_lock(title_id);
        let _guard = lock.lock().await;

        // Under the lock this read is stable until our writes commit.
        let unit = self.units.find_available(title_id).await?;

        let now = self.clock.now();
        let due_date = now + Duration::days(loan_days);

        let mut tx = self.pool.begin().await?;

        let borrowing_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO borrowings (member_id, unit_id, title_id, checkout_date, due_date, renewal_count, created_at)
            VALUES (?, ?, ?, ?, ?, 0, ?)
            RETURNING id
            "#,
        )
        .bind(member_id)
        .bind(unit.id)
        .bind(title_id)
        .bind(now)
        .bind(due_date)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE units SET on_loan = 1, updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(unit.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            borrowing_id,
            member_id,
            title_id,
            unit_id = unit.id,
            %due_date,
            "checkout"
        );

        self.get_by_id(borrowing_id).await
    }

    /// Return a borrowed unit: close the ledger row, settle the fine,
    /// release the unit, and post the fine to the member balance.
    pub async fn return_item(
        &self,
        borrowing_id: i64,
        operator_id: i64,
    ) -> AppResult<ReturnOutcome> {
        let borrowing = self.get_by_id(borrowing_id).await?;
        if !borrowing.is_open() {
            return Err(AppError::AlreadyReturned(format!(
                "Borrowing {} was already returned",
                borrowing_id
            )));
        }

        let lock = self.title_lock(borrowing.title_id);
        let _guard = lock.lock().await;

        // Re-read under the lock: an approved renewal may have moved the
        // due date since the first fetch.
        let borrowing = self.get_by_id(borrowing_id).await?;
        if !borrowing.is_open() {
            return Err(AppError::AlreadyReturned(format!(
                "Borrowing {} was already returned",
                borrowing_id
            )));
        }

        let now = self.clock.now();
        let days_overdue = fines::days_overdue(borrowing.due_date, now);
        let fine_cents = fines::fine_cents(
            borrowing.due_date,
            now,
            self.config.fine_rate_cents_per_day,
        );

        let mut tx = self.pool.begin().await?;

        // The NULL guard makes the close exactly-once even if a racing
        // return slipped past the checks above.
        let closed = sqlx::query(
            r#"
            UPDATE borrowings
            SET return_date = ?, returned_by = ?, fine_cents = ?
            WHERE id = ? AND return_date IS NULL
            "#,
        )
        .bind(now)
        .bind(operator_id)
        .bind(fine_cents)
        .bind(borrowing_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if closed == 0 {
            return Err(AppError::AlreadyReturned(format!(
                "Borrowing {} was already returned",
                borrowing_id
            )));
        }

        sqlx::query("UPDATE units SET on_loan = 0, updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(borrowing.unit_id)
            .execute(&mut *tx)
            .await?;

        if fine_cents > 0 {
            sqlx::query(
                "UPDATE members SET fine_balance_cents = fine_balance_cents + ?, updated_at = ? WHERE id = ?",
            )
            .bind(fine_cents)
            .bind(now)
            .bind(borrowing.member_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            borrowing_id,
            unit_id = borrowing.unit_id,
            member_id = borrowing.member_id,
            operator_id,
            days_overdue,
            fine_cents,
            "return"
        );

        Ok(ReturnOutcome {
            borrowing_id,
            unit_id: borrowing.unit_id,
            returned_at: now,
            days_overdue,
            fine_amount: fines::to_amount(fine_cents),
        })
    }

    /// Active borrowings of a member
    pub async fn list_active(&self, member_id: i64) -> AppResult<Vec<BorrowingDetails>> {
        let now = self.clock.now();

        let rows = sqlx::query(
            r#"
            SELECT b.id, b.member_id, b.unit_id, b.title_id, t.title, u.barcode,
                   b.checkout_date, b.due_date, b.renewal_count
            FROM borrowings b
            JOIN titles t ON b.title_id = t.id
            JOIN units u ON b.unit_id = u.id
            WHERE b.member_id = ? AND b.return_date IS NULL
            ORDER BY b.due_date
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let due_date = row.get("due_date");
                BorrowingDetails {
                    id: row.get("id"),
                    member_id: row.get("member_id"),
                    unit_id: row.get("unit_id"),
                    title_id: row.get("title_id"),
                    title: row.get("title"),
                    unit_barcode: row.get("barcode"),
                    checkout_date: row.get("checkout_date"),
                    due_date,
                    renewal_count: row.get("renewal_count"),
                    is_overdue: due_date < now,
                }
            })
            .collect())
    }

    /// All open borrowings past their due date
    pub async fn list_overdue(&self) -> AppResult<Vec<BorrowingDetails>> {
        let now = self.clock.now();

        let rows = sqlx::query(
            r#"
            SELECT b.id, b.member_id, b.unit_id, b.title_id, t.title, u.barcode,
                   b.checkout_date, b.due_date, b.renewal_count
            FROM borrowings b
            JOIN titles t ON b.title_id = t.id
            JOIN units u ON b.unit_id = u.id
            WHERE b.return_date IS NULL AND b.due_date < ?
            ORDER BY b.due_date
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let due_date = row.get("due_date");
                BorrowingDetails {
                    id: row.get("id"),
                    member_id: row.get("member_id"),
                    unit_id: row.get("unit_id"),
                    title_id: row.get("title_id"),
                    title: row.get("title"),
                    unit_barcode: row.get("barcode"),
                    checkout_date: row.get("checkout_date"),
                    due_date,
                    renewal_count: row.get("renewal_count"),
                    is_overdue: true,
                }
            })
            .collect())
    }

    /// Open borrowings coming due within the next `days` days
    pub async fn list_due_within(&self, days: i64) -> AppResult<Vec<BorrowingDetails>> {
        let now = self.clock.now();
        let window_end = now + Duration::days(days);

        let rows = sqlx::query(
            r#"
            SELECT b.id, b.member_id, b.unit_id, b.title_id, t.title, u.barcode,
                   b.checkout_date, b.due_date, b.renewal_count
            FROM borrowings b
            JOIN titles t ON b.title_id = t.id
            JOIN units u ON b.unit_id = u.id
            WHERE b.return_date IS NULL AND b.due_date >= ? AND b.due_date <= ?
            ORDER BY b.due_date
            "#,
        )
        .bind(now)
        .bind(window_end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let due_date = row.get("due_date");
                BorrowingDetails {
                    id: row.get("id"),
                    member_id: row.get("member_id"),
                    unit_id: row.get("unit_id"),
                    title_id: row.get("title_id"),
                    title: row.get("title"),
                    unit_barcode: row.get("barcode"),
                    checkout_date: row.get("checkout_date"),
                    due_date,
                    renewal_count: row.get("renewal_count"),
                    is_overdue: false,
                }
            })
            .collect())
    }

    /// Fine owed on a borrowing right now; display-only, never mutates.
    pub async fn accrued_fine(&self, borrowing_id: i64) -> AppResult<AccruedFine> {
        let borrowing = self.get_by_id(borrowing_id).await?;

        match borrowing.return_date {
            Some(returned) => Ok(AccruedFine {
                borrowing_id,
                settled: true,
                days_overdue: fines::days_overdue(borrowing.due_date, returned),
                fine_amount: fines::to_amount(borrowing.fine_cents.unwrap_or(0)),
            }),
            None => {
                let now = self.clock.now();
                Ok(AccruedFine {
                    borrowing_id,
                    settled: false,
                    days_overdue: fines::days_overdue(borrowing.due_date, now),
                    fine_amount: fines::to_amount(fines::fine_cents(
                        borrowing.due_date,
                        now,
                        self.config.fine_rate_cents_per_day,
                    )),
                })
            }
        }
    }

    /// Count active borrowings
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM borrowings WHERE return_date IS NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Count overdue borrowings
    pub async fn count_overdue(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrowings WHERE return_date IS NULL AND due_date < ?",
        )
        .bind(self.clock.now())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    fn title_lock(&self, title_id: i64) -> Arc<Mutex<()>> {
        // Clone the Arc out so the map shard is released before awaiting.
        self.title_locks
            .entry(title_id)
            .or_insert_with(Default::default)
            .value()
            .clone()
    }
}
