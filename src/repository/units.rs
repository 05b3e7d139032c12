//! Units repository: the inventory side of the borrowing engine.
//!
//! A unit's `on_loan` flag must always agree with the borrowing ledger
//! ("no open borrowing references this unit" iff the flag is clear). The
//! flag flips themselves are idempotent; the borrowing repository performs
//! them inside its checkout/return transactions so the two writes cannot
//! come apart.

use std::sync::Arc;

use sqlx::{Pool, Sqlite};

use crate::{
    clock::Clock,
    error::{AppError, AppResult},
    models::{
        title::TitleAvailability,
        unit::{CreateUnit, Unit},
    },
};

#[derive(Clone)]
pub struct UnitsRepository {
    pool: Pool<Sqlite>,
    clock: Arc<dyn Clock>,
}

impl UnitsRepository {
    pub fn new(pool: Pool<Sqlite>, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Get unit by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Unit> {
        sqlx::query_as::<_, Unit>("SELECT * FROM units WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Unit with id {} not found", id)))
    }

    /// List all units of a title
    pub async fn list_by_title(&self, title_id: i64) -> AppResult<Vec<Unit>> {
        self.require_title(title_id).await?;

        let units =
            sqlx::query_as::<_, Unit>("SELECT * FROM units WHERE title_id = ? ORDER BY id")
                .bind(title_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(units)
    }

    /// Select one available unit of a title, lowest id first.
    ///
    /// `NoCopiesAvailable` is an expected outcome (everything is out on
    /// loan), not a failure of the store.
    pub async fn find_available(&self, title_id: i64) -> AppResult<Unit> {
        self.require_title(title_id).await?;

        sqlx::query_as::<_, Unit>(
            r#"
            SELECT * FROM units
            WHERE title_id = ? AND active = 1 AND on_loan = 0
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(title_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::NoCopiesAvailable(format!("No available unit for title {}", title_id))
        })
    }

    /// Flag a unit as out on loan. Idempotent.
    pub async fn mark_on_loan(&self, unit_id: i64) -> AppResult<()> {
        self.set_on_loan(unit_id, true).await
    }

    /// Flag a unit as back on the shelf. Idempotent.
    pub async fn mark_available(&self, unit_id: i64) -> AppResult<()> {
        self.set_on_loan(unit_id, false).await
    }

    async fn set_on_loan(&self, unit_id: i64, on_loan: bool) -> AppResult<()> {
        let updated = sqlx::query("UPDATE units SET on_loan = ?, updated_at = ? WHERE id = ?")
            .bind(on_loan)
            .bind(self.clock.now())
            .bind(unit_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if updated == 0 {
            return Err(AppError::NotFound(format!(
                "Unit with id {} not found",
                unit_id
            )));
        }

        Ok(())
    }

    /// Create a new unit under a title
    pub async fn create(&self, title_id: i64, unit: &CreateUnit) -> AppResult<Unit> {
        self.require_title(title_id).await?;

        let now = self.clock.now();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO units (title_id, barcode, condition_note, location, on_loan, active, created_at, updated_at)
            VALUES (?, ?, ?, ?, 0, 1, ?, ?)
            RETURNING id
            "#,
        )
        .bind(title_id)
        .bind(&unit.barcode)
        .bind(&unit.condition_note)
        .bind(&unit.location)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Take a unit out of circulation. Units are never deleted, so their
    /// borrowing history stays resolvable.
    pub async fn deactivate(&self, unit_id: i64) -> AppResult<()> {
        let unit = self.get_by_id(unit_id).await?;

        if unit.on_loan {
            return Err(AppError::BadRequest(format!(
                "Unit {} is out on loan and cannot be deactivated",
                unit_id
            )));
        }

        sqlx::query("UPDATE units SET active = 0, updated_at = ? WHERE id = ?")
            .bind(self.clock.now())
            .bind(unit_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Inventory summary for a title
    pub async fn availability(&self, title_id: i64) -> AppResult<TitleAvailability> {
        self.require_title(title_id).await?;

        let availability = sqlx::query_as::<_, TitleAvailability>(
            r#"
            SELECT
                ? AS title_id,
                COUNT(*) AS total_units,
                COALESCE(SUM(CASE WHEN on_loan = 0 THEN 1 ELSE 0 END), 0) AS available_units
            FROM units
            WHERE title_id = ? AND active = 1
            "#,
        )
        .bind(title_id)
        .bind(title_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(availability)
    }

    async fn require_title(&self, title_id: i64) -> AppResult<()> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM titles WHERE id = ?)")
            .bind(title_id)
            .fetch_one(&self.pool)
            .await?;

        if !exists {
            return Err(AppError::NotFound(format!(
                "Title with id {} not found",
                title_id
            )));
        }

        Ok(())
    }
}
