//! Renewal requests repository: the due-date extension workflow.
//!
//! A request is PENDING until a reviewer resolves it. Approval extends the
//! parent borrowing's due date; rejection stamps the request only. Either
//! way the request is terminal afterwards. Inventory is never touched.

use std::sync::Arc;

use chrono::Duration;
use sqlx::{Pool, Sqlite};

use crate::{
    clock::Clock,
    config::CirculationConfig,
    error::{AppError, AppResult},
    models::{
        borrowing::Borrowing,
        renewal::{RenewalDecision, RenewalRequest, RenewalStatus},
    },
};

#[derive(Clone)]
pub struct RenewalsRepository {
    pool: Pool<Sqlite>,
    clock: Arc<dyn Clock>,
    config: CirculationConfig,
}

impl RenewalsRepository {
    pub fn new(pool: Pool<Sqlite>, clock: Arc<dyn Clock>, config: CirculationConfig) -> Self {
        Self {
            pool,
            clock,
            config,
        }
    }

    /// Get renewal request by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<RenewalRequest> {
        sqlx::query_as::<_, RenewalRequest>("SELECT * FROM renewal_requests WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Renewal request with id {} not found", id))
            })
    }

    /// All pending requests, oldest first (the reviewer queue)
    pub async fn list_pending(&self) -> AppResult<Vec<RenewalRequest>> {
        let requests = sqlx::query_as::<_, RenewalRequest>(
            "SELECT * FROM renewal_requests WHERE status = 'pending' ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// File a renewal request against an open borrowing.
    pub async fn request(
        &self,
        borrowing_id: i64,
        member_id: i64,
        extension_days: i64,
    ) -> AppResult<RenewalRequest> {
        let borrowing = self.fetch_open_borrowing(borrowing_id).await?;

        if borrowing.member_id != member_id {
            return Err(AppError::Validation(format!(
                "Borrowing {} does not belong to member {}",
                borrowing_id, member_id
            )));
        }

        if extension_days < 1 || extension_days > self.config.max_renewal_extension_days {
            return Err(AppError::Validation(format!(
                "Extension must be between 1 and {} days",
                self.config.max_renewal_extension_days
            )));
        }

        let pending_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM renewal_requests WHERE borrowing_id = ? AND status = 'pending')",
        )
        .bind(borrowing_id)
        .fetch_one(&self.pool)
        .await?;
        if pending_exists {
            return Err(AppError::AlreadyPending(format!(
                "Borrowing {} already has a pending renewal request",
                borrowing_id
            )));
        }

        // A partial unique index backstops the check above against races.
        let inserted = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO renewal_requests (borrowing_id, member_id, extension_days, status, created_at)
            VALUES (?, ?, ?, 'pending', ?)
            RETURNING id
            "#,
        )
        .bind(borrowing_id)
        .bind(member_id)
        .bind(extension_days)
        .bind(self.clock.now())
        .fetch_one(&self.pool)
        .await;

        let id = match inserted {
            Ok(id) => id,
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(AppError::AlreadyPending(format!(
                    "Borrowing {} already has a pending renewal request",
                    borrowing_id
                )));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(renewal_id = id, borrowing_id, member_id, extension_days, "renewal requested");

        self.get_by_id(id).await
    }

    /// Resolve a pending request. Terminal either way.
    pub async fn resolve(
        &self,
        renewal_id: i64,
        reviewer_id: i64,
        decision: RenewalDecision,
        notes: Option<String>,
    ) -> AppResult<RenewalRequest> {
        let request = self.get_by_id(renewal_id).await?;

        if request.status != RenewalStatus::Pending {
            return Err(AppError::AlreadyResolved(format!(
                "Renewal request {} was already resolved",
                renewal_id
            )));
        }

        let now = self.clock.now();

        match decision {
            RenewalDecision::Rejected => {
                let resolved = sqlx::query(
                    r#"
                    UPDATE renewal_requests
                    SET status = 'rejected', reviewer_id = ?, review_date = ?, review_notes = ?
                    WHERE id = ? AND status = 'pending'
                    "#,
                )
                .bind(reviewer_id)
                .bind(now)
                .bind(&notes)
                .bind(renewal_id)
                .execute(&self.pool)
                .await?
                .rows_affected();

                if resolved == 0 {
                    return Err(AppError::AlreadyResolved(format!(
                        "Renewal request {} was already resolved",
                        renewal_id
                    )));
                }
            }
            RenewalDecision::Approved => {
                // The parent borrowing must still be open; approving a
                // renewal must never mutate a closed row.
                let borrowing = self.fetch_open_borrowing(request.borrowing_id).await?;

                if let Some(max) = self.config.max_renewals {
                    if borrowing.renewal_count >= max {
                        return Err(AppError::RenewalLimitReached(format!(
                            "Borrowing {} already used {} renewals",
                            borrowing.id, borrowing.renewal_count
                        )));
                    }
                }

                let new_due_date = borrowing.due_date + Duration::days(request.extension_days);

                let mut tx = self.pool.begin().await?;

                let extended = sqlx::query(
                    r#"
                    UPDATE borrowings
                    SET due_date = ?, renewal_count = renewal_count + 1
                    WHERE id = ? AND return_date IS NULL
                    "#,
                )
                .bind(new_due_date)
                .bind(borrowing.id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

                if extended == 0 {
                    return Err(AppError::NotFound(format!(
                        "No open borrowing with id {}",
                        borrowing.id
                    )));
                }

                let resolved = sqlx::query(
                    r#"
                    UPDATE renewal_requests
                    SET status = 'approved', reviewer_id = ?, review_date = ?, review_notes = ?
                    WHERE id = ? AND status = 'pending'
                    "#,
                )
                .bind(reviewer_id)
                .bind(now)
                .bind(&notes)
                .bind(renewal_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

                if resolved == 0 {
                    return Err(AppError::AlreadyResolved(format!(
                        "Renewal request {} was already resolved",
                        renewal_id
                    )));
                }

                tx.commit().await?;

                tracing::info!(
                    renewal_id,
                    borrowing_id = borrowing.id,
                    reviewer_id,
                    %new_due_date,
                    "renewal approved"
                );
            }
        }

        self.get_by_id(renewal_id).await
    }

    async fn fetch_open_borrowing(&self, borrowing_id: i64) -> AppResult<Borrowing> {
        let borrowing = sqlx::query_as::<_, Borrowing>("SELECT * FROM borrowings WHERE id = ?")
            .bind(borrowing_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Borrowing with id {} not found", borrowing_id))
            })?;

        if !borrowing.is_open() {
            return Err(AppError::NotFound(format!(
                "No open borrowing with id {}",
                borrowing_id
            )));
        }

        Ok(borrowing)
    }
}
