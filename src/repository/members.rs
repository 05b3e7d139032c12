//! Members repository for database operations

use std::sync::Arc;

use sqlx::{Pool, Sqlite};

use crate::{
    clock::Clock,
    error::{AppError, AppResult},
    models::member::{CreateMember, Member},
};

#[derive(Clone)]
pub struct MembersRepository {
    pool: Pool<Sqlite>,
    clock: Arc<dyn Clock>,
}

impl MembersRepository {
    pub fn new(pool: Pool<Sqlite>, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Get member by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Member> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))
    }

    /// Create a new member
    pub async fn create(&self, member: &CreateMember) -> AppResult<Member> {
        let now = self.clock.now();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO members (name, email, fine_balance_cents, created_at, updated_at)
            VALUES (?, ?, 0, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&member.name)
        .bind(&member.email)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Post a fine to the member's running balance.
    ///
    /// Only increments. Negative adjustments belong to the payment/waiver
    /// flow, which keeps its own audit trail.
    pub async fn post_fine(&self, member_id: i64, amount_cents: i64) -> AppResult<()> {
        if amount_cents < 0 {
            return Err(AppError::Validation(
                "Fine amount must not be negative".to_string(),
            ));
        }

        let updated = sqlx::query(
            "UPDATE members SET fine_balance_cents = fine_balance_cents + ?, updated_at = ? WHERE id = ?",
        )
        .bind(amount_cents)
        .bind(self.clock.now())
        .bind(member_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(AppError::NotFound(format!(
                "Member with id {} not found",
                member_id
            )));
        }

        Ok(())
    }

    /// Current fine balance in cents
    pub async fn balance(&self, member_id: i64) -> AppResult<i64> {
        sqlx::query_scalar("SELECT fine_balance_cents FROM members WHERE id = ?")
            .bind(member_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", member_id)))
    }
}
