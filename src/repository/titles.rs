//! Titles repository for database operations

use std::sync::Arc;

use sqlx::{Pool, Sqlite};

use crate::{
    clock::Clock,
    error::{AppError, AppResult},
    models::title::{CreateTitle, Title},
};

#[derive(Clone)]
pub struct TitlesRepository {
    pool: Pool<Sqlite>,
    clock: Arc<dyn Clock>,
}

impl TitlesRepository {
    pub fn new(pool: Pool<Sqlite>, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Get title by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Title> {
        sqlx::query_as::<_, Title>("SELECT * FROM titles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Title with id {} not found", id)))
    }

    pub async fn exists(&self, id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM titles WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Create a new title
    pub async fn create(&self, title: &CreateTitle) -> AppResult<Title> {
        let now = self.clock.now();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO titles (title, author, genre, publication_year, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&title.title)
        .bind(&title.author)
        .bind(&title.genre)
        .bind(title.publication_year)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }
}
