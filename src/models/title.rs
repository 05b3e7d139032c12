//! Title (catalog entry) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Catalog title from database. A title is the bibliographic work; the
/// lendable things are its units.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Title {
    pub id: i64,
    pub title: String,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub publication_year: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create title request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTitle {
    #[validate(length(min = 1, max = 500))]
    pub title: String,
    pub author: Option<String>,
    pub genre: Option<String>,
    #[validate(range(min = 0, max = 3000))]
    pub publication_year: Option<i64>,
}

/// Per-title inventory summary
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct TitleAvailability {
    pub title_id: i64,
    pub total_units: i64,
    pub available_units: i64,
}
