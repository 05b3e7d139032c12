//! Renewal request model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Renewal request state. Pending requests are the only mutable ones;
/// approved and rejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RenewalStatus {
    Pending,
    Approved,
    Rejected,
}

/// Reviewer decision on a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RenewalDecision {
    Approved,
    Rejected,
}

/// Renewal request from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RenewalRequest {
    pub id: i64,
    pub borrowing_id: i64,
    pub member_id: i64,
    pub extension_days: i64,
    pub status: RenewalStatus,
    pub reviewer_id: Option<i64>,
    pub review_date: Option<DateTime<Utc>>,
    pub review_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
