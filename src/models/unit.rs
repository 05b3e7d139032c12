//! Unit (physical copy) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// One lendable copy of a title.
///
/// `on_loan` mirrors the borrowing ledger: it is true iff exactly one open
/// borrowing references the unit. `active` is a soft-delete flag; units are
/// deactivated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Unit {
    pub id: i64,
    pub title_id: i64,
    pub barcode: Option<String>,
    pub condition_note: Option<String>,
    pub location: Option<String>,
    pub on_loan: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Unit {
    pub fn is_available(&self) -> bool {
        self.active && !self.on_loan
    }
}

/// Create unit request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUnit {
    /// Barcode (optional). When set, must be unique across units.
    pub barcode: Option<String>,
    pub condition_note: Option<String>,
    pub location: Option<String>,
}
