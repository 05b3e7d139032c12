//! Borrowing (checkout-to-return lifecycle) model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Borrowing model from database.
///
/// A NULL `return_date` means the borrowing is open. Once `return_date`
/// and `fine_cents` are set, the row is never touched again.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Borrowing {
    pub id: i64,
    pub member_id: i64,
    pub unit_id: i64,
    pub title_id: i64,
    pub checkout_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub returned_by: Option<i64>,
    pub fine_cents: Option<i64>,
    pub renewal_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Borrowing {
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }
}

/// Borrowing with title context for list views
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BorrowingDetails {
    pub id: i64,
    pub member_id: i64,
    pub unit_id: i64,
    pub title_id: i64,
    pub title: String,
    pub unit_barcode: Option<String>,
    pub checkout_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub renewal_count: i64,
    pub is_overdue: bool,
}

/// Result of a completed return
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReturnOutcome {
    pub borrowing_id: i64,
    pub unit_id: i64,
    pub returned_at: DateTime<Utc>,
    pub days_overdue: i64,
    /// Fine settled on this borrowing, in currency units
    #[schema(value_type = String)]
    pub fine_amount: Decimal,
}

/// Fine owed on a borrowing as of a given moment.
///
/// For an open borrowing this is the display amount, computed against
/// "now" without touching any state; once returned it is the settled
/// amount stored on the row.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccruedFine {
    pub borrowing_id: i64,
    pub settled: bool,
    pub days_overdue: i64,
    #[schema(value_type = String)]
    pub fine_amount: Decimal,
}
