//! Circulation service: checkout, return, and the read-side projections

use crate::{
    error::AppResult,
    models::borrowing::{AccruedFine, Borrowing, BorrowingDetails, ReturnOutcome},
    repository::Repository,
};

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
}

impl CirculationService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Check out a title to a member
    pub async fn checkout(
        &self,
        member_id: i64,
        title_id: i64,
        loan_days: Option<i64>,
    ) -> AppResult<Borrowing> {
        self.repository
            .borrowings
            .checkout(member_id, title_id, loan_days)
            .await
    }

    /// Return a borrowed unit
    pub async fn return_item(
        &self,
        borrowing_id: i64,
        operator_id: i64,
    ) -> AppResult<ReturnOutcome> {
        self.repository
            .borrowings
            .return_item(borrowing_id, operator_id)
            .await
    }

    /// Get borrowing by ID
    pub async fn get_borrowing(&self, borrowing_id: i64) -> AppResult<Borrowing> {
        self.repository.borrowings.get_by_id(borrowing_id).await
    }

    /// Active borrowings for a member
    pub async fn member_borrowings(&self, member_id: i64) -> AppResult<Vec<BorrowingDetails>> {
        // Verify member exists
        self.repository.members.get_by_id(member_id).await?;
        self.repository.borrowings.list_active(member_id).await
    }

    /// All overdue borrowings
    pub async fn overdue(&self) -> AppResult<Vec<BorrowingDetails>> {
        self.repository.borrowings.list_overdue().await
    }

    /// Borrowings due within the next `days` days
    pub async fn due_within(&self, days: i64) -> AppResult<Vec<BorrowingDetails>> {
        self.repository.borrowings.list_due_within(days).await
    }

    /// Fine owed on a borrowing as of now (display-only)
    pub async fn accrued_fine(&self, borrowing_id: i64) -> AppResult<AccruedFine> {
        self.repository.borrowings.accrued_fine(borrowing_id).await
    }

    /// Count active borrowings
    pub async fn count_active(&self) -> AppResult<i64> {
        self.repository.borrowings.count_active().await
    }

    /// Count overdue borrowings
    pub async fn count_overdue(&self) -> AppResult<i64> {
        self.repository.borrowings.count_overdue().await
    }
}
