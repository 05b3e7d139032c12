//! Renewal workflow service

use crate::{
    error::AppResult,
    models::renewal::{RenewalDecision, RenewalRequest},
    repository::Repository,
};

#[derive(Clone)]
pub struct RenewalsService {
    repository: Repository,
}

impl RenewalsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// File a renewal request against an open borrowing
    pub async fn request(
        &self,
        borrowing_id: i64,
        member_id: i64,
        extension_days: i64,
    ) -> AppResult<RenewalRequest> {
        self.repository
            .renewals
            .request(borrowing_id, member_id, extension_days)
            .await
    }

    /// Resolve a pending request
    pub async fn resolve(
        &self,
        renewal_id: i64,
        reviewer_id: i64,
        decision: RenewalDecision,
        notes: Option<String>,
    ) -> AppResult<RenewalRequest> {
        self.repository
            .renewals
            .resolve(renewal_id, reviewer_id, decision, notes)
            .await
    }

    /// The reviewer queue
    pub async fn pending(&self) -> AppResult<Vec<RenewalRequest>> {
        self.repository.renewals.list_pending().await
    }
}
