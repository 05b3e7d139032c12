//! Member management service

use crate::{
    error::AppResult,
    fines,
    models::member::{CreateMember, Member},
    repository::Repository,
};

use rust_decimal::Decimal;

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
}

impl MembersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a new member
    pub async fn create(&self, member: &CreateMember) -> AppResult<Member> {
        self.repository.members.create(member).await
    }

    /// Get member by ID
    pub async fn get(&self, member_id: i64) -> AppResult<Member> {
        self.repository.members.get_by_id(member_id).await
    }

    /// Current fine balance as a currency amount
    pub async fn balance(&self, member_id: i64) -> AppResult<Decimal> {
        let cents = self.repository.members.balance(member_id).await?;
        Ok(fines::to_amount(cents))
    }
}
