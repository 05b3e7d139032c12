//! Member endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        borrowing::BorrowingDetails,
        member::{CreateMember, Member},
    },
    AppState,
};

/// Member fine balance
#[derive(Serialize, ToSchema)]
pub struct BalanceResponse {
    pub member_id: i64,
    /// Outstanding fines in currency units
    #[schema(value_type = String)]
    pub balance: Decimal,
}

/// Register a new member
#[utoipa::path(
    post,
    path = "/members",
    tag = "members",
    request_body = CreateMember,
    responses(
        (status = 201, description = "Member created", body = Member),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_member(
    State(state): State<AppState>,
    Json(request): Json<CreateMember>,
) -> AppResult<(StatusCode, Json<Member>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let member = state.services.members.create(&request).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// Get a member by ID
#[utoipa::path(
    get,
    path = "/members/{id}",
    tag = "members",
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member", body = Member),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member(
    State(state): State<AppState>,
    Path(member_id): Path<i64>,
) -> AppResult<Json<Member>> {
    let member = state.services.members.get(member_id).await?;
    Ok(Json(member))
}

/// Current fine balance of a member
#[utoipa::path(
    get,
    path = "/members/{id}/balance",
    tag = "members",
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Fine balance", body = BalanceResponse),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Path(member_id): Path<i64>,
) -> AppResult<Json<BalanceResponse>> {
    let balance = state.services.members.balance(member_id).await?;
    Ok(Json(BalanceResponse { member_id, balance }))
}

/// Active borrowings of a member
#[utoipa::path(
    get,
    path = "/members/{id}/borrowings",
    tag = "members",
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member's active borrowings", body = Vec<BorrowingDetails>),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member_borrowings(
    State(state): State<AppState>,
    Path(member_id): Path<i64>,
) -> AppResult<Json<Vec<BorrowingDetails>>> {
    let borrowings = state
        .services
        .circulation
        .member_borrowings(member_id)
        .await?;
    Ok(Json(borrowings))
}
