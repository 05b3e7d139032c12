//! Circulation endpoints: checkout, return, projections

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::borrowing::{AccruedFine, Borrowing, BorrowingDetails, ReturnOutcome},
    AppState,
};

/// Checkout request
#[derive(Deserialize, Validate, ToSchema)]
pub struct CheckoutRequest {
    /// Borrowing member ID
    pub member_id: i64,
    /// Title to borrow; the engine picks an available unit
    pub title_id: i64,
    /// Loan period in days; server default applies when omitted
    #[validate(range(min = 1, max = 365))]
    pub loan_days: Option<i64>,
}

/// Return request
#[derive(Deserialize, ToSchema)]
pub struct ReturnRequest {
    /// Operator processing the return
    pub operator_id: i64,
}

/// Return response
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Return status
    pub status: String,
    /// Settled outcome
    pub outcome: ReturnOutcome,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct DueSoonQuery {
    /// Look-ahead window in days (default 7)
    #[validate(range(min = 1, max = 365))]
    pub days: Option<i64>,
}

/// Check out a title to a member
#[utoipa::path(
    post,
    path = "/borrowings",
    tag = "borrowings",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Borrowing created", body = Borrowing),
        (status = 404, description = "Member or title not found"),
        (status = 409, description = "No copies available")
    )
)]
pub async fn checkout(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<Borrowing>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let borrowing = state
        .services
        .circulation
        .checkout(request.member_id, request.title_id, request.loan_days)
        .await?;

    Ok((StatusCode::CREATED, Json(borrowing)))
}

/// Return a borrowed unit
#[utoipa::path(
    post,
    path = "/borrowings/{id}/return",
    tag = "borrowings",
    params(
        ("id" = i64, Path, description = "Borrowing ID")
    ),
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Unit returned", body = ReturnResponse),
        (status = 404, description = "Borrowing not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_item(
    State(state): State<AppState>,
    Path(borrowing_id): Path<i64>,
    Json(request): Json<ReturnRequest>,
) -> AppResult<Json<ReturnResponse>> {
    let outcome = state
        .services
        .circulation
        .return_item(borrowing_id, request.operator_id)
        .await?;

    Ok(Json(ReturnResponse {
        status: "returned".to_string(),
        outcome,
    }))
}

/// Get a borrowing by ID
#[utoipa::path(
    get,
    path = "/borrowings/{id}",
    tag = "borrowings",
    params(
        ("id" = i64, Path, description = "Borrowing ID")
    ),
    responses(
        (status = 200, description = "Borrowing", body = Borrowing),
        (status = 404, description = "Borrowing not found")
    )
)]
pub async fn get_borrowing(
    State(state): State<AppState>,
    Path(borrowing_id): Path<i64>,
) -> AppResult<Json<Borrowing>> {
    let borrowing = state.services.circulation.get_borrowing(borrowing_id).await?;
    Ok(Json(borrowing))
}

/// Fine owed on a borrowing as of now
#[utoipa::path(
    get,
    path = "/borrowings/{id}/fine",
    tag = "borrowings",
    params(
        ("id" = i64, Path, description = "Borrowing ID")
    ),
    responses(
        (status = 200, description = "Accrued or settled fine", body = AccruedFine),
        (status = 404, description = "Borrowing not found")
    )
)]
pub async fn get_fine(
    State(state): State<AppState>,
    Path(borrowing_id): Path<i64>,
) -> AppResult<Json<AccruedFine>> {
    let fine = state.services.circulation.accrued_fine(borrowing_id).await?;
    Ok(Json(fine))
}

/// All overdue borrowings
#[utoipa::path(
    get,
    path = "/borrowings/overdue",
    tag = "borrowings",
    responses(
        (status = 200, description = "Overdue borrowings", body = Vec<BorrowingDetails>)
    )
)]
pub async fn list_overdue(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<BorrowingDetails>>> {
    let borrowings = state.services.circulation.overdue().await?;
    Ok(Json(borrowings))
}

/// Borrowings coming due soon
#[utoipa::path(
    get,
    path = "/borrowings/due-soon",
    tag = "borrowings",
    params(
        ("days" = Option<i64>, Query, description = "Look-ahead window in days (default 7)")
    ),
    responses(
        (status = 200, description = "Borrowings due within the window", body = Vec<BorrowingDetails>)
    )
)]
pub async fn list_due_soon(
    State(state): State<AppState>,
    Query(query): Query<DueSoonQuery>,
) -> AppResult<Json<Vec<BorrowingDetails>>> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let borrowings = state
        .services
        .circulation
        .due_within(query.days.unwrap_or(7))
        .await?;
    Ok(Json(borrowings))
}
