//! Renewal workflow endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::renewal::{RenewalDecision, RenewalRequest},
    AppState,
};

/// File a renewal request
#[derive(Deserialize, Validate, ToSchema)]
pub struct CreateRenewalRequest {
    /// Member asking for the extension (must own the borrowing)
    pub member_id: i64,
    /// Requested extension in days
    #[validate(range(min = 1))]
    pub extension_days: i64,
}

/// Resolve a pending renewal request
#[derive(Deserialize, ToSchema)]
pub struct ResolveRenewalRequest {
    /// Reviewing librarian/operator
    pub reviewer_id: i64,
    pub decision: RenewalDecision,
    pub notes: Option<String>,
}

/// Request a due-date extension for an open borrowing
#[utoipa::path(
    post,
    path = "/borrowings/{id}/renewals",
    tag = "renewals",
    params(
        ("id" = i64, Path, description = "Borrowing ID")
    ),
    request_body = CreateRenewalRequest,
    responses(
        (status = 201, description = "Renewal request filed", body = RenewalRequest),
        (status = 404, description = "No open borrowing with this ID"),
        (status = 409, description = "A pending request already exists")
    )
)]
pub async fn request_renewal(
    State(state): State<AppState>,
    Path(borrowing_id): Path<i64>,
    Json(request): Json<CreateRenewalRequest>,
) -> AppResult<(StatusCode, Json<RenewalRequest>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let renewal = state
        .services
        .renewals
        .request(borrowing_id, request.member_id, request.extension_days)
        .await?;

    Ok((StatusCode::CREATED, Json(renewal)))
}

/// Approve or reject a pending renewal request
#[utoipa::path(
    post,
    path = "/renewals/{id}/resolve",
    tag = "renewals",
    params(
        ("id" = i64, Path, description = "Renewal request ID")
    ),
    request_body = ResolveRenewalRequest,
    responses(
        (status = 200, description = "Request resolved", body = RenewalRequest),
        (status = 404, description = "Renewal request not found"),
        (status = 409, description = "Already resolved"),
        (status = 422, description = "Renewal limit reached")
    )
)]
pub async fn resolve_renewal(
    State(state): State<AppState>,
    Path(renewal_id): Path<i64>,
    Json(request): Json<ResolveRenewalRequest>,
) -> AppResult<Json<RenewalRequest>> {
    let renewal = state
        .services
        .renewals
        .resolve(
            renewal_id,
            request.reviewer_id,
            request.decision,
            request.notes,
        )
        .await?;

    Ok(Json(renewal))
}

/// Pending renewal requests, oldest first
#[utoipa::path(
    get,
    path = "/renewals/pending",
    tag = "renewals",
    responses(
        (status = 200, description = "Pending requests", body = Vec<RenewalRequest>)
    )
)]
pub async fn list_pending(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RenewalRequest>>> {
    let pending = state.services.renewals.pending().await?;
    Ok(Json(pending))
}
