//! Catalog endpoints: titles and their units

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        title::{CreateTitle, Title, TitleAvailability},
        unit::{CreateUnit, Unit},
    },
    AppState,
};

/// Create a catalog title
#[utoipa::path(
    post,
    path = "/titles",
    tag = "titles",
    request_body = CreateTitle,
    responses(
        (status = 201, description = "Title created", body = Title),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_title(
    State(state): State<AppState>,
    Json(request): Json<CreateTitle>,
) -> AppResult<(StatusCode, Json<Title>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let title = state.services.catalog.create_title(&request).await?;
    Ok((StatusCode::CREATED, Json(title)))
}

/// Get a title by ID
#[utoipa::path(
    get,
    path = "/titles/{id}",
    tag = "titles",
    params(
        ("id" = i64, Path, description = "Title ID")
    ),
    responses(
        (status = 200, description = "Title", body = Title),
        (status = 404, description = "Title not found")
    )
)]
pub async fn get_title(
    State(state): State<AppState>,
    Path(title_id): Path<i64>,
) -> AppResult<Json<Title>> {
    let title = state.services.catalog.get_title(title_id).await?;
    Ok(Json(title))
}

/// List units of a title
#[utoipa::path(
    get,
    path = "/titles/{id}/units",
    tag = "titles",
    params(
        ("id" = i64, Path, description = "Title ID")
    ),
    responses(
        (status = 200, description = "Units of the title", body = Vec<Unit>),
        (status = 404, description = "Title not found")
    )
)]
pub async fn list_units(
    State(state): State<AppState>,
    Path(title_id): Path<i64>,
) -> AppResult<Json<Vec<Unit>>> {
    let units = state.services.catalog.list_units(title_id).await?;
    Ok(Json(units))
}

/// Add a unit to a title's inventory
#[utoipa::path(
    post,
    path = "/titles/{id}/units",
    tag = "titles",
    params(
        ("id" = i64, Path, description = "Title ID")
    ),
    request_body = CreateUnit,
    responses(
        (status = 201, description = "Unit created", body = Unit),
        (status = 404, description = "Title not found")
    )
)]
pub async fn create_unit(
    State(state): State<AppState>,
    Path(title_id): Path<i64>,
    Json(request): Json<CreateUnit>,
) -> AppResult<(StatusCode, Json<Unit>)> {
    let unit = state.services.catalog.create_unit(title_id, &request).await?;
    Ok((StatusCode::CREATED, Json(unit)))
}

/// Inventory summary for a title
#[utoipa::path(
    get,
    path = "/titles/{id}/availability",
    tag = "titles",
    params(
        ("id" = i64, Path, description = "Title ID")
    ),
    responses(
        (status = 200, description = "Unit counts", body = TitleAvailability),
        (status = 404, description = "Title not found")
    )
)]
pub async fn get_availability(
    State(state): State<AppState>,
    Path(title_id): Path<i64>,
) -> AppResult<Json<TitleAvailability>> {
    let availability = state.services.catalog.availability(title_id).await?;
    Ok(Json(availability))
}

/// Take a unit out of circulation
#[utoipa::path(
    delete,
    path = "/units/{id}",
    tag = "titles",
    params(
        ("id" = i64, Path, description = "Unit ID")
    ),
    responses(
        (status = 204, description = "Unit deactivated"),
        (status = 400, description = "Unit is out on loan"),
        (status = 404, description = "Unit not found")
    )
)]
pub async fn deactivate_unit(
    State(state): State<AppState>,
    Path(unit_id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.catalog.deactivate_unit(unit_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
