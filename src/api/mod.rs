//! API handlers for Velin REST endpoints

pub mod borrowings;
pub mod health;
pub mod members;
pub mod openapi;
pub mod renewals;
pub mod titles;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::AppState;

/// API v1 routes
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Titles (catalog)
        .route("/titles", post(titles::create_title))
        .route("/titles/:id", get(titles::get_title))
        .route("/titles/:id/units", get(titles::list_units))
        .route("/titles/:id/units", post(titles::create_unit))
        .route("/titles/:id/availability", get(titles::get_availability))
        // Units
        .route("/units/:id", delete(titles::deactivate_unit))
        // Members
        .route("/members", post(members::create_member))
        .route("/members/:id", get(members::get_member))
        .route("/members/:id/balance", get(members::get_balance))
        .route("/members/:id/borrowings", get(members::get_member_borrowings))
        // Borrowings
        .route("/borrowings", post(borrowings::checkout))
        .route("/borrowings/overdue", get(borrowings::list_overdue))
        .route("/borrowings/due-soon", get(borrowings::list_due_soon))
        .route("/borrowings/:id", get(borrowings::get_borrowing))
        .route("/borrowings/:id/return", post(borrowings::return_item))
        .route("/borrowings/:id/fine", get(borrowings::get_fine))
        .route("/borrowings/:id/renewals", post(renewals::request_renewal))
        // Renewals
        .route("/renewals/pending", get(renewals::list_pending))
        .route("/renewals/:id/resolve", post(renewals::resolve_renewal))
        .with_state(state)
}
