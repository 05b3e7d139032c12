//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{borrowings, health, members, renewals, titles};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Velin API",
        version = "1.0.0",
        description = "Library Circulation Server REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Titles
        titles::create_title,
        titles::get_title,
        titles::list_units,
        titles::create_unit,
        titles::get_availability,
        titles::deactivate_unit,
        // Members
        members::create_member,
        members::get_member,
        members::get_balance,
        members::get_member_borrowings,
        // Borrowings
        borrowings::checkout,
        borrowings::return_item,
        borrowings::get_borrowing,
        borrowings::get_fine,
        borrowings::list_overdue,
        borrowings::list_due_soon,
        // Renewals
        renewals::request_renewal,
        renewals::resolve_renewal,
        renewals::list_pending,
    ),
    components(
        schemas(
            // Titles
            crate::models::title::Title,
            crate::models::title::CreateTitle,
            crate::models::title::TitleAvailability,
            crate::models::unit::Unit,
            crate::models::unit::CreateUnit,
            // Members
            crate::models::member::Member,
            crate::models::member::CreateMember,
            members::BalanceResponse,
            // Borrowings
            crate::models::borrowing::Borrowing,
            crate::models::borrowing::BorrowingDetails,
            crate::models::borrowing::ReturnOutcome,
            crate::models::borrowing::AccruedFine,
            borrowings::CheckoutRequest,
            borrowings::ReturnRequest,
            borrowings::ReturnResponse,
            // Renewals
            crate::models::renewal::RenewalRequest,
            crate::models::renewal::RenewalStatus,
            crate::models::renewal::RenewalDecision,
            renewals::CreateRenewalRequest,
            renewals::ResolveRenewalRequest,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "titles", description = "Catalog titles and units"),
        (name = "members", description = "Member registration and balances"),
        (name = "borrowings", description = "Checkout and return"),
        (name = "renewals", description = "Renewal approval workflow")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
