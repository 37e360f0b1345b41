//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, health, items, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lending Desk API",
        version = "0.1.0",
        description = "Catalog, patron and loan tracking"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        health::health_check,
        health::readiness_check,
        auth::login,
        auth::register,
        auth::logout,
        items::list_items,
        items::get_item,
        loans::borrow,
        loans::return_item,
        loans::list_loans,
    ),
    components(
        schemas(
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            auth::RegisterResponse,
            auth::MessageResponse,
            crate::models::item::CatalogEntry,
            crate::models::loan::LoanSummary,
            crate::models::patron::PatronShort,
            loans::BorrowRequest,
            loans::BorrowResponse,
            loans::ReturnRequest,
            loans::ReturnResponse,
            loans::LoansResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Login, registration and logout"),
        (name = "items", description = "Catalog"),
        (name = "loans", description = "Borrowing and returning")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
