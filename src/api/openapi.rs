//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{analytics, auth, books, health, lending};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Digital Library API",
        version = "1.0.0",
        description = "Book catalog, lending and analytics REST API"
    ),
    servers(
        (url = "/api", description = "API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Lending
        lending::lend_book,
        lending::return_book,
        lending::delete_record,
        lending::list_records,
        // Analytics
        analytics::most_borrowed,
        analytics::monthly_trends,
        analytics::category_distribution,
    ),
    components(
        schemas(
            // Auth
            auth::LoginResponse,
            crate::models::user::User,
            crate::models::user::Role,
            crate::models::user::RegisterRequest,
            crate::models::user::LoginRequest,
            // Books
            crate::models::book::Book,
            crate::models::book::BookInput,
            books::DeletedBookResponse,
            // Lending
            crate::models::lending::LendingRecord,
            crate::models::lending::LendingRecordDetail,
            crate::models::lending::LendRequest,
            crate::models::lending::LendingStatus,
            lending::ReturnResponse,
            // Analytics
            crate::models::analytics::BorrowCount,
            crate::models::analytics::MonthlyTrend,
            crate::models::analytics::CategoryDistribution,
            // Common
            crate::api::MessageResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and login"),
        (name = "books", description = "Catalog management"),
        (name = "lending", description = "Lending and returns"),
        (name = "analytics", description = "Lending statistics")
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
