//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8787/docs`
//! - OpenAPI JSON: `http://localhost:8787/api-docs/openapi.json`

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::handlers::health::HealthResponse;
use super::handlers::stats::ResetData;
use super::types::{AuthCheckData, AuthData, GenerationData, MessageData};
use crate::auth::session::Session;
use crate::stats::UsageStats;

/// Cookie and bearer-token security schemes for the protected routes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "auth_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "auth",
                    "Signed session token set by /api/auth/verify or /api/auth/login",
                ))),
            );
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some(
                            "Signed session token, or a reclast_-prefixed service API key",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reclast Gateway API",
        version = "0.1.0",
        description = "HTTP gateway for hosted AI inference with email-code authentication.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8787", description = "Development"),
    ),
    paths(
        super::handlers::health::health_check,
        super::handlers::auth::request_code,
        super::handlers::auth::verify,
        super::handlers::auth::check_email,
        super::handlers::auth::login,
        super::handlers::auth::check,
        super::handlers::auth::logout,
        super::handlers::generate::generate_text,
        super::handlers::generate::generate_code,
        super::handlers::generate::generate_image,
        super::handlers::stats::get_stats,
        super::handlers::stats::reset_stats,
    ),
    components(
        schemas(
            HealthResponse,
            MessageData,
            AuthData,
            AuthCheckData,
            GenerationData,
            Session,
            UsageStats,
            ResetData,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Authentication flow"),
        (name = "Generate", description = "Delegated inference"),
        (name = "Stats", description = "Usage counters"),
        (name = "System", description = "Health and metadata"),
    )
)]
pub struct ApiDoc;
