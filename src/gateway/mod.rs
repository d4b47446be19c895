pub mod error;
pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;
pub mod validation;

use axum::{
    Router,
    http::{Method, header},
    middleware::from_fn_with_state,
    routing::{any, get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::middleware::require_auth;
use state::AppState;

/// Assemble the full router.
///
/// Body-validated POST routes are registered with `any()` so the validation
/// chain owns the 405 response shape instead of axum's default.
pub fn build_router(state: Arc<AppState>) -> Router {
    // ==========================================================================
    // Auth routes, public except /check which sits behind the gate
    // ==========================================================================
    let auth_routes = Router::new()
        .route("/request-code", any(handlers::auth::request_code))
        .route("/verify", any(handlers::auth::verify))
        .route("/check-email", any(handlers::auth::check_email))
        .route("/login", any(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route(
            "/check",
            get(handlers::auth::check)
                .layer(from_fn_with_state(state.clone(), require_auth)),
        );

    // ==========================================================================
    // Protected prefixes: every route requires a valid session
    // ==========================================================================
    let protected_routes = Router::new()
        .nest(
            "/text",
            Router::new().route("/generate", any(handlers::generate::generate_text)),
        )
        .nest(
            "/image",
            Router::new().route("/generate", any(handlers::generate::generate_image)),
        )
        .nest(
            "/code",
            Router::new().route("/generate", any(handlers::generate::generate_code)),
        )
        .nest(
            "/stats",
            Router::new()
                .route("/", get(handlers::stats::get_stats))
                .route("/reset", post(handlers::stats::reset_stats)),
        )
        .layer(from_fn_with_state(state.clone(), require_auth));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/api/health", get(handlers::health::health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        .layer(cors)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Start the HTTP gateway server.
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind to {}: {}", addr, e))?;

    tracing::info!("gateway listening on http://{}", addr);
    tracing::info!("API docs: http://{}/docs", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
