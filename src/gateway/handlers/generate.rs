//! Generation handlers: thin glue around the delegated inference backend.
//!
//! Every call runs behind the auth gate, validates `prompt`, delegates to
//! the backend, then bumps the usage counters best-effort. Image responses
//! bypass the JSON envelope and return raw bytes.

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::gateway::error::ApiError;
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiResponse, GenerationData};
use crate::gateway::validation::RequestContext;
use crate::inference::{ImageRequest, TextRequest};
use crate::stats::Category;

/// Generate text
///
/// POST /api/text/generate
#[utoipa::path(
    post,
    path = "/api/text/generate",
    responses(
        (status = 200, description = "Generation result", body = ApiResponse<GenerationData>),
        (status = 400, description = "Malformed request"),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Backend failure")
    ),
    tag = "Generate"
)]
pub async fn generate_text(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Result<Json<ApiResponse<GenerationData>>, ApiError> {
    let req = text_request(request).await?;
    let model = state.backend.resolve_text_model(req.model.as_deref());

    tracing::debug!(%model, "text generation");
    let result = state.backend.generate_text(&req).await.map_err(|e| {
        tracing::error!(error = %e, "text generation failed");
        ApiError::internal(format!("Error generating text: {}", e))
    })?;

    state.stats.record(Category::Text).await;

    Ok(Json(ApiResponse::success(GenerationData { result, model })))
}

/// Generate code
///
/// POST /api/code/generate
#[utoipa::path(
    post,
    path = "/api/code/generate",
    responses(
        (status = 200, description = "Generation result", body = ApiResponse<GenerationData>),
        (status = 400, description = "Malformed request"),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Backend failure")
    ),
    tag = "Generate"
)]
pub async fn generate_code(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Result<Json<ApiResponse<GenerationData>>, ApiError> {
    let req = text_request(request).await?;
    let model = state.backend.resolve_text_model(req.model.as_deref());

    tracing::debug!(%model, "code generation");
    let result = state.backend.generate_code(&req).await.map_err(|e| {
        tracing::error!(error = %e, "code generation failed");
        ApiError::internal(format!("Error generating code: {}", e))
    })?;

    state.stats.record(Category::Code).await;

    Ok(Json(ApiResponse::success(GenerationData { result, model })))
}

/// Generate an image
///
/// POST /api/image/generate
///
/// Returns raw image bytes, not the JSON envelope.
#[utoipa::path(
    post,
    path = "/api/image/generate",
    responses(
        (status = 200, description = "Raw image bytes", content_type = "image/png"),
        (status = 400, description = "Malformed request"),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Backend failure")
    ),
    tag = "Generate"
)]
pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Result<Response, ApiError> {
    let ctx = RequestContext::from_request(request, &["prompt"]).await?;
    let req: ImageRequest = ctx.parse()?;
    require_prompt(&req.prompt)?;

    let image = state.backend.generate_image(&req).await.map_err(|e| {
        tracing::error!(error = %e, "image generation failed");
        ApiError::internal(format!("Error generating image: {}", e))
    })?;

    state.stats.record(Category::Image).await;

    Ok((
        [(header::CONTENT_TYPE, image.content_type)],
        image.bytes,
    )
        .into_response())
}

async fn text_request(request: Request<Body>) -> Result<TextRequest, ApiError> {
    let ctx = RequestContext::from_request(request, &["prompt"]).await?;
    let req: TextRequest = ctx.parse()?;
    require_prompt(&req.prompt)?;
    Ok(req)
}

fn require_prompt(prompt: &str) -> Result<(), ApiError> {
    if prompt.trim().is_empty() {
        return Err(ApiError::bad_request("Prompt is required"));
    }
    Ok(())
}
