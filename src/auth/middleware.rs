//! Auth gate for protected routes.
//!
//! Credential precedence: signed cookie, then `Authorization: Bearer`.
//! A bearer value carrying the `reclast_` prefix is treated as a static
//! service API key and checked by exact membership against the configured
//! set; it skips token verification and yields a synthetic service session.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::cookie::{extract_bearer_token, extract_token_from_cookie};
use super::session::Session;
use crate::gateway::error::ApiError;
use crate::gateway::state::AppState;

const API_KEY_PREFIX: &str = "reclast_";

pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Cookie first, then bearer header
    let token = extract_token_from_cookie(request.headers())
        .or_else(|| extract_bearer_token(request.headers()));

    let Some(token) = token else {
        return Err(ApiError::unauthorized("Authentication required"));
    };

    // 2. Service API key path: exact match, no signature to verify
    let session = if token.starts_with(API_KEY_PREFIX) {
        if !state.api_keys.contains(&token) {
            return Err(ApiError::unauthorized("Invalid or expired authentication"));
        }
        tracing::debug!("request authenticated via service API key");
        Session::service(chrono::Utc::now().timestamp() + state.codec.lifetime_secs())
    } else {
        // 3. Signed token path
        match state.codec.verify(&token) {
            Some(session) if session.is_authenticated => session,
            _ => return Err(ApiError::unauthorized("Invalid or expired authentication")),
        }
    };

    // 4. Attach the session and fall through
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
