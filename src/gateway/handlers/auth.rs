//! Authentication flow handlers.
//!
//! The canonical flow is the one-time email code: request-code → verify →
//! cookie. `/login` is the alternative static-credential mode; the two
//! share only the token codec and cookie contract.

use axum::{
    Extension, Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::cookie::{build_auth_cookie, clear_auth_cookie};
use crate::auth::session::Session;
use crate::gateway::error::ApiError;
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiResponse, AuthCheckData, AuthData, MessageData};
use crate::gateway::validation::RequestContext;

/// Request a verification code
///
/// POST /api/auth/request-code
#[utoipa::path(
    post,
    path = "/api/auth/request-code",
    responses(
        (status = 200, description = "Code issued and queued for delivery", body = ApiResponse<MessageData>),
        (status = 400, description = "Malformed request"),
        (status = 403, description = "Email not on the allow-list"),
        (status = 500, description = "Code store or delivery failure")
    ),
    tag = "Auth"
)]
pub async fn request_code(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Result<Json<ApiResponse<MessageData>>, ApiError> {
    let ctx = RequestContext::from_request(request, &["email"])
        .await?
        .check_email(&state.allowlist)?;
    let email = ctx.email()?;

    let code = state.codes.issue(email).await.map_err(|e| {
        tracing::error!(error = %e, "failed to issue verification code");
        ApiError::internal("Failed to send verification code")
    })?;

    state.mailer.send_code(email, &code).await.map_err(|e| {
        tracing::error!(error = %e, "failed to deliver verification code");
        ApiError::internal("Failed to send verification code")
    })?;

    Ok(Json(ApiResponse::success(MessageData::new(
        "Verification code sent to your email",
    ))))
}

/// Verify the code and log in
///
/// POST /api/auth/verify
#[utoipa::path(
    post,
    path = "/api/auth/verify",
    responses(
        (status = 200, description = "Authenticated; auth cookie set", body = ApiResponse<AuthData>),
        (status = 400, description = "Malformed request or wrong/expired code"),
        (status = 403, description = "Email not on the allow-list")
    ),
    tag = "Auth"
)]
pub async fn verify(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Result<Response, ApiError> {
    let ctx = RequestContext::from_request(request, &["email", "code"])
        .await?
        .check_email(&state.allowlist)?
        .check_code()?;
    let email = ctx.email()?.to_string();

    // Code store failures surface as 500; this path never bypasses auth
    let valid = state.codes.consume(&email, ctx.code()?).await.map_err(|e| {
        tracing::error!(error = %e, "verification code lookup failed");
        ApiError::internal("Failed to verify code")
    })?;

    if !valid {
        return Err(ApiError::bad_request("Invalid or expired verification code"));
    }

    issue_session_response(&state, email)
}

/// Allow-list check only
///
/// POST /api/auth/check-email
#[utoipa::path(
    post,
    path = "/api/auth/check-email",
    responses(
        (status = 200, description = "Email is authorized", body = ApiResponse<MessageData>),
        (status = 403, description = "Email not on the allow-list")
    ),
    tag = "Auth"
)]
pub async fn check_email(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Result<Json<ApiResponse<MessageData>>, ApiError> {
    RequestContext::from_request(request, &["email"])
        .await?
        .check_email(&state.allowlist)?;

    Ok(Json(ApiResponse::success(MessageData::new(
        "Email is authorized",
    ))))
}

#[derive(Debug, Deserialize)]
struct LoginFields {
    username: String,
    password: String,
}

/// Static-credential login (alternative mode)
///
/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    responses(
        (status = 200, description = "Authenticated; auth cookie set", body = ApiResponse<AuthData>),
        (status = 401, description = "Bad credentials"),
        (status = 403, description = "Email not on the allow-list")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Result<Response, ApiError> {
    let ctx = RequestContext::from_request(request, &["email", "username", "password"])
        .await?
        .check_email(&state.allowlist)?;
    let email = ctx.email()?.to_string();
    let fields: LoginFields = ctx.parse()?;

    if !state.credentials.verify(&fields.username, &fields.password) {
        // Same message for unknown user and wrong password
        return Err(ApiError::unauthorized("Invalid username or password"));
    }

    issue_session_response(&state, email)
}

/// Report the session attached by the auth gate
///
/// GET /api/auth/check
#[utoipa::path(
    get,
    path = "/api/auth/check",
    responses(
        (status = 200, description = "Session is valid", body = ApiResponse<AuthCheckData>),
        (status = 401, description = "No valid credential presented")
    ),
    tag = "Auth"
)]
pub async fn check(
    Extension(session): Extension<Session>,
) -> Json<ApiResponse<AuthCheckData>> {
    Json(ApiResponse::success(AuthCheckData {
        is_authenticated: session.is_authenticated,
        user: session,
    }))
}

/// Clear the auth cookie
///
/// POST /api/auth/logout
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Cookie cleared", body = ApiResponse<MessageData>)
    ),
    tag = "Auth"
)]
pub async fn logout() -> Response {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, clear_auth_cookie())],
        Json(ApiResponse::success(MessageData::new(
            "Logged out successfully",
        ))),
    )
        .into_response()
}

/// Issue a token for `email` and answer with the auth cookie set.
fn issue_session_response(state: &AppState, email: String) -> Result<Response, ApiError> {
    let token = state.codec.issue(&email).map_err(|e| {
        tracing::error!(error = %e, "token issuance failed");
        ApiError::internal("Failed to create session")
    })?;
    let cookie = build_auth_cookie(&token, state.codec.lifetime_secs());

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::success(AuthData {
            message: "Authentication successful".to_string(),
            email,
        })),
    )
        .into_response())
}
