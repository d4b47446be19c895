//! API response envelope and shared DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::session::Session;

/// Unified API response wrapper.
///
/// All JSON responses follow this structure:
/// - success: true with `data`, or false with `error`
/// - binary image responses bypass the envelope entirely
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    #[schema(example = true)]
    pub success: bool,
    /// Payload (only present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (only present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// `{message}` payload for simple acknowledgements.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageData {
    #[schema(example = "Verification code sent to your email")]
    pub message: String,
}

impl MessageData {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Payload for a successful login/verify.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthData {
    #[schema(example = "Authentication successful")]
    pub message: String,
    #[schema(example = "user@example.com")]
    pub email: String,
}

/// Payload for `GET /api/auth/check`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthCheckData {
    #[serde(rename = "isAuthenticated")]
    pub is_authenticated: bool,
    pub user: Session,
}

/// Payload for text/code generation.
#[derive(Debug, Serialize, ToSchema)]
pub struct GenerationData {
    /// Backend result, passed through as-is
    #[schema(value_type = Object)]
    pub result: serde_json::Value,
    #[schema(example = "@cf/meta/llama-2-7b-chat-int8")]
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let resp = ApiResponse::success(MessageData::new("ok"));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["message"], "ok");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn error_envelope_shape() {
        let resp = ApiResponse::<()>::error("boom");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
        assert!(json.get("data").is_none());
    }
}
