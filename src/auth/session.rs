use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Authenticated identity attached to a request after the auth gate passes.
///
/// Lives only for the lifetime of one request; the signed token held by the
/// client is the durable artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Session {
    #[schema(example = "user@example.com")]
    pub email: String,
    #[serde(rename = "isAuthenticated")]
    pub is_authenticated: bool,
    /// Expiry as epoch seconds.
    #[schema(example = 1735689600_i64)]
    pub exp: i64,
}

impl Session {
    /// Identity attached when a static service API key is presented.
    pub fn service(exp: i64) -> Self {
        Self {
            email: "service@reclast.internal".to_string(),
            is_authenticated: true,
            exp,
        }
    }
}
