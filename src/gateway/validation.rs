//! Request validation chain.
//!
//! A fixed-order sequence of checks over the raw request, each either
//! falling through or short-circuiting with a client error:
//!
//! 1. method must be POST (405)
//! 2. body must parse as a JSON object (400)
//! 3. every declared required field must be present (400, names the field)
//! 4. optional: email shape + allow-list membership (400 / 403)
//! 5. optional: verification code shape, 6 ASCII digits (400)
//!
//! Parsed and normalized data is carried on a typed `RequestContext`
//! rather than bolted onto the request; checks have no side effects beyond
//! annotation.

use axum::body::{Body, to_bytes};
use axum::http::{Method, Request};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::error::ApiError;
use crate::auth::allowlist::AllowList;

/// Cap on accepted body size; generation prompts are small.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Typed context threaded through the validation chain into the handler.
#[derive(Debug)]
pub struct RequestContext {
    fields: Map<String, Value>,
    email: Option<String>,
    code: Option<String>,
}

impl RequestContext {
    /// Steps 1-3: method check, JSON body parse, required-field presence.
    ///
    /// Presence means the key exists in the object; an explicit `null`
    /// passes, a missing key does not.
    pub async fn from_request(
        request: Request<Body>,
        required: &[&str],
    ) -> Result<Self, ApiError> {
        if request.method() != Method::POST {
            return Err(ApiError::method_not_allowed(
                "Method not allowed. Please use POST.",
            ));
        }

        let bytes = to_bytes(request.into_body(), MAX_BODY_BYTES)
            .await
            .map_err(|_| ApiError::bad_request("Invalid JSON in request body."))?;
        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|_| ApiError::bad_request("Invalid JSON in request body."))?;
        let Value::Object(fields) = value else {
            return Err(ApiError::bad_request("Invalid JSON in request body."));
        };

        for field in required {
            if !fields.contains_key(*field) {
                return Err(ApiError::bad_request(format!(
                    "Missing required field: {}",
                    field
                )));
            }
        }

        Ok(Self {
            fields,
            email: None,
            code: None,
        })
    }

    /// Step 4: email shape, then allow-list membership. Attaches the
    /// trimmed, lowercased email on success.
    pub fn check_email(mut self, allowlist: &AllowList) -> Result<Self, ApiError> {
        let raw = self
            .fields
            .get("email")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::bad_request("Email is required"))?;
        let email = raw.trim();

        if !is_email_shaped(email) {
            return Err(ApiError::bad_request("Invalid email format"));
        }
        if !allowlist.is_allowed(email) {
            return Err(ApiError::forbidden(
                "Email not authorized to access this application",
            ));
        }

        self.email = Some(email.to_lowercase());
        Ok(self)
    }

    /// Step 5: verification code must be exactly 6 ASCII digits.
    pub fn check_code(mut self) -> Result<Self, ApiError> {
        let raw = self
            .fields
            .get("code")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::bad_request("Verification code is required"))?;
        let code = raw.trim();

        if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ApiError::bad_request("Invalid verification code format"));
        }

        self.code = Some(code.to_string());
        Ok(self)
    }

    /// Normalized email attached by `check_email`.
    pub fn email(&self) -> Result<&str, ApiError> {
        self.email
            .as_deref()
            .ok_or_else(|| ApiError::internal("email was not validated"))
    }

    /// Code attached by `check_code`.
    pub fn code(&self) -> Result<&str, ApiError> {
        self.code
            .as_deref()
            .ok_or_else(|| ApiError::internal("code was not validated"))
    }

    /// Deserialize the validated body into a typed request.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))
    }
}

/// Shape check mirroring `local@domain.tld`: no whitespace, exactly one
/// `@`, and a dot with a non-empty label on each side in the domain.
fn is_email_shaped(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn post(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn allowlist() -> AllowList {
        AllowList::from_config(Some("a@b.com,user@example.com"))
    }

    #[tokio::test]
    async fn non_post_is_405() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/")
            .body(Body::empty())
            .unwrap();
        let err = RequestContext::from_request(request, &["email"])
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn non_json_body_is_400() {
        let err = RequestContext::from_request(post("not json"), &[])
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid JSON in request body.");
    }

    #[tokio::test]
    async fn json_array_body_is_400() {
        let err = RequestContext::from_request(post("[1,2]"), &[])
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_field_is_named() {
        let err = RequestContext::from_request(post(r#"{"email":"a@b.com"}"#), &["email", "code"])
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Missing required field: code");
    }

    #[tokio::test]
    async fn null_field_counts_as_present() {
        let ctx = RequestContext::from_request(post(r#"{"email":null}"#), &["email"]).await;
        assert!(ctx.is_ok());
    }

    #[tokio::test]
    async fn valid_email_is_normalized() {
        let ctx = RequestContext::from_request(post(r#"{"email":" User@Example.com "}"#), &["email"])
            .await
            .unwrap()
            .check_email(&allowlist())
            .unwrap();
        assert_eq!(ctx.email().unwrap(), "user@example.com");
    }

    #[tokio::test]
    async fn malformed_email_is_400() {
        for bad in ["no-at-sign", "a@b", "@b.com", "a@", "a b@c.com", "a@b.", "a@.c"] {
            let ctx = RequestContext::from_request(
                post(&format!(r#"{{"email":"{}"}}"#, bad)),
                &["email"],
            )
            .await
            .unwrap();
            let err = ctx.check_email(&allowlist()).unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST, "email: {}", bad);
        }
    }

    #[tokio::test]
    async fn unlisted_email_is_403() {
        let ctx = RequestContext::from_request(post(r#"{"email":"x@y.com"}"#), &["email"])
            .await
            .unwrap();
        let err = ctx.check_email(&allowlist()).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn code_format_rules() {
        let ok = RequestContext::from_request(post(r#"{"code":" 123456 "}"#), &["code"])
            .await
            .unwrap()
            .check_code()
            .unwrap();
        assert_eq!(ok.code().unwrap(), "123456");

        for bad in ["12345", "1234567", "12345a", "12 456", ""] {
            let ctx = RequestContext::from_request(
                post(&format!(r#"{{"code":"{}"}}"#, bad)),
                &["code"],
            )
            .await
            .unwrap();
            assert!(ctx.check_code().is_err(), "code: {}", bad);
        }
    }

    #[tokio::test]
    async fn parse_into_typed_request() {
        #[derive(serde::Deserialize)]
        struct P {
            prompt: String,
        }
        let ctx = RequestContext::from_request(post(r#"{"prompt":"hi"}"#), &["prompt"])
            .await
            .unwrap();
        let p: P = ctx.parse().unwrap();
        assert_eq!(p.prompt, "hi");
    }
}
