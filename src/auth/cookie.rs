//! Auth cookie construction and credential extraction.
//!
//! The session token travels either in the `auth=` cookie or in an
//! `Authorization: Bearer` header; the cookie wins when both are present.

use axum::http::{HeaderMap, header};
use chrono::{Duration, Utc};

pub const AUTH_COOKIE_NAME: &str = "auth";

/// Build the `Set-Cookie` value carrying a freshly issued token.
pub fn build_auth_cookie(token: &str, max_age_secs: i64) -> String {
    let expires = (Utc::now() + Duration::seconds(max_age_secs))
        .format("%a, %d %b %Y %H:%M:%S GMT");
    format!(
        "{}={}; Path=/; HttpOnly; Secure; SameSite=Strict; Expires={}",
        AUTH_COOKIE_NAME, token, expires
    )
}

/// Build the `Set-Cookie` value that clears the auth cookie.
pub fn clear_auth_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; Secure; SameSite=Strict; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
        AUTH_COOKIE_NAME
    )
}

/// Extract the token from the `Cookie` header, if present.
pub fn extract_token_from_cookie(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for cookie in cookie_header.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix("auth=") {
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Extract the token from an `Authorization: Bearer` header, if present.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_header.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(name: header::HeaderName, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn cookie_extraction_finds_auth_among_others() {
        let headers = headers_with(header::COOKIE, "theme=dark; auth=tok123; lang=en");
        assert_eq!(extract_token_from_cookie(&headers), Some("tok123".to_string()));
    }

    #[test]
    fn cookie_extraction_handles_absence() {
        let headers = headers_with(header::COOKIE, "theme=dark");
        assert_eq!(extract_token_from_cookie(&headers), None);
        assert_eq!(extract_token_from_cookie(&HeaderMap::new()), None);
    }

    #[test]
    fn empty_cookie_value_is_none() {
        let headers = headers_with(header::COOKIE, "auth=");
        assert_eq!(extract_token_from_cookie(&headers), None);
    }

    #[test]
    fn bearer_extraction() {
        let headers = headers_with(header::AUTHORIZATION, "Bearer tok456");
        assert_eq!(extract_bearer_token(&headers), Some("tok456".to_string()));

        let headers = headers_with(header::AUTHORIZATION, "Basic dXNlcjpwYXNz");
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn auth_cookie_attributes() {
        let cookie = build_auth_cookie("tok", 86400);
        assert!(cookie.starts_with("auth=tok; "));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Expires="));
    }

    #[test]
    fn clear_cookie_expires_at_epoch() {
        let cookie = clear_auth_cookie();
        assert!(cookie.starts_with("auth=;"));
        assert!(cookie.contains("01 Jan 1970"));
    }
}
