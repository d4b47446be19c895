//! Delegated AI-inference backend.
//!
//! The model invocation is a black box from the gateway's point of view:
//! prompt and parameters in, JSON result or binary image out. `HttpBackend`
//! talks to a hosted inference API; `EchoBackend` is the local stub used in
//! development and tests.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::InferenceConfig;

const DEFAULT_TEXT_MODEL: &str = "@cf/meta/llama-2-7b-chat-int8";
const DEFAULT_IMAGE_MODEL: &str = "@cf/stabilityai/stable-diffusion-xl-base-1.0";

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("backend request failed: {0}")]
    Request(String),
    #[error("backend is not configured: {0}")]
    Misconfigured(String),
}

/// Text/code generation request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TextRequest {
    pub prompt: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub options: Option<Value>,
}

/// Image generation request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ImageRequest {
    pub prompt: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub steps: Option<u32>,
}

/// Binary image result.
pub struct ImageOutput {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Resolve the model a request will run on (for response metadata).
    fn resolve_text_model(&self, requested: Option<&str>) -> String {
        requested.unwrap_or(DEFAULT_TEXT_MODEL).to_string()
    }

    async fn generate_text(&self, req: &TextRequest) -> Result<Value, InferenceError>;

    async fn generate_code(&self, req: &TextRequest) -> Result<Value, InferenceError>;

    async fn generate_image(&self, req: &ImageRequest) -> Result<ImageOutput, InferenceError>;
}

/// Local stub: echoes the prompt back. Used when `inference.mode = "echo"`.
pub struct EchoBackend;

// Enough bytes to be recognizably a PNG; the stub never renders anything.
const PNG_STUB: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52,
];

#[async_trait]
impl InferenceBackend for EchoBackend {
    async fn generate_text(&self, req: &TextRequest) -> Result<Value, InferenceError> {
        Ok(json!({ "response": format!("echo: {}", req.prompt) }))
    }

    async fn generate_code(&self, req: &TextRequest) -> Result<Value, InferenceError> {
        Ok(json!({ "response": format!("// echo: {}", req.prompt) }))
    }

    async fn generate_image(&self, _req: &ImageRequest) -> Result<ImageOutput, InferenceError> {
        Ok(ImageOutput {
            bytes: PNG_STUB.to_vec(),
            content_type: "image/png",
        })
    }
}

/// HTTP client for a hosted inference API.
///
/// POSTs the request parameters to `{base_url}/{model}` with an optional
/// bearer token. Timeouts and retries are the backend's concern, not ours.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_token,
        }
    }

    fn request(&self, model: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), model);
        let mut builder = self.client.post(url);
        if let Some(ref token) = self.api_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn run_json(&self, model: &str, payload: Value) -> Result<Value, InferenceError> {
        let response = self
            .request(model)
            .json(&payload)
            .send()
            .await
            .map_err(|e| InferenceError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| InferenceError::Request(e.to_string()))?;
        response
            .json()
            .await
            .map_err(|e| InferenceError::Request(e.to_string()))
    }
}

#[async_trait]
impl InferenceBackend for HttpBackend {
    async fn generate_text(&self, req: &TextRequest) -> Result<Value, InferenceError> {
        let model = self.resolve_text_model(req.model.as_deref());
        let mut payload = json!({ "prompt": req.prompt });
        if let Some(Value::Object(ref options)) = req.options {
            for (k, v) in options {
                payload[k] = v.clone();
            }
        }
        self.run_json(&model, payload).await
    }

    async fn generate_code(&self, req: &TextRequest) -> Result<Value, InferenceError> {
        self.generate_text(req).await
    }

    async fn generate_image(&self, req: &ImageRequest) -> Result<ImageOutput, InferenceError> {
        let model = req.model.as_deref().unwrap_or(DEFAULT_IMAGE_MODEL);
        let payload = json!({
            "prompt": req.prompt,
            "width": req.width,
            "height": req.height,
            "steps": req.steps,
        });
        let response = self
            .request(model)
            .json(&payload)
            .send()
            .await
            .map_err(|e| InferenceError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| InferenceError::Request(e.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| InferenceError::Request(e.to_string()))?;
        Ok(ImageOutput {
            bytes: bytes.to_vec(),
            content_type: "image/png",
        })
    }
}

/// Select a backend from configuration.
pub fn backend_from_config(
    config: &InferenceConfig,
) -> Result<std::sync::Arc<dyn InferenceBackend>, InferenceError> {
    match config.mode.as_str() {
        "echo" => Ok(std::sync::Arc::new(EchoBackend)),
        "http" => {
            let base_url = config.base_url.as_deref().ok_or_else(|| {
                InferenceError::Misconfigured("inference.base_url is required in http mode".into())
            })?;
            Ok(std::sync::Arc::new(HttpBackend::new(
                base_url,
                config.api_token.clone(),
            )))
        }
        other => Err(InferenceError::Misconfigured(format!(
            "unknown inference mode: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echo_backend_echoes_prompt() {
        let backend = EchoBackend;
        let req = TextRequest {
            prompt: "hello".into(),
            model: None,
            options: None,
        };
        let result = backend.generate_text(&req).await.unwrap();
        assert_eq!(result["response"], "echo: hello");
    }

    #[tokio::test]
    async fn echo_backend_image_is_png() {
        let backend = EchoBackend;
        let req = ImageRequest {
            prompt: "a cat".into(),
            model: None,
            width: None,
            height: None,
            steps: None,
        };
        let out = backend.generate_image(&req).await.unwrap();
        assert_eq!(out.content_type, "image/png");
        assert_eq!(&out.bytes[..4], &[0x89, 0x50, 0x4e, 0x47]);
    }

    #[test]
    fn model_resolution_defaults() {
        let backend = EchoBackend;
        assert_eq!(backend.resolve_text_model(None), DEFAULT_TEXT_MODEL);
        assert_eq!(backend.resolve_text_model(Some("custom")), "custom");
    }

    #[test]
    fn backend_selection() {
        let echo = InferenceConfig {
            mode: "echo".into(),
            base_url: None,
            api_token: None,
        };
        assert!(backend_from_config(&echo).is_ok());

        let bad_http = InferenceConfig {
            mode: "http".into(),
            base_url: None,
            api_token: None,
        };
        assert!(backend_from_config(&bad_http).is_err());

        let unknown = InferenceConfig {
            mode: "quantum".into(),
            base_url: None,
            api_token: None,
        };
        assert!(backend_from_config(&unknown).is_err());
    }
}
