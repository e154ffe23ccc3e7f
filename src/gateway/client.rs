//! Completion-service client seam.
//!
//! The generative model is an opaque text-completion collaborator: it takes
//! a prompt (optionally with an inline image) and returns free text. The
//! real implementation talks to the Gemini REST API; the mock is for tests.

use async_trait::async_trait;
use base64::Engine;
use serde_json::json;

/// Default request timeout for completion calls. Exceeding it is treated as
/// a transient upstream failure by the classification layer.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// One completion request: a text prompt, optionally with an inline image
/// part for vision-shaped calls.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub image: Option<InlineImage>,
}

/// Base64-encoded image payload sent alongside the prompt.
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl CompletionRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
        }
    }

    pub fn with_image(prompt: impl Into<String>, mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            prompt: prompt.into(),
            image: Some(InlineImage {
                mime_type: mime_type.to_string(),
                data: base64::engine::general_purpose::STANDARD.encode(bytes),
            }),
        }
    }
}

/// Errors from the completion collaborator.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("Completion request failed: {0}")]
    Request(String),

    #[error("Completion service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Completion response shape unexpected: {0}")]
    ResponseShape(String),
}

/// Opaque text-completion capability.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run one completion call and return the raw response text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

/// HTTP client for the Gemini `generateContent` API.
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_body(request: &CompletionRequest) -> serde_json::Value {
        let mut parts = vec![json!({ "text": request.prompt })];
        if let Some(image) = &request.image {
            parts.push(json!({
                "inline_data": {
                    "mime_type": image.mime_type,
                    "data": image.data,
                }
            }));
        }
        json!({ "contents": [{ "parts": parts }] })
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::request_body(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Request(format!(
                        "Request timed out after {DEFAULT_TIMEOUT_SECS}s"
                    ))
                } else {
                    CompletionError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CompletionError::ResponseShape(e.to_string()))?;

        parsed["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|t| t.to_string())
            .ok_or_else(|| {
                CompletionError::ResponseShape("no text part in first candidate".into())
            })
    }
}

/// Mock completion client for tests — canned response or injected failure,
/// with a call counter so tests can assert a collaborator was not invoked.
pub struct MockCompletionClient {
    outcome: Result<String, String>,
    calls: std::sync::atomic::AtomicUsize,
    last_prompt: std::sync::Mutex<Option<String>>,
}

impl MockCompletionClient {
    /// Mock that answers every call with the given text.
    pub fn replying(response: &str) -> Self {
        Self {
            outcome: Ok(response.to_string()),
            calls: std::sync::atomic::AtomicUsize::new(0),
            last_prompt: std::sync::Mutex::new(None),
        }
    }

    /// Mock whose every call fails with the given error message.
    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            calls: std::sync::atomic::AtomicUsize::new(0),
            last_prompt: std::sync::Mutex::new(None),
        }
    }

    /// How many completion calls were made.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Prompt of the most recent call, if any.
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(request.prompt.clone());
        match &self.outcome {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(CompletionError::Request(message.clone())),
        }
    }
}
