//! Completion backends over HTTP.
//!
//! Two API dialects are supported: OpenAI-compatible chat completions
//! (`{api_url}/chat/completions`) and the Anthropic Messages API
//! (`{api_url}/messages`). Both send the household prompt as a single user
//! message and return the reply text untouched; picking an action out of it
//! is the policy's job.
//!
//! Calls block. Each request is bounded by the configured timeout, and every
//! failure is returned as a [`BackendError`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use tracing::{debug, info};

use agora_agents::{BackendError, CompletionBackend, GenerationParams};
use agora_core::{LlmBackendKind, LlmConfig};

use crate::error::LlmError;

/// Name reported by [`OpenAiBackend`].
const OPENAI_NAME: &str = "openai-compatible";

/// Name reported by [`AnthropicBackend`].
const ANTHROPIC_NAME: &str = "anthropic";

/// Anthropic API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

// ---------------------------------------------------------------------------
// OpenAI-compatible backend
// ---------------------------------------------------------------------------

/// Backend for OpenAI-compatible chat completions APIs.
///
/// Works with `OpenAI`, `DeepSeek`, and Ollama endpoints.
pub struct OpenAiBackend {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    /// Create a backend from configuration.
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        Ok(Self {
            client: http_client(config)?,
            api_url: trimmed_url(config)?,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

impl CompletionBackend for OpenAiBackend {
    fn name(&self) -> &str {
        OPENAI_NAME
    }

    fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String, BackendError> {
        require_key(OPENAI_NAME, &self.api_key)?;
        let url = format!("{}/chat/completions", self.api_url);
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "user", "content": prompt}
            ],
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
        });
        let request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body);
        let json = send(OPENAI_NAME, request)?;
        extract_openai_content(&json)
    }
}

/// Extract the text content from an `OpenAI` chat completions response.
pub fn extract_openai_content(json: &serde_json::Value) -> Result<String, BackendError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(serde_json::Value::as_str)
        .map(|text| text.trim().to_owned())
        .ok_or_else(|| BackendError::MalformedResponse {
            backend: OPENAI_NAME.to_owned(),
            reason: "missing choices[0].message.content".to_owned(),
        })
}

// ---------------------------------------------------------------------------
// Anthropic Messages API backend
// ---------------------------------------------------------------------------

/// Backend for the Anthropic Messages API.
///
/// Uses the `x-api-key` header and reads `content[0].text`.
pub struct AnthropicBackend {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl AnthropicBackend {
    /// Create a backend from configuration.
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        Ok(Self {
            client: http_client(config)?,
            api_url: trimmed_url(config)?,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

impl CompletionBackend for AnthropicBackend {
    fn name(&self) -> &str {
        ANTHROPIC_NAME
    }

    fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String, BackendError> {
        require_key(ANTHROPIC_NAME, &self.api_key)?;
        let url = format!("{}/messages", self.api_url);
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
            "messages": [
                {"role": "user", "content": prompt}
            ]
        });
        let request = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);
        let json = send(ANTHROPIC_NAME, request)?;
        extract_anthropic_content(&json)
    }
}

/// Extract the text content from an Anthropic Messages API response.
pub fn extract_anthropic_content(json: &serde_json::Value) -> Result<String, BackendError> {
    json.get("content")
        .and_then(|c| c.get(0))
        .and_then(|b| b.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(|text| text.trim().to_owned())
        .ok_or_else(|| BackendError::MalformedResponse {
            backend: ANTHROPIC_NAME.to_owned(),
            reason: "missing content[0].text".to_owned(),
        })
}

// ---------------------------------------------------------------------------
// Shared plumbing
// ---------------------------------------------------------------------------

fn http_client(config: &LlmConfig) -> Result<Client, LlmError> {
    Ok(Client::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .build()?)
}

fn trimmed_url(config: &LlmConfig) -> Result<String, LlmError> {
    let url = config.api_url.trim_end_matches('/');
    if url.is_empty() {
        return Err(LlmError::MissingUrl);
    }
    Ok(url.to_owned())
}

fn require_key(backend: &str, api_key: &str) -> Result<(), BackendError> {
    if api_key.trim().is_empty() {
        return Err(BackendError::MissingCredentials {
            backend: backend.to_owned(),
        });
    }
    Ok(())
}

fn send(backend: &str, request: RequestBuilder) -> Result<serde_json::Value, BackendError> {
    let response = request.send().map_err(|e| BackendError::Request {
        backend: backend.to_owned(),
        message: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .unwrap_or_else(|_| "unable to read error body".to_owned());
        return Err(BackendError::Status {
            backend: backend.to_owned(),
            status: status.as_u16(),
            body,
        });
    }

    let json = response
        .json::<serde_json::Value>()
        .map_err(|e| BackendError::MalformedResponse {
            backend: backend.to_owned(),
            reason: format!("response parse failed: {e}"),
        })?;
    debug!(backend, "Completion received");
    Ok(json)
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Create a completion backend from configuration.
///
/// Dispatches on [`LlmConfig::backend`]. A missing API key is not an error
/// here; calls will fail with [`BackendError::MissingCredentials`] and the
/// households fall back to random actions.
///
/// # Errors
///
/// Returns [`LlmError`] if the HTTP client cannot be built or the URL is
/// empty.
pub fn create_backend(config: &LlmConfig) -> Result<Arc<dyn CompletionBackend>, LlmError> {
    let backend: Arc<dyn CompletionBackend> = match config.backend {
        LlmBackendKind::OpenAi => Arc::new(OpenAiBackend::new(config)?),
        LlmBackendKind::Anthropic => Arc::new(AnthropicBackend::new(config)?),
    };
    info!(
        backend = backend.name(),
        model = %config.model,
        credentials = !config.api_key.trim().is_empty(),
        "Completion backend ready"
    );
    Ok(backend)
}
