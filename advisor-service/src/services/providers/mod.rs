//! Text completion provider abstraction.
//!
//! The advisor only needs one operation from a language model: turn a system
//! prompt plus a user prompt into a single completion string. Backends are
//! swappable behind [`TextProvider`] (OpenAI, Gemini, mock).

pub mod gemini;
pub mod mock;
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited by completion provider")]
    RateLimited,

    #[error("Content filtered by completion provider")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Completion provider returned no content")]
    EmptyCompletion,
}

impl ProviderError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::ContentFiltered => "content_filtered",
            ProviderError::NetworkError(_) => "network_error",
            ProviderError::EmptyCompletion => "empty_completion",
        }
    }
}

/// Sampling parameters for a completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    /// Maximum output tokens.
    pub max_tokens: u32,

    /// Temperature (0.0 - 2.0). Kept low so the model sticks to the
    /// requested line format.
    pub temperature: f32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            max_tokens: 200,
            temperature: 0.2,
        }
    }
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
    Other,
}

impl FinishReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinishReason::Complete => "complete",
            FinishReason::Length => "length",
            FinishReason::ContentFilter => "content_filter",
            FinishReason::Other => "other",
        }
    }
}

/// A finished completion.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Completion text, trimmed of surrounding whitespace.
    pub text: String,

    pub input_tokens: u32,
    pub output_tokens: u32,
    pub finish_reason: FinishReason,
}

/// Trait for text completion providers.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Provider name used in logs and metric labels.
    fn name(&self) -> &'static str;

    /// Model the provider sends requests to.
    fn model(&self) -> &str;

    /// Run one completion.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: &CompletionParams,
    ) -> Result<Completion, ProviderError>;
}

/// Build the shared HTTP client for a remote provider.
pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e)))
}

/// Map a transport failure to a [`ProviderError`].
///
/// Error text never includes the request URL.
pub(crate) fn network_error(err: reqwest::Error) -> ProviderError {
    ProviderError::NetworkError(err.without_url().to_string())
}

/// Map an undecodable upstream body to a [`ProviderError`].
pub(crate) fn decode_error(err: reqwest::Error) -> ProviderError {
    ProviderError::ApiError(format!("Failed to parse response: {}", err.without_url()))
}

/// Map a non-success upstream response to a [`ProviderError`].
pub(crate) async fn error_from_response(provider: &str, response: reqwest::Response) -> ProviderError {
    let status = response.status();
    if status.as_u16() == 429 {
        return ProviderError::RateLimited;
    }

    let error_text = response.text().await.unwrap_or_default();
    ProviderError::ApiError(format!("{} API error {}: {}", provider, status, error_text))
}
