/*!
 * OpenAI-compatible chat completions client.
 *
 * One client covers every endpoint speaking the `/chat/completions` wire
 * format: OpenAI itself, Ollama's compatibility endpoint, and LM Studio.
 * Transient failures (network errors, 429, 5xx) are retried with exponential
 * backoff; client errors are not.
 */

use async_trait::async_trait;
use log::{error, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::{ChatMessage, ChatRequest, ChatResponse, Provider, ProviderCapabilities};

/// Wire request for the chat completions endpoint
#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    /// Model name
    model: &'a str,
    /// Conversation messages
    messages: &'a [ChatMessage],
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Streaming is never used here
    stream: bool,
}

/// Wire response from the chat completions endpoint
#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: Option<u64>,
    #[serde(default)]
    completion_tokens: Option<u64>,
}

/// Client for OpenAI-compatible chat endpoints
#[derive(Debug)]
pub struct OpenAiCompat {
    /// Base URL up to and including the API root (e.g. `https://api.openai.com/v1`)
    base_url: String,
    /// Bearer token, empty for local servers
    api_key: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

impl OpenAiCompat {
    /// Create a new client for the given endpoint.
    ///
    /// The endpoint may be given with or without a scheme and with or
    /// without a trailing slash; `/chat/completions` is appended per call.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout_secs: u64) -> Self {
        let endpoint = endpoint.into();
        let base_url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", endpoint.trim_end_matches('/'))
        };

        if Url::parse(&base_url).is_err() {
            warn!("Endpoint does not parse as a URL: {}", base_url);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();

        OpenAiCompat {
            base_url,
            api_key: api_key.into(),
            client,
            max_retries: 3,
            backoff_base_ms: 1000,
        }
    }

    /// Override the retry policy
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn send_once(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let wire = WireRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            stream: false,
        };

        let mut builder = self.client.post(self.completions_url()).json(&wire);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::AuthenticationError(message));
        }
        if status.as_u16() == 429 {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::RateLimitExceeded(message));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let parsed: WireResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let text = parsed
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        let (prompt_tokens, completion_tokens) = match parsed.usage {
            Some(usage) => (usage.prompt_tokens, usage.completion_tokens),
            None => (None, None),
        };

        Ok(ChatResponse {
            text,
            prompt_tokens,
            completion_tokens,
        })
    }

    /// Whether an error is worth retrying
    fn is_transient(error: &ProviderError) -> bool {
        matches!(
            error,
            ProviderError::ConnectionError(_)
                | ProviderError::RateLimitExceeded(_)
                | ProviderError::ApiError { status_code: 500..=599, .. }
        )
    }
}

#[async_trait]
impl Provider for OpenAiCompat {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let mut attempt: u32 = 0;
        let mut last_error: Option<ProviderError> = None;

        while attempt <= self.max_retries {
            match self.send_once(&request).await {
                Ok(response) => return Ok(response),
                Err(e) if Self::is_transient(&e) => {
                    warn!(
                        "Chat request failed (attempt {}/{}): {}",
                        attempt + 1,
                        self.max_retries + 1,
                        e
                    );
                    last_error = Some(e);
                }
                Err(e) => {
                    error!("Chat request failed permanently: {}", e);
                    return Err(e);
                }
            }

            attempt += 1;
            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!(
                "request failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        // A one-token request is the cheapest reliable probe these endpoints
        // all support
        let request = ChatRequest::new(
            "".to_string(),
            vec![ChatMessage::user("ping")],
        );
        match self.send_once(&request).await {
            Ok(_) => Ok(()),
            // An API-level complaint still proves the endpoint is reachable
            Err(ProviderError::ApiError { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn capabilities(&self) -> ProviderCapabilities {
        // Chat-style endpoints take reference pairs as conversation history
        // and the target language inside the system prompt
        ProviderCapabilities {
            reference_pairs: true,
            target_language: true,
        }
    }
}
