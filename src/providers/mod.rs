/*!
 * Provider implementations for translation services.
 *
 * This module contains the client abstraction used to reach LLM providers:
 * - OpenAI-compatible chat endpoints (OpenAI, Ollama, LM Studio)
 * - A mock provider for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Chat message object
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, or assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage { role: "system".to_string(), content: content.into() }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage { role: "user".to_string(), content: content.into() }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage { role: "assistant".to_string(), content: content.into() }
    }
}

/// A chat completion request, provider-agnostic
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Model name to use
    pub model: String,
    /// Conversation messages in order
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// Create a new chat request
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        ChatRequest {
            model: model.into(),
            messages,
            temperature: None,
        }
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// A chat completion response, provider-agnostic
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// The completion text
    pub text: String,
    /// Number of prompt tokens, when the provider reports it
    pub prompt_tokens: Option<u64>,
    /// Number of completion tokens, when the provider reports it
    pub completion_tokens: Option<u64>,
}

/// What a provider endpoint can accept.
///
/// Resolved once at service construction, never per call: the service
/// consults this descriptor to decide whether to send reference pairs and
/// the target-language hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderCapabilities {
    /// Accepts few-shot (source, translation) example pairs
    pub reference_pairs: bool,
    /// Accepts an explicit target-language parameter
    pub target_language: bool,
}

impl Default for ProviderCapabilities {
    fn default() -> Self {
        ProviderCapabilities {
            reference_pairs: true,
            target_language: true,
        }
    }
}

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must
/// follow, allowing them to be used interchangeably in the translation
/// service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Complete a chat request using this provider
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Describe what this provider endpoint accepts
    fn capabilities(&self) -> ProviderCapabilities;
}

pub mod mock;
pub mod openai_compat;
