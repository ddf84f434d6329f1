/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds with translated text
 * - `MockProvider::intermittent(n)` - Fails every nth request
 * - `MockProvider::failing()` - Always fails with an error
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::{ChatRequest, ChatResponse, Provider, ProviderCapabilities};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a marked-up translation
    Working,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns an empty response
    Empty,
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
    /// Capability descriptor reported to the service
    capabilities: ProviderCapabilities,
    /// Custom response generator (optional)
    custom_response: Option<fn(&ChatRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            capabilities: ProviderCapabilities::default(),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Override the reported capability descriptor
    pub fn with_capabilities(mut self, capabilities: ProviderCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Install a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&ChatRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of chat requests seen so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Default mock translation: echoes the source with a marker recording
    /// how many reference pairs rode along in the conversation
    fn default_response(request: &ChatRequest) -> String {
        let source = request
            .messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        // Every (user, assistant) pair between the system prompt and the
        // final user message is a reference example
        let reference_count = request
            .messages
            .iter()
            .filter(|m| m.role == "assistant")
            .count();
        if reference_count > 0 {
            format!("[MOCK ref={}] {}", reference_count, source)
        } else {
            format!("[MOCK] {}", source)
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;

        match self.behavior {
            MockBehavior::Failing => {
                return Err(ProviderError::RequestFailed("mock failure".to_string()));
            }
            MockBehavior::Intermittent { fail_every } if fail_every > 0 && count % fail_every == 0 => {
                return Err(ProviderError::RequestFailed(format!(
                    "mock intermittent failure on request {}",
                    count
                )));
            }
            MockBehavior::Empty => {
                return Err(ProviderError::EmptyResponse);
            }
            _ => {}
        }

        let text = match self.custom_response {
            Some(generator) => generator(&request),
            None => Self::default_response(&request),
        };

        Ok(ChatResponse {
            text,
            prompt_tokens: Some(10),
            completion_tokens: Some(10),
        })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError("mock is down".to_string())),
            _ => Ok(()),
        }
    }

    fn capabilities(&self) -> ProviderCapabilities {
        self.capabilities
    }
}
