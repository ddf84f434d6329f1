/*!
 * Core translation service implementation.
 *
 * Wraps a provider behind a capability descriptor resolved once at
 * construction: whether the endpoint accepts few-shot reference pairs and a
 * target-language hint is decided here, never re-probed per call.
 */

use log::debug;
use parking_lot::Mutex;

use crate::errors::ProviderError;
use crate::providers::{ChatMessage, ChatRequest, Provider, ProviderCapabilities};
use crate::translation::glossary::Glossary;
use crate::translation::prompts::PromptTemplate;

/// Post-processing hook applied to every provider response before storage
pub type PostProcess = Box<dyn Fn(String) -> String + Send + Sync>;

/// Token usage statistics for tracking API consumption
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenUsageStats {
    /// Number of prompt tokens
    pub prompt_tokens: u64,

    /// Number of completion tokens
    pub completion_tokens: u64,

    /// Total number of tokens
    pub total_tokens: u64,

    /// Number of API requests made
    pub requests: u64,
}

impl TokenUsageStats {
    /// Add token usage numbers from one response
    pub fn add_token_usage(&mut self, prompt_tokens: Option<u64>, completion_tokens: Option<u64>) {
        if let Some(pt) = prompt_tokens {
            self.prompt_tokens += pt;
            self.total_tokens += pt;
        }
        if let Some(ct) = completion_tokens {
            self.completion_tokens += ct;
            self.total_tokens += ct;
        }
        self.requests += 1;
    }

    /// Generate a summary of token usage
    pub fn summary(&self) -> String {
        format!(
            "Token usage: {} requests, {} prompt + {} completion = {} total",
            self.requests, self.prompt_tokens, self.completion_tokens, self.total_tokens
        )
    }
}

/// Translation service backed by an LLM provider.
///
/// One service can be shared across documents: it holds no per-document
/// state beyond aggregate token counters.
pub struct TranslationService {
    /// The provider client
    provider: Box<dyn Provider>,

    /// What the provider accepts, resolved at construction
    capabilities: ProviderCapabilities,

    /// Model name passed through to the provider
    model: String,

    /// Target language code baked into the system prompt
    target_language: String,

    /// System prompt template
    template: PromptTemplate,

    /// Instruction text; `None` uses the built-in markdown instruction
    instruction: Option<String>,

    /// Optional glossary rendered into the system prompt per unit
    glossary: Option<Glossary>,

    /// Sampling temperature
    temperature: Option<f32>,

    /// Optional response post-processing hook
    post_process: Option<PostProcess>,

    /// Aggregate token usage across all calls
    usage: Mutex<TokenUsageStats>,
}

impl std::fmt::Debug for TranslationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationService")
            .field("model", &self.model)
            .field("target_language", &self.target_language)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

impl TranslationService {
    /// Create a new service around a provider.
    ///
    /// The capability descriptor is read from the provider here, once.
    pub fn new(provider: Box<dyn Provider>, model: impl Into<String>, target_language: impl Into<String>) -> Self {
        let capabilities = provider.capabilities();
        TranslationService {
            provider,
            capabilities,
            model: model.into(),
            target_language: target_language.into(),
            template: PromptTemplate::default(),
            instruction: None,
            glossary: None,
            temperature: None,
            post_process: None,
            usage: Mutex::new(TokenUsageStats::default()),
        }
    }

    /// Override the default instruction text
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    /// Attach a glossary
    pub fn with_glossary(mut self, glossary: Glossary) -> Self {
        self.glossary = Some(glossary);
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Install a response post-processing hook
    pub fn with_post_process(mut self, post_process: PostProcess) -> Self {
        self.post_process = Some(post_process);
        self
    }

    /// The resolved capability descriptor
    pub fn capabilities(&self) -> ProviderCapabilities {
        self.capabilities
    }

    /// Aggregate token usage so far
    pub fn token_usage(&self) -> TokenUsageStats {
        *self.usage.lock()
    }

    /// Verify the provider is reachable
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        self.provider.test_connection().await
    }

    /// Build the conversation for one unit.
    ///
    /// Reference pairs become alternating user/assistant turns before the
    /// final user message, but only when the capability descriptor says the
    /// endpoint accepts them.
    fn build_messages(&self, source_text: &str, reference_pairs: &[(String, String)]) -> Vec<ChatMessage> {
        let instruction = self
            .instruction
            .as_deref()
            .unwrap_or(PromptTemplate::MARKDOWN_INSTRUCTION);
        let target_language = if self.capabilities.target_language {
            self.target_language.as_str()
        } else {
            "the target language"
        };
        let mut system_content = self.template.render(target_language, instruction);

        if let Some(glossary) = &self.glossary {
            if let Some(block) = glossary.prompt_block(source_text) {
                system_content.push_str("\n\n");
                system_content.push_str(&block);
            }
        }

        let mut messages = vec![ChatMessage::system(system_content)];

        if self.capabilities.reference_pairs {
            for (reference_source, reference_translation) in reference_pairs {
                messages.push(ChatMessage::user(reference_source.clone()));
                messages.push(ChatMessage::assistant(reference_translation.clone()));
            }
        }

        messages.push(ChatMessage::user(source_text.to_string()));
        messages
    }

    /// Translate one unit, with optional few-shot context.
    ///
    /// Failures surface as `ProviderError`; the caller decides whether they
    /// abort anything (they never abort the batch).
    pub async fn translate(
        &self,
        source_text: &str,
        reference_pairs: &[(String, String)],
    ) -> Result<String, ProviderError> {
        let messages = self.build_messages(source_text, reference_pairs);
        debug!(
            "Translating {} chars with {} reference pairs",
            source_text.len(),
            if self.capabilities.reference_pairs { reference_pairs.len() } else { 0 }
        );

        let mut request = ChatRequest::new(self.model.clone(), messages);
        if let Some(temperature) = self.temperature {
            request = request.temperature(temperature);
        }

        let response = self.provider.chat(request).await?;
        self.usage
            .lock()
            .add_token_usage(response.prompt_tokens, response.completion_tokens);

        let mut text = response.text;
        if let Some(post_process) = &self.post_process {
            text = post_process(text);
        }
        Ok(text)
    }
}
