/*!
 * Translation service for markdown translation using AI providers.
 *
 * This module contains the functionality wrapped around the provider call:
 *
 * - `core`: the translation service and capability handling
 * - `prompts`: prompt templates for document translation
 * - `reference_pool`: few-shot context retrieval over finished pairs
 * - `glossary`: terminology constraints rendered into prompts
 */

// Re-export main types for easier usage
pub use self::core::{TokenUsageStats, TranslationService};
pub use self::glossary::{Glossary, TermPolicy};
pub use self::prompts::PromptTemplate;
pub use self::reference_pool::{ReferencePool, sequence_ratio};

// Submodules
pub mod core;
pub mod glossary;
pub mod prompts;
pub mod reference_pool;
