//! Language-model access
//!
//! [`LLMProvider`] abstracts the inference backend; [`FallbackClient`] builds
//! the assistant's augmented prompt and turns provider failures into
//! [`SummonerError`](crate::error::SummonerError) values the router can
//! degrade on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::error::Result;

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

/// Request to an LLM provider
#[derive(Debug, Clone)]
pub struct LLMRequest {
    /// Messages in the conversation
    pub messages: Vec<Message>,

    /// Temperature for generation (0.0-2.0)
    pub temperature: Option<f32>,

    /// Nucleus sampling threshold
    pub top_p: Option<f32>,

    /// Maximum tokens to generate
    pub max_tokens: Option<usize>,

    /// Stop sequences
    pub stop_sequences: Vec<String>,
}

impl LLMRequest {
    /// Create a simple request from a single prompt
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message {
                role: MessageRole::User,
                content: prompt.into(),
            }],
            temperature: None,
            top_p: None,
            max_tokens: None,
            stop_sequences: Vec::new(),
        }
    }

    /// Apply sampling parameters
    pub fn with_generation(mut self, generation: &GenerationConfig) -> Self {
        self.temperature = Some(generation.temperature);
        self.top_p = Some(generation.top_p);
        self.max_tokens = Some(generation.max_tokens);
        self.stop_sequences = generation.stop_sequences.clone();
        self
    }

    /// All message contents joined, for completion-style endpoints.
    pub fn flattened_prompt(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Response from an LLM provider
#[derive(Debug, Clone)]
pub struct LLMResponse {
    /// Generated content
    pub content: String,

    /// Token usage information
    pub usage: Option<TokenUsage>,
}

/// Token usage information
#[derive(Debug, Clone)]
pub struct TokenUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// Trait for LLM provider implementations.
///
/// Implementors map transport failures to
/// [`SummonerError::Upstream`](crate::error::SummonerError::Upstream) or
/// [`SummonerError::Timeout`](crate::error::SummonerError::Timeout) so that
/// retries can tell transient failures from permanent ones.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate text from a structured request.
    async fn generate_request(&self, request: &LLMRequest) -> Result<LLMResponse>;

    /// Generate text for a single prompt.
    async fn generate(&self, prompt: &str, generation: &GenerationConfig) -> Result<String> {
        let request = LLMRequest::from_prompt(prompt).with_generation(generation);
        let response = self.generate_request(&request).await?;
        Ok(response.content)
    }

    /// Get model information
    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "unknown".to_string(),
            model_name: "unknown".to_string(),
        }
    }
}

/// Model information
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub provider: String,
    pub model_name: String,
}

pub mod factory;
pub mod fallback;
pub mod providers;

pub use factory::LLMProviderFactory;
pub use fallback::{FallbackClient, PromptContext, build_prompt, clean_completion};

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoProvider;

    #[async_trait]
    impl LLMProvider for EchoProvider {
        async fn generate_request(&self, request: &LLMRequest) -> Result<LLMResponse> {
            Ok(LLMResponse {
                content: format!(
                    "{}|{:?}|{:?}",
                    request.flattened_prompt(),
                    request.max_tokens,
                    request.top_p
                ),
                usage: None,
            })
        }
    }

    #[test]
    fn test_request_with_generation() {
        let request = LLMRequest::from_prompt("Bonjour").with_generation(&GenerationConfig::default());
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.top_p, Some(0.95));
        assert_eq!(request.max_tokens, Some(500));
        assert_eq!(request.stop_sequences, vec!["Question:", "\n\n"]);
    }

    #[tokio::test]
    async fn test_default_generate() {
        let text = EchoProvider
            .generate("Bonjour", &GenerationConfig::default())
            .await
            .unwrap();
        assert_eq!(text, "Bonjour|Some(500)|Some(0.95)");
        assert_eq!(EchoProvider.model_info().provider, "unknown");
    }
}
