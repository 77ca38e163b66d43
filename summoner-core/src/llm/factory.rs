//! Factory for creating LLM providers from configuration

use crate::config::{LLMProvider as LLMProviderType, LLMProviderConfig};
use crate::error::Result;
use crate::llm::LLMProvider;
use std::sync::Arc;

#[cfg(feature = "llm-huggingface")]
use crate::llm::providers::huggingface::HuggingFaceProvider;

#[cfg(feature = "llm-ollama")]
use crate::llm::providers::ollama::OllamaProvider;

/// Factory for creating LLM providers
pub struct LLMProviderFactory;

impl LLMProviderFactory {
    /// Create an LLM provider from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be created (e.g., missing API
    /// key, provider feature disabled)
    pub fn create(config: &LLMProviderConfig) -> Result<Arc<dyn LLMProvider>> {
        let model = if !config.model.is_empty() {
            Some(config.model.clone())
        } else {
            None
        };

        match config.provider {
            #[cfg(feature = "llm-huggingface")]
            LLMProviderType::HuggingFace => {
                // Config key first, then HUGGINGFACE_API_KEY
                let api_key = match &config.api_key {
                    Some(key) => key.clone(),
                    None => std::env::var("HUGGINGFACE_API_KEY").map_err(|_| {
                        crate::error::SummonerError::Configuration(
                            "Hugging Face needs llm.api_key or HUGGINGFACE_API_KEY".to_string(),
                        )
                    })?,
                };

                let provider = HuggingFaceProvider::new(
                    api_key,
                    model.unwrap_or_else(|| {
                        crate::llm::providers::huggingface::DEFAULT_MODEL.to_string()
                    }),
                    config.base_url.clone(),
                    config.timeout,
                )?;

                Ok(Arc::new(provider))
            }

            #[cfg(not(feature = "llm-huggingface"))]
            LLMProviderType::HuggingFace => Err(crate::error::SummonerError::Configuration(
                "Hugging Face provider requires 'llm-huggingface' feature".to_string(),
            )),

            #[cfg(feature = "llm-ollama")]
            LLMProviderType::Ollama => {
                let provider = if config.base_url.is_some() {
                    OllamaProvider::new(
                        model.unwrap_or_else(|| {
                            crate::llm::providers::ollama::DEFAULT_MODEL.to_string()
                        }),
                        config.base_url.clone(),
                        config.timeout,
                    )?
                } else {
                    OllamaProvider::from_env(model, config.timeout)?
                };

                Ok(Arc::new(provider))
            }

            #[cfg(not(feature = "llm-ollama"))]
            LLMProviderType::Ollama => Err(crate::error::SummonerError::Configuration(
                "Ollama provider requires 'llm-ollama' feature".to_string(),
            )),
        }
    }

    /// Create from SummonerConfig (if LLM config is present)
    pub fn from_config(config: Option<&LLMProviderConfig>) -> Result<Option<Arc<dyn LLMProvider>>> {
        match config {
            Some(cfg) => Ok(Some(Self::create(cfg)?)),
            None => Ok(None),
        }
    }
}

#[cfg(all(test, feature = "llm-huggingface"))]
mod tests {
    use super::*;

    #[test]
    fn test_create_with_config_key() {
        let config = LLMProviderConfig {
            api_key: Some("hf_test".to_string()),
            ..Default::default()
        };
        let provider = LLMProviderFactory::create(&config).unwrap();
        let info = provider.model_info();
        assert_eq!(info.provider, "huggingface");
        assert_eq!(info.model_name, "mistralai/Mistral-7B-Instruct-v0.2");
    }

    #[test]
    fn test_from_config_none() {
        assert!(LLMProviderFactory::from_config(None).unwrap().is_none());
    }
}
