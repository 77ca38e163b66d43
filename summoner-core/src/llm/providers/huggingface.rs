//! Hugging Face Inference API provider (text generation)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, SummonerError};
use crate::llm::{LLMProvider, LLMRequest, LLMResponse, ModelInfo};

const SERVICE: &str = "hugging face";

pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";

/// Hosted text-generation models on Hugging Face.
pub struct HuggingFaceProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl HuggingFaceProvider {
    /// Create a new provider.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Hugging Face access token
    /// * `model` - Model repository (e.g., "mistralai/Mistral-7B-Instruct-v0.2")
    /// * `base_url` - Inference endpoint root (defaults to the public API)
    /// * `timeout` - Per-request timeout
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                SummonerError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }

    /// Create from environment variables.
    ///
    /// Reads `HUGGINGFACE_API_KEY` (required) and `HUGGINGFACE_MODEL`
    /// (optional, used when `model` is `None`).
    ///
    /// # Errors
    ///
    /// Returns an error if `HUGGINGFACE_API_KEY` is not set.
    pub fn from_env(model: Option<String>, timeout: Duration) -> Result<Self> {
        let api_key = std::env::var("HUGGINGFACE_API_KEY").map_err(|_| {
            SummonerError::Configuration(
                "HUGGINGFACE_API_KEY environment variable not set".to_string(),
            )
        })?;

        let model = model
            .or_else(|| std::env::var("HUGGINGFACE_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Self::new(api_key, model, None, timeout)
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }
}

#[derive(Serialize)]
struct HfRequest {
    inputs: String,
    parameters: HfParameters,
}

#[derive(Serialize)]
struct HfParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_new_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    do_sample: bool,
    return_full_text: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
}

#[derive(Deserialize)]
struct HfGeneration {
    #[serde(default)]
    generated_text: String,
}

#[async_trait]
impl LLMProvider for HuggingFaceProvider {
    async fn generate_request(&self, request: &LLMRequest) -> Result<LLMResponse> {
        let body = HfRequest {
            inputs: request.flattened_prompt(),
            parameters: HfParameters {
                max_new_tokens: request.max_tokens,
                temperature: request.temperature,
                top_p: request.top_p,
                do_sample: true,
                return_full_text: false,
                stop: request.stop_sequences.clone(),
            },
        };

        let url = self.endpoint();
        tracing::info!(model = %self.model, "requesting completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SummonerError::Timeout { service: SERVICE }
                } else {
                    SummonerError::upstream_transport(SERVICE, e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SummonerError::upstream_status(SERVICE, status.as_u16(), text));
        }

        let response_text = response.text().await.map_err(|e| {
            SummonerError::upstream_transport(SERVICE, format!("Failed to read response: {}", e))
        })?;

        let generations: Vec<HfGeneration> = serde_json::from_str(&response_text).map_err(|e| {
            SummonerError::MalformedPayload(format!("hugging face response: {}", e))
        })?;

        let content = generations
            .into_iter()
            .next()
            .map(|g| g.generated_text.trim().to_string())
            .unwrap_or_default();

        Ok(LLMResponse {
            content,
            usage: None,
        })
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "huggingface".to_string(),
            model_name: self.model.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = HuggingFaceProvider::new(
            "hf_test",
            "mistralai/Mistral-7B-Instruct-v0.2",
            Some("https://hf.example/".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(provider.model(), "mistralai/Mistral-7B-Instruct-v0.2");
        assert_eq!(
            provider.endpoint(),
            "https://hf.example/models/mistralai/Mistral-7B-Instruct-v0.2"
        );
        assert_eq!(provider.model_info().provider, "huggingface");
    }

    #[test]
    fn test_parameters_serialization() {
        let params = HfParameters {
            max_new_tokens: Some(500),
            temperature: Some(0.7),
            top_p: None,
            do_sample: true,
            return_full_text: false,
            stop: Vec::new(),
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["max_new_tokens"], 500);
        assert!(json.get("top_p").is_none());
        assert!(json.get("stop").is_none());
        assert_eq!(json["return_full_text"], false);
    }
}
