//! Configuration types for the Summoner assistant

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::enrich::HeuristicWeights;
use crate::error::{Result, SummonerError};
use crate::retry::RetryConfig;

/// Main configuration for the assistant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummonerConfig {
    /// Reference data service (Data Dragon)
    pub data_dragon: DataDragonConfig,

    /// Language-model fallback (optional; without it the router answers
    /// unmatched queries with a clarification request)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm: Option<LLMProviderConfig>,

    /// Retry policy shared by outbound calls
    pub retry: RetryConfig,

    /// Presentation heuristics used by stat enrichment
    pub heuristics: HeuristicWeights,

    /// Conversation session settings
    pub session: SessionConfig,

    /// Knowledge base matching
    pub knowledge: KnowledgeConfig,
}

impl Default for SummonerConfig {
    fn default() -> Self {
        Self {
            data_dragon: DataDragonConfig::default(),
            llm: Some(LLMProviderConfig::default()),
            retry: RetryConfig::default(),
            heuristics: HeuristicWeights::default(),
            session: SessionConfig::default(),
            knowledge: KnowledgeConfig::default(),
        }
    }
}

/// Data Dragon static data configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataDragonConfig {
    /// Base URL of the CDN
    pub base_url: String,

    /// Data version (patch), also the cache invalidation key
    pub version: String,

    /// Locale of the champion texts
    pub locale: String,

    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Maximum number of champion records kept in memory
    pub cache_capacity: usize,
}

impl Default for DataDragonConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ddragon.leagueoflegends.com".to_string(),
            version: "13.24.1".to_string(),
            locale: "fr_FR".to_string(),
            timeout: Duration::from_secs(10),
            cache_capacity: 256,
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMProviderConfig {
    /// Provider type
    pub provider: LLMProvider,

    /// Model name
    pub model: String,

    /// API key (if needed, prefer env vars)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL (for custom endpoints)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Sampling parameters sent with every fallback request
    pub generation: GenerationConfig,
}

impl Default for LLMProviderConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::HuggingFace,
            model: "mistralai/Mistral-7B-Instruct-v0.2".to_string(),
            api_key: None,
            base_url: None,
            timeout: Duration::from_secs(30),
            generation: GenerationConfig::default(),
        }
    }
}

impl LLMProviderConfig {
    /// Copy of this configuration with the API key masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.api_key.is_some() {
            copy.api_key = Some("***".to_string());
        }
        copy
    }
}

/// LLM provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    HuggingFace,
    Ollama,
}

/// Generation parameters for the fallback model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Maximum new tokens to generate
    pub max_tokens: usize,

    /// Sampling temperature (0.0-2.0)
    pub temperature: f32,

    /// Nucleus sampling threshold (0.0-1.0]
    pub top_p: f32,

    /// Stop sequences
    pub stop_sequences: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            temperature: 0.7,
            top_p: 0.95,
            stop_sequences: vec!["Question:".to_string(), "\n\n".to_string()],
        }
    }
}

/// Conversation session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of turns kept for the fallback prompt
    pub history_capacity: usize,

    /// Queries shorter than this (after trimming) are rejected
    pub min_query_length: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_capacity: 5,
            min_query_length: 2,
        }
    }
}

/// Knowledge base matching settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Minimum cosine similarity for a knowledge base answer
    pub similarity_threshold: f32,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.3,
        }
    }
}

impl SummonerConfig {
    /// Load configuration from files and environment variables.
    ///
    /// Loads in this order:
    /// 1. Default configuration
    /// 2. `summoner/summoner.toml` in the user configuration directory
    /// 3. `summoner.toml` in the working directory
    /// 4. The file named by `SUMMONER_CONFIG_PATH`
    /// 5. `SUMMONER_` environment variables (`__` separates sections,
    ///    e.g. `SUMMONER_DATA_DRAGON__VERSION`)
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is invalid.
    pub fn load() -> Result<Self> {
        Self::load_with(None::<&Path>)
    }

    /// Same as [`SummonerConfig::load`], with an extra file merged before
    /// environment overrides.
    pub fn load_with(extra: Option<impl AsRef<Path>>) -> Result<Self> {
        use figment::{
            Figment,
            providers::{Env, Format, Serialized, Toml},
        };

        let mut figment = Figment::from(Serialized::defaults(SummonerConfig::default()));

        if let Some(dir) = dirs::config_dir() {
            figment = figment.merge(Toml::file(dir.join("summoner").join("summoner.toml")));
        }

        figment = figment.merge(Toml::file("summoner.toml"));

        if let Ok(path) = std::env::var("SUMMONER_CONFIG_PATH") {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = extra {
            figment = figment.merge(Toml::file(path.as_ref()));
        }

        let config: SummonerConfig = figment
            .merge(Env::prefixed("SUMMONER_").split("__"))
            .extract()
            .map_err(|e| {
                SummonerError::Configuration(format!("Failed to load configuration: {}", e))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        use figment::{
            Figment,
            providers::{Format, Serialized, Toml},
        };

        let path = path.as_ref();
        if !path.exists() {
            return Err(SummonerError::Configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let config: SummonerConfig = Figment::from(Serialized::defaults(SummonerConfig::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| {
                SummonerError::Configuration(format!("Failed to load configuration file: {}", e))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Copy of the configuration that is safe to print.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.llm = self.llm.as_ref().map(LLMProviderConfig::redacted);
        copy
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.data_dragon.version.trim().is_empty() {
            return Err(SummonerError::Configuration(
                "data_dragon.version must not be empty".to_string(),
            ));
        }
        if !self.data_dragon.base_url.starts_with("http") {
            return Err(SummonerError::Configuration(format!(
                "data_dragon.base_url is not an http(s) URL: {}",
                self.data_dragon.base_url
            )));
        }
        if self.data_dragon.cache_capacity == 0 {
            return Err(SummonerError::Configuration(
                "data_dragon.cache_capacity must be at least 1".to_string(),
            ));
        }
        if self.session.history_capacity == 0 {
            return Err(SummonerError::Configuration(
                "session.history_capacity must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.knowledge.similarity_threshold) {
            return Err(SummonerError::Configuration(format!(
                "knowledge.similarity_threshold out of range: {}",
                self.knowledge.similarity_threshold
            )));
        }
        if let Some(llm) = &self.llm {
            let generation = &llm.generation;
            if !(0.0..=2.0).contains(&generation.temperature) {
                return Err(SummonerError::Configuration(format!(
                    "llm.generation.temperature out of range: {}",
                    generation.temperature
                )));
            }
            if generation.top_p <= 0.0 || generation.top_p > 1.0 {
                return Err(SummonerError::Configuration(format!(
                    "llm.generation.top_p out of range: {}",
                    generation.top_p
                )));
            }
            if generation.max_tokens == 0 {
                return Err(SummonerError::Configuration(
                    "llm.generation.max_tokens must be at least 1".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SummonerConfig::default();
        assert_eq!(config.data_dragon.locale, "fr_FR");
        assert_eq!(config.session.history_capacity, 5);
        assert_eq!(config.session.min_query_length, 2);

        let llm = config.llm.as_ref().unwrap();
        assert_eq!(llm.provider, LLMProvider::HuggingFace);
        assert_eq!(llm.generation.max_tokens, 500);
        assert_eq!(llm.generation.stop_sequences, vec!["Question:", "\n\n"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_merges_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[data_dragon]
version = "14.1.1"
timeout = "3s"

[llm]
provider = "ollama"
model = "mistral"

[heuristics]
ratio_weight = 10.0
"#
        )
        .unwrap();

        let config = SummonerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.data_dragon.version, "14.1.1");
        assert_eq!(config.data_dragon.timeout, Duration::from_secs(3));
        assert_eq!(config.data_dragon.locale, "fr_FR");

        let llm = config.llm.unwrap();
        assert_eq!(llm.provider, LLMProvider::Ollama);
        assert_eq!(llm.model, "mistral");
        assert_eq!(llm.generation.top_p, 0.95);

        assert_eq!(config.heuristics.ratio_weight, 10.0);
        assert_eq!(config.heuristics.mage_bonus, 30.0);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = SummonerConfig::from_file("/definitely/not/here/summoner.toml");
        assert!(matches!(result, Err(SummonerError::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_zero_history() {
        let mut config = SummonerConfig::default();
        config.session.history_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_sampling() {
        let mut config = SummonerConfig::default();
        config.llm.as_mut().unwrap().generation.top_p = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_redacted_hides_api_key() {
        let mut config = SummonerConfig::default();
        config.llm.as_mut().unwrap().api_key = Some("hf_secret".to_string());

        let shown = serde_json::to_string(&config.redacted()).unwrap();
        assert!(!shown.contains("hf_secret"));
        assert!(shown.contains("***"));
    }
}
