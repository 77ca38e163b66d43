//! # Summoner - a League of Legends assistant
//!
//! Summoner answers French questions about League of Legends champions:
//! - Reference data from Data Dragon, cached per data version
//! - Derived statistics (level checkpoints, damage profile, mobility and scaling scores)
//! - An ordered keyword rule table that picks a reply composer
//! - A small knowledge base for game basics
//! - A language-model fallback for everything else
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use summoner_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = SummonerConfig::load()?;
//!     let assistant = Assistant::from_config(&config)?;
//!
//!     let mut session = Session::from_config(&config.session);
//!     let reply = assistant.respond(&mut session, "Quelles sont les stats d'Ahri ?").await;
//!     println!("{}", reply);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `llm-huggingface` (default): Hugging Face inference API provider
//! - `llm-ollama`: local Ollama provider

pub mod assistant;
pub mod catalog;
pub mod config;
pub mod conversation;
pub mod enrich;
pub mod error;
pub mod knowledge;
pub mod llm;
pub mod matchup;
pub mod retry;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::assistant::{Assistant, AssistantBuilder, Chatbot, Intent, Query, Topic};
    pub use crate::catalog::{
        AbilityKey, AbilitySlot, ChampionCatalog, DataDragonSource, ReferenceRecord,
        ReferenceSource,
    };
    pub use crate::config::{
        DataDragonConfig, GenerationConfig, LLMProvider as LLMProviderType, LLMProviderConfig,
        SummonerConfig,
    };
    pub use crate::conversation::{ConversationContext, Role, Session, SkillLevel, Turn};
    pub use crate::enrich::{EnrichedRecord, HeuristicWeights, enrich};
    pub use crate::error::{Result, SummonerError};
    pub use crate::knowledge::KnowledgeBase;
    pub use crate::llm::{FallbackClient, LLMProvider, LLMProviderFactory, LLMRequest, LLMResponse};
    pub use crate::matchup::{MatchupSource, MatchupTable, StaticMatchupTable};
    pub use crate::retry::RetryConfig;
}
