//! Language-model fallback
//!
//! Used when no structured composer could answer. The prompt carries fixed
//! instructions, the conversation context, data about the current subject and
//! the recent turns.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::{GenerationConfig, LLMProviderConfig};
use crate::conversation::{ConversationContext, TurnHistory};
use crate::enrich::EnrichedRecord;
use crate::error::{Result, SummonerError};
use crate::matchup::MatchupTable;
use crate::retry::{RetryConfig, with_retry, with_timeout};

use super::{LLMProvider, LLMProviderFactory, LLMRequest};

const SERVICE: &str = "language model";

/// Marker the prompt ends with; stripped from completions that echo it.
pub const ANSWER_MARKER: &str = "Réponse:";

pub const SYSTEM_PROMPT: &str = "Tu es un expert de League of Legends qui répond exclusivement en français.
Tu as accès aux données du jeu fournies ci-dessous.

Tu dois fournir des informations précises et détaillées sur :
- Les champions (capacités, statistiques, stratégies)
- Les mécaniques de jeu
- Les builds et objets
- Les matchups et contre-picks
- Les stratégies de jeu

Règles importantes :
1. Réponds TOUJOURS en français
2. Sois précis et concis
3. Base tes réponses UNIQUEMENT sur les données fournies
4. Adapte tes conseils au niveau du joueur (débutant, intermédiaire, avancé, expert)
5. Si tu n'as pas l'information dans les données fournies, dis-le clairement
6. Utilise la terminologie officielle du jeu

N'invente JAMAIS d'informations.";

/// Everything the prompt is built from besides the query.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub context: &'a ConversationContext,
    pub subject: Option<&'a EnrichedRecord>,
    pub matchups: Option<&'a MatchupTable>,
    pub history: &'a TurnHistory,
}

fn data_block(subject: &EnrichedRecord, matchups: Option<&MatchupTable>) -> String {
    let record = &subject.record;
    let stats = &record.stats;
    let mut out = String::from("\nDonnées du jeu :\n");

    let _ = writeln!(out, "\nChampion : {}", record.name);
    let _ = writeln!(out, "Classes : {}", record.tags.join(", "));

    out.push_str("\nStatistiques de base :\n");
    let _ = writeln!(out, "- PV : {} (+{})", stats.hp, stats.hp_per_level);
    let _ = writeln!(
        out,
        "- Dégâts : {} (+{})",
        stats.attack_damage, stats.attack_damage_per_level
    );
    let _ = writeln!(out, "- Armure : {} (+{})", stats.armor, stats.armor_per_level);
    let _ = writeln!(out, "- Mobilité : {}/10, Scaling : {}/10", subject.mobility, subject.scaling);

    out.push_str("\nCapacités :\n");
    let _ = writeln!(out, "Passif - {}", record.passive.name);
    for key in crate::catalog::AbilityKey::ALL {
        let _ = writeln!(out, "{} - {}", key, record.ability(key).name);
    }

    if let Some(table) = matchups {
        let names = |entries: &[crate::matchup::MatchupEntry]| {
            entries
                .iter()
                .take(3)
                .map(|e| e.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let _ = writeln!(out, "\nMatchups ({}) :", table.role);
        let _ = writeln!(out, "Contres : {}", names(&table.counter_picks));
        let _ = writeln!(out, "Avantagé contre : {}", names(&table.good_against));
    }

    out
}

fn context_block(context: &ConversationContext, subject: Option<&EnrichedRecord>) -> String {
    let mut out = String::from("\nContexte actuel :\n");

    match (subject, &context.subject) {
        (Some(enriched), _) => {
            let _ = writeln!(out, "- Champion : {}", enriched.record.name);
            let _ = writeln!(out, "- Type : {}", enriched.record.tags.join(", "));
        }
        (None, Some(id)) => {
            let _ = writeln!(out, "- Champion : {}", id);
        }
        (None, None) => {}
    }
    if let Some(role) = context.role {
        let _ = writeln!(out, "- Rôle : {}", role);
    }
    let _ = writeln!(out, "- Niveau de jeu : {}", context.skill_level.label());
    if let Some(topic) = &context.last_topic {
        let _ = writeln!(out, "- Dernier sujet abordé : {}", topic);
    }

    out
}

/// Assemble the full prompt, ending with [`ANSWER_MARKER`].
pub fn build_prompt(query: &str, prompt: &PromptContext<'_>) -> String {
    let mut out = String::from(SYSTEM_PROMPT);
    out.push('\n');
    if let Some(subject) = prompt.subject {
        out.push_str(&data_block(subject, prompt.matchups));
    }
    out.push_str(&context_block(prompt.context, prompt.subject));
    out.push_str(&prompt.history.to_prompt());
    let _ = write!(out, "\n\nQuestion: {}\n\n{}", query, ANSWER_MARKER);
    out
}

/// Trim a completion and drop anything up to an echoed answer marker.
///
/// Returns `None` when nothing usable is left.
pub fn clean_completion(text: &str) -> Option<String> {
    let text = text.trim();
    let text = match text.split_once(ANSWER_MARKER) {
        Some((_, rest)) => rest.trim(),
        None => text,
    };
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Client for the fallback model.
pub struct FallbackClient {
    provider: Arc<dyn LLMProvider>,
    generation: GenerationConfig,
    timeout: Duration,
    retry: RetryConfig,
}

impl FallbackClient {
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        generation: GenerationConfig,
        timeout: Duration,
        retry: RetryConfig,
    ) -> Self {
        Self {
            provider,
            generation,
            timeout,
            retry,
        }
    }

    /// Build the provider named in `config`.
    pub fn from_config(config: &LLMProviderConfig, retry: RetryConfig) -> Result<Self> {
        let provider = LLMProviderFactory::create(config)?;
        Ok(Self::new(
            provider,
            config.generation.clone(),
            config.timeout,
            retry,
        ))
    }

    pub fn provider(&self) -> &Arc<dyn LLMProvider> {
        &self.provider
    }

    /// Ask the model.
    ///
    /// # Errors
    ///
    /// [`SummonerError::Cancelled`] when `cancel` fires first; upstream and
    /// timeout errors once retries are exhausted; an upstream error when the
    /// completion is empty.
    pub async fn complete(
        &self,
        query: &str,
        prompt: &PromptContext<'_>,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let request = LLMRequest::from_prompt(build_prompt(query, prompt)).with_generation(&self.generation);
        let provider = Arc::clone(&self.provider);

        let call = with_retry(&self.retry, SERVICE, || {
            with_timeout(SERVICE, self.timeout, provider.generate_request(&request))
        });

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SummonerError::Cancelled),
            response = call => response?,
        };

        clean_completion(&response.content).ok_or_else(|| {
            SummonerError::upstream_transport(SERVICE, "empty completion")
        })
    }
}
