//! Turn handling
//!
//! [`Assistant`] answers one query at a time for a [`Session`]:
//!
//! 1. queries shorter than the minimum length get a reformulation prompt;
//! 2. greetings get a canned reply;
//! 3. a champion named in the query (or remembered in the context) becomes
//!    the subject, and the ordered [`intent::RULES`] pick a composer;
//! 4. otherwise the knowledge base, then the language model, are tried.
//!
//! The assistant holds no per-conversation state, so one instance can serve
//! many sessions.

pub mod composers;
pub mod intent;

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::catalog::{ChampionCatalog, ReferenceRecord};
use crate::config::SummonerConfig;
use crate::conversation::{Role, Session};
use crate::enrich::{EnrichedRecord, HeuristicWeights, enrich};
use crate::error::{Result, SummonerError};
use crate::knowledge::KnowledgeBase;
use crate::llm::{FallbackClient, PromptContext};
use crate::matchup::{MatchupSource, MatchupTable, StaticMatchupTable};

pub use intent::{Intent, Query, Topic};

/// Minimum trimmed query length when none is configured.
pub const DEFAULT_MIN_QUERY_LENGTH: usize = 2;

/// Routes queries to composers, the knowledge base or the language model.
pub struct Assistant {
    catalog: Arc<ChampionCatalog>,
    matchups: Arc<dyn MatchupSource>,
    knowledge: KnowledgeBase,
    fallback: Option<FallbackClient>,
    weights: HeuristicWeights,
    min_query_length: usize,
}

impl std::fmt::Debug for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assistant")
            .field("data_version", &self.catalog.data_version())
            .field("knowledge_entries", &self.knowledge.len())
            .field("has_fallback", &self.fallback.is_some())
            .finish()
    }
}

/// Usual role for a champion, from its first class tag with one.
fn primary_role(record: &ReferenceRecord) -> Option<Role> {
    record.tags.iter().find_map(|tag| Role::from_class_tag(tag))
}

impl Assistant {
    pub fn builder() -> AssistantBuilder {
        AssistantBuilder::new()
    }

    /// Assistant backed by Data Dragon and, when configured, a language model.
    ///
    /// A language model that cannot be created is logged and left out.
    pub fn from_config(config: &SummonerConfig) -> Result<Self> {
        let catalog = ChampionCatalog::from_config(&config.data_dragon, config.retry.clone())?;

        let fallback = match &config.llm {
            Some(llm) => match FallbackClient::from_config(llm, config.retry.clone()) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::warn!(error = %e, "language model disabled");
                    None
                }
            },
            None => None,
        };

        let mut builder = Self::builder()
            .catalog(Arc::new(catalog))
            .knowledge(KnowledgeBase::builtin(config.knowledge.similarity_threshold))
            .weights(config.heuristics.clone())
            .min_query_length(config.session.min_query_length);
        if let Some(client) = fallback {
            builder = builder.fallback(client);
        }
        builder.build()
    }

    pub fn catalog(&self) -> &Arc<ChampionCatalog> {
        &self.catalog
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Whether a language model is available for unmatched queries.
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Fetch and enrich one champion.
    pub async fn champion(&self, name: &str) -> Result<EnrichedRecord> {
        let record = self.catalog.fetch(name).await?;
        enrich(record, &self.weights)
    }

    /// Answer one query and update the session.
    ///
    /// Never fails: errors become a fixed French reply. Only answers are
    /// appended to the history; reformulation, clarification, apology and
    /// cancellation replies are not.
    pub async fn respond(&self, session: &mut Session, text: &str) -> String {
        session.rearm();
        let cancel = session.cancellation();

        match self.answer(session, text, &cancel).await {
            Ok(Some((intent, reply))) => {
                tracing::debug!(intent = %intent, "answered");
                if !matches!(intent, Intent::Greeting | Intent::Fallback) {
                    session.context.last_topic = Some(intent.label().to_string());
                }
                session.commit(text.trim(), reply.as_str());
                reply
            }
            Ok(None) => composers::CLARIFY.to_string(),
            Err(SummonerError::MalformedInput(reason)) => {
                tracing::debug!(%reason, "query rejected");
                composers::REPHRASE.to_string()
            }
            Err(SummonerError::Cancelled) => {
                tracing::debug!("turn cancelled");
                composers::CANCELLED.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "no answer available");
                composers::APOLOGY.to_string()
            }
        }
    }

    async fn answer(
        &self,
        session: &mut Session,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<(Intent, String)>> {
        let mut query = Query::parse_checked(text, self.min_query_length)?;

        if let Some(level) = intent::skill_level(&query) {
            session.context.skill_level = level;
        }

        if let Some(word) = intent::greeting(&query) {
            return Ok(Some((Intent::Greeting, composers::greeting(word).to_string())));
        }

        self.route(session, &mut query, cancel).await
    }

    async fn route(
        &self,
        session: &mut Session,
        query: &mut Query,
        cancel: &CancellationToken,
    ) -> Result<Option<(Intent, String)>> {
        let subject = self.detect_subject(session, query, cancel).await?;
        if let Some(role) = intent::role(query) {
            session.context.role = Some(role);
        }

        let enriched = match subject {
            Some(record) => match enrich(record, &self.weights) {
                Ok(enriched) => Some(enriched),
                Err(e) => {
                    tracing::warn!(error = %e, "enrichment failed");
                    None
                }
            },
            None => None,
        };

        if let Some(enriched) = &enriched {
            for intent in intent::classify(query) {
                tracing::debug!(intent = %intent, subject = %enriched.record.id, "trying composer");
                if let Some(reply) = self.compose(intent, enriched, session, query, cancel).await? {
                    return Ok(Some((intent, reply)));
                }
            }
        }

        if let Some(answer) = self.knowledge.answer(query.raw()) {
            return Ok(Some((Intent::Knowledge, answer.to_string())));
        }

        let Some(fallback) = &self.fallback else {
            return Ok(None);
        };

        let table = match (&enriched, session.context.role) {
            (Some(enriched), Some(role)) => self.matchup_table(&enriched.record, role, cancel).await?,
            _ => None,
        };
        let prompt = PromptContext {
            context: &session.context,
            subject: enriched.as_ref(),
            matchups: table.as_ref(),
            history: session.history(),
        };
        let reply = fallback.complete(query.raw(), &prompt, cancel).await?;
        Ok(Some((Intent::Fallback, reply)))
    }

    /// Find the subject among the query's words, else reuse the stored one.
    async fn detect_subject(
        &self,
        session: &mut Session,
        query: &mut Query,
        cancel: &CancellationToken,
    ) -> Result<Option<Arc<ReferenceRecord>>> {
        for candidate in query.subject_candidates() {
            let found = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(SummonerError::Cancelled),
                found = self.catalog.lookup(&candidate) => found,
            };
            if let Some(record) = found {
                tracing::debug!(subject = %record.id, "subject detected");
                session.context.subject = Some(record.id.clone());
                query.set_named_subject(candidate);
                return Ok(Some(record));
            }
        }

        let Some(id) = session.context.subject.clone() else {
            return Ok(None);
        };
        let found = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SummonerError::Cancelled),
            found = self.catalog.lookup(&id) => found,
        };
        Ok(found)
    }

    /// Matchup table for the prompt or the matchup composer; source errors
    /// are logged and treated as missing.
    async fn matchup_table(
        &self,
        record: &ReferenceRecord,
        role: Role,
        cancel: &CancellationToken,
    ) -> Result<Option<MatchupTable>> {
        let lookup = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SummonerError::Cancelled),
            lookup = self.matchups.matchups(&record.id, role) => lookup,
        };
        match lookup {
            Ok(table) => Ok(table),
            Err(e) => {
                tracing::warn!(champion = %record.id, %role, error = %e, "matchup lookup failed");
                Ok(None)
            }
        }
    }

    async fn compose(
        &self,
        intent: Intent,
        enriched: &EnrichedRecord,
        session: &mut Session,
        query: &Query,
        cancel: &CancellationToken,
    ) -> Result<Option<String>> {
        let record = &enriched.record;
        let reply = match intent {
            Intent::Stats => composers::stats(enriched),
            Intent::Ability => composers::ability(enriched, intent::ability_slot(query)),
            Intent::ChampionInfo => composers::champion_info(enriched),
            Intent::Matchup => {
                let Some(role) = session.context.role.or_else(|| primary_role(record)) else {
                    return Ok(None);
                };
                session.context.role = Some(role);

                let lookup = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(SummonerError::Cancelled),
                    lookup = self.matchups.matchups(&record.id, role) => lookup,
                };
                match lookup {
                    Ok(Some(table)) => composers::matchups(&record.name, &table),
                    Ok(None) => Some(composers::matchups_missing(&record.name)),
                    Err(e) => {
                        tracing::warn!(champion = %record.id, %role, error = %e, "matchup source failed");
                        None
                    }
                }
            }
            Intent::Topic(Topic::Mana) => Some(composers::mana(record)),
            Intent::Topic(Topic::Trade) => Some(composers::trade(record)),
            Intent::Topic(Topic::Position) => Some(composers::position(record)),
            Intent::Topic(Topic::Combo) => composers::combo(record),
            Intent::Topic(Topic::Objective) => Some(composers::objective(
                record,
                session.context.role.or_else(|| primary_role(record)),
            )),
            Intent::Greeting | Intent::Knowledge | Intent::Fallback => None,
        };
        Ok(reply)
    }
}

/// Builder for [`Assistant`]
pub struct AssistantBuilder {
    catalog: Option<Arc<ChampionCatalog>>,
    matchups: Option<Arc<dyn MatchupSource>>,
    knowledge: Option<KnowledgeBase>,
    fallback: Option<FallbackClient>,
    weights: HeuristicWeights,
    min_query_length: usize,
}

impl AssistantBuilder {
    pub fn new() -> Self {
        Self {
            catalog: None,
            matchups: None,
            knowledge: None,
            fallback: None,
            weights: HeuristicWeights::default(),
            min_query_length: DEFAULT_MIN_QUERY_LENGTH,
        }
    }

    /// Set the champion catalog (required)
    pub fn catalog(mut self, catalog: Arc<ChampionCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Set the matchup source (defaults to the bundled static tables)
    pub fn matchups(mut self, source: Arc<dyn MatchupSource>) -> Self {
        self.matchups = Some(source);
        self
    }

    /// Set the knowledge base (defaults to the bundled entries)
    pub fn knowledge(mut self, knowledge: KnowledgeBase) -> Self {
        self.knowledge = Some(knowledge);
        self
    }

    /// Enable the language-model fallback
    pub fn fallback(mut self, client: FallbackClient) -> Self {
        self.fallback = Some(client);
        self
    }

    pub fn weights(mut self, weights: HeuristicWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn min_query_length(mut self, length: usize) -> Self {
        self.min_query_length = length;
        self
    }

    /// Build the assistant
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no catalog was set
    pub fn build(self) -> Result<Assistant> {
        let catalog = self
            .catalog
            .ok_or_else(|| SummonerError::Configuration("a champion catalog is required".to_string()))?;

        Ok(Assistant {
            catalog,
            matchups: self
                .matchups
                .unwrap_or_else(|| Arc::new(StaticMatchupTable::builtin())),
            knowledge: self.knowledge.unwrap_or_default(),
            fallback: self.fallback,
            weights: self.weights,
            min_query_length: self.min_query_length,
        })
    }
}

impl Default for AssistantBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One conversation bound to a shared [`Assistant`].
#[derive(Debug)]
pub struct Chatbot {
    assistant: Arc<Assistant>,
    session: Session,
}

impl Chatbot {
    pub fn new(assistant: Arc<Assistant>, session: Session) -> Self {
        Self { assistant, session }
    }

    /// Reply to one line of user input.
    pub async fn get_response(&mut self, text: &str) -> String {
        self.assistant.respond(&mut self.session, text).await
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}
