//! Query parsing and intent rules
//!
//! A [`Query`] is the lowercased, tokenized form of one user line. The
//! ordered [`RULES`] table decides which composer answers it; the first rule
//! whose predicate accepts the query wins.

use serde::Serialize;
use std::fmt;

use crate::catalog::{AbilityKey, AbilitySlot, is_known_alias, normalize_key};
use crate::conversation::{Role, SkillLevel};
use crate::error::{Result, SummonerError};
use crate::knowledge::is_stop_word;

/// Greeting words, checked in this order.
pub const GREETINGS: [&str; 5] = ["salut", "bonjour", "hey", "hello", "hi"];

const STATS_KEYWORDS: &[&str] = &["stat", "dégât", "degat", "damage", "résistance"];

const MATCHUP_KEYWORDS: &[&str] = &[
    "counter", "contre", "matchup", "versus", "vs", "affinité", "synergie",
];

const ABILITY_KEYWORDS: &[&str] = &[
    "capacité",
    "capacite",
    "spell",
    "sort",
    "compétence",
    "passif",
    "passive",
    "ulti",
    "q",
    "w",
    "e",
    "r",
];

const CHAMPION_PATTERNS: &[&str] = &[
    "qui est",
    "quel champion",
    "parle moi de",
    "parle-moi de",
    "raconte moi",
    "raconte-moi",
    "comment jouer",
    "explique",
];

const SKILL_WORDS: &[(&str, SkillLevel)] = &[
    ("débutant", SkillLevel::Beginner),
    ("débutante", SkillLevel::Beginner),
    ("débutants", SkillLevel::Beginner),
    ("commencer", SkillLevel::Beginner),
    ("commence", SkillLevel::Beginner),
    ("débuter", SkillLevel::Beginner),
    ("débute", SkillLevel::Beginner),
    ("intermédiaire", SkillLevel::Intermediate),
    ("moyen", SkillLevel::Intermediate),
    ("avancé", SkillLevel::Advanced),
    ("avancée", SkillLevel::Advanced),
    ("expert", SkillLevel::Expert),
    ("experte", SkillLevel::Expert),
    ("pro", SkillLevel::Expert),
];

/// Elided articles and pronouns stripped from the front of a word (`d'ahri`).
const ELISIONS: &[&str] = &[
    "d", "l", "j", "qu", "s", "n", "c", "m", "t", "jusqu", "lorsqu", "puisqu",
];

/// Frequent words that are never champion names.
const GENERIC_WORDS: &[&str] = &[
    "champion", "champions", "jouer", "joue", "conseil", "conseils", "info", "infos",
    "information", "informations", "donne", "donner", "parle", "raconte", "aide", "aider",
    "peux", "puis", "faire", "fait", "bien", "meilleur", "meilleurs", "build", "stuff",
    "objet", "objets", "lane", "partie", "game", "jeu", "merci", "oui", "non", "aussi",
    "plus", "très", "bon", "bonne", "niveau", "rôle", "role", "adc", "jungler",
];

/// A conversation topic answered by a dedicated composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Mana,
    Trade,
    Position,
    Combo,
    Objective,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::Mana,
        Topic::Trade,
        Topic::Position,
        Topic::Combo,
        Topic::Objective,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Topic::Mana => "mana",
            Topic::Trade => "trade",
            Topic::Position => "position",
            Topic::Combo => "combo",
            Topic::Objective => "objective",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Topic::Mana => &["mana"],
            Topic::Trade => &["trade", "échange"],
            Topic::Position => &["position", "placement"],
            Topic::Combo => &["combo", "enchaînement"],
            Topic::Objective => &["objectif", "dragon", "nashor", "baron", "héraut"],
        }
    }
}

/// What a query is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Intent {
    Greeting,
    Stats,
    Matchup,
    Ability,
    ChampionInfo,
    Topic(Topic),
    Knowledge,
    Fallback,
}

impl Intent {
    /// Label stored as the conversation's last topic.
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Stats => "stats",
            Intent::Matchup => "matchup",
            Intent::Ability => "ability",
            Intent::ChampionInfo => "champion",
            Intent::Topic(topic) => topic.label(),
            Intent::Knowledge => "knowledge",
            Intent::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One user line, normalized for matching.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    raw: String,
    text: String,
    words: Vec<String>,
    named_subject: Option<String>,
}

impl Query {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().to_string();
        let text = raw.to_lowercase().replace('’', "'");
        let words = text
            .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
            .map(|w| w.trim_matches(|c| c == '\'' || c == '-'))
            .filter(|w| !w.is_empty())
            .map(|w| strip_elision(w).to_string())
            .collect();

        Self {
            raw,
            text,
            words,
            named_subject: None,
        }
    }

    /// Parse, rejecting input shorter than `min_len` characters once trimmed.
    pub fn parse_checked(raw: &str, min_len: usize) -> Result<Self> {
        let query = Self::parse(raw);
        if query.len() < min_len {
            return Err(SummonerError::MalformedInput(format!(
                "{} character(s), at least {} expected",
                query.len(),
                min_len
            )));
        }
        Ok(query)
    }

    /// The trimmed input as typed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Lowercased input.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Words with elided prefixes removed.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of characters in the trimmed input.
    pub fn len(&self) -> usize {
        self.raw.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Record which candidate resolved to the subject.
    pub fn set_named_subject(&mut self, candidate: impl Into<String>) {
        self.named_subject = Some(candidate.into());
    }

    /// Candidate that resolved, when the subject was named in this query.
    pub fn named_subject(&self) -> Option<&str> {
        self.named_subject.as_deref()
    }

    /// Whether the query mentions a keyword.
    ///
    /// Keywords match as substrings of the lowercased text (`stat` in
    /// `statistiques`, `salut` in `salutations`). One- and two-letter
    /// keywords (`q`, `vs`, `hi`) must be a whole word.
    pub fn mentions(&self, keyword: &str) -> bool {
        if is_short_keyword(keyword) {
            self.words.iter().any(|w| w == keyword)
        } else {
            self.text.contains(keyword)
        }
    }

    pub fn mentions_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.mentions(k))
    }

    /// Possible champion names, most specific first.
    ///
    /// Known multi-word names (`lee sin`, `twisted fate`) come before single
    /// words; words that are keywords, roles or function words are skipped.
    pub fn subject_candidates(&self) -> Vec<String> {
        let mut candidates = Vec::new();

        for width in [3, 2] {
            for window in self.words.windows(width) {
                let joined = normalize_key(&window.join(" "));
                if is_known_alias(&joined) && !candidates.contains(&joined) {
                    candidates.push(joined);
                }
            }
        }

        for word in &self.words {
            if is_candidate_word(word) && !candidates.contains(word) {
                candidates.push(word.clone());
            }
        }

        candidates
    }

    /// Whether the query is little more than the subject's name.
    pub fn is_bare_subject(&self) -> bool {
        let Some(subject) = &self.named_subject else {
            return false;
        };
        let subject_words: Vec<&str> = subject.split_whitespace().collect();
        self.words.iter().all(|w| {
            subject_words.contains(&w.as_str())
                || is_stop_word(w)
                || GREETINGS.contains(&w.as_str())
                || Role::from_token(w).is_some()
        })
    }
}

fn strip_elision(word: &str) -> &str {
    match word.split_once('\'') {
        Some((prefix, rest)) if !rest.is_empty() && ELISIONS.contains(&prefix) => rest,
        _ => word,
    }
}

fn is_short_keyword(keyword: &str) -> bool {
    keyword.chars().count() <= 2
}

fn is_intent_keyword(word: &str) -> bool {
    let hit = |keyword: &&str| {
        if is_short_keyword(keyword) {
            word == *keyword
        } else {
            word.contains(keyword)
        }
    };
    STATS_KEYWORDS
        .iter()
        .chain(MATCHUP_KEYWORDS)
        .chain(ABILITY_KEYWORDS)
        .any(hit)
        || Topic::ALL.iter().any(|t| t.keywords().iter().any(hit))
}

fn is_candidate_word(word: &str) -> bool {
    word.chars().count() >= 2
        && !word.chars().all(|c| c.is_ascii_digit())
        && !is_stop_word(word)
        && !GREETINGS.contains(&word)
        && !GENERIC_WORDS.contains(&word)
        && Role::from_token(word).is_none()
        && !SKILL_WORDS.iter().any(|(w, _)| *w == word)
        && !is_intent_keyword(word)
}

/// Greeting word present in the query, if any.
pub fn greeting(query: &Query) -> Option<&'static str> {
    GREETINGS.into_iter().find(|g| query.mentions(g))
}

/// Skill level the player reports about themselves.
pub fn skill_level(query: &Query) -> Option<SkillLevel> {
    query.words.iter().find_map(|w| {
        SKILL_WORDS
            .iter()
            .find(|(word, _)| *word == w.as_str())
            .map(|(_, level)| *level)
    })
}

/// First role named in the query.
pub fn role(query: &Query) -> Option<Role> {
    query.words.iter().find_map(|w| match w.as_str() {
        "adc" => Some(Role::Bot),
        other => Role::from_token(other),
    })
}

/// Ability slot named in the query.
pub fn ability_slot(query: &Query) -> Option<AbilitySlot> {
    query.words.iter().find_map(|w| match w.as_str() {
        "passif" | "passive" => Some(AbilitySlot::Passive),
        "ulti" | "ultime" | "ultimate" => Some(AbilitySlot::Active(AbilityKey::R)),
        other => AbilityKey::from_letter(other)
            .filter(|_| other.len() == 1)
            .map(AbilitySlot::Active),
    })
}

/// An ordered classification rule.
#[derive(Clone, Copy)]
pub struct Rule {
    pub intent: Intent,
    pub matches: fn(&Query) -> bool,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("intent", &self.intent).finish()
    }
}

fn asks_stats(query: &Query) -> bool {
    query.mentions_any(STATS_KEYWORDS)
}

fn asks_matchup(query: &Query) -> bool {
    query.mentions_any(MATCHUP_KEYWORDS)
}

fn asks_ability(query: &Query) -> bool {
    query.mentions_any(ABILITY_KEYWORDS)
}

fn asks_champion(query: &Query) -> bool {
    query.mentions_any(CHAMPION_PATTERNS) || query.is_bare_subject()
}

fn asks_mana(query: &Query) -> bool {
    query.mentions_any(Topic::Mana.keywords())
}

fn asks_trade(query: &Query) -> bool {
    query.mentions_any(Topic::Trade.keywords())
}

fn asks_position(query: &Query) -> bool {
    query.mentions_any(Topic::Position.keywords())
}

fn asks_combo(query: &Query) -> bool {
    query.mentions_any(Topic::Combo.keywords())
}

fn asks_objective(query: &Query) -> bool {
    query.mentions_any(Topic::Objective.keywords())
}

/// Rules applied when a subject is known, in priority order.
pub const RULES: &[Rule] = &[
    Rule { intent: Intent::Stats, matches: asks_stats },
    Rule { intent: Intent::Matchup, matches: asks_matchup },
    Rule { intent: Intent::Ability, matches: asks_ability },
    Rule { intent: Intent::ChampionInfo, matches: asks_champion },
    Rule { intent: Intent::Topic(Topic::Mana), matches: asks_mana },
    Rule { intent: Intent::Topic(Topic::Trade), matches: asks_trade },
    Rule { intent: Intent::Topic(Topic::Position), matches: asks_position },
    Rule { intent: Intent::Topic(Topic::Combo), matches: asks_combo },
    Rule { intent: Intent::Topic(Topic::Objective), matches: asks_objective },
];

/// Intents of every rule accepting the query, in priority order.
pub fn classify(query: &Query) -> impl Iterator<Item = Intent> + '_ {
    RULES
        .iter()
        .filter(move |rule| (rule.matches)(query))
        .map(|rule| rule.intent)
}
