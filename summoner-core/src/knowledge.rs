//! Hand-written knowledge base
//!
//! General questions about the game ("c'est quoi le jungle ?") are matched
//! against a small set of French Q&A pairs by cosine similarity of TF-IDF
//! vectors, after stop-word removal. Inverse document frequencies are taken
//! over the query and the candidate questions together, so words shared by
//! many questions count for less.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// French function words ignored during matching.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "à", "ai", "au", "aux", "avec", "c", "ce", "ces", "cet", "cette", "d", "dans", "de",
        "des", "du", "elle", "en", "est", "et", "eux", "il", "ils", "j", "je", "l", "la", "le",
        "les", "leur", "lui", "m", "ma", "mais", "me", "même", "mes", "moi", "mon", "n", "ne",
        "nos", "notre", "nous", "on", "ou", "où", "par", "pas", "pour", "qu", "que", "qui", "s",
        "sa", "se", "ses", "son", "sont", "suis", "sur", "t", "ta", "te", "tes", "toi", "ton", "tu", "un",
        "une", "vos", "votre", "vous", "y", "quoi", "quel", "quelle", "quels", "quelles",
        "comment",
    ]
    .into_iter()
    .collect()
});

/// Whether a lowercase token is a French stop word.
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Lowercase, split on anything that is not a letter or digit, drop stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty() && !is_stop_word(t))
        .map(str::to_string)
        .collect()
}

fn term_frequencies(tokens: &[String]) -> HashMap<&str, f32> {
    let mut freq = HashMap::new();
    for token in tokens {
        *freq.entry(token.as_str()).or_insert(0.0) += 1.0;
    }
    freq
}

/// Smoothed inverse document frequency: `ln((1 + n) / (1 + df)) + 1`.
fn inverse_frequencies<'a>(documents: &[&'a [String]]) -> HashMap<&'a str, f32> {
    let n = documents.len() as f32;
    let mut document_frequency: HashMap<&str, f32> = HashMap::new();
    for document in documents.iter().copied() {
        let terms: HashSet<&str> = document.iter().map(String::as_str).collect();
        for term in terms {
            *document_frequency.entry(term).or_insert(0.0) += 1.0;
        }
    }
    document_frequency
        .into_iter()
        .map(|(term, df)| (term, ((1.0 + n) / (1.0 + df)).ln() + 1.0))
        .collect()
}

fn tf_idf<'a>(tokens: &'a [String], idf: &HashMap<&str, f32>) -> HashMap<&'a str, f32> {
    let mut vector = term_frequencies(tokens);
    for (term, weight) in vector.iter_mut() {
        *weight *= idf.get(term).copied().unwrap_or(1.0);
    }
    vector
}

/// Cosine similarity of the TF-IDF vectors of two texts.
pub fn similarity(a: &str, b: &str) -> f32 {
    let a_tokens = tokenize(a);
    let b_tokens = tokenize(b);
    let idf = inverse_frequencies(&[&a_tokens[..], &b_tokens[..]]);
    cosine(&tf_idf(&a_tokens, &idf), &tf_idf(&b_tokens, &idf))
}

fn cosine(a: &HashMap<&str, f32>, b: &HashMap<&str, f32>) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let dot: f32 = a
        .iter()
        .filter_map(|(term, x)| b.get(term).map(|y| x * y))
        .sum();
    let norm_a = a.values().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.values().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// One question and its canned answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub question: String,
    pub answer: String,
}

impl KnowledgeEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Best-match lookup over [`KnowledgeEntry`] questions.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
    threshold: f32,
}

impl KnowledgeBase {
    pub fn new(entries: Vec<KnowledgeEntry>, threshold: f32) -> Self {
        Self { entries, threshold }
    }

    /// An empty base that never answers.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 1.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Highest-scoring entry and its score, whatever the threshold.
    pub fn best_match(&self, query: &str) -> Option<(&KnowledgeEntry, f32)> {
        let query_tokens = tokenize(query);
        let questions: Vec<Vec<String>> = self
            .entries
            .iter()
            .map(|entry| tokenize(&entry.question))
            .collect();

        let documents: Vec<&[String]> = std::iter::once(query_tokens.as_slice())
            .chain(questions.iter().map(Vec::as_slice))
            .collect();
        let idf = inverse_frequencies(&documents);
        let query_vector = tf_idf(&query_tokens, &idf);

        self.entries
            .iter()
            .zip(&questions)
            .map(|(entry, tokens)| (entry, cosine(&query_vector, &tf_idf(tokens, &idf))))
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Answer for `query` when the best match clears the threshold.
    pub fn answer(&self, query: &str) -> Option<&str> {
        match self.best_match(query) {
            Some((entry, score)) if score >= self.threshold && score > 0.0 => {
                tracing::debug!(score, question = %entry.question, "knowledge base match");
                Some(entry.answer.as_str())
            }
            _ => None,
        }
    }

    /// The bundled French entries on game basics.
    pub fn builtin(threshold: f32) -> Self {
        let entries = vec![
            KnowledgeEntry::new(
                "C'est quoi League of Legends ?",
                "League of Legends est un jeu d'arène de bataille en ligne (MOBA) où deux équipes de cinq champions s'affrontent pour détruire le Nexus adverse.",
            ),
            KnowledgeEntry::new(
                "Quels sont les rôles du jeu ?",
                "Il y a cinq rôles : top, jungle, mid, bot (ADC) et support. Chaque rôle a ses objectifs et sa zone de la carte.",
            ),
            KnowledgeEntry::new(
                "C'est quoi le rôle de jungler ?",
                "Le jungler tue les monstres neutres entre les lanes, aide les autres joueurs avec des ganks et contrôle les objectifs comme les dragons et le Héraut.",
            ),
            KnowledgeEntry::new(
                "Comment bien farmer les sbires ?",
                "Donnez le dernier coup aux sbires pour obtenir leur or. Entraînez-vous en partie personnalisée et ne frappez les sbires que lorsque leur vie est basse.",
            ),
            KnowledgeEntry::new(
                "Quels objectifs prendre en priorité ?",
                "Les tours, les dragons, le Héraut de la Faille et le Baron Nashor donnent de l'or et des bonus d'équipe. Prenez-les après un combat gagné ou quand l'adversaire est absent.",
            ),
            KnowledgeEntry::new(
                "Comment fonctionne le mode classé ?",
                "Le mode classé est accessible au niveau 30 avec assez de champions. Les paliers vont de Fer à Challenger, et vos victoires vous font gagner des points de ligue (LP).",
            ),
            KnowledgeEntry::new(
                "Comment acheter des objets et construire son stuff ?",
                "Achetez vos objets à la boutique de la fontaine. Suivez les objets recommandés au début puis adaptez votre build à la composition adverse.",
            ),
            KnowledgeEntry::new(
                "Pourquoi poser des balises de vision ?",
                "La vision révèle les ennemis et évite les ganks. Posez des balises autour des objectifs et dans la rivière, et achetez des balises de contrôle.",
            ),
            KnowledgeEntry::new(
                "Quels sorts d'invocateur choisir ?",
                "Flash est pris par presque tous les champions. Complétez avec Embrasement ou Téléportation selon le rôle, et Châtiment pour le jungler.",
            ),
            KnowledgeEntry::new(
                "Quel champion choisir pour débuter ?",
                "Pour débuter, choisissez des champions simples comme Garen, Annie, Ashe, Malphite ou Soraka, et apprenez bien un rôle avant d'en changer.",
            ),
        ];
        Self::new(entries, threshold)
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin(0.3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_stop_words() {
        assert_eq!(tokenize("C'est quoi le rôle de jungler ?"), vec!["rôle", "jungler"]);
        assert_eq!(tokenize("Les DRAGONS"), vec!["dragons"]);
    }

    #[test]
    fn test_similarity_bounds() {
        assert!((similarity("rôle jungler", "jungler rôle") - 1.0).abs() < 1e-6);
        assert_eq!(similarity("dragon", "nexus"), 0.0);
        assert_eq!(similarity("", "nexus"), 0.0);
    }

    #[test]
    fn test_rare_terms_outweigh_common_ones() {
        let kb = KnowledgeBase::new(
            vec![
                KnowledgeEntry::new("objectifs carte", "carte"),
                KnowledgeEntry::new("baron nashor", "baron"),
                KnowledgeEntry::new("objectifs tours", "tours"),
                KnowledgeEntry::new("objectifs dragons", "dragons"),
            ],
            0.3,
        );
        // plain term counts tie the first two entries at 0.5
        let (entry, score) = kb.best_match("objectifs baron").unwrap();
        assert_eq!(entry.answer, "baron");
        assert!(score > 0.5);
        assert_eq!(kb.answer("objectifs baron"), Some("baron"));
    }

    #[test]
    fn test_builtin_answers() {
        let kb = KnowledgeBase::default();
        let answer = kb.answer("c'est quoi le rôle du jungler").unwrap();
        assert!(answer.starts_with("Le jungler"));

        let answer = kb.answer("comment fonctionne le classé ?").unwrap();
        assert!(answer.contains("Challenger"));
    }

    #[test]
    fn test_below_threshold() {
        let kb = KnowledgeBase::default();
        assert!(kb.answer("stats pour Xyzzy123").is_none());
        assert!(KnowledgeBase::empty().answer("rôles").is_none());
    }
}
