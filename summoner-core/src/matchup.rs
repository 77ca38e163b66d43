//! Matchup tables
//!
//! [`MatchupSource`] is the seam for matchup data. The bundled
//! [`StaticMatchupTable`] carries a handful of illustrative tables; they are
//! not live statistics.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::conversation::Role;
use crate::error::Result;

/// One champion in a matchup list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupEntry {
    pub name: String,
    /// Win rate of the subject in this pairing, in percent
    pub rate: f32,
    pub rationale: String,
}

impl MatchupEntry {
    pub fn new(name: &str, rate: f32, rationale: &str) -> Self {
        Self {
            name: name.to_string(),
            rate,
            rationale: rationale.to_string(),
        }
    }
}

/// Counters, favorable matchups and synergies for a champion in a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupTable {
    pub champion: String,
    pub role: Role,
    /// Hardest opponents first
    pub counter_picks: Vec<MatchupEntry>,
    /// Easiest opponents first
    pub good_against: Vec<MatchupEntry>,
    /// Best allies first
    pub synergies: Vec<MatchupEntry>,
}

/// Where matchup tables come from.
#[async_trait]
pub trait MatchupSource: Send + Sync {
    /// Table for a canonical champion id in a role, `None` when unknown.
    async fn matchups(&self, champion: &str, role: Role) -> Result<Option<MatchupTable>>;
}

/// Fixed in-memory tables.
#[derive(Debug, Clone, Default)]
pub struct StaticMatchupTable {
    tables: HashMap<(String, Role), MatchupTable>,
}

impl StaticMatchupTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: MatchupTable) {
        self.tables
            .insert((table.champion.to_lowercase(), table.role), table);
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Illustrative tables for a few popular champions.
    pub fn builtin() -> Self {
        let mut source = Self::new();

        source.insert(MatchupTable {
            champion: "Ahri".to_string(),
            role: Role::Mid,
            counter_picks: vec![
                MatchupEntry::new("Kassadin", 47.5, "ignore une bonne partie du burst magique"),
                MatchupEntry::new("Fizz", 48.0, "esquive Charme avec Espièglerie"),
                MatchupEntry::new("Yasuo", 48.5, "bloque l'Orbe et Charme avec son Mur de vent"),
            ],
            good_against: vec![
                MatchupEntry::new("Lux", 52.5, "Charme punit ses sorts lents"),
                MatchupEntry::new("Viktor", 52.0, "peu mobile face à la Ruée spirituelle"),
                MatchupEntry::new("Xerath", 53.0, "ne peut pas échapper aux engagements"),
            ],
            synergies: vec![
                MatchupEntry::new("Lee Sin", 53.5, "pression de roam sur les lanes latérales"),
                MatchupEntry::new("Jarvan IV", 53.0, "engagement qui prépare Charme"),
                MatchupEntry::new("Nautilus", 52.5, "contrôles en chaîne pour le burst"),
            ],
        });

        source.insert(MatchupTable {
            champion: "Caitlyn".to_string(),
            role: Role::Bot,
            counter_picks: vec![
                MatchupEntry::new("Samira", 47.0, "engage au-dessus des pièges"),
                MatchupEntry::new("Draven", 48.0, "gagne les échanges courts"),
                MatchupEntry::new("Kalista", 48.5, "mobile et difficile à piéger"),
            ],
            good_against: vec![
                MatchupEntry::new("Sivir", 53.0, "portée inférieure en phase de lane"),
                MatchupEntry::new("Kog'Maw", 52.5, "faible avant ses objets"),
                MatchupEntry::new("Aphelios", 52.0, "subit la pression de portée"),
            ],
            synergies: vec![
                MatchupEntry::new("Lux", 54.0, "pièges sur cible immobilisée"),
                MatchupEntry::new("Morgana", 53.5, "Lien de ténèbres puis piège"),
                MatchupEntry::new("Karma", 52.5, "pression de poke combinée"),
            ],
        });

        source.insert(MatchupTable {
            champion: "Garen".to_string(),
            role: Role::Top,
            counter_picks: vec![
                MatchupEntry::new("Vayne", 45.5, "kite et dégâts bruts"),
                MatchupEntry::new("Teemo", 47.0, "aveugle et poke à distance"),
                MatchupEntry::new("Kayle", 48.0, "à distance et scale mieux"),
            ],
            good_against: vec![
                MatchupEntry::new("Yasuo", 53.5, "Courage absorbe ses échanges"),
                MatchupEntry::new("Yone", 53.0, "exécution avec la Justice de Demacia"),
                MatchupEntry::new("Nasus", 52.5, "pression avant ses cumuls"),
            ],
            synergies: vec![
                MatchupEntry::new("Lux", 52.5, "immobilisation avant le Jugement"),
                MatchupEntry::new("Sona", 52.0, "vitesse et soins"),
                MatchupEntry::new("Jarvan IV", 52.0, "engagement suivi de Coup décisif"),
            ],
        });

        source.insert(MatchupTable {
            champion: "Yasuo".to_string(),
            role: Role::Mid,
            counter_picks: vec![
                MatchupEntry::new("Annie", 46.5, "stun ciblé qui ignore le Mur de vent"),
                MatchupEntry::new("Renekton", 47.0, "gagne les échanges au corps à corps"),
                MatchupEntry::new("Malzahar", 47.5, "suppression et poussée"),
            ],
            good_against: vec![
                MatchupEntry::new("Zed", 51.5, "Mur de vent contre ses shuriken"),
                MatchupEntry::new("Ziggs", 52.0, "projectiles bloqués"),
                MatchupEntry::new("Lux", 52.5, "esquive les sorts à distance"),
            ],
            synergies: vec![
                MatchupEntry::new("Malphite", 54.0, "projections pour l'Ultime"),
                MatchupEntry::new("Diana", 53.0, "regroupement puis projection"),
                MatchupEntry::new("Alistar", 52.5, "combo Pulvériser"),
            ],
        });

        source.insert(MatchupTable {
            champion: "LeeSin".to_string(),
            role: Role::Jungle,
            counter_picks: vec![
                MatchupEntry::new("Rammus", 47.0, "résistant à son early game"),
                MatchupEntry::new("Poppy", 47.5, "bloque ses dash"),
                MatchupEntry::new("Warwick", 48.0, "soutien en duel précoce"),
            ],
            good_against: vec![
                MatchupEntry::new("Karthus", 53.0, "invade précoce"),
                MatchupEntry::new("Evelynn", 52.5, "pression avant le niveau 6"),
                MatchupEntry::new("Shyvana", 52.0, "vol de camps"),
            ],
            synergies: vec![
                MatchupEntry::new("Yasuo", 53.5, "Rage du dragon puis Dernier Soupir"),
                MatchupEntry::new("Ahri", 53.0, "ganks fiables au milieu"),
                MatchupEntry::new("Orianna", 52.5, "balle sur la cible projetée"),
            ],
        });

        source.insert(MatchupTable {
            champion: "Thresh".to_string(),
            role: Role::Support,
            counter_picks: vec![
                MatchupEntry::new("Morgana", 47.0, "Bouclier noir annule la Sentence"),
                MatchupEntry::new("Sona", 48.0, "poke et soutien prolongé"),
                MatchupEntry::new("Zyra", 48.5, "zone de contrôle à distance"),
            ],
            good_against: vec![
                MatchupEntry::new("Yuumi", 53.5, "attachée, elle laisse son porteur isolé"),
                MatchupEntry::new("Soraka", 52.5, "engagement facile"),
                MatchupEntry::new("Janna", 51.5, "pression en lane"),
            ],
            synergies: vec![
                MatchupEntry::new("Lucian", 53.5, "suivi immédiat après crochet"),
                MatchupEntry::new("Draven", 53.0, "pression en lane"),
                MatchupEntry::new("Kalista", 52.5, "projection via le Serment"),
            ],
        });

        source
    }
}

#[async_trait]
impl MatchupSource for StaticMatchupTable {
    async fn matchups(&self, champion: &str, role: Role) -> Result<Option<MatchupTable>> {
        Ok(self.tables.get(&(champion.to_lowercase(), role)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builtin_lookup() {
        let source = StaticMatchupTable::builtin();
        let table = source.matchups("Ahri", Role::Mid).await.unwrap().unwrap();
        assert_eq!(table.counter_picks.len(), 3);
        assert_eq!(table.good_against[0].name, "Lux");

        assert!(source.matchups("ahri", Role::Mid).await.unwrap().is_some());
        assert!(source.matchups("Ahri", Role::Top).await.unwrap().is_none());
        assert!(source.matchups("Teemo", Role::Top).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_replaces() {
        let mut source = StaticMatchupTable::new();
        assert!(source.is_empty());

        let table = MatchupTable {
            champion: "Jinx".to_string(),
            role: Role::Bot,
            counter_picks: vec![],
            good_against: vec![],
            synergies: vec![MatchupEntry::new("Thresh", 52.0, "crochet")],
        };
        source.insert(table.clone());
        source.insert(table);
        assert_eq!(source.len(), 1);
    }
}
