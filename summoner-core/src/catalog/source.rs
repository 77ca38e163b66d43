//! Reference data sources

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::DataDragonConfig;
use crate::error::{Result, SummonerError};

use super::record::{
    Ability, BaseStats, ChampionRatings, Passive, ReferenceRecord, strip_markup,
};

const SERVICE: &str = "data dragon";

/// Where champion records come from.
///
/// `fetch_champion` receives a canonical identifier (see
/// [`canonical_id`](super::normalize::canonical_id)) and returns
/// [`SummonerError::NotFound`] when the service does not know it.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    /// Fetch one champion by canonical identifier
    async fn fetch_champion(&self, id: &str) -> Result<ReferenceRecord>;

    /// Data version served by this source; used to key the cache
    fn data_version(&self) -> &str;
}

/// Riot's Data Dragon static CDN.
pub struct DataDragonSource {
    client: reqwest::Client,
    base_url: String,
    version: String,
    locale: String,
}

impl DataDragonSource {
    /// Create a source for a specific patch and locale.
    pub fn new(
        base_url: impl Into<String>,
        version: impl Into<String>,
        locale: impl Into<String>,
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
            base_url: base_url.into().trim_end_matches('/').to_string(),
            version: version.into(),
            locale: locale.into(),
        })
    }

    /// Create from configuration.
    pub fn from_config(config: &DataDragonConfig) -> Result<Self> {
        Self::new(
            config.base_url.clone(),
            config.version.clone(),
            config.locale.clone(),
            config.timeout,
        )
    }

    fn champion_url(&self, id: &str) -> String {
        format!(
            "{}/cdn/{}/data/{}/champion/{}.json",
            self.base_url,
            self.version,
            self.locale,
            urlencoding::encode(id)
        )
    }
}

#[derive(Deserialize)]
struct DdEnvelope {
    data: HashMap<String, DdChampion>,
}

#[derive(Deserialize)]
struct DdChampion {
    id: String,
    name: String,
    title: String,
    lore: String,
    #[serde(default)]
    blurb: String,
    tags: Vec<String>,
    #[serde(default)]
    partype: String,
    #[serde(default)]
    info: Option<DdInfo>,
    stats: DdStats,
    spells: Vec<DdSpell>,
    passive: DdPassive,
    #[serde(default)]
    allytips: Vec<String>,
    #[serde(default)]
    enemytips: Vec<String>,
}

#[derive(Deserialize)]
struct DdInfo {
    #[serde(default)]
    attack: u8,
    #[serde(default)]
    defense: u8,
    #[serde(default)]
    magic: u8,
    #[serde(default)]
    difficulty: u8,
}

#[derive(Deserialize)]
struct DdStats {
    hp: f64,
    hpperlevel: f64,
    #[serde(default)]
    mp: f64,
    #[serde(default)]
    mpperlevel: f64,
    #[serde(default)]
    mpregen: f64,
    armor: f64,
    armorperlevel: f64,
    spellblock: f64,
    spellblockperlevel: f64,
    attackdamage: f64,
    attackdamageperlevel: f64,
    attackspeed: f64,
    attackspeedperlevel: f64,
    movespeed: f64,
    #[serde(default)]
    attackrange: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DdSpell {
    name: String,
    description: String,
    #[serde(default)]
    cooldown: Vec<f64>,
    #[serde(default)]
    cost: Vec<f64>,
    #[serde(default)]
    cost_type: String,
    #[serde(default)]
    range: Vec<f64>,
}

#[derive(Deserialize)]
struct DdPassive {
    name: String,
    description: String,
}

impl DdChampion {
    fn into_record(self) -> Result<ReferenceRecord> {
        let resource = self.partype.trim().to_string();
        let spell_count = self.spells.len();
        let abilities: Vec<Ability> = self
            .spells
            .into_iter()
            .map(|spell| {
                // costType is often a client template ("{{ abilityresourcename }}")
                let cost_type = if spell.cost_type.contains("{{") || spell.cost_type.trim().is_empty() {
                    resource.clone()
                } else {
                    spell.cost_type.trim().to_string()
                };
                Ability {
                    name: spell.name,
                    description: strip_markup(&spell.description),
                    cooldowns: spell.cooldown,
                    costs: spell.cost,
                    cost_type,
                    ranges: spell.range,
                }
            })
            .collect();

        let abilities: [Ability; 4] = abilities.try_into().map_err(|_| {
            SummonerError::MalformedPayload(format!(
                "{} has {} spells, expected 4",
                self.id, spell_count
            ))
        })?;

        let info = self
            .info
            .map(|i| ChampionRatings {
                attack: i.attack,
                defense: i.defense,
                magic: i.magic,
                difficulty: i.difficulty,
            })
            .unwrap_or_default();

        let s = self.stats;
        Ok(ReferenceRecord {
            id: self.id,
            name: self.name,
            title: self.title,
            lore: strip_markup(&self.lore),
            blurb: strip_markup(&self.blurb),
            tags: self.tags,
            resource,
            info,
            stats: BaseStats {
                hp: s.hp,
                hp_per_level: s.hpperlevel,
                mp: s.mp,
                mp_per_level: s.mpperlevel,
                mp_regen: s.mpregen,
                armor: s.armor,
                armor_per_level: s.armorperlevel,
                magic_resist: s.spellblock,
                magic_resist_per_level: s.spellblockperlevel,
                attack_damage: s.attackdamage,
                attack_damage_per_level: s.attackdamageperlevel,
                attack_speed: s.attackspeed,
                attack_speed_per_level: s.attackspeedperlevel,
                move_speed: s.movespeed,
                attack_range: s.attackrange,
            },
            abilities,
            passive: Passive {
                name: self.passive.name,
                description: strip_markup(&self.passive.description),
            },
            ally_tips: self.allytips,
            enemy_tips: self.enemytips,
        })
    }
}

/// Map a Data Dragon champion document to a record.
///
/// `id` selects the entry inside `data`; a document holding a single entry
/// under another key is accepted as well.
pub fn parse_champion_document(id: &str, body: &str) -> Result<ReferenceRecord> {
    let envelope: DdEnvelope = serde_json::from_str(body)
        .map_err(|e| SummonerError::MalformedPayload(format!("champion {}: {}", id, e)))?;

    let mut data = envelope.data;
    let champion = match data.remove(id) {
        Some(champion) => champion,
        None if data.len() == 1 => data
            .into_values()
            .next()
            .ok_or_else(|| SummonerError::NotFound(id.to_string()))?,
        None => return Err(SummonerError::NotFound(id.to_string())),
    };

    champion.into_record()
}

#[async_trait]
impl ReferenceSource for DataDragonSource {
    async fn fetch_champion(&self, id: &str) -> Result<ReferenceRecord> {
        let url = self.champion_url(id);
        tracing::info!(champion = id, url = %url, "fetching champion");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SummonerError::Timeout { service: SERVICE }
            } else {
                SummonerError::upstream_transport(SERVICE, e.to_string())
            }
        })?;

        let status = response.status();
        // The CDN answers 403 AccessDenied for keys it does not have
        if status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::FORBIDDEN {
            return Err(SummonerError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SummonerError::upstream_status(SERVICE, status.as_u16(), text));
        }

        let body = response.text().await.map_err(|e| {
            SummonerError::upstream_transport(SERVICE, format!("Failed to read response: {}", e))
        })?;

        parse_champion_document(id, &body)
    }

    fn data_version(&self) -> &str {
        &self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AHRI_DOCUMENT: &str = r#"{
        "type": "champion",
        "version": "13.24.1",
        "data": {
            "Ahri": {
                "id": "Ahri",
                "name": "Ahri",
                "title": "le renard à neuf queues",
                "lore": "Liée au pouvoir latent de Runeterra.",
                "blurb": "Une Vastaya.",
                "tags": ["Mage", "Assassin"],
                "partype": "Mana",
                "info": {"attack": 3, "defense": 4, "magic": 8, "difficulty": 5},
                "stats": {
                    "hp": 590, "hpperlevel": 96, "mp": 418, "mpperlevel": 25,
                    "movespeed": 330, "armor": 21, "armorperlevel": 4.7,
                    "spellblock": 30, "spellblockperlevel": 1.3, "attackrange": 550,
                    "mpregen": 8, "attackdamage": 53, "attackdamageperlevel": 3,
                    "attackspeedperlevel": 2.2, "attackspeed": 0.668
                },
                "spells": [
                    {"name": "Orbe d'illusion", "description": "Inflige 20% AP.<br>Puis revient.", "cooldown": [7,7,7,7,7], "cost": [55,65,75,85,95], "costType": " {{ abilityresourcename }}", "range": [880,880,880,880,880]},
                    {"name": "Feu follet", "description": "Vitesse.", "cooldown": [9], "cost": [30], "costType": "Mana", "range": [725]},
                    {"name": "Charme", "description": "Charme.", "cooldown": [12], "cost": [60], "costType": "Mana", "range": [1000]},
                    {"name": "Ruée spirituelle", "description": "Dash.", "cooldown": [130, 105, 80], "cost": [100], "costType": "Mana", "range": [450]}
                ],
                "passive": {"name": "Vol d'essence", "description": "Soins."},
                "allytips": ["Charmez avant de lancer l'orbe."],
                "enemytips": []
            }
        }
    }"#;

    #[test]
    fn test_parse_champion_document() {
        let record = parse_champion_document("Ahri", AHRI_DOCUMENT).unwrap();
        assert_eq!(record.name, "Ahri");
        assert_eq!(record.tags, vec!["Mage", "Assassin"]);
        assert_eq!(record.stats.magic_resist, 30.0);
        assert_eq!(record.abilities[0].description, "Inflige 20% AP. Puis revient.");
        assert_eq!(record.abilities[0].cost_type, "Mana");
        assert_eq!(record.abilities[3].cooldowns, vec![130.0, 105.0, 80.0]);
        assert_eq!(record.info.magic, 8);
        assert_eq!(record.ally_tips.len(), 1);
    }

    #[test]
    fn test_missing_mana_defaults_to_zero() {
        let body = AHRI_DOCUMENT
            .replace("\"mp\": 418, \"mpperlevel\": 25,", "")
            .replace("\"mpregen\": 8,", "");
        let record = parse_champion_document("Ahri", &body).unwrap();
        assert_eq!(record.stats.mp, 0.0);
        assert_eq!(record.stats.mp_per_level, 0.0);
    }

    #[test]
    fn test_missing_required_stat_is_malformed() {
        let body = AHRI_DOCUMENT.replace("\"armor\": 21,", "");
        let result = parse_champion_document("Ahri", &body);
        assert!(matches!(result, Err(SummonerError::MalformedPayload(_))));
    }

    #[test]
    fn test_wrong_spell_count_is_malformed() {
        let body = AHRI_DOCUMENT.replace(
            r#"{"name": "Charme", "description": "Charme.", "cooldown": [12], "cost": [60], "costType": "Mana", "range": [1000]},"#,
            "",
        );
        let result = parse_champion_document("Ahri", &body);
        assert!(matches!(result, Err(SummonerError::MalformedPayload(_))));
    }

    #[test]
    fn test_champion_url_encodes_identifier() {
        let source = DataDragonSource::new(
            "https://ddragon.example/",
            "13.24.1",
            "fr_FR",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            source.champion_url("Ahri"),
            "https://ddragon.example/cdn/13.24.1/data/fr_FR/champion/Ahri.json"
        );
        assert_eq!(source.data_version(), "13.24.1");
    }
}
