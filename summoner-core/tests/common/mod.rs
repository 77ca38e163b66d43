//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use summoner_core::catalog::{ReferenceRecord, ReferenceSource, parse_champion_document};
use summoner_core::error::{Result, SummonerError};

pub const DATA_VERSION: &str = "14.1.1";

fn spell(name: &str, description: &str, cooldown: f64) -> Value {
    json!({
        "name": name,
        "description": description,
        "cooldown": [cooldown, cooldown, cooldown, cooldown, cooldown],
        "cost": [50, 60, 70, 80, 90],
        "costType": "{{ abilityresourcename }}",
        "range": [600, 600, 600, 600, 600]
    })
}

/// A Data Dragon champion document as served by the CDN.
pub fn champion_document(id: &str, name: &str, tags: &[&str]) -> Value {
    let champion = json!({
        "id": id,
        "name": name,
        "title": format!("le champion {}", name),
        "lore": format!("<i>{}</i> vient de Runeterra.", name),
        "blurb": format!("{} vient de Runeterra.", name),
        "tags": tags,
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
            spell("Orbe", "Inflige des dégâts égaux à <b>20% AP</b>.", 7.0),
            spell("Feu", "Gagne de la vitesse.", 9.0),
            spell("Charme", "Charme la cible.", 12.0),
            spell("Ruée", "Effectue un dash.", 100.0)
        ],
        "passive": {"name": "Essence", "description": "Récupère des PV."},
        "allytips": [format!("Jouez {} prudemment.", name)],
        "enemytips": []
    });

    let mut data = serde_json::Map::new();
    data.insert(id.to_string(), champion);
    json!({"type": "champion", "version": DATA_VERSION, "data": data})
}

pub fn record(id: &str, name: &str, tags: &[&str]) -> ReferenceRecord {
    parse_champion_document(id, &champion_document(id, name, tags).to_string())
        .expect("fixture document parses")
}

/// In-memory reference source that counts requests.
pub struct StubSource {
    records: HashMap<String, ReferenceRecord>,
    calls: AtomicUsize,
}

impl StubSource {
    pub fn new(records: Vec<ReferenceRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.id.clone(), r)).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Ahri, Caitlyn and Lee Sin.
    pub fn roster() -> Self {
        Self::new(vec![
            record("Ahri", "Ahri", &["Mage", "Assassin"]),
            record("Caitlyn", "Caitlyn", &["Marksman"]),
            record("LeeSin", "Lee Sin", &["Fighter", "Assassin"]),
        ])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReferenceSource for StubSource {
    async fn fetch_champion(&self, id: &str) -> Result<ReferenceRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| SummonerError::NotFound(id.to_string()))
    }

    fn data_version(&self) -> &str {
        DATA_VERSION
    }
}
