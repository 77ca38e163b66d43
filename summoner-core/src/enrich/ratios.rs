//! Scaling ratio extraction from ability text

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::{AbilityKey, ReferenceRecord};

static RATIO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*%\s*(AP|AD)\b").expect("valid ratio regex")
});

/// AP and AD ratios of one ability, as fractions (20% AP → 0.20).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AbilityRatios {
    pub ap: f64,
    pub ad: f64,
}

impl AbilityRatios {
    pub fn is_zero(&self) -> bool {
        self.ap == 0.0 && self.ad == 0.0
    }
}

/// Ratios for the passive and the four actives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordRatios {
    pub passive: AbilityRatios,
    /// Indexed by [`AbilityKey::index`]
    pub actives: [AbilityRatios; 4],
}

impl RecordRatios {
    pub fn active(&self, key: AbilityKey) -> AbilityRatios {
        self.actives[key.index()]
    }

    /// Passive first, then Q, W, E, R.
    pub fn iter(&self) -> impl Iterator<Item = &AbilityRatios> {
        std::iter::once(&self.passive).chain(self.actives.iter())
    }
}

/// Sum every `<n>% AP` / `<n>% AD` occurrence in `text`.
pub fn find_ratios(text: &str) -> AbilityRatios {
    let mut ratios = AbilityRatios::default();
    for captures in RATIO.captures_iter(text) {
        let value = captures[1].replace(',', ".").parse::<f64>().unwrap_or(0.0) / 100.0;
        if captures[2].eq_ignore_ascii_case("ap") {
            ratios.ap += value;
        } else {
            ratios.ad += value;
        }
    }
    ratios
}

pub fn extract(record: &ReferenceRecord) -> RecordRatios {
    RecordRatios {
        passive: find_ratios(&record.passive.description),
        actives: AbilityKey::ALL.map(|key| find_ratios(&record.ability(key).description)),
    }
}
