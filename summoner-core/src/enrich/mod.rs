//! Stat enrichment
//!
//! Turns a [`ReferenceRecord`] into an [`EnrichedRecord`]: level projections,
//! ability ratios and the heuristic scores used by the composers. Enriched
//! records are derived per request and never cached.

pub mod levels;
pub mod ratios;
pub mod scores;

pub use levels::{CHECKPOINT_LEVELS, LevelSnapshot};
pub use ratios::{AbilityRatios, RecordRatios, find_ratios};
pub use scores::{DamageProfile, HeuristicWeights};

use serde::Serialize;
use std::sync::Arc;

use crate::catalog::{AbilitySlot, ReferenceRecord};
use crate::error::Result;

/// A reference record with derived statistics.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedRecord {
    pub record: Arc<ReferenceRecord>,
    /// One snapshot per entry of [`CHECKPOINT_LEVELS`]
    pub levels: Vec<LevelSnapshot>,
    pub ratios: RecordRatios,
    pub damage: DamageProfile,
    pub mobility: u8,
    pub scaling: f64,
    pub playstyle: Vec<String>,
}

impl EnrichedRecord {
    /// Snapshot at a checkpoint level.
    pub fn level(&self, level: u8) -> Option<&LevelSnapshot> {
        self.levels.iter().find(|snap| snap.level == level)
    }

    /// Ratios of the passive or an active ability.
    pub fn slot_ratios(&self, slot: AbilitySlot) -> AbilityRatios {
        match slot {
            AbilitySlot::Passive => self.ratios.passive,
            AbilitySlot::Active(key) => self.ratios.active(key),
        }
    }
}

/// Derive every enriched value for `record`.
///
/// # Errors
///
/// [`SummonerError::Enrichment`](crate::error::SummonerError::Enrichment)
/// when level projections cannot be computed.
pub fn enrich(record: Arc<ReferenceRecord>, weights: &HeuristicWeights) -> Result<EnrichedRecord> {
    let levels = levels::checkpoints(&record.stats)?;
    let ratios = ratios::extract(&record);
    let damage = scores::damage_profile(&record, &ratios, weights);
    let mobility = scores::mobility(&record, weights);
    let scaling = scores::scaling(&record, &ratios, weights);
    let level_18 = levels.iter().find(|snap| snap.level == 18);
    let playstyle = scores::playstyle(&damage, level_18, mobility, scaling, weights);

    Ok(EnrichedRecord {
        record,
        levels,
        ratios,
        damage,
        mobility,
        scaling,
        playstyle,
    })
}
