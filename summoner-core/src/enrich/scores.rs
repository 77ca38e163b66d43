//! Presentation heuristics: damage profile, mobility, scaling, playstyle
//!
//! These are rough indicators for chat answers, not game-accurate values.

use serde::{Deserialize, Serialize};

use crate::catalog::{AbilityKey, ReferenceRecord};

use super::levels::LevelSnapshot;
use super::ratios::RecordRatios;

/// Weights and thresholds behind the heuristic scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    /// Profile points per unit of AP/AD ratio
    pub ratio_weight: f64,
    pub mage_bonus: f64,
    pub marksman_bonus: f64,
    /// Added to whichever damage type is already larger
    pub assassin_bonus: f64,

    /// Starting value of the mobility and scaling scores
    pub base_score: f64,
    /// Substrings that mark an ability as a movement tool
    pub mobility_keywords: Vec<String>,
    /// Movement speed strictly above this adds a mobility point
    pub move_speed_threshold: f64,
    /// Added per active ability carrying a `% AD` or `% AP` marker
    pub scaling_marker_step: f64,

    /// Profile component above which a damage playstyle tag is added
    pub strong_damage_threshold: f64,
    /// Level-18 health above which the tanky tag is added
    pub tanky_hp_threshold: f64,
    /// Mobility or scaling above which their tag is added
    pub high_score_threshold: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            ratio_weight: 20.0,
            mage_bonus: 30.0,
            marksman_bonus: 30.0,
            assassin_bonus: 20.0,
            base_score: 5.0,
            mobility_keywords: ["dash", "saut", "bond", "téléportation", "vitesse", "speed"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            move_speed_threshold: 340.0,
            scaling_marker_step: 0.5,
            strong_damage_threshold: 70.0,
            tanky_hp_threshold: 2500.0,
            high_score_threshold: 7.0,
        }
    }
}

/// Share of physical and magical damage, each on its own 0-100 scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageProfile {
    pub physical: f64,
    pub magical: f64,
}

pub fn damage_profile(
    record: &ReferenceRecord,
    ratios: &RecordRatios,
    weights: &HeuristicWeights,
) -> DamageProfile {
    let mut physical = 0.0;
    let mut magical = 0.0;

    for ratio in ratios.iter() {
        physical += ratio.ad * weights.ratio_weight;
        magical += ratio.ap * weights.ratio_weight;
    }

    if record.has_tag("Mage") {
        magical += weights.mage_bonus;
    }
    if record.has_tag("Marksman") {
        physical += weights.marksman_bonus;
    }
    if record.has_tag("Assassin") {
        if magical > physical {
            magical += weights.assassin_bonus;
        } else {
            physical += weights.assassin_bonus;
        }
    }

    DamageProfile {
        physical: physical.clamp(0.0, 100.0),
        magical: magical.clamp(0.0, 100.0),
    }
}

/// Mobility score in 0..=10.
pub fn mobility(record: &ReferenceRecord, weights: &HeuristicWeights) -> u8 {
    let fallback = clamp_score(weights.base_score).round() as u8;

    if !record.stats.move_speed.is_finite() {
        tracing::warn!(
            champion = %record.id,
            move_speed = record.stats.move_speed,
            "non-finite movement speed, using default mobility"
        );
        return fallback;
    }

    let mut score = weights.base_score;
    for ability in &record.abilities {
        let description = ability.description.to_lowercase();
        if weights
            .mobility_keywords
            .iter()
            .any(|keyword| description.contains(keyword.as_str()))
        {
            score += 1.0;
        }
    }
    if record.stats.move_speed > weights.move_speed_threshold {
        score += 1.0;
    }

    clamp_score(score).round() as u8
}

/// Scaling score in 0..=10, in half steps with the default weights.
pub fn scaling(record: &ReferenceRecord, ratios: &RecordRatios, weights: &HeuristicWeights) -> f64 {
    let mut score = weights.base_score;

    for ability in &record.abilities {
        if ability.description.contains("% AD") {
            score += weights.scaling_marker_step;
        }
        if ability.description.contains("% AP") {
            score += weights.scaling_marker_step;
        }
    }

    if AbilityKey::ALL.iter().any(|&key| ratios.active(key).ad > 0.0) {
        score += 1.0;
    }
    if AbilityKey::ALL.iter().any(|&key| ratios.active(key).ap > 0.0) {
        score += 1.0;
    }

    clamp_score(score)
}

/// Descriptive tags derived from the scores, in a fixed order.
pub fn playstyle(
    profile: &DamageProfile,
    level_18: Option<&LevelSnapshot>,
    mobility: u8,
    scaling: f64,
    weights: &HeuristicWeights,
) -> Vec<String> {
    let mut tags = Vec::new();
    if profile.physical > weights.strong_damage_threshold {
        tags.push("Fort potentiel de dégâts physiques".to_string());
    }
    if profile.magical > weights.strong_damage_threshold {
        tags.push("Fort potentiel de dégâts magiques".to_string());
    }
    if level_18.is_some_and(|snap| snap.hp > weights.tanky_hp_threshold) {
        tags.push("Très résistant en late game".to_string());
    }
    if f64::from(mobility) > weights.high_score_threshold {
        tags.push("Grande mobilité".to_string());
    }
    if scaling > weights.high_score_threshold {
        tags.push("Excellent scaling en late game".to_string());
    }
    tags
}

fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 10.0)
    } else {
        5.0
    }
}
