//! Per-level stat projections

use serde::{Deserialize, Serialize};

use crate::catalog::BaseStats;
use crate::error::{Result, SummonerError};

/// Levels at which stats are projected.
pub const CHECKPOINT_LEVELS: [u8; 5] = [1, 6, 11, 16, 18];

/// Base attack-speed ratio the in-game formula is expressed against
const ATTACK_SPEED_RATIO: f64 = 0.625;

/// Derived stats at one level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    pub level: u8,
    pub hp: f64,
    pub mp: f64,
    pub armor: f64,
    pub magic_resist: f64,
    pub attack_damage: f64,
    pub attack_speed: f64,
    /// Attack damage × attack speed, rounded to two decimals
    pub dps: f64,
}

fn linear(base: f64, per_level: f64, level: u8) -> f64 {
    base + per_level * f64::from(level.saturating_sub(1))
}

/// Project `stats` to `level`.
///
/// # Errors
///
/// Fails when the base attack speed is not a positive finite number.
pub fn snapshot(stats: &BaseStats, level: u8) -> Result<LevelSnapshot> {
    if !stats.attack_speed.is_finite() || stats.attack_speed <= 0.0 {
        return Err(SummonerError::Enrichment(format!(
            "invalid base attack speed: {}",
            stats.attack_speed
        )));
    }

    let attack_damage = linear(stats.attack_damage, stats.attack_damage_per_level, level);
    let attack_speed = (ATTACK_SPEED_RATIO / stats.attack_speed)
        * (1.0 + stats.attack_speed_per_level * f64::from(level.saturating_sub(1)) / 100.0);

    Ok(LevelSnapshot {
        level,
        hp: linear(stats.hp, stats.hp_per_level, level),
        mp: linear(stats.mp, stats.mp_per_level, level),
        armor: linear(stats.armor, stats.armor_per_level, level),
        magic_resist: linear(stats.magic_resist, stats.magic_resist_per_level, level),
        attack_damage,
        attack_speed,
        dps: (attack_damage * attack_speed * 100.0).round() / 100.0,
    })
}

/// Snapshots at every checkpoint level, in ascending order.
pub fn checkpoints(stats: &BaseStats) -> Result<Vec<LevelSnapshot>> {
    CHECKPOINT_LEVELS
        .iter()
        .map(|&level| snapshot(stats, level))
        .collect()
}
