use serde::Serialize;

use super::track::{ENERGY_TRACK, X1000_TRACK, X100_TRACK, X10_TRACK};
use crate::player::{PlayerRecord, SkillLevels};

/// Per-track level, current value, next-level value and upgrade cost.
///
/// Field names are the wire names the game client reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillsSnapshot {
    pub level_energy: i32,
    pub max_energy: f32,
    pub next_max_energy: f32,
    pub cost_upgrade_energy: i64,

    pub level_x10: i32,
    pub current_multiplier_x10: f32,
    pub next_multiplier_x10: f32,
    pub cost_upgrade_x10: i64,

    pub level_x100: i32,
    pub current_multiplier_x100: f32,
    pub next_multiplier_x100: f32,
    pub cost_upgrade_x100: i64,

    pub level_x1000: i32,
    pub current_multiplier_x1000: f32,
    pub next_multiplier_x1000: f32,
    pub cost_upgrade_x1000: i64,
}

impl SkillsSnapshot {
    pub fn from_levels(levels: &SkillLevels) -> Self {
        let energy = ENERGY_TRACK.stats_for(levels);
        let x10 = X10_TRACK.stats_for(levels);
        let x100 = X100_TRACK.stats_for(levels);
        let x1000 = X1000_TRACK.stats_for(levels);
        Self {
            level_energy: energy.level,
            max_energy: energy.current,
            next_max_energy: energy.next,
            cost_upgrade_energy: energy.cost,
            level_x10: x10.level,
            current_multiplier_x10: x10.current,
            next_multiplier_x10: x10.next,
            cost_upgrade_x10: x10.cost,
            level_x100: x100.level,
            current_multiplier_x100: x100.current,
            next_multiplier_x100: x100.next,
            cost_upgrade_x100: x100.cost,
            level_x1000: x1000.level,
            current_multiplier_x1000: x1000.current,
            next_multiplier_x1000: x1000.next,
            cost_upgrade_x1000: x1000.cost,
        }
    }
}

pub fn skills_snapshot(record: &PlayerRecord) -> SkillsSnapshot {
    SkillsSnapshot::from_levels(&record.skills)
}

/// Multipliers shown on the profile endpoint.
///
/// These follow the older display rule (`x10 * 10`, `x100 * 1`, `x1000 / 10`
/// with integer division) and are not the track stats of [`SkillsSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileMultipliers {
    pub x10: f64,
    pub x100: f64,
    pub x1000: f64,
}

pub fn profile_multipliers(levels: &SkillLevels) -> ProfileMultipliers {
    ProfileMultipliers {
        x10: f64::from(levels.level_x10.saturating_mul(10)),
        x100: f64::from(levels.level_x100),
        x1000: f64::from(levels.level_x1000 / 10),
    }
}
