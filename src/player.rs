//! Player record data model.
//!
//! A [`PlayerRecord`] is the persisted state of one player, keyed by the stable
//! Telegram identity string. Records are created with the starting attributes
//! (`points = 0`, `energy = 10`, every skill level at 1) and are never deleted.
//!
//! Levels are not validated here: client submitted skill updates overwrite all
//! four levels as-is, and `energy`/`points` accept any value including negatives.
use serde::{Deserialize, Serialize};

/// Bumped whenever the bincode layout of [`PlayerRecord`] changes.
pub const PLAYER_SCHEMA_VERSION: u8 = 1;

pub const STARTING_POINTS: i64 = 0;
pub const STARTING_ENERGY: i64 = 10;
pub const STARTING_LEVEL: i32 = 1;

/// The four skill levels, one per upgrade track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillLevels {
    pub level_energy: i32,
    pub level_x10: i32,
    pub level_x100: i32,
    pub level_x1000: i32,
}

impl SkillLevels {
    pub fn new(level_energy: i32, level_x10: i32, level_x100: i32, level_x1000: i32) -> Self {
        Self {
            level_energy,
            level_x10,
            level_x100,
            level_x1000,
        }
    }
}

impl Default for SkillLevels {
    fn default() -> Self {
        Self::new(STARTING_LEVEL, STARTING_LEVEL, STARTING_LEVEL, STARTING_LEVEL)
    }
}

/// Counters that can be replaced one at a time through the field setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerField {
    Energy,
    Points,
}

impl PlayerField {
    pub fn as_str(self) -> &'static str {
        match self {
            PlayerField::Energy => "energy",
            PlayerField::Points => "points",
        }
    }
}

impl std::fmt::Display for PlayerField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub telegram_id: String,
    pub name: String,
    pub points: i64,
    pub energy: i64,
    pub skills: SkillLevels,
    pub schema_version: u8,
}

impl PlayerRecord {
    /// A fresh record with the starting attributes.
    pub fn new(telegram_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            telegram_id: telegram_id.into(),
            name: name.into(),
            points: STARTING_POINTS,
            energy: STARTING_ENERGY,
            skills: SkillLevels::default(),
            schema_version: PLAYER_SCHEMA_VERSION,
        }
    }

    pub fn field(&self, field: PlayerField) -> i64 {
        match field {
            PlayerField::Energy => self.energy,
            PlayerField::Points => self.points,
        }
    }

    /// Replace one counter, leaving every sibling field untouched.
    pub fn set_field(&mut self, field: PlayerField, value: i64) {
        match field {
            PlayerField::Energy => self.energy = value,
            PlayerField::Points => self.points = value,
        }
    }
}
