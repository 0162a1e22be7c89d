//! # Progression Economy
//!
//! Pure rules that turn a player's discrete skill levels into game-facing stats.
//! Nothing in this module touches storage or the network.
//!
//! Every upgrade path is a [`Track`]: a linear stat (`level * factor`) and an
//! exponential upgrade cost (`floor(multiplier * base^(level - 1))`). The four
//! tracks share that shape and only differ in their constants:
//!
//! | Track  | stat factor | cost base | cost multiplier |
//! |--------|-------------|-----------|-----------------|
//! | Energy | 10          | 1.5       | 10              |
//! | X10    | 2.5         | 1.2       | 5               |
//! | X100   | 0.3         | 1.3       | 5               |
//! | X1000  | 0.05        | 1.4       | 5               |
//!
//! [`skills_snapshot`] folds all four tracks into the response shape served by
//! the skills endpoints. Upgrade costs are informational: nothing debits points
//! when a level goes up.

mod snapshot;
mod track;

pub use snapshot::{profile_multipliers, skills_snapshot, ProfileMultipliers, SkillsSnapshot};
pub use track::{
    checked_upgrade_cost, linear_stat, upgrade_cost, Track, TrackKind, TrackStats, ENERGY_TRACK,
    TRACKS, X1000_TRACK, X100_TRACK, X10_TRACK,
};
