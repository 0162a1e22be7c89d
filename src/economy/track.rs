use crate::player::SkillLevels;

/// Identifies one of the four upgrade paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Energy,
    X10,
    X100,
    X1000,
}

impl TrackKind {
    pub fn track(self) -> &'static Track {
        match self {
            TrackKind::Energy => &ENERGY_TRACK,
            TrackKind::X10 => &X10_TRACK,
            TrackKind::X100 => &X100_TRACK,
            TrackKind::X1000 => &X1000_TRACK,
        }
    }

    /// The level a player currently holds on this track.
    pub fn level_in(self, levels: &SkillLevels) -> i32 {
        match self {
            TrackKind::Energy => levels.level_energy,
            TrackKind::X10 => levels.level_x10,
            TrackKind::X100 => levels.level_x100,
            TrackKind::X1000 => levels.level_x1000,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrackKind::Energy => "energy",
            TrackKind::X10 => "x10",
            TrackKind::X100 => "x100",
            TrackKind::X1000 => "x1000",
        }
    }
}

/// Constants for one upgrade path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub kind: TrackKind,
    pub stat_factor: f32,
    pub cost_base: f64,
    pub cost_multiplier: f64,
}

pub const ENERGY_TRACK: Track = Track {
    kind: TrackKind::Energy,
    stat_factor: 10.0,
    cost_base: 1.5,
    cost_multiplier: 10.0,
};

pub const X10_TRACK: Track = Track {
    kind: TrackKind::X10,
    stat_factor: 2.5,
    cost_base: 1.2,
    cost_multiplier: 5.0,
};

pub const X100_TRACK: Track = Track {
    kind: TrackKind::X100,
    stat_factor: 0.3,
    cost_base: 1.3,
    cost_multiplier: 5.0,
};

pub const X1000_TRACK: Track = Track {
    kind: TrackKind::X1000,
    stat_factor: 0.05,
    cost_base: 1.4,
    cost_multiplier: 5.0,
};

pub const TRACKS: [Track; 4] = [ENERGY_TRACK, X10_TRACK, X100_TRACK, X1000_TRACK];

/// Derived numbers for a single track at a given level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackStats {
    pub level: i32,
    pub current: f32,
    pub next: f32,
    pub cost: i64,
}

/// `level * factor`.
pub fn linear_stat(level: i32, factor: f32) -> f32 {
    level as f32 * factor
}

/// `floor(multiplier * base^(level - 1))`.
///
/// Defined for `level >= 1`. Lower levels still evaluate (to something below
/// `multiplier`) rather than panic; use [`checked_upgrade_cost`] to reject them.
pub fn upgrade_cost(level: i32, base: f64, multiplier: f64) -> i64 {
    let exponent = f64::from(level) - 1.0;
    (multiplier * base.powf(exponent)).floor() as i64
}

/// [`upgrade_cost`] restricted to the levels the curve is defined for.
pub fn checked_upgrade_cost(level: i32, base: f64, multiplier: f64) -> Option<i64> {
    (level >= 1).then(|| upgrade_cost(level, base, multiplier))
}

impl Track {
    pub fn current(&self, level: i32) -> f32 {
        linear_stat(level, self.stat_factor)
    }

    /// Stat value one level above `level`.
    pub fn next(&self, level: i32) -> f32 {
        linear_stat(level.saturating_add(1), self.stat_factor)
    }

    /// Price of going from `level` to `level + 1`.
    pub fn cost(&self, level: i32) -> i64 {
        upgrade_cost(level, self.cost_base, self.cost_multiplier)
    }

    pub fn can_afford(&self, level: i32, points: i64) -> bool {
        points >= self.cost(level)
    }

    pub fn stats(&self, level: i32) -> TrackStats {
        TrackStats {
            level,
            current: self.current(level),
            next: self.next(level),
            cost: self.cost(level),
        }
    }

    pub fn stats_for(&self, levels: &SkillLevels) -> TrackStats {
        self.stats(self.kind.level_in(levels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_stat_steps_by_factor() {
        for track in TRACKS {
            for level in 1..50 {
                let here = track.current(level);
                let there = track.next(level);
                assert!(
                    (there - here - track.stat_factor).abs() < 1e-3,
                    "{} track at level {level}",
                    track.kind.label()
                );
            }
        }
    }

    #[test]
    fn cost_at_level_one_is_multiplier() {
        for track in TRACKS {
            assert_eq!(track.cost(1), track.cost_multiplier as i64);
        }
    }

    #[test]
    fn energy_costs_match_hand_computed() {
        assert_eq!(ENERGY_TRACK.cost(1), 10);
        assert_eq!(ENERGY_TRACK.cost(2), 15);
        assert_eq!(ENERGY_TRACK.cost(3), 22);
        assert_eq!(ENERGY_TRACK.cost(4), 33);
    }

    #[test]
    fn costs_strictly_increase_with_level() {
        for track in TRACKS {
            let mut previous = track.cost(1);
            for level in 2..40 {
                let cost = track.cost(level);
                assert!(
                    cost > previous,
                    "{} cost did not grow at level {level}: {previous} -> {cost}",
                    track.kind.label()
                );
                previous = cost;
            }
        }
    }

    #[test]
    fn non_positive_levels_are_out_of_contract() {
        assert_eq!(checked_upgrade_cost(0, 1.5, 10.0), None);
        assert_eq!(checked_upgrade_cost(-4, 1.5, 10.0), None);
        assert_eq!(checked_upgrade_cost(1, 1.5, 10.0), Some(10));
        // Unchecked evaluation stays finite and below the level-one price.
        assert_eq!(upgrade_cost(0, 1.5, 10.0), 6);
        assert!(upgrade_cost(-10, 1.2, 5.0) < 5);
    }

    #[test]
    fn next_saturates_at_max_level() {
        assert_eq!(ENERGY_TRACK.next(i32::MAX), ENERGY_TRACK.current(i32::MAX));
    }

    #[test]
    fn affordability_compares_points_with_cost() {
        assert!(ENERGY_TRACK.can_afford(2, 15));
        assert!(!ENERGY_TRACK.can_afford(2, 14));
    }
}
