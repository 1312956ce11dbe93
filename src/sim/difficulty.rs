//! Difficulty tiers and their tuned constants
//!
//! Every per-tier behavior lives in the profile record so the simulation never
//! branches on tier identity.

use serde::{Deserialize, Serialize};

/// Difficulty tier chosen on the difficulty select screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Periodic redraw of the global scroll speed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedJitter {
    /// Redraw when `tick % every == 0`
    pub every: u64,
    /// Lower bound of the speed multiplier (inclusive)
    pub min: f32,
    /// Upper bound of the speed multiplier (exclusive)
    pub max: f32,
}

/// Physics and spawn constants for one tier, normalized to a 60 fps tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Velocity set by a flap (negative = upward)
    pub jump_impulse: f32,
    /// Base horizontal scroll speed per tick
    pub obstacle_speed: f32,
    /// Ticks between obstacle spawns
    pub spawn_interval: u64,
    /// Vertical clearance between upper and lower halves
    pub gap_size: f32,
    /// Obstacles drift vertically at up to this speed (0 = static gaps)
    pub drift_range: f32,
    /// Optional periodic scroll speed redraw
    pub speed_jitter: Option<SpeedJitter>,
    /// Credits awarded for reaching the objective
    pub bounty: u32,
}

const EASY: DifficultyProfile = DifficultyProfile {
    gravity: 0.12,
    jump_impulse: -4.5,
    obstacle_speed: 1.8,
    spawn_interval: 140,
    gap_size: 240.0,
    drift_range: 0.0,
    speed_jitter: None,
    bounty: 12,
};

const MEDIUM: DifficultyProfile = DifficultyProfile {
    gravity: 0.20,
    jump_impulse: -5.5,
    obstacle_speed: 2.5,
    spawn_interval: 110,
    gap_size: 210.0,
    drift_range: 0.0,
    speed_jitter: None,
    bounty: 15,
};

const HARD: DifficultyProfile = DifficultyProfile {
    gravity: 0.30,
    jump_impulse: -6.5,
    obstacle_speed: 3.8,
    spawn_interval: 85,
    gap_size: 175.0,
    drift_range: 1.25,
    speed_jitter: Some(SpeedJitter {
        every: 60,
        min: 0.8,
        max: 1.5,
    }),
    bounty: 18,
};

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Look up the tuned constants for this tier
    pub fn profile(self) -> &'static DifficultyProfile {
        match self {
            Difficulty::Easy => &EASY,
            Difficulty::Medium => &MEDIUM,
            Difficulty::Hard => &HARD,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_table_values() {
        let easy = Difficulty::Easy.profile();
        assert!((easy.gravity - 0.12).abs() < f32::EPSILON);
        assert!((easy.jump_impulse - -4.5).abs() < f32::EPSILON);
        assert_eq!(easy.spawn_interval, 140);
        assert_eq!(easy.bounty, 12);

        let medium = Difficulty::Medium.profile();
        assert!((medium.gravity - 0.20).abs() < f32::EPSILON);
        assert!((medium.jump_impulse - -5.5).abs() < f32::EPSILON);
        assert_eq!(medium.bounty, 15);

        let hard = Difficulty::Hard.profile();
        assert_eq!(hard.spawn_interval, 85);
        assert!((hard.gap_size - 175.0).abs() < f32::EPSILON);
        assert_eq!(hard.bounty, 18);
    }

    #[test]
    fn test_only_hard_moves_gaps_and_speed() {
        for tier in [Difficulty::Easy, Difficulty::Medium] {
            assert_eq!(tier.profile().drift_range, 0.0);
            assert!(tier.profile().speed_jitter.is_none());
        }
        let jitter = Difficulty::Hard.profile().speed_jitter.unwrap();
        assert_eq!(jitter.every, 60);
        assert!(Difficulty::Hard.profile().drift_range > 0.0);
    }

    #[test]
    fn test_from_str_round_trips_names() {
        for tier in Difficulty::ALL {
            assert_eq!(Difficulty::from_str(tier.as_str()), Some(tier));
        }
        assert_eq!(Difficulty::from_str("MED"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }
}
