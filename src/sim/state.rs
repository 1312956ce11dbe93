//! Simulation state and core types
//!
//! Everything a round mutates lives in [`SimState`], which the tick function
//! borrows exclusively once per frame.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::{Difficulty, DifficultyProfile};
use crate::consts::*;

/// The player-controlled flyer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flyer {
    /// Vertical center (0 = ceiling, grows downward)
    pub y: f32,
    /// Vertical velocity per tick (positive = downward)
    pub velocity: f32,
    /// Cosmetic pitch in radians, derived from velocity
    pub pitch: f32,
}

impl Default for Flyer {
    fn default() -> Self {
        Self {
            y: PLAYFIELD_HEIGHT / 2.0,
            velocity: 0.0,
            pitch: 0.0,
        }
    }
}

/// Silhouette variant for an obstacle half
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingShape {
    Standard,
    Stepped,
    Tapered,
    Notched,
    Antenna,
}

impl BuildingShape {
    pub const ALL: [BuildingShape; 5] = [
        BuildingShape::Standard,
        BuildingShape::Stepped,
        BuildingShape::Tapered,
        BuildingShape::Notched,
        BuildingShape::Antenna,
    ];
}

/// Cosmetic details for one obstacle half. No gameplay meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingDetails {
    pub shape: BuildingShape,
    /// Index into `settings::BUILDING_PALETTE`
    pub body_color: u8,
    /// Index into `settings::WINDOW_PALETTE`
    pub window_color: u8,
    pub has_windows: bool,
}

/// A paired upper/lower barrier with a gap between them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    /// Lower boundary of the upper half
    pub gap_top: f32,
    /// Set once the flyer has cleared this obstacle
    pub passed: bool,
    /// Vertical gap drift per tick, only for tiers with drift
    pub drift: Option<f32>,
    pub top: BuildingDetails,
    pub bottom: BuildingDetails,
}

impl Obstacle {
    /// Right (trailing) edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + OBSTACLE_WIDTH
    }
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    ObstacleCollision,
    FloorCollision,
    CeilingCollision,
    ObjectiveReached,
}

impl DeathCause {
    pub fn is_win(&self) -> bool {
        *self == DeathCause::ObjectiveReached
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeathCause::ObstacleCollision => "obstacle",
            DeathCause::FloorCollision => "floor",
            DeathCause::CeilingCollision => "ceiling",
            DeathCause::ObjectiveReached => "objective",
        }
    }
}

/// Terminal result of a round, produced exactly once per round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub final_score: u32,
    pub cause: DeathCause,
}

/// Complete per-round simulation state
#[derive(Debug, Clone)]
pub struct SimState {
    /// Seed the generator was created from
    pub seed: u64,
    /// Generator for obstacle geometry, drift, jitter and cosmetics
    pub rng: Pcg32,
    /// Active tier
    pub difficulty: Difficulty,
    /// Constants for the active tier
    pub profile: DifficultyProfile,
    pub flyer: Flyer,
    /// Active obstacles, oldest first
    pub obstacles: Vec<Obstacle>,
    /// Obstacles passed this round
    pub score: u32,
    /// Ticks completed this round; drives spawn cadence and jitter
    pub tick_count: u64,
    /// Current global scroll speed
    pub scroll_speed: f32,
    /// Background scroll offset (cosmetic)
    pub parallax_x: f32,
    /// Set when the round has ended
    pub outcome: Option<RoundOutcome>,
}

impl SimState {
    /// Fresh round: centered motionless flyer, no obstacles, zero score
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        let profile = *difficulty.profile();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            difficulty,
            profile,
            flyer: Flyer::default(),
            obstacles: Vec::new(),
            score: 0,
            tick_count: 0,
            scroll_speed: profile.obstacle_speed,
            parallax_x: 0.0,
            outcome: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }
}
