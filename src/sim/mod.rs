//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering,
//! persistence and timing concerns:
//! - Delta factor is computed by the driver and passed in
//! - Seeded RNG only
//! - Obstacles kept in spawn order

pub mod collision;
pub mod difficulty;
pub mod obstacles;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::{Aabb, award_passes, check_bounds, check_obstacles, flyer_hitbox};
pub use difficulty::{Difficulty, DifficultyProfile, SpeedJitter};
pub use state::{
    BuildingDetails, BuildingShape, DeathCause, Flyer, Obstacle, RoundOutcome, SimState,
};
pub use tick::{flap, tick};
