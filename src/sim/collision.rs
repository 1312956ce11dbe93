//! Collision detection and scoring
//!
//! The flyer's x-position is fixed. Boundary checks use the full sprite
//! half-extent; obstacle checks use a half-height hitbox so grazing a building
//! edge is forgiven.

use glam::Vec2;

use super::state::{DeathCause, Flyer, Obstacle};
use crate::consts::*;

/// Axis-aligned box in playfield coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Open-interval overlap on the x axis
    #[inline]
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        self.max.x > left && self.min.x < right
    }
}

/// Hitbox used against obstacles: full width, half the sprite height
pub fn flyer_hitbox(flyer: &Flyer) -> Aabb {
    Aabb::from_center(
        Vec2::new(FLYER_X, flyer.y),
        Vec2::new(FLYER_SIZE / 2.0, FLYER_SIZE / 4.0),
    )
}

/// Ceiling or floor contact
pub fn check_bounds(flyer: &Flyer) -> Option<DeathCause> {
    let half = FLYER_SIZE / 2.0;
    if flyer.y - half < 0.0 {
        Some(DeathCause::CeilingCollision)
    } else if flyer.y + half >= PLAYFIELD_HEIGHT {
        Some(DeathCause::FloorCollision)
    } else {
        None
    }
}

/// True if the hitbox is inside the obstacle's column but outside its gap
pub fn hits_obstacle(hitbox: &Aabb, obstacle: &Obstacle, gap_size: f32) -> bool {
    if !hitbox.overlaps_x(obstacle.x, obstacle.right()) {
        return false;
    }
    hitbox.min.y < obstacle.gap_top || hitbox.max.y > obstacle.gap_top + gap_size
}

/// Mark obstacles whose trailing edge has cleared the flyer. Returns points earned.
///
/// Each obstacle scores at most once; already-passed obstacles are skipped.
pub fn award_passes(obstacles: &mut [Obstacle]) -> u32 {
    let mut points = 0;
    for obstacle in obstacles.iter_mut() {
        if !obstacle.passed && obstacle.right() < FLYER_X {
            obstacle.passed = true;
            points += 1;
        }
    }
    points
}

/// Check every obstacle against the flyer
pub fn check_obstacles(flyer: &Flyer, obstacles: &[Obstacle], gap_size: f32) -> Option<DeathCause> {
    let hitbox = flyer_hitbox(flyer);
    obstacles
        .iter()
        .any(|o| hits_obstacle(&hitbox, o, gap_size))
        .then_some(DeathCause::ObstacleCollision)
}
