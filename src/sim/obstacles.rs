//! Obstacle generation and scrolling
//!
//! Spawn cadence counts simulation ticks rather than wall-clock time, so the
//! delta factor changes how fast obstacles travel but not how many appear.

use rand::Rng;

use super::difficulty::DifficultyProfile;
use super::state::{BuildingDetails, BuildingShape, Obstacle};
use crate::consts::*;
use crate::settings::{BUILDING_PALETTE, WINDOW_PALETTE};

/// True on ticks where a new obstacle should enter
#[inline]
pub fn should_spawn(tick: u64, spawn_interval: u64) -> bool {
    tick % spawn_interval == 0
}

/// Lowest and highest allowed `gap_top` for a given gap size
pub fn gap_bounds(gap_size: f32) -> (f32, f32) {
    let min = GAP_MARGIN;
    let max = (PLAYFIELD_HEIGHT - gap_size - GAP_MARGIN).max(min);
    (min, max)
}

/// Build a new obstacle just past the right edge
pub fn spawn_obstacle<R: Rng>(rng: &mut R, profile: &DifficultyProfile) -> Obstacle {
    let (min, max) = gap_bounds(profile.gap_size);
    let gap_top = if max > min {
        rng.random_range(min..max)
    } else {
        min
    };

    let drift = if profile.drift_range > 0.0 {
        Some(rng.random_range(-profile.drift_range..profile.drift_range))
    } else {
        None
    };

    Obstacle {
        x: PLAYFIELD_WIDTH + OBSTACLE_SPAWN_OFFSET,
        gap_top,
        passed: false,
        drift,
        top: random_building(rng),
        bottom: random_building(rng),
    }
}

/// Cosmetic details, drawn independently of the geometry
pub fn random_building<R: Rng>(rng: &mut R) -> BuildingDetails {
    BuildingDetails {
        shape: BuildingShape::ALL[rng.random_range(0..BuildingShape::ALL.len())],
        body_color: rng.random_range(0..BUILDING_PALETTE.len()) as u8,
        window_color: rng.random_range(0..WINDOW_PALETTE.len()) as u8,
        has_windows: rng.random_bool(0.9),
    }
}

/// Scroll speed for this tick. Tiers without jitter hold the base speed.
pub fn scroll_speed_for_tick<R: Rng>(
    rng: &mut R,
    profile: &DifficultyProfile,
    tick: u64,
    current: f32,
) -> f32 {
    match profile.speed_jitter {
        Some(jitter) if tick % jitter.every == 0 => {
            let speed = profile.obstacle_speed * rng.random_range(jitter.min..jitter.max);
            log::debug!("Scroll speed jittered to {:.2} at tick {}", speed, tick);
            speed
        }
        Some(_) => current,
        None => profile.obstacle_speed,
    }
}

/// Move every obstacle left, apply gap drift, and drop the ones off screen
pub fn advance(obstacles: &mut Vec<Obstacle>, speed: f32, gap_size: f32, delta_factor: f32) {
    let (min, max) = gap_bounds(gap_size);

    for obstacle in obstacles.iter_mut() {
        if let Some(drift) = obstacle.drift.as_mut() {
            obstacle.gap_top += *drift * delta_factor;
            // Outside the band the drift always points back in, and the gap
            // never sits more than one nominal step past the edge
            let reach = drift.abs();
            if obstacle.gap_top < min {
                *drift = reach;
                obstacle.gap_top = obstacle.gap_top.max(min - reach);
            } else if obstacle.gap_top > max {
                *drift = -reach;
                obstacle.gap_top = obstacle.gap_top.min(max + reach);
            }
        }
        obstacle.x -= speed * delta_factor;
    }

    obstacles.retain(|o| o.x + OBSTACLE_CULL_MARGIN > 0.0);
}
