//! Variable-step simulation tick
//!
//! One call per rendered frame while a round is live. Rates are tuned for a
//! 60 fps tick and scaled by `delta_factor`.

use super::collision::{award_passes, check_bounds, check_obstacles};
use super::obstacles::{advance, scroll_speed_for_tick, should_spawn, spawn_obstacle};
use super::physics;
use super::state::{DeathCause, RoundOutcome, SimState};
use crate::consts::*;

/// Apply a flap to the live round. Ignored once the round has ended.
pub fn flap(state: &mut SimState) {
    if state.is_finished() {
        return;
    }
    physics::flap(&mut state.flyer, state.profile.jump_impulse);
}

/// Advance the round by one tick. Returns the outcome on the tick the round ends.
pub fn tick(state: &mut SimState, delta_factor: f32) -> Option<RoundOutcome> {
    debug_assert!(
        (0.0..=MAX_DELTA_FACTOR).contains(&delta_factor),
        "delta factor {delta_factor} outside clamp"
    );
    if state.is_finished() {
        return None;
    }

    // Objective pre-empts everything else this tick
    if state.score >= OBJECTIVE_SCORE {
        return Some(finish(state, DeathCause::ObjectiveReached));
    }

    state.scroll_speed =
        scroll_speed_for_tick(&mut state.rng, &state.profile, state.tick_count, state.scroll_speed);

    physics::integrate(&mut state.flyer, state.profile.gravity, delta_factor);

    if let Some(cause) = check_bounds(&state.flyer) {
        return Some(finish(state, cause));
    }

    state.parallax_x += state.scroll_speed * PARALLAX_RATE * delta_factor;
    advance(
        &mut state.obstacles,
        state.scroll_speed,
        state.profile.gap_size,
        delta_factor,
    );

    if should_spawn(state.tick_count, state.profile.spawn_interval) {
        let obstacle = spawn_obstacle(&mut state.rng, &state.profile);
        log::debug!(
            "Spawned obstacle at tick {} (gap_top={:.1}, drift={:?})",
            state.tick_count,
            obstacle.gap_top,
            obstacle.drift
        );
        state.obstacles.push(obstacle);
    }

    state.score += award_passes(&mut state.obstacles);

    if let Some(cause) = check_obstacles(&state.flyer, &state.obstacles, state.profile.gap_size) {
        return Some(finish(state, cause));
    }

    state.tick_count += 1;
    None
}

fn finish(state: &mut SimState, cause: DeathCause) -> RoundOutcome {
    // A win always reports the objective, even if one tick scored past it
    let final_score = if cause.is_win() {
        OBJECTIVE_SCORE
    } else {
        state.score
    };
    let outcome = RoundOutcome { final_score, cause };
    state.outcome = Some(outcome);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::Difficulty;

    #[test]
    fn test_first_tick_spawns_and_falls() {
        let mut state = SimState::new(Difficulty::Easy, 12345);
        assert!(tick(&mut state, 1.0).is_none());
        assert!((state.flyer.velocity - 0.12).abs() < 1e-6);
        assert!((state.flyer.y - 300.12).abs() < 1e-4);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.tick_count, 1);
    }

    #[test]
    fn test_flap_then_tick_medium() {
        let mut state = SimState::new(Difficulty::Medium, 1);
        flap(&mut state);
        tick(&mut state, 1.0);
        assert!((state.flyer.velocity - -5.3).abs() < 1e-5);
    }

    #[test]
    fn test_falls_to_floor_without_input() {
        let mut state = SimState::new(Difficulty::Easy, 2);
        let outcome = (0..1000).find_map(|_| tick(&mut state, 1.0)).unwrap();
        assert_eq!(outcome.cause, DeathCause::FloorCollision);
        assert_eq!(outcome.final_score, 0);
        assert!(state.is_finished());
        // Finished rounds stay frozen
        let y = state.flyer.y;
        assert!(tick(&mut state, 1.0).is_none());
        assert_eq!(state.flyer.y, y);
    }

    #[test]
    fn test_ceiling_collision() {
        let mut state = SimState::new(Difficulty::Hard, 3);
        state.flyer.y = 20.0;
        flap(&mut state);
        let outcome = tick(&mut state, 1.0).unwrap();
        assert_eq!(outcome.cause, DeathCause::CeilingCollision);
    }

    #[test]
    fn test_objective_overshoot_reports_objective() {
        let mut state = SimState::new(Difficulty::Hard, 8);
        state.score = OBJECTIVE_SCORE + 1;
        let outcome = tick(&mut state, 1.0).unwrap();
        assert_eq!(outcome.cause, DeathCause::ObjectiveReached);
        assert_eq!(outcome.final_score, OBJECTIVE_SCORE);
        assert_eq!(state.outcome, Some(outcome));
    }

    #[test]
    fn test_objective_preempts_collision() {
        let mut state = SimState::new(Difficulty::Medium, 4);
        state.score = OBJECTIVE_SCORE;
        // Would hit the floor this tick
        state.flyer.y = 590.0;
        let outcome = tick(&mut state, 1.0).unwrap();
        assert_eq!(outcome.cause, DeathCause::ObjectiveReached);
        assert_eq!(outcome.final_score, OBJECTIVE_SCORE);
        assert!((state.flyer.y - 590.0).abs() < f32::EPSILON);
        assert_eq!(state.tick_count, 0);
    }

    #[test]
    fn test_obstacle_collision_keeps_score() {
        let mut state = SimState::new(Difficulty::Easy, 5);
        state.score = 4;
        state.tick_count = 1; // skip the spawn
        let mut rng = rand_pcg::Pcg32::new(0, 0);
        let mut o = spawn_obstacle(&mut rng, &state.profile);
        o.x = 40.0;
        o.gap_top = 400.0;
        state.obstacles.push(o);
        let outcome = tick(&mut state, 1.0).unwrap();
        assert_eq!(outcome.cause, DeathCause::ObstacleCollision);
        assert_eq!(outcome.final_score, 4);
    }

    #[test]
    fn test_flap_ignored_after_finish() {
        let mut state = SimState::new(Difficulty::Easy, 6);
        state.score = OBJECTIVE_SCORE;
        tick(&mut state, 1.0);
        let v = state.flyer.velocity;
        flap(&mut state);
        assert_eq!(state.flyer.velocity, v);
    }

    #[test]
    fn test_determinism() {
        let mut a = SimState::new(Difficulty::Hard, 99999);
        let mut b = SimState::new(Difficulty::Hard, 99999);
        for i in 0..400 {
            if i % 25 == 0 {
                flap(&mut a);
                flap(&mut b);
            }
            let ra = tick(&mut a, 1.0);
            let rb = tick(&mut b, 1.0);
            assert_eq!(ra, rb);
        }
        assert_eq!(a.tick_count, b.tick_count);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        assert_eq!(a.scroll_speed, b.scroll_speed);
        assert!((a.flyer.y - b.flyer.y).abs() < 1e-6);
    }
}
