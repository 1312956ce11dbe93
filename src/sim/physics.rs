//! Vertical flyer integration
//!
//! All rates are per nominal 60 fps tick and scaled by `delta_factor`.

use super::state::Flyer;
use crate::consts::*;

/// Advance the flyer by one tick: gravity, then position, then pitch
pub fn integrate(flyer: &mut Flyer, gravity: f32, delta_factor: f32) {
    flyer.velocity += gravity * delta_factor;
    flyer.y += flyer.velocity * delta_factor;
    flyer.pitch = pitch_for(flyer.velocity);
}

/// Overwrite velocity with the flap impulse (not additive)
#[inline]
pub fn flap(flyer: &mut Flyer, jump_impulse: f32) {
    flyer.velocity = jump_impulse;
}

/// Cosmetic pitch; dives tilt further than climbs
#[inline]
pub fn pitch_for(velocity: f32) -> f32 {
    (velocity * PITCH_PER_VELOCITY).clamp(MIN_PITCH, MAX_PITCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_tick_of_easy_gravity() {
        let mut flyer = Flyer {
            y: 300.0,
            velocity: 0.0,
            pitch: 0.0,
        };
        integrate(&mut flyer, 0.12, 1.0);
        assert!((flyer.velocity - 0.12).abs() < 1e-6);
        assert!((flyer.y - 300.12).abs() < 1e-4);
    }

    #[test]
    fn test_flap_then_medium_tick() {
        let mut flyer = Flyer::default();
        flyer.velocity = 3.0;
        flap(&mut flyer, -5.5);
        integrate(&mut flyer, 0.20, 1.0);
        assert!((flyer.velocity - -5.3).abs() < 1e-5);
    }

    #[test]
    fn test_repeated_flaps_last_write_wins() {
        let mut flyer = Flyer::default();
        flap(&mut flyer, -4.5);
        flap(&mut flyer, -4.5);
        assert!((flyer.velocity - -4.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_pitch_limits_are_asymmetric() {
        assert!((pitch_for(-100.0) - MIN_PITCH).abs() < f32::EPSILON);
        assert!((pitch_for(100.0) - MAX_PITCH).abs() < f32::EPSILON);
        assert!((pitch_for(2.0) - 0.1).abs() < 1e-6);
        assert!(MIN_PITCH.abs() > MAX_PITCH.abs());
    }

    #[test]
    fn test_zero_delta_freezes_motion() {
        let mut flyer = Flyer {
            y: 200.0,
            velocity: 1.5,
            pitch: 0.0,
        };
        integrate(&mut flyer, 0.3, 0.0);
        assert!((flyer.y - 200.0).abs() < f32::EPSILON);
        assert!((flyer.velocity - 1.5).abs() < f32::EPSILON);
    }
}
