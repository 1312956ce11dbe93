//! Skyline Strike - a side-scrolling flappy avoider
//!
//! Core modules:
//! - `sim`: Simulation (difficulty table, physics, obstacles, collisions, tick)
//! - `session`: Session state machine (menu, difficulty select, round over, lockout)
//! - `driver`: Per-frame delta-time computation and render hand-off
//! - `wallet`: Credits and high score on top of `persistence`
//! - `commentary`: Post-round commentary with offline fallback
//! - `settings`: Player preferences and themes

pub mod commentary;
pub mod driver;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;
pub mod wallet;

pub use driver::{FrameDriver, FrameView, Renderer};
pub use session::{RoundReport, Session, SessionError, SessionState};
pub use settings::{Settings, Theme};
pub use wallet::Wallet;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (logical units)
    pub const PLAYFIELD_WIDTH: f32 = 400.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Nominal flyer sprite size
    pub const FLYER_SIZE: f32 = 30.0;
    /// Fixed horizontal position of the flyer's center
    pub const FLYER_X: f32 = 50.0;

    /// Obstacle column width
    pub const OBSTACLE_WIDTH: f32 = 70.0;
    /// Obstacles spawn this far past the right edge
    pub const OBSTACLE_SPAWN_OFFSET: f32 = 100.0;
    /// Obstacles are culled once `x + OBSTACLE_CULL_MARGIN <= 0`
    pub const OBSTACLE_CULL_MARGIN: f32 = 200.0;
    /// Closest a gap edge may come to the floor or ceiling
    pub const GAP_MARGIN: f32 = 100.0;

    /// Nominal frame time the physics constants are tuned for (60 fps)
    pub const TARGET_FRAME_MS: f32 = 1000.0 / 60.0;
    /// Upper bound on a single simulation step, in nominal frames
    pub const MAX_DELTA_FACTOR: f32 = 3.0;

    /// Velocity to pitch conversion
    pub const PITCH_PER_VELOCITY: f32 = 0.05;
    /// Nose-up limit (radians)
    pub const MIN_PITCH: f32 = -std::f32::consts::FRAC_PI_4;
    /// Nose-down limit (radians)
    pub const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_8;

    /// Parallax layer scrolls at this fraction of obstacle speed
    pub const PARALLAX_RATE: f32 = 0.4;

    /// Score that ends a round in a win
    pub const OBJECTIVE_SCORE: u32 = 30;

    /// Credits charged per round
    pub const ENTRY_COST: u32 = 9;
    /// Balance for a fresh profile
    pub const STARTING_CREDITS: u32 = 90;
    /// Balance after a bailout
    pub const BAILOUT_CREDITS: u32 = 45;
}
