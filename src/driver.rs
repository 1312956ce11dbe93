//! Frame driver
//!
//! Called once per rendered frame regardless of session state. Converts the
//! wall-clock frame delta into a clamped delta factor, advances the session,
//! collects commentary, and hands a read-only view to the renderer.

use std::time::{Duration, Instant};

use glam::Vec2;

use crate::consts::*;
use crate::session::{Session, SessionState};
use crate::settings::Theme;
use crate::sim::{Flyer, Obstacle, RoundOutcome, SimState};

/// Frame time in ms -> nominal 60 fps frames, clamped to `[0, MAX_DELTA_FACTOR]`
#[inline]
pub fn delta_factor(delta_ms: f32) -> f32 {
    (delta_ms / TARGET_FRAME_MS).clamp(0.0, MAX_DELTA_FACTOR)
}

/// Everything a renderer may look at for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub state: &'a SessionState,
    pub sim: &'a SimState,
    pub theme: Theme,
    pub credits: u32,
    pub high_score: u32,
    /// Latest commentary line (welcome line before the first round)
    pub headline: &'a str,
}

impl<'a> FrameView<'a> {
    pub fn from_session(session: &'a Session) -> Self {
        Self {
            state: session.state(),
            sim: session.sim(),
            theme: session.theme(),
            credits: session.wallet().credits(),
            high_score: session.wallet().high_score(),
            headline: session.headline(),
        }
    }

    pub fn obstacles(&self) -> &'a [Obstacle] {
        &self.sim.obstacles
    }

    pub fn flyer(&self) -> &'a Flyer {
        &self.sim.flyer
    }

    /// Flyer sprite center in playfield coordinates
    pub fn flyer_pos(&self) -> Vec2 {
        Vec2::new(FLYER_X, self.sim.flyer.y)
    }

    pub fn score(&self) -> u32 {
        self.sim.score
    }
}

/// Presentation layer. Receives a shared borrow only, so it cannot touch game state.
pub trait Renderer {
    fn render(&mut self, frame: &FrameView<'_>);
}

/// Owns frame timing for one mounted game
#[derive(Debug, Default)]
pub struct FrameDriver {
    last_frame: Option<Instant>,
    frames: u64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames driven so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Drive one frame at wall-clock time `now`
    ///
    /// The first frame after mounting counts as one nominal frame.
    pub fn frame<R: Renderer>(
        &mut self,
        now: Instant,
        session: &mut Session,
        renderer: &mut R,
    ) -> Option<RoundOutcome> {
        let delta_ms = match self.last_frame {
            Some(last) => now.saturating_duration_since(last).as_secs_f32() * 1000.0,
            None => TARGET_FRAME_MS,
        };
        self.last_frame = Some(now);
        self.step(delta_ms, now, session, renderer)
    }

    /// Drive one frame with an explicit delta (headless runs, tests)
    pub fn frame_with_delta<R: Renderer>(
        &mut self,
        delta: Duration,
        session: &mut Session,
        renderer: &mut R,
    ) -> Option<RoundOutcome> {
        let now = match self.last_frame {
            Some(last) => last + delta,
            None => Instant::now(),
        };
        self.last_frame = Some(now);
        self.step(delta.as_secs_f32() * 1000.0, now, session, renderer)
    }

    fn step<R: Renderer>(
        &mut self,
        delta_ms: f32,
        now: Instant,
        session: &mut Session,
        renderer: &mut R,
    ) -> Option<RoundOutcome> {
        self.frames += 1;
        let outcome = session.advance(delta_factor(delta_ms), now);
        session.poll_commentary(now);
        renderer.render(&FrameView::from_session(session));
        outcome
    }
}
