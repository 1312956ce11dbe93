//! Post-round commentary
//!
//! Commentary is fetched off the frame loop on a worker thread and handed back
//! over a channel tagged with the round id. Every failure path (transport
//! error, blank reply, missed deadline) resolves to a line from a fixed pool,
//! so callers only ever see a non-empty string.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, unbounded};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Deserialize;
use thiserror::Error;

use crate::sim::DeathCause;

/// Shown in the menu before any round has been played
pub const WELCOME_LINE: &str =
    "Welcome to the air traffic nightmare. Try not to embarrass the pilot association.";

/// Shown on the round-over screen while commentary is in flight
pub const PLACEHOLDER_LINE: &str = "The critic is reviewing the wreckage...";

/// Fallback lines after a crash
pub const LOSS_LINES: [&str; 12] = [
    "You went down faster than my respect for humanity.",
    "Gravity 1, You 0. Try using your eyes next time.",
    "That was less of a flight and more of a vertical failure.",
    "I've seen bricks fly better than that.",
    "Your performance was as stable as a house of cards in a hurricane.",
    "Maybe try a game where the objective is to hit everything?",
    "Error 404: Skill not found.",
    "You're proof that some people just aren't meant for the skies.",
    "Is your screen off, or are you just like this?",
    "That was physically painful to watch.",
    "You play like you're allergic to success.",
    "I'd call that a crash, but it lacked the dignity of an impact.",
];

/// Fallback lines after reaching the objective
pub const WIN_LINES: [&str; 7] = [
    "You won. Now go outside and find a real personality.",
    "30 points? Your parents must be so proud of your wasted potential.",
    "Congratulations on being the king of a digital landfill.",
    "You beat a flappy bird clone. Is this the peak of your life?",
    "Imagine spending this much effort on something so meaningless.",
    "You've mastered clicking a mouse. Truly, a hero of our time.",
    "The reward for winning is knowing you'll never get that time back.",
];

/// Titles for the critic shown above the commentary
pub const CRITIC_NAMES: [&str; 14] = [
    "The Existential Crisis Generator",
    "Professional Disappointer",
    "The Digital Depressant",
    "Lord of the Skill Gap",
    "The Pavement Enthusiast",
    "CEO of Vertical Failure",
    "The Disappoint-o-Tron",
    "Gravity's Secret Agent",
    "The Flight Path Violator",
    "The Unscheduled Disassembly Expert",
    "Rapid Unplanned Dismantler",
    "The Crash Test Dummy Overseer",
    "Sentient Disappointment Engine",
    "The Mechanical Eye-Roller",
];

/// Why a commentary fetch failed. Never surfaces past [`resolve`].
#[derive(Error, Debug)]
pub enum CommentaryError {
    #[error("commentary service not configured")]
    Unavailable,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unreadable response: {0}")]
    BadResponse(String),

    #[error("empty response")]
    EmptyResponse,
}

/// Something that can write a line about a finished round
pub trait CommentarySource: Send + Sync {
    fn fetch(&self, score: u32, cause: DeathCause) -> Result<String, CommentaryError>;
}

/// Always unavailable; every round gets a fallback line
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineCommentary;

impl CommentarySource for OfflineCommentary {
    fn fetch(&self, _score: u32, _cause: DeathCause) -> Result<String, CommentaryError> {
        Err(CommentaryError::Unavailable)
    }
}

#[derive(Debug, Deserialize)]
struct CommentaryReply {
    text: String,
}

/// Posts `{score, cause, won}` to an HTTP endpoint that answers `{"text": ...}`
#[derive(Debug, Clone)]
pub struct HttpCommentary {
    url: String,
    timeout: Duration,
}

impl HttpCommentary {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

impl CommentarySource for HttpCommentary {
    fn fetch(&self, score: u32, cause: DeathCause) -> Result<String, CommentaryError> {
        let reply: CommentaryReply = ureq::post(&self.url)
            .set("User-Agent", "skyline-strike")
            .timeout(self.timeout)
            .send_json(serde_json::json!({
                "score": score,
                "cause": cause.as_str(),
                "won": cause.is_win(),
            }))
            .map_err(|e| CommentaryError::Transport(e.to_string()))?
            .into_json()
            .map_err(|e| CommentaryError::BadResponse(e.to_string()))?;

        let text = reply.text.trim();
        if text.is_empty() {
            return Err(CommentaryError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

/// Random line from the pool matching the outcome
pub fn fallback_line<R: Rng>(cause: DeathCause, rng: &mut R) -> &'static str {
    let pool: &[&'static str] = if cause.is_win() { &WIN_LINES } else { &LOSS_LINES };
    pool.choose(rng).copied().unwrap_or(LOSS_LINES[0])
}

/// Random critic title
pub fn critic_name<R: Rng>(rng: &mut R) -> &'static str {
    CRITIC_NAMES.choose(rng).copied().unwrap_or(CRITIC_NAMES[0])
}

/// Fetch from `source`, substituting a fallback line on any failure
pub fn resolve(source: &dyn CommentarySource, score: u32, cause: DeathCause) -> String {
    match source.fetch(score, cause) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            log::warn!("Commentary came back blank, using fallback");
            fallback_line(cause, &mut rand::rng()).to_string()
        }
        Err(e) => {
            log::warn!("Commentary unavailable ({}), using fallback", e);
            fallback_line(cause, &mut rand::rng()).to_string()
        }
    }
}

/// Commentary for one round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentaryReady {
    pub round_id: u64,
    pub text: String,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    round_id: u64,
    cause: DeathCause,
    deadline: Instant,
}

/// Dispatches commentary fetches and collects their results
pub struct CommentaryDesk {
    source: Arc<dyn CommentarySource>,
    timeout: Duration,
    tx: Sender<CommentaryReady>,
    rx: Receiver<CommentaryReady>,
    pending: Vec<Pending>,
}

impl CommentaryDesk {
    pub fn new(source: Arc<dyn CommentarySource>, timeout: Duration) -> Self {
        let (tx, rx) = unbounded();
        Self {
            source,
            timeout,
            tx,
            rx,
            pending: Vec::new(),
        }
    }

    /// Desk that never reaches a service
    pub fn offline() -> Self {
        Self::new(Arc::new(OfflineCommentary), Duration::from_millis(4000))
    }

    /// Start a detached fetch for `round_id`
    pub fn request(&mut self, round_id: u64, score: u32, cause: DeathCause, now: Instant) {
        self.pending.push(Pending {
            round_id,
            cause,
            deadline: now + self.timeout,
        });

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("commentary-{round_id}"))
            .spawn(move || {
                let text = resolve(source.as_ref(), score, cause);
                // Receiver gone means the desk was dropped; nothing to deliver to
                let _ = tx.send(CommentaryReady { round_id, text });
            });

        if let Err(e) = spawned {
            log::warn!("Could not start commentary worker: {}", e);
            let text = fallback_line(cause, &mut rand::rng()).to_string();
            let _ = self.tx.send(CommentaryReady { round_id, text });
        }
    }

    /// Number of rounds still waiting on commentary
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Collect finished fetches and expire overdue ones. Never blocks.
    ///
    /// Each requested round yields exactly one result: either the worker's
    /// line or, past the deadline, a fallback. Late worker results are dropped.
    pub fn poll(&mut self, now: Instant) -> Vec<CommentaryReady> {
        let mut ready = Vec::new();

        for result in self.rx.try_iter() {
            if let Some(idx) = self.pending.iter().position(|p| p.round_id == result.round_id) {
                self.pending.swap_remove(idx);
                ready.push(result);
            } else {
                log::debug!("Dropping late commentary for round {}", result.round_id);
            }
        }

        let mut rng = rand::rng();
        self.pending.retain(|p| {
            if now < p.deadline {
                return true;
            }
            log::warn!("Commentary for round {} timed out, using fallback", p.round_id);
            ready.push(CommentaryReady {
                round_id: p.round_id,
                text: fallback_line(p.cause, &mut rng).to_string(),
            });
            false
        });

        ready
    }
}
