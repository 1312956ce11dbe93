//! Skyline Strike entry point
//!
//! Pixels are someone else's job; this binary runs one headless round with a
//! simple autopilot through the real driver and reports the result.
//!
//! Usage: `skyline-strike [easy|medium|hard] [night|day|cyberpunk|industrial]`
//!
//! A theme argument becomes the saved theme for later runs.

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use skyline_strike::commentary::{
    CommentaryDesk, CommentarySource, HttpCommentary, OfflineCommentary,
};
use skyline_strike::consts::*;
use skyline_strike::persistence::{JsonFileStore, KvStore, MemoryStore};
use skyline_strike::sim::Difficulty;
use skyline_strike::{
    FrameDriver, FrameView, Renderer, Session, SessionState, Settings, Theme, Wallet,
};

/// Logs a one-line HUD once per second of game time and on state changes
#[derive(Default)]
struct LogHud {
    frames: u64,
    last_state: &'static str,
}

impl Renderer for LogHud {
    fn render(&mut self, frame: &FrameView<'_>) {
        self.frames += 1;
        let state = frame.state.name();
        if state != self.last_state {
            log::info!(
                "[{}] credits={} best={} theme={}",
                state,
                frame.credits,
                frame.high_score,
                frame.theme.as_str()
            );
            self.last_state = state;
        }
        if frame.state.is_playing() && self.frames % 60 == 0 {
            log::debug!(
                "score={} y={:.1} pitch={:.2} obstacles={}",
                frame.score(),
                frame.flyer_pos().y,
                frame.flyer().pitch,
                frame.obstacles().len()
            );
        }
    }
}

/// Aim for the center of the next gap
fn autopilot(session: &Session) -> bool {
    let sim = session.sim();
    let target = sim
        .obstacles
        .iter()
        .find(|o| o.right() >= FLYER_X - FLYER_SIZE / 2.0)
        .map(|o| o.gap_top + sim.profile.gap_size / 2.0)
        .unwrap_or(PLAYFIELD_HEIGHT / 2.0);
    sim.flyer.y > target + 20.0 && sim.flyer.velocity > 0.0
}

fn open_store() -> Box<dyn KvStore> {
    match JsonFileStore::open_default() {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("Profile store unavailable ({}), progress will not be saved", e);
            Box::new(MemoryStore::new())
        }
    }
}

fn commentary_desk(settings: &Settings) -> CommentaryDesk {
    let timeout = Duration::from_millis(settings.commentary_timeout_ms);
    let source: Arc<dyn CommentarySource> = match &settings.commentary_url {
        Some(url) => Arc::new(HttpCommentary::new(url.clone(), timeout)),
        None => Arc::new(OfflineCommentary),
    };
    CommentaryDesk::new(source, timeout)
}

fn main() {
    env_logger::init();
    log::info!("Skyline Strike (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let difficulty = args
        .first()
        .and_then(|arg| Difficulty::from_str(arg))
        .unwrap_or(Difficulty::Medium);

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });

    let mut session = Session::new(
        Wallet::load(open_store()),
        commentary_desk(&settings),
        settings.theme,
        seed,
    );
    if let Some(arg) = args.get(1) {
        match Theme::from_str(arg) {
            Some(theme) => {
                session.set_theme(theme);
                let mut saved = Settings::load_saved();
                saved.theme = theme;
                saved.save();
            }
            None => log::warn!("Unknown theme '{}', keeping {}", arg, settings.theme.as_str()),
        }
    }
    let mut driver = FrameDriver::new();
    let mut hud = LogHud::default();
    let frame = Duration::from_secs_f32(TARGET_FRAME_MS / 1000.0);

    if let Err(e) = session.open_difficulty_select() {
        log::error!("{}", e);
        return;
    }
    if matches!(session.state(), SessionState::LockedOut) {
        println!("Out of credits. Requesting a bailout.");
        if let Err(e) = session.request_bailout() {
            log::error!("{}", e);
            return;
        }
        if let Err(e) = session.open_difficulty_select() {
            log::error!("{}", e);
            return;
        }
    }
    if let Err(e) = session.select_difficulty(difficulty) {
        log::error!("{}", e);
        return;
    }

    while session.state().is_playing() {
        if autopilot(&session) {
            session.flap();
        }
        driver.frame_with_delta(frame, &mut session, &mut hud);
    }

    // Keep driving frames until the commentary lands (or its deadline passes)
    let deadline = Instant::now() + Duration::from_millis(settings.commentary_timeout_ms + 500);
    while Instant::now() < deadline {
        if let SessionState::RoundOver(report) = session.state() {
            if report.commentary.is_some() {
                break;
            }
        }
        std::thread::sleep(frame);
        driver.frame(Instant::now(), &mut session, &mut hud);
    }

    if let SessionState::RoundOver(report) = session.state() {
        println!(
            "{} on {}: score {} ({:?}){}",
            if report.is_win() { "VICTORY" } else { "CRASHED" },
            report.difficulty.as_str(),
            report.outcome.final_score,
            report.outcome.cause,
            if report.new_high_score { " - new high score!" } else { "" }
        );
        if report.bounty > 0 {
            println!("Bounty: +{} credits", report.bounty);
        }
        println!("{}: \"{}\"", report.critic, report.display_line());
    }
    println!(
        "Credits: {}  High score: {}",
        session.wallet().credits(),
        session.wallet().high_score()
    );
}
