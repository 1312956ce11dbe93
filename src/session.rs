//! Session state machine
//!
//! Menu -> difficulty select -> playing -> round over, with a lockout branch
//! when the wallet cannot cover the entry cost. The machine is cyclic; no state
//! is terminal.

use std::time::Instant;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::commentary::{self, CommentaryDesk, CommentaryReady, PLACEHOLDER_LINE, WELCOME_LINE};
use crate::settings::Theme;
use crate::sim::{self, Difficulty, RoundOutcome, SimState};
use crate::wallet::Wallet;

/// Everything the round-over screen shows
#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    /// Round this report belongs to
    pub round_id: u64,
    pub outcome: RoundOutcome,
    pub difficulty: Difficulty,
    /// Credits awarded (0 unless the objective was reached)
    pub bounty: u32,
    pub new_high_score: bool,
    /// Cosmetic critic title
    pub critic: &'static str,
    /// Filled once when the commentary for this round arrives
    pub commentary: Option<String>,
}

impl RoundReport {
    pub fn is_win(&self) -> bool {
        self.outcome.cause.is_win()
    }

    /// Commentary if it has arrived, placeholder otherwise
    pub fn display_line(&self) -> &str {
        self.commentary.as_deref().unwrap_or(PLACEHOLDER_LINE)
    }

    pub fn commentary_loading(&self) -> bool {
        self.commentary.is_none()
    }
}

/// Current screen of the session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Menu,
    DifficultySelect,
    Playing,
    RoundOver(RoundReport),
    /// Not enough credits for another round
    LockedOut,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Menu => "menu",
            SessionState::DifficultySelect => "difficulty select",
            SessionState::Playing => "playing",
            SessionState::RoundOver(_) => "round over",
            SessionState::LockedOut => "locked out",
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, SessionState::Playing)
    }
}

/// Player action the current state does not accept
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {action} while in {state}")]
    InvalidAction {
        action: &'static str,
        state: &'static str,
    },
}

/// One player's session: state machine, wallet, and the live round
pub struct Session {
    state: SessionState,
    wallet: Wallet,
    sim: SimState,
    theme: Theme,
    /// Base seed; each round derives its own
    seed: u64,
    /// Incremented on every round start
    round_id: u64,
    desk: CommentaryDesk,
    /// Latest commentary line, shown on the menu
    headline: String,
    /// Cosmetic picks (critic names)
    rng: Pcg32,
}

impl Session {
    pub fn new(wallet: Wallet, desk: CommentaryDesk, theme: Theme, seed: u64) -> Self {
        Self {
            state: SessionState::Menu,
            wallet,
            sim: SimState::new(Difficulty::Medium, seed),
            theme,
            seed,
            round_id: 0,
            desk,
            headline: WELCOME_LINE.to_string(),
            rng: Pcg32::seed_from_u64(seed ^ 0x5eed),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// Current (or most recent) round
    pub fn sim(&self) -> &SimState {
        &self.sim
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn round_id(&self) -> u64 {
        self.round_id
    }

    pub fn headline(&self) -> &str {
        &self.headline
    }

    /// Menu or round over -> difficulty select, or lockout if broke
    pub fn open_difficulty_select(&mut self) -> Result<&SessionState, SessionError> {
        match self.state {
            SessionState::Menu | SessionState::RoundOver(_) => {}
            _ => return Err(self.reject("open difficulty select")),
        }
        if self.wallet.can_afford_entry() {
            self.transition(SessionState::DifficultySelect);
        } else {
            self.transition(SessionState::LockedOut);
        }
        Ok(&self.state)
    }

    /// Difficulty select -> playing. Charges the entry cost and resets the round.
    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> Result<&SessionState, SessionError> {
        if self.state != SessionState::DifficultySelect {
            return Err(self.reject("select a difficulty"));
        }
        if !self.wallet.charge_entry() {
            self.transition(SessionState::LockedOut);
            return Ok(&self.state);
        }

        self.round_id += 1;
        self.sim = SimState::new(difficulty, self.round_seed());
        log::info!(
            "Round {} started on {} ({} credits left)",
            self.round_id,
            difficulty.as_str(),
            self.wallet.credits()
        );
        self.transition(SessionState::Playing);
        Ok(&self.state)
    }

    /// Round over or difficulty select -> menu
    pub fn back_to_menu(&mut self) -> Result<&SessionState, SessionError> {
        match self.state {
            SessionState::RoundOver(_) | SessionState::DifficultySelect => {}
            _ => return Err(self.reject("return to the menu")),
        }
        self.sim = SimState::new(self.sim.difficulty, self.seed);
        self.transition(SessionState::Menu);
        Ok(&self.state)
    }

    /// Lockout -> menu with the bailout balance
    pub fn request_bailout(&mut self) -> Result<&SessionState, SessionError> {
        if self.state != SessionState::LockedOut {
            return Err(self.reject("request a bailout"));
        }
        self.wallet.bailout();
        log::info!("Bailout granted: {} credits", self.wallet.credits());
        self.transition(SessionState::Menu);
        Ok(&self.state)
    }

    /// Jump trigger. Only acts while playing; returns whether it applied.
    pub fn flap(&mut self) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        sim::flap(&mut self.sim);
        true
    }

    /// Run one tick if playing. Returns the outcome on the tick the round ends.
    pub fn advance(&mut self, delta_factor: f32, now: Instant) -> Option<RoundOutcome> {
        if !self.state.is_playing() {
            return None;
        }
        let outcome = sim::tick(&mut self.sim, delta_factor)?;
        self.finish_round(outcome, now);
        Some(outcome)
    }

    /// Apply any commentary that has arrived for the current round
    pub fn poll_commentary(&mut self, now: Instant) {
        for ready in self.desk.poll(now) {
            self.apply_commentary(ready);
        }
    }

    fn finish_round(&mut self, outcome: RoundOutcome, now: Instant) {
        let bounty = if outcome.cause.is_win() {
            self.sim.profile.bounty
        } else {
            0
        };
        if bounty > 0 {
            self.wallet.credit(bounty);
        }
        let new_high_score = self.wallet.record_score(outcome.final_score);

        log::info!(
            "Round {} over: {:?} with score {} (bounty {}, high score {})",
            self.round_id,
            outcome.cause,
            outcome.final_score,
            bounty,
            self.wallet.high_score()
        );

        self.desk
            .request(self.round_id, outcome.final_score, outcome.cause, now);

        let report = RoundReport {
            round_id: self.round_id,
            outcome,
            difficulty: self.sim.difficulty,
            bounty,
            new_high_score,
            critic: commentary::critic_name(&mut self.rng),
            commentary: None,
        };
        self.transition(SessionState::RoundOver(report));
    }

    /// Fill the round-over commentary once; anything for another round is dropped
    fn apply_commentary(&mut self, ready: CommentaryReady) -> bool {
        match &mut self.state {
            SessionState::RoundOver(report)
                if report.round_id == ready.round_id && report.commentary.is_none() =>
            {
                self.headline = ready.text.clone();
                report.commentary = Some(ready.text);
                true
            }
            _ => {
                log::debug!(
                    "Discarding commentary for round {} (current round {})",
                    ready.round_id,
                    self.round_id
                );
                false
            }
        }
    }

    fn round_seed(&self) -> u64 {
        self.round_id.wrapping_mul(2654435761).wrapping_add(self.seed)
    }

    fn transition(&mut self, next: SessionState) {
        log::info!("Session: {} -> {}", self.state.name(), next.name());
        self.state = next;
    }

    fn reject(&self, action: &'static str) -> SessionError {
        log::warn!("Rejected action '{}' in state {}", action, self.state.name());
        SessionError::InvalidAction {
            action,
            state: self.state.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commentary::{LOSS_LINES, WIN_LINES};
    use crate::consts::*;
    use crate::persistence::MemoryStore;
    use crate::sim::DeathCause;

    fn session() -> Session {
        Session::new(
            Wallet::load(Box::new(MemoryStore::new())),
            CommentaryDesk::offline(),
            Theme::NightFlight,
            12345,
        )
    }

    fn start(session: &mut Session, difficulty: Difficulty) -> SessionState {
        session.open_difficulty_select().unwrap();
        if session.state() == &SessionState::LockedOut {
            return SessionState::LockedOut;
        }
        session.select_difficulty(difficulty).unwrap().clone()
    }

    fn crash(session: &mut Session) -> RoundOutcome {
        let now = Instant::now();
        (0..5000)
            .find_map(|_| session.advance(1.0, now))
            .expect("round should end without input")
    }

    fn win(session: &mut Session) -> RoundOutcome {
        session.sim.score = OBJECTIVE_SCORE;
        session.advance(1.0, Instant::now()).unwrap()
    }

    #[test]
    fn test_initial_state_is_menu() {
        let s = session();
        assert_eq!(s.state(), &SessionState::Menu);
        assert_eq!(s.headline(), WELCOME_LINE);
        assert_eq!(s.round_id(), 0);
    }

    #[test]
    fn test_start_charges_and_resets() {
        let mut s = session();
        assert_eq!(start(&mut s, Difficulty::Easy), SessionState::Playing);
        assert_eq!(s.wallet().credits(), 81);
        assert_eq!(s.sim().score, 0);
        assert!(s.sim().obstacles.is_empty());
        assert_eq!(s.sim().difficulty, Difficulty::Easy);
        assert!((s.sim().flyer.y - PLAYFIELD_HEIGHT / 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_ten_rounds_then_lockout() {
        let mut s = session();
        for _ in 0..10 {
            assert_eq!(start(&mut s, Difficulty::Easy), SessionState::Playing);
            let outcome = crash(&mut s);
            assert!(!outcome.cause.is_win());
        }
        assert_eq!(s.wallet().credits(), 0);
        assert_eq!(start(&mut s, Difficulty::Easy), SessionState::LockedOut);

        s.request_bailout().unwrap();
        assert_eq!(s.state(), &SessionState::Menu);
        assert_eq!(s.wallet().credits(), BAILOUT_CREDITS);
    }

    #[test]
    fn test_medium_win_buys_one_extra_round() {
        let mut s = session();
        let mut starts = 0;
        loop {
            if start(&mut s, Difficulty::Medium) == SessionState::LockedOut {
                break;
            }
            starts += 1;
            if starts == 1 {
                let outcome = win(&mut s);
                assert_eq!(outcome.cause, DeathCause::ObjectiveReached);
            } else {
                crash(&mut s);
            }
        }
        assert_eq!(starts, 11);
        assert_eq!(s.wallet().credits(), 6);
    }

    #[test]
    fn test_win_credits_tier_bounty() {
        for (tier, bounty) in [
            (Difficulty::Easy, 12),
            (Difficulty::Medium, 15),
            (Difficulty::Hard, 18),
        ] {
            let mut s = session();
            start(&mut s, tier);
            let before = s.wallet().credits();
            // Also parked on the floor; the objective still wins
            s.sim.flyer.y = 599.0;
            win(&mut s);
            assert_eq!(s.wallet().credits(), before + bounty);
            match s.state() {
                SessionState::RoundOver(report) => {
                    assert!(report.is_win());
                    assert_eq!(report.bounty, bounty);
                    assert_eq!(report.outcome.final_score, OBJECTIVE_SCORE);
                }
                other => panic!("expected round over, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_crash_credits_nothing() {
        let mut s = session();
        start(&mut s, Difficulty::Hard);
        let before = s.wallet().credits();
        crash(&mut s);
        assert_eq!(s.wallet().credits(), before);
    }

    #[test]
    fn test_score_resets_between_rounds() {
        let mut s = session();
        start(&mut s, Difficulty::Easy);
        s.sim.score = 17;
        crash(&mut s);
        assert_eq!(s.wallet().high_score(), 17);
        start(&mut s, Difficulty::Easy);
        assert_eq!(s.sim().score, 0);
        crash(&mut s);
        assert_eq!(s.wallet().high_score(), 17);
    }

    #[test]
    fn test_flap_only_while_playing() {
        let mut s = session();
        assert!(!s.flap());
        start(&mut s, Difficulty::Medium);
        assert!(s.flap());
        assert!((s.sim().flyer.velocity - -5.5).abs() < f32::EPSILON);
        crash(&mut s);
        let v = s.sim().flyer.velocity;
        assert!(!s.flap());
        assert_eq!(s.sim().flyer.velocity, v);
    }

    #[test]
    fn test_advance_is_noop_outside_playing() {
        let mut s = session();
        assert!(s.advance(1.0, Instant::now()).is_none());
        assert_eq!(s.sim().tick_count, 0);
    }

    #[test]
    fn test_single_outcome_per_round() {
        let mut s = session();
        start(&mut s, Difficulty::Easy);
        crash(&mut s);
        let now = Instant::now();
        assert!((0..100).all(|_| s.advance(1.0, now).is_none()));
    }

    #[test]
    fn test_invalid_actions_are_rejected() {
        let mut s = session();
        assert!(matches!(
            s.select_difficulty(Difficulty::Easy),
            Err(SessionError::InvalidAction { state: "menu", .. })
        ));
        assert!(s.back_to_menu().is_err());
        assert!(s.request_bailout().is_err());
        assert_eq!(s.state(), &SessionState::Menu);

        start(&mut s, Difficulty::Easy);
        assert!(s.open_difficulty_select().is_err());
        assert!(s.back_to_menu().is_err());
        assert_eq!(s.state(), &SessionState::Playing);
    }

    #[test]
    fn test_round_over_paths() {
        let mut s = session();
        start(&mut s, Difficulty::Easy);
        crash(&mut s);
        s.back_to_menu().unwrap();
        assert_eq!(s.state(), &SessionState::Menu);
        assert!(s.sim().obstacles.is_empty());

        start(&mut s, Difficulty::Easy);
        crash(&mut s);
        assert_eq!(s.open_difficulty_select().unwrap(), &SessionState::DifficultySelect);
        s.back_to_menu().unwrap();
        assert_eq!(s.state(), &SessionState::Menu);
    }

    #[test]
    fn test_commentary_filled_once_for_matching_round() {
        let mut s = session();
        start(&mut s, Difficulty::Easy);
        crash(&mut s);
        let round = s.round_id();

        assert!(!s.apply_commentary(CommentaryReady {
            round_id: round + 9,
            text: "wrong round".into(),
        }));
        assert!(s.apply_commentary(CommentaryReady {
            round_id: round,
            text: "first".into(),
        }));
        assert!(!s.apply_commentary(CommentaryReady {
            round_id: round,
            text: "second".into(),
        }));
        match s.state() {
            SessionState::RoundOver(report) => assert_eq!(report.display_line(), "first"),
            other => panic!("expected round over, got {other:?}"),
        }
        assert_eq!(s.headline(), "first");
    }

    #[test]
    fn test_stale_commentary_dropped_after_new_round() {
        let mut s = session();
        start(&mut s, Difficulty::Easy);
        crash(&mut s);
        let old_round = s.round_id();

        start(&mut s, Difficulty::Easy);
        assert!(!s.apply_commentary(CommentaryReady {
            round_id: old_round,
            text: "stale".into(),
        }));
        crash(&mut s);
        assert!(!s.apply_commentary(CommentaryReady {
            round_id: old_round,
            text: "stale".into(),
        }));
        match s.state() {
            SessionState::RoundOver(report) => {
                assert!(report.commentary_loading());
                assert_eq!(report.display_line(), PLACEHOLDER_LINE);
            }
            other => panic!("expected round over, got {other:?}"),
        }
    }

    #[test]
    fn test_offline_commentary_arrives_from_fallback_pool() {
        let mut s = session();
        start(&mut s, Difficulty::Easy);
        crash(&mut s);

        let deadline = Instant::now() + std::time::Duration::from_secs(5);
        while Instant::now() < deadline {
            s.poll_commentary(Instant::now());
            if let SessionState::RoundOver(report) = s.state() {
                if report.commentary.is_some() {
                    break;
                }
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        match s.state() {
            SessionState::RoundOver(report) => {
                let line = report.commentary.as_deref().expect("commentary should arrive");
                assert!(LOSS_LINES.contains(&line));
                assert!(!WIN_LINES.contains(&line));
            }
            other => panic!("expected round over, got {other:?}"),
        }
    }
}
