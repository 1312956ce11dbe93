//! Credits balance and high score
//!
//! Persisted through a [`KvStore`] on every change.

use crate::consts::{BAILOUT_CREDITS, ENTRY_COST, STARTING_CREDITS};
use crate::persistence::KvStore;

/// Store key for the credit balance
pub const CREDITS_KEY: &str = "credits";
/// Store key for the best score
pub const HIGH_SCORE_KEY: &str = "highScore";

/// Player balance and best score
pub struct Wallet {
    store: Box<dyn KvStore>,
    credits: u32,
    high_score: u32,
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("credits", &self.credits)
            .field("high_score", &self.high_score)
            .finish()
    }
}

impl Wallet {
    /// Load from `store`; a fresh profile starts with [`STARTING_CREDITS`]
    pub fn load(store: Box<dyn KvStore>) -> Self {
        let credits = read_u32(store.as_ref(), CREDITS_KEY).unwrap_or(STARTING_CREDITS);
        let high_score = read_u32(store.as_ref(), HIGH_SCORE_KEY).unwrap_or(0);
        log::info!("Wallet loaded: {} credits, high score {}", credits, high_score);
        Self {
            store,
            credits,
            high_score,
        }
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Enough credits for one round
    pub fn can_afford_entry(&self) -> bool {
        self.credits >= ENTRY_COST
    }

    /// Deduct the entry cost. Returns false (and charges nothing) if unaffordable.
    pub fn charge_entry(&mut self) -> bool {
        if !self.can_afford_entry() {
            return false;
        }
        self.credits -= ENTRY_COST;
        self.persist(CREDITS_KEY, self.credits);
        true
    }

    /// Add a bounty
    pub fn credit(&mut self, amount: u32) {
        self.credits = self.credits.saturating_add(amount);
        self.persist(CREDITS_KEY, self.credits);
    }

    /// Reset the balance to the bailout amount
    pub fn bailout(&mut self) {
        self.credits = BAILOUT_CREDITS;
        self.persist(CREDITS_KEY, self.credits);
    }

    /// Keep the best score. Returns true if `score` is a new record.
    pub fn record_score(&mut self, score: u32) -> bool {
        if score <= self.high_score {
            return false;
        }
        self.high_score = score;
        self.persist(HIGH_SCORE_KEY, score);
        true
    }

    fn persist(&mut self, key: &str, value: u32) {
        // A failed write must not interrupt play; the in-memory value stays authoritative
        if let Err(e) = self.store.save(key, u64::from(value)) {
            log::warn!("Failed to persist {}: {}", key, e);
        }
    }
}

fn read_u32(store: &dyn KvStore, key: &str) -> Option<u32> {
    store.load(key).map(|v| u32::try_from(v).unwrap_or(u32::MAX))
}
