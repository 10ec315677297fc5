//! A running bakery: the one owner of `CookieState`.
//!
//! Every driver (draw loop, key handler, tap handler) goes through a
//! `Session`, so each sees the latest committed state. Lifecycle:
//!
//! 1. `start` loads the snapshot (or starts fresh) and credits offline
//!    production exactly once.
//! 2. `frame` releases 100ms production steps and autosaves every minute.
//! 3. `stop` writes a final snapshot and turns every periodic activity off.

use crate::console;
use crate::time::ProductionClock;

use super::logic::{self, PurchaseError};
use super::save::{self, SaveError, SaveStore, AUTOSAVE_INTERVAL_MS};
use super::state::CookieState;

/// Production steps per second.
pub const STEPS_PER_SEC: u32 = 10;

pub struct Session {
    state: CookieState,
    store: Box<dyn SaveStore>,
    clock: ProductionClock,
    next_autosave_ms: f64,
    started_ms: f64,
    last_frame_ms: f64,
    /// Time of the last successful write by this session.
    last_write_ms: Option<f64>,
    /// Cookies credited by the offline catch-up at start.
    pub offline_earnings: f64,
    /// Manual clicks this session.
    pub total_clicks: u64,
    running: bool,
}

impl Session {
    /// Load the saved bakery (or a fresh one) and credit offline production.
    pub fn start(store: Box<dyn SaveStore>, now_ms: f64) -> Self {
        let (mut state, restored) = match save::load(store.as_ref()) {
            Some(state) => (state, true),
            None => (CookieState::new(), false),
        };

        let offline_earnings = if restored {
            logic::apply_idle_catch_up(&mut state, now_ms)
        } else {
            0.0
        };
        state.last_saved_ms = now_ms;

        if restored {
            console::log(&format!(
                "セーブを読み込みました (オフライン収益 +{})",
                logic::format_number(offline_earnings)
            ));
        }

        Self {
            state,
            store,
            clock: ProductionClock::starting_at(STEPS_PER_SEC, now_ms),
            next_autosave_ms: now_ms + AUTOSAVE_INTERVAL_MS,
            started_ms: now_ms,
            last_frame_ms: now_ms,
            last_write_ms: None,
            offline_earnings,
            total_clicks: 0,
            running: true,
        }
    }

    /// Read-only view for the presentation layer.
    pub fn state(&self) -> &CookieState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Milliseconds of play since `start`, as of the last frame.
    pub fn play_time_ms(&self) -> f64 {
        self.last_frame_ms - self.started_ms
    }

    /// Milliseconds since this session last wrote a snapshot, as of the last
    /// frame. `None` until the first successful save.
    pub fn since_last_save_ms(&self) -> Option<f64> {
        self.last_write_ms
            .map(|written| (self.last_frame_ms - written).max(0.0))
    }

    /// Advance to `now_ms`: credit production, autosave when due.
    pub fn frame(&mut self, now_ms: f64) {
        if !self.running {
            return;
        }
        self.advance(now_ms);

        if now_ms >= self.next_autosave_ms {
            // A failed save is retried at the next interval.
            let _ = self.save(now_ms);
            self.next_autosave_ms = now_ms + AUTOSAVE_INTERVAL_MS;
        }
    }

    fn advance(&mut self, now_ms: f64) {
        self.last_frame_ms = self.last_frame_ms.max(now_ms);
        let steps = self.clock.update(now_ms);
        if steps > 0 {
            let seconds = steps as f64 * self.clock.seconds_per_step();
            logic::produce(&mut self.state, seconds);
        }
    }

    pub fn click(&mut self) {
        logic::click(&mut self.state);
        self.total_clicks += 1;
    }

    pub fn purchase_upgrade(&mut self, id: &str) -> Result<(), PurchaseError> {
        let result = logic::purchase_upgrade(&mut self.state, id);
        if let Err(e) = &result {
            console::debug(&format!("upgrade not bought: {e}"));
        }
        result
    }

    pub fn purchase_generator(&mut self, id: &str) -> Result<u64, PurchaseError> {
        let result = logic::purchase_generator(&mut self.state, id);
        if let Err(e) = &result {
            console::debug(&format!("generator not bought: {e}"));
        }
        result
    }

    /// Price of the next unit of generator `id`.
    pub fn generator_cost(&self, id: &str) -> Option<u64> {
        self.state.generator(id).map(logic::generator_cost)
    }

    /// Snapshot now. On failure the live state is untouched.
    pub fn save(&mut self, now_ms: f64) -> Result<(), SaveError> {
        match save::persist(self.store.as_ref(), &self.state, now_ms) {
            Ok(()) => {
                self.state.last_saved_ms = now_ms;
                self.last_write_ms = Some(now_ms);
                Ok(())
            }
            Err(e) => {
                console::warn(&format!("保存に失敗: {e}"));
                Err(e)
            }
        }
    }

    /// Credit production up to `now_ms`, save, then stop producing and autosaving.
    pub fn stop(&mut self, now_ms: f64) {
        if !self.running {
            return;
        }
        self.advance(now_ms);
        let _ = self.save(now_ms);
        self.running = false;
        console::log("セッションを終了しました");
    }
}
