//! Recurring session effects: drone income, autosave and quest rollover.
//!
//! [`Scheduler`] decides what is due on each elapsed second and is plain
//! data, so it is tested natively. [`SessionTimers`] owns the single browser
//! interval that drives it; dropping it cancels everything at once.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::model::GameState;
use crate::reducer::GameAction;

#[derive(Debug, Default, Clone)]
pub struct Scheduler {
    elapsed_secs: u64,
}

impl Scheduler {
    #[cfg(test)]
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Advances one second and returns the actions due now. An inactive game
    /// (or one without a player) restarts the count.
    pub fn on_second(&mut self, state: &GameState, config: &GameConfig, now_ms: f64) -> Vec<GameAction> {
        if !state.is_game_active || state.player.is_none() {
            self.elapsed_secs = 0;
            return Vec::new();
        }
        self.elapsed_secs += 1;
        let mut due = Vec::new();
        if state.drones_count > 0 && self.elapsed_secs % config.income_interval_secs == 0 {
            due.push(GameAction::AddPoints(
                state.drones_count as f64 * config.drone_income,
            ));
        }
        if now_ms - state.last_quest_refresh >= config.quest_refresh_ms {
            due.push(GameAction::RefreshQuests);
        }
        if self.elapsed_secs % config.autosave_interval_secs == 0 {
            due.push(GameAction::SaveGame);
        }
        due
    }
}

/// One-second browser interval bound to the session. Cleared on drop.
pub struct SessionTimers {
    id: i32,
    _tick: Closure<dyn FnMut()>,
}

impl SessionTimers {
    pub fn start(mut on_second: impl FnMut() + 'static) -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| GameError::Timer("no window".into()))?;
        let tick = Closure::wrap(Box::new(move || on_second()) as Box<dyn FnMut()>);
        let id = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref(),
                1000,
            )
            .map_err(|e| GameError::Timer(format!("{e:?}")))?;
        log::info!("session timers started");
        Ok(Self { id, _tick: tick })
    }
}

impl Drop for SessionTimers {
    fn drop(&mut self) {
        if let Some(win) = web_sys::window() {
            win.clear_interval_with_handle(self.id);
        }
        log::info!("session timers stopped");
    }
}
