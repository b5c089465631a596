//! The game engine: single owner of the state.
//!
//! [`GameEngine`] wraps the pure reducer with the effects it must not
//! perform itself: reading the clock, drawing random numbers and writing the
//! save slot. Nothing escapes `dispatch`; rejections and storage failures are
//! logged and the current state is kept.

use std::rc::Rc;

use log::{debug, error, info, warn};

use crate::clock::Clock;
use crate::config::GameConfig;
use crate::model::GameState;
use crate::persistence::{self, SaveSlot};
use crate::random::RandomSource;
use crate::reducer::{self, Context, GameAction, Rejection};
use crate::session::Scheduler;

pub struct GameEngine {
    state: Rc<GameState>,
    config: GameConfig,
    rng: Box<dyn RandomSource>,
    clock: Box<dyn Clock>,
    slot: Box<dyn SaveSlot>,
    scheduler: Scheduler,
}

impl GameEngine {
    pub fn new(
        config: GameConfig,
        rng: Box<dyn RandomSource>,
        clock: Box<dyn Clock>,
        slot: Box<dyn SaveSlot>,
    ) -> Self {
        let state = Rc::new(GameState::initial(config.battle_pass_xp_step));
        Self { state, config, rng, clock, slot, scheduler: Scheduler::default() }
    }

    /// Read-only snapshot; later dispatches never mutate it.
    pub fn state(&self) -> Rc<GameState> {
        Rc::clone(&self.state)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn dispatch(&mut self, action: GameAction) {
        let persist = matches!(action, GameAction::SaveGame);
        let now_ms = self.clock.now_ms();
        let mut cx = Context { config: &self.config, rng: self.rng.as_mut(), now_ms };
        match reducer::try_reduce(&self.state, action, &mut cx) {
            Ok(next) => {
                self.state = Rc::new(next);
                if persist {
                    self.persist();
                }
            }
            Err(Rejection::MalformedSnapshot(e)) => error!("ignoring saved game: {e}"),
            Err(r) => debug!("action rejected: {r}"),
        }
    }

    fn persist(&mut self) {
        let written = persistence::encode_snapshot(&self.state).and_then(|raw| self.slot.write(&raw));
        match written {
            Ok(()) => debug!("game saved at {}", self.state.last_save),
            Err(e) => warn!("save failed, continuing: {e}"),
        }
    }

    /// Session-start load: replays the persisted snapshot, if any.
    pub fn restore(&mut self) {
        match self.slot.read() {
            Ok(Some(raw)) => {
                info!("restoring saved game");
                self.dispatch(GameAction::LoadGame(raw));
            }
            Ok(None) => info!("no saved game"),
            Err(e) => warn!("could not read saved game: {e}"),
        }
    }

    /// Runs whatever the scheduler says is due for this second.
    pub fn tick_second(&mut self) {
        let now_ms = self.clock.now_ms();
        let due = self.scheduler.on_second(&self.state, &self.config, now_ms);
        for action in due {
            self.dispatch(action);
        }
    }

    /// Removes the persisted snapshot. The in-memory state is untouched.
    pub fn wipe_save(&mut self) {
        match self.slot.clear() {
            Ok(()) => info!("saved game wiped"),
            Err(e) => warn!("could not wipe saved game: {e}"),
        }
    }
}
