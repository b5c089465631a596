//! Yew adapter over the engine.
//!
//! Components hold a `UseReducerHandle<GameStore>` and dispatch
//! [`StoreAction`]s; the engine behind it is shared, and `version` bumps only
//! when the state actually changed so idle ticks do not re-render.

use std::cell::RefCell;
use std::rc::Rc;

use yew::Reducible;

use crate::config::GameConfig;
use crate::engine::GameEngine;
use crate::model::GameState;
use crate::reducer::GameAction;

#[derive(Clone, Debug, PartialEq)]
pub enum StoreAction {
    Game(GameAction),
    SecondTick,
    Restore,
    WipeSave,
}

#[derive(Clone)]
pub struct GameStore {
    engine: Rc<RefCell<GameEngine>>,
    pub version: u64,
}

impl GameStore {
    pub fn new(engine: GameEngine) -> Self {
        Self { engine: Rc::new(RefCell::new(engine)), version: 0 }
    }

    pub fn state(&self) -> Rc<GameState> {
        self.engine.borrow().state()
    }

    pub fn config(&self) -> GameConfig {
        self.engine.borrow().config().clone()
    }
}

impl PartialEq for GameStore {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version && Rc::ptr_eq(&self.engine, &other.engine)
    }
}

impl Reducible for GameStore {
    type Action = StoreAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let changed = {
            let mut engine = self.engine.borrow_mut();
            let before = engine.state();
            match action {
                StoreAction::Game(a) => engine.dispatch(a),
                StoreAction::SecondTick => engine.tick_second(),
                StoreAction::Restore => engine.restore(),
                StoreAction::WipeSave => engine.wipe_save(),
            }
            !Rc::ptr_eq(&before, &engine.state())
        };
        if !changed {
            return self;
        }
        Rc::new(Self { engine: Rc::clone(&self.engine), version: self.version + 1 })
    }
}
