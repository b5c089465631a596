//! Snapshot persistence: one JSON blob under one key.
//!
//! Legacy camelCase field names from older saves are mapped onto the
//! canonical snake_case fields with `#[serde(alias)]` in `model`; this module
//! is the only place snapshots are decoded.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{GameError, Result};
use crate::model::GameState;

/// A single key/value slot holding the latest snapshot.
pub trait SaveSlot {
    fn read(&self) -> Result<Option<String>>;
    fn write(&mut self, raw: &str) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

/// JSON writes NaN and infinities as `null`, which would never load back, so
/// such a state is refused and the previous snapshot stays in place.
pub fn encode_snapshot(state: &GameState) -> Result<String> {
    if let Some(field) = state.non_finite_field() {
        return Err(GameError::NonFinite(field));
    }
    serde_json::to_string(state).map_err(GameError::Encode)
}

pub fn decode_snapshot(raw: &str) -> Result<GameState> {
    let mut state: GameState = serde_json::from_str(raw).map_err(GameError::Decode)?;
    if let Some(p) = state.player.as_mut() {
        p.current_taps = p.current_taps.min(p.max_taps);
    }
    Ok(state)
}

fn local_storage() -> Result<web_sys::Storage> {
    web_sys::window()
        .and_then(|win| win.local_storage().ok().flatten())
        .ok_or(GameError::StorageUnavailable)
}

/// Browser `localStorage` slot.
#[derive(Debug, Clone)]
pub struct LocalStorageSlot {
    key: String,
}

impl LocalStorageSlot {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Reads an arbitrary key, used for the optional config override.
    pub fn read_key(key: &str) -> Result<Option<String>> {
        local_storage()?
            .get_item(key)
            .map_err(|e| GameError::StorageRead(format!("{e:?}")))
    }

    pub fn is_available() -> bool {
        local_storage().is_ok()
    }
}

impl SaveSlot for LocalStorageSlot {
    fn read(&self) -> Result<Option<String>> {
        Self::read_key(&self.key)
    }

    fn write(&mut self, raw: &str) -> Result<()> {
        local_storage()?
            .set_item(&self.key, raw)
            .map_err(|e| GameError::StorageWrite(format!("{e:?}")))
    }

    fn clear(&mut self) -> Result<()> {
        local_storage()?
            .remove_item(&self.key)
            .map_err(|e| GameError::StorageWrite(format!("{e:?}")))
    }
}

/// In-memory slot. Clones share the same cell, so a handle kept outside the
/// engine sees what the engine wrote.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    data: Rc<RefCell<Option<String>>>,
    fail_writes: bool,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot whose writes always fail, for exercising the error path.
    #[cfg(test)]
    pub fn failing() -> Self {
        Self { fail_writes: true, ..Self::default() }
    }

    #[cfg(test)]
    pub fn contents(&self) -> Option<String> {
        self.data.borrow().clone()
    }

    #[cfg(test)]
    pub fn put(&self, raw: &str) {
        *self.data.borrow_mut() = Some(raw.to_string());
    }
}

impl SaveSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.data.borrow().clone())
    }

    fn write(&mut self, raw: &str) -> Result<()> {
        if self.fail_writes {
            return Err(GameError::StorageWrite("quota exceeded".into()));
        }
        *self.data.borrow_mut() = Some(raw.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        *self.data.borrow_mut() = None;
        Ok(())
    }
}
