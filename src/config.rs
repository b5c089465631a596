//! Gameplay tunables.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// localStorage key holding an optional JSON override for [`GameConfig`].
pub const CONFIG_KEY: &str = "forgenite_frenzy_config";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub base_tap_points: f64,
    /// Probability of a critical hit per tap, in `[0, 1]`.
    pub critical_chance: f64,
    pub critical_multiplier: f64,
    /// Streak multiplier gained per consecutive critical.
    pub streak_step: f64,
    pub streak_cap: f64,
    /// Points per drone per income tick.
    pub drone_income: f64,
    pub income_interval_secs: u64,
    pub autosave_interval_secs: u64,
    pub save_key: String,
    pub max_taps: u32,
    pub tap_refill_ms: f64,
    pub tap_refill_cost_auron: u64,
    pub quest_refresh_ms: f64,
    pub battle_pass_xp_step: f64,
    pub premium_pass_cost_auron: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_tap_points: 1.0,
            critical_chance: 0.2,
            critical_multiplier: 2.0,
            streak_step: 0.1,
            streak_cap: 3.0,
            drone_income: 0.5,
            income_interval_secs: 1,
            autosave_interval_secs: 30,
            save_key: "forgenite_frenzy_save".to_string(),
            max_taps: 500,
            tap_refill_ms: 60.0 * 60.0 * 1000.0,
            tap_refill_cost_auron: 10,
            quest_refresh_ms: 24.0 * 60.0 * 60.0 * 1000.0,
            battle_pass_xp_step: 1000.0,
            premium_pass_cost_auron: 100,
        }
    }
}

impl GameConfig {
    /// Parses an override; missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        let cfg: GameConfig =
            serde_json::from_str(raw).map_err(|e| GameError::InvalidConfig(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.critical_chance) {
            return Err(GameError::InvalidConfig(format!(
                "critical_chance {} outside [0, 1]",
                self.critical_chance
            )));
        }
        if self.streak_cap < 1.0 {
            return Err(GameError::InvalidConfig(format!(
                "streak_cap {} below 1",
                self.streak_cap
            )));
        }
        if self.income_interval_secs == 0 || self.autosave_interval_secs == 0 {
            return Err(GameError::InvalidConfig("intervals must be positive".into()));
        }
        if self.save_key.is_empty() {
            return Err(GameError::InvalidConfig("save_key is empty".into()));
        }
        if self.battle_pass_xp_step <= 0.0 {
            return Err(GameError::InvalidConfig(
                "battle_pass_xp_step must be positive".into(),
            ));
        }
        Ok(())
    }
}
