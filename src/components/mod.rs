pub mod app;
pub mod battle_pass_panel;
pub mod commander_portrait;
pub mod controls_panel;
pub mod marketplace_panel;
pub mod player_setup;
pub mod quest_panel;
pub mod settings_modal;
pub mod stats_panel;
