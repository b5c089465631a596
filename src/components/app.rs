use super::{
    battle_pass_panel::BattlePassPanel, commander_portrait::CommanderPortrait,
    controls_panel::ControlsPanel, marketplace_panel::MarketplacePanel,
    player_setup::PlayerSetup, quest_panel::QuestPanel, settings_modal::SettingsModal,
    stats_panel::StatsPanel,
};
use crate::clock::JsClock;
use crate::config::{CONFIG_KEY, GameConfig};
use crate::engine::GameEngine;
use crate::persistence::{LocalStorageSlot, MemorySlot, SaveSlot};
use crate::random::SeededRandom;
use crate::reducer::GameAction;
use crate::session::SessionTimers;
use crate::store::{GameStore, StoreAction};
use yew::prelude::*;

#[derive(PartialEq, Clone, Copy)]
pub enum View {
    Base,
    Quests,
    BattlePass,
    Market,
}

fn load_config() -> GameConfig {
    match LocalStorageSlot::read_key(CONFIG_KEY) {
        Ok(Some(raw)) => GameConfig::from_json(&raw).unwrap_or_else(|e| {
            log::warn!("ignoring config override: {e}");
            GameConfig::default()
        }),
        Ok(None) => GameConfig::default(),
        Err(e) => {
            log::warn!("config override unreadable: {e}");
            GameConfig::default()
        }
    }
}

fn browser_engine() -> GameEngine {
    let config = load_config();
    let slot: Box<dyn SaveSlot> = if LocalStorageSlot::is_available() {
        Box::new(LocalStorageSlot::new(config.save_key.clone()))
    } else {
        log::warn!("localStorage unavailable; progress will not survive a reload");
        Box::new(MemorySlot::new())
    };
    let seed = js_sys::Date::now() as u64;
    GameEngine::new(config, Box::new(SeededRandom::from_seed(seed)), Box::new(JsClock), slot)
}

#[function_component(App)]
pub fn app() -> Html {
    let store = use_reducer(|| GameStore::new(browser_engine()));
    let view = use_state(|| View::Base);
    let show_settings = use_state(|| false);
    // Wall clock for countdowns; bumped every tick so the view re-renders
    // even when the state itself did not change.
    let now_ms = use_state(js_sys::Date::now);
    let state = store.state();

    // Load persisted game once per session
    {
        let store = store.clone();
        use_effect_with((), move |_| {
            store.dispatch(StoreAction::Restore);
            || ()
        });
    }
    // Income/autosave interval lives exactly as long as the game is active
    {
        let store = store.clone();
        let now_ms = now_ms.clone();
        use_effect_with(state.is_game_active, move |active| {
            let timers = if *active {
                let handle = store.clone();
                let on_second = move || {
                    handle.dispatch(StoreAction::SecondTick);
                    now_ms.set(js_sys::Date::now());
                };
                match SessionTimers::start(on_second) {
                    Ok(t) => Some(t),
                    Err(e) => {
                        log::warn!("{e}");
                        None
                    }
                }
            } else {
                None
            };
            move || drop(timers)
        });
    }

    let on_action = {
        let store = store.clone();
        Callback::from(move |a: GameAction| store.dispatch(StoreAction::Game(a)))
    };
    let on_navigate = {
        let view = view.clone();
        Callback::from(move |v: View| view.set(v))
    };
    let on_open_settings = {
        let show_settings = show_settings.clone();
        Callback::from(move |_| show_settings.set(true))
    };
    let on_close_settings = {
        let show_settings = show_settings.clone();
        Callback::from(move |_| show_settings.set(false))
    };
    let on_hard_reset = {
        let store = store.clone();
        let show_settings = show_settings.clone();
        Callback::from(move |_| {
            store.dispatch(StoreAction::WipeSave);
            store.dispatch(StoreAction::Game(GameAction::ResetGame));
            show_settings.set(false);
        })
    };

    let Some(player) = state.player.clone() else {
        return html! { <PlayerSetup on_action={on_action} /> };
    };

    let config = store.config();
    let now_ms = *now_ms;
    let content = match *view {
        View::Base => html! { <CommanderPortrait
            commander_id={player.commander_id.clone()}
            unlocked={player.unlocked_commanders.clone()}
            current_taps={player.current_taps}
            max_taps={player.max_taps}
            taps_available_at={player.taps_available_at}
            can_tap={player.can_tap(now_ms)}
            now_ms={now_ms}
            streak={state.current_streak}
            refill_cost={config.tap_refill_cost_auron}
            on_action={on_action.clone()}
        /> },
        View::Quests => html! { <QuestPanel
            quests={state.daily_quests.clone()}
            achievements={state.achievements.clone()}
            on_action={on_action.clone()}
        /> },
        View::BattlePass => html! { <BattlePassPanel
            progress={state.battle_pass.clone()}
            auron={player.auron}
            premium_cost={config.premium_pass_cost_auron}
            on_action={on_action.clone()}
        /> },
        View::Market => html! { <MarketplacePanel
            auron={player.auron}
            active={player.active_tap_bonuses.clone()}
            on_action={on_action.clone()}
        /> },
    };

    html! {
        <div style="position:relative; width:100vw; height:100vh; background:#0e1116; color:#e6edf3; overflow:hidden;">
            <StatsPanel
                points={state.points}
                points_per_second={state.points_per_second}
                auron={player.auron}
                level={player.level}
                rank={player.rank_title.clone()}
                league={player.league.name()}
                experience={player.experience}
                experience_to_next={player.experience_to_next}
            />
            <ControlsPanel
                view={*view}
                claimable={state.claimable_quests()}
                drones={state.drones_count}
                on_navigate={on_navigate}
                on_action={on_action.clone()}
                on_open_settings={on_open_settings}
            />
            { content }
            <SettingsModal
                show={*show_settings}
                last_save={state.last_save}
                now_ms={now_ms}
                wallet_address={player.wallet_address.clone()}
                on_close={on_close_settings}
                on_action={on_action}
                on_hard_reset={on_hard_reset}
            />
        </div>
    }
}
