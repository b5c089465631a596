use super::app::View;
use crate::reducer::GameAction;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ControlsPanelProps {
    pub view: View,
    pub claimable: usize,
    pub drones: u32,
    pub on_navigate: Callback<View>,
    pub on_action: Callback<GameAction>,
    pub on_open_settings: Callback<()>,
}

#[function_component]
pub fn ControlsPanel(props: &ControlsPanelProps) -> Html {
    let nav = |target: View, label: String| {
        let cb = props.on_navigate.clone();
        let onclick = Callback::from(move |_| cb.emit(target));
        let style = if props.view == target { "border-color:#58a6ff;" } else { "" };
        html! { <button {onclick} {style}>{ label }</button> }
    };
    let drone_cb = {
        let cb = props.on_action.clone();
        Callback::from(move |_| cb.emit(GameAction::BuyDrone))
    };
    let settings_cb = {
        let cb = props.on_open_settings.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let quests_label = if props.claimable > 0 {
        format!("Quests ({})", props.claimable)
    } else {
        "Quests".to_string()
    };
    html! {<div style="position:absolute; top:12px; right:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; min-width:200px; display:flex; flex-direction:column; gap:6px;">
        { nav(View::Base, "Base".to_string()) }
        { nav(View::Quests, quests_label) }
        { nav(View::BattlePass, "Battle Pass".to_string()) }
        { nav(View::Market, "Marketplace".to_string()) }
        <button onclick={drone_cb}>{ format!("Buy M.U.L.E. Drone ({})", props.drones) }</button>
        <button onclick={settings_cb}>{"Settings"}</button>
    </div>}
}
