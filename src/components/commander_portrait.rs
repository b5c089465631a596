use crate::model::{COMMANDERS, commander};
use crate::reducer::GameAction;
use crate::util::format_time;
use std::collections::BTreeSet;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct CommanderPortraitProps {
    pub commander_id: String,
    pub unlocked: BTreeSet<String>,
    pub current_taps: u32,
    pub max_taps: u32,
    pub taps_available_at: f64,
    pub can_tap: bool,
    pub now_ms: f64,
    pub streak: u32,
    pub refill_cost: u64,
    pub on_action: Callback<GameAction>,
}

/// The tap target plus the allowance readout and commander switcher.
#[function_component]
pub fn CommanderPortrait(props: &CommanderPortraitProps) -> Html {
    let tap_cb = {
        let cb = props.on_action.clone();
        Callback::from(move |_| cb.emit(GameAction::Tap))
    };
    let refill_cb = {
        let cb = props.on_action.clone();
        Callback::from(move |_| cb.emit(GameAction::RefillTaps))
    };
    let (name, title) = commander(&props.commander_id)
        .map(|c| (c.name, c.title))
        .unwrap_or(("Unknown", ""));
    let waiting = !props.can_tap;

    let switcher = COMMANDERS.iter().filter(|c| props.unlocked.contains(c.id)).map(|c| {
        let onclick = {
            let cb = props.on_action.clone();
            let id = c.id.to_string();
            Callback::from(move |_| cb.emit(GameAction::SelectCommander(id.clone())))
        };
        let active = c.id == props.commander_id;
        html! { <button {onclick} disabled={active}>{ c.name }</button> }
    });

    html! {
        <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); display:flex; flex-direction:column; align-items:center; gap:12px;">
            <button onclick={tap_cb} disabled={waiting} style="width:220px; height:220px; border-radius:50%; border:3px solid #d4af37; background:radial-gradient(#2d333b, #161b22); color:#e6edf3; font-size:20px; cursor:pointer;">
                <div style="font-weight:700;">{ name }</div>
                <div style="font-size:12px; opacity:0.75;">{ title }</div>
            </button>
            <div style="font-size:13px; font-variant-numeric:tabular-nums;">
                { format!("Taps {}/{}", props.current_taps, props.max_taps) }
                { if props.streak > 1 { html!{ <span style="margin-left:10px; color:#f0883e;">{ format!("Streak x{}", props.streak) }</span> } } else { html!{} } }
            </div>
            {
                if waiting {
                    let wait = ((props.taps_available_at - props.now_ms) / 1000.0).max(0.0) as u64;
                    html! {
                        <div style="display:flex; align-items:center; gap:8px; font-size:12px;">
                            <span>{ format!("Refills in {}", format_time(wait)) }</span>
                            <button onclick={refill_cb}>{ format!("Refill now ({} Auron)", props.refill_cost) }</button>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
            <div style="display:flex; gap:6px;">{ for switcher }</div>
        </div>
    }
}
