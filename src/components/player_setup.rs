use crate::model::{COMMANDERS, PlayerData};
use crate::reducer::GameAction;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct PlayerSetupProps {
    pub on_action: Callback<GameAction>,
}

/// First-run screen: pick a name and one of the level-1 commanders.
#[function_component]
pub fn PlayerSetup(props: &PlayerSetupProps) -> Html {
    let name_input = use_node_ref();
    let choice = use_state(|| COMMANDERS[0].id);

    let start_btn = {
        let cb = props.on_action.clone();
        let input = name_input.clone();
        let choice = choice.clone();
        Callback::from(move |_| {
            let name = input
                .cast::<HtmlInputElement>()
                .map(|el| el.value())
                .unwrap_or_default();
            cb.emit(GameAction::InitPlayer(PlayerData::new(name.trim(), *choice)));
        })
    };

    let cards = COMMANDERS.iter().map(|c| {
        let locked = c.unlock_level > 1;
        let selected = *choice == c.id;
        let onclick = {
            let choice = choice.clone();
            let id = c.id;
            Callback::from(move |_| choice.set(id))
        };
        let border = if selected { "#58a6ff" } else { "#30363d" };
        html! {
            <button {onclick} disabled={locked} style={format!("display:flex; flex-direction:column; gap:2px; padding:8px; border:2px solid {border}; opacity:{};", if locked { 0.4 } else { 1.0 })}>
                <strong>{ c.name }</strong>
                <span style="font-size:11px;">{ c.title }</span>
                { if locked { html!{ <span style="font-size:11px;">{ format!("Unlocks at level {}", c.unlock_level) }</span> } } else { html!{} } }
            </button>
        }
    });

    html! {
        <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(0,0,0,0.87); border:2px solid #30363d; padding:28px 36px; border-radius:14px; max-width:520px; width:90%; box-shadow:0 0 0 1px #1a1f24, 0 6px 18px rgba(0,0,0,0.6); font-size:14px; line-height:1.4; color:#e6edf3;">
            <h2 style="margin:0 0 12px 0; font-size:22px; color:#58a6ff; text-align:center;">{"Forgenite Frenzy"}</h2>
            <p style="margin:4px 0 10px 0; text-align:center; opacity:0.85;">{"Tap your commander, build a drone fleet, climb the leagues."}</p>
            <input ref={name_input} type="text" placeholder="Commander name" style="width:100%; margin-bottom:12px;" />
            <div style="display:grid; grid-template-columns:1fr 1fr; gap:8px;">
                { for cards }
            </div>
            <div style="display:flex; gap:12px; justify-content:center; margin-top:12px;">
                <button onclick={start_btn}>{"Start"}</button>
            </div>
        </div>
    }
}
