use crate::reducer::GameAction;
use crate::util::format_time;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct SettingsModalProps {
    pub show: bool,
    pub last_save: f64,
    pub now_ms: f64,
    pub wallet_address: Option<String>,
    pub on_close: Callback<()>,
    pub on_action: Callback<GameAction>,
    pub on_hard_reset: Callback<()>,
}

fn confirmed(message: &str) -> bool {
    match web_sys::window() {
        Some(win) => win.confirm_with_message(message).unwrap_or(false),
        None => true,
    }
}

#[function_component]
pub fn SettingsModal(props: &SettingsModalProps) -> Html {
    let wallet_input = use_node_ref();
    if !props.show {
        return html! {};
    }

    let close_cb = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let save_cb = {
        let cb = props.on_action.clone();
        Callback::from(move |_| cb.emit(GameAction::SaveGame))
    };
    let connect_cb = {
        let cb = props.on_action.clone();
        let input = wallet_input.clone();
        Callback::from(move |_| {
            if let Some(el) = input.cast::<HtmlInputElement>() {
                cb.emit(GameAction::ConnectWallet(el.value()));
            }
        })
    };
    let disconnect_cb = {
        let cb = props.on_action.clone();
        Callback::from(move |_| cb.emit(GameAction::DisconnectWallet))
    };
    let reset_cb = {
        let cb = props.on_action.clone();
        Callback::from(move |_| {
            if confirmed("Start a new game? Your last save stays on this device until it is overwritten.") {
                cb.emit(GameAction::ResetGame);
            }
        })
    };
    let hard_reset_cb = {
        let cb = props.on_hard_reset.clone();
        Callback::from(move |_| {
            if confirmed("This will WIPE all saved progress and start fresh. Are you sure?") {
                cb.emit(());
            }
        })
    };

    let save_label = if props.last_save > 0.0 {
        let ago = ((props.now_ms - props.last_save) / 1000.0).max(0.0) as u64;
        format!("Last saved {} ago", format_time(ago))
    } else {
        "Not saved yet".to_string()
    };

    html! {<div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.55); z-index:50;">
        <div style="background:#161b22; border:1px solid #30363d; border-radius:12px; padding:16px 20px; min-width:340px; max-width:480px; display:flex; flex-direction:column; gap:14px;">
            <div style="display:flex; justify-content:space-between; align-items:center;">
                <h3 style="margin:0; font-size:18px;">{"Settings"}</h3>
                <button onclick={close_cb.clone()} style="padding:4px 8px;">{"Close"}</button>
            </div>
            <div style="display:flex; align-items:center; gap:8px;">
                <button onclick={save_cb}>{"Save Now"}</button>
                <span style="font-size:12px; opacity:0.7;">{ save_label }</span>
            </div>
            {
                match &props.wallet_address {
                    Some(addr) => html! {
                        <div style="display:flex; align-items:center; gap:8px;">
                            <span style="flex:1; font-size:12px; overflow:hidden; text-overflow:ellipsis;">{ addr.clone() }</span>
                            <button onclick={disconnect_cb}>{"Disconnect Wallet"}</button>
                        </div>
                    },
                    None => html! {
                        <div style="display:flex; align-items:center; gap:8px;">
                            <input ref={wallet_input} type="text" placeholder="Wallet address" style="flex:1;" />
                            <button onclick={connect_cb}>{"Connect"}</button>
                        </div>
                    },
                }
            }
            <div style="display:flex; gap:8px; flex-wrap:wrap;">
                <button onclick={reset_cb} style="flex:1;">{"New Game"}</button>
                <button onclick={hard_reset_cb} style="background:#f85149; border:1px solid #b62324; color:#fff; flex:1;">{"Hard Reset (Wipe Save)"}</button>
                <button onclick={close_cb} style="flex:0 0 auto;">{"Done"}</button>
            </div>
            <div style="font-size:11px; line-height:1.4; opacity:0.7;">{"Hard Reset also removes the saved game from this browser."}</div>
        </div>
    </div>}
}
