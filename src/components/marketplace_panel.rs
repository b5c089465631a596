use crate::model::{ActiveTapBonus, marketplace_catalog};
use crate::reducer::GameAction;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct MarketplacePanelProps {
    pub auron: u64,
    pub active: Vec<ActiveTapBonus>,
    pub on_action: Callback<GameAction>,
}

#[function_component]
pub fn MarketplacePanel(props: &MarketplacePanelProps) -> Html {
    let items = marketplace_catalog().into_iter().map(|item| {
        let affordable = props.auron >= item.cost_auron;
        let label = format!("{} Auron", item.cost_auron);
        let name = item.name.clone();
        let description = item.description.clone();
        let onclick = {
            let cb = props.on_action.clone();
            Callback::from(move |_| cb.emit(GameAction::PurchaseBonus(item.clone())))
        };
        html! {
            <div style="display:flex; align-items:center; gap:10px; padding:8px; background:#1c2128; border:1px solid #30363d; border-radius:6px;">
                <div style="flex:1; display:flex; flex-direction:column;">
                    <strong>{ name }</strong>
                    <span style="font-size:12px; opacity:0.75;">{ description }</span>
                </div>
                <button {onclick} disabled={!affordable}>{ label }</button>
            </div>
        }
    });
    let active = props.active.iter().map(|b| {
        html! {
            <div style="font-size:12px; color:#3fb950;">
                { format!("{} x{} · {}/{} taps left", b.name, b.multiplier, b.remaining_taps, b.original_taps) }
            </div>
        }
    });

    html! {
        <div style="position:absolute; top:80px; left:50%; transform:translateX(-50%); width:min(520px, 92vw); display:flex; flex-direction:column; gap:8px;">
            <h3 style="margin:0;">{ format!("Marketplace · {} Auron", props.auron) }</h3>
            { for items }
            { if props.active.is_empty() { html!{} } else { html!{ <h4 style="margin:6px 0 0 0;">{"Active bonuses"}</h4> } } }
            { for active }
        </div>
    }
}
