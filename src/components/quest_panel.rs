use crate::model::{Achievement, DailyQuest};
use crate::reducer::GameAction;
use crate::util::format_points;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct QuestPanelProps {
    pub quests: Vec<DailyQuest>,
    pub achievements: Vec<Achievement>,
    pub on_action: Callback<GameAction>,
}

fn reward_label(q: &DailyQuest) -> String {
    match (q.reward.points > 0.0, q.reward.auron > 0) {
        (true, true) => format!("{} pts + {} Auron", format_points(q.reward.points), q.reward.auron),
        (false, true) => format!("{} Auron", q.reward.auron),
        _ => format!("{} pts", format_points(q.reward.points)),
    }
}

#[function_component]
pub fn QuestPanel(props: &QuestPanelProps) -> Html {
    let quest_rows = props.quests.iter().map(|q| {
        let claim_cb = {
            let cb = props.on_action.clone();
            let id = q.id.clone();
            Callback::from(move |_| cb.emit(GameAction::ClaimQuestReward(id.clone())))
        };
        let pct = (q.progress / q.target * 100.0).clamp(0.0, 100.0);
        let action = if q.is_claimed {
            html! { <span style="font-size:12px; color:#3fb950;">{"Claimed"}</span> }
        } else {
            html! { <button onclick={claim_cb} disabled={!q.is_completed()}>{"Claim"}</button> }
        };
        html! {
            <div style="display:flex; flex-direction:column; gap:4px; padding:8px; background:#1c2128; border:1px solid #30363d; border-radius:6px;">
                <div style="display:flex; justify-content:space-between; gap:8px;">
                    <strong>{ q.title.clone() }</strong>
                    <span style="font-size:12px; color:#d4af37;">{ reward_label(q) }</span>
                </div>
                <div style="font-size:12px; opacity:0.75;">{ q.description.clone() }</div>
                <div style="display:flex; align-items:center; gap:8px;">
                    <div style="flex:1; height:6px; background:#30363d; border-radius:3px; overflow:hidden;">
                        <div style={format!("height:100%; width:{pct:.1}%; background:#3fb950;")}></div>
                    </div>
                    <span style="font-size:11px; font-variant-numeric:tabular-nums;">{ format!("{}/{}", q.progress, q.target) }</span>
                    { action }
                </div>
            </div>
        }
    });
    let achievement_rows = props.achievements.iter().map(|a| {
        let color = if a.unlocked { "#d4af37" } else { "#6e7681" };
        html! {
            <div style={format!("display:flex; gap:8px; font-size:12px; color:{color};")}>
                <span>{ if a.unlocked { "🏆" } else { "🔒" } }</span>
                <span style="flex:1;">{ a.title.clone() }</span>
                <span style="opacity:0.75;">{ a.description.clone() }</span>
            </div>
        }
    });

    html! {
        <div style="position:absolute; top:80px; left:50%; transform:translateX(-50%); width:min(520px, 92vw); max-height:80vh; overflow-y:auto; display:flex; flex-direction:column; gap:8px;">
            <h3 style="margin:0;">{"Daily Quests"}</h3>
            { for quest_rows }
            <h3 style="margin:8px 0 0 0;">{"Achievements"}</h3>
            { for achievement_rows }
        </div>
    }
}
