use crate::model::{BattlePassProgress, BattlePassReward, RewardTrack, battle_pass_rewards};
use crate::reducer::GameAction;
use crate::util::format_points;
use yew::prelude::*;

const TIER_WINDOW: u32 = 12;

#[derive(Properties, PartialEq, Clone)]
pub struct BattlePassPanelProps {
    pub progress: BattlePassProgress,
    pub auron: u64,
    pub premium_cost: u64,
    pub on_action: Callback<GameAction>,
}

fn describe(rewards: &[BattlePassReward]) -> String {
    rewards
        .iter()
        .map(|r| match r {
            BattlePassReward::Points(p) => format!("{} pts", format_points(*p)),
            BattlePassReward::Auron(a) => format!("{a} Auron"),
            BattlePassReward::Title(t) => format!("title \"{t}\""),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[function_component]
pub fn BattlePassPanel(props: &BattlePassPanelProps) -> Html {
    let bp = &props.progress;
    let unlock_cb = {
        let cb = props.on_action.clone();
        Callback::from(move |_| cb.emit(GameAction::UnlockPremiumPass))
    };
    let tiers = bp.visible_tiers(TIER_WINDOW).rev().map(|level| {
        let cell = |track: RewardTrack| {
            let claimed = bp.rewards_claimed.contains(&track.reward_id(level));
            let locked = level > bp.level || (track == RewardTrack::Premium && !bp.premium_track_unlocked);
            let onclick = {
                let cb = props.on_action.clone();
                Callback::from(move |_| cb.emit(GameAction::ClaimBattlePassReward { level, track }))
            };
            let label = if claimed { "Claimed" } else { "Claim" };
            html! {
                <div style="flex:1; display:flex; flex-direction:column; gap:4px; font-size:12px;">
                    <span>{ describe(&battle_pass_rewards(level, track)) }</span>
                    <button {onclick} disabled={claimed || locked}>{ label }</button>
                </div>
            }
        };
        html! {
            <div style="display:flex; gap:10px; align-items:center; padding:6px 8px; background:#1c2128; border:1px solid #30363d; border-radius:6px;">
                <strong style="width:48px;">{ format!("T{level}") }</strong>
                { cell(RewardTrack::Free) }
                { cell(RewardTrack::Premium) }
            </div>
        }
    });

    html! {
        <div style="position:absolute; top:80px; left:50%; transform:translateX(-50%); width:min(520px, 92vw); max-height:80vh; overflow-y:auto; display:flex; flex-direction:column; gap:8px;">
            <div style="display:flex; justify-content:space-between; align-items:center;">
                <h3 style="margin:0;">{ format!("Battle Pass · Tier {}", bp.level) }</h3>
                <span style="font-size:12px; font-variant-numeric:tabular-nums;">
                    { format!("{} / {} XP", format_points(bp.experience), format_points(bp.experience_to_next)) }
                </span>
            </div>
            {
                if bp.premium_track_unlocked {
                    html! { <div style="font-size:12px; color:#a371f7;">{"Premium track unlocked"}</div> }
                } else {
                    html! {
                        <button onclick={unlock_cb} disabled={props.auron < props.premium_cost}>
                            { format!("Unlock Premium ({} Auron)", props.premium_cost) }
                        </button>
                    }
                }
            }
            { for tiers }
        </div>
    }
}
