use crate::util::format_points;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct StatsPanelProps {
    pub points: f64,
    pub points_per_second: f64,
    pub auron: u64,
    pub level: u32,
    pub rank: String,
    pub league: &'static str,
    pub experience: f64,
    pub experience_to_next: f64,
}

#[function_component]
pub fn StatsPanel(props: &StatsPanelProps) -> Html {
    let row_style = "display:flex; align-items:center; gap:8px;"; // icon | label | value
    let icon_style = "width:20px; text-align:center; flex-shrink:0;";
    let label_style = "flex:1; font-weight:500;";
    let value_style =
        "min-width:70px; text-align:right; font-variant-numeric:tabular-nums; font-weight:600;";
    let xp_pct = if props.experience_to_next > 0.0 {
        (props.experience / props.experience_to_next * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };
    html! {
        <div style="position:absolute; top:12px; left:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px 14px; min-width:230px; display:flex; flex-direction:column; gap:10px; font-size:14px;">
            <div style={row_style}>
                <span style={format!("{} color:#d4af37;", icon_style)}>{"⛏"}</span>
                <span style={format!("{} color:#d4af37;", label_style)}>{"Points"}</span>
                <span style={format!("{} color:#d4af37;", value_style)}>{ format_points(props.points) }</span>
            </div>
            <div style={row_style}>
                <span style={format!("{} color:#3fb950;", icon_style)}>{"⚙"}</span>
                <span style={format!("{} color:#3fb950;", label_style)}>{"Per second"}</span>
                <span style={format!("{} color:#3fb950;", value_style)}>{ format_points(props.points_per_second) }</span>
            </div>
            <div style={row_style}>
                <span style={format!("{} color:#a371f7;", icon_style)}>{"◆"}</span>
                <span style={format!("{} color:#a371f7;", label_style)}>{"Auron"}</span>
                <span style={format!("{} color:#a371f7;", value_style)}>{ props.auron }</span>
            </div>
            <div style={row_style}>
                <span style={format!("{} color:#58a6ff;", icon_style)}>{"★"}</span>
                <span style={format!("{} color:#58a6ff;", label_style)}>{ format!("{} · Lv {}", props.rank, props.level) }</span>
                <span style={format!("{} color:#58a6ff;", value_style)}>{ props.league }</span>
            </div>
            <div style="height:6px; background:#30363d; border-radius:3px; overflow:hidden;">
                <div style={format!("height:100%; width:{xp_pct:.1}%; background:#58a6ff;")}></div>
            </div>
        </div>
    }
}
