use crate::model::RunStats;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct GameOverOverlayProps {
    pub show: bool,
    pub stats: RunStats,
}

#[function_component]
pub fn GameOverOverlay(props: &GameOverOverlayProps) -> Html {
    if !props.show {
        return html! {};
    }
    let stats = props.stats;
    html! {
        <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(0,0,0,0.85); border:2px solid #f85149; padding:24px 32px; border-radius:12px; text-align:center; min-width:280px;">
            <h2 style="margin:0 0 12px 0; color:#f85149;">{"Game Over"}</h2>
            <p style="margin:4px 0;">{ format!("Frames Survived: {}", stats.frames) }</p>
            <p style="margin:4px 0;">{ format!("Enemies Spawned: {}", stats.spawned) }</p>
            <p style="margin:4px 0;">{ format!("Enemies Destroyed: {}", stats.kills) }</p>
            <p style="margin:4px 0;">{ format!("Enemies Leaked: {}", stats.leaks) }</p>
            <p style="margin:12px 0 0 0; font-size:11px; opacity:0.7;">{"Reload the page to play again."}</p>
        </div>
    }
}
