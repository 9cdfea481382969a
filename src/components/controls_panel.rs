use crate::model::Phase;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ControlsPanelProps {
    pub phase: Phase,
    pub tower_cost: i32,
    pub enemies: usize,
    pub on_start: Callback<()>,
}

#[function_component]
pub fn ControlsPanel(props: &ControlsPanelProps) -> Html {
    let start_cb = {
        let cb = props.on_start.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let (label, disabled) = match props.phase {
        Phase::Stopped => ("Start Game", false),
        Phase::Running => ("Running", true),
        Phase::GameOver => ("Game Over", true),
    };
    html! {<div style="position:absolute; top:12px; right:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; min-width:200px; display:flex; flex-direction:column; gap:6px;">
        <button id="start-button" onclick={start_cb} {disabled}>{ label }</button>
        <div style="font-size:12px;">{ format!("Enemies on field: {}", props.enemies) }</div>
        <div style="font-size:11px; opacity:0.7;">{ format!("Click the field to build a tower ({} money)", props.tower_cost) }</div>
        <div style="font-size:11px; opacity:0.7;">{"Click a tower to select it and open upgrades"}</div>
    </div>}
}
