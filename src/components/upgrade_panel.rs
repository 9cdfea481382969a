use std::rc::Rc;

use crate::config::{GameConfig, UpgradeStat};
use crate::model::Tower;
use yew::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    pub range: f64,
    pub damage: i32,
    pub fire_rate: u32,
}

impl From<&Tower> for TowerStats {
    fn from(t: &Tower) -> Self {
        Self {
            range: t.range,
            damage: t.damage,
            fire_rate: t.fire_rate,
        }
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct UpgradePanelProps {
    pub tower: Option<TowerStats>,
    pub money: i32,
    pub config: Rc<GameConfig>,
    pub on_upgrade: Callback<UpgradeStat>,
}

#[function_component]
pub fn UpgradePanel(props: &UpgradePanelProps) -> Html {
    let Some(stats) = props.tower else {
        return html! {};
    };
    let buttons = UpgradeStat::ALL.iter().map(|&stat| {
        let spec = props.config.upgrade(stat);
        let at_floor = stat == UpgradeStat::FireRate && stats.fire_rate <= props.config.min_fire_rate;
        let disabled = props.money < spec.cost || at_floor;
        let sign = if stat == UpgradeStat::FireRate { '-' } else { '+' };
        let cb = props.on_upgrade.clone();
        let onclick = Callback::from(move |_| cb.emit(stat));
        html! {
            <button {onclick} {disabled}>
                { format!("{} {}{} ({} money)", stat.label(), sign, spec.step, spec.cost) }
            </button>
        }
    });
    html! {<div id="upgrade-panel" style="position:absolute; left:50%; bottom:28px; transform:translateX(-50%); background:rgba(22,27,34,0.92); border:1px solid #30363d; border-radius:10px; padding:10px 14px; display:flex; flex-direction:column; gap:6px; min-width:240px; text-align:center;">
        <div id="defender-stats" style="font-size:13px; line-height:1.4;">
            <div>{ format!("Range: {}", stats.range) }</div>
            <div>{ format!("Damage: {}", stats.damage) }</div>
            <div>{ format!("Fire Rate: {}", stats.fire_rate) }</div>
        </div>
        <div style="display:flex; gap:6px; justify-content:center;">
            { for buttons }
        </div>
    </div> }
}
