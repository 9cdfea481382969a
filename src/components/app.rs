use super::run_view::RunView;
use crate::state::{load_config, use_world_store};
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    let world = use_world_store(load_config);
    html! {
        <div id="root">
            <RunView world={world} />
        </div>
    }
}
