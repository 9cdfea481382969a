// Browser-persisted settings.
use crate::config::GameConfig;

pub const CONFIG_KEY: &str = "td_config";

/// Reads the optional JSON override from localStorage. Anything missing or
/// unparsable falls back to the built-in defaults.
pub fn load_config() -> GameConfig {
    let raw = web_sys::window()
        .and_then(|win| win.local_storage().ok().flatten())
        .and_then(|store| store.get_item(CONFIG_KEY).ok().flatten());
    match raw {
        Some(raw) => parse_or_default(&raw),
        None => GameConfig::default(),
    }
}

fn parse_or_default(raw: &str) -> GameConfig {
    match GameConfig::from_json(raw) {
        Ok(cfg) => {
            tracing::info!("using config override from localStorage");
            cfg
        }
        Err(err) => {
            tracing::warn!(%err, key = CONFIG_KEY, "ignoring invalid config override");
            GameConfig::default()
        }
    }
}
