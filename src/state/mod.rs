pub mod spawner;
pub mod storage;
pub mod store;

pub use spawner::Spawner;
pub use storage::load_config;
pub use store::{WorldStore, use_world_store};
