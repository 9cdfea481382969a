pub mod app;
pub mod controls_panel;
pub mod game_over_overlay;
pub mod run_view;
pub mod stats_panel;
pub mod upgrade_panel;
