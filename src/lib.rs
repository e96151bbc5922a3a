//! Project Launcher
//!
//! Turns a free-text mission brief into a pre-mortem (risks and
//! mitigations), an atomized task list, a strategy manifesto and a mission
//! patch image, using a generative language service. It includes:
//! - Command functions for the CLI
//! - The session reducer and analysis orchestrator
//! - Config storage
//! - Terminal views

pub mod cli;
pub mod commands;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;
pub mod views;

pub use commands::{
    // Mission commands
    analyze_mission, generate_manifesto, generate_mission_patch, get_mission, get_mission_stats,
    render_manifesto, reset_mission, select_tab, toggle_risk, toggle_task,
    // Settings commands
    check_service, get_settings, update_settings,
};
pub use models::response::*;
pub use models::session::{Session, SessionAction, TabState, ViewState};
pub use models::settings::{AppConfig, SettingsUpdate, StrategyMode};
pub use services::mission::{MissionOrchestrator, MissionService, OrchestratorOptions};
pub use state::AppState;
