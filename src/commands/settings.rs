//! Settings Commands
//!
//! Commands for reading and updating application settings.

use crate::models::response::CommandResponse;
use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::state::AppState;

/// Get current application settings
pub async fn get_settings(state: &AppState) -> CommandResponse<AppConfig> {
    CommandResponse::ok(state.get_config().await)
}

/// Check that the generative service accepts the configured key and model
pub async fn check_service(state: &AppState) -> CommandResponse<String> {
    let model = state.get_config().await.model;
    state
        .service()
        .health_check()
        .await
        .map(|_| format!("Generative service reachable with model {}", model))
        .into()
}

/// Update application settings with a partial update
pub async fn update_settings(
    state: &AppState,
    update: SettingsUpdate,
) -> CommandResponse<AppConfig> {
    state.update_config(update).await.into()
}
