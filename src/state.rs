//! Application State
//!
//! The settings store and the mission orchestrator, shared by every command.

use std::sync::Arc;
use tokio::sync::RwLock;

use project_launcher_llm::GeminiProvider;

use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::services::mission::{
    LlmMissionService, MissionOrchestrator, MissionService, OrchestratorOptions,
};
use crate::storage::ConfigService;
use crate::utils::error::AppResult;

/// Application state
pub struct AppState {
    /// Configuration service for app settings
    config: Arc<RwLock<ConfigService>>,
    /// Generative service behind the orchestrator
    service: Arc<dyn MissionService>,
    /// Owner of the mission session
    orchestrator: Arc<MissionOrchestrator>,
}

impl AppState {
    /// Build state around an explicit mission service
    pub fn new(config: ConfigService, service: Arc<dyn MissionService>) -> Self {
        let options = OrchestratorOptions::from(config.get_config());
        Self {
            config: Arc::new(RwLock::new(config)),
            orchestrator: Arc::new(MissionOrchestrator::new(Arc::clone(&service), options)),
            service,
        }
    }

    /// Build state backed by the Gemini provider described in `config`
    pub fn from_config(config: ConfigService) -> AppResult<Self> {
        let app_config = config.get_config();
        let api_key = app_config.resolve_api_key();
        if api_key.is_none() {
            tracing::warn!(
                env = %app_config.api_key_env,
                "no API key found; generation requests will fail until one is set"
            );
        }

        let provider = GeminiProvider::new(app_config.provider_config(api_key))?;
        let service: Arc<dyn MissionService> =
            Arc::new(LlmMissionService::new(Arc::new(provider)));
        Ok(Self::new(config, service))
    }

    /// Get the current configuration
    pub async fn get_config(&self) -> AppConfig {
        self.config.read().await.get_config().clone()
    }

    /// Update the configuration.
    ///
    /// Delay and strategy mode take effect immediately; provider settings
    /// apply on the next start.
    pub async fn update_config(&self, update: SettingsUpdate) -> AppResult<AppConfig> {
        let updated = self.config.write().await.update_config(update)?;
        self.orchestrator
            .set_options(OrchestratorOptions::from(&updated))
            .await;
        Ok(updated)
    }

    pub fn service(&self) -> &Arc<dyn MissionService> {
        &self.service
    }

    pub fn orchestrator(&self) -> &Arc<MissionOrchestrator> {
        &self.orchestrator
    }
}
