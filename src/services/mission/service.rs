//! Mission Service
//!
//! The three logical calls the application makes to the generative service
//! (analysis, strategy, mission patch) behind one trait, and the
//! provider-backed implementation.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use project_launcher_core::{AnalysisData, Task};
use project_launcher_llm::{LlmProvider, LlmRequestOptions, LlmResponse, Message};

use super::{parser, prompts};
use crate::utils::error::{AppError, AppResult};

/// Manifesto plus a rebuilt task list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyUpdate {
    pub manifesto: String,
    pub tasks: Vec<Task>,
}

/// External generation calls used by the orchestrator.
#[async_trait]
pub trait MissionService: Send + Sync {
    /// Run the pre-mortem on a brief. Flags in the result are cleared and
    /// manifesto / logo are absent.
    async fn analyze_project(&self, brief: &str) -> AppResult<AnalysisData>;

    /// Write a manifesto from the selected mitigations.
    async fn generate_manifesto(
        &self,
        project_name: &str,
        mitigations: &[String],
    ) -> AppResult<String>;

    /// Write a manifesto and rebuild the task list from the selected mitigations.
    async fn update_project_strategy(
        &self,
        project_name: &str,
        mitigations: &[String],
    ) -> AppResult<StrategyUpdate>;

    /// Generate the mission patch image, returned as an image URI.
    async fn generate_mission_patch(&self, project_name: &str) -> AppResult<String>;

    /// Verify that the service is reachable with the configured credentials.
    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}

/// `MissionService` over an `LlmProvider`
pub struct LlmMissionService {
    provider: Arc<dyn LlmProvider>,
}

impl LlmMissionService {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    async fn send(
        &self,
        messages: Vec<Message>,
        system: String,
        options: LlmRequestOptions,
    ) -> AppResult<String> {
        let response: LlmResponse = self
            .provider
            .send_message(messages, Some(system), options)
            .await?;

        debug!(
            provider = self.provider.name(),
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "mission service: response received"
        );

        Ok(response.text()?.to_string())
    }
}

#[async_trait]
impl MissionService for LlmMissionService {
    /// Retries once with a repair prompt when the first response cannot be
    /// parsed or fails validation.
    async fn analyze_project(&self, brief: &str) -> AppResult<AnalysisData> {
        let system = prompts::analysis_system_prompt();
        let messages = vec![Message::user(prompts::analysis_user_message(brief))];

        let response_text = self
            .send(messages.clone(), system.clone(), LlmRequestOptions::json())
            .await?;

        match parser::parse_analysis(&response_text) {
            Ok(data) => Ok(data),
            Err(first_error) => {
                warn!(
                    error = %first_error,
                    preview = %response_text.chars().take(200).collect::<String>(),
                    "mission service: analysis response unusable, retrying with repair prompt"
                );

                let mut retry_messages = messages;
                retry_messages.push(Message::assistant(&response_text));
                retry_messages.push(Message::user(prompts::repair_prompt(
                    &response_text,
                    &first_error.to_string(),
                )));

                let retry_text = self
                    .send(retry_messages, system, LlmRequestOptions::json())
                    .await?;

                parser::parse_analysis(&retry_text).map_err(AppError::from)
            }
        }
    }

    async fn generate_manifesto(
        &self,
        project_name: &str,
        mitigations: &[String],
    ) -> AppResult<String> {
        let text = self
            .send(
                vec![Message::user(prompts::manifesto_user_message(
                    project_name,
                    mitigations,
                ))],
                prompts::manifesto_system_prompt(),
                LlmRequestOptions::default(),
            )
            .await?;

        Ok(parser::parse_manifesto(&text)?)
    }

    async fn update_project_strategy(
        &self,
        project_name: &str,
        mitigations: &[String],
    ) -> AppResult<StrategyUpdate> {
        let text = self
            .send(
                vec![Message::user(prompts::strategy_user_message(
                    project_name,
                    mitigations,
                ))],
                prompts::strategy_system_prompt(),
                LlmRequestOptions::json(),
            )
            .await?;

        Ok(parser::parse_strategy(&text)?)
    }

    async fn generate_mission_patch(&self, project_name: &str) -> AppResult<String> {
        if !self.provider.supports_image_generation() {
            return Err(AppError::service(format!(
                "{} cannot generate images",
                self.provider.name()
            )));
        }

        let image = self
            .provider
            .generate_image(&prompts::mission_patch_prompt(project_name))
            .await?;

        debug!(
            mime_type = %image.mime_type,
            bytes = image.data.len(),
            "mission service: patch generated"
        );

        Ok(image.data_uri())
    }

    async fn health_check(&self) -> AppResult<()> {
        self.provider.health_check().await?;
        debug!(
            provider = self.provider.name(),
            model = self.provider.model(),
            "mission service: health check passed"
        );
        Ok(())
    }
}
