//! Analysis Orchestrator
//!
//! Drives the session through the mission service. The session lives behind
//! a single `RwLock`; every change is a call to `reduce` under the write
//! lock, and the lock is released before any service call is awaited.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::models::session::{Session, SessionAction, TabState, ViewState};
use crate::models::settings::{AppConfig, StrategyMode};
use crate::services::mission::service::MissionService;
use crate::services::session::reduce;
use crate::utils::error::{AppError, AppResult};

/// Runtime knobs taken from the app configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorOptions {
    /// Minimum time an analysis keeps the processing view up
    pub min_analysis_delay: Duration,
    pub strategy_mode: StrategyMode,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            min_analysis_delay: Duration::from_millis(2000),
            strategy_mode: StrategyMode::Manifesto,
        }
    }
}

impl From<&AppConfig> for OrchestratorOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            min_analysis_delay: Duration::from_millis(config.min_analysis_delay_ms),
            strategy_mode: config.strategy_mode,
        }
    }
}

/// Owner of the session state
pub struct MissionOrchestrator {
    service: Arc<dyn MissionService>,
    session: RwLock<Session>,
    options: RwLock<OrchestratorOptions>,
}

impl MissionOrchestrator {
    pub fn new(service: Arc<dyn MissionService>, options: OrchestratorOptions) -> Self {
        Self {
            service,
            session: RwLock::new(Session::default()),
            options: RwLock::new(options),
        }
    }

    /// Current session
    pub async fn snapshot(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn options(&self) -> OrchestratorOptions {
        *self.options.read().await
    }

    /// Apply new options; running operations keep the ones they started with.
    pub async fn set_options(&self, options: OrchestratorOptions) {
        *self.options.write().await = options;
    }

    async fn dispatch(&self, action: SessionAction) -> Session {
        let mut session = self.session.write().await;
        *session = reduce(&session, action);
        session.clone()
    }

    /// Analyze a brief.
    ///
    /// Completes no earlier than the configured floor, whatever the service
    /// latency. A service failure is recorded on the session (back to the
    /// input view with an error) and the previous data is kept; the returned
    /// session shows the outcome either way.
    pub async fn analyze(&self, brief: &str) -> AppResult<Session> {
        let brief = brief.trim();
        if brief.is_empty() {
            return Err(AppError::validation("Mission brief cannot be empty"));
        }

        let epoch = {
            let mut session = self.session.write().await;
            match session.view {
                ViewState::Processing => {
                    return Err(AppError::validation("An analysis is already in progress"));
                }
                ViewState::Results => {
                    return Err(AppError::validation(
                        "Reset the current mission before starting a new analysis",
                    ));
                }
                ViewState::Input => {}
            }
            *session = reduce(&session, SessionAction::AnalysisStarted);
            session.epoch
        };

        let floor = self.options().await.min_analysis_delay;
        info!(brief_len = brief.len(), floor_ms = floor.as_millis() as u64, "analysis started");

        let (result, _) = tokio::join!(
            self.service.analyze_project(brief),
            tokio::time::sleep(floor)
        );

        let action = match result {
            Ok(data) => {
                info!(
                    project = %data.project_name,
                    risks = data.risks.len(),
                    tasks = data.tasks.len(),
                    "analysis succeeded"
                );
                SessionAction::AnalysisSucceeded { epoch, data }
            }
            Err(e) => {
                warn!(error = %e, "analysis failed");
                SessionAction::AnalysisFailed {
                    epoch,
                    message: e.to_string(),
                }
            }
        };

        Ok(self.dispatch(action).await)
    }

    /// Generate the manifesto from the selected mitigations.
    ///
    /// Does nothing when no risk is selected or a generation is already
    /// running. Failures only clear the busy flag and are logged.
    pub async fn generate_manifesto(&self) -> Session {
        let (epoch, project_name, mitigations) = {
            let mut session = self.session.write().await;
            let next = reduce(&session, SessionAction::ManifestoStarted);
            if next == *session {
                debug!(
                    selected = session.data.selected_risk_count(),
                    busy = session.is_generating_manifesto,
                    "manifesto generation skipped"
                );
                return session.clone();
            }
            *session = next;
            (
                session.epoch,
                session.data.project_name.clone(),
                session.data.selected_mitigations(),
            )
        };

        let mode = self.options().await.strategy_mode;
        info!(mitigations = mitigations.len(), mode = %mode, "manifesto generation started");

        let outcome = match mode {
            StrategyMode::Manifesto => self
                .service
                .generate_manifesto(&project_name, &mitigations)
                .await
                .map(|manifesto| (manifesto, None)),
            StrategyMode::ManifestoAndTasks => self
                .service
                .update_project_strategy(&project_name, &mitigations)
                .await
                .map(|update| (update.manifesto, Some(update.tasks))),
        };

        let action = match outcome {
            Ok((manifesto, tasks)) => SessionAction::ManifestoSucceeded {
                epoch,
                manifesto,
                tasks,
            },
            Err(e) => {
                warn!(error = %e, "manifesto generation failed");
                SessionAction::ManifestoFailed { epoch }
            }
        };

        self.dispatch(action).await
    }

    /// Generate the mission patch. Failures only clear the busy flag and are logged.
    pub async fn generate_logo(&self) -> Session {
        let (epoch, project_name) = {
            let mut session = self.session.write().await;
            if session.data.project_name.trim().is_empty() {
                return session.clone();
            }
            let next = reduce(&session, SessionAction::LogoStarted);
            if next == *session {
                debug!("mission patch generation skipped");
                return session.clone();
            }
            *session = next;
            (session.epoch, session.data.project_name.clone())
        };

        info!(project = %project_name, "mission patch generation started");

        let action = match self.service.generate_mission_patch(&project_name).await {
            Ok(logo_url) => SessionAction::LogoSucceeded { epoch, logo_url },
            Err(e) => {
                warn!(error = %e, "mission patch generation failed");
                SessionAction::LogoFailed { epoch }
            }
        };

        self.dispatch(action).await
    }

    /// Flip a task's completion. Unknown ids leave the session unchanged.
    pub async fn toggle_task(&self, id: &str) -> Session {
        self.dispatch(SessionAction::ToggleTask(id.to_string())).await
    }

    /// Flip a risk's selection. Unknown ids leave the session unchanged.
    pub async fn toggle_risk(&self, id: &str) -> Session {
        self.dispatch(SessionAction::ToggleRisk(id.to_string())).await
    }

    pub async fn select_tab(&self, tab: TabState) -> Session {
        self.dispatch(SessionAction::SelectTab(tab)).await
    }

    /// Back to the input view with the seed data.
    pub async fn reset(&self) -> Session {
        debug!("session reset");
        self.dispatch(SessionAction::Reset).await
    }
}
