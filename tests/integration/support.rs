//! Scripted mission service for integration tests

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use project_launcher::services::mission::StrategyUpdate;
use project_launcher::utils::{AppError, AppResult};
use project_launcher::MissionService;
use project_launcher_core::{AnalysisData, Risk, Severity, Task};

/// Mock service that returns queued outcomes after a fixed latency and
/// records every call.
pub struct ScriptedMissionService {
    latency: Duration,
    analyses: Mutex<VecDeque<AppResult<AnalysisData>>>,
    manifestos: Mutex<VecDeque<AppResult<String>>>,
    strategies: Mutex<VecDeque<AppResult<StrategyUpdate>>>,
    patches: Mutex<VecDeque<AppResult<String>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedMissionService {
    pub fn new() -> Self {
        Self {
            latency: Duration::ZERO,
            analyses: Mutex::new(VecDeque::new()),
            manifestos: Mutex::new(VecDeque::new()),
            strategies: Mutex::new(VecDeque::new()),
            patches: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_analysis(self, result: AppResult<AnalysisData>) -> Self {
        self.analyses.lock().unwrap().push_back(result);
        self
    }

    pub fn with_manifesto(self, result: AppResult<String>) -> Self {
        self.manifestos.lock().unwrap().push_back(result);
        self
    }

    pub fn with_strategy(self, result: AppResult<StrategyUpdate>) -> Self {
        self.strategies.lock().unwrap().push_back(result);
        self
    }

    pub fn with_patch(self, result: AppResult<String>) -> Self {
        self.patches.lock().unwrap().push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn respond<T>(&self, call: String, queue: &Mutex<VecDeque<AppResult<T>>>) -> AppResult<T> {
        self.calls.lock().unwrap().push(call);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let next = queue.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(AppError::service("no scripted response left")))
    }
}

#[async_trait]
impl MissionService for ScriptedMissionService {
    async fn analyze_project(&self, brief: &str) -> AppResult<AnalysisData> {
        self.respond(format!("analyze:{}", brief), &self.analyses).await
    }

    async fn generate_manifesto(&self, project_name: &str, mitigations: &[String]) -> AppResult<String> {
        self.respond(
            format!("manifesto:{}:{}", project_name, mitigations.join("|")),
            &self.manifestos,
        )
        .await
    }

    async fn update_project_strategy(
        &self,
        project_name: &str,
        mitigations: &[String],
    ) -> AppResult<StrategyUpdate> {
        self.respond(
            format!("strategy:{}:{}", project_name, mitigations.join("|")),
            &self.strategies,
        )
        .await
    }

    async fn generate_mission_patch(&self, project_name: &str) -> AppResult<String> {
        self.respond(format!("patch:{}", project_name), &self.patches).await
    }
}

/// A small analysis result, as the service would return it.
pub fn podcast_analysis() -> AnalysisData {
    AnalysisData {
        project_name: "CTO Podcast".to_string(),
        risks: vec![
            Risk {
                id: "p1".to_string(),
                threat: "No guests book".to_string(),
                probability: 70,
                mitigation: "Line up five guests before launch".to_string(),
                severity: Severity::High,
                selected: false,
            },
            Risk {
                id: "p2".to_string(),
                threat: "Audio quality is poor".to_string(),
                probability: 40,
                mitigation: "Rent a studio for the first month".to_string(),
                severity: Severity::Unrecognized,
                selected: false,
            },
        ],
        tasks: vec![
            Task::new("s1", "Pick a hosting platform"),
            Task::new("s2", "Record the pilot episode"),
            Task::new("s3", "Publish the trailer"),
        ],
        manifesto: None,
        logo_url: None,
    }
}
