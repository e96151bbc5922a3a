//! Analysis Orchestrator Integration Tests
//!
//! Drives `MissionOrchestrator` with the scripted service. Timing tests run
//! on tokio's paused clock, so the 2000 ms floor costs no wall time.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use project_launcher::services::mission::StrategyUpdate;
use project_launcher::utils::AppError;
use project_launcher::{MissionOrchestrator, OrchestratorOptions, StrategyMode, TabState, ViewState};
use project_launcher_core::{AnalysisData, CoreError, Task};

use crate::support::{podcast_analysis, ScriptedMissionService};

fn orchestrator(service: Arc<ScriptedMissionService>) -> Arc<MissionOrchestrator> {
    Arc::new(MissionOrchestrator::new(service, OrchestratorOptions::default()))
}

fn instant_orchestrator(service: Arc<ScriptedMissionService>) -> Arc<MissionOrchestrator> {
    Arc::new(MissionOrchestrator::new(
        service,
        OrchestratorOptions {
            min_analysis_delay: Duration::ZERO,
            ..OrchestratorOptions::default()
        },
    ))
}

// ============================================================================
// Analysis floor
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_fast_analysis_waits_for_floor() {
    let service = Arc::new(
        ScriptedMissionService::new()
            .with_latency(Duration::from_millis(50))
            .with_analysis(Ok(podcast_analysis())),
    );
    let orch = orchestrator(service);
    let start = Instant::now();

    let handle = tokio::spawn({
        let orch = Arc::clone(&orch);
        async move { orch.analyze("Launch a B2B podcast in Q4 aimed at CTOs").await }
    });

    // the service answered at 50 ms but the view must not move yet
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(orch.snapshot().await.view, ViewState::Processing);

    tokio::time::sleep(Duration::from_millis(1850)).await;
    assert_eq!(orch.snapshot().await.view, ViewState::Processing);

    let session = handle.await.unwrap().unwrap();
    assert!(start.elapsed() >= Duration::from_millis(2000));
    assert_eq!(session.view, ViewState::Results);
    assert_eq!(session.data.project_name, "CTO Podcast");
    assert_eq!(session.active_tab, TabState::PreMortem);
}

#[tokio::test(start_paused = true)]
async fn test_slow_analysis_is_not_padded() {
    let service = Arc::new(
        ScriptedMissionService::new()
            .with_latency(Duration::from_millis(3000))
            .with_analysis(Ok(podcast_analysis())),
    );
    let orch = orchestrator(service);
    let start = Instant::now();

    let session = orch.analyze("brief").await.unwrap();
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(3000));
    assert!(elapsed < Duration::from_millis(3100));
    assert_eq!(session.view, ViewState::Results);
}

#[tokio::test(start_paused = true)]
async fn test_failure_also_waits_for_floor() {
    let service = Arc::new(
        ScriptedMissionService::new().with_analysis(Err(AppError::service("quota exhausted"))),
    );
    let orch = orchestrator(service);
    let start = Instant::now();

    let session = orch.analyze("brief").await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(2000));
    assert_eq!(session.view, ViewState::Input);
}

#[tokio::test(start_paused = true)]
async fn test_second_analysis_while_processing_is_rejected() {
    let service = Arc::new(
        ScriptedMissionService::new()
            .with_latency(Duration::from_millis(500))
            .with_analysis(Ok(podcast_analysis())),
    );
    let orch = orchestrator(service.clone());

    let handle = tokio::spawn({
        let orch = Arc::clone(&orch);
        async move { orch.analyze("first").await }
    });
    tokio::time::sleep(Duration::from_millis(10)).await;

    let err = orch.analyze("second").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(orch.snapshot().await.view, ViewState::Processing);

    handle.await.unwrap().unwrap();
    assert_eq!(service.calls(), vec!["analyze:first".to_string()]);
}

// ============================================================================
// Analysis failures
// ============================================================================

#[tokio::test]
async fn test_failure_returns_to_input_and_keeps_data() {
    let service = Arc::new(
        ScriptedMissionService::new().with_analysis(Err(AppError::service("model overloaded"))),
    );
    let orch = instant_orchestrator(service);

    let before = orch.toggle_task("t5").await;
    let session = orch.analyze("Launch a podcast").await.unwrap();

    assert_eq!(session.view, ViewState::Input);
    assert!(session.error.as_deref().unwrap().contains("model overloaded"));
    assert_eq!(session.data, before.data);
}

#[tokio::test]
async fn test_malformed_response_is_an_analysis_failure() {
    let service = Arc::new(ScriptedMissionService::new().with_analysis(Err(AppError::from(
        CoreError::validation("task 't3' is missing a 'description'"),
    ))));
    let orch = instant_orchestrator(service);

    let session = orch.analyze("brief").await.unwrap();
    assert_eq!(session.view, ViewState::Input);
    assert!(session.error.as_deref().unwrap().contains("missing a 'description'"));
    assert_eq!(session.data, AnalysisData::default());
}

#[tokio::test]
async fn test_retry_after_failure_clears_error() {
    let service = Arc::new(
        ScriptedMissionService::new()
            .with_analysis(Err(AppError::service("timeout")))
            .with_analysis(Ok(podcast_analysis())),
    );
    let orch = instant_orchestrator(service);

    assert!(orch.analyze("brief").await.unwrap().error.is_some());
    let session = orch.analyze("brief").await.unwrap();
    assert!(session.error.is_none());
    assert_eq!(session.view, ViewState::Results);
}

// ============================================================================
// Toggles
// ============================================================================

#[tokio::test]
async fn test_unknown_ids_leave_session_unchanged() {
    let service = Arc::new(ScriptedMissionService::new().with_analysis(Ok(podcast_analysis())));
    let orch = instant_orchestrator(service);
    let before = orch.analyze("brief").await.unwrap();

    assert_eq!(orch.toggle_task("nope").await, before);
    assert_eq!(orch.toggle_risk("nope").await, before);
}

#[tokio::test]
async fn test_double_toggle_is_identity() {
    let service = Arc::new(ScriptedMissionService::new().with_analysis(Ok(podcast_analysis())));
    let orch = instant_orchestrator(service);
    let before = orch.analyze("brief").await.unwrap();

    let once = orch.toggle_task("s2").await;
    assert!(once.data.task("s2").unwrap().is_completed);
    assert_eq!(once.data.tasks.len(), before.data.tasks.len());
    assert_eq!(once.data.completed_task_count(), 1);

    let twice = orch.toggle_task("s2").await;
    assert_eq!(twice, before);
}

// ============================================================================
// Manifesto
// ============================================================================

#[tokio::test]
async fn test_manifesto_without_selection_does_nothing() {
    let service = Arc::new(
        ScriptedMissionService::new()
            .with_analysis(Ok(podcast_analysis()))
            .with_manifesto(Ok("# Unused".to_string())),
    );
    let orch = instant_orchestrator(service.clone());
    let before = orch.analyze("brief").await.unwrap();

    let after = orch.generate_manifesto().await;
    assert_eq!(after, before);
    assert!(!after.is_generating_manifesto);
    assert!(after.data.manifesto.is_none());
    assert_eq!(service.calls().len(), 1);
}

#[tokio::test]
async fn test_manifesto_uses_selected_mitigations_in_order() {
    let service = Arc::new(
        ScriptedMissionService::new()
            .with_analysis(Ok(podcast_analysis()))
            .with_manifesto(Ok("# Podcast Doctrine\n\n- **Guests** first".to_string())),
    );
    let orch = instant_orchestrator(service.clone());
    orch.analyze("brief").await.unwrap();
    orch.toggle_risk("p2").await;
    orch.toggle_risk("p1").await;

    let session = orch.generate_manifesto().await;
    assert_eq!(
        service.calls()[1],
        "manifesto:CTO Podcast:Line up five guests before launch|Rent a studio for the first month"
    );
    assert_eq!(session.active_tab, TabState::Manifesto);
    assert!(session.data.has_manifesto());
    assert_eq!(session.data.tasks, podcast_analysis().tasks);
}

#[tokio::test]
async fn test_strategy_mode_replaces_tasks() {
    let service = Arc::new(
        ScriptedMissionService::new()
            .with_analysis(Ok(podcast_analysis()))
            .with_strategy(Ok(StrategyUpdate {
                manifesto: "# Rebuilt".to_string(),
                tasks: vec![Task::new("n1", "Book five guests"), Task::new("n2", "Rent a studio")],
            })),
    );
    let orch = instant_orchestrator(service.clone());
    orch.set_options(OrchestratorOptions {
        min_analysis_delay: Duration::ZERO,
        strategy_mode: StrategyMode::ManifestoAndTasks,
    })
    .await;
    orch.analyze("brief").await.unwrap();
    orch.toggle_task("s1").await;
    orch.toggle_risk("p1").await;

    let session = orch.generate_manifesto().await;
    assert!(service.calls()[1].starts_with("strategy:"));
    assert_eq!(session.data.manifesto.as_deref(), Some("# Rebuilt"));
    assert_eq!(session.data.tasks.len(), 2);
    assert_eq!(session.data.completed_task_count(), 0);
    // risk selection survives the plan update
    assert!(session.data.risk("p1").unwrap().selected);
}

#[tokio::test]
async fn test_manifesto_failure_keeps_state() {
    let service = Arc::new(
        ScriptedMissionService::new()
            .with_analysis(Ok(podcast_analysis()))
            .with_manifesto(Err(AppError::service("safety block"))),
    );
    let orch = instant_orchestrator(service);
    orch.analyze("brief").await.unwrap();
    let before = orch.toggle_risk("p1").await;

    let after = orch.generate_manifesto().await;
    assert_eq!(after, before);
}

#[tokio::test(start_paused = true)]
async fn test_manifesto_busy_flag_blocks_second_request() {
    let service = Arc::new(
        ScriptedMissionService::new()
            .with_latency(Duration::from_millis(1000))
            .with_analysis(Ok(podcast_analysis()))
            .with_manifesto(Ok("# One".to_string()))
            .with_manifesto(Ok("# Two".to_string())),
    );
    let orch = instant_orchestrator(service.clone());
    orch.analyze("brief").await.unwrap();
    orch.toggle_risk("p1").await;

    let handle = tokio::spawn({
        let orch = Arc::clone(&orch);
        async move { orch.generate_manifesto().await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let second = orch.generate_manifesto().await;
    assert!(second.is_generating_manifesto);
    assert!(second.data.manifesto.is_none());

    let done = handle.await.unwrap();
    assert_eq!(done.data.manifesto.as_deref(), Some("# One"));
    assert_eq!(
        service.calls().iter().filter(|c| c.starts_with("manifesto:")).count(),
        1
    );
}

// ============================================================================
// Reset and stale results
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_reset_discards_in_flight_manifesto() {
    let service = Arc::new(
        ScriptedMissionService::new()
            .with_latency(Duration::from_millis(1000))
            .with_analysis(Ok(podcast_analysis()))
            .with_manifesto(Ok("# Too late".to_string())),
    );
    let orch = instant_orchestrator(service);
    orch.analyze("brief").await.unwrap();
    orch.toggle_risk("p1").await;

    let handle = tokio::spawn({
        let orch = Arc::clone(&orch);
        async move { orch.generate_manifesto().await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(orch.snapshot().await.is_generating_manifesto);

    let reset = orch.reset().await;
    assert_eq!(reset.view, ViewState::Input);
    assert_eq!(reset.data, AnalysisData::default());
    assert!(!reset.is_generating_manifesto);

    let after = handle.await.unwrap();
    assert!(after.data.manifesto.is_none());
    assert_eq!(after.data, AnalysisData::default());
    assert_eq!(after.active_tab, TabState::PreMortem);
}

#[tokio::test(start_paused = true)]
async fn test_reset_discards_in_flight_analysis() {
    let service = Arc::new(
        ScriptedMissionService::new()
            .with_latency(Duration::from_millis(500))
            .with_analysis(Ok(podcast_analysis())),
    );
    let orch = orchestrator(service);

    let handle = tokio::spawn({
        let orch = Arc::clone(&orch);
        async move { orch.analyze("brief").await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    orch.reset().await;

    let session = handle.await.unwrap().unwrap();
    assert_eq!(session.view, ViewState::Input);
    assert_eq!(session.data, AnalysisData::default());
}

#[tokio::test(start_paused = true)]
async fn test_generation_outcome_after_new_analysis_is_dropped() {
    let service = Arc::new(
        ScriptedMissionService::new()
            .with_latency(Duration::from_millis(500))
            .with_analysis(Ok(podcast_analysis()))
            .with_analysis(Ok(podcast_analysis()))
            .with_manifesto(Ok("# First".to_string()))
            .with_manifesto(Ok("# Second".to_string()))
            .with_patch(Ok("data:image/png;base64,AAAA".to_string()))
            .with_patch(Ok("data:image/png;base64,BBBB".to_string())),
    );
    let orch = instant_orchestrator(service);
    orch.analyze("brief").await.unwrap();
    orch.toggle_risk("p1").await;

    let manifesto = tokio::spawn({
        let orch = Arc::clone(&orch);
        async move { orch.generate_manifesto().await }
    });
    let logo = tokio::spawn({
        let orch = Arc::clone(&orch);
        async move { orch.generate_logo().await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    let busy = orch.snapshot().await;
    assert!(busy.is_generating_manifesto);
    assert!(busy.is_generating_logo);

    orch.reset().await;
    let fresh = orch.analyze("second brief").await.unwrap();
    manifesto.await.unwrap();
    logo.await.unwrap();

    let settled = orch.snapshot().await;
    assert_eq!(settled, fresh);
    assert!(!settled.is_generating_manifesto);
    assert!(!settled.is_generating_logo);
    assert!(settled.data.manifesto.is_none());
    assert!(settled.data.logo_url.is_none());

    orch.toggle_risk("p2").await;
    let session = orch.generate_manifesto().await;
    assert_eq!(session.data.manifesto.as_deref(), Some("# Second"));
    let session = orch.generate_logo().await;
    assert_eq!(session.data.logo_url.as_deref(), Some("data:image/png;base64,BBBB"));
}

#[tokio::test]
async fn test_generation_before_analysis_is_ignored() {
    let service = Arc::new(
        ScriptedMissionService::new()
            .with_analysis(Ok(podcast_analysis()))
            .with_manifesto(Ok("# Plan".to_string()))
            .with_patch(Ok("data:image/png;base64,AAAA".to_string())),
    );
    let orch = instant_orchestrator(service.clone());

    let input = orch.toggle_risk("r1").await;
    assert_eq!(orch.generate_manifesto().await, input);
    assert_eq!(orch.generate_logo().await, input);
    assert!(service.calls().is_empty());

    let results = orch.analyze("brief").await.unwrap();
    assert!(!results.is_generating_manifesto);
    assert!(!results.is_generating_logo);

    orch.toggle_risk("p1").await;
    let session = orch.generate_manifesto().await;
    assert_eq!(session.data.manifesto.as_deref(), Some("# Plan"));
    let session = orch.generate_logo().await;
    assert_eq!(session.data.logo_url.as_deref(), Some("data:image/png;base64,AAAA"));
}

#[tokio::test]
async fn test_reset_is_idempotent() {
    let service = Arc::new(ScriptedMissionService::new().with_analysis(Ok(podcast_analysis())));
    let orch = instant_orchestrator(service);
    orch.analyze("brief").await.unwrap();

    let first = orch.reset().await;
    let second = orch.reset().await;
    assert_eq!(first.view, second.view);
    assert_eq!(first.data, second.data);
    assert_eq!(second.active_tab, TabState::PreMortem);
    assert!(second.error.is_none());
}

// ============================================================================
// Mission patch
// ============================================================================

#[tokio::test]
async fn test_patch_is_stored() {
    let service = Arc::new(
        ScriptedMissionService::new()
            .with_analysis(Ok(podcast_analysis()))
            .with_patch(Ok("data:image/png;base64,AAAA".to_string())),
    );
    let orch = instant_orchestrator(service.clone());
    orch.analyze("brief").await.unwrap();

    let session = orch.generate_logo().await;
    assert_eq!(session.data.logo_url.as_deref(), Some("data:image/png;base64,AAAA"));
    assert!(!session.is_generating_logo);
    assert_eq!(service.calls()[1], "patch:CTO Podcast");
}

#[tokio::test]
async fn test_patch_failure_is_silent() {
    let service = Arc::new(
        ScriptedMissionService::new()
            .with_analysis(Ok(podcast_analysis()))
            .with_patch(Err(AppError::service("image model unavailable"))),
    );
    let orch = instant_orchestrator(service);
    let before = orch.analyze("brief").await.unwrap();

    let after = orch.generate_logo().await;
    assert_eq!(after, before);
}
