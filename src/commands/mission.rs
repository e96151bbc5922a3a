//! Mission Commands
//!
//! Analysis, toggles, tab routing and the background generations.

use project_launcher_core::MarkdownBlock;

use crate::models::response::CommandResponse;
use crate::models::session::{Session, TabState, ViewState};
use crate::state::AppState;
use crate::views::MissionStats;

/// Run the pre-mortem on a brief.
///
/// A blank brief never reaches the orchestrator. When the analysis itself
/// fails the response carries the failure message; the session is back on
/// the input view with the same message.
pub async fn analyze_mission(state: &AppState, brief: &str) -> CommandResponse<Session> {
    if brief.trim().is_empty() {
        return CommandResponse::err("Mission brief cannot be empty");
    }

    match state.orchestrator().analyze(brief).await {
        Ok(session) => match session.error.clone() {
            Some(message) if session.view == ViewState::Input => CommandResponse::err(message),
            _ => CommandResponse::ok(session),
        },
        Err(e) => CommandResponse::err(e.to_string()),
    }
}

/// Flip a task's completion flag
pub async fn toggle_task(state: &AppState, id: &str) -> CommandResponse<Session> {
    CommandResponse::ok(state.orchestrator().toggle_task(id).await)
}

/// Flip a risk's selection flag
pub async fn toggle_risk(state: &AppState, id: &str) -> CommandResponse<Session> {
    CommandResponse::ok(state.orchestrator().toggle_risk(id).await)
}

/// Switch the results panel. `tab` accepts the names `TabState` parses.
pub async fn select_tab(state: &AppState, tab: &str) -> CommandResponse<Session> {
    let tab: TabState = match tab.parse() {
        Ok(tab) => tab,
        Err(e) => return CommandResponse::err(e),
    };

    let session = state.orchestrator().select_tab(tab).await;
    if session.active_tab != tab {
        return CommandResponse::err(format!("The {} tab is not available yet", tab.label()));
    }
    CommandResponse::ok(session)
}

/// Generate the manifesto from the selected mitigations
pub async fn generate_manifesto(state: &AppState) -> CommandResponse<Session> {
    let current = state.orchestrator().snapshot().await;
    if current.view != ViewState::Results {
        return CommandResponse::err("Run an analysis before generating a manifesto");
    }
    CommandResponse::ok(state.orchestrator().generate_manifesto().await)
}

/// Generate the mission patch image
pub async fn generate_mission_patch(state: &AppState) -> CommandResponse<Session> {
    let current = state.orchestrator().snapshot().await;
    if current.view != ViewState::Results {
        return CommandResponse::err("Run an analysis before generating a mission patch");
    }
    CommandResponse::ok(state.orchestrator().generate_logo().await)
}

/// Discard the mission and return to the brief form
pub async fn reset_mission(state: &AppState) -> CommandResponse<Session> {
    CommandResponse::ok(state.orchestrator().reset().await)
}

pub async fn get_mission(state: &AppState) -> CommandResponse<Session> {
    CommandResponse::ok(state.orchestrator().snapshot().await)
}

pub async fn get_mission_stats(state: &AppState) -> CommandResponse<MissionStats> {
    let session = state.orchestrator().snapshot().await;
    CommandResponse::ok(MissionStats::from(&session.data))
}

/// The current manifesto as markdown blocks
pub async fn render_manifesto(state: &AppState) -> CommandResponse<Vec<MarkdownBlock>> {
    let session = state.orchestrator().snapshot().await;
    match session.data.manifesto.as_deref() {
        Some(manifesto) => CommandResponse::ok(project_launcher_core::render_markdown(manifesto)),
        None => CommandResponse::err("No manifesto has been generated"),
    }
}
