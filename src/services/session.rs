//! Session Reducer
//!
//! Pure transition function over [`Session`]. Every state change in the
//! application goes through [`reduce`]; callers hold the only copy behind a
//! lock and replace it wholesale with the returned value.

use crate::models::session::{Session, SessionAction, TabState, ViewState};

/// Apply `action` to `state`, returning the next session.
///
/// Actions that do not apply return an equal session: a stale epoch, the
/// manifesto tab without a manifesto, or a generation started outside the
/// results view or while one is already running. A new analysis result
/// supersedes any generation in flight, so it clears both busy flags.
pub fn reduce(state: &Session, action: SessionAction) -> Session {
    match action {
        SessionAction::AnalysisStarted => {
            if state.view == ViewState::Processing {
                return state.clone();
            }
            Session {
                view: ViewState::Processing,
                error: None,
                ..state.clone()
            }
        }
        SessionAction::AnalysisSucceeded { epoch, data } => {
            if !accepts_analysis(state, epoch) {
                return state.clone();
            }
            Session {
                view: ViewState::Results,
                active_tab: TabState::PreMortem,
                data,
                error: None,
                epoch: state.epoch + 1,
                is_generating_manifesto: false,
                is_generating_logo: false,
            }
        }
        SessionAction::AnalysisFailed { epoch, message } => {
            if !accepts_analysis(state, epoch) {
                return state.clone();
            }
            Session {
                view: ViewState::Input,
                error: Some(message),
                ..state.clone()
            }
        }
        SessionAction::ToggleTask(id) => Session {
            data: state.data.with_task_toggled(&id),
            ..state.clone()
        },
        SessionAction::ToggleRisk(id) => Session {
            data: state.data.with_risk_toggled(&id),
            ..state.clone()
        },
        SessionAction::SelectTab(tab) => {
            if tab == TabState::Manifesto && !state.data.has_manifesto() {
                return state.clone();
            }
            Session {
                active_tab: tab,
                ..state.clone()
            }
        }
        SessionAction::ManifestoStarted => {
            if state.view != ViewState::Results
                || state.is_generating_manifesto
                || state.data.selected_risk_count() == 0
            {
                return state.clone();
            }
            Session {
                is_generating_manifesto: true,
                ..state.clone()
            }
        }
        SessionAction::ManifestoSucceeded {
            epoch,
            manifesto,
            tasks,
        } => {
            if epoch != state.epoch {
                return state.clone();
            }
            let data = state.data.with_manifesto(manifesto);
            let data = match tasks {
                Some(tasks) => data.with_tasks(tasks),
                None => data,
            };
            Session {
                data,
                active_tab: TabState::Manifesto,
                is_generating_manifesto: false,
                ..state.clone()
            }
        }
        SessionAction::ManifestoFailed { epoch } => {
            if epoch != state.epoch {
                return state.clone();
            }
            Session {
                is_generating_manifesto: false,
                ..state.clone()
            }
        }
        SessionAction::LogoStarted => {
            if state.view != ViewState::Results || state.is_generating_logo {
                return state.clone();
            }
            Session {
                is_generating_logo: true,
                ..state.clone()
            }
        }
        SessionAction::LogoSucceeded { epoch, logo_url } => {
            if epoch != state.epoch {
                return state.clone();
            }
            Session {
                data: state.data.with_logo(logo_url),
                is_generating_logo: false,
                ..state.clone()
            }
        }
        SessionAction::LogoFailed { epoch } => {
            if epoch != state.epoch {
                return state.clone();
            }
            Session {
                is_generating_logo: false,
                ..state.clone()
            }
        }
        SessionAction::Reset => Session {
            epoch: state.epoch + 1,
            ..Session::default()
        },
    }
}

/// An analysis outcome only lands on the session it was started from.
fn accepts_analysis(state: &Session, epoch: u64) -> bool {
    state.view == ViewState::Processing && state.epoch == epoch
}
