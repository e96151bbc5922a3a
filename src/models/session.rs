//! Session Models
//!
//! The single in-memory session: which view is showing, which result tab is
//! active, the mission data, and the busy flags of the background
//! generations. Transitions are described by [`SessionAction`] and applied
//! by `services::session::reduce`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use project_launcher_core::{AnalysisData, Task};

/// Top-level view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    /// Brief entry form
    #[default]
    Input,
    /// Analysis in flight
    Processing,
    /// Result panels
    Results,
}

impl std::fmt::Display for ViewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewState::Input => write!(f, "input"),
            ViewState::Processing => write!(f, "processing"),
            ViewState::Results => write!(f, "results"),
        }
    }
}

/// Result panel selected in the results view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TabState {
    /// Risk list
    #[default]
    PreMortem,
    /// Task list
    Atomizer,
    /// Generated strategy
    Manifesto,
}

impl TabState {
    /// Tabs in display order
    pub const ALL: [TabState; 3] = [TabState::PreMortem, TabState::Atomizer, TabState::Manifesto];

    /// Tab strip label
    pub fn label(&self) -> &'static str {
        match self {
            TabState::PreMortem => "Pre-Mortem",
            TabState::Atomizer => "Atomizer",
            TabState::Manifesto => "Manifesto",
        }
    }
}

impl std::fmt::Display for TabState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TabState::PreMortem => write!(f, "pre-mortem"),
            TabState::Atomizer => write!(f, "atomizer"),
            TabState::Manifesto => write!(f, "manifesto"),
        }
    }
}

impl FromStr for TabState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pre-mortem" | "premortem" | "risks" => Ok(TabState::PreMortem),
            "atomizer" | "tasks" => Ok(TabState::Atomizer),
            "manifesto" => Ok(TabState::Manifesto),
            other => Err(format!(
                "Unknown tab: {}. Expected 'pre-mortem', 'atomizer' or 'manifesto'",
                other
            )),
        }
    }
}

/// The whole application session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub view: ViewState,
    pub active_tab: TabState,
    pub data: AnalysisData,
    /// Analysis failure shown with the input form
    pub error: Option<String>,
    pub is_generating_manifesto: bool,
    pub is_generating_logo: bool,
    /// Bumped on reset and on every successful analysis; results tagged
    /// with an older epoch are dropped.
    pub epoch: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            view: ViewState::Input,
            active_tab: TabState::PreMortem,
            data: AnalysisData::default(),
            error: None,
            is_generating_manifesto: false,
            is_generating_logo: false,
            epoch: 0,
        }
    }
}

impl Session {
    /// Tabs the user can currently select
    pub fn available_tabs(&self) -> Vec<TabState> {
        TabState::ALL
            .into_iter()
            .filter(|tab| *tab != TabState::Manifesto || self.data.has_manifesto())
            .collect()
    }

    pub fn is_processing(&self) -> bool {
        self.view == ViewState::Processing
    }
}

/// Every transition the session can take
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    AnalysisStarted,
    AnalysisSucceeded { epoch: u64, data: AnalysisData },
    AnalysisFailed { epoch: u64, message: String },
    ToggleTask(String),
    ToggleRisk(String),
    SelectTab(TabState),
    ManifestoStarted,
    ManifestoSucceeded {
        epoch: u64,
        manifesto: String,
        /// Replacement task list, when the strategy also rebuilt the plan
        tasks: Option<Vec<Task>>,
    },
    ManifestoFailed { epoch: u64 },
    LogoStarted,
    LogoSucceeded { epoch: u64, logo_url: String },
    LogoFailed { epoch: u64 },
    Reset,
}
