//! Mission Services
//!
//! Everything between the session and the generative service:
//! - `prompts` - prompt text for analysis, strategy and the mission patch
//! - `parser` - JSON extraction and validation of model output
//! - `service` - the `MissionService` trait and its provider-backed implementation
//! - `orchestrator` - the session owner that sequences calls and state changes

pub mod orchestrator;
pub mod parser;
pub mod prompts;
pub mod service;

pub use orchestrator::{MissionOrchestrator, OrchestratorOptions};
pub use service::{LlmMissionService, MissionService, StrategyUpdate};
