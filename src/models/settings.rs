//! Settings Models
//!
//! Application configuration and settings data structures.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use project_launcher_llm::ProviderConfig;

/// Environment variable always consulted after `api_key_env`
pub const FALLBACK_API_KEY_ENV: &str = "API_KEY";

/// What "update business plan" regenerates from the selected mitigations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrategyMode {
    /// Manifesto only; the task list is kept
    #[default]
    Manifesto,
    /// Manifesto plus a fresh task list
    ManifestoAndTasks,
}

impl FromStr for StrategyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "manifesto" => Ok(Self::Manifesto),
            "manifesto_and_tasks" => Ok(Self::ManifestoAndTasks),
            other => Err(format!(
                "Invalid strategy mode: {}. Must be 'manifesto' or 'manifesto_and_tasks'",
                other
            )),
        }
    }
}

impl std::fmt::Display for StrategyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyMode::Manifesto => write!(f, "manifesto"),
            StrategyMode::ManifestoAndTasks => write!(f, "manifesto_and_tasks"),
        }
    }
}

/// Application configuration stored in config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Text model used for analysis and strategy
    #[serde(default = "default_model")]
    pub model: String,
    /// Image model used for the mission patch
    #[serde(default = "default_image_model")]
    pub image_model: String,
    /// Base URL override for the generative service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum output tokens per request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Per-request timeout in seconds (0 disables)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Minimum time the processing view is shown, in milliseconds
    #[serde(default = "default_min_analysis_delay_ms")]
    pub min_analysis_delay_ms: u64,
    /// What manifesto generation regenerates
    #[serde(default)]
    pub strategy_mode: StrategyMode,
    /// Default tracing filter when PROJECT_LAUNCHER_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_model() -> String {
    "imagen-4.0-generate-001".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    8192
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_min_analysis_delay_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            image_model: default_image_model(),
            base_url: None,
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            min_analysis_delay_ms: default_min_analysis_delay_ms(),
            strategy_mode: StrategyMode::default(),
            log_level: default_log_level(),
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub model: Option<String>,
    pub image_model: Option<String>,
    pub base_url: Option<String>,
    pub api_key_env: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub request_timeout_secs: Option<u64>,
    pub min_analysis_delay_ms: Option<u64>,
    pub strategy_mode: Option<StrategyMode>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(model) = update.model {
            self.model = model;
        }
        if let Some(image_model) = update.image_model {
            self.image_model = image_model;
        }
        if let Some(base_url) = update.base_url {
            // an empty string clears the override
            self.base_url = Some(base_url).filter(|u| !u.trim().is_empty());
        }
        if let Some(api_key_env) = update.api_key_env {
            self.api_key_env = api_key_env;
        }
        if let Some(temperature) = update.temperature {
            self.temperature = temperature;
        }
        if let Some(max_tokens) = update.max_tokens {
            self.max_tokens = max_tokens;
        }
        if let Some(timeout) = update.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
        if let Some(delay) = update.min_analysis_delay_ms {
            self.min_analysis_delay_ms = delay;
        }
        if let Some(mode) = update.strategy_mode {
            self.strategy_mode = mode;
        }
        if let Some(level) = update.log_level {
            self.log_level = level;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }

        if self.image_model.trim().is_empty() {
            return Err("image_model must not be empty".to_string());
        }

        if self.api_key_env.trim().is_empty() {
            return Err("api_key_env must not be empty".to_string());
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "Invalid temperature: {}. Must be between 0.0 and 2.0",
                self.temperature
            ));
        }

        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }

        // An hour of forced waiting is certainly a typo
        if self.min_analysis_delay_ms > 60_000 {
            return Err("min_analysis_delay_ms cannot exceed 60000".to_string());
        }

        if self.log_level.trim().is_empty() {
            return Err("log_level must not be empty".to_string());
        }

        Ok(())
    }

    /// Look up the API key: `api_key_env` first, then `API_KEY`.
    pub fn resolve_api_key_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        [self.api_key_env.as_str(), FALLBACK_API_KEY_ENV]
            .into_iter()
            .filter_map(|name| lookup(name))
            .find(|key| !key.trim().is_empty())
    }

    /// Look up the API key in the process environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Provider configuration for this app configuration
    pub fn provider_config(&self, api_key: Option<String>) -> ProviderConfig {
        ProviderConfig {
            api_key,
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            image_model: Some(self.image_model.clone()),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout_secs: self.request_timeout_secs,
        }
    }
}
