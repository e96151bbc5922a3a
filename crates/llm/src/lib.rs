//! Project Launcher LLM
//!
//! Provides a provider-agnostic interface to the generative service used for
//! mission analysis, plus the Gemini implementation:
//! - text generation with an optional JSON-only response mode
//! - image generation (mission patch)
//!
//! Also includes the HTTP client factory.

pub mod gemini;
pub mod http_client;
pub mod provider;
pub mod types;

// Re-export main types
pub use gemini::GeminiProvider;
pub use http_client::build_http_client;
pub use provider::{missing_api_key_error, parse_http_error, LlmProvider};
pub use types::*;
