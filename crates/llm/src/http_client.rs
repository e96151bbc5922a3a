//! HTTP Client Factory
//!
//! Provides a factory function for building the shared reqwest client.

use std::time::Duration;

use crate::types::{LlmError, LlmResult};

/// Build a `reqwest::Client` with a per-request timeout.
///
/// A zero timeout disables the limit.
pub fn build_http_client(timeout: Duration) -> LlmResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if !timeout.is_zero() {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| LlmError::Other {
        message: format!("failed to build HTTP client: {}", e),
    })
}
