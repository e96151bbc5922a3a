//! Response Parsing
//!
//! Turns raw model text into mission values. Models often wrap JSON in
//! markdown fences or add a sentence around it, so the JSON document is
//! extracted before deserialization. Everything that comes out of here has
//! passed the mission model's validation.

use serde::Deserialize;

use project_launcher_core::{tasks_from_service_value, AnalysisData, CoreError, CoreResult};

use super::service::StrategyUpdate;

/// Attempt to extract a JSON document from a model response.
///
/// Handles fenced output (```json ... ```) and prose around a bare object
/// or array. Returns the trimmed input when nothing better is found.
pub fn extract_json_from_response(response_text: &str) -> String {
    let trimmed = response_text.trim();

    if let Some(fenced) = fenced_block(trimmed) {
        return fenced.trim().to_string();
    }

    // First opening bracket decides whether we look for an object or an array
    if let Some(start) = trimmed.find(['{', '[']) {
        let close = if trimmed[start..].starts_with('{') { '}' } else { ']' };
        if let Some(end) = trimmed.rfind(close) {
            if start <= end {
                return trimmed[start..=end].to_string();
            }
        }
    }

    trimmed.to_string()
}

/// Content of the first markdown code fence, without its language tag.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    let content_start = after_fence.find('\n').map(|nl| nl + 1).unwrap_or(0);
    let content = &after_fence[content_start..];
    content.find("```").map(|end| &content[..end])
}

fn ensure_text(response_text: &str) -> CoreResult<()> {
    if response_text.trim().is_empty() {
        return Err(CoreError::parse("model returned an empty response"));
    }
    Ok(())
}

fn parse_value(response_text: &str) -> CoreResult<serde_json::Value> {
    ensure_text(response_text)?;
    let json_str = extract_json_from_response(response_text);
    serde_json::from_str(&json_str).map_err(|e| {
        CoreError::parse(format!(
            "response is not valid JSON: {}. JSON starts with: {:?}",
            e,
            json_str.chars().take(200).collect::<String>()
        ))
    })
}

/// Parse an analysis response into fresh mission data.
pub fn parse_analysis(response_text: &str) -> CoreResult<AnalysisData> {
    AnalysisData::from_service_value(parse_value(response_text)?)
}

#[derive(Debug, Deserialize)]
struct RawStrategy {
    manifesto: Option<String>,
    tasks: Option<serde_json::Value>,
}

/// Parse a combined manifesto + tasks response.
pub fn parse_strategy(response_text: &str) -> CoreResult<StrategyUpdate> {
    let raw: RawStrategy = serde_json::from_value(parse_value(response_text)?)?;

    let manifesto = raw
        .manifesto
        .map(|m| clean_manifesto(&m))
        .filter(|m| !m.is_empty())
        .ok_or_else(|| CoreError::validation("strategy is missing the 'manifesto' text"))?;

    let tasks = raw
        .tasks
        .ok_or_else(|| CoreError::validation("strategy is missing the 'tasks' array"))?;

    Ok(StrategyUpdate {
        manifesto,
        tasks: tasks_from_service_value(tasks)?,
    })
}

/// Normalize manifesto text: unwrap a fence the model put around the whole
/// document and trim surrounding whitespace.
pub fn clean_manifesto(response_text: &str) -> String {
    let trimmed = response_text.trim();
    if trimmed.starts_with("```") {
        if let Some(inner) = fenced_block(trimmed) {
            return inner.trim().to_string();
        }
    }
    trimmed.to_string()
}

/// Parse a manifesto-only response.
pub fn parse_manifesto(response_text: &str) -> CoreResult<String> {
    ensure_text(response_text)?;
    Ok(clean_manifesto(response_text))
}
