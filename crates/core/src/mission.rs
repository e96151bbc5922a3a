//! Mission Domain Model
//!
//! Risks, tasks and the `AnalysisData` aggregate that the whole session
//! revolves around. Values are treated as immutable: every transition
//! returns a new aggregate and leaves the receiver untouched.
//!
//! Data coming back from the generative service is untrusted. It enters
//! through [`AnalysisData::from_service_value`] / [`tasks_from_service_value`],
//! which reject missing identifiers and texts instead of filling in
//! placeholders.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{CoreError, CoreResult};

/// Severity of a risk. The service is asked for one of four values; anything
/// else lands in `Unrecognized` and is displayed with the medium style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Unrecognized,
}

impl From<&str> for Severity {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::Unrecognized,
        }
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Severity::from(raw.as_str()))
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::High => write!(f, "high"),
            Severity::Medium => write!(f, "medium"),
            Severity::Low => write!(f, "low"),
            Severity::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

/// Display attributes for a severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityStyle {
    /// Upper-case badge label
    pub label: &'static str,
    /// 4 = critical .. 1 = low
    pub rank: u8,
}

impl Severity {
    /// Display style; unrecognized values borrow the medium style.
    pub fn style(&self) -> SeverityStyle {
        match self {
            Severity::Critical => SeverityStyle {
                label: "CRITICAL",
                rank: 4,
            },
            Severity::High => SeverityStyle {
                label: "HIGH",
                rank: 3,
            },
            Severity::Medium | Severity::Unrecognized => SeverityStyle {
                label: "MEDIUM",
                rank: 2,
            },
            Severity::Low => SeverityStyle {
                label: "LOW",
                rank: 1,
            },
        }
    }
}

/// A single identified threat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub id: String,
    pub threat: String,
    /// Percentage as reported by the service; not range-checked
    pub probability: i64,
    pub mitigation: String,
    pub severity: Severity,
    /// The user chose to implement this mitigation
    #[serde(default)]
    pub selected: bool,
}

/// A discrete, completable step of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub is_completed: bool,
}

impl Task {
    /// Create an open task
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            is_completed: false,
        }
    }
}

/// The aggregate root of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisData {
    pub project_name: String,
    pub risks: Vec<Risk>,
    pub tasks: Vec<Task>,
    /// Present only once a manifesto has been generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifesto: Option<String>,
    /// Mission patch image reference, present only once generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl AnalysisData {
    /// Copy with the completion flag of task `id` flipped.
    pub fn with_task_toggled(&self, id: &str) -> Self {
        Self {
            tasks: self
                .tasks
                .iter()
                .map(|t| {
                    if t.id == id {
                        Task {
                            is_completed: !t.is_completed,
                            ..t.clone()
                        }
                    } else {
                        t.clone()
                    }
                })
                .collect(),
            ..self.clone()
        }
    }

    /// Copy with the selection flag of risk `id` flipped.
    pub fn with_risk_toggled(&self, id: &str) -> Self {
        Self {
            risks: self
                .risks
                .iter()
                .map(|r| {
                    if r.id == id {
                        Risk {
                            selected: !r.selected,
                            ..r.clone()
                        }
                    } else {
                        r.clone()
                    }
                })
                .collect(),
            ..self.clone()
        }
    }

    /// Copy with the manifesto set.
    pub fn with_manifesto(&self, manifesto: impl Into<String>) -> Self {
        Self {
            manifesto: Some(manifesto.into()),
            ..self.clone()
        }
    }

    /// Copy with the task sequence replaced wholesale.
    pub fn with_tasks(&self, tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..self.clone()
        }
    }

    /// Copy with the mission patch reference set.
    pub fn with_logo(&self, logo_url: impl Into<String>) -> Self {
        Self {
            logo_url: Some(logo_url.into()),
            ..self.clone()
        }
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn risk(&self, id: &str) -> Option<&Risk> {
        self.risks.iter().find(|r| r.id == id)
    }

    /// Mitigation texts of every selected risk, in risk order.
    pub fn selected_mitigations(&self) -> Vec<String> {
        self.risks
            .iter()
            .filter(|r| r.selected)
            .map(|r| r.mitigation.clone())
            .collect()
    }

    pub fn selected_risk_count(&self) -> usize {
        self.risks.iter().filter(|r| r.selected).count()
    }

    pub fn completed_task_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_completed).count()
    }

    pub fn pending_task_count(&self) -> usize {
        self.tasks.len() - self.completed_task_count()
    }

    /// `round(100 * completed / total)`, 0 when there are no tasks.
    pub fn task_progress(&self) -> u32 {
        let total = self.tasks.len();
        if total == 0 {
            return 0;
        }
        let completed = self.completed_task_count();
        // round half up in integer arithmetic
        ((200 * completed + total) / (2 * total)) as u32
    }

    pub fn has_manifesto(&self) -> bool {
        self.manifesto.is_some()
    }

    /// Check the aggregate's invariants.
    pub fn validate(&self) -> CoreResult<()> {
        if self.project_name.trim().is_empty() {
            return Err(CoreError::validation("analysis has an empty project name"));
        }
        validate_risks(&self.risks)?;
        validate_tasks(&self.tasks)
    }

    /// Build a fresh aggregate from a service payload.
    ///
    /// Expects `projectName`, a `risks` array and a `tasks` array. Every risk
    /// needs an `id` and a `threat`, every task an `id` and a `description`.
    /// Flags start cleared and manifesto / logo start absent whatever the
    /// payload says.
    pub fn from_service_value(value: Value) -> CoreResult<Self> {
        let raw: RawAnalysis = serde_json::from_value(value)?;

        let project_name = raw
            .project_name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| CoreError::validation("analysis is missing 'projectName'"))?;

        let risks = raw
            .risks
            .ok_or_else(|| CoreError::validation("analysis is missing the 'risks' array"))?
            .into_iter()
            .enumerate()
            .map(|(index, risk)| risk.into_risk(index))
            .collect::<CoreResult<Vec<_>>>()?;

        let tasks = raw
            .tasks
            .ok_or_else(|| CoreError::validation("analysis is missing the 'tasks' array"))?
            .into_iter()
            .enumerate()
            .map(|(index, task)| task.into_task(index))
            .collect::<CoreResult<Vec<_>>>()?;

        let data = Self {
            project_name: project_name.trim().to_string(),
            risks,
            tasks,
            manifesto: None,
            logo_url: None,
        };
        data.validate()?;
        Ok(data)
    }
}

/// Build a task sequence from a service payload (a JSON array of tasks).
pub fn tasks_from_service_value(value: Value) -> CoreResult<Vec<Task>> {
    let raw: Vec<RawTask> = serde_json::from_value(value)?;
    let tasks = raw
        .into_iter()
        .enumerate()
        .map(|(index, task)| task.into_task(index))
        .collect::<CoreResult<Vec<_>>>()?;
    validate_tasks(&tasks)?;
    Ok(tasks)
}

fn validate_risks(risks: &[Risk]) -> CoreResult<()> {
    let mut seen = HashSet::new();
    for risk in risks {
        if risk.id.trim().is_empty() {
            return Err(CoreError::validation("risk has an empty id"));
        }
        if risk.threat.trim().is_empty() {
            return Err(CoreError::validation(format!(
                "risk '{}' has an empty threat",
                risk.id
            )));
        }
        if !seen.insert(risk.id.as_str()) {
            return Err(CoreError::validation(format!(
                "duplicate risk id '{}'",
                risk.id
            )));
        }
    }
    Ok(())
}

fn validate_tasks(tasks: &[Task]) -> CoreResult<()> {
    let mut seen = HashSet::new();
    for task in tasks {
        if task.id.trim().is_empty() {
            return Err(CoreError::validation("task has an empty id"));
        }
        if task.description.trim().is_empty() {
            return Err(CoreError::validation(format!(
                "task '{}' has an empty description",
                task.id
            )));
        }
        if !seen.insert(task.id.as_str()) {
            return Err(CoreError::validation(format!(
                "duplicate task id '{}'",
                task.id
            )));
        }
    }
    Ok(())
}

// ── Service payload shapes ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    project_name: Option<String>,
    risks: Option<Vec<RawRisk>>,
    tasks: Option<Vec<RawTask>>,
}

#[derive(Debug, Deserialize)]
struct RawRisk {
    id: Option<Value>,
    threat: Option<String>,
    probability: Option<Value>,
    mitigation: Option<String>,
    severity: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTask {
    id: Option<Value>,
    description: Option<String>,
}

impl RawRisk {
    fn into_risk(self, index: usize) -> CoreResult<Risk> {
        let id = self.id.as_ref().and_then(scalar_text).ok_or_else(|| {
            CoreError::validation(format!("risk #{} is missing an 'id'", index + 1))
        })?;
        let threat = self
            .threat
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| CoreError::validation(format!("risk '{}' is missing a 'threat'", id)))?;

        Ok(Risk {
            probability: self.probability.as_ref().map(probability_value).unwrap_or(0),
            mitigation: self.mitigation.unwrap_or_default(),
            severity: self
                .severity
                .as_deref()
                .map(Severity::from)
                .unwrap_or(Severity::Unrecognized),
            selected: false,
            id,
            threat,
        })
    }
}

impl RawTask {
    fn into_task(self, index: usize) -> CoreResult<Task> {
        let id = self.id.as_ref().and_then(scalar_text).ok_or_else(|| {
            CoreError::validation(format!("task #{} is missing an 'id'", index + 1))
        })?;
        let description = self
            .description
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| {
                CoreError::validation(format!("task '{}' is missing a 'description'", id))
            })?;
        Ok(Task::new(id, description))
    }
}

/// Identifiers may arrive as strings or bare numbers.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Accepts `85`, `85.4` or `"85%"`; anything else reads as 0.
fn probability_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().unwrap_or(0),
        _ => 0,
    }
}

// ── Default seed ───────────────────────────────────────────────────────

fn seed_risk(id: &str, threat: &str, probability: i64, mitigation: &str, severity: Severity) -> Risk {
    Risk {
        id: id.to_string(),
        threat: threat.to_string(),
        probability,
        mitigation: mitigation.to_string(),
        severity,
        selected: false,
    }
}

fn seed_task(id: &str, description: &str, is_completed: bool) -> Task {
    Task {
        is_completed,
        ..Task::new(id, description)
    }
}

impl Default for AnalysisData {
    /// The example project shown before any analysis has run.
    fn default() -> Self {
        Self {
            project_name: "Global Company Rebrand".to_string(),
            risks: vec![
                seed_risk(
                    "r1",
                    "Stakeholder misalignment on new visual identity",
                    85,
                    "Conduct preliminary mood-board workshops with key execs before design phase.",
                    Severity::High,
                ),
                seed_risk(
                    "r2",
                    "SEO ranking drop during domain transition",
                    70,
                    "Implement comprehensive 301 redirect map and keep old domain active for 12 months.",
                    Severity::Critical,
                ),
                seed_risk(
                    "r3",
                    "Employee resistance to cultural shift",
                    60,
                    "Launch internal 'Ambassador Program' 4 weeks prior to public reveal.",
                    Severity::Medium,
                ),
                seed_risk(
                    "r4",
                    "Budget overrun due to asset reprint scope creep",
                    45,
                    "Freeze asset list by Week 2; strict approval process for add-ons.",
                    Severity::Low,
                ),
            ],
            tasks: vec![
                seed_task("t1", "Audit current brand assets and digital touchpoints", true),
                seed_task("t2", "Define core brand values and voice guidelines", true),
                seed_task("t3", "Secure executive sign-off on new logo concepts", false),
                seed_task("t4", "Develop comprehensive brand book (PDF & Web)", false),
                seed_task("t5", "Update social media profiles and bio links", false),
                seed_task("t6", "Prepare internal launch presentation deck", false),
                seed_task("t7", "Coordinate press release with PR agency", false),
                seed_task("t8", "Update email signatures company-wide", false),
                seed_task("t9", "Replace exterior signage at HQ", false),
                seed_task("t10", "Host launch party for employees", false),
            ],
            manifesto: None,
            logo_url: None,
        }
    }
}
