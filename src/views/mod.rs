//! Terminal Views
//!
//! Text rendering of the session: the brief form, the processing screen and
//! the results panels. Every function is pure; the binary decides where the
//! output goes.

use serde::{Deserialize, Serialize};

use project_launcher_core::{render_markdown, AnalysisData, MarkdownBlock, Risk, Task, TextRun};

use crate::models::session::{Session, TabState, ViewState};

const RULE_WIDTH: usize = 60;
const PROGRESS_BAR_WIDTH: usize = 20;

/// Summary counters shown above the result panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionStats {
    pub risk_count: usize,
    pub pending_task_count: usize,
    pub selected_risk_count: usize,
    /// Completed tasks, percent
    pub progress: u32,
}

impl From<&AnalysisData> for MissionStats {
    fn from(data: &AnalysisData) -> Self {
        Self {
            risk_count: data.risks.len(),
            pending_task_count: data.pending_task_count(),
            selected_risk_count: data.selected_risk_count(),
            progress: data.task_progress(),
        }
    }
}

/// Render whichever view the session is in.
pub fn render_session(session: &Session) -> String {
    match session.view {
        ViewState::Input => render_input(session),
        ViewState::Processing => render_processing(),
        ViewState::Results => render_results(session),
    }
}

/// Brief form, with the last analysis error if there is one.
pub fn render_input(session: &Session) -> String {
    let mut out = String::new();
    push_line(&mut out, "PROJECT LAUNCHER");
    push_line(&mut out, rule());
    push_line(&mut out, "Describe your mission. Type `analyze <brief>` to run a pre-mortem.");
    push_line(&mut out, "Example: analyze Launch a B2B podcast in Q4 aimed at CTOs");

    if let Some(error) = &session.error {
        out.push('\n');
        push_line(&mut out, format!("+{}+", "-".repeat(RULE_WIDTH - 2)));
        push_line(&mut out, "| ANALYSIS FAILED");
        for line in error.lines() {
            push_line(&mut out, format!("| {}", line));
        }
        push_line(&mut out, format!("+{}+", "-".repeat(RULE_WIDTH - 2)));
    }
    out
}

pub fn render_processing() -> String {
    let mut out = String::new();
    push_line(&mut out, "ANALYZING MISSION PARAMETERS...");
    push_line(&mut out, "Running pre-mortem, identifying failure modes, atomizing the plan.");
    out
}

/// Title, tab strip, stats and the active panel.
pub fn render_results(session: &Session) -> String {
    let data = &session.data;
    let mut out = String::new();

    push_line(&mut out, data.project_name.to_uppercase());
    push_line(&mut out, rule());
    push_line(&mut out, render_tab_strip(session));
    out.push('\n');
    out.push_str(&render_stats(&MissionStats::from(data)));
    out.push('\n');

    match session.active_tab {
        TabState::PreMortem => {
            out.push_str(&render_risks(&data.risks, session.is_generating_manifesto))
        }
        TabState::Atomizer => out.push_str(&render_tasks(&data.tasks, data.task_progress())),
        TabState::Manifesto => match &data.manifesto {
            Some(manifesto) => out.push_str(&render_manifesto(manifesto)),
            // the reducer never selects this tab without a manifesto
            None => out.push_str(&render_risks(&data.risks, session.is_generating_manifesto)),
        },
    }

    out.push('\n');
    out.push_str(&render_patch(session));
    out
}

/// Tab labels with the active one bracketed. The manifesto tab appears
/// only once a manifesto exists.
pub fn render_tab_strip(session: &Session) -> String {
    session
        .available_tabs()
        .into_iter()
        .map(|tab| {
            if tab == session.active_tab {
                format!("[{}]", tab.label())
            } else {
                format!(" {} ", tab.label())
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn render_stats(stats: &MissionStats) -> String {
    let mut out = String::new();
    push_line(&mut out, "MISSION STATS");
    push_line(&mut out, format!("  Risks identified : {}", stats.risk_count));
    push_line(&mut out, format!("  Pending actions  : {}", stats.pending_task_count));
    out
}

/// Numbered risk cards followed by the plan update hint.
pub fn render_risks(risks: &[Risk], is_generating: bool) -> String {
    let mut out = String::new();
    push_line(&mut out, "PRE-MORTEM ANALYSIS");

    for (index, risk) in risks.iter().enumerate() {
        let marker = if risk.selected { "[x]" } else { "[ ]" };
        out.push('\n');
        push_line(
            &mut out,
            format!(
                "{} #{:02} [{}] {}  ({})",
                marker,
                index + 1,
                risk.severity.style().label,
                risk.threat,
                risk.id
            ),
        );
        push_line(&mut out, format!("      Probability: {}%", risk.probability));
        push_line(&mut out, format!("      Mitigation:  {}", risk.mitigation));
    }

    let selected = risks.iter().filter(|r| r.selected).count();
    out.push('\n');
    if is_generating {
        push_line(&mut out, ">> Updating business plan...");
    } else if selected == 0 {
        push_line(&mut out, ">> Select mitigations with `risk <id>` to update the business plan");
    } else {
        push_line(
            &mut out,
            format!(">> Update business plan ({} selected): type `manifesto`", selected),
        );
    }
    out
}

/// Progress bar and numbered task rows.
pub fn render_tasks(tasks: &[Task], progress: u32) -> String {
    let mut out = String::new();
    push_line(&mut out, format!("ATOMIZER  {}% COMPLETE", progress));
    push_line(&mut out, progress_bar(progress));

    for (index, task) in tasks.iter().enumerate() {
        let marker = if task.is_completed { "[x]" } else { "[ ]" };
        push_line(
            &mut out,
            format!("{} SEQ_{:02}  {}  ({})", marker, index + 1, task.description, task.id),
        );
    }
    out
}

/// `[#####---------------]` for a percentage.
pub fn progress_bar(progress: u32) -> String {
    let filled = (progress.min(100) as usize * PROGRESS_BAR_WIDTH + 50) / 100;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(PROGRESS_BAR_WIDTH - filled)
    )
}

/// Manifesto text through the line-markdown renderer.
pub fn render_manifesto(manifesto: &str) -> String {
    let mut out = String::new();
    for block in render_markdown(manifesto) {
        push_line(&mut out, render_block(&block));
    }
    out
}

/// One markdown block as a terminal line.
pub fn render_block(block: &MarkdownBlock) -> String {
    match block {
        MarkdownBlock::Heading { level: 1, text } => text.to_uppercase(),
        MarkdownBlock::Heading { level: 2, text } => format!("== {} ==", text),
        MarkdownBlock::Heading { text, .. } => format!("-- {}", text),
        MarkdownBlock::ListItem { text } => format!("  * {}", text),
        MarkdownBlock::Paragraph { runs } => runs.iter().map(render_run).collect(),
        MarkdownBlock::Blank => String::new(),
    }
}

fn render_run(run: &TextRun) -> String {
    if run.emphasis {
        format!("*{}*", run.text.to_uppercase())
    } else {
        run.text.clone()
    }
}

fn render_patch(session: &Session) -> String {
    if session.is_generating_logo {
        return "MISSION PATCH: generating...\n".to_string();
    }
    match &session.data.logo_url {
        Some(uri) => format!("MISSION PATCH: {}\n", abbreviate_uri(uri)),
        None => "MISSION PATCH: none (type `patch` to generate)\n".to_string(),
    }
}

/// Data URIs are megabytes of base64; show the header and the size.
fn abbreviate_uri(uri: &str) -> String {
    match uri.split_once(',') {
        Some((header, payload)) if header.starts_with("data:") => {
            format!("{},... ({} bytes)", header, payload.len())
        }
        _ => uri.to_string(),
    }
}

/// Append one line and its newline terminator.
fn push_line(out: &mut String, line: impl AsRef<str>) {
    out.push_str(line.as_ref());
    out.push('\n');
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}
