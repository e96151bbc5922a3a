//! Project Launcher Core
//!
//! Foundational error types, the mission domain model and the line-markdown
//! renderer. This crate has zero dependencies on application-level code
//! (generative service clients, configuration, terminal output).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `mission` - Risks, tasks and the `AnalysisData` aggregate
//! - `markdown` - Line-oriented manifesto classification

pub mod error;
pub mod markdown;
pub mod mission;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Mission Model ──────────────────────────────────────────────────────
pub use mission::{tasks_from_service_value, AnalysisData, Risk, Severity, SeverityStyle, Task};

// ── Markdown ───────────────────────────────────────────────────────────
pub use markdown::{classify_line, iter_markdown, render_markdown, MarkdownBlock, TextRun};
