//! Line-Markdown Renderer
//!
//! Classifies manifesto text into display blocks, one block per input line.
//! Only a small subset of markdown is recognized: `#`/`##`/`###` headings,
//! `- ` list items, `**` emphasis runs and blank spacer lines. Anything else
//! is a plain paragraph.
//!
//! Classification is pure and line-local; no block depends on its
//! neighbours, and turning blocks into output is left to the caller.

use serde::{Deserialize, Serialize};

/// Marker that opens and closes an emphasized run.
const EMPHASIS_DELIMITER: &str = "**";

/// Marker that opens a list item.
const LIST_MARKER: &str = "- ";

/// A run of text inside a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    /// Rendered bold when true
    pub emphasis: bool,
}

impl TextRun {
    /// Create a plain run
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasis: false,
        }
    }

    /// Create an emphasized run
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasis: true,
        }
    }
}

/// A display block produced from exactly one input line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkdownBlock {
    /// `#`, `##` or `###` heading (level 1..=3)
    Heading { level: u8, text: String },
    /// `- ` list item
    ListItem { text: String },
    /// Paragraph made of plain and emphasized runs
    Paragraph { runs: Vec<TextRun> },
    /// Empty or whitespace-only line
    Blank,
}

impl MarkdownBlock {
    /// Concatenated text of the block, ignoring emphasis.
    pub fn plain_text(&self) -> String {
        match self {
            MarkdownBlock::Heading { text, .. } | MarkdownBlock::ListItem { text } => text.clone(),
            MarkdownBlock::Paragraph { runs } => runs.iter().map(|r| r.text.as_str()).collect(),
            MarkdownBlock::Blank => String::new(),
        }
    }

    /// Whether this block is a heading of any level
    pub fn is_heading(&self) -> bool {
        matches!(self, MarkdownBlock::Heading { .. })
    }
}

/// Classify a single line. First matching rule wins:
/// `### `, `## `, `# `, trimmed `- `, `**` emphasis, blank, paragraph.
pub fn classify_line(line: &str) -> MarkdownBlock {
    for (marker, level) in [("### ", 3u8), ("## ", 2), ("# ", 1)] {
        if let Some(rest) = line.strip_prefix(marker) {
            return MarkdownBlock::Heading {
                level,
                text: rest.to_string(),
            };
        }
    }

    if line.trim().starts_with(LIST_MARKER) {
        // trim() guarantees the marker is present
        let start = line.find(LIST_MARKER).unwrap_or(0) + LIST_MARKER.len();
        return MarkdownBlock::ListItem {
            text: line[start..].to_string(),
        };
    }

    if line.contains(EMPHASIS_DELIMITER) {
        return MarkdownBlock::Paragraph {
            runs: split_emphasis(line),
        };
    }

    if line.trim().is_empty() {
        return MarkdownBlock::Blank;
    }

    MarkdownBlock::Paragraph {
        runs: vec![TextRun::plain(line)],
    }
}

/// Odd segments are emphasized. An unbalanced delimiter is not searched
/// for a closing partner; the trailing segment just follows parity.
fn split_emphasis(line: &str) -> Vec<TextRun> {
    line.split(EMPHASIS_DELIMITER)
        .enumerate()
        .filter(|(_, segment)| !segment.is_empty())
        .map(|(index, segment)| TextRun {
            text: segment.to_string(),
            emphasis: index % 2 == 1,
        })
        .collect()
}

/// Lazily classify every line of `text`.
///
/// The iterator is `Clone`, so a consumer can restart it without touching
/// the source again. Empty input yields nothing.
pub fn iter_markdown(text: &str) -> impl Iterator<Item = MarkdownBlock> + Clone + '_ {
    let lines = if text.is_empty() {
        None
    } else {
        Some(text.split('\n'))
    };
    lines
        .into_iter()
        .flatten()
        .map(|line| classify_line(line.strip_suffix('\r').unwrap_or(line)))
}

/// Classify every line of `text` into a materialized block list.
pub fn render_markdown(text: &str) -> Vec<MarkdownBlock> {
    iter_markdown(text).collect()
}
