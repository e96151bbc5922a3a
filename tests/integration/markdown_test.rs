//! Line-Markdown Renderer Integration Tests
//!
//! Renderer behaviour as seen by the manifesto panel.

use project_launcher::views::render_manifesto;
use project_launcher_core::{render_markdown, MarkdownBlock, TextRun};

#[test]
fn test_one_block_per_line_in_order() {
    let text = "# Title\n## Section\n### Detail\n- item\nPlain **bold** text\n\nclosing line";
    let blocks = render_markdown(text);

    assert_eq!(blocks.len(), text.lines().count());
    assert_eq!(
        blocks,
        vec![
            MarkdownBlock::Heading { level: 1, text: "Title".to_string() },
            MarkdownBlock::Heading { level: 2, text: "Section".to_string() },
            MarkdownBlock::Heading { level: 3, text: "Detail".to_string() },
            MarkdownBlock::ListItem { text: "item".to_string() },
            MarkdownBlock::Paragraph {
                runs: vec![
                    TextRun::plain("Plain "),
                    TextRun::bold("bold"),
                    TextRun::plain(" text"),
                ],
            },
            MarkdownBlock::Blank,
            MarkdownBlock::Paragraph { runs: vec![TextRun::plain("closing line")] },
        ]
    );
}

#[test]
fn test_empty_and_blank_inputs() {
    assert!(render_markdown("").is_empty());
    assert_eq!(render_markdown("  \n\t"), vec![MarkdownBlock::Blank; 2]);
}

#[test]
fn test_manifesto_panel_renders_every_block() {
    let out = render_manifesto("# Launch\n- **Ship** weekly\nWe **win** together");
    assert_eq!(out.lines().collect::<Vec<_>>(), vec!["LAUNCH", "  * **Ship** weekly", "We *WIN* together"]);
}
