//! Line-oriented text format for lecture content.
//!
//! Each block occupies one line tagged by a prefix, and blocks are separated
//! by a blank line:
//!
//! ```text
//! # Heading 1
//!
//! ## Heading 2
//!
//! ### Heading 3
//!
//! - list item
//!
//! ![image](https://cdn.example.org/figure.png)
//!
//! Any other line is a paragraph.
//! ```
//!
//! Parsing never fails. A line that does not match a tagged rule (including
//! a malformed image line) is kept as a paragraph.

use std::sync::LazyLock;

use regex::Regex;

use crate::block::{BlockKind, ContentBlock};

/// Separator placed between rendered blocks.
pub const BLOCK_SEPARATOR: &str = "\n\n";

static IMAGE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^!\[[^\]]*\]\(([^)]*)\)$").expect("image line pattern is valid")
});

/// A classification rule: returns the block text when the line matches.
struct LineRule {
    kind: BlockKind,
    extract: fn(&str) -> Option<&str>,
}

/// Evaluated top to bottom; the first match wins.
const LINE_RULES: &[LineRule] = &[
    LineRule {
        kind: BlockKind::Image,
        extract: image_url,
    },
    LineRule {
        kind: BlockKind::Heading1,
        extract: heading1_text,
    },
    LineRule {
        kind: BlockKind::Heading2,
        extract: heading2_text,
    },
    LineRule {
        kind: BlockKind::Heading3,
        extract: heading3_text,
    },
    LineRule {
        kind: BlockKind::List,
        extract: list_text,
    },
];

fn image_url(line: &str) -> Option<&str> {
    IMAGE_LINE
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|found| found.as_str())
}

fn heading1_text(line: &str) -> Option<&str> {
    line.strip_prefix("# ")
}

fn heading2_text(line: &str) -> Option<&str> {
    line.strip_prefix("## ")
}

fn heading3_text(line: &str) -> Option<&str> {
    line.strip_prefix("### ")
}

fn list_text(line: &str) -> Option<&str> {
    line.strip_prefix("- ").or_else(|| line.strip_prefix("* "))
}

/// Classify one trimmed, non-blank line.
pub fn classify_line(line: &str) -> (BlockKind, &str) {
    LINE_RULES
        .iter()
        .find_map(|rule| (rule.extract)(line).map(|text| (rule.kind, text)))
        .unwrap_or((BlockKind::Paragraph, line))
}

/// Parse stored text into blocks with ascending positions.
///
/// Always yields at least one block.
pub fn parse(text: &str) -> Vec<ContentBlock> {
    let mut blocks: Vec<ContentBlock> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(position, line)| {
            let (kind, content) = classify_line(line);
            ContentBlock::new(kind, content, position)
        })
        .collect();

    if blocks.is_empty() {
        blocks.push(ContentBlock::empty_paragraph());
    }
    tracing::debug!(blocks = blocks.len(), "parsed document text");
    blocks
}

/// Render one block. Image blocks without a URL render to an empty string.
pub fn render_block(block: &ContentBlock) -> String {
    match block.kind {
        BlockKind::Heading1 => format!("# {}", block.text),
        BlockKind::Heading2 => format!("## {}", block.text),
        BlockKind::Heading3 => format!("### {}", block.text),
        BlockKind::List => format!("- {}", block.text),
        BlockKind::Paragraph => block.text.clone(),
        BlockKind::Image if block.text.is_empty() => String::new(),
        BlockKind::Image => format!("![image]({})", block.text),
    }
}

/// Whether `block` reads back with the same kind and text once saved.
pub fn survives_round_trip(block: &ContentBlock) -> bool {
    let rendered = render_block(block);
    let mut lines = rendered.lines().map(str::trim).filter(|line| !line.is_empty());
    match (lines.next(), lines.next()) {
        (Some(line), None) => classify_line(line) == (block.kind, block.text.as_str()),
        _ => false,
    }
}

/// Serialize blocks in position order, dropping empty renderings.
pub fn serialize(blocks: &[ContentBlock]) -> String {
    let mut ordered: Vec<&ContentBlock> = blocks.iter().collect();
    ordered.sort_by_key(|block| block.position);
    ordered
        .into_iter()
        .map(render_block)
        .filter(|rendered| !rendered.is_empty())
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_prefixes() {
        assert_eq!(classify_line("# Title"), (BlockKind::Heading1, "Title"));
        assert_eq!(classify_line("## Sub"), (BlockKind::Heading2, "Sub"));
        assert_eq!(classify_line("### Deep"), (BlockKind::Heading3, "Deep"));
        assert_eq!(classify_line("- dash"), (BlockKind::List, "dash"));
        assert_eq!(classify_line("* star"), (BlockKind::List, "star"));
        assert_eq!(
            classify_line("![diagram](https://x.org/a.png)"),
            (BlockKind::Image, "https://x.org/a.png")
        );
        assert_eq!(classify_line("plain"), (BlockKind::Paragraph, "plain"));
    }

    #[test]
    fn prefix_without_space_is_paragraph() {
        assert_eq!(classify_line("#hashtag"), (BlockKind::Paragraph, "#hashtag"));
        assert_eq!(classify_line("-1 degrees"), (BlockKind::Paragraph, "-1 degrees"));
    }

    #[test]
    fn malformed_image_falls_back_to_paragraph() {
        assert_eq!(
            classify_line("![broken](https://x.org/a.png"),
            (BlockKind::Paragraph, "![broken](https://x.org/a.png")
        );
    }

    #[test]
    fn image_with_trailing_text_is_paragraph() {
        let line = "![a](u.png) see above";
        assert_eq!(classify_line(line), (BlockKind::Paragraph, line));
    }

    #[test]
    fn empty_image_is_dropped_when_rendering() {
        let blocks = vec![
            ContentBlock::new(BlockKind::Paragraph, "before", 0),
            ContentBlock::new(BlockKind::Image, "", 1),
            ContentBlock::new(BlockKind::Paragraph, "after", 2),
        ];
        assert_eq!(serialize(&blocks), "before\n\nafter");
    }

    #[test]
    fn serialize_sorts_by_position() {
        let blocks = vec![
            ContentBlock::new(BlockKind::List, "second", 1),
            ContentBlock::new(BlockKind::Heading2, "first", 0),
        ];
        assert_eq!(serialize(&blocks), "## first\n\n- second");
    }

    #[test]
    fn crlf_input_is_accepted() {
        let blocks = parse("# A\r\n\r\nbody\r\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "A");
        assert_eq!(blocks[1].text, "body");
    }
}
