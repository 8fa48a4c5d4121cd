//! Splits documentation sources into Markdown block events.
//!
//! This is deliberately a line-oriented reader, not a full CommonMark parser.
//! It recognizes exactly what the extractor cares about: headings and list
//! items, with fenced code kept out of the way.

use std::{fs, path::Path};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;

/// ATX heading: up to three spaces of indent, 1-6 hashes, optional closing hashes.
static HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ {0,3}(#{1,6})(?:[ \t]+(.*?))?(?:[ \t]+#+)?[ \t]*$")
        .expect("heading pattern must compile")
});
/// Bullet or ordered list item marker.
static ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*(?:[-*+]|\d{1,9}[.)])(?:[ \t]+(.*))?$").expect("item pattern must compile")
});
/// Setext heading underline: `===` for level 1, `---` for level 2.
static SETEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}(=+|-+)[ \t]*$").expect("setext pattern must compile"));
/// Opening or closing code fence.
static FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*(`{3,}|~{3,})").expect("fence pattern must compile"));

/// The kind of a documentation block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// An ATX heading with its nesting level (1-6).
    Heading(u8),
    /// A list item.
    Item,
    /// Running text.
    Paragraph,
    /// A fenced code block.
    Code,
}

/// One block event: its kind and raw text, markers removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// What sort of block this is.
    pub kind: BlockKind,
    /// The block's text. Continuation lines are joined with `\n`.
    pub text: String,
}

impl Block {
    /// Creates a block of the given kind.
    pub fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Turns a documentation source file into block events.
pub trait DocTokenizer: Send {
    /// Reads `path` and returns its blocks in document order.
    fn tokenize(&self, path: &Path) -> Result<Vec<Block>>;
}

/// Tokenizer for Markdown files and the `//!` docs of Rust source files.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownTokenizer;

impl DocTokenizer for MarkdownTokenizer {
    fn tokenize(&self, path: &Path) -> Result<Vec<Block>> {
        let content = fs::read_to_string(path)?;
        let markdown = if path.extension().is_some_and(|ext| ext == "rs") {
            inner_docs(&content)
        } else {
            content
        };
        Ok(self.tokenize_str(&markdown))
    }
}

impl MarkdownTokenizer {
    /// Splits Markdown text into blocks.
    pub fn tokenize_str(&self, source: &str) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut open: Option<Block> = None;
        let mut fence: Option<String> = None;

        for line in source.lines() {
            if let Some(marker) = &fence {
                if line.trim_start().starts_with(marker.as_str()) {
                    fence = None;
                    blocks.extend(open.take());
                } else if let Some(block) = open.as_mut() {
                    push_line(block, line);
                }
                continue;
            }

            if let Some(caps) = FENCE.captures(line) {
                blocks.extend(open.take());
                fence = Some(caps[1].to_string());
                open = Some(Block::new(BlockKind::Code, ""));
                continue;
            }

            if line.trim().is_empty() {
                blocks.extend(open.take());
                continue;
            }

            if let Some(block) = open.as_mut().filter(|b| b.kind == BlockKind::Paragraph) {
                if let Some(caps) = SETEXT.captures(line) {
                    let level = if caps[1].starts_with('=') { 1 } else { 2 };
                    block.kind = BlockKind::Heading(level);
                    blocks.extend(open.take());
                    continue;
                }
            }

            if let Some(caps) = HEADING.captures(line) {
                blocks.extend(open.take());
                let level = caps[1].len() as u8;
                let text = caps.get(2).map_or("", |m| m.as_str());
                blocks.push(Block::new(BlockKind::Heading(level), text));
                continue;
            }

            if let Some(caps) = ITEM.captures(line) {
                blocks.extend(open.take());
                let text = caps.get(1).map_or("", |m| m.as_str());
                open = Some(Block::new(BlockKind::Item, text.trim_end()));
                continue;
            }

            match open.as_mut() {
                Some(block) => push_line(block, line.trim()),
                None => open = Some(Block::new(BlockKind::Paragraph, line.trim())),
            }
        }

        blocks.extend(open);
        blocks
    }
}

/// Appends a continuation line to a block.
fn push_line(block: &mut Block, line: &str) {
    if !block.text.is_empty() {
        block.text.push('\n');
    }
    block.text.push_str(line);
}

/// Collects the `//!` inner doc comment lines of a Rust source file as Markdown.
///
/// Code between doc comment runs becomes a blank line so that blocks from
/// separate runs never merge.
fn inner_docs(source: &str) -> String {
    let mut out = String::new();
    for line in source.lines() {
        match line.trim_start().strip_prefix("//!") {
            Some(doc) => out.push_str(doc.strip_prefix(' ').unwrap_or(doc)),
            None => {
                if !out.is_empty() && !out.ends_with("\n\n") {
                    out.push('\n');
                }
                continue;
            }
        }
        out.push('\n');
    }
    out
}
