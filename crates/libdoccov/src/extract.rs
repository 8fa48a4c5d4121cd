//! Pulls candidate identifier mentions out of documentation blocks.

use crate::tokenize::{Block, BlockKind};

/// Returns true for the block kinds that can name a routine: list items and
/// headings at levels 2 through 4.
pub fn is_candidate_block(kind: BlockKind) -> bool {
    matches!(kind, BlockKind::Item | BlockKind::Heading(2..=4))
}

/// Splits every candidate block into raw tokens.
///
/// One entry may document several routines ("foo, bar | baz"), so each
/// whitespace, comma, pipe or slash separated fragment is its own candidate.
pub fn extract(blocks: &[Block]) -> Vec<String> {
    blocks
        .iter()
        .filter(|block| is_candidate_block(block.kind))
        .flat_map(|block| {
            block
                .text
                .split(|c: char| c.is_whitespace() || matches!(c, ',' | '|' | '/'))
                .filter(|token| !token.is_empty())
                .map(str::to_string)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_recognized_kinds() {
        assert!(is_candidate_block(BlockKind::Item));
        assert!(is_candidate_block(BlockKind::Heading(2)));
        assert!(is_candidate_block(BlockKind::Heading(3)));
        assert!(is_candidate_block(BlockKind::Heading(4)));
        assert!(!is_candidate_block(BlockKind::Heading(1)));
        assert!(!is_candidate_block(BlockKind::Heading(5)));
        assert!(!is_candidate_block(BlockKind::Paragraph));
        assert!(!is_candidate_block(BlockKind::Code));
    }

    #[test]
    fn test_extract_splits_multi_entries() {
        let blocks = vec![
            Block::new(BlockKind::Heading(1), "Ignored title"),
            Block::new(BlockKind::Item, "foo, bar |baz"),
            Block::new(BlockKind::Paragraph, "prose mentions qux"),
            Block::new(BlockKind::Heading(3), "read/write\nnext_line"),
            Block::new(BlockKind::Code, "hidden()"),
            Block::new(BlockKind::Item, ""),
        ];
        assert_eq!(
            extract(&blocks),
            vec!["foo", "bar", "baz", "read", "write", "next_line"]
        );
    }
}
