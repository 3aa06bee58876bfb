//! Final text rendering.

use crate::aggregation::text_block::TextBlock;

/// Concatenate blocks in ascending reading order.
///
/// A blank line separates blocks of differing types (header to paragraph,
/// paragraph to list, and so on); consecutive blocks of the same type are
/// separated by a single newline. Blocks without text are skipped.
pub fn render_text(blocks: &[TextBlock]) -> String {
    let mut ordered: Vec<&TextBlock> = blocks
        .iter()
        .filter(|b| !b.text.trim().is_empty())
        .collect();
    ordered.sort_by_key(|b| b.reading_order);

    let mut out = String::new();
    let mut previous: Option<&TextBlock> = None;
    for block in ordered {
        if let Some(prev) = previous {
            if prev.block_type != block.block_type {
                out.push_str("\n\n");
            } else {
                out.push('\n');
            }
        }
        out.push_str(block.text.trim());
        previous = Some(block);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::text_block::BlockType;
    use crate::extraction::TextFragment;
    use crate::geometry::Rect;

    fn block(text: &str, block_type: BlockType, order: usize) -> TextBlock {
        let f = TextFragment::new(text, Rect::new(20.0, order as f32 * 40.0, 300.0, 14.0), 0.9);
        let mut b = TextBlock::from_fragments(order, &[&f]).unwrap();
        b.block_type = block_type;
        b.reading_order = order;
        b
    }

    #[test]
    fn test_render_follows_reading_order() {
        let blocks = vec![
            block("second", BlockType::Paragraph, 1),
            block("first", BlockType::Paragraph, 0),
        ];
        assert_eq!(render_text(&blocks), "first\nsecond");
    }

    #[test]
    fn test_blank_line_between_differing_types() {
        let blocks = vec![
            block("Title", BlockType::Header, 0),
            block("Body text.", BlockType::Paragraph, 1),
            block("More body.", BlockType::Paragraph, 2),
            block("- item", BlockType::List, 3),
        ];
        assert_eq!(
            render_text(&blocks),
            "Title\n\nBody text.\nMore body.\n\n- item"
        );
    }

    #[test]
    fn test_empty_blocks_are_skipped() {
        let mut blank = block("placeholder", BlockType::Paragraph, 1);
        blank.text = "   ".to_string();
        let blocks = vec![block("only", BlockType::Paragraph, 0), blank];
        assert_eq!(render_text(&blocks), "only");
        assert_eq!(render_text(&[]), "");
    }
}
