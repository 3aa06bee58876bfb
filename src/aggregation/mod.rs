//! Reading-order aggregation.
//!
//! Turns the per-zone text blocks into a single ordered document text:
//! classifies each block and the overall flow, assigns columns and reading
//! order, merges blocks that continue each other, drops duplicates, and
//! renders the result.

pub mod flow;
pub mod merging;
pub mod reading_order;
pub mod render;
pub mod text_block;

pub use flow::{assign_column, classify_flow, compute_structure, DocumentStructure, FlowKind};
pub use merging::{dedup_blocks, merge_adjacent_blocks};
pub use reading_order::assign_reading_order;
pub use render::render_text;
pub use text_block::{BlockType, TextBlock};

use crate::config::LayoutConfig;
use crate::geometry::Rect;

/// Output of one aggregation run.
#[derive(Debug, Clone)]
pub struct AggregationResult {
    /// Final ordered page text
    pub text: String,
    /// Final block set, merged and deduplicated
    pub blocks: Vec<TextBlock>,
    /// Derived layout summary
    pub structure: DocumentStructure,
}

/// Run the whole aggregation chain over freshly built blocks.
pub fn aggregate_blocks(
    mut blocks: Vec<TextBlock>,
    page: &Rect,
    config: &LayoutConfig,
) -> AggregationResult {
    for block in &mut blocks {
        block.classify(page);
        block.column = assign_column(&block.bbox, page.width);
    }

    let flow = classify_flow(&blocks, page.width);
    log::debug!("page flow classified as {:?}", flow);

    assign_reading_order(&mut blocks, flow);
    let blocks = merge_adjacent_blocks(blocks, config);
    let blocks = dedup_blocks(blocks);

    let structure = compute_structure(&blocks, flow);
    let text = render_text(&blocks);
    AggregationResult {
        text,
        blocks,
        structure,
    }
}
