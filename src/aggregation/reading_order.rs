//! Reading-order assignment.

use crate::aggregation::flow::FlowKind;
use crate::aggregation::text_block::{BlockType, TextBlock};
use crate::utils::safe_float_cmp;

/// Sort the blocks into reading order for the given flow and stamp each
/// block's `reading_order` index.
///
/// Linear pages read top to bottom. Columnar pages read column by column:
/// spanning blocks (column -1) first, then column 0, then column 1, each
/// sorted by top edge. Mixed pages put headers first and footers last, with
/// the body ordered columnarly in between.
pub fn assign_reading_order(blocks: &mut [TextBlock], flow: FlowKind) {
    match flow {
        FlowKind::Linear => {
            blocks.sort_by(|a, b| safe_float_cmp(a.bbox.top(), b.bbox.top()));
        }
        FlowKind::Columnar => {
            blocks.sort_by(|a, b| {
                a.column
                    .cmp(&b.column)
                    .then(safe_float_cmp(a.bbox.top(), b.bbox.top()))
            });
        }
        FlowKind::Mixed => {
            blocks.sort_by(|a, b| {
                tier(a)
                    .cmp(&tier(b))
                    .then(a.column.cmp(&b.column))
                    .then(safe_float_cmp(a.bbox.top(), b.bbox.top()))
            });
        }
    }
    for (i, block) in blocks.iter_mut().enumerate() {
        block.reading_order = i;
    }
}

/// Vertical tier for mixed flow: headers above everything, footers below.
fn tier(block: &TextBlock) -> u8 {
    match block.block_type {
        BlockType::Header => 0,
        BlockType::Footer => 2,
        _ => 1,
    }
}
