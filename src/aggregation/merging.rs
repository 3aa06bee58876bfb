//! Contextual block merging and deduplication.

use indexmap::IndexSet;

use crate::aggregation::text_block::{BlockType, TextBlock};
use crate::config::LayoutConfig;

/// Number of words taken from each side of a block boundary when scoring
/// text continuity.
const CONTEXT_WORDS: usize = 3;

/// Merge contextually adjacent blocks, one forward pass in reading order.
///
/// Two blocks merge when they share a column and a type, the vertical gap
/// between them is small enough, and the end of the first flows into the
/// start of the second. A merged block keeps absorbing followers, so a
/// paragraph split across three fragments collapses in one pass. Table
/// blocks never merge.
pub fn merge_adjacent_blocks(blocks: Vec<TextBlock>, config: &LayoutConfig) -> Vec<TextBlock> {
    let mut ordered = blocks;
    ordered.sort_by_key(|b| b.reading_order);

    let mut merged: Vec<TextBlock> = Vec::new();
    for block in ordered {
        match merged.last_mut() {
            Some(prev) if can_merge(prev, &block, config) => {
                log::debug!("merging block {} into block {}", block.id, prev.id);
                absorb(prev, block);
            }
            _ => merged.push(block),
        }
    }
    merged
}

fn can_merge(a: &TextBlock, b: &TextBlock, config: &LayoutConfig) -> bool {
    if a.block_type == BlockType::Table || b.block_type == BlockType::Table {
        return false;
    }
    if a.column != b.column || a.block_type != b.block_type {
        return false;
    }
    let gap = b.bbox.top() - a.bbox.bottom();
    if gap > config.max_block_gap {
        return false;
    }
    continuity_score(a, b) > config.block_similarity
}

/// Merge `b` into `a`: texts joined with a single space, regions and boxes
/// unioned, confidence averaged, the lower reading-order index kept.
fn absorb(a: &mut TextBlock, b: TextBlock) {
    a.text.push(' ');
    a.text.push_str(&b.text);
    a.bbox = a.bbox.union(&b.bbox);
    a.regions.extend(b.regions);
    a.confidence = (a.confidence + b.confidence) / 2.0;
    a.reading_order = a.reading_order.min(b.reading_order);
    a.rtl = a.rtl || b.rtl;
}

/// Score how strongly the end of `a` continues into the start of `b`.
///
/// Takes the last words of `a` and the first words of `b` (normalized), and
/// measures the longest character suffix of the first that prefixes the
/// second, as a fraction of the first's length. A block ending "the
/// following articles" scores high against one starting "following articles
/// shall apply".
pub fn continuity_score(a: &TextBlock, b: &TextBlock) -> f32 {
    let tail = edge_words(&a.normalized_text(), CONTEXT_WORDS, true);
    let head = edge_words(&b.normalized_text(), CONTEXT_WORDS, false);
    if tail.is_empty() || head.is_empty() {
        return 0.0;
    }

    let tail_chars: Vec<char> = tail.chars().collect();
    for start in 0..tail_chars.len() {
        let suffix: String = tail_chars[start..].iter().collect();
        if head.starts_with(&suffix) {
            return (tail_chars.len() - start) as f32 / tail_chars.len() as f32;
        }
    }
    0.0
}

/// The last (`from_end`) or first words of a text, joined by single spaces.
fn edge_words(text: &str, count: usize, from_end: bool) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if from_end {
        let start = words.len().saturating_sub(count);
        words[start..].join(" ")
    } else {
        let end = count.min(words.len());
        words[..end].join(" ")
    }
}

/// Drop blocks whose normalized text has already been seen.
///
/// Exact-normalized-match only; no fuzzy comparison. The first occurrence
/// wins, keeping its reading-order position.
pub fn dedup_blocks(blocks: Vec<TextBlock>) -> Vec<TextBlock> {
    let mut seen: IndexSet<String> = IndexSet::new();
    blocks
        .into_iter()
        .filter(|block| {
            let keep = seen.insert(block.normalized_text());
            if !keep {
                log::debug!("dropping duplicate block {}", block.id);
            }
            keep
        })
        .collect()
}
