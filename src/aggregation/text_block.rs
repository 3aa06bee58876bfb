//! Text block model and classification.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extraction::TextFragment;
use crate::geometry::Rect;
use crate::tables::Table;

lazy_static! {
    static ref LIST_MARKER: Regex = Regex::new(r"^\s*(?:[-–•*‣▪]|\d+[.)])\s+").unwrap();
    static ref NON_ALNUM: Regex = Regex::new(r"[^\p{L}\p{N}\s]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Fraction of the page height forming the header band.
const HEADER_BAND_FRAC: f32 = 0.15;

/// Fraction of the page height forming the footer band.
const FOOTER_BAND_FRAC: f32 = 0.12;

/// Maximum text length for the header heuristic.
const HEADER_MAX_CHARS: usize = 80;

/// Fraction of letters that must come from right-to-left scripts for a
/// block to be flagged RTL.
const RTL_RATIO: f32 = 0.3;

/// Classification of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    /// Page or section heading
    Header,
    /// Body prose
    Paragraph,
    /// Bulleted or numbered list item
    List,
    /// Flattened table content
    Table,
    /// Page footer
    Footer,
}

/// A block of recognized text with layout metadata.
///
/// Created once per spatial cluster of fragments (or per table), possibly
/// merged with a following block, finally ordered and rendered. Never split.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    /// Block identifier, unique within one page analysis
    pub id: usize,
    /// Concatenated text
    pub text: String,
    /// Source fragment bounds that contributed to the block
    pub regions: Vec<Rect>,
    /// Union of all regions
    pub bbox: Rect,
    /// Mean fragment confidence
    pub confidence: f32,
    /// Block classification
    pub block_type: BlockType,
    /// Column index; -1 means the block spans multiple columns
    pub column: i32,
    /// Position in the final reading sequence (assigned, not inherent)
    pub reading_order: usize,
    /// True when the text is predominantly right-to-left
    pub rtl: bool,
}

impl TextBlock {
    /// Build a block from a cluster of fragments, joining texts with single
    /// spaces in cluster order. Returns `None` for clusters with no usable
    /// text.
    pub fn from_fragments(id: usize, fragments: &[&TextFragment]) -> Option<Self> {
        let parts: Vec<&str> = fragments
            .iter()
            .map(|f| f.text.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if parts.is_empty() {
            return None;
        }
        let text = parts.join(" ");

        let regions: Vec<Rect> = fragments.iter().map(|f| f.bbox).collect();
        let bbox = regions
            .iter()
            .skip(1)
            .fold(regions[0], |acc, r| acc.union(r));
        let confidence =
            fragments.iter().map(|f| f.confidence).sum::<f32>() / fragments.len() as f32;
        let rtl = is_rtl_text(&text);

        Some(Self {
            id,
            text,
            regions,
            bbox,
            confidence,
            block_type: BlockType::Paragraph,
            column: 0,
            reading_order: 0,
            rtl,
        })
    }

    /// Build a block carrying a table's flattened content, so tables take
    /// part in the reading-order stream.
    pub fn from_table(id: usize, table: &Table) -> Option<Self> {
        let text = table.flattened_text();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            id,
            text,
            regions: vec![table.bbox],
            bbox: table.bbox,
            confidence: table.confidence,
            block_type: BlockType::Table,
            column: 0,
            reading_order: 0,
            rtl: false,
        })
    }

    /// Classify the block from its position and text.
    ///
    /// Short text near the page top reads as a header, a leading bullet or
    /// numbering marker as a list item, text in the bottom band as a footer;
    /// everything else stays a paragraph. Table blocks keep their type.
    pub fn classify(&mut self, page: &Rect) {
        if self.block_type == BlockType::Table {
            return;
        }
        let center_y = self.bbox.center().y;
        self.block_type = if center_y <= page.top() + page.height * HEADER_BAND_FRAC
            && self.text.chars().count() <= HEADER_MAX_CHARS
        {
            BlockType::Header
        } else if LIST_MARKER.is_match(&self.text) {
            BlockType::List
        } else if center_y >= page.bottom() - page.height * FOOTER_BAND_FRAC {
            BlockType::Footer
        } else {
            BlockType::Paragraph
        };
    }

    /// Canonical form used for merging and deduplication: lower-cased,
    /// punctuation stripped, whitespace collapsed.
    pub fn normalized_text(&self) -> String {
        let lowered = self.text.to_lowercase();
        let stripped = NON_ALNUM.replace_all(&lowered, "");
        WHITESPACE.replace_all(&stripped, " ").trim().to_string()
    }
}

fn is_rtl_char(c: char) -> bool {
    matches!(c,
        '\u{0590}'..='\u{05FF}'   // Hebrew
        | '\u{0600}'..='\u{06FF}' // Arabic
        | '\u{0750}'..='\u{077F}' // Arabic Supplement
        | '\u{FB50}'..='\u{FDFF}' // Arabic Presentation Forms
    )
}

fn is_rtl_text(text: &str) -> bool {
    let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.is_empty() {
        return false;
    }
    let rtl = letters.iter().filter(|c| is_rtl_char(**c)).count();
    rtl as f32 / letters.len() as f32 > RTL_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, x: f32, y: f32, w: f32, h: f32) -> TextFragment {
        TextFragment::new(text, Rect::new(x, y, w, h), 0.9)
    }

    fn block_at(text: &str, y: f32, h: f32) -> TextBlock {
        let f = frag(text, 50.0, y, 200.0, h);
        TextBlock::from_fragments(0, &[&f]).unwrap()
    }

    fn page() -> Rect {
        Rect::new(0.0, 0.0, 600.0, 800.0)
    }

    #[test]
    fn test_block_from_fragments() {
        let a = frag("Hello", 0.0, 0.0, 50.0, 12.0);
        let b = frag("world", 54.0, 0.0, 50.0, 12.0);
        let block = TextBlock::from_fragments(3, &[&a, &b]).unwrap();

        assert_eq!(block.id, 3);
        assert_eq!(block.text, "Hello world");
        assert_eq!(block.regions.len(), 2);
        assert_eq!(block.bbox, Rect::new(0.0, 0.0, 104.0, 12.0));
        assert!((block.confidence - 0.9).abs() < 1e-6);
        assert!(!block.rtl);
    }

    #[test]
    fn test_blank_fragments_make_no_block() {
        let a = frag("  ", 0.0, 0.0, 50.0, 12.0);
        assert!(TextBlock::from_fragments(0, &[&a]).is_none());
        assert!(TextBlock::from_fragments(0, &[]).is_none());
    }

    #[test]
    fn test_classify_header() {
        let mut block = block_at("ANNUAL REPORT", 40.0, 20.0);
        block.classify(&page());
        assert_eq!(block.block_type, BlockType::Header);
    }

    #[test]
    fn test_long_text_near_top_is_not_a_header() {
        let long = "x".repeat(120);
        let mut block = block_at(&long, 40.0, 20.0);
        block.classify(&page());
        assert_eq!(block.block_type, BlockType::Paragraph);
    }

    #[test]
    fn test_classify_list_markers() {
        for text in ["- first item", "• bullet", "1. numbered", "2) also numbered"] {
            let mut block = block_at(text, 400.0, 14.0);
            block.classify(&page());
            assert_eq!(block.block_type, BlockType::List, "marker in {text:?}");
        }
    }

    #[test]
    fn test_classify_footer() {
        let mut block = block_at("Page 7 of 12", 760.0, 14.0);
        block.classify(&page());
        assert_eq!(block.block_type, BlockType::Footer);
    }

    #[test]
    fn test_classify_body_paragraph() {
        let mut block = block_at("An ordinary sentence in the middle.", 400.0, 14.0);
        block.classify(&page());
        assert_eq!(block.block_type, BlockType::Paragraph);
    }

    #[test]
    fn test_table_blocks_keep_their_type() {
        let f = frag("1. cell", 50.0, 40.0, 200.0, 14.0);
        let mut block = TextBlock::from_fragments(0, &[&f]).unwrap();
        block.block_type = BlockType::Table;
        block.classify(&page());
        assert_eq!(block.block_type, BlockType::Table);
    }

    #[test]
    fn test_normalized_text() {
        let block = block_at("  The QUICK,   brown. Fox!  ", 400.0, 14.0);
        assert_eq!(block.normalized_text(), "the quick brown fox");
    }

    #[test]
    fn test_rtl_detection() {
        let hebrew = block_at("שלום עולם", 400.0, 14.0);
        assert!(hebrew.rtl);

        let mixed_mostly_latin = block_at("Article 12 שלום of the code", 400.0, 14.0);
        assert!(!mixed_mostly_latin.rtl);
    }
}
