use algo_lsp_core::fold_ranges;
use tower_lsp::lsp_types::*;

use crate::document::Document;

/// Folding ranges for every block of the document.
///
/// LSP ranges are inclusive of `end_line`, so the fold stops on the line
/// before the closing keyword and leaves the closer visible.
pub fn get_folding_ranges(doc: &Document) -> Vec<FoldingRange> {
    fold_ranges(doc.lines())
        .into_iter()
        .map(|range| FoldingRange {
            start_line: range.start.line as u32,
            start_character: Some(doc.to_lsp_position(range.start).character),
            end_line: (range.end.line - 1) as u32,
            end_character: None,
            kind: Some(FoldingRangeKind::Region),
            collapsed_text: None,
        })
        .collect()
}
