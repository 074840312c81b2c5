//! Block folding.
//!
//! Foldable constructs are an ordered table of anchored, case-insensitive
//! whole-line patterns. The first pattern accepting a header line owns it, and
//! its closing line is found by a forward scan that counts nested headers of
//! the same pattern.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::position::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Variables,
    Constants,
    Body,
    Conditional,
    Alternative,
    ForLoop,
    WhileLoop,
    RepeatLoop,
    Function,
    Procedure,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Variables => "variables",
            BlockKind::Constants => "constants",
            BlockKind::Body => "body",
            BlockKind::Conditional => "conditional",
            BlockKind::Alternative => "alternative",
            BlockKind::ForLoop => "for_loop",
            BlockKind::WhileLoop => "while_loop",
            BlockKind::RepeatLoop => "repeat_loop",
            BlockKind::Function => "function",
            BlockKind::Procedure => "procedure",
        }
    }
}

pub struct FoldPattern {
    pub kind: BlockKind,
    pub start: Regex,
    pub end: Regex,
    /// Blank lines are ignored while looking for the end.
    pub skip_empty: bool,
}

impl FoldPattern {
    fn new(kind: BlockKind, start: &str, end: &str, skip_empty: bool) -> Self {
        Self {
            kind,
            start: Regex::new(start).expect("fold start pattern is valid"),
            end: Regex::new(end).expect("fold end pattern is valid"),
            skip_empty,
        }
    }
}

/// Ordered: the first matching start pattern wins.
pub static FOLD_PATTERNS: Lazy<Vec<FoldPattern>> = Lazy::new(|| {
    vec![
        FoldPattern::new(
            BlockKind::Variables,
            r"(?i)^Var\s*$",
            r"(?i)^(?:Debut|Const|Algorithme)",
            true,
        ),
        FoldPattern::new(
            BlockKind::Constants,
            r"(?i)^Const\s*$",
            r"(?i)^(?:Debut|Var|Algorithme)",
            true,
        ),
        FoldPattern::new(BlockKind::Body, r"(?i)^Debut\s*$", r"(?i)^Fin\s*\.?\s*$", false),
        FoldPattern::new(
            BlockKind::Conditional,
            r"(?i)^Si\s+.+\s+Alors\s*$",
            r"(?i)^(?:Fin\s*Si|FSi)",
            false,
        ),
        FoldPattern::new(
            BlockKind::Alternative,
            r"(?i)^Sinon\s*$",
            r"(?i)^(?:Fin\s*Si|FSi)",
            false,
        ),
        FoldPattern::new(
            BlockKind::ForLoop,
            r"(?i)^Pour\s+.+\s+Faire\s*$",
            r"(?i)^Fin\s*Pour",
            false,
        ),
        FoldPattern::new(
            BlockKind::WhileLoop,
            r"(?i)^Tant\s*Que\s+.+\s+Faire\s*$",
            r"(?i)^Fin\s*Tant\s*Que",
            false,
        ),
        FoldPattern::new(BlockKind::RepeatLoop, r"(?i)^Repeter\s*$", r"(?i)^Jusqua", false),
        FoldPattern::new(
            BlockKind::Function,
            r"(?i)^Fonction\s+",
            r"(?i)^Fin\s*Fonction",
            false,
        ),
        FoldPattern::new(
            BlockKind::Procedure,
            r"(?i)^Procedure\s+",
            r"(?i)^Fin\s*Procedure",
            false,
        ),
    ]
});

/// Collapsible span: from the end of the header line to the start of the
/// closing line. Header and closing lines stay visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldRange {
    pub kind: BlockKind,
    pub start: Position,
    pub end: Position,
}

impl FoldRange {
    pub fn start_line(&self) -> usize {
        self.start.line
    }

    pub fn end_line(&self) -> usize {
        self.end.line
    }
}

/// Pattern owning `line`, if any.
pub fn pattern_for(line: &str) -> Option<&'static FoldPattern> {
    let trimmed = line.trim();
    FOLD_PATTERNS.iter().find(|p| p.start.is_match(trimmed))
}

/// Fold range opened by `lines[start_line]`, or `None` if the line is not a
/// block header, the block is never closed, or its body is empty.
pub fn resolve_fold<S: AsRef<str>>(lines: &[S], start_line: usize) -> Option<FoldRange> {
    let header = lines.get(start_line)?.as_ref();
    let pattern = pattern_for(header)?;

    let mut depth = 0usize;
    let mut end_line = None;
    for (line_no, line) in lines.iter().enumerate().skip(start_line + 1) {
        let trimmed = line.as_ref().trim();
        if pattern.skip_empty && trimmed.is_empty() {
            continue;
        }
        if pattern.start.is_match(trimmed) {
            depth += 1;
        }
        if pattern.end.is_match(trimmed) {
            if depth == 0 {
                end_line = Some(line_no);
                break;
            }
            depth -= 1;
        }
    }

    let Some(end_line) = end_line else {
        tracing::trace!(start_line, kind = pattern.kind.as_str(), "unclosed block");
        return None;
    };
    if end_line <= start_line + 1 {
        return None;
    }

    tracing::trace!(start_line, end_line, kind = pattern.kind.as_str(), "fold resolved");
    Some(FoldRange {
        kind: pattern.kind,
        start: Position::new(start_line, header.chars().count()),
        end: Position::new(end_line, 0),
    })
}

/// Every fold of a document, ordered by header line.
pub fn fold_ranges<S: AsRef<str>>(lines: &[S]) -> Vec<FoldRange> {
    (0..lines.len())
        .filter_map(|line| resolve_fold(lines, line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    #[test]
    fn test_body_fold() {
        let doc = lines("Debut\n  Ecrire(1);\n  Ecrire(2);\nFin.");
        let range = resolve_fold(&doc, 0).unwrap();
        assert_eq!(range.kind, BlockKind::Body);
        assert_eq!(range.start, Position::new(0, 5));
        assert_eq!(range.end, Position::new(3, 0));
    }

    #[test]
    fn test_header_must_be_whole_line() {
        // `Pour` without `Faire` on the same line is not a loop header.
        let doc = lines("Pour i := 1 a 3\n  x := i;\n  y := i;\nFin Pour");
        assert_eq!(resolve_fold(&doc, 0), None);
        // Declarations on the `Var` line do not open a block.
        let doc = lines("Var x : Entier;\n  y : Entier;\n\nDebut");
        assert_eq!(resolve_fold(&doc, 0), None);
    }

    #[test]
    fn test_empty_body_is_not_folded() {
        let doc = lines("Si x > 0 Alors\nFin Si");
        assert_eq!(resolve_fold(&doc, 0), None);
    }

    #[test]
    fn test_single_line_body_is_folded() {
        let doc = lines("Si x > 0 Alors\n  Ecrire(x);\nFin Si");
        assert_eq!(resolve_fold(&doc, 0).unwrap().end_line(), 2);
    }

    #[test]
    fn test_unclosed_block() {
        let doc = lines("Repeter\n  x := x + 1;\n  y := y + 1;");
        assert_eq!(resolve_fold(&doc, 0), None);
    }

    #[test]
    fn test_var_block_skips_blank_lines() {
        let doc = lines("Var\n  x : Entier;\n\n  y : Reel;\n\nDebut\nFin.");
        let range = resolve_fold(&doc, 0).unwrap();
        assert_eq!(range.kind, BlockKind::Variables);
        assert_eq!(range.end_line(), 5);
    }

    #[test]
    fn test_single_word_closers() {
        let doc = lines("Pour i := 1 a 3 Faire\n  a;\n  b;\nFinPour;");
        assert_eq!(resolve_fold(&doc, 0).unwrap().end_line(), 3);
        let doc = lines("TantQue x > 0 Faire\n  a;\n  b;\nFinTantQue;");
        assert_eq!(resolve_fold(&doc, 0).unwrap().kind, BlockKind::WhileLoop);
        let doc = lines("Si x Alors\n  a;\n  b;\nFSi");
        assert_eq!(resolve_fold(&doc, 0).unwrap().end_line(), 3);
    }

    #[test]
    fn test_case_and_indentation_insensitive() {
        let doc = lines("    repeter\n  a;\n  b;\n  JUSQUA x > 3;");
        let range = resolve_fold(&doc, 0).unwrap();
        assert_eq!(range.kind, BlockKind::RepeatLoop);
        assert_eq!(range.start, Position::new(0, 11));
    }

    #[test]
    fn test_out_of_range_start() {
        let doc = lines("Debut\nFin.");
        assert_eq!(resolve_fold(&doc, 7), None);
        let empty: Vec<&str> = Vec::new();
        assert_eq!(resolve_fold(&empty, 0), None);
    }

    #[test]
    fn test_fold_ranges_collects_all() {
        let doc = lines(
            "Var\n  x : Entier;\n  y : Entier;\nDebut\n  Si x > 0 Alors\n    a;\n    b;\n  Fin Si\nFin.",
        );
        let kinds: Vec<BlockKind> = fold_ranges(&doc).iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![BlockKind::Variables, BlockKind::Body, BlockKind::Conditional]
        );
    }
}
