//! Core editing intelligence for the Algo pseudocode language
//!
//! This crate provides the text analysis shared by the language server and
//! the CLI tools. Every entry point is synchronous, allocation-light and
//! total: malformed or half-typed programs degrade to plain tokens, no fold
//! or an empty completion list.
//!
//! # Features
//!
//! - **Tokenizer**: line-by-line lexical classification for highlighting
//! - **Folding**: matching of block headers with their closing lines
//! - **Completion**: grammar-position hints and ranked prefix completions
//!
//! # Example
//!
//! ```
//! use algo_lsp_core::{compute_completions, resolve_fold, LineScanState, Position, Tokenizer, Vocabulary};
//!
//! let tokenizer = Tokenizer::new(Vocabulary::algo());
//! let (tokens, _next) = tokenizer.tokenize_line("  x : Entier;", &LineScanState::new());
//! assert_eq!(tokens.len(), 7);
//!
//! let lines = ["Debut", "  Ecrire(1);", "  Ecrire(2);", "Fin."];
//! assert_eq!(resolve_fold(&lines[..], 0).map(|r| r.end.line), Some(3));
//!
//! let result = compute_completions("Ecr", Position::new(0, 3));
//! println!("{} suggestions", result.items.len());
//! ```

pub mod completion;
pub mod error;
pub mod folding;
pub mod position;
pub mod symbols;
pub mod tokenizer;
pub mod vocabulary;

// Re-export main types for convenience
pub use completion::{
    compute_completions, detect_context, CompletionEngine, CompletionResult, GrammarContext,
    Suggestion, SuggestionKind,
};
pub use error::VocabularyError;
pub use folding::{fold_ranges, resolve_fold, BlockKind, FoldRange};
pub use position::Position;
pub use symbols::{
    extract_record_types, extract_record_types_with, extract_variables, DeclaredRecordType,
    DeclaredVariable, TypeRegistry,
};
pub use tokenizer::{LineScanState, Token, TokenKind, Tokenizer};
pub use vocabulary::{Snippet, Vocabulary, VocabularyTables, WordClass};

/// Classify one line with the built-in vocabulary.
pub fn tokenize_line(line: &str, state: &LineScanState) -> (Vec<Token>, LineScanState) {
    Tokenizer::new(Vocabulary::algo()).tokenize_line(line, state)
}
