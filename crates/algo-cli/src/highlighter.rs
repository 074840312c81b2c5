//! ANSI rendering of tokenizer output

use algo_lsp_core::{LineScanState, TokenKind, Tokenizer, TypeRegistry, Vocabulary};
use nu_ansi_term::{Color, Style};
use serde::Serialize;

/// Terminal style for a token kind; `None` prints the text unchanged.
fn style_for(kind: TokenKind) -> Option<Style> {
    let style = match kind {
        TokenKind::Keyword => Color::Blue.bold(),
        TokenKind::Type => Style::new().fg(Color::Cyan),
        TokenKind::Definition => Color::Cyan.bold().underline(),
        TokenKind::Builtin => Style::new().fg(Color::Yellow),
        TokenKind::Atom => Style::new().fg(Color::LightPurple),
        TokenKind::Operator => Style::new().fg(Color::LightRed),
        TokenKind::String => Style::new().fg(Color::Green),
        TokenKind::Number => Style::new().fg(Color::Purple),
        TokenKind::Comment => Color::DarkGray.italic(),
        TokenKind::Punctuation | TokenKind::Identifier => return None,
    };
    Some(style)
}

/// Highlight one line, carrying `state` to the next call.
pub fn highlight_line(tokenizer: &Tokenizer<'_>, line: &str, state: &mut LineScanState) -> String {
    let mut out = String::with_capacity(line.len() * 2);
    for token in tokenizer.scan_line(line, state) {
        let text = token.text(line);
        match token.kind.and_then(style_for) {
            Some(style) => out.push_str(&style.paint(text).to_string()),
            None => out.push_str(text),
        }
    }
    out
}

/// Highlight a whole document. Record types are recognised even where they
/// are used before their declaration.
pub fn highlight_code(source: &str, vocabulary: &Vocabulary) -> String {
    let registry = TypeRegistry::from_document_with(source, vocabulary.type_keyword());
    let tokenizer = Tokenizer::with_registry(vocabulary, &registry);
    let mut state = LineScanState::new();
    source
        .lines()
        .map(|line| highlight_line(&tokenizer, line, &mut state))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One classified span, as printed by `highlight --json`.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    /// 1-based line
    pub line: usize,
    /// Byte offsets within the line
    pub start: usize,
    pub end: usize,
    pub kind: &'static str,
    pub text: String,
}

/// Classified spans of a document; whitespace and unclassified spans are skipped.
pub fn token_records(source: &str, vocabulary: &Vocabulary) -> Vec<TokenRecord> {
    let registry = TypeRegistry::from_document_with(source, vocabulary.type_keyword());
    let tokenizer = Tokenizer::with_registry(vocabulary, &registry);
    let mut state = LineScanState::new();
    let mut records = Vec::new();
    for (index, line) in source.lines().enumerate() {
        for token in tokenizer.scan_line(line, &mut state) {
            let Some(kind) = token.kind else { continue };
            records.push(TokenRecord {
                line: index + 1,
                start: token.start,
                end: token.end,
                kind: kind.as_str(),
                text: token.text(line).to_string(),
            });
        }
    }
    records
}
