use algo_lsp_core::{TokenKind, Tokenizer, Vocabulary};
use once_cell::sync::Lazy;
use tower_lsp::lsp_types::*;

use crate::document::{byte_to_utf16_column, Document};

/// Token types in legend order; the index is the wire value.
pub const TOKEN_TYPES: &[SemanticTokenType] = &[
    SemanticTokenType::KEYWORD,
    SemanticTokenType::TYPE,
    SemanticTokenType::FUNCTION,
    SemanticTokenType::ENUM_MEMBER,
    SemanticTokenType::OPERATOR,
    SemanticTokenType::STRING,
    SemanticTokenType::NUMBER,
    SemanticTokenType::COMMENT,
    SemanticTokenType::VARIABLE,
];

pub const TOKEN_MODIFIERS: &[SemanticTokenModifier] = &[
    SemanticTokenModifier::DECLARATION, // bit 0
];

pub static LEGEND: Lazy<SemanticTokensLegend> = Lazy::new(|| SemanticTokensLegend {
    token_types: TOKEN_TYPES.to_vec(),
    token_modifiers: TOKEN_MODIFIERS.to_vec(),
});

/// Legend index and modifier bits for a token kind, or `None` for spans the
/// client should leave uncoloured.
fn classify(kind: TokenKind) -> Option<(u32, u32)> {
    let (token_type, modifiers) = match kind {
        TokenKind::Keyword => (SemanticTokenType::KEYWORD, 0),
        TokenKind::Type => (SemanticTokenType::TYPE, 0),
        TokenKind::Definition => (SemanticTokenType::TYPE, 1 << 0),
        TokenKind::Builtin => (SemanticTokenType::FUNCTION, 0),
        TokenKind::Atom => (SemanticTokenType::ENUM_MEMBER, 0),
        TokenKind::Operator => (SemanticTokenType::OPERATOR, 0),
        TokenKind::String => (SemanticTokenType::STRING, 0),
        TokenKind::Number => (SemanticTokenType::NUMBER, 0),
        TokenKind::Comment => (SemanticTokenType::COMMENT, 0),
        TokenKind::Identifier => (SemanticTokenType::VARIABLE, 0),
        TokenKind::Punctuation => return None,
    };
    let index = TOKEN_TYPES.iter().position(|t| *t == token_type)?;
    Some((index as u32, modifiers))
}

/// Delta-encoded semantic tokens for the whole document.
///
/// Record types used before their declaration are still coloured as types:
/// the scan is seeded with every type name the document declares.
pub fn get_semantic_tokens(doc: &Document, vocabulary: &Vocabulary) -> Vec<SemanticToken> {
    let registry = doc.type_registry(vocabulary);
    let tokenizer = Tokenizer::with_registry(vocabulary, &registry);

    let mut result = Vec::new();
    let mut prev_line = 0u32;
    let mut prev_start = 0u32;

    for (line_no, tokens) in tokenizer.scan_document(doc.text()).into_iter().enumerate() {
        let line = &doc.lines()[line_no];
        for token in tokens {
            let Some((token_type, modifiers)) = token.kind.and_then(classify) else {
                continue;
            };
            let line_no = line_no as u32;
            let start = byte_to_utf16_column(line, token.start);
            let length = byte_to_utf16_column(line, token.end) - start;

            let delta_line = line_no - prev_line;
            let delta_start = if delta_line == 0 {
                start - prev_start
            } else {
                start
            };

            result.push(SemanticToken {
                delta_line,
                delta_start,
                length,
                token_type,
                token_modifiers_bitset: modifiers,
            });

            prev_line = line_no;
            prev_start = start;
        }
    }

    result
}
