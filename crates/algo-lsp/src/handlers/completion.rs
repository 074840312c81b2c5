use algo_lsp_core::{CompletionEngine, Suggestion, SuggestionKind, Vocabulary};
use tower_lsp::lsp_types::*;

use crate::document::Document;

/// Completion items at `position`, in engine ranking order.
pub fn get_completions(
    doc: &Document,
    vocabulary: &Vocabulary,
    position: Position,
) -> Vec<CompletionItem> {
    let engine = CompletionEngine::new(vocabulary);
    let result = engine.compute(doc.text(), doc.to_core_position(position));

    let range = Range {
        start: doc.to_lsp_position(result.replace_from),
        end: doc.to_lsp_position(result.replace_to),
    };

    result
        .items
        .iter()
        .enumerate()
        .map(|(rank, suggestion)| convert_to_lsp_completion(suggestion, rank, range))
        .collect()
}

/// Map a suggestion kind onto the closest LSP item kind.
pub fn item_kind(kind: SuggestionKind) -> CompletionItemKind {
    match kind {
        SuggestionKind::Variable => CompletionItemKind::VARIABLE,
        SuggestionKind::Snippet => CompletionItemKind::SNIPPET,
        SuggestionKind::Keyword => CompletionItemKind::KEYWORD,
        SuggestionKind::Type => CompletionItemKind::CLASS,
        SuggestionKind::Builtin => CompletionItemKind::FUNCTION,
        SuggestionKind::Atom => CompletionItemKind::CONSTANT,
        SuggestionKind::Operator => CompletionItemKind::OPERATOR,
    }
}

fn convert_to_lsp_completion(suggestion: &Suggestion, rank: usize, range: Range) -> CompletionItem {
    let documentation = suggestion.is_multiline().then(|| {
        Documentation::MarkupContent(MarkupContent {
            kind: MarkupKind::Markdown,
            value: format!("```algo\n{}\n```", suggestion.text),
        })
    });

    CompletionItem {
        label: suggestion.display_text.clone(),
        kind: Some(item_kind(suggestion.kind)),
        detail: Some(suggestion.kind.as_str().to_string()),
        documentation,
        // Clients re-sort by label otherwise.
        sort_text: Some(format!("{rank:05}")),
        filter_text: Some(suggestion.key.clone()),
        text_edit: Some(CompletionTextEdit::Edit(TextEdit {
            range,
            new_text: suggestion.text.clone(),
        })),
        insert_text_format: Some(InsertTextFormat::PLAIN_TEXT),
        ..Default::default()
    }
}
