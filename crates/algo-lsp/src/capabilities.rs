use tower_lsp::lsp_types::*;

use crate::handlers::semantic_tokens::LEGEND;

/// Define the server capabilities for the Algo LSP
pub fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        // Full text sync: every analysis rescans the whole document anyway
        text_document_sync: Some(TextDocumentSyncCapability::Kind(
            TextDocumentSyncKind::FULL,
        )),

        // `:` opens a declaration type, space advances a loop header
        completion_provider: Some(CompletionOptions {
            trigger_characters: Some(vec![":".to_string(), " ".to_string()]),
            ..Default::default()
        }),

        folding_range_provider: Some(FoldingRangeProviderCapability::Simple(true)),

        semantic_tokens_provider: Some(
            SemanticTokensServerCapabilities::SemanticTokensOptions(SemanticTokensOptions {
                legend: LEGEND.clone(),
                full: Some(SemanticTokensFullOptions::Bool(true)),
                range: None,
                work_done_progress_options: WorkDoneProgressOptions::default(),
            }),
        ),

        ..Default::default()
    }
}
